//! Slot Arithmetic Workload
//!
//! A lattice-flavoured stand-in for a homomorphic-encryption benchmark. Two
//! slot vectors are encoded, masked with a secret plus small noise, added and
//! multiplied slot-wise, then unmasked and decoded. None of this is secure; it
//! gives each phase a data-dependent cost that scales with the slot count.
//!
//! Stage data flow through the trial context:
//!
//! ```text
//! parameter setup ─► SlotParams
//! key generation  ─► SecretKey, NoiseSource
//! encoding        ─► Encoded
//! encryption      ─► Encrypted
//! addition        ─► Sum
//! multiplication  ─► Product
//! decryption      ─► Decrypted
//! decoding        ─► Decoded
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stagebench::{HarnessError, Pipeline, SampleOutput, StageError, TrialContext};
use thiserror::Error;

/// Largest supported `log_slots`
pub const MAX_LOG_SLOTS: u32 = 20;

/// Stage names in execution order
pub const STAGES: [&str; 8] = [
    "parameter setup",
    "key generation",
    "encoding",
    "encryption",
    "addition",
    "multiplication",
    "decryption",
    "decoding",
];

/// Errors raised by the workload itself
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    /// Slot count exponent outside `1..=MAX_LOG_SLOTS`
    #[error("log_slots must be in 1..={max}, got {0}", max = MAX_LOG_SLOTS)]
    LogSlots(u32),

    /// Cipher modulus too large for the u64 arithmetic
    #[error("cipher modulus {0} must be below 2^62")]
    CipherModulus(u64),

    /// Plain modulus leaves no room for noise
    #[error("plain modulus {plain} too large for cipher modulus {cipher}")]
    PlainModulus {
        /// Plaintext modulus
        plain: u64,
        /// Ciphertext modulus
        cipher: u64,
    },

    /// Operand length differs from the slot count
    #[error("expected {expected} slots, got {found}")]
    LengthMismatch {
        /// Configured slot count
        expected: usize,
        /// Actual operand length
        found: usize,
    },

    /// A decoded slot differs from the expected value
    #[error("slot {slot}: expected {expected}, got {found}")]
    WrongSlot {
        /// Slot index
        slot: usize,
        /// Expected value
        expected: u64,
        /// Decoded value
        found: u64,
    },
}

impl From<SlotError> for StageError {
    fn from(err: SlotError) -> Self {
        StageError::source(err)
    }
}

/// Driver-owned parameter literal, borrowed by the pipeline's stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotParamsLiteral {
    /// Slot count is `2^log_slots`
    pub log_slots: u32,
    /// Plaintext modulus
    pub plain_modulus: u64,
    /// Ciphertext modulus
    pub cipher_modulus: u64,
    /// Key generation seed
    pub seed: u64,
}

impl Default for SlotParamsLiteral {
    fn default() -> Self {
        Self {
            log_slots: 13,
            plain_modulus: 65537,
            cipher_modulus: (1 << 55) - 55,
            seed: 0x5eed,
        }
    }
}

/// Validated parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotParams {
    slots: usize,
    plain: u64,
    cipher: u64,
    delta: u64,
}

impl SlotParams {
    /// Validate a literal
    pub fn from_literal(literal: &SlotParamsLiteral) -> Result<Self, SlotError> {
        if literal.log_slots == 0 || literal.log_slots > MAX_LOG_SLOTS {
            return Err(SlotError::LogSlots(literal.log_slots));
        }
        if literal.cipher_modulus >= 1 << 62 {
            return Err(SlotError::CipherModulus(literal.cipher_modulus));
        }
        // Scaling factor must leave at least 4 bits of noise headroom.
        if literal.plain_modulus < 2
            || literal.plain_modulus.saturating_mul(16) > literal.cipher_modulus
        {
            return Err(SlotError::PlainModulus {
                plain: literal.plain_modulus,
                cipher: literal.cipher_modulus,
            });
        }

        Ok(Self {
            slots: 1 << literal.log_slots,
            plain: literal.plain_modulus,
            cipher: literal.cipher_modulus,
            delta: literal.cipher_modulus / literal.plain_modulus,
        })
    }

    /// Number of slots per vector
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Plaintext modulus
    pub fn plain_modulus(&self) -> u64 {
        self.plain
    }

    /// Ciphertext modulus
    pub fn cipher_modulus(&self) -> u64 {
        self.cipher
    }

    fn check_len(&self, found: usize) -> Result<(), SlotError> {
        if found == self.slots {
            Ok(())
        } else {
            Err(SlotError::LengthMismatch {
                expected: self.slots,
                found,
            })
        }
    }

    fn mul_mod(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.cipher as u128) as u64
    }
}

/// Per-slot secret mask
#[derive(Debug, Clone)]
pub struct SecretKey(Vec<u64>);

impl SecretKey {
    /// Draw a fresh mask
    pub fn generate<R: Rng>(params: &SlotParams, rng: &mut R) -> Self {
        Self((0..params.slots).map(|_| rng.random_range(0..params.cipher)).collect())
    }
}

/// Randomness used for encryption noise
#[derive(Debug)]
pub struct NoiseSource(pub StdRng);

/// Encoded slot vector, reduced modulo the plaintext modulus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plaintext(Vec<u64>);

impl Plaintext {
    /// Slot values
    pub fn values(&self) -> &[u64] {
        &self.0
    }
}

/// Masked slot vector
#[derive(Debug, Clone)]
pub struct Ciphertext {
    data: Vec<u64>,
    /// How many copies of the secret mask are folded in
    mask_weight: u64,
}

/// Both encoded operands
#[derive(Debug)]
pub struct Encoded(pub Plaintext, pub Plaintext);

/// Both encrypted operands
#[derive(Debug)]
pub struct Encrypted(pub Ciphertext, pub Ciphertext);

/// Slot-wise sum of the operands
#[derive(Debug)]
pub struct Sum(pub Ciphertext);

/// Slot-wise product of the operands
#[derive(Debug)]
pub struct Product(pub Vec<u64>);

/// Decrypted sum
#[derive(Debug)]
pub struct Decrypted(pub Plaintext);

/// Decoded sum, the run's illustrative output
#[derive(Debug)]
pub struct Decoded(pub Vec<u64>);

/// Encode raw values into a plaintext
pub fn encode(params: &SlotParams, values: &[u64]) -> Result<Plaintext, SlotError> {
    params.check_len(values.len())?;
    Ok(Plaintext(values.iter().map(|v| v % params.plain).collect()))
}

/// Mask a plaintext with the secret and fresh noise
pub fn encrypt<R: Rng>(
    params: &SlotParams,
    sk: &SecretKey,
    pt: &Plaintext,
    rng: &mut R,
) -> Ciphertext {
    let noise_bound = (params.delta / 8).max(1);
    let data = pt
        .0
        .iter()
        .zip(&sk.0)
        .map(|(&m, &s)| (m * params.delta + s + rng.random_range(0..noise_bound)) % params.cipher)
        .collect();
    Ciphertext {
        data,
        mask_weight: 1,
    }
}

/// Slot-wise addition
pub fn add(params: &SlotParams, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext, SlotError> {
    params.check_len(a.data.len())?;
    params.check_len(b.data.len())?;
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(&x, &y)| (x + y) % params.cipher)
        .collect();
    Ok(Ciphertext {
        data,
        mask_weight: a.mask_weight + b.mask_weight,
    })
}

/// Slot-wise multiplication.
///
/// The product is not decryptable; it only carries the cost of the operation.
pub fn multiply(
    params: &SlotParams,
    a: &Ciphertext,
    b: &Ciphertext,
) -> Result<Vec<u64>, SlotError> {
    params.check_len(a.data.len())?;
    params.check_len(b.data.len())?;
    Ok(a.data
        .iter()
        .zip(&b.data)
        .map(|(&x, &y)| params.mul_mod(x, y))
        .collect())
}

/// Remove the mask and round away the noise
pub fn decrypt(
    params: &SlotParams,
    sk: &SecretKey,
    ct: &Ciphertext,
) -> Result<Plaintext, SlotError> {
    params.check_len(ct.data.len())?;
    let values = ct
        .data
        .iter()
        .zip(&sk.0)
        .map(|(&c, &s)| {
            let mask = params.mul_mod(ct.mask_weight % params.cipher, s);
            let scaled = (c + params.cipher - mask) % params.cipher;
            ((scaled + params.delta / 2) / params.delta) % params.plain
        })
        .collect();
    Ok(Plaintext(values))
}

/// Decode a plaintext back into slot values
pub fn decode(params: &SlotParams, pt: &Plaintext) -> Result<Vec<u64>, SlotError> {
    params.check_len(pt.0.len())?;
    Ok(pt.0.clone())
}

/// Build the eight-stage slot arithmetic pipeline.
///
/// The stages borrow `literal`; each trial re-validates it and re-derives keys
/// from its seed, so every trial does identical work.
pub fn slot_pipeline(literal: &SlotParamsLiteral) -> Result<Pipeline<'_>, HarnessError> {
    Pipeline::builder()
        .name("slot-arithmetic")
        .stage(STAGES[0], move |ctx| {
            ctx.insert(SlotParams::from_literal(literal)?);
            Ok(())
        })
        .stage(STAGES[1], move |ctx| {
            let params = *ctx.require::<SlotParams>()?;
            let mut rng = StdRng::seed_from_u64(literal.seed);
            ctx.insert(SecretKey::generate(&params, &mut rng));
            ctx.insert(NoiseSource(rng));
            Ok(())
        })
        .stage(STAGES[2], |ctx| {
            let params = *ctx.require::<SlotParams>()?;
            let ones = encode(&params, &vec![1; params.slots])?;
            let twos = encode(&params, &vec![2; params.slots])?;
            ctx.insert(Encoded(ones, twos));
            Ok(())
        })
        .stage(STAGES[3], |ctx| {
            let params = *ctx.require::<SlotParams>()?;
            let mut noise = ctx
                .take::<NoiseSource>()
                .ok_or(StageError::MissingArtifact(std::any::type_name::<NoiseSource>()))?;
            let encrypted = {
                let sk = ctx.require::<SecretKey>()?;
                let Encoded(a, b) = ctx.require::<Encoded>()?;
                Encrypted(
                    encrypt(&params, sk, a, &mut noise.0),
                    encrypt(&params, sk, b, &mut noise.0),
                )
            };
            ctx.insert(encrypted);
            ctx.insert(noise);
            Ok(())
        })
        .stage(STAGES[4], |ctx| {
            let params = *ctx.require::<SlotParams>()?;
            let Encrypted(a, b) = ctx.require::<Encrypted>()?;
            let sum = add(&params, a, b)?;
            ctx.insert(Sum(sum));
            Ok(())
        })
        .stage(STAGES[5], |ctx| {
            let params = *ctx.require::<SlotParams>()?;
            let Encrypted(a, b) = ctx.require::<Encrypted>()?;
            let product = multiply(&params, a, b)?;
            ctx.insert(Product(product));
            Ok(())
        })
        .stage(STAGES[6], |ctx| {
            let params = *ctx.require::<SlotParams>()?;
            let sk = ctx.require::<SecretKey>()?;
            let Sum(sum) = ctx.require::<Sum>()?;
            let plain = decrypt(&params, sk, sum)?;
            ctx.insert(Decrypted(plain));
            Ok(())
        })
        .stage(STAGES[7], |ctx| {
            let params = *ctx.require::<SlotParams>()?;
            let Decrypted(plain) = ctx.require::<Decrypted>()?;
            let decoded = decode(&params, plain)?;
            ctx.insert(Decoded(decoded));
            Ok(())
        })
        .build()
}

/// Sample output for single-trial reports
pub fn decoded_sample(ctx: &TrialContext) -> Option<SampleOutput> {
    ctx.get::<Decoded>()
        .map(|decoded| SampleOutput::from_values("Decrypted result", &decoded.0))
}

/// Check that every decoded slot holds `1 + 2`
pub fn verify_decoded(ctx: &TrialContext) -> Result<(), StageError> {
    let Decoded(values) = ctx.require::<Decoded>()?;
    match values.iter().position(|&v| v != 3) {
        Some(slot) => Err(SlotError::WrongSlot {
            slot,
            expected: 3,
            found: values[slot],
        }
        .into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagebench::TrialRunner;

    fn small() -> SlotParamsLiteral {
        SlotParamsLiteral {
            log_slots: 6,
            ..Default::default()
        }
    }

    #[test]
    fn test_literal_validation() {
        let bad_slots = SlotParamsLiteral {
            log_slots: 0,
            ..Default::default()
        };
        assert_eq!(
            SlotParams::from_literal(&bad_slots),
            Err(SlotError::LogSlots(0))
        );

        let bad_plain = SlotParamsLiteral {
            plain_modulus: 1 << 54,
            ..Default::default()
        };
        assert!(matches!(
            SlotParams::from_literal(&bad_plain),
            Err(SlotError::PlainModulus { .. })
        ));

        let params = SlotParams::from_literal(&SlotParamsLiteral::default()).unwrap();
        assert_eq!(params.slots(), 8192);
        assert_eq!(params.plain_modulus(), 65537);
    }

    #[test]
    fn test_add_then_decrypt_recovers_sum() {
        let params = SlotParams::from_literal(&small()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let sk = SecretKey::generate(&params, &mut rng);

        let a = encode(&params, &vec![40_000; 64]).unwrap();
        let b = encode(&params, &vec![30_000; 64]).unwrap();
        let ca = encrypt(&params, &sk, &a, &mut rng);
        let cb = encrypt(&params, &sk, &b, &mut rng);
        let sum = add(&params, &ca, &cb).unwrap();

        let plain = decrypt(&params, &sk, &sum).unwrap();
        // 70000 mod 65537
        assert!(plain.values().iter().all(|&v| v == 4463));
    }

    #[test]
    fn test_length_mismatch() {
        let params = SlotParams::from_literal(&small()).unwrap();
        let err = encode(&params, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            SlotError::LengthMismatch {
                expected: 64,
                found: 3
            }
        );
    }

    #[test]
    fn test_pipeline_decodes_three_everywhere() {
        let literal = small();
        let mut pipeline = slot_pipeline(&literal).unwrap();
        let mut ctx = TrialContext::new();

        let result = TrialRunner::new()
            .run_trial_in(&mut pipeline, &mut ctx)
            .unwrap();

        let names: Vec<_> = result.stage_names().collect();
        assert_eq!(names, STAGES);
        verify_decoded(&ctx).unwrap();
        assert!(ctx.contains::<Product>());

        let sample = decoded_sample(&ctx).unwrap();
        assert_eq!(sample.values.len(), 64);
        assert_eq!(sample.values[..5], ["3", "3", "3", "3", "3"]);
    }

    #[test]
    fn test_invalid_literal_fails_first_stage() {
        let literal = SlotParamsLiteral {
            log_slots: 40,
            ..Default::default()
        };
        let mut pipeline = slot_pipeline(&literal).unwrap();

        let err = TrialRunner::new().run_trial(&mut pipeline).unwrap_err();
        assert_eq!(err.failed_stage(), Some("parameter setup"));
    }
}
