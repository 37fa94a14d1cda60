//! Trial Context
//!
//! Typed artifact store threaded through every stage of a trial. Stages hand
//! values to later stages (parameters, generated keys, encoded buffers) by
//! inserting them here instead of capturing shared mutable variables.
//!
//! Artifacts are keyed by their Rust type, so each distinct type holds at most
//! one value. Wrap values in newtypes when a pipeline needs several of the
//! same underlying type.

use crate::error::StageError;
use fxhash::FxHashMap;
use std::any::{Any, TypeId, type_name};

/// Per-trial artifact store
#[derive(Default)]
pub struct TrialContext {
    artifacts: FxHashMap<TypeId, Box<dyn Any>>,
}

impl TrialContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an artifact, returning the previous value of the same type
    pub fn insert<T: Any>(&mut self, value: T) -> Option<T> {
        self.artifacts
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    /// Borrow an artifact
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.artifacts
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Mutably borrow an artifact
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.artifacts
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut::<T>())
    }

    /// Remove an artifact and take ownership of it
    pub fn take<T: Any>(&mut self) -> Option<T> {
        self.artifacts
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    /// Whether an artifact of type `T` is present
    pub fn contains<T: Any>(&self) -> bool {
        self.artifacts.contains_key(&TypeId::of::<T>())
    }

    /// Borrow an artifact a stage cannot run without.
    ///
    /// Fails with [`StageError::MissingArtifact`] when no earlier stage produced it.
    pub fn require<T: Any>(&self) -> Result<&T, StageError> {
        self.get::<T>()
            .ok_or(StageError::MissingArtifact(type_name::<T>()))
    }

    /// Mutable counterpart of [`require`](Self::require)
    pub fn require_mut<T: Any>(&mut self) -> Result<&mut T, StageError> {
        self.get_mut::<T>()
            .ok_or(StageError::MissingArtifact(type_name::<T>()))
    }

    /// Number of stored artifacts
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the context holds no artifacts
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Drop every artifact
    pub fn clear(&mut self) {
        self.artifacts.clear();
    }
}

impl std::fmt::Debug for TrialContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrialContext")
            .field("artifacts", &self.artifacts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Modulus(u64);

    #[derive(Debug, PartialEq)]
    struct Slots(Vec<u64>);

    #[test]
    fn test_insert_and_get() {
        let mut ctx = TrialContext::new();
        assert!(ctx.insert(Modulus(65537)).is_none());
        ctx.insert(Slots(vec![1, 2, 3]));

        assert_eq!(ctx.get::<Modulus>(), Some(&Modulus(65537)));
        assert_eq!(ctx.get::<Slots>().map(|s| s.0.len()), Some(3));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_insert_replaces_same_type() {
        let mut ctx = TrialContext::new();
        ctx.insert(Modulus(17));
        let old = ctx.insert(Modulus(257));
        assert_eq!(old, Some(Modulus(17)));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_get_mut_and_take() {
        let mut ctx = TrialContext::new();
        ctx.insert(Slots(vec![1]));
        ctx.get_mut::<Slots>().unwrap().0.push(2);

        let slots = ctx.take::<Slots>().unwrap();
        assert_eq!(slots.0, vec![1, 2]);
        assert!(!ctx.contains::<Slots>());
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_require_missing_names_type() {
        let ctx = TrialContext::new();
        match ctx.require::<Modulus>() {
            Err(StageError::MissingArtifact(name)) => assert!(name.ends_with("Modulus")),
            other => panic!("expected MissingArtifact, got {other:?}"),
        }
    }

    #[test]
    fn test_clear() {
        let mut ctx = TrialContext::new();
        ctx.insert(Modulus(3));
        ctx.clear();
        assert!(ctx.get::<Modulus>().is_none());
    }
}
