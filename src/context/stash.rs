//! Per-request stash
//!
//! Typed scratch space shared by the handlers of one chain. Values are
//! stored as `Any` and every read names the type it expects, so a key
//! written as `i64` and read as `String` is an explicit error.

use std::any::{type_name, Any};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StashError {
    #[error("stash key '{0}' is not set")]
    Missing(String),

    #[error("stash key '{key}' does not hold a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

#[derive(Default)]
pub struct Stash {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Stash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing whatever was there
    ///
    /// Returns `true` when a previous value was replaced.
    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) -> bool {
        self.values.insert(key.into(), Box::new(value)).is_some()
    }

    pub fn get<T: Any>(&self, key: &str) -> Result<&T, StashError> {
        self.values
            .get(key)
            .ok_or_else(|| StashError::Missing(key.to_string()))?
            .downcast_ref::<T>()
            .ok_or_else(|| mismatch::<T>(key))
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Result<&mut T, StashError> {
        self.values
            .get_mut(key)
            .ok_or_else(|| StashError::Missing(key.to_string()))?
            .downcast_mut::<T>()
            .ok_or_else(|| mismatch::<T>(key))
    }

    /// Remove and return the value under `key`
    ///
    /// On a type mismatch the value stays in place.
    pub fn remove<T: Any>(&mut self, key: &str) -> Result<T, StashError> {
        match self.values.get(key) {
            None => return Err(StashError::Missing(key.to_string())),
            Some(value) if !value.is::<T>() => return Err(mismatch::<T>(key)),
            Some(_) => {}
        }
        self.values
            .remove(key)
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
            .ok_or_else(|| mismatch::<T>(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Stash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

fn mismatch<T>(key: &str) -> StashError {
    StashError::TypeMismatch {
        key: key.to_string(),
        expected: type_name::<T>(),
    }
}
