//! Flat, session-wide variable storage.

use calc_value::Value;
use std::collections::hash_map::{Entry, HashMap};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Variable '{name}' is not defined")]
pub struct UndefinedVariable {
    pub name: String,
}

/// Maps variable names to their current value. There is no scoping: every block reads and writes the same store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    vars: HashMap<String, Value>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<&Value, UndefinedVariable> {
        self.vars.get(name).ok_or_else(|| UndefinedVariable {
            name: name.to_string(),
        })
    }

    /// Inserts or overwrites `name`. The new value may have a different kind than the old one.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> &Value {
        match self.vars.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                entry.insert(value);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(value),
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
