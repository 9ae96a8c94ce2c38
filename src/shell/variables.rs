use std::collections::HashMap;

use crate::config::MAX_VARIABLES;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VariableError {
    #[error("Variable name cannot be empty")]
    EmptyName,

    #[error("Error saving variable: memory is full")]
    Full,
}

/// Shell variables. Holds at most `capacity` names; overwriting an existing
/// name always succeeds.
#[derive(Debug)]
pub struct VariableStore {
    values: HashMap<String, String>,
    capacity: usize,
}

impl Default for VariableStore {
    fn default() -> Self {
        VariableStore::with_capacity(MAX_VARIABLES)
    }
}

impl VariableStore {
    pub fn with_capacity(capacity: usize) -> VariableStore {
        VariableStore {
            values: HashMap::new(),
            capacity,
        }
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), VariableError> {
        if name.is_empty() {
            return Err(VariableError::EmptyName);
        }

        if let Some(slot) = self.values.get_mut(name) {
            *slot = value.to_string();
            return Ok(());
        }
        if self.values.len() == self.capacity {
            return Err(VariableError::Full);
        }

        self.values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
