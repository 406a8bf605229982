//! The entity directory: stable identifiers mapped to display names.
//!
//! Entries keep storage-insertion order. On disk the directory is a flat
//! JSON object `{ "<id>": "<name>", ... }`. A key repeated on disk keeps its
//! first position and its last value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// One tracked entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub name: String,
}

/// Result of [`Directory::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    /// The identifier already existed; its name was overwritten in place.
    Replaced { previous_name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directory {
    names: IndexMap<String, String>,
}

/// Rejects values that cannot safely key a log file.
pub(crate) fn validate_key(value: &str) -> Result<(), StoreError> {
    let unsafe_char = |c: char| matches!(c, '/' | '\\' | '\0') || c.is_control();
    if value.trim().is_empty() || value == "." || value == ".." || value.contains(unsafe_char) {
        return Err(StoreError::InvalidName(value.to_string()));
    }
    Ok(())
}

impl Directory {
    /// Adds or renames an entity.
    ///
    /// An existing identifier keeps its position and gets the new name. A
    /// name already used by a different identifier is rejected.
    pub fn add(&mut self, id: &str, name: &str) -> Result<AddOutcome, StoreError> {
        validate_key(id)?;
        validate_key(name)?;

        let owner = self
            .names
            .iter()
            .find(|(owner, n)| *n == name && *owner != id);
        if let Some((owner, _)) = owner {
            return Err(StoreError::DuplicateName {
                name: name.to_string(),
                existing_id: owner.clone(),
            });
        }

        if let Some(current) = self.names.get_mut(id) {
            let previous_name = std::mem::replace(current, name.to_string());
            return Ok(AddOutcome::Replaced { previous_name });
        }

        self.names.insert(id.to_string(), name.to_string());
        Ok(AddOutcome::Inserted)
    }

    /// Removes the first entry with the given display name.
    pub fn remove_by_name(&mut self, name: &str) -> Result<Entry, StoreError> {
        let (id, name) = self
            .names
            .values()
            .position(|n| n == name)
            .and_then(|index| self.names.shift_remove_index(index))
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(Entry { id, name })
    }

    /// Returns the identifier of the first entry with this display name.
    pub fn find_id_by_name(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(id, _)| id.as_str())
    }

    pub fn find_by_name(&self, name: &str) -> Option<Entry> {
        self.find_id_by_name(name).map(|id| Entry {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.names.iter().map(|(id, name)| Entry {
            id: id.clone(),
            name: name.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
