//! Editable list of address entries.
//!
//! Entry position is visiting position. The list never shrinks below
//! [`MIN_ENTRIES`].

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// Minimum number of entries the list holds at all times.
pub const MIN_ENTRIES: usize = 2;

/// Role of a stop derived from its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointRole {
    Origin,
    Intermediate,
    Destination,
}

/// Read-only view of an entry and its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    pub address: String,
    pub role: WaypointRole,
}

/// Classifies an ordered stop list into origin, intermediates and destination.
pub fn waypoints<S: AsRef<str>>(stops: &[S]) -> Vec<Waypoint> {
    let last = stops.len().saturating_sub(1);
    stops
        .iter()
        .enumerate()
        .map(|(i, address)| {
            let role = if i == 0 {
                WaypointRole::Origin
            } else if i == last {
                WaypointRole::Destination
            } else {
                WaypointRole::Intermediate
            };
            Waypoint {
                address: address.as_ref().to_string(),
                role,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressListStore {
    entries: Vec<String>,
}

impl Default for AddressListStore {
    fn default() -> Self {
        Self {
            entries: vec![String::new(); MIN_ENTRIES],
        }
    }
}

impl AddressListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from existing entries, padding with blanks up to the minimum.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        while entries.len() < MIN_ENTRIES {
            entries.push(String::new());
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_at(&mut self, index: usize, value: impl Into<String>) -> Result<(), AddressError> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(AddressError::IndexOutOfRange { index, len })?;
        *slot = value.into();
        Ok(())
    }

    pub fn append(&mut self) {
        self.entries.push(String::new());
    }

    pub fn remove_at(&mut self, index: usize) -> Result<String, AddressError> {
        let len = self.entries.len();
        if index >= len {
            return Err(AddressError::IndexOutOfRange { index, len });
        }
        if len <= MIN_ENTRIES {
            return Err(AddressError::BelowMinimum {
                minimum: MIN_ENTRIES,
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Non-blank entries, trimmed, in order.
    pub fn filled(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn waypoints(&self) -> Vec<Waypoint> {
        waypoints(&self.entries)
    }
}
