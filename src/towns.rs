//! Town name lookup.

use crate::{ConflateError, Result, TownId};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Maps administrative area identifiers to display names.
pub trait TownNames {
    fn name_of(&self, id: TownId) -> Option<&str>;
}

impl TownNames for HashMap<TownId, String> {
    fn name_of(&self, id: TownId) -> Option<&str> {
        self.get(&id).map(String::as_str)
    }
}

impl TownNames for BTreeMap<TownId, String> {
    fn name_of(&self, id: TownId) -> Option<&str> {
        self.get(&id).map(String::as_str)
    }
}

/// A static town table, typically loaded once per run.
///
/// The JSON form is an array of `{ "town_id": 35, "town": "BOSTON" }` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TownTable {
    names: BTreeMap<TownId, String>,
}

#[derive(Deserialize, Serialize)]
struct TownEntry {
    town_id: TownId,
    town: String,
}

impl TownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a town name.
    pub fn insert(&mut self, id: TownId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Parse a town table from its JSON form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries: Vec<TownEntry> = serde_json::from_str(json)?;
        Ok(entries.into_iter().map(|e| (e.town_id, e.town)).collect())
    }

    /// Load a town table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConflateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| ConflateError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl FromIterator<(TownId, String)> for TownTable {
    fn from_iter<I: IntoIterator<Item = (TownId, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl TownNames for TownTable {
    fn name_of(&self, id: TownId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

/// Join the names of `ids` (in the given order) with `delimiter`.
///
/// An id without a name is written as its number.
pub fn join_town_names<N: TownNames + ?Sized>(ids: &[TownId], names: &N, delimiter: &str) -> String {
    ids.iter()
        .map(|&id| match names.name_of(id) {
            Some(name) => name.to_string(),
            None => {
                warn!("[Towns] No name for town id {}", id);
                id.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(delimiter)
}
