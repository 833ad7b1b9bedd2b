//! In-memory lookup stores keyed by MMSI.
//!
//! Stores are built from JSON documents already read into memory. A
//! lookup that finds nothing is an error ([`LookupError::NotFound`]), never
//! an empty success, so callers can tell "no data" apart from results.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::types::{LookupError, Mmsi, MmsiRecord, RecordKind};

/// A table of records filtered by MMSI.
///
/// Several rows may share an MMSI (e.g. one per loading condition);
/// [`lookup`](Self::lookup) returns all of them in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore<T> {
    records: Vec<T>,
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: MmsiRecord> RecordStore<T> {
    /// Build a store from already-parsed records.
    #[must_use]
    pub const fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Parse`] if the document is not an array of
    /// record objects.
    pub fn from_json(json: &str) -> Result<Self, LookupError>
    where
        T: DeserializeOwned,
    {
        let records: Vec<T> = serde_json::from_str(json)?;
        let kind = T::KIND;
        tracing::debug!(%kind, count = records.len(), "loaded records");
        Ok(Self { records })
    }

    /// Number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records describing `mmsi`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if no record matches.
    pub fn lookup(&self, mmsi: Mmsi) -> Result<Vec<&T>, LookupError> {
        let found: Vec<&T> = self
            .records
            .iter()
            .filter(|r| r.mmsi() == Some(mmsi))
            .collect();
        if found.is_empty() {
            Err(LookupError::NotFound {
                kind: T::KIND,
                mmsi,
            })
        } else {
            Ok(found)
        }
    }
}

/// Precomputed optimization suggestions, one opaque JSON payload per vessel.
///
/// The payloads are typically per-waypoint speed proposals; the store
/// does not interpret them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizationStore {
    suggestions: HashMap<Mmsi, serde_json::Value>,
}

impl OptimizationStore {
    /// Parse a JSON object keyed by MMSI (`{"563045200": {...}, ...}`).
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Parse`] if the document is not a JSON object,
    /// or [`LookupError::InvalidKey`] if a key is not a decimal MMSI.
    pub fn from_json(json: &str) -> Result<Self, LookupError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let suggestions = raw
            .into_iter()
            .map(|(key, value)| {
                let id = key
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| LookupError::InvalidKey(key.clone()))?;
                Ok((Mmsi::new(id), value))
            })
            .collect::<Result<HashMap<_, _>, LookupError>>()?;
        tracing::debug!(count = suggestions.len(), "loaded optimization suggestions");
        Ok(Self { suggestions })
    }

    /// Number of vessels with suggestions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    /// Returns `true` if the store holds no suggestions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// The suggestion payload for `mmsi`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the vessel has no suggestions.
    pub fn lookup(&self, mmsi: Mmsi) -> Result<&serde_json::Value, LookupError> {
        self.suggestions
            .get(&mmsi)
            .ok_or(LookupError::NotFound {
                kind: RecordKind::Optimization,
                mmsi,
            })
    }

    /// The suggestion payload for `mmsi`, serialized as compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the vessel has no suggestions.
    pub fn lookup_json(&self, mmsi: Mmsi) -> Result<String, LookupError> {
        Ok(serde_json::to_string(self.lookup(mmsi)?)?)
    }
}
