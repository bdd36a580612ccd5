use super::types::{FeeEntry, FeeKind};

/// A single-field replacement applied to one fee entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FeeUpdate {
    Name(String),
    Value(f64),
    Kind(FeeKind),
}

/// Ordered collection of fee entries. Order is preserved for display only
/// and never influences the computed breakdown.
///
/// Ids are allocated as `max(existing ids, 0) + 1`, so an id is never reused
/// within a session even after the entry holding it is removed. Mutations
/// addressing an unknown id are silent no-ops: a stale reference from the
/// form layer must not abort a batch of updates.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeList {
    entries: Vec<FeeEntry>,
}

impl FeeList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a fresh entry (empty name, value 0, percentage) and returns
    /// its id.
    pub fn add(&mut self) -> u32 {
        let id = self.next_id();
        self.entries.push(FeeEntry {
            id,
            name: String::new(),
            value: 0.0,
            kind: FeeKind::Percentage,
        });
        id
    }

    /// Replaces one field of the entry with the given id. No structural
    /// validation on values: negative amounts pass through, matching the
    /// permissive numeric domain of the engine.
    pub fn update(&mut self, id: u32, update: FeeUpdate) {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return;
        };
        match update {
            FeeUpdate::Name(name) => entry.name = name,
            FeeUpdate::Value(value) => entry.value = value,
            FeeUpdate::Kind(kind) => entry.kind = kind,
        }
    }

    pub fn remove(&mut self, id: u32) {
        self.entries.retain(|entry| entry.id != id);
    }

    pub fn entries(&self) -> &[FeeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_id(&self) -> u32 {
        self.entries.iter().map(|entry| entry.id).max().unwrap_or(0) + 1
    }
}

impl Default for FeeList {
    /// Matches the seller-facing starting state: a single platform
    /// commission of 2.5% of the sale price.
    fn default() -> Self {
        Self {
            entries: vec![FeeEntry {
                id: 1,
                name: "Platform commission".to_string(),
                value: 2.5,
                kind: FeeKind::Percentage,
            }],
        }
    }
}
