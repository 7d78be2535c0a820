// Stash - keyed holding area for removed layout fragments
use super::layout::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller chosen identifier of a stashed fragment.
pub type StashIdentifier = String;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stash(BTreeMap<StashIdentifier, Vec<Item>>);

impl Stash {
    /// Stores items under `key`, replacing whatever was stashed there before.
    pub fn put(&mut self, key: impl Into<StashIdentifier>, items: Vec<Item>) {
        self.0.insert(key.into(), items);
    }

    pub fn get(&self, key: &str) -> Option<&[Item]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn take(&mut self, key: &str) -> Option<Vec<Item>> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &StashIdentifier> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) -> Vec<StashIdentifier> {
        let keys = self.0.keys().cloned().collect();
        self.0.clear();
        keys
    }
}
