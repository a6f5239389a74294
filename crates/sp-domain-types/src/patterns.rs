// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Exclude-pattern set attached to a repository

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of path/glob patterns whose matches are treated as ignored.
///
/// Order is irrelevant and entries are unique. Iteration is sorted so the
/// list handed to collaborators is stable between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternSet(BTreeSet<String>);

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }

    /// Add a pattern. Returns `false` when it was already present.
    pub fn insert(&mut self, pattern: impl Into<String>) -> bool {
        self.0.insert(pattern.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Patterns present in exactly one of the two sets.
    pub fn symmetric_difference<'a>(&'a self, other: &'a PatternSet) -> Vec<&'a str> {
        self.0.symmetric_difference(&other.0).map(String::as_str).collect()
    }

    /// Whether replacing `self` with `other` would change anything.
    pub fn differs_from(&self, other: &PatternSet) -> bool {
        self.0.symmetric_difference(&other.0).next().is_some()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PatternSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for PatternSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
