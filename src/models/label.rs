// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label registry.
//!
//! Labels are global to a session and kept in insertion order, which is
//! also the display order and the order used to pick a default label.

/// Ordered set of unique, user-defined labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label after trimming whitespace.
    ///
    /// Empty strings and exact (case-sensitive) duplicates are ignored.
    /// Returns whether the set changed.
    pub fn add(&mut self, label: &str) -> bool {
        let value = label.trim();
        if value.is_empty() || self.contains(value) {
            return false;
        }
        self.labels.push(value.to_string());
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Label assigned to newly drawn boxes.
    pub fn first(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            set.add(label.as_ref());
        }
        set
    }
}
