//! Query patterns.
//!
//! A pattern is an ordered sequence of clauses (each a handle to a
//! link-rooted term in the store), plus a subset marked *evaluatable*.
//! Evaluatable clauses have computed truth rather than structure to match,
//! so the starter selector skips them. Clause order is significant: starters
//! record the index of the clause they were found in.

use crate::store::AtomId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered set of clauses to match against the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    clauses: Vec<AtomId>,
    evaluatable: HashSet<AtomId>,
}

impl Pattern {
    /// Creates an empty pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a structural clause.
    pub fn add_clause(&mut self, clause: AtomId) {
        self.clauses.push(clause);
    }

    /// Appends a clause whose truth is computed rather than matched.
    ///
    /// Evaluatable clauses contribute no starters.
    pub fn add_evaluatable_clause(&mut self, clause: AtomId) {
        self.clauses.push(clause);
        self.evaluatable.insert(clause);
    }

    /// Returns the mandatory clause sequence, in insertion order.
    #[inline]
    pub fn clauses(&self) -> &[AtomId] {
        &self.clauses
    }

    /// Returns whether a clause is in the evaluatable subset.
    pub fn is_evaluatable(&self, clause: AtomId) -> bool {
        self.evaluatable.contains(&clause)
    }

    /// Returns whether the pattern has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
