//! Match evaluation: scoring, acceptance, and the running solution set.
//!
//! The evaluator is the per-query context object. It owns every piece of
//! query-scoped mutable state: the pattern node tallies, the reject list,
//! the set of already-compared pairs, the best known similarity, and the
//! candidate roots achieving it. A fresh evaluator is required per query;
//! concurrent queries share only the immutable store.
//!
//! The similarity score is a cheap, order-insensitive proxy for graph
//! similarity: it rewards shared vocabulary and penalizes size mismatch.
//! The exact matcher driving the callbacks already guarantees local
//! structural consistency; the evaluator only ranks which structurally
//! valid candidate is topically closest to the query.

use crate::scope::ScopedTerm;
use crate::starter::PatternCounts;
use crate::store::{AtomId, Store, SCOPE_LINK};
use std::collections::HashSet;
use tracing::trace;

/// Per-query accumulator for fuzzy-match results.
#[derive(Debug, Clone)]
pub struct MatchEvaluator {
    counts: PatternCounts,
    reject: HashSet<AtomId>,
    seen: HashSet<(AtomId, AtomId)>,
    best_similarity: f64,
    solutions: Vec<AtomId>,
}

impl MatchEvaluator {
    /// Creates an evaluator with an empty reject list.
    pub fn new() -> Self {
        Self {
            counts: PatternCounts::default(),
            reject: HashSet::new(),
            seen: HashSet::new(),
            best_similarity: f64::NEG_INFINITY,
            solutions: Vec::new(),
        }
    }

    /// Creates an evaluator that excludes any candidate containing one of
    /// the given atoms.
    pub fn with_reject_list<I: IntoIterator<Item = AtomId>>(reject: I) -> Self {
        let mut eval = Self::new();
        eval.reject = reject.into_iter().collect();
        eval
    }

    /// Records the pattern tallies accumulated during starter selection.
    ///
    /// The node total covers the whole pattern, not just one clause; the
    /// size-mismatch penalty is computed against it.
    pub fn set_pattern_counts(&mut self, counts: PatternCounts) {
        self.counts = counts;
    }

    /// Returns the recorded pattern tallies.
    #[inline]
    pub fn pattern_counts(&self) -> PatternCounts {
        self.counts
    }

    /// Clause-match callback invoked by the exact matcher.
    ///
    /// Always returns `true`: the evaluator never vetoes continuation of the
    /// search, its role is purely to record and score. Repeated invocations
    /// with a pair already compared are skipped, so the callback is
    /// idempotent under the re-discovery a backtracking matcher may produce.
    pub fn clause_match(
        &mut self,
        store: &Store,
        pattern_term: AtomId,
        candidate: AtomId,
    ) -> bool {
        if self.seen.insert((pattern_term, candidate)) {
            self.check_if_accept(store, pattern_term, candidate);
        }
        true
    }

    /// Scores a candidate and updates the solution set.
    ///
    /// Similarity is `common - diff` where `common` is the number of leaf
    /// nodes shared with the pattern clause and `diff` the absolute
    /// difference between the pattern's total node count and the candidate's
    /// node count. Strict improvement replaces the solution set; an exact
    /// tie appends, unless the candidate is alpha-equivalent to a scoped
    /// solution already present; anything lower is discarded. A candidate
    /// containing a rejected atom is dropped with no state change.
    fn check_if_accept(&mut self, store: &Store, pattern_term: AtomId, candidate: AtomId) {
        let candidate_nodes = store.leaf_nodes(candidate);

        // Hard exclusion, regardless of score.
        if candidate_nodes.iter().any(|n| self.reject.contains(n)) {
            trace!(%candidate, "candidate contains a rejected atom, skipping");
            return;
        }

        let pattern_nodes = store.leaf_nodes(pattern_term);
        let common = pattern_nodes.intersection(&candidate_nodes).count();
        let diff = (self.counts.nodes as i64 - candidate_nodes.len() as i64).unsigned_abs();
        let similarity = common as f64 - diff as f64;

        trace!(
            %pattern_term,
            %candidate,
            common,
            diff,
            similarity,
            best = self.best_similarity,
            "scored candidate"
        );

        if similarity > self.best_similarity {
            self.best_similarity = similarity;
            self.solutions.clear();
            self.solutions.push(candidate);
        } else if similarity == self.best_similarity && !self.is_alpha_duplicate(store, candidate)
        {
            self.solutions.push(candidate);
        }
    }

    /// Returns whether `candidate` is a scoped term alpha-equivalent to a
    /// solution already accepted.
    ///
    /// Non-scope candidates are never duplicates here: for them, interning
    /// already makes structural equality an id comparison, and the seen-pair
    /// set filters repeats.
    fn is_alpha_duplicate(&self, store: &Store, candidate: AtomId) -> bool {
        let is_scope = store
            .type_of(candidate)
            .is_some_and(|t| store.types().is_a(t, SCOPE_LINK));
        if !is_scope {
            return false;
        }
        let Ok(candidate_term) = ScopedTerm::extract(store, candidate) else {
            return false;
        };
        self.solutions.iter().any(|&soln| {
            ScopedTerm::extract(store, soln)
                .map(|t| t.is_equal(&candidate_term, store))
                .unwrap_or(false)
        })
    }

    /// Returns the candidate roots achieving the best known similarity, in
    /// acceptance order.
    #[inline]
    pub fn solutions(&self) -> &[AtomId] {
        &self.solutions
    }

    /// Returns the best similarity seen so far; `f64::NEG_INFINITY` before
    /// the first acceptance.
    #[inline]
    pub fn best_similarity(&self) -> f64 {
        self.best_similarity
    }

    /// Returns whether at least one solution has been accepted.
    #[inline]
    pub fn has_solutions(&self) -> bool {
        !self.solutions.is_empty()
    }
}

// Not derived: the derive would zero `best_similarity` instead of using the
// sentinel minimum, silently discarding negative-scoring candidates.
impl Default for MatchEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
