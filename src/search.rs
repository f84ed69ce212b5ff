//! Fuzzy search driver.
//!
//! Drives multiple neighborhood searches, each seeded from a different
//! starter, instead of a single anchored search. For every starter it
//! enumerates the structures in the store that reference it (its incoming
//! set) and delegates each candidate to the external exact matcher, which
//! reports structurally consistent pairings back through the evaluator's
//! clause-match callback. The loop stops when the starters are exhausted or
//! the search budget is spent; both are expected termination paths, never
//! errors.
//!
//! Execution is single-threaded and call-and-return: one exact-match
//! invocation at a time, callbacks delivered inline before it returns. The
//! store is read-only for the duration of a search.

use crate::evaluate::MatchEvaluator;
use crate::pattern::Pattern;
use crate::starter::{dedup_starters, find_starters, rank_starters, PatternCounts, Starter};
use crate::store::{AtomId, Store};
use tracing::debug;

/// Default cap on the number of starters explored per query.
///
/// The budget is the sole resource bound against pathological high-fan-out
/// graphs; there is no cancellation or timeout beyond it.
pub const DEFAULT_MAX_SEARCHES: usize = 100;

/// External exact matcher contract.
///
/// `explore_neighborhood` performs a structural search rooted at one pattern
/// clause against one candidate structure, invoking
/// [`MatchEvaluator::clause_match`] zero or more times as it discovers
/// consistent (pattern-subterm, candidate-subterm) pairings. The driver
/// imposes no constraint on the backtracking strategy beyond that callback
/// contract.
pub trait NeighborhoodExplorer {
    /// Explores one candidate structure against one clause.
    fn explore_neighborhood(
        &mut self,
        store: &Store,
        clause_root: AtomId,
        starter_term: Option<AtomId>,
        candidate: AtomId,
        evaluator: &mut MatchEvaluator,
    );
}

/// Minimal explorer reporting the single (clause root, candidate) pairing
/// per invocation.
///
/// Suitable when the incoming-set members themselves are the candidate
/// structures of interest; a full backtracking engine plugs in through the
/// same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootReportExplorer;

impl NeighborhoodExplorer for RootReportExplorer {
    fn explore_neighborhood(
        &mut self,
        store: &Store,
        clause_root: AtomId,
        _starter_term: Option<AtomId>,
        candidate: AtomId,
        evaluator: &mut MatchEvaluator,
    ) {
        evaluator.clause_match(store, clause_root, candidate);
    }
}

/// Driver for budgeted, starter-seeded fuzzy searches.
#[derive(Debug, Clone)]
pub struct FuzzySearcher {
    max_searches: usize,
}

impl FuzzySearcher {
    /// Creates a searcher with the default budget.
    pub fn new() -> Self {
        Self {
            max_searches: DEFAULT_MAX_SEARCHES,
        }
    }

    /// Creates a searcher with a custom budget.
    pub fn with_budget(max_searches: usize) -> Self {
        Self { max_searches }
    }

    /// Runs the fuzzy search for `pattern`.
    ///
    /// Collects starters from every non-evaluatable clause, deduplicates
    /// them by identity, ranks them by (width ascending, depth descending),
    /// and explores up to the budget: for each starter, every member of its
    /// incoming set is handed to the explorer rooted at the starter's
    /// clause. The loop never short-circuits on a found solution, because a
    /// later, lower-ranked starter may still reach a strictly better
    /// candidate in a different region of the graph.
    ///
    /// Returns `true` iff the evaluator accumulated at least one solution.
    /// `false` is a control-flow value telling the caller to fall back to
    /// another matching strategy, not an error.
    pub fn initiate_search<E: NeighborhoodExplorer>(
        &self,
        store: &Store,
        pattern: &Pattern,
        explorer: &mut E,
        evaluator: &mut MatchEvaluator,
    ) -> bool {
        let mut starters: Vec<Starter> = Vec::new();
        let mut counts = PatternCounts::default();
        for (clause_idx, &clause) in pattern.clauses().iter().enumerate() {
            if pattern.is_evaluatable(clause) {
                continue;
            }
            find_starters(store, clause, clause_idx, &mut starters, &mut counts);
        }
        evaluator.set_pattern_counts(counts);

        dedup_starters(&mut starters);
        rank_starters(&mut starters);
        debug!(
            starters = starters.len(),
            pattern_nodes = counts.nodes,
            pattern_variables = counts.variables,
            budget = self.max_searches,
            "starting fuzzy search"
        );

        let mut search_cnt = 0;
        while search_cnt < self.max_searches {
            if search_cnt == starters.len() {
                debug!("no more available starters for the neighborhood search");
                break;
            }
            let starter = &starters[search_cnt];
            let root = pattern.clauses()[starter.clause_idx];
            search_cnt += 1;
            debug!(
                search = search_cnt,
                budget = self.max_searches,
                starter = %starter.handle,
                width = starter.width,
                depth = starter.depth,
                "initiating neighborhood search"
            );

            let members: Vec<AtomId> = store.incoming(starter.handle).collect();
            for candidate in members {
                explorer.explore_neighborhood(store, root, starter.term, candidate, evaluator);
            }
        }

        evaluator.has_solutions()
    }
}

impl Default for FuzzySearcher {
    fn default() -> Self {
        Self::new()
    }
}
