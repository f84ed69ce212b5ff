//! Pareidolia: approximate subgraph pattern matching over a shared,
//! content-addressed hypergraph.
//!
//! This crate solves: "given a query pattern that may contain unbound
//! variables, find the best-matching subgraph(s) in a large knowledge
//! hypergraph when no exact match exists, ranked by a similarity heuristic,
//! while correctly recognizing that two differently-named variable bindings
//! denote the same logical scope." It provides:
//! - A content-addressed atom store with an interned arena, an incoming
//!   (reverse-reference) index, and a single-inheritance type hierarchy.
//! - Heuristic starter selection, reducing the search space to the rarest,
//!   most specific anchor nodes of a pattern.
//! - A budgeted search driver delegating neighborhood exploration to a
//!   pluggable exact matcher.
//! - A match evaluator scoring candidates by shared vocabulary and size
//!   mismatch, with exact tie semantics.
//! - A scope resolver comparing variable-binding terms up to renaming
//!   (alpha-equivalence), with systematic bound-variable renaming.
//!
//! # Name Origin: "Pareidolia"
//!
//! Pareidolia is the human tendency to perceive familiar patterns in noisy
//! stimuli — faces in clouds, figures in rock. In this context, Pareidolia
//! refers to a matcher that finds the structures *closest* to a query in a
//! graph that contains no exact occurrence of it: a best-effort, ranked
//! perception of a pattern that is not literally there.
//!
//! # Guarantees and Non-guarantees
//!
//! The search is best-effort under a fixed budget: it is not a general
//! graph-isomorphism solver and does not promise global optimality. A
//! `false` result from the driver is a control-flow value ("try another
//! strategy"), never an error. Results are not cached across queries.
//!
//! # Citations
//!
//! - Subgraph isomorphism: Ullmann, "An algorithm for subgraph isomorphism" (1976)
//! - Inexact graph matching: Bunke, "Error correcting graph matching: on the
//!   influence of the underlying cost function" (1999)
//! - Alpha-conversion: Barendregt, "The Lambda Calculus" (1984)
//!
//! # Example
//!
//! ```
//! use pareidolia::prelude::*;
//!
//! let mut store = Store::new();
//! let cat = store.node(CONCEPT_NODE, "cat");
//! let animal = store.node(CONCEPT_NODE, "animal");
//! let query = store.link(INHERITANCE_LINK, vec![cat, animal]);
//!
//! // A near-miss candidate in the graph.
//! let pet = store.node(CONCEPT_NODE, "pet");
//! store.link(INHERITANCE_LINK, vec![cat, pet]);
//!
//! let mut pattern = Pattern::new();
//! pattern.add_clause(query);
//!
//! let mut evaluator = MatchEvaluator::new();
//! let found = FuzzySearcher::new().initiate_search(
//!     &store,
//!     &pattern,
//!     &mut RootReportExplorer,
//!     &mut evaluator,
//! );
//! assert!(found);
//! assert!(!evaluator.solutions().is_empty());
//! ```

pub mod evaluate;
pub mod fingerprint;
pub mod pattern;
pub mod scope;
pub mod search;
pub mod starter;
pub mod store;

pub use evaluate::MatchEvaluator;
pub use fingerprint::HashValue;
pub use pattern::Pattern;
pub use scope::{ScopeError, ScopedTerm, VariableList, VariableSpec};
pub use search::{
    FuzzySearcher, NeighborhoodExplorer, RootReportExplorer, DEFAULT_MAX_SEARCHES,
};
pub use starter::{dedup_starters, find_starters, rank_starters, PatternCounts, Starter};
pub use store::{Atom, AtomId, Store, StoreError, TypeId, TypeRegistry, INSTANCE_MARKER};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::evaluate::MatchEvaluator;
    pub use crate::fingerprint::HashValue;
    pub use crate::pattern::Pattern;
    pub use crate::scope::{ScopeError, ScopedTerm, VariableList, VariableSpec};
    pub use crate::search::{
        FuzzySearcher, NeighborhoodExplorer, RootReportExplorer, DEFAULT_MAX_SEARCHES,
    };
    pub use crate::starter::{PatternCounts, Starter};
    pub use crate::store::{
        Atom, AtomId, Store, StoreError, TypeId, TypeRegistry, ATOM, BIND_LINK, CONCEPT_NODE,
        EVALUATION_LINK, GLOB_NODE, INHERITANCE_LINK, INSTANCE_MARKER, LAMBDA_LINK, LINK,
        LIST_LINK, NODE, ORDERED_LINK, PREDICATE_NODE, QUOTE_LINK, SCOPE_LINK, TYPED_VARIABLE_LINK,
        TYPE_NODE, VARIABLE_LIST, VARIABLE_NODE,
    };
}
