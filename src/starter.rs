//! Starter selection for fuzzy search.
//!
//! A *starter* is a heuristically chosen anchor node used to seed a
//! neighborhood search. Starters are derived data, recomputed per query, and
//! never persisted.
//!
//! The selection heuristic: nodes with a **small** incoming-set width are
//! rarer and therefore more selective, pruning the search fastest; among
//! equally selective starters, **greater** depth wins, because deep nodes
//! are more syntactically specific within their clause.
//!
//! # Citations
//! - Selectivity-ordered search: Ullmann, "An algorithm for subgraph isomorphism" (1976)
//! - Candidate anchoring: Messmer & Bunke, "Efficient subgraph isomorphism detection" (1998)

use crate::store::{AtomId, Atom, Store, QUOTE_LINK};

/// A candidate anchor for one neighborhood search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Starter {
    /// Identity used for deduplication.
    pub uuid: AtomId,
    /// The anchor node itself.
    pub handle: AtomId,
    /// The link directly enclosing the anchor; `None` when the anchor is a
    /// clause root.
    pub term: Option<AtomId>,
    /// Index of the clause the anchor was found in.
    pub clause_idx: usize,
    /// Live incoming-set size of the anchor at selection time.
    pub width: usize,
    /// Nesting depth of the anchor within its clause.
    pub depth: usize,
}

/// Node tallies accumulated while walking a pattern.
///
/// `nodes` counts every leaf node encountered, variables and instances
/// included; `variables` counts only variable nodes. The match evaluator
/// uses `nodes` as the pattern's total size when scoring candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternCounts {
    /// Total leaf nodes in the pattern.
    pub nodes: usize,
    /// Leaf nodes typed as variables.
    pub variables: usize,
}

/// Walks one clause collecting starter candidates into `out`.
///
/// Traversal is an explicit worklist (preorder, left to right), so deep
/// patterns do not grow the native call stack. For a link, each child is
/// visited at depth + 1 with the link as the new enclosing term. A child of
/// type [`QUOTE_LINK`] is structurally transparent here: traversal descends
/// directly into its sole child instead, keeping the quoting link's parent
/// as the enclosing term. Quoting is unwrapped nowhere else in the crate.
///
/// A node is counted toward `counts.nodes` unconditionally; it becomes a
/// starter candidate unless it is a variable (counted in `counts.variables`
/// instead) or an instance. Width is a live snapshot of the node's incoming
/// set, not a cached value.
pub fn find_starters(
    store: &Store,
    clause: AtomId,
    clause_idx: usize,
    out: &mut Vec<Starter>,
    counts: &mut PatternCounts,
) {
    // (atom, depth, enclosing term)
    let mut stack: Vec<(AtomId, usize, Option<AtomId>)> = vec![(clause, 0, None)];
    while let Some((id, depth, term)) = stack.pop() {
        match store.atom(id) {
            Some(Atom::Link { outgoing, .. }) => {
                for &child in outgoing.iter().rev() {
                    // Blow past quoting wrappers.
                    let target = if store.type_of(child) == Some(QUOTE_LINK) {
                        match store.outgoing(child).and_then(|o| o.first()) {
                            Some(&inner) => inner,
                            None => continue,
                        }
                    } else {
                        child
                    };
                    stack.push((target, depth + 1, Some(id)));
                }
            }
            Some(Atom::Node { .. }) => {
                counts.nodes += 1;
                if store.is_variable(id) {
                    counts.variables += 1;
                } else if !store.is_instance(id) {
                    out.push(Starter {
                        uuid: id,
                        handle: id,
                        term,
                        clause_idx,
                        width: store.incoming_size(id),
                        depth,
                    });
                }
            }
            None => {}
        }
    }
}

/// Removes duplicate starters.
///
/// Stable-sorts by uuid and collapses adjacent equal uuids, keeping the
/// first discovery. The uuid sort also establishes a canonical order before
/// ranking, so the final ranking is deterministic for equal-rank starters
/// regardless of discovery order.
pub fn dedup_starters(starters: &mut Vec<Starter>) {
    starters.sort_by_key(|s| s.uuid);
    starters.dedup_by_key(|s| s.uuid);
}

/// Sorts starters by the selection heuristic: width ascending, then depth
/// descending.
pub fn rank_starters(starters: &mut [Starter]) {
    starters.sort_by(|a, b| a.width.cmp(&b.width).then(b.depth.cmp(&a.depth)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{
        CONCEPT_NODE, EVALUATION_LINK, INHERITANCE_LINK, LIST_LINK, PREDICATE_NODE, VARIABLE_NODE,
    };
    use proptest::prelude::*;

    fn starter(uuid: u64, width: usize, depth: usize) -> Starter {
        Starter {
            uuid: AtomId::new(uuid),
            handle: AtomId::new(uuid),
            term: None,
            clause_idx: 0,
            width,
            depth,
        }
    }

    #[test]
    fn variables_and_instances_are_excluded() {
        let mut store = Store::new();
        let var = store.node(VARIABLE_NODE, "$x");
        let inst = store.node(CONCEPT_NODE, "cat@a1b2");
        let cat = store.node(CONCEPT_NODE, "cat");
        let clause = store.link(LIST_LINK, vec![var, inst, cat]);

        let mut out = Vec::new();
        let mut counts = PatternCounts::default();
        find_starters(&store, clause, 0, &mut out, &mut counts);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].handle, cat);
        // All three leaves count toward the total; only the variable counts
        // as a variable.
        assert_eq!(counts.nodes, 3);
        assert_eq!(counts.variables, 1);
    }

    #[test]
    fn depth_and_term_track_nesting() {
        let mut store = Store::new();
        let pred = store.node(PREDICATE_NODE, "eats");
        let cat = store.node(CONCEPT_NODE, "cat");
        let fish = store.node(CONCEPT_NODE, "fish");
        let args = store.link(LIST_LINK, vec![cat, fish]);
        let clause = store.link(EVALUATION_LINK, vec![pred, args]);

        let mut out = Vec::new();
        let mut counts = PatternCounts::default();
        find_starters(&store, clause, 3, &mut out, &mut counts);

        assert_eq!(out.len(), 3);
        let by_handle = |h: AtomId| out.iter().find(|s| s.handle == h).unwrap();
        assert_eq!(by_handle(pred).depth, 1);
        assert_eq!(by_handle(pred).term, Some(clause));
        assert_eq!(by_handle(cat).depth, 2);
        assert_eq!(by_handle(cat).term, Some(args));
        assert_eq!(by_handle(fish).clause_idx, 3);
    }

    #[test]
    fn bare_node_clause_has_no_enclosing_term() {
        let mut store = Store::new();
        let cat = store.node(CONCEPT_NODE, "cat");
        let mut out = Vec::new();
        let mut counts = PatternCounts::default();
        find_starters(&store, cat, 0, &mut out, &mut counts);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].term, None);
        assert_eq!(out[0].depth, 0);
    }

    #[test]
    fn quote_links_are_transparent() {
        let mut store = Store::new();
        let cat = store.node(CONCEPT_NODE, "cat");
        let animal = store.node(CONCEPT_NODE, "animal");
        let quoted = store.link(QUOTE_LINK, vec![cat]);
        let clause = store.link(INHERITANCE_LINK, vec![quoted, animal]);

        let mut out = Vec::new();
        let mut counts = PatternCounts::default();
        find_starters(&store, clause, 0, &mut out, &mut counts);

        let s = out.iter().find(|s| s.handle == cat).unwrap();
        // Same depth as an unquoted sibling; the enclosing term is the
        // parent of the quote, not the quote itself.
        assert_eq!(s.depth, 1);
        assert_eq!(s.term, Some(clause));
        assert_eq!(counts.nodes, 2);
    }

    #[test]
    fn width_is_a_live_snapshot() {
        let mut store = Store::new();
        let cat = store.node(CONCEPT_NODE, "cat");
        let animal = store.node(CONCEPT_NODE, "animal");
        let clause = store.link(INHERITANCE_LINK, vec![cat, animal]);

        let mut out = Vec::new();
        let mut counts = PatternCounts::default();
        find_starters(&store, clause, 0, &mut out, &mut counts);
        let w0 = out.iter().find(|s| s.handle == cat).unwrap().width;

        // Grow the incoming set, re-select: width must follow.
        let pet = store.node(CONCEPT_NODE, "pet");
        store.link(INHERITANCE_LINK, vec![cat, pet]);
        let mut out2 = Vec::new();
        let mut counts2 = PatternCounts::default();
        find_starters(&store, clause, 0, &mut out2, &mut counts2);
        let w1 = out2.iter().find(|s| s.handle == cat).unwrap().width;
        assert_eq!(w1, w0 + 1);
    }

    #[test]
    fn dedup_keeps_one_per_uuid() {
        let mut starters = vec![
            starter(3, 5, 1),
            starter(1, 2, 0),
            starter(3, 5, 2),
            starter(1, 2, 4),
            starter(2, 9, 0),
        ];
        dedup_starters(&mut starters);
        let uuids: Vec<u64> = starters.iter().map(|s| s.uuid.as_u64()).collect();
        assert_eq!(uuids, vec![1, 2, 3]);
        // Stable sort keeps the first-discovered entry for each uuid.
        assert_eq!(starters[0].depth, 0);
        assert_eq!(starters[2].depth, 1);
    }

    #[test]
    fn ranking_prefers_narrow_then_deep() {
        let mut starters = vec![
            starter(1, 4, 0),
            starter(2, 1, 1),
            starter(3, 1, 5),
            starter(4, 2, 9),
        ];
        rank_starters(&mut starters);
        let order: Vec<u64> = starters.iter().map(|s| s.uuid.as_u64()).collect();
        // Equal width 1: depth 5 before depth 1; width 2 and 4 follow.
        assert_eq!(order, vec![3, 2, 4, 1]);
    }

    proptest! {
        #[test]
        fn dedup_yields_strictly_increasing_uuids(
            entries in prop::collection::vec((0u64..40, 0usize..8, 0usize..8), 0..60)
        ) {
            let mut starters: Vec<Starter> = entries
                .iter()
                .map(|&(u, w, d)| starter(u, w, d))
                .collect();
            dedup_starters(&mut starters);
            for pair in starters.windows(2) {
                prop_assert!(pair[0].uuid < pair[1].uuid);
            }
        }

        #[test]
        fn ranking_is_consistent_with_width_then_depth(
            entries in prop::collection::vec((0u64..40, 0usize..8, 0usize..8), 0..60)
        ) {
            let mut starters: Vec<Starter> = entries
                .iter()
                .map(|&(u, w, d)| starter(u, w, d))
                .collect();
            dedup_starters(&mut starters);
            rank_starters(&mut starters);
            for pair in starters.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.width < b.width || (a.width == b.width && a.depth >= b.depth));
            }
        }
    }
}
