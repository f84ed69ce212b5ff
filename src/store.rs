//! Content-addressed hypergraph store.
//!
//! The store is the sole owner of all atoms. An atom is either a `Node`
//! (leaf, carrying a name and a type) or a `Link` (carrying an ordered
//! outgoing set of child atoms and a type). Atoms are immutable once
//! interned; all "modification" elsewhere in the crate is construction of
//! new atoms. Consumers address atoms through `AtomId` handles and never
//! duplicate atom payloads.
//!
//! Interning keys off a domain-separated content hash, so two structurally
//! identical atoms always receive the same `AtomId`. The store also
//! maintains the reverse index from each atom to the links that directly
//! contain it (the *incoming set*), which the starter selector queries for
//! its width heuristic.
//!
//! # Invariants
//! - Atom ids are dense indices into the arena; they never change or expire.
//! - The incoming index is exactly the reverse of the outgoing relation.
//! - Interning is deterministic: the same build sequence yields the same ids.
//!
//! # Citations
//! - Hypergraph theory: Berge, "Graphs and Hypergraphs" (1973)
//! - Hash consing: Filliâtre & Conchon, "Type-safe modular hash-consing" (2006)

use crate::fingerprint::HashValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Reserved character marking a node as a skolemized instance.
///
/// Nodes whose name contains this marker denote bound copies produced by an
/// upstream grounding step; they never act as search starters.
pub const INSTANCE_MARKER: char = '@';

/// Identifier of an atom type in the type hierarchy.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(u16);

impl TypeId {
    /// Creates a `TypeId` from a raw `u16`.
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw `u16` representation.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Root of the type hierarchy.
pub const ATOM: TypeId = TypeId::new(0);
/// Ancestor of all leaf atom types.
pub const NODE: TypeId = TypeId::new(1);
/// Ancestor of all composite atom types.
pub const LINK: TypeId = TypeId::new(2);
/// Ordinary named concept.
pub const CONCEPT_NODE: TypeId = TypeId::new(3);
/// Relation name used as the head of an evaluation.
pub const PREDICATE_NODE: TypeId = TypeId::new(4);
/// Pattern variable. Excluded from starter candidacy.
pub const VARIABLE_NODE: TypeId = TypeId::new(5);
/// Glob placeholder matching zero or more atoms in a declaration.
pub const GLOB_NODE: TypeId = TypeId::new(6);
/// Name of a type, used as a variable type constraint.
pub const TYPE_NODE: TypeId = TypeId::new(7);
/// Ancestor of all ordered composite types.
pub const ORDERED_LINK: TypeId = TypeId::new(8);
/// Plain ordered sequence of atoms.
pub const LIST_LINK: TypeId = TypeId::new(9);
/// Predicate application.
pub const EVALUATION_LINK: TypeId = TypeId::new(10);
/// Is-a relation between concepts.
pub const INHERITANCE_LINK: TypeId = TypeId::new(11);
/// Structurally transparent quoting wrapper (for starter traversal only).
pub const QUOTE_LINK: TypeId = TypeId::new(12);
/// Variable together with a type constraint.
pub const TYPED_VARIABLE_LINK: TypeId = TypeId::new(13);
/// Ordered list of variable declarations.
pub const VARIABLE_LIST: TypeId = TypeId::new(14);
/// Binds variables over one or more bodies.
pub const SCOPE_LINK: TypeId = TypeId::new(15);
/// Lambda abstraction; a scope whose variables can be inherited.
pub const LAMBDA_LINK: TypeId = TypeId::new(16);
/// Scope with a separate rewrite body (two scoped subterms).
pub const BIND_LINK: TypeId = TypeId::new(17);

const BUILTIN_TYPES: &[(&str, Option<TypeId>)] = &[
    ("Atom", None),
    ("Node", Some(ATOM)),
    ("Link", Some(ATOM)),
    ("ConceptNode", Some(NODE)),
    ("PredicateNode", Some(NODE)),
    ("VariableNode", Some(NODE)),
    ("GlobNode", Some(NODE)),
    ("TypeNode", Some(NODE)),
    ("OrderedLink", Some(LINK)),
    ("ListLink", Some(ORDERED_LINK)),
    ("EvaluationLink", Some(ORDERED_LINK)),
    ("InheritanceLink", Some(ORDERED_LINK)),
    ("QuoteLink", Some(ORDERED_LINK)),
    ("TypedVariableLink", Some(ORDERED_LINK)),
    ("VariableList", Some(ORDERED_LINK)),
    ("ScopeLink", Some(ORDERED_LINK)),
    ("LambdaLink", Some(SCOPE_LINK)),
    ("BindLink", Some(SCOPE_LINK)),
];

/// Single-inheritance type hierarchy for atoms.
///
/// Seeded with the built-in types above; users may register further types
/// under any existing ancestor. `is_a` answers the ancestry query the scope
/// resolver and starter selector rely on (e.g. recognizing lambda-like
/// bodies, or scope-derived link types).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRegistry {
    names: Vec<String>,
    parents: Vec<Option<TypeId>>,
}

impl TypeRegistry {
    /// Creates a registry containing exactly the built-in types.
    pub fn new() -> Self {
        let mut reg = Self {
            names: Vec::with_capacity(BUILTIN_TYPES.len()),
            parents: Vec::with_capacity(BUILTIN_TYPES.len()),
        };
        for &(name, parent) in BUILTIN_TYPES {
            reg.names.push(name.to_string());
            reg.parents.push(parent);
        }
        reg
    }

    /// Registers a new type under `parent` and returns its id.
    pub fn register(&mut self, name: &str, parent: TypeId) -> TypeId {
        let id = TypeId::new(self.names.len() as u16);
        self.names.push(name.to_string());
        self.parents.push(Some(parent));
        id
    }

    /// Returns the name of a type, if registered.
    pub fn name_of(&self, ty: TypeId) -> Option<&str> {
        self.names.get(ty.as_u16() as usize).map(String::as_str)
    }

    /// Returns whether `ty` is `ancestor` or a descendant of it.
    ///
    /// Reflexive: `is_a(t, t)` is always true for registered types.
    pub fn is_a(&self, ty: TypeId, ancestor: TypeId) -> bool {
        let mut cur = Some(ty);
        while let Some(t) = cur {
            if t == ancestor {
                return true;
            }
            cur = self.parents.get(t.as_u16() as usize).copied().flatten();
        }
        false
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether the registry is empty (never true in practice).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable handle to an atom in the store.
///
/// Equality and order are by the inner `u64`, which is a dense index into
/// the store's arena. Because atoms are interned by content hash, id
/// equality coincides with structural equality for atoms of the same store.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AtomId(u64);

impl AtomId {
    /// Creates an `AtomId` from a raw `u64`.
    ///
    /// Prefer ids returned by the store's interning constructors.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw `u64` representation.
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtomId({})", self.0)
    }
}

/// An immutable hypergraph element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Atom {
    /// Leaf atom with a name and type.
    Node {
        /// Concrete type of this node.
        ty: TypeId,
        /// Node name; an [`INSTANCE_MARKER`] inside marks a bound copy.
        name: String,
    },
    /// Composite atom with an ordered outgoing set.
    Link {
        /// Concrete type of this link.
        ty: TypeId,
        /// Ordered child atoms.
        outgoing: Vec<AtomId>,
    },
}

impl Atom {
    /// Returns the concrete type of this atom.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        match self {
            Atom::Node { ty, .. } | Atom::Link { ty, .. } => *ty,
        }
    }

    /// Returns whether this atom is a leaf node.
    #[inline]
    pub fn is_node(&self) -> bool {
        matches!(self, Atom::Node { .. })
    }
}

/// Error raised by fallible store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A link constructor referenced an id with no atom behind it.
    UnknownAtom(AtomId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UnknownAtom(id) => write!(f, "unknown atom {}", id),
        }
    }
}

impl std::error::Error for StoreError {}

/// The content-addressed hypergraph store.
///
/// Owns the atom arena, the intern table, the incoming index, and the type
/// registry. The store is treated as read-only for the duration of a match
/// query; only term construction (interning, substitution) takes `&mut`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    types: TypeRegistry,
    atoms: Vec<Atom>,
    hashes: Vec<HashValue>,
    intern: HashMap<HashValue, AtomId>,
    incoming: HashMap<AtomId, BTreeSet<AtomId>>,
    fresh_counter: u64,
}

impl Store {
    /// Creates an empty store with the built-in type hierarchy.
    pub fn new() -> Self {
        Self {
            types: TypeRegistry::new(),
            atoms: Vec::new(),
            hashes: Vec::new(),
            intern: HashMap::new(),
            incoming: HashMap::new(),
            fresh_counter: 0,
        }
    }

    /// Returns the type registry.
    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Returns the type registry mutably, for registering new types.
    #[inline]
    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// Interns a node, returning the existing id if one with the same type
    /// and name is already present.
    pub fn node(&mut self, ty: TypeId, name: &str) -> AtomId {
        let mut data = Vec::with_capacity(2 + name.len());
        data.extend_from_slice(&ty.as_u16().to_le_bytes());
        data.extend_from_slice(name.as_bytes());
        let hash = HashValue::hash_with_domain(b"NODE", &data);
        if let Some(&id) = self.intern.get(&hash) {
            return id;
        }
        let id = AtomId::new(self.atoms.len() as u64);
        self.atoms.push(Atom::Node {
            ty,
            name: name.to_string(),
        });
        self.hashes.push(hash);
        self.intern.insert(hash, id);
        id
    }

    /// Interns a link over existing atoms.
    ///
    /// Returns [`StoreError::UnknownAtom`] if any child id is not in the
    /// store.
    pub fn try_link(&mut self, ty: TypeId, outgoing: Vec<AtomId>) -> Result<AtomId, StoreError> {
        for &child in &outgoing {
            if child.as_u64() as usize >= self.atoms.len() {
                return Err(StoreError::UnknownAtom(child));
            }
        }
        Ok(self.intern_link(ty, outgoing))
    }

    /// Interns a link over existing atoms.
    ///
    /// # Panics
    /// Panics if any child id is not in the store. Use [`Store::try_link`]
    /// when the ids come from outside the crate.
    pub fn link(&mut self, ty: TypeId, outgoing: Vec<AtomId>) -> AtomId {
        assert!(
            outgoing
                .iter()
                .all(|c| (c.as_u64() as usize) < self.atoms.len()),
            "link child must be an existing atom"
        );
        self.intern_link(ty, outgoing)
    }

    /// Interning body shared by the link constructors. Children must exist.
    fn intern_link(&mut self, ty: TypeId, outgoing: Vec<AtomId>) -> AtomId {
        let mut data = Vec::with_capacity(2 + 32 * outgoing.len());
        data.extend_from_slice(&ty.as_u16().to_le_bytes());
        for &child in &outgoing {
            data.extend_from_slice(self.hashes[child.as_u64() as usize].as_bytes());
        }
        let hash = HashValue::hash_with_domain(b"LINK", &data);
        if let Some(&id) = self.intern.get(&hash) {
            return id;
        }
        let id = AtomId::new(self.atoms.len() as u64);
        for &child in &outgoing {
            self.incoming.entry(child).or_default().insert(id);
        }
        self.atoms.push(Atom::Link { ty, outgoing });
        self.hashes.push(hash);
        self.intern.insert(hash, id);
        id
    }

    /// Looks up an atom by id.
    #[inline]
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id.as_u64() as usize)
    }

    /// Returns the concrete type of an atom.
    #[inline]
    pub fn type_of(&self, id: AtomId) -> Option<TypeId> {
        self.atom(id).map(Atom::type_id)
    }

    /// Returns the name of a node; `None` for links and unknown ids.
    pub fn name_of(&self, id: AtomId) -> Option<&str> {
        match self.atom(id) {
            Some(Atom::Node { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// Returns the outgoing set of a link; `None` for nodes and unknown ids.
    pub fn outgoing(&self, id: AtomId) -> Option<&[AtomId]> {
        match self.atom(id) {
            Some(Atom::Link { outgoing, .. }) => Some(outgoing),
            _ => None,
        }
    }

    /// Returns the content hash of an atom.
    #[inline]
    pub fn content_hash(&self, id: AtomId) -> Option<HashValue> {
        self.hashes.get(id.as_u64() as usize).copied()
    }

    /// Iterates over the links that directly contain `id`, in id order.
    pub fn incoming(&self, id: AtomId) -> impl Iterator<Item = AtomId> + '_ {
        self.incoming
            .get(&id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Returns the size of the incoming set (the starter *width*) without
    /// materializing it.
    pub fn incoming_size(&self, id: AtomId) -> usize {
        self.incoming.get(&id).map_or(0, BTreeSet::len)
    }

    /// Returns the number of atoms in the store.
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Returns whether the atom is a variable node.
    pub fn is_variable(&self, id: AtomId) -> bool {
        self.type_of(id) == Some(VARIABLE_NODE)
    }

    /// Returns whether the atom is a skolemized instance node.
    pub fn is_instance(&self, id: AtomId) -> bool {
        matches!(self.atom(id), Some(Atom::Node { name, .. }) if name.contains(INSTANCE_MARKER))
    }

    /// Collects every leaf node reachable from `root`, including `root`
    /// itself if it is a node.
    ///
    /// Traversal uses an explicit worklist (shared subterms are visited
    /// once), so arbitrarily deep terms do not grow the native call stack.
    pub fn leaf_nodes(&self, root: AtomId) -> BTreeSet<AtomId> {
        let mut out = BTreeSet::new();
        let mut visited = BTreeSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            match self.atom(id) {
                Some(Atom::Node { .. }) => {
                    out.insert(id);
                }
                Some(Atom::Link { outgoing, .. }) => {
                    stack.extend(outgoing.iter().copied());
                }
                None => {}
            }
        }
        out
    }

    /// Rebuilds `term` with every atom in `map` replaced by its image.
    ///
    /// The rebuild is bottom-up through the intern table, so untouched
    /// subterms keep their ids and a no-op substitution returns `term`
    /// unchanged. Uses an explicit post-order worklist.
    ///
    /// # Panics
    /// Panics if an image in `map` is not in the store, matching
    /// [`Store::link`]: images flow into rebuilt links as children.
    pub fn substitute(&mut self, term: AtomId, map: &HashMap<AtomId, AtomId>) -> AtomId {
        assert!(
            map.values().all(|v| (v.as_u64() as usize) < self.atoms.len()),
            "substitution image must be an existing atom"
        );
        let mut memo: HashMap<AtomId, AtomId> = map.clone();
        let mut stack = vec![(term, false)];
        while let Some((id, children_done)) = stack.pop() {
            if memo.contains_key(&id) {
                continue;
            }
            match self.atom(id).cloned() {
                Some(Atom::Link { ty, outgoing }) => {
                    if children_done {
                        let rebuilt: Vec<AtomId> =
                            outgoing.iter().map(|c| memo[c]).collect();
                        let new_id = if rebuilt == outgoing {
                            id
                        } else {
                            self.intern_link(ty, rebuilt)
                        };
                        memo.insert(id, new_id);
                    } else {
                        stack.push((id, true));
                        for &child in outgoing.iter().rev() {
                            if !memo.contains_key(&child) {
                                stack.push((child, false));
                            }
                        }
                    }
                }
                _ => {
                    // Nodes not in the map stay themselves.
                    memo.insert(id, id);
                }
            }
        }
        memo[&term]
    }

    /// Produces a fresh, store-unique name derived from `base`.
    ///
    /// The returned name carries the [`INSTANCE_MARKER`] plus a counter, so
    /// freshly generated atoms never collide with user-named ones.
    pub fn fresh_name(&mut self, base: &str) -> String {
        self.fresh_counter += 1;
        format!("{}{}{}", base, INSTANCE_MARKER, self.fresh_counter)
    }

    /// Serializes the store to CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let bytes = serde_cbor::to_vec(self)?;
        Ok(bytes)
    }

    /// Deserializes a store from CBOR bytes.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        let store: Self = serde_cbor::from_slice(bytes)?;
        Ok(store)
    }

    /// Saves the store to a file in CBOR format.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        let bytes = self.to_cbor()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a store from a CBOR file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = std::fs::read(path)?;
        Self::from_cbor(&bytes)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedupes_nodes_and_links() {
        let mut store = Store::new();
        let a1 = store.node(CONCEPT_NODE, "cat");
        let a2 = store.node(CONCEPT_NODE, "cat");
        assert_eq!(a1, a2);
        assert_eq!(store.atom_count(), 1);

        let b = store.node(CONCEPT_NODE, "animal");
        let l1 = store.link(INHERITANCE_LINK, vec![a1, b]);
        let l2 = store.link(INHERITANCE_LINK, vec![a2, b]);
        assert_eq!(l1, l2);
        // Different order is a different link.
        let l3 = store.link(INHERITANCE_LINK, vec![b, a1]);
        assert_ne!(l1, l3);
    }

    #[test]
    fn incoming_index_reverses_outgoing() {
        let mut store = Store::new();
        let cat = store.node(CONCEPT_NODE, "cat");
        let animal = store.node(CONCEPT_NODE, "animal");
        let pet = store.node(CONCEPT_NODE, "pet");
        let l1 = store.link(INHERITANCE_LINK, vec![cat, animal]);
        let l2 = store.link(INHERITANCE_LINK, vec![cat, pet]);

        let inc: Vec<AtomId> = store.incoming(cat).collect();
        assert_eq!(inc.len(), 2);
        assert!(inc.contains(&l1));
        assert!(inc.contains(&l2));
        assert_eq!(store.incoming_size(cat), 2);
        assert_eq!(store.incoming_size(animal), 1);
        assert_eq!(store.incoming_size(l1), 0);
    }

    #[test]
    fn is_a_reflexive_and_transitive() {
        let store = Store::new();
        let types = store.types();
        assert!(types.is_a(CONCEPT_NODE, CONCEPT_NODE));
        assert!(types.is_a(CONCEPT_NODE, NODE));
        assert!(types.is_a(CONCEPT_NODE, ATOM));
        assert!(types.is_a(LAMBDA_LINK, SCOPE_LINK));
        assert!(types.is_a(BIND_LINK, SCOPE_LINK));
        assert!(types.is_a(SCOPE_LINK, LINK));
        assert!(!types.is_a(NODE, LINK));
        assert!(!types.is_a(SCOPE_LINK, LAMBDA_LINK));
    }

    #[test]
    fn registered_types_extend_the_hierarchy() {
        let mut store = Store::new();
        let word = store.types_mut().register("WordNode", NODE);
        assert!(store.types().is_a(word, NODE));
        assert!(store.types().is_a(word, ATOM));
        assert_eq!(store.types().name_of(word), Some("WordNode"));
    }

    #[test]
    fn variable_and_instance_predicates() {
        let mut store = Store::new();
        let v = store.node(VARIABLE_NODE, "$x");
        let inst = store.node(CONCEPT_NODE, "cat@123");
        let plain = store.node(CONCEPT_NODE, "cat");
        assert!(store.is_variable(v));
        assert!(!store.is_variable(inst));
        assert!(store.is_instance(inst));
        assert!(!store.is_instance(plain));
    }

    #[test]
    fn leaf_nodes_visits_shared_subterms_once() {
        let mut store = Store::new();
        let cat = store.node(CONCEPT_NODE, "cat");
        let animal = store.node(CONCEPT_NODE, "animal");
        let inh = store.link(INHERITANCE_LINK, vec![cat, animal]);
        // The same node appears through two paths.
        let list = store.link(LIST_LINK, vec![inh, cat]);

        let leaves = store.leaf_nodes(list);
        assert_eq!(leaves.len(), 2);
        assert!(leaves.contains(&cat));
        assert!(leaves.contains(&animal));

        // A bare node is its own leaf set.
        assert_eq!(store.leaf_nodes(cat).len(), 1);
    }

    #[test]
    fn substitute_rebuilds_only_affected_spine() {
        let mut store = Store::new();
        let x = store.node(VARIABLE_NODE, "$x");
        let cat = store.node(CONCEPT_NODE, "cat");
        let animal = store.node(CONCEPT_NODE, "animal");
        let untouched = store.link(INHERITANCE_LINK, vec![cat, animal]);
        let body = store.link(LIST_LINK, vec![untouched, x]);

        let mut map = HashMap::new();
        map.insert(x, cat);
        let rebuilt = store.substitute(body, &map);
        assert_ne!(rebuilt, body);
        let out = store.outgoing(rebuilt).unwrap().to_vec();
        // The untouched subterm keeps its id.
        assert_eq!(out, vec![untouched, cat]);

        // Empty substitution is the identity.
        let same = store.substitute(body, &HashMap::new());
        assert_eq!(same, body);
    }

    #[test]
    #[should_panic(expected = "substitution image must be an existing atom")]
    fn substitute_rejects_unknown_images() {
        let mut store = Store::new();
        let x = store.node(VARIABLE_NODE, "$x");
        let body = store.link(LIST_LINK, vec![x]);
        let mut map = HashMap::new();
        map.insert(x, AtomId::new(999));
        store.substitute(body, &map);
    }

    #[test]
    fn try_link_rejects_unknown_children() {
        let mut store = Store::new();
        let cat = store.node(CONCEPT_NODE, "cat");
        let bogus = AtomId::new(999);
        let err = store.try_link(LIST_LINK, vec![cat, bogus]).unwrap_err();
        assert_eq!(err, StoreError::UnknownAtom(bogus));
    }

    #[test]
    fn cbor_roundtrip_preserves_atoms() {
        let mut store = Store::new();
        let cat = store.node(CONCEPT_NODE, "cat");
        let animal = store.node(CONCEPT_NODE, "animal");
        let inh = store.link(INHERITANCE_LINK, vec![cat, animal]);

        let bytes = store.to_cbor().expect("serialization should succeed");
        let decoded = Store::from_cbor(&bytes).expect("deserialization should succeed");
        assert_eq!(decoded.atom_count(), store.atom_count());
        assert_eq!(decoded.name_of(cat), Some("cat"));
        assert_eq!(decoded.outgoing(inh), Some(&[cat, animal][..]));
        assert_eq!(decoded.incoming_size(cat), 1);
        assert_eq!(decoded.content_hash(inh), store.content_hash(inh));
    }

    #[test]
    fn fresh_names_never_collide() {
        let mut store = Store::new();
        let a = store.fresh_name("$x");
        let b = store.fresh_name("$x");
        assert_ne!(a, b);
        assert!(a.contains(INSTANCE_MARKER));
    }
}
