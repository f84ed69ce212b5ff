//! Scoped terms and alpha-equivalence.
//!
//! A scoped term is a link binding one or more variables over one or more
//! bodies (quantification). Two scoped terms that differ only in the names
//! of their bound variables denote the same logical scope; this module
//! recognizes that by comparing terms under a substitution aligning one
//! term's variables with the other's.
//!
//! Construction follows the declaration rules of the scope family:
//! an explicit declaration head (a variable, a typed-variable wrapper, a
//! variable list, or a glob) followed by the bodies; or, absent a
//! declaration, a body whose variables are either inherited from a
//! lambda-like body or collected as its free variables.
//!
//! # Citations
//! - Alpha-conversion: Barendregt, "The Lambda Calculus", Chapter 2 (1984)
//! - Nameless representations (context): de Bruijn, "Lambda calculus notation with nameless dummies" (1972)

use crate::store::{
    Atom, AtomId, Store, TypeId, GLOB_NODE, LAMBDA_LINK, SCOPE_LINK, TYPED_VARIABLE_LINK,
    VARIABLE_LIST, VARIABLE_NODE,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Error raised while constructing or converting scoped terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The outgoing set is empty, or a declaration-typed head has no body.
    MalformedScope(String),
    /// A scope-derived structure was built from an incompatible type.
    TypeMismatch {
        /// Type family that was expected.
        expected: String,
        /// Concrete type that was found.
        actual: String,
    },
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::MalformedScope(msg) => write!(f, "malformed scope: {}", msg),
            ScopeError::TypeMismatch { expected, actual } => {
                write!(f, "expected a {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for ScopeError {}

/// One declared variable, optionally with a type constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    /// The variable (or glob) node.
    pub var: AtomId,
    /// Optional type constraint atom.
    pub type_constraint: Option<AtomId>,
}

/// Ordered list of declared variables.
///
/// Order matters for substitution (variables align positionally across two
/// scopes being compared); equality does not inspect variable names, only
/// the count and the multiset of type constraints. Names are exactly what
/// alpha-equivalence abstracts over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableList {
    specs: Vec<VariableSpec>,
}

impl VariableList {
    /// Parses a declaration atom into a variable list.
    ///
    /// Accepts a lone [`VARIABLE_NODE`] or [`GLOB_NODE`], a
    /// [`TYPED_VARIABLE_LINK`] of `[variable, type]`, or a
    /// [`VARIABLE_LIST`] of those.
    pub fn from_declaration(store: &Store, decl: AtomId) -> Result<Self, ScopeError> {
        let mut specs = Vec::new();
        match store.type_of(decl) {
            Some(VARIABLE_LIST) => {
                let members = store
                    .outgoing(decl)
                    .map(<[AtomId]>::to_vec)
                    .unwrap_or_default();
                for member in members {
                    specs.push(Self::parse_single(store, member)?);
                }
            }
            Some(_) => specs.push(Self::parse_single(store, decl)?),
            None => {
                return Err(ScopeError::MalformedScope(format!(
                    "declaration references unknown atom {}",
                    decl
                )))
            }
        }
        Ok(Self { specs })
    }

    fn parse_single(store: &Store, atom: AtomId) -> Result<VariableSpec, ScopeError> {
        match store.type_of(atom) {
            Some(VARIABLE_NODE) | Some(GLOB_NODE) => Ok(VariableSpec {
                var: atom,
                type_constraint: None,
            }),
            Some(TYPED_VARIABLE_LINK) => {
                let out = store.outgoing(atom).unwrap_or(&[]);
                match out {
                    [var, constraint]
                        if matches!(
                            store.type_of(*var),
                            Some(VARIABLE_NODE) | Some(GLOB_NODE)
                        ) =>
                    {
                        Ok(VariableSpec {
                            var: *var,
                            type_constraint: Some(*constraint),
                        })
                    }
                    _ => Err(ScopeError::MalformedScope(
                        "typed variable must wrap [variable, type]".to_string(),
                    )),
                }
            }
            _ => Err(ScopeError::MalformedScope(format!(
                "{} is not a variable declaration",
                atom
            ))),
        }
    }

    /// Collects the free variables of `term`, in first-occurrence order.
    ///
    /// Variables bound by a nested scope inside `term` are not free.
    pub fn free_in(store: &Store, term: AtomId) -> Self {
        let mut specs = Vec::new();
        let mut seen = HashSet::new();
        collect_free(store, term, &mut seen, &mut specs);
        Self { specs }
    }

    /// Returns the number of declared variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns whether no variables are declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Iterates over the declared variable atoms, in declaration order.
    pub fn vars(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.specs.iter().map(|s| s.var)
    }

    /// Returns the declared specs.
    #[inline]
    pub fn specs(&self) -> &[VariableSpec] {
        &self.specs
    }

    /// Compares two lists as variable sets: same count, same multiset of
    /// type constraints. Variable names are ignored.
    ///
    /// Constraints are interned atoms, so comparing their ids compares their
    /// structure.
    pub fn is_equal(&self, other: &Self) -> bool {
        if self.specs.len() != other.specs.len() {
            return false;
        }
        let mut a: Vec<Option<AtomId>> = self.specs.iter().map(|s| s.type_constraint).collect();
        let mut b: Vec<Option<AtomId>> = other.specs.iter().map(|s| s.type_constraint).collect();
        a.sort();
        b.sort();
        a == b
    }
}

fn is_declaration_type(ty: Option<TypeId>) -> bool {
    matches!(
        ty,
        Some(VARIABLE_LIST) | Some(VARIABLE_NODE) | Some(TYPED_VARIABLE_LINK) | Some(GLOB_NODE)
    )
}

/// Free-variable collection over an explicit worklist, in first-occurrence
/// preorder. Bound-variable sets form a chain of frames, one per nested
/// scope with an explicit declaration along the path from the root;
/// `usize::MAX` marks the empty chain.
fn collect_free(
    store: &Store,
    root: AtomId,
    seen: &mut HashSet<AtomId>,
    out: &mut Vec<VariableSpec>,
) {
    fn is_bound(frames: &[(usize, Vec<AtomId>)], mut frame: usize, var: AtomId) -> bool {
        while frame != usize::MAX {
            let (parent, vars) = &frames[frame];
            if vars.contains(&var) {
                return true;
            }
            frame = *parent;
        }
        false
    }

    let mut frames: Vec<(usize, Vec<AtomId>)> = Vec::new();
    let mut stack: Vec<(AtomId, usize)> = vec![(root, usize::MAX)];
    while let Some((id, frame)) = stack.pop() {
        match store.atom(id) {
            Some(Atom::Node { .. }) => {
                if store.is_variable(id) && !is_bound(&frames, frame, id) && seen.insert(id) {
                    out.push(VariableSpec {
                        var: id,
                        type_constraint: None,
                    });
                }
            }
            Some(Atom::Link { ty, outgoing }) => {
                // A nested scope with an explicit declaration binds its own
                // variables within its bodies.
                if store.types().is_a(*ty, SCOPE_LINK)
                    && !outgoing.is_empty()
                    && is_declaration_type(store.type_of(outgoing[0]))
                {
                    if let Ok(inner) = VariableList::from_declaration(store, outgoing[0]) {
                        frames.push((frame, inner.vars().collect()));
                        let inner_frame = frames.len() - 1;
                        for &body in outgoing[1..].iter().rev() {
                            stack.push((body, inner_frame));
                        }
                        continue;
                    }
                }
                for &child in outgoing.iter().rev() {
                    stack.push((child, frame));
                }
            }
            None => {}
        }
    }
}

/// A link binding variables over one or more scoped bodies.
///
/// Holds the declaration (when explicit), the parsed variable list, and the
/// principal body. The scoped subterms used for comparison are the link's
/// outgoing atoms past the declaration, so scope-derived kinds with several
/// bodies (rewrite rules and the like) compare over all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedTerm {
    link: AtomId,
    ty: TypeId,
    vardecl: Option<AtomId>,
    variables: VariableList,
    body: AtomId,
}

impl ScopedTerm {
    /// Extracts a scoped term from a link's outgoing set.
    ///
    /// If the first child is not a recognized declaration form, there is no
    /// explicit declaration: the first child is the body, and its variable
    /// list is inherited from a lambda-like body or computed as its free
    /// variables. Otherwise the first child is the declaration and the rest
    /// are the bodies.
    ///
    /// # Errors
    /// [`ScopeError::TypeMismatch`] when `link` is not a scope-derived link;
    /// [`ScopeError::MalformedScope`] when the outgoing set is empty, or a
    /// declaration-typed head has no following body.
    pub fn extract(store: &Store, link: AtomId) -> Result<Self, ScopeError> {
        let type_name = |ty: Option<TypeId>| -> String {
            ty.and_then(|t| store.types().name_of(t))
                .unwrap_or("<unknown>")
                .to_string()
        };

        let ty = match store.atom(link) {
            Some(Atom::Link { ty, .. }) => *ty,
            Some(Atom::Node { ty, .. }) => {
                return Err(ScopeError::TypeMismatch {
                    expected: "ScopeLink".to_string(),
                    actual: type_name(Some(*ty)),
                })
            }
            None => {
                return Err(ScopeError::MalformedScope(format!(
                    "unknown atom {}",
                    link
                )))
            }
        };
        if !store.types().is_a(ty, SCOPE_LINK) {
            return Err(ScopeError::TypeMismatch {
                expected: "ScopeLink".to_string(),
                actual: type_name(Some(ty)),
            });
        }

        let outgoing = store
            .outgoing(link)
            .map(<[AtomId]>::to_vec)
            .unwrap_or_default();
        if outgoing.is_empty() {
            return Err(ScopeError::MalformedScope(
                "expecting a non-empty outgoing set".to_string(),
            ));
        }

        let head = outgoing[0];
        if !is_declaration_type(store.type_of(head)) {
            // No explicit declaration. Either the body is a lambda whose
            // variables we inherit, or we collect the free variables.
            let body_ty = store.type_of(head);
            if body_ty.is_some_and(|t| store.types().is_a(t, LAMBDA_LINK)) {
                let lambda = ScopedTerm::extract(store, head)?;
                return Ok(Self {
                    link,
                    ty,
                    vardecl: None,
                    variables: lambda.variables,
                    body: lambda.body,
                });
            }
            return Ok(Self {
                link,
                ty,
                vardecl: None,
                variables: VariableList::free_in(store, head),
                body: head,
            });
        }

        if outgoing.len() < 2 {
            return Err(ScopeError::MalformedScope(
                "expecting an outgoing set size of at least two".to_string(),
            ));
        }
        Ok(Self {
            link,
            ty,
            vardecl: Some(head),
            variables: VariableList::from_declaration(store, head)?,
            body: outgoing[1],
        })
    }

    /// Returns the underlying link.
    #[inline]
    pub fn link(&self) -> AtomId {
        self.link
    }

    /// Returns the concrete type of the underlying link.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty
    }

    /// Returns the explicit declaration atom, if present.
    #[inline]
    pub fn vardecl(&self) -> Option<AtomId> {
        self.vardecl
    }

    /// Returns the declared (or inferred) variable list.
    #[inline]
    pub fn variables(&self) -> &VariableList {
        &self.variables
    }

    /// Returns the principal body.
    #[inline]
    pub fn body(&self) -> AtomId {
        self.body
    }

    /// Returns the scoped subterms: the outgoing set past the declaration.
    pub fn scoped_subterms<'s>(&self, store: &'s Store) -> &'s [AtomId] {
        let offset = usize::from(self.vardecl.is_some());
        store
            .outgoing(self.link)
            .map_or(&[], |out| &out[offset..])
    }

    /// Compares two scoped terms for equality up to renaming of their bound
    /// variables.
    ///
    /// The concrete types must be equal, the scoped-subterm arities must
    /// match (checked before the variable lists), the variable lists must be
    /// equal as sets with matching type constraints, and each aligned pair
    /// of scoped subterms must be structurally equal once the other term's
    /// variables are substituted by this term's variables in declaration
    /// order. The substitution is a bijective renaming whenever the
    /// variable-list check passes, and the walk rejects capture of a free
    /// variable by a bound one, which together make the comparison
    /// symmetric; the tests probe both directions.
    pub fn is_equal(&self, other: &ScopedTerm, store: &Store) -> bool {
        if self.link == other.link {
            return true;
        }
        if self.ty != other.ty {
            return false;
        }

        // Arity guard: scope-derived kinds may carry several scoped
        // subterms; compare counts before looking at variables.
        let ours = self.scoped_subterms(store);
        let theirs = other.scoped_subterms(store);
        if ours.len() != theirs.len() {
            return false;
        }

        if !self.variables.is_equal(&other.variables) {
            return false;
        }
        if self.variables.len() != other.variables.len() {
            return false;
        }

        // Rename other's variables to ours, in declaration order.
        let renaming: HashMap<AtomId, AtomId> = other
            .variables
            .vars()
            .zip(self.variables.vars())
            .collect();

        ours.iter()
            .zip(theirs)
            .all(|(&a, &b)| eq_under_renaming(store, a, b, &renaming))
    }

    /// Produces a fresh copy of this scope with systematically renamed bound
    /// variables.
    ///
    /// Every declared variable is replaced by a freshly named variable of
    /// the same type throughout the declaration and the bodies, and the
    /// rebuilt link is interned. The result is alpha-equivalent to the
    /// original and shares no bound variable with it.
    pub fn alpha_conversion(&self, store: &mut Store) -> AtomId {
        let mut renaming = HashMap::new();
        for spec in self.variables.specs() {
            let base = store.name_of(spec.var).unwrap_or("$v").to_string();
            let fresh = store.fresh_name(&base);
            let ty = store.type_of(spec.var).unwrap_or(VARIABLE_NODE);
            let new_var = store.node(ty, &fresh);
            renaming.insert(spec.var, new_var);
        }
        let outgoing = store
            .outgoing(self.link)
            .map(<[AtomId]>::to_vec)
            .unwrap_or_default();
        let rebuilt: Vec<AtomId> = outgoing
            .into_iter()
            .map(|member| store.substitute(member, &renaming))
            .collect();
        store.link(self.ty, rebuilt)
    }
}

/// Structural equality of `a` and `b` with `renaming` applied to `b`.
///
/// Fused substitute-then-compare: walks both terms in lockstep with an
/// explicit worklist instead of materializing the substitution in the
/// store. On top of plain substitution it rejects capture: a free variable
/// of `b` never matches a bound variable of `a`, which keeps the comparison
/// symmetric.
fn eq_under_renaming(
    store: &Store,
    a: AtomId,
    b: AtomId,
    renaming: &HashMap<AtomId, AtomId>,
) -> bool {
    // Bound variables on the renamed-to side. A free variable of `b` that
    // coincides with one of these is a capture, not a match.
    let images: HashSet<AtomId> = renaming.values().copied().collect();
    let mut stack = vec![(a, b)];
    while let Some((x, y)) = stack.pop() {
        if let Some(&mapped) = renaming.get(&y) {
            if x != mapped {
                return false;
            }
            continue;
        }
        // No id-equality shortcut before descending: an id-identical pair
        // can still hold a renamed variable free inside, and the renaming
        // must reach it. Node pairs compare by id below, once the renaming
        // check has ruled the node out.
        match (store.atom(x), store.atom(y)) {
            (Some(Atom::Node { .. }), Some(Atom::Node { .. })) => {
                // Interned: id equality is structural equality. `y` is free
                // here, so it must not land on a bound variable of `a`.
                if x != y || images.contains(&x) {
                    return false;
                }
            }
            (
                Some(Atom::Link {
                    ty: tx,
                    outgoing: ox,
                }),
                Some(Atom::Link {
                    ty: ty_,
                    outgoing: oy,
                }),
            ) => {
                if tx != ty_ || ox.len() != oy.len() {
                    return false;
                }
                for (&cx, &cy) in ox.iter().zip(oy) {
                    stack.push((cx, cy));
                }
            }
            // A node against a link, or a missing atom: unequal.
            _ => return false,
        }
    }
    true
}
