use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;

use crate::engine::term::Term;
use crate::requirement::Requirement;

/// A conjunction of [`Term`]s asserted never to all hold simultaneously.
///
/// Incompatibilities are the clauses the solver reasons with: a dependency edge, an unavailable
/// candidate, and a learned conflict are all expressed as "these terms must not all be true at
/// once". The terms are kept ordered by key with at most one term per key; terms sharing a key
/// are coalesced by intersection at construction.
///
/// An incompatibility is immutable once constructed and is identified by the
/// [`IncompatibilityId`] the store hands out when recording it. Identity matters for the
/// failure explanation, which is why the type is deliberately not [`Clone`].
#[derive(Debug)]
pub struct Incompatibility<R> {
    terms: Vec<Term<R>>,
    cause: Cause,
}

/// The provenance of an [`Incompatibility`], used to explain a failed solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cause {
    /// The incompatibility encodes a root requirement: the negated root must not hold.
    Root,
    /// No candidate exists for the positive term.
    Unavailable,
    /// The positive term depends on the negated term.
    Dependency,
    /// The incompatibility was learned by resolving the two referenced incompatibilities
    /// against each other. Both references point at strictly earlier entries of the same store,
    /// which keeps the derivation graph acyclic.
    Conflict {
        left: IncompatibilityId,
        right: IncompatibilityId,
    },
}

/// The position of an [`Incompatibility`] in the list that owns it, either the solver's store
/// or the linearized derivation of an [`Unsolvable`][crate::Unsolvable].
///
/// Both lists are append-only, so an id stays valid for as long as its list exists. Ids also
/// carry the identity of an incompatibility: two ids are equal exactly when they name the same
/// entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IncompatibilityId {
    position: u32,
}

impl IncompatibilityId {
    pub(crate) fn new(position: usize) -> Self {
        IncompatibilityId {
            position: position as u32,
        }
    }

    /// The position this id names within its list.
    pub fn index(self) -> usize {
        self.position as usize
    }
}

impl<R: Requirement> Incompatibility<R> {
    /// Creates an incompatibility from the given terms, coalescing terms which share a key into
    /// their intersection.
    ///
    /// # Panics
    /// Coalescing must always produce a non-empty intersection; an empty one means an earlier
    /// conflict was missed, which is a bug in the solver.
    pub(crate) fn new(mut terms: Vec<Term<R>>, cause: Cause) -> Self {
        terms.sort_by(|lhs, rhs| lhs.key().cmp(rhs.key()));
        let terms = terms
            .into_iter()
            .coalesce(|lhs, rhs| {
                if lhs.key() == rhs.key() {
                    Ok(lhs
                        .intersection(&rhs)
                        .expect("terms sharing a key must have a non-empty intersection"))
                } else {
                    Err((lhs, rhs))
                }
            })
            .collect();

        Incompatibility { terms, cause }
    }

    /// The terms of the incompatibility, ordered by key, at most one per key.
    pub fn terms(&self) -> &[Term<R>] {
        &self.terms
    }

    pub fn cause(&self) -> Cause {
        self.cause
    }

    /// Whether this incompatibility was learned during conflict resolution rather than stated
    /// by the problem.
    pub fn is_derived(&self) -> bool {
        matches!(self.cause, Cause::Conflict { .. })
    }
}

impl<R: Requirement + Display> Display for Incompatibility<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.terms.iter().format(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_requirement::req;

    #[test]
    fn terms_are_ordered_by_key_after_construction() {
        let ic = Incompatibility::new(
            vec![
                Term::negative(req("zoo", 1, 2)),
                Term::positive(req("bar", 1, 5)),
                Term::positive(req("foo", 2, 4)),
            ],
            Cause::Dependency,
        );

        let keys: Vec<_> = ic.terms().iter().map(|t| *t.key()).collect();
        assert_eq!(keys, vec!["bar", "foo", "zoo"]);
    }

    #[test]
    fn terms_sharing_a_key_are_coalesced_by_intersection() {
        let ic = Incompatibility::new(
            vec![
                Term::positive(req("foo", 1, 6)),
                Term::positive(req("bar", 1, 2)),
                Term::positive(req("foo", 4, 9)),
            ],
            Cause::Root,
        );

        assert_eq!(ic.terms().len(), 2);
        let foo = ic
            .terms()
            .iter()
            .find(|t| *t.key() == "foo")
            .expect("the foo terms should have merged into one");
        assert_eq!(foo.requirement(), &req("foo", 4, 6));
    }

    #[test]
    fn every_key_appears_at_most_once() {
        let ic = Incompatibility::new(
            vec![
                Term::positive(req("foo", 1, 10)),
                Term::negative(req("foo", 3, 4)),
                Term::positive(req("foo", 2, 8)),
            ],
            Cause::Root,
        );

        assert_eq!(ic.terms().len(), 1);
        let only = &ic.terms()[0];
        assert!(only.is_positive());
        assert_eq!(only.requirement(), &req("foo", 2, 3).union(&req("foo", 4, 8)).unwrap());
    }

    #[test]
    fn display_lists_the_terms_in_key_order() {
        let ic = Incompatibility::new(
            vec![
                Term::positive(req("foo", 1, 2)),
                Term::negative(req("bar", 3, 4)),
            ],
            Cause::Dependency,
        );

        assert_eq!(ic.to_string(), "{[not bar [3, 4)], [foo [1, 2)]}");
    }
}
