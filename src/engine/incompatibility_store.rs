use std::collections::BTreeMap;
use std::ops::Index;

use crate::engine::incompatibility::Cause;
use crate::engine::incompatibility::Incompatibility;
use crate::engine::incompatibility::IncompatibilityId;
use crate::requirement::Requirement;
use crate::results::Unsolvable;

/// The append-only collection of every [`Incompatibility`] created during a solve.
///
/// The store owns all incompatibilities; the partial solution and the learned
/// [`Cause::Conflict`] references only ever hold [`IncompatibilityId`]s into it. Entries are
/// appended and never removed or moved, which is what keeps an id valid for the entire solve:
/// an [`IncompatibilityId`] is simply the position of its incompatibility in the order of
/// recording.
///
/// Next to the incompatibilities themselves, the store maintains a secondary index from
/// package key to every incompatibility mentioning that key, in insertion order. Unit
/// propagation walks this index instead of the full store.
#[derive(Debug)]
pub(crate) struct IncompatibilityStore<R: Requirement> {
    incompatibilities: Vec<Incompatibility<R>>,
    by_key: BTreeMap<R::Key, Vec<IncompatibilityId>>,
}

impl<R: Requirement> Default for IncompatibilityStore<R> {
    fn default() -> Self {
        IncompatibilityStore {
            incompatibilities: Vec::default(),
            by_key: BTreeMap::default(),
        }
    }
}

impl<R: Requirement> IncompatibilityStore<R> {
    /// Appends `incompatibility` to the store and indexes it under the key of each of its
    /// terms. Returns the id under which it was recorded.
    pub(crate) fn record(&mut self, incompatibility: Incompatibility<R>) -> IncompatibilityId {
        let id = IncompatibilityId::new(self.incompatibilities.len());
        self.incompatibilities.push(incompatibility);

        for term in self.incompatibilities[id.index()].terms() {
            self.by_key
                .entry(term.key().clone())
                .or_default()
                .push(id);
        }

        id
    }

    /// The ids of every incompatibility with a term for `key`, in insertion order.
    ///
    /// The key must have been seen by the store before; propagation only ever asks about keys
    /// that some incompatibility introduced.
    pub(crate) fn for_key(&self, key: &R::Key) -> &[IncompatibilityId] {
        self.by_key
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_else(|| panic!("no incompatibility was ever recorded for the queried key"))
    }

    pub(crate) fn len(&self) -> usize {
        self.incompatibilities.len()
    }

    /// Linearizes the conflict graph rooted at `root` into an [`Unsolvable`] failure.
    ///
    /// The resulting list is topologically ordered: the parents of a derived incompatibility
    /// always precede it, and the root conflict comes last. [`Cause::Conflict`] references are
    /// rewritten to point at the copies inside the list, so the failure is self-contained and
    /// outlives the solver.
    pub(crate) fn extract_failure(&self, root: IncompatibilityId) -> Unsolvable<R> {
        let mut linearized = Vec::new();
        let _ = self.copy_into(root, &mut linearized);
        Unsolvable::new(linearized)
    }

    fn copy_into(
        &self,
        id: IncompatibilityId,
        linearized: &mut Vec<Incompatibility<R>>,
    ) -> IncompatibilityId {
        let incompatibility = &self[id];

        let cause = match incompatibility.cause() {
            Cause::Conflict { left, right } => {
                let left = self.copy_into(left, linearized);
                let right = self.copy_into(right, linearized);
                Cause::Conflict { left, right }
            }
            external => external,
        };

        linearized.push(Incompatibility::new(
            incompatibility.terms().to_vec(),
            cause,
        ));
        IncompatibilityId::new(linearized.len() - 1)
    }
}

impl<R: Requirement> Index<IncompatibilityId> for IncompatibilityStore<R> {
    type Output = Incompatibility<R>;

    fn index(&self, index: IncompatibilityId) -> &Self::Output {
        &self.incompatibilities[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::term::Term;
    use crate::engine::test_requirement::Versions;
    use crate::engine::test_requirement::req;

    #[test]
    fn recorded_incompatibilities_are_indexed_under_each_term_key() {
        let mut store: IncompatibilityStore<Versions> = IncompatibilityStore::default();

        let first = store.record(Incompatibility::new(
            vec![
                Term::positive(req("foo", 1, 2)),
                Term::negative(req("bar", 3, 4)),
            ],
            Cause::Dependency,
        ));
        let second = store.record(Incompatibility::new(
            vec![Term::positive(req("bar", 1, 9))],
            Cause::Unavailable,
        ));

        assert_eq!(store.for_key(&"foo"), &[first]);
        assert_eq!(store.for_key(&"bar"), &[first, second]);
    }

    #[test]
    fn conflict_parents_precede_their_resolvent() {
        let mut store: IncompatibilityStore<Versions> = IncompatibilityStore::default();

        let left = store.record(Incompatibility::new(
            vec![Term::negative(req("foo", 1, 2))],
            Cause::Root,
        ));
        let right = store.record(Incompatibility::new(
            vec![Term::positive(req("foo", 1, 2))],
            Cause::Unavailable,
        ));
        let learned = store.record(Incompatibility::new(
            vec![],
            Cause::Conflict { left, right },
        ));

        let Cause::Conflict { left, right } = store[learned].cause() else {
            panic!("the learned incompatibility should keep its conflict cause");
        };
        assert!(left.index() < learned.index());
        assert!(right.index() < learned.index());
    }

    #[test]
    fn extracted_failures_are_topologically_ordered_with_the_root_last() {
        let mut store: IncompatibilityStore<Versions> = IncompatibilityStore::default();

        let needed = store.record(Incompatibility::new(
            vec![Term::negative(req("foo", 1, 2))],
            Cause::Root,
        ));
        let unavailable = store.record(Incompatibility::new(
            vec![Term::positive(req("foo", 1, 2))],
            Cause::Unavailable,
        ));
        let learned = store.record(Incompatibility::new(
            vec![],
            Cause::Conflict {
                left: unavailable,
                right: needed,
            },
        ));

        let failure = store.extract_failure(learned);
        let incompatibilities = failure.incompatibilities();

        assert_eq!(incompatibilities.len(), 3);
        assert_eq!(incompatibilities[0].cause(), Cause::Unavailable);
        assert_eq!(incompatibilities[1].cause(), Cause::Root);

        let Cause::Conflict { left, right } = incompatibilities[2].cause() else {
            panic!("the root of the failure should be the derived incompatibility");
        };
        assert_eq!(left.index(), 0);
        assert_eq!(right.index(), 1);
        assert!(failure.root().terms().is_empty());
    }
}
