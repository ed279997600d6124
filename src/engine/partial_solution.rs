use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::basic_types::SetRelation;
use crate::engine::incompatibility::IncompatibilityId;
use crate::engine::term::Term;
use crate::gourd_assert_simple;
use crate::requirement::Requirement;

/// A single entry of the assignment log of a [`PartialSolution`].
#[derive(Clone, Debug)]
pub(crate) struct Assignment<R> {
    pub(crate) term: Term<R>,
    /// The number of decisions that had been recorded when this assignment was made.
    pub(crate) decision_level: usize,
    /// The incompatibility that forced this assignment, or `None` for a decision.
    pub(crate) cause: Option<IncompatibilityId>,
}

impl<R> Assignment<R> {
    pub(crate) fn is_decision(&self) -> bool {
        self.cause.is_none()
    }
}

/// The solver's evolving view of which versions are still admissible.
///
/// The partial solution is an ordered log of [`Assignment`]s together with per-key aggregates
/// for fast relation queries: `positives` holds the intersection of all positive terms recorded
/// for a key, `negatives` the intersection of the negative terms for keys without any positive
/// one. Decisions additionally record their key in `decided_keys`.
///
/// Conflict resolution rewinds the log with [`PartialSolution::backtrack_to`], which truncates
/// the assignments and rebuilds the aggregates by replaying what remains. The replay is linear
/// in the log, but it cannot drift from the log contents the way incremental undo could.
#[derive(Debug)]
pub(crate) struct PartialSolution<R: Requirement> {
    assignments: Vec<Assignment<R>>,
    positives: BTreeMap<R::Key, Term<R>>,
    negatives: BTreeMap<R::Key, Term<R>>,
    decided_keys: BTreeSet<R::Key>,
}

/// The backtracking target computed from the terms of a conflicting incompatibility; see
/// [`PartialSolution::build_backtrack_info`].
#[derive(Debug)]
pub(crate) struct BacktrackInfo<R> {
    /// The position, within the queried terms, of the term whose satisfier is most recent.
    pub(crate) term_index: usize,
    /// The position in the assignment log of that satisfier.
    pub(crate) satisfier_index: usize,
    /// The highest decision level among the satisfiers of the other terms, or 0 when there is
    /// none.
    pub(crate) previous_satisfier_level: usize,
    /// When the satisfier over-satisfies its term, the left-over part of the satisfier's term.
    pub(crate) difference: Option<Term<R>>,
}

impl<R: Requirement> Default for PartialSolution<R> {
    fn default() -> Self {
        PartialSolution {
            assignments: Vec::default(),
            positives: BTreeMap::default(),
            negatives: BTreeMap::default(),
            decided_keys: BTreeSet::default(),
        }
    }
}

impl<R: Requirement> PartialSolution<R> {
    /// Appends a derivation forced by `cause` to the assignment log.
    pub(crate) fn record_derivation(&mut self, term: Term<R>, cause: IncompatibilityId) {
        let assignment = Assignment {
            term,
            decision_level: self.decided_keys.len(),
            cause: Some(cause),
        };
        self.register(&assignment.term);
        self.assignments.push(assignment);
    }

    /// Appends a decision for the package of `term` to the assignment log, entering the next
    /// decision level.
    pub(crate) fn record_decision(&mut self, term: Term<R>) {
        gourd_assert_simple!(term.is_positive(), "decisions are always positive terms");
        let newly_decided = self.decided_keys.insert(term.key().clone());
        gourd_assert_simple!(
            newly_decided,
            "more than one decision recorded for a single package"
        );

        let assignment = Assignment {
            term,
            decision_level: self.decided_keys.len(),
            cause: None,
        };
        self.register(&assignment.term);
        self.assignments.push(assignment);
    }

    /// Narrows the per-key aggregates with `term`.
    ///
    /// A positive term always wins: it is intersected into the positive aggregate and shadows
    /// any negative one. A negative term only narrows the negative aggregate while no positive
    /// aggregate exists for its key.
    fn register(&mut self, term: &Term<R>) {
        if let Some(positive) = self.positives.get_mut(term.key()) {
            let narrowed = positive
                .intersection(term)
                .expect("narrowing an existing positive aggregate must not empty it");
            *positive = narrowed;
            return;
        }

        let mut term = term.clone();
        if let Some(negative) = self.negatives.get(term.key()) {
            term = term
                .intersection(negative)
                .expect("narrowing an existing negative aggregate must not empty it");
        }

        let key = term.key().clone();
        if term.is_positive() {
            let _ = self.negatives.remove(&key);
            let previous = self.positives.insert(key, term);
            gourd_assert_simple!(
                previous.is_none(),
                "a positive aggregate appeared while registering on top of a negative one"
            );
        } else {
            let _ = self.negatives.insert(key, term);
        }
    }

    /// How the accumulated assignments for the key of `term` relate to `term`. Keys without any
    /// assignment are unconstrained and therefore overlap.
    pub(crate) fn relation_to(&self, term: &Term<R>) -> SetRelation {
        if let Some(positive) = self.positives.get(term.key()) {
            return positive.relation_to(term);
        }
        if let Some(negative) = self.negatives.get(term.key()) {
            return negative.relation_to(term);
        }
        SetRelation::Overlap
    }

    /// Whether the accumulated assignments guarantee that `term` holds.
    pub(crate) fn satisfies(&self, term: &Term<R>) -> bool {
        self.relation_to(term) == SetRelation::Subset
    }

    /// The requirement of the first positive aggregate, in ascending key order, whose package
    /// has not been decided yet. This is the next package the solver should pick a version for;
    /// `None` means every constrained package has a decision.
    pub(crate) fn next_unsatisfied_term(&self) -> Option<&R> {
        self.positives
            .iter()
            .find(|(key, _)| !self.decided_keys.contains(*key))
            .map(|(_, term)| term.requirement())
    }

    /// The number of decisions recorded so far.
    pub(crate) fn decision_level(&self) -> usize {
        self.decided_keys.len()
    }

    pub(crate) fn assignment(&self, index: usize) -> &Assignment<R> {
        &self.assignments[index]
    }

    /// The position in the log of the first assignment such that the running intersection of
    /// all same-key assignments up to and including it implies `term`.
    ///
    /// # Panics
    /// The satisfier must exist; callers only ask for the satisfier of terms that
    /// [`PartialSolution::satisfies`] reported as satisfied.
    pub(crate) fn satisfier_of(&self, term: &Term<R>) -> usize {
        let mut accumulated: Option<Term<R>> = None;

        for (index, assignment) in self.assignments.iter().enumerate() {
            if assignment.term.key() != term.key() {
                continue;
            }

            let narrowed = match &accumulated {
                None => assignment.term.clone(),
                Some(acc) => acc
                    .intersection(&assignment.term)
                    .expect("the running intersection of recorded assignments is never empty"),
            };

            if narrowed.implies(term) {
                return index;
            }
            accumulated = Some(narrowed);
        }

        panic!(
            "looked up the satisfier of a term that the partial solution does not satisfy; \
             this is a bug in the solver"
        );
    }

    /// Computes the backtracking target for the terms of a conflicting incompatibility.
    ///
    /// The returned info names the term whose satisfier appears latest in the log, and the
    /// highest decision level among the satisfiers of all other terms. When the most recent
    /// satisfier over-satisfies its term (its own term is strictly stronger than needed), the
    /// left-over `difference` is reported as well, and the level of the satisfier of the
    /// difference's inverse is folded into `previous_satisfier_level`.
    ///
    /// Returns `None` when there is nothing to backtrack over, which happens exactly when the
    /// conflicting incompatibility has no terms: the problem is unsatisfiable from the start.
    pub(crate) fn build_backtrack_info(&self, terms: &[Term<R>]) -> Option<BacktrackInfo<R>> {
        let mut most_recent: Option<(usize, usize)> = None;
        let mut difference: Option<Term<R>> = None;
        let mut previous_satisfier_level = 0;

        for (term_index, term) in terms.iter().enumerate() {
            let satisfier_index = self.satisfier_of(term);

            match most_recent {
                None => most_recent = Some((term_index, satisfier_index)),
                Some((_, most_recent_satisfier)) if most_recent_satisfier < satisfier_index => {
                    previous_satisfier_level = previous_satisfier_level
                        .max(self.assignments[most_recent_satisfier].decision_level);
                    most_recent = Some((term_index, satisfier_index));
                    difference = None;
                }
                Some(_) => {
                    previous_satisfier_level = previous_satisfier_level
                        .max(self.assignments[satisfier_index].decision_level);
                }
            }

            let (most_recent_term, most_recent_satisfier) =
                most_recent.expect("initialised on the first iteration");
            if most_recent_term == term_index {
                difference = self.assignments[most_recent_satisfier].term.difference(term);
                if let Some(difference) = &difference {
                    let difference_satisfier = self.satisfier_of(&difference.inverse());
                    previous_satisfier_level = previous_satisfier_level
                        .max(self.assignments[difference_satisfier].decision_level);
                }
            }
        }

        most_recent.map(|(term_index, satisfier_index)| BacktrackInfo {
            term_index,
            satisfier_index,
            previous_satisfier_level,
            difference,
        })
    }

    /// Truncates the log to the longest prefix with a decision level of at most
    /// `decision_level` and rebuilds the aggregates and decided keys by replaying what remains.
    pub(crate) fn backtrack_to(&mut self, decision_level: usize) {
        while self
            .assignments
            .last()
            .is_some_and(|assignment| assignment.decision_level > decision_level)
        {
            let _ = self.assignments.pop();
        }

        self.positives.clear();
        self.negatives.clear();
        self.decided_keys.clear();

        for index in 0..self.assignments.len() {
            let assignment = self.assignments[index].clone();
            self.register(&assignment.term);
            if assignment.is_decision() {
                let _ = self.decided_keys.insert(assignment.term.key().clone());
            }
        }
    }

    /// The requirement of every decision, in the order the decisions were made.
    pub(crate) fn completed_solution(&self) -> Vec<R> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.is_decision())
            .map(|assignment| assignment.term.requirement().clone())
            .collect()
    }
}
