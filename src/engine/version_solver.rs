use std::collections::BTreeSet;

use log::debug;
use log::trace;

use crate::basic_types::SetRelation;
use crate::cancellation::Cancellation;
use crate::engine::incompatibility::Cause;
use crate::engine::incompatibility::Incompatibility;
use crate::engine::incompatibility::IncompatibilityId;
use crate::engine::incompatibility_store::IncompatibilityStore;
use crate::engine::partial_solution::PartialSolution;
use crate::engine::solver_statistics::SolverStatistics;
use crate::engine::term::Term;
use crate::gourd_assert_advanced;
use crate::provider::DependencyProvider;
use crate::requirement::Requirement;
use crate::results::SolveError;

/// The outcome of checking an incompatibility against the partial solution; see
/// [`VersionSolver::check_conflict`].
#[derive(Debug)]
enum ConflictCheck {
    /// Every term of the incompatibility is satisfied: the partial solution violates it.
    Conflict,
    /// The incompatibility is falsified or too indeterminate to derive anything from.
    NoConflict,
    /// Every term except the one at `term_index` is satisfied, so its inverse is forced.
    AlmostConflict { term_index: usize },
}

/// The solver loop: unit propagation, conflict resolution, and decision speculation over a
/// client-supplied [`DependencyProvider`].
///
/// The solver is single-threaded and synchronous. It alternates exhaustive unit propagation
/// with the speculation of a single decision until no propagation is pending and every
/// constrained package has a decision, at which point the decisions form the solution.
pub(crate) struct VersionSolver<'a, R: Requirement, P: DependencyProvider<R>> {
    provider: &'a P,
    store: IncompatibilityStore<R>,
    partial_solution: PartialSolution<R>,
    /// The keys whose aggregates have moved since they were last propagated, processed in
    /// ascending key order for determinism.
    changed: BTreeSet<R::Key>,
    statistics: SolverStatistics,
}

impl<'a, R: Requirement, P: DependencyProvider<R>> VersionSolver<'a, R, P> {
    pub(crate) fn new(provider: &'a P) -> Self {
        VersionSolver {
            provider,
            store: IncompatibilityStore::default(),
            partial_solution: PartialSolution::default(),
            changed: BTreeSet::new(),
            statistics: SolverStatistics::default(),
        }
    }

    /// Records the incompatibility "the root requirement must not be absent" and schedules its
    /// key for propagation.
    pub(crate) fn preload_root(&mut self, requirement: R) {
        debug!("loading root requirement {requirement:?}");
        let key = requirement.key().clone();
        let _ = self
            .store
            .record(Incompatibility::new(vec![Term::negative(requirement)], Cause::Root));
        let _ = self.changed.insert(key);
    }

    /// Runs the solve to completion, returning one requirement per decided package in decision
    /// order.
    pub(crate) fn solve(
        &mut self,
        cancellation: &mut impl Cancellation,
    ) -> Result<Vec<R>, SolveError<R>> {
        while !self.changed.is_empty() {
            self.unit_propagation(cancellation)?;
            self.speculate_one_decision()?;
        }

        self.statistics.log();
        debug!(
            "solution complete with {} incompatibilities recorded",
            self.store.len()
        );
        Ok(self.partial_solution.completed_solution())
    }

    /// Performs unit propagation until no pending changes remain.
    fn unit_propagation(
        &mut self,
        cancellation: &mut impl Cancellation,
    ) -> Result<(), SolveError<R>> {
        while let Some(key) = self.changed.pop_first() {
            if cancellation.is_cancelled() {
                return Err(SolveError::Cancelled);
            }
            self.propagate_for(&key)?;
        }
        Ok(())
    }

    /// Performs unit propagation over every incompatibility mentioning `key`.
    fn propagate_for(&mut self, key: &R::Key) -> Result<(), SolveError<R>> {
        trace!("performing unit propagation for {key:?}");
        // Conflict resolution appends to the index while we walk it; propagation of this key
        // restarts from the learned incompatibility's key anyway, so a snapshot suffices.
        let ids = self.store.for_key(key).to_vec();
        for id in ids {
            if !self.propagate_one(id)? {
                break;
            }
        }
        Ok(())
    }

    /// Propagates a single incompatibility.
    ///
    /// Returns `true` when propagation of the current key should continue with the next
    /// incompatibility, and `false` when a conflict was resolved and the pending work for this
    /// key is stale.
    fn propagate_one(&mut self, id: IncompatibilityId) -> Result<bool, SolveError<R>> {
        match self.check_conflict(id) {
            ConflictCheck::NoConflict => Ok(true),
            ConflictCheck::AlmostConflict { term_index } => {
                let term = self.store[id].terms()[term_index].clone();
                trace!("deriving {:?} from {:?}", term.inverse(), self.store[id]);
                self.statistics.num_derivations += 1;
                self.partial_solution.record_derivation(term.inverse(), id);
                let _ = self.changed.insert(term.key().clone());
                Ok(true)
            }
            ConflictCheck::Conflict => {
                debug!("conflict on {:?}", self.store[id]);
                self.statistics.num_conflicts += 1;
                let learned = self.resolve_conflict(id)?;

                // The learned incompatibility propagates immediately: after backtracking it has
                // exactly one unsatisfied term left.
                let ConflictCheck::AlmostConflict { term_index } = self.check_conflict(learned)
                else {
                    panic!(
                        "a freshly learned incompatibility must be an almost-conflict with the \
                         partial solution"
                    );
                };
                let term = self.store[learned].terms()[term_index].clone();
                trace!("deriving {:?} from learned {:?}", term.inverse(), self.store[learned]);
                self.statistics.num_derivations += 1;
                self.partial_solution
                    .record_derivation(term.inverse(), learned);

                // Backtracking invalidated the other pending keys.
                self.changed.clear();
                let _ = self.changed.insert(term.key().clone());
                Ok(false)
            }
        }
    }

    /// Classifies the relation between the partial solution and the given incompatibility.
    fn check_conflict(&self, id: IncompatibilityId) -> ConflictCheck {
        let mut unsatisfied = None;

        for (term_index, term) in self.store[id].terms().iter().enumerate() {
            match self.partial_solution.relation_to(term) {
                // One falsified term means the incompatibility can never fire from here.
                SetRelation::Disjoint => return ConflictCheck::NoConflict,
                SetRelation::Overlap => {
                    if unsatisfied.is_some() {
                        // Two unsatisfied terms make the incompatibility too indeterminate to
                        // derive anything from.
                        return ConflictCheck::NoConflict;
                    }
                    unsatisfied = Some(term_index);
                }
                SetRelation::Subset => {}
            }
        }

        match unsatisfied {
            None => ConflictCheck::Conflict,
            Some(term_index) => ConflictCheck::AlmostConflict { term_index },
        }
    }

    /// Resolves a conflict by learning new incompatibilities until one of them names a
    /// backtrackable cause, then backtracks the partial solution and returns the learned root
    /// cause of the conflict.
    ///
    /// Each round resolves the conflicting incompatibility against the cause of the most recent
    /// satisfier on the satisfier's key. When the satisfier is a decision, or every other
    /// satisfier lives at an earlier level, backtracking to that earlier level turns the
    /// current incompatibility into an almost-conflict instead, and the loop stops.
    fn resolve_conflict(
        &mut self,
        id: IncompatibilityId,
    ) -> Result<IncompatibilityId, SolveError<R>> {
        let mut current = id;

        loop {
            let Some(info) = self
                .partial_solution
                .build_backtrack_info(self.store[current].terms())
            else {
                // There is nowhere left to backtrack to: there is no possible solution.
                debug!("hit a rootless conflict, resolution fails");
                return Err(SolveError::Unsolvable(self.store.extract_failure(current)));
            };

            let satisfier = self.partial_solution.assignment(info.satisfier_index);
            let satisfier_level = satisfier.decision_level;
            let satisfier_key = satisfier.term.key().clone();
            let satisfier_cause = satisfier.cause;

            if satisfier_cause.is_none() || info.previous_satisfier_level < satisfier_level {
                debug!(
                    "backtracking to decision level {}",
                    info.previous_satisfier_level
                );
                self.partial_solution
                    .backtrack_to(info.previous_satisfier_level);
                return Ok(current);
            }

            // The satisfier is a derivation; resolve against its cause on the satisfier's key.
            let cause = satisfier_cause.expect("the satisfier is not a decision");
            let mut terms: Vec<Term<R>> = self.store[current]
                .terms()
                .iter()
                .enumerate()
                .filter(|(term_index, _)| *term_index != info.term_index)
                .map(|(_, term)| term.clone())
                .collect();
            terms.extend(
                self.store[cause]
                    .terms()
                    .iter()
                    .filter(|term| *term.key() != satisfier_key)
                    .cloned(),
            );
            if let Some(difference) = &info.difference {
                terms.push(difference.inverse());
            }

            gourd_assert_advanced!(
                terms
                    .iter()
                    .all(|term| self.partial_solution.satisfies(term)),
                "every term of a resolvent is satisfied by the partial solution"
            );

            current = self.store.record(Incompatibility::new(
                terms,
                Cause::Conflict {
                    left: current,
                    right: cause,
                },
            ));
            self.statistics.num_learned += 1;
            debug!("learned incompatibility {:?}", self.store[current]);
        }
    }

    /// Speculates a decision for the next package without one: asks the provider for the best
    /// candidate in the accumulated range, records the candidate's dependencies as
    /// incompatibilities, and decides the candidate unless one of those dependencies already
    /// conflicts with the partial solution.
    fn speculate_one_decision(&mut self) -> Result<(), SolveError<R>> {
        let Some(requirement) = self.partial_solution.next_unsatisfied_term().cloned() else {
            return Ok(());
        };
        trace!("speculating on the unsatisfied requirement {requirement:?}");

        let Some(candidate) = self.provider.best_candidate(&requirement) else {
            debug!("no candidate available for {requirement:?}");
            let key = requirement.key().clone();
            let _ = self.store.record(Incompatibility::new(
                vec![Term::positive(requirement)],
                Cause::Unavailable,
            ));
            let _ = self.changed.insert(key);
            return Ok(());
        };

        if candidate.key() != requirement.key() || !requirement.implied_by(&candidate) {
            return Err(SolveError::CandidateOutsideRange {
                requested: requirement,
                candidate,
            });
        }
        trace!("best candidate of {requirement:?} is {candidate:?}");

        let mut found_conflict = false;
        for dependency in self.provider.requirements_of(&candidate) {
            if dependency.key() == candidate.key() {
                return Err(SolveError::SelfDependency {
                    requirement: dependency,
                });
            }

            let id = self.store.record(Incompatibility::new(
                vec![
                    Term::positive(candidate.clone()),
                    Term::negative(dependency),
                ],
                Cause::Dependency,
            ));
            trace!("recorded dependency incompatibility {:?}", self.store[id]);

            // If all terms other than the candidate's own are already satisfied, deciding the
            // candidate would complete the incompatibility; propagation would reject it.
            let conflicts = self.store[id].terms().iter().all(|term| {
                term.key() == candidate.key() || self.partial_solution.satisfies(term)
            });
            found_conflict = found_conflict || conflicts;
        }

        if !found_conflict {
            debug!("deciding {candidate:?}");
            self.statistics.num_decisions += 1;
            self.partial_solution
                .record_decision(Term::positive(candidate.clone()));
            self.statistics.peak_decision_level = self
                .statistics
                .peak_decision_level
                .max(self.partial_solution.decision_level() as u64);
        }

        let _ = self.changed.insert(candidate.key().clone());
        Ok(())
    }
}

/// Solves the given root requirements against `provider`.
///
/// On success the returned requirements contain one entry per decided package, in decision
/// order; the solution is closed under the provider's dependencies. On failure the error
/// carries the structured derivation of why no solution exists; see
/// [`generate_explanation`][crate::generate_explanation].
pub fn resolve<R, P>(
    roots: impl IntoIterator<Item = R>,
    provider: &P,
) -> Result<Vec<R>, SolveError<R>>
where
    R: Requirement,
    P: DependencyProvider<R>,
{
    resolve_cancellable(roots, provider, &mut || false)
}

/// Solves the given root requirements against `provider`, giving up with
/// [`SolveError::Cancelled`] once `cancellation` reports the solve as cancelled.
pub fn resolve_cancellable<R, P>(
    roots: impl IntoIterator<Item = R>,
    provider: &P,
    cancellation: &mut impl Cancellation,
) -> Result<Vec<R>, SolveError<R>>
where
    R: Requirement,
    P: DependencyProvider<R>,
{
    let mut solver = VersionSolver::new(provider);
    for root in roots {
        solver.preload_root(root);
    }
    solver.solve(cancellation)
}
