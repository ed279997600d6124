use log::debug;

/// Structure responsible for storing several statistics of the solving process of the solver.
#[derive(Debug, Default)]
pub(crate) struct SolverStatistics {
    /// The number of decisions taken by the solver
    pub(crate) num_decisions: u64,
    /// The number of derivations forced by unit propagation
    pub(crate) num_derivations: u64,
    /// The number of conflicts encountered during propagation
    pub(crate) num_conflicts: u64,
    /// The number of incompatibilities learned through conflict resolution
    pub(crate) num_learned: u64,
    /// The highest decision level reached during the solve
    pub(crate) peak_decision_level: u64,
}

impl SolverStatistics {
    pub(crate) fn log(&self) {
        debug!("decisions={}", self.num_decisions);
        debug!("derivations={}", self.num_derivations);
        debug!("conflicts={}", self.num_conflicts);
        debug!("learnedIncompatibilities={}", self.num_learned);
        debug!("peakDecisionLevel={}", self.peak_decision_level);
    }
}
