use crate::requirement::Requirement;

/// The source of candidate versions and their dependencies during a solve.
///
/// The provider is the only window the solver has on the package universe: the solver asks it to
/// narrow a requirement to a concrete candidate, and to enumerate the direct dependencies of a
/// candidate it has committed to. The order in which candidates are preferred is entirely up to
/// the provider; the solver guarantees no tie-break beyond it.
pub trait DependencyProvider<R: Requirement> {
    /// The preferred candidate within `requirement`, narrowed as tightly as possible (typically
    /// to a single version). `None` means no candidate exists in the requested range.
    ///
    /// The returned requirement must describe a subset of the versions admitted by
    /// `requirement`; the solver rejects candidates outside the requested range with
    /// [`SolveError::CandidateOutsideRange`][crate::SolveError::CandidateOutsideRange].
    fn best_candidate(&self, requirement: &R) -> Option<R>;

    /// The direct dependencies of `candidate`, which is a requirement previously returned by
    /// [`DependencyProvider::best_candidate`] and therefore narrow enough to name a single
    /// package version.
    fn requirements_of(&self, candidate: &R) -> Vec<R>;
}
