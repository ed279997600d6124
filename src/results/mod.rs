mod unsolvable;

pub use unsolvable::Unsolvable;

use thiserror::Error;

use crate::requirement::Requirement;

/// Errors which end a solve without a solution.
///
/// Only [`SolveError::Unsolvable`] is a verdict about the problem; the other variants report a
/// broken [`DependencyProvider`][crate::DependencyProvider] contract or an external
/// cancellation.
#[derive(Debug, Error)]
pub enum SolveError<R: Requirement> {
    /// No assignment of versions satisfies the roots. The payload carries the derivation of the
    /// terminal conflict for [`generate_explanation`][crate::generate_explanation].
    #[error("the root requirements cannot be satisfied")]
    Unsolvable(Unsolvable<R>),
    /// The provider reported a package as depending on itself.
    #[error("the package of {requirement:?} depends on itself")]
    SelfDependency { requirement: R },
    /// The provider returned a candidate which does not narrow the requested range.
    #[error("candidate {candidate:?} lies outside the requested range {requested:?}")]
    CandidateOutsideRange { requested: R, candidate: R },
    /// A [`Cancellation`][crate::cancellation::Cancellation] reported the solve as cancelled
    /// before it reached a conclusion.
    #[error("the solve was cancelled before reaching a conclusion")]
    Cancelled,
}
