use crate::engine::incompatibility::Incompatibility;
use crate::engine::incompatibility::IncompatibilityId;
use crate::gourd_assert_simple;
use crate::requirement::Requirement;

/// The structured derivation of why a solve has no solution.
///
/// The incompatibilities form a linearization of the conflict graph: the list is topologically
/// ordered, every [`Cause::Conflict`][crate::Cause::Conflict] reference points at an earlier
/// position of this same list, and the final entry is the terminal conflict. A walk from the
/// root therefore reaches only root, dependency, and unavailability leaves.
///
/// The usual way to consume a failure is
/// [`generate_explanation`][crate::generate_explanation], which traverses the derivation and
/// emits premise/conclusion events.
#[derive(Debug)]
pub struct Unsolvable<R: Requirement> {
    incompatibilities: Vec<Incompatibility<R>>,
}

impl<R: Requirement> Unsolvable<R> {
    pub(crate) fn new(incompatibilities: Vec<Incompatibility<R>>) -> Self {
        gourd_assert_simple!(
            !incompatibilities.is_empty(),
            "an unsolvable failure always carries at least the terminal conflict"
        );
        Unsolvable { incompatibilities }
    }

    /// The linearized derivation, terminal conflict last.
    pub fn incompatibilities(&self) -> &[Incompatibility<R>] {
        &self.incompatibilities
    }

    /// The terminal conflict of the failed solve.
    pub fn root(&self) -> &Incompatibility<R> {
        self.incompatibilities
            .last()
            .expect("an unsolvable failure always carries at least the terminal conflict")
    }

    /// Resolves a [`Cause::Conflict`][crate::Cause::Conflict] reference of this derivation.
    pub fn get(&self, id: IncompatibilityId) -> &Incompatibility<R> {
        &self.incompatibilities[id.index()]
    }
}
