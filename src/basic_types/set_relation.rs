/// The relation of one set of versions to another.
///
/// This classification is the sole currency exchanged between the partial solution and the
/// solver loop: every propagation question eventually reduces to asking how an accumulated
/// assignment relates to a term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetRelation {
    /// Every version admitted by the queried term is also admitted by the other.
    Subset,
    /// No version is admitted by both terms simultaneously.
    Disjoint,
    /// The terms share some versions but neither contains the other.
    Overlap,
}
