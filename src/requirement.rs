use std::fmt::Debug;

/// The contract a client requirement type must satisfy for the solver to reason about it.
///
/// A requirement names a package through its [`Requirement::Key`] and describes a set of
/// acceptable versions of that package. Two requirements with the same key denote subsets of a
/// common universe of versions; the set operations are only ever invoked on same-key pairs, and
/// the behaviour of a cross-key operation is left undefined by this contract.
///
/// The solver never constructs requirements itself. It only composes the ones handed to it by
/// the roots and the [`DependencyProvider`][crate::DependencyProvider], which is what makes the
/// version representation pluggable: anything that can answer these set queries works, the
/// [`IntervalSet`][crate::IntervalSet] being the representation the solver was designed around.
pub trait Requirement: Clone + Eq + Debug {
    /// Identifies the package this requirement constrains. Keys are cheap to copy, totally
    /// ordered, and shared by every requirement on the same package.
    type Key: Clone + Ord + Debug;

    /// The key of the package this requirement constrains.
    fn key(&self) -> &Self::Key;

    /// The requirement admitting the versions admitted by both inputs, or `None` when no such
    /// version exists.
    fn intersection(&self, other: &Self) -> Option<Self>;

    /// The requirement admitting the versions admitted by either input, or `None` when the
    /// union is not representable by a single requirement.
    fn union(&self, other: &Self) -> Option<Self>;

    /// The requirement admitting the versions admitted by `self` but not by `other`, or `None`
    /// when every version of `self` is also admitted by `other`.
    fn difference(&self, other: &Self) -> Option<Self>;

    /// Whether every version admitted by `other` is also admitted by `self`.
    fn implied_by(&self, other: &Self) -> bool;

    /// Whether no version is admitted by both `self` and `other`.
    fn excludes(&self, other: &Self) -> bool;
}
