//! # Gourd
//! Gourd is a version solving library built around the PubGrub algorithm. Given a set of root
//! requirements and a [`DependencyProvider`] which enumerates candidate versions and their
//! dependencies, the solver either returns a consistent assignment of one requirement per
//! package satisfying all transitive dependencies, or fails with a structured derivation of
//! why no such assignment exists.
//!
//! The version representation is pluggable: anything implementing [`Requirement`] works. The
//! solver composes requirements exclusively through that trait and never constructs them
//! itself. For ordered, numeric-like versions the [`IntervalSet`] type provides the set
//! algebra a requirement needs.
//!
//! # Using the solver
//! The first step is describing requirements. A requirement names a package and a set of
//! acceptable versions of it:
//! ```rust
//! # use gourd_solver::IntervalSet;
//! # use gourd_solver::Requirement;
//! #[derive(Clone, Debug, PartialEq, Eq)]
//! struct Package {
//!     name: String,
//!     versions: IntervalSet<u32>,
//! }
//!
//! impl Package {
//!     fn new(name: &str, low: u32, high: u32) -> Self {
//!         Package {
//!             name: name.to_owned(),
//!             versions: IntervalSet::new(low, high),
//!         }
//!     }
//!
//!     fn with_versions(&self, versions: IntervalSet<u32>) -> Self {
//!         Package {
//!             name: self.name.clone(),
//!             versions,
//!         }
//!     }
//! }
//!
//! impl Requirement for Package {
//!     type Key = String;
//!
//!     fn key(&self) -> &String {
//!         &self.name
//!     }
//!
//!     fn intersection(&self, other: &Self) -> Option<Self> {
//!         let versions = self.versions.intersection(&other.versions);
//!         (!versions.is_empty()).then(|| self.with_versions(versions))
//!     }
//!
//!     fn union(&self, other: &Self) -> Option<Self> {
//!         let versions = self.versions.union(&other.versions);
//!         (!versions.is_empty()).then(|| self.with_versions(versions))
//!     }
//!
//!     fn difference(&self, other: &Self) -> Option<Self> {
//!         let versions = self.versions.difference(&other.versions);
//!         (!versions.is_empty()).then(|| self.with_versions(versions))
//!     }
//!
//!     fn implied_by(&self, other: &Self) -> bool {
//!         self.versions.contains(&other.versions)
//!     }
//!
//!     fn excludes(&self, other: &Self) -> bool {
//!         self.versions.disjoint(&other.versions)
//!     }
//! }
//! ```
//!
//! Then a [`DependencyProvider`] supplies the package universe, and [`resolve`] finds the
//! solution:
//! ```rust
//! # use gourd_solver::DependencyProvider;
//! # use gourd_solver::IntervalSet;
//! # use gourd_solver::Requirement;
//! # use gourd_solver::resolve;
//! # #[derive(Clone, Debug, PartialEq, Eq)]
//! # struct Package {
//! #     name: String,
//! #     versions: IntervalSet<u32>,
//! # }
//! # impl Package {
//! #     fn new(name: &str, low: u32, high: u32) -> Self {
//! #         Package {
//! #             name: name.to_owned(),
//! #             versions: IntervalSet::new(low, high),
//! #         }
//! #     }
//! #     fn with_versions(&self, versions: IntervalSet<u32>) -> Self {
//! #         Package {
//! #             name: self.name.clone(),
//! #             versions,
//! #         }
//! #     }
//! # }
//! # impl Requirement for Package {
//! #     type Key = String;
//! #     fn key(&self) -> &String {
//! #         &self.name
//! #     }
//! #     fn intersection(&self, other: &Self) -> Option<Self> {
//! #         let versions = self.versions.intersection(&other.versions);
//! #         (!versions.is_empty()).then(|| self.with_versions(versions))
//! #     }
//! #     fn union(&self, other: &Self) -> Option<Self> {
//! #         let versions = self.versions.union(&other.versions);
//! #         (!versions.is_empty()).then(|| self.with_versions(versions))
//! #     }
//! #     fn difference(&self, other: &Self) -> Option<Self> {
//! #         let versions = self.versions.difference(&other.versions);
//! #         (!versions.is_empty()).then(|| self.with_versions(versions))
//! #     }
//! #     fn implied_by(&self, other: &Self) -> bool {
//! #         self.versions.contains(&other.versions)
//! #     }
//! #     fn excludes(&self, other: &Self) -> bool {
//! #         self.versions.disjoint(&other.versions)
//! #     }
//! # }
//! struct Repository {
//!     packages: Vec<(Package, Vec<Package>)>,
//! }
//!
//! impl DependencyProvider<Package> for Repository {
//!     fn best_candidate(&self, requirement: &Package) -> Option<Package> {
//!         self.packages
//!             .iter()
//!             .rev()
//!             .map(|(package, _)| package)
//!             .find(|package| {
//!                 package.name == *requirement.key() && requirement.implied_by(package)
//!             })
//!             .cloned()
//!     }
//!
//!     fn requirements_of(&self, candidate: &Package) -> Vec<Package> {
//!         self.packages
//!             .iter()
//!             .find(|(package, _)| package == candidate)
//!             .map(|(_, dependencies)| dependencies.clone())
//!             .unwrap_or_default()
//!     }
//! }
//!
//! let repository = Repository {
//!     packages: vec![
//!         (Package::new("foo", 1, 2), vec![Package::new("bar", 3, 4)]),
//!         (Package::new("bar", 3, 4), vec![]),
//!     ],
//! };
//!
//! let solution = resolve([Package::new("foo", 1, 2)], &repository)
//!     .expect("this repository is solvable");
//! assert_eq!(
//!     solution,
//!     vec![Package::new("foo", 1, 2), Package::new("bar", 3, 4)]
//! );
//! ```
//!
//! # Failures
//! When no solution exists, [`resolve`] returns [`SolveError::Unsolvable`] carrying the
//! derivation of the terminal conflict. [`generate_explanation`] walks that derivation and
//! emits a stream of premise/conclusion events from which a client can render a report; see
//! the [`explain`] module.
//!
//! # Bibliography
//! The algorithm is described by Natalie Weizenbaum in "PubGrub: Next-Generation Version
//! Solving", and is itself an instance of conflict-driven clause learning.

pub(crate) mod basic_types;
pub mod cancellation;
pub(crate) mod engine;
pub mod explain;
#[doc(hidden)]
pub mod gourd_asserts;
pub(crate) mod provider;
pub(crate) mod requirement;
pub(crate) mod results;

pub use crate::basic_types::IntervalSet;
pub use crate::basic_types::SetRelation;
pub use crate::engine::incompatibility::Cause;
pub use crate::engine::incompatibility::Incompatibility;
pub use crate::engine::incompatibility::IncompatibilityId;
pub use crate::engine::term::Term;
pub use crate::engine::version_solver::resolve;
pub use crate::engine::version_solver::resolve_cancellable;
pub use crate::explain::ExplanationEvent;
pub use crate::explain::ExplanationKind;
pub use crate::explain::generate_explanation;
pub use crate::provider::DependencyProvider;
pub use crate::requirement::Requirement;
pub use crate::results::SolveError;
pub use crate::results::Unsolvable;
