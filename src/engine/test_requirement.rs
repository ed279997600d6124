//! A small requirement implementation over [`IntervalSet`] used by the unit tests of the
//! engine.

use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::IntervalSet;
use crate::requirement::Requirement;

/// A named set of acceptable versions of a single package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Versions {
    pub(crate) name: &'static str,
    pub(crate) range: IntervalSet<u32>,
}

impl Versions {
    pub(crate) fn with_range(&self, range: IntervalSet<u32>) -> Versions {
        Versions {
            name: self.name,
            range,
        }
    }
}

/// The requirement for versions `[low, high)` of the package `name`.
pub(crate) fn req(name: &'static str, low: u32, high: u32) -> Versions {
    Versions {
        name,
        range: IntervalSet::new(low, high),
    }
}

impl Requirement for Versions {
    type Key = &'static str;

    fn key(&self) -> &Self::Key {
        &self.name
    }

    fn intersection(&self, other: &Self) -> Option<Self> {
        let range = self.range.intersection(&other.range);
        (!range.is_empty()).then(|| self.with_range(range))
    }

    fn union(&self, other: &Self) -> Option<Self> {
        let range = self.range.union(&other.range);
        (!range.is_empty()).then(|| self.with_range(range))
    }

    fn difference(&self, other: &Self) -> Option<Self> {
        let range = self.range.difference(&other.range);
        (!range.is_empty()).then(|| self.with_range(range))
    }

    fn implied_by(&self, other: &Self) -> bool {
        self.range.contains(&other.range)
    }

    fn excludes(&self, other: &Self) -> bool {
        self.range.disjoint(&other.range)
    }
}

impl Display for Versions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.range)
    }
}
