//! A small package universe shared by the end-to-end solver tests.

use gourd_solver::DependencyProvider;
use gourd_solver::IntervalSet;
use gourd_solver::Requirement;

/// A named set of acceptable versions of a single package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleRequirement {
    pub name: String,
    pub range: IntervalSet<u32>,
}

impl SimpleRequirement {
    fn with_range(&self, range: IntervalSet<u32>) -> SimpleRequirement {
        SimpleRequirement {
            name: self.name.clone(),
            range,
        }
    }
}

impl Requirement for SimpleRequirement {
    type Key = String;

    fn key(&self) -> &String {
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

/// The requirement for versions `[low, high)` of the package `name`.
pub fn req(name: &str, low: u32, high: u32) -> SimpleRequirement {
    SimpleRequirement {
        name: name.to_owned(),
        range: IntervalSet::new(low, high),
    }
}

pub struct TestPackage {
    name: String,
    version: u32,
    requirements: Vec<SimpleRequirement>,
}

/// A package `name@version` with the given direct requirements.
pub fn pkg(name: &str, version: u32, requirements: Vec<SimpleRequirement>) -> TestPackage {
    TestPackage {
        name: name.to_owned(),
        version,
        requirements,
    }
}

pub struct TestRepo {
    packages: Vec<TestPackage>,
}

pub fn repo(packages: Vec<TestPackage>) -> TestRepo {
    TestRepo { packages }
}

impl DependencyProvider<SimpleRequirement> for TestRepo {
    fn best_candidate(&self, requirement: &SimpleRequirement) -> Option<SimpleRequirement> {
        self.packages
            .iter()
            .rev()
            .find(|package| {
                package.name == requirement.name
                    && requirement.range.contains_point(&package.version)
            })
            .map(|package| req(&package.name, package.version, package.version + 1))
    }

    fn requirements_of(&self, candidate: &SimpleRequirement) -> Vec<SimpleRequirement> {
        self.packages
            .iter()
            .find(|package| {
                package.name == candidate.name && candidate.range.contains_point(&package.version)
            })
            .map(|package| package.requirements.clone())
            .expect("the provider is only asked about candidates it returned")
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
