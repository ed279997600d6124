//! End-to-end solves against small package repositories.

mod common;

use common::SimpleRequirement;
use common::TestRepo;
use common::init_logger;
use common::pkg;
use common::repo;
use common::req;
use gourd_solver::DependencyProvider;
use gourd_solver::Requirement;
use gourd_solver::resolve;

fn check_solve(
    repository: TestRepo,
    roots: Vec<SimpleRequirement>,
    expected: Vec<SimpleRequirement>,
) {
    init_logger();
    let solution = resolve(roots, &repository).expect("the scenario has a solution");
    assert_eq!(solution, expected);
}

#[test]
fn empty_requirements_solve_to_an_empty_solution() {
    check_solve(repo(vec![]), vec![], vec![]);
}

#[test]
fn a_single_package_without_requirements() {
    check_solve(
        repo(vec![pkg("foo", 1, vec![])]),
        vec![req("foo", 1, 2)],
        vec![req("foo", 1, 2)],
    );
}

#[test]
fn a_single_package_narrowed_from_a_wider_range() {
    check_solve(
        repo(vec![pkg("foo", 2, vec![])]),
        vec![req("foo", 1, 3)],
        vec![req("foo", 2, 3)],
    );
}

#[test]
fn the_preferred_candidate_among_several_is_chosen() {
    check_solve(
        repo(vec![
            pkg("foo", 1, vec![]),
            pkg("foo", 2, vec![]),
            pkg("foo", 3, vec![]),
            pkg("foo", 4, vec![]),
        ]),
        vec![req("foo", 1, 6)],
        vec![req("foo", 4, 5)],
    );
}

#[test]
fn a_simple_transitive_requirement() {
    check_solve(
        repo(vec![
            pkg("foo", 1, vec![req("bar", 3, 4)]),
            pkg("bar", 3, vec![]),
        ]),
        vec![req("foo", 1, 2)],
        vec![req("foo", 1, 2), req("bar", 3, 4)],
    );
}

#[test]
fn multiple_transitive_requirements() {
    check_solve(
        repo(vec![
            pkg("foo", 1, vec![req("bar", 3, 6), req("baz", 5, 23)]),
            pkg("bar", 5, vec![]),
            pkg("baz", 7, vec![]),
        ]),
        vec![req("foo", 1, 2)],
        vec![req("foo", 1, 2), req("bar", 5, 6), req("baz", 7, 8)],
    );
}

#[test]
fn basic_backtracking() {
    // 1. foo=1 is selected
    // 2. bar and baz are constrained by foo=1
    // 3. baz=6 wants bar in [4, 5), which rules bar=3 out
    check_solve(
        repo(vec![
            pkg("foo", 1, vec![req("bar", 1, 6), req("baz", 3, 8)]),
            pkg("bar", 3, vec![]),
            pkg("bar", 4, vec![]),
            pkg("baz", 6, vec![req("bar", 4, 5)]),
        ]),
        vec![req("foo", 1, 2)],
        vec![req("foo", 1, 2), req("bar", 4, 5), req("baz", 6, 7)],
    );
}

#[test]
fn simple_interdependencies() {
    check_solve(
        repo(vec![
            pkg("a", 1, vec![req("aa", 1, 2), req("ab", 1, 2)]),
            pkg("b", 1, vec![req("ba", 1, 2), req("bb", 1, 2)]),
            pkg("aa", 1, vec![]),
            pkg("ab", 1, vec![]),
            pkg("ba", 1, vec![]),
            pkg("bb", 1, vec![]),
        ]),
        vec![req("a", 1, 2), req("b", 1, 2)],
        vec![
            req("a", 1, 2),
            req("aa", 1, 2),
            req("ab", 1, 2),
            req("b", 1, 2),
            req("ba", 1, 2),
            req("bb", 1, 2),
        ],
    );
}

#[test]
fn overlapping_constraints_on_a_shared_dependency() {
    check_solve(
        repo(vec![
            pkg("a", 1, vec![req("shared", 200, 400)]),
            pkg("b", 1, vec![req("shared", 300, 500)]),
            pkg("shared", 200, vec![]),
            pkg("shared", 299, vec![]),
            pkg("shared", 369, vec![]),
            pkg("shared", 400, vec![]),
            pkg("shared", 500, vec![]),
        ]),
        vec![req("a", 1, 2), req("b", 1, 2)],
        vec![req("a", 1, 2), req("b", 1, 2), req("shared", 369, 370)],
    );
}

#[test]
fn circular_dependencies_are_solvable() {
    check_solve(
        repo(vec![
            pkg("foo", 1, vec![req("bar", 1, 2)]),
            pkg("bar", 1, vec![req("foo", 1, 2)]),
        ]),
        vec![req("foo", 1, 2)],
        vec![req("foo", 1, 2), req("bar", 1, 2)],
    );
}

#[test]
fn a_diamond_with_conflicting_inner_constraints() {
    // The preferred a=200 and b=200 disagree about c; only a=100 (which does not constrain c
    // at all) lets b keep its preferred version.
    check_solve(
        repo(vec![
            pkg("a", 100, vec![]),
            pkg("a", 200, vec![req("c", 100, 200)]),
            pkg("b", 100, vec![req("c", 200, 300)]),
            pkg("b", 200, vec![req("c", 300, 400)]),
            pkg("c", 100, vec![]),
            pkg("c", 200, vec![]),
            pkg("c", 300, vec![]),
        ]),
        vec![req("a", 1, 1000), req("b", 1, 1000)],
        vec![req("a", 100, 101), req("b", 200, 201), req("c", 300, 301)],
    );
}

#[test]
fn shared_requirements_with_interdependent_versioning() {
    check_solve(
        repo(vec![
            pkg("foo", 100, vec![]),
            pkg("foo", 101, vec![req("bang", 100, 101)]),
            pkg("foo", 102, vec![req("whoop", 100, 101)]),
            pkg("foo", 103, vec![req("zoop", 100, 101)]),
            pkg("bar", 100, vec![req("foo", 0, 102)]),
            pkg("bang", 100, vec![]),
            pkg("whoop", 100, vec![]),
            pkg("zoop", 100, vec![]),
        ]),
        vec![req("foo", 0, 103), req("bar", 100, 101)],
        vec![req("bar", 100, 101), req("foo", 101, 102), req("bang", 100, 101)],
    );
}

#[test]
fn solutions_are_closed_under_dependencies() {
    init_logger();
    let repository = repo(vec![
        pkg("a", 100, vec![]),
        pkg("a", 200, vec![req("c", 100, 200)]),
        pkg("b", 100, vec![req("c", 200, 300)]),
        pkg("b", 200, vec![req("c", 300, 400)]),
        pkg("c", 100, vec![]),
        pkg("c", 200, vec![]),
        pkg("c", 300, vec![]),
    ]);

    let solution = resolve(vec![req("a", 1, 1000), req("b", 1, 1000)], &repository)
        .expect("the diamond has a solution");

    // One decision per distinct package.
    let mut names: Vec<&str> = solution.iter().map(|decision| decision.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), solution.len());

    // Every dependency of a decided candidate is implied by some decision.
    for decision in &solution {
        for dependency in repository.requirements_of(decision) {
            assert!(
                solution.iter().any(|other| {
                    other.key() == dependency.key() && dependency.implied_by(other)
                }),
                "dependency {dependency:?} of {decision:?} is not covered by the solution"
            );
        }
    }
}
