use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::SetRelation;
use crate::gourd_assert_moderate;
use crate::requirement::Requirement;

/// A signed requirement.
///
/// A positive term holds when the version chosen for its package lies in the requirement's set;
/// a negative term holds when it does not. The set algebra of [`Requirement`] is lifted to
/// signed terms by case analysis on the sign quadrant, which is what lets the solver reason
/// about statements like "any version of `foo` except `[2, 3)`" with the same machinery as
/// ordinary requirements.
///
/// Set operations are only defined between terms with the same key; this is the caller's
/// responsibility, as it is for [`Requirement`] itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term<R> {
    requirement: R,
    positive: bool,
}

impl<R: Requirement> Term<R> {
    /// Creates the term which holds when the chosen version lies in `requirement`.
    pub fn positive(requirement: R) -> Self {
        Term {
            requirement,
            positive: true,
        }
    }

    /// Creates the term which holds when the chosen version does not lie in `requirement`.
    pub fn negative(requirement: R) -> Self {
        Term {
            requirement,
            positive: false,
        }
    }

    pub fn requirement(&self) -> &R {
        &self.requirement
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }

    pub fn key(&self) -> &R::Key {
        self.requirement.key()
    }

    /// The term which holds exactly when this term does not.
    pub fn inverse(&self) -> Term<R> {
        Term {
            requirement: self.requirement.clone(),
            positive: !self.positive,
        }
    }

    /// The term that holds exactly when both inputs hold, or `None` when no version satisfies
    /// both.
    ///
    /// # Panics
    /// The intersection of two negative terms is the complement of the union of their
    /// requirements. When that union is not representable as a single requirement the result
    /// cannot be expressed as a term; the solver never constructs such a pair, so hitting this
    /// case is a bug and the solve is aborted with a diagnostic.
    pub fn intersection(&self, other: &Term<R>) -> Option<Term<R>> {
        gourd_assert_moderate!(
            self.key() == other.key(),
            "set operations are only defined on terms with equal keys"
        );
        match (self.positive, other.positive) {
            (true, true) => self
                .requirement
                .intersection(&other.requirement)
                .map(Term::positive),
            (false, false) => {
                // this: %%%%%%%%%%%%%%--------------%%%%%%%%%%%%%%%%%%
                // that: %%%%%%%%%%%-------------%%%%%%%%%%%%%%%%%%%%%%
                // both: %%%%%%%%%%%-----------------%%%%%%%%%%%%%%%%%%
                let union = self.requirement.union(&other.requirement).unwrap_or_else(|| {
                    panic!(
                        "the union of two negative terms was not representable as a single \
                         requirement; this is a bug in the solver"
                    )
                });
                Some(Term::negative(union))
            }
            (true, false) => {
                // this: ---------%%%%%%%%%------------------------
                // that: %%%%%%%%%%%%--------%%%%%%%%%%%%%%%%%%%%%%
                // both: ---------%%%------------------------------
                self.requirement
                    .difference(&other.requirement)
                    .map(Term::positive)
            }
            (false, true) => other.intersection(self),
        }
    }

    /// The term that holds exactly when either input holds, or `None` when the result admits no
    /// version.
    pub fn union(&self, other: &Term<R>) -> Option<Term<R>> {
        gourd_assert_moderate!(
            self.key() == other.key(),
            "set operations are only defined on terms with equal keys"
        );
        match (self.positive, other.positive) {
            (true, true) => self
                .requirement
                .union(&other.requirement)
                .map(Term::positive),
            (false, false) => self
                .requirement
                .union(&other.requirement)
                .map(Term::negative),
            (true, false) => {
                // this: ---------%%%%%%%%%------------------------
                // that: %%%%%%%%%%%%--------%%%%%%%%%%%%%%%%%%%%%%
                // both: %%%%%%%%%%%%%%%%%%--%%%%%%%%%%%%%%%%%%%%%%
                other
                    .requirement
                    .difference(&self.requirement)
                    .map(Term::negative)
            }
            (false, true) => other.union(self),
        }
    }

    /// The term that holds exactly when this term holds and `other` does not, or `None` when
    /// the result admits no version.
    pub fn difference(&self, other: &Term<R>) -> Option<Term<R>> {
        gourd_assert_moderate!(
            self.key() == other.key(),
            "set operations are only defined on terms with equal keys"
        );
        match (self.positive, other.positive) {
            (true, true) => self
                .requirement
                .difference(&other.requirement)
                .map(Term::positive),
            (true, false) => {
                // this: ---%%%%%%%%%---------
                // that: %%%%%%-----%%%%%%%%%%
                // res:  ------%%%%%----------
                self.requirement
                    .intersection(&other.requirement)
                    .map(Term::positive)
            }
            (false, true) => {
                // this: %%%%%%----%%%%%%%%%%%
                // that: ----%%%%%%%%%%%------
                // res:  %%%%-----------%%%%%%
                self.requirement
                    .union(&other.requirement)
                    .map(Term::negative)
            }
            (false, false) => {
                // this: %%%%%%--------%%%%%%%%
                // that: %%%%%%%%%%%-----%%%%%%
                // res:  --------------%%------
                other
                    .requirement
                    .difference(&self.requirement)
                    .map(Term::positive)
            }
        }
    }

    /// Whether `other` implies this term, that is: every version satisfying `other` also
    /// satisfies this term.
    pub fn implied_by(&self, other: &Term<R>) -> bool {
        if self.key() != other.key() {
            // Unrelated terms cannot imply each other
            return false;
        }
        match (self.positive, other.positive) {
            (true, true) => self.requirement.implied_by(&other.requirement),
            // A positive term cannot contain the unbounded complement of a negative one
            (true, false) => false,
            (false, true) => self.requirement.excludes(&other.requirement),
            (false, false) => other.requirement.implied_by(&self.requirement),
        }
    }

    /// Whether this term implies `other`. This is a convenience method for
    /// `other.implied_by(self)`.
    pub fn implies(&self, other: &Term<R>) -> bool {
        other.implied_by(self)
    }

    /// Whether the two terms share no satisfying version and thus cannot hold simultaneously.
    pub fn excludes(&self, other: &Term<R>) -> bool {
        if self.key() != other.key() {
            // Unrelated terms cannot exclude each other
            return false;
        }
        match (self.positive, other.positive) {
            (true, true) => self.requirement.excludes(&other.requirement),
            // Mutual exclusion is reflexive; deal with the negative on the left-hand side
            (true, false) => other.excludes(self),
            (false, true) => self.requirement.implied_by(&other.requirement),
            // Two negative terms always share the versions outside both requirements
            (false, false) => false,
        }
    }

    /// Classifies how `other` relates to this term; see [`SetRelation`].
    pub fn relation_to(&self, other: &Term<R>) -> SetRelation {
        gourd_assert_moderate!(
            self.key() == other.key(),
            "terms can only be related when their keys are equal"
        );
        if self.implies(other) {
            SetRelation::Subset
        } else if self.excludes(other) {
            SetRelation::Disjoint
        } else {
            SetRelation::Overlap
        }
    }
}

impl<R: Display> Display for Term<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.positive {
            write!(f, "[{}]", self.requirement)
        } else {
            write!(f, "[not {}]", self.requirement)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::IntervalSet;
    use crate::engine::test_requirement::Versions;
    use crate::engine::test_requirement::req;

    fn foo(low: u32, high: u32) -> Versions {
        req("foo", low, high)
    }

    #[test]
    fn implication_and_exclusion_of_positive_ranges() {
        let cases: [(IntervalSet<u32>, IntervalSet<u32>, bool, bool, bool); 5] = [
            (IntervalSet::new(1, 2), IntervalSet::new(3, 4), false, false, true),
            (IntervalSet::new(1, 2), IntervalSet::new(2, 3), false, false, true),
            (IntervalSet::new(1, 2), IntervalSet::new(1, 3), true, false, false),
            (IntervalSet::new(1, 2), IntervalSet::new(1, 2), true, true, false),
            (IntervalSet::new(1, 3), IntervalSet::new(1, 2), false, true, false),
        ];

        for (range_a, range_b, expect_implies, inverse_implies, expect_excludes) in cases {
            let a = Term::positive(foo(1, 2).with_range(range_a));
            let b = Term::positive(foo(1, 2).with_range(range_b));

            assert_eq!(a.implies(&b), expect_implies);
            assert_eq!(b.implies(&a), inverse_implies);
            assert_eq!(a.excludes(&b), expect_excludes);
            assert_eq!(b.excludes(&a), expect_excludes);
        }
    }

    #[test]
    fn equal_negative_terms_imply_each_other() {
        let a = Term::negative(foo(30, 40));
        let b = Term::negative(foo(30, 40));
        assert!(a.implies(&b));
        assert!(b.implies(&a));
    }

    #[test]
    fn negative_term_is_implied_by_a_disjoint_positive_term() {
        let not_a = Term::negative(foo(1, 5));
        let b = Term::positive(foo(7, 9));
        assert!(not_a.implied_by(&b));
        assert!(!not_a.implied_by(&Term::positive(foo(4, 9))));
    }

    #[test]
    fn intersection_of_positive_and_negative_keeps_the_uncovered_versions() {
        let a = Term::negative(foo(1, 2));
        let b = Term::positive(foo(2, 3));

        let both = a.intersection(&b).unwrap();
        assert!(both.is_positive());
        assert_eq!(both.requirement(), &foo(2, 3));
    }

    #[test]
    fn intersection_of_overlapping_negative_terms_is_the_negative_union() {
        let a = Term::negative(foo(1, 5));
        let b = Term::negative(foo(3, 8));

        let both = a.intersection(&b).unwrap();
        assert!(!both.is_positive());
        assert_eq!(both.requirement(), &foo(1, 8));
    }

    #[test]
    fn intersection_is_associative_where_defined() {
        let a = Term::positive(foo(1, 8));
        let b = Term::negative(foo(3, 5));
        let c = Term::positive(foo(2, 7));

        let left = a.intersection(&b).unwrap().intersection(&c);
        let right = a.intersection(&b.intersection(&c).unwrap());
        assert_eq!(left, right);
    }

    #[test]
    fn intersection_is_commutative() {
        let a = Term::positive(foo(1, 6));
        let b = Term::negative(foo(4, 9));

        assert_eq!(a.intersection(&b), b.intersection(&a));
        assert_eq!(
            a.intersection(&b).unwrap().requirement(),
            &foo(1, 4)
        );
    }

    #[test]
    fn difference_against_a_negative_term_is_the_overlap() {
        // this: ---%%%%%%%%%---------
        // that: %%%%%%-----%%%%%%%%%%
        let a = Term::positive(foo(2, 6));
        let b = Term::negative(foo(4, 8));

        let diff = a.difference(&b).unwrap();
        assert!(diff.is_positive());
        assert_eq!(diff.requirement(), &foo(4, 6));
    }

    #[test]
    fn union_of_a_positive_and_covering_negative_term_is_everything() {
        let a = Term::positive(foo(2, 6));
        let b = Term::negative(foo(2, 6));
        // The union admits every version, leaving no requirement set to negate.
        assert_eq!(a.union(&b), None);
    }

    #[test]
    fn inverse_is_an_involution() {
        let term = Term::negative(foo(3, 12));
        assert_eq!(term.inverse().inverse(), term);
    }

    #[test]
    fn display_marks_negative_terms() {
        assert_eq!(Term::positive(foo(1, 2)).to_string(), "[foo [1, 2)]");
        assert_eq!(Term::negative(foo(1, 2)).to_string(), "[not foo [1, 2)]");
    }

    #[test]
    fn relation_matches_implication_and_exclusion() {
        let a = Term::positive(foo(2, 4));
        let wider = Term::positive(foo(1, 6));
        let disjoint = Term::positive(foo(6, 8));
        let overlap = Term::positive(foo(3, 8));

        assert_eq!(a.relation_to(&wider), SetRelation::Subset);
        assert!(wider.implied_by(&a));
        assert_eq!(a.relation_to(&disjoint), SetRelation::Disjoint);
        assert!(a.excludes(&disjoint));
        assert_eq!(a.relation_to(&overlap), SetRelation::Overlap);
    }
}
