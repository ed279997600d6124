//! Structured traversal of the conflict derivation carried by an [`Unsolvable`] failure.
//!
//! The solver does not render human-readable reports itself. Instead,
//! [`generate_explanation`] walks the derivation from its terminal conflict and emits a stream
//! of [`ExplanationEvent`]s: the premises of each derivation step, the conclusion they lead
//! to, and separators between independent derivation chains. A handler turns the stream into
//! whatever presentation the client needs.

use crate::engine::incompatibility::Cause;
use crate::engine::incompatibility::Incompatibility;
use crate::requirement::Requirement;
use crate::results::Unsolvable;

/// What a single incompatibility of a failed solve means, classified by the shape of its terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplanationKind<'a, R> {
    /// The terminal, term-less conflict: nothing can satisfy the roots.
    NoSolution,
    /// `dependent` requires `dependency`.
    Dependency { dependent: &'a R, dependency: &'a R },
    /// The two requirements cannot hold at the same time.
    Conflict { left: &'a R, right: &'a R },
    /// No version in the requirement is acceptable.
    Disallowed { requirement: &'a R },
    /// No candidate exists for the requirement.
    Unavailable { requirement: &'a R },
    /// The requirement must hold for any solution.
    Needed { requirement: &'a R },
    /// `left` and `right` together force `result`.
    Compromise {
        left: &'a R,
        right: &'a R,
        result: &'a R,
    },
}

/// One step of the explanation stream produced by [`generate_explanation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplanationEvent<'a, R> {
    /// A fact the following conclusion builds on.
    Premise(ExplanationKind<'a, R>),
    /// A consequence of the premises emitted since the last conclusion.
    Conclusion(ExplanationKind<'a, R>),
    /// A break between two independent derivation chains.
    Separator,
}

/// Walks the derivation of `failure` and feeds the resulting events to `handler`.
pub fn generate_explanation<'a, R, F>(failure: &'a Unsolvable<R>, handler: F)
where
    R: Requirement,
    F: FnMut(ExplanationEvent<'a, R>),
{
    let mut writer = FailureWriter { failure, handler };
    writer.generate_for(failure.root());
}

struct FailureWriter<'a, R: Requirement, F> {
    failure: &'a Unsolvable<R>,
    handler: F,
}

impl<'a, R, F> FailureWriter<'a, R, F>
where
    R: Requirement,
    F: FnMut(ExplanationEvent<'a, R>),
{
    /// Classifies a single incompatibility by the shape of its terms.
    fn classify(&self, incompatibility: &'a Incompatibility<R>) -> ExplanationKind<'a, R> {
        let positives: Vec<&'a R> = incompatibility
            .terms()
            .iter()
            .filter(|term| term.is_positive())
            .map(|term| term.requirement())
            .collect();
        let negatives: Vec<&'a R> = incompatibility
            .terms()
            .iter()
            .filter(|term| !term.is_positive())
            .map(|term| term.requirement())
            .collect();

        match (positives.as_slice(), negatives.as_slice()) {
            (&[], &[]) => ExplanationKind::NoSolution,
            // A single positive term means the requirement has been ruled out entirely.
            (&[requirement], &[]) => {
                if matches!(incompatibility.cause(), Cause::Unavailable) {
                    ExplanationKind::Unavailable { requirement }
                } else {
                    ExplanationKind::Disallowed { requirement }
                }
            }
            // A single negative term means the requirement is absolute.
            (&[], &[requirement]) => ExplanationKind::Needed { requirement },
            (&[dependent], &[dependency]) => ExplanationKind::Dependency {
                dependent,
                dependency,
            },
            (&[left, right], &[]) => ExplanationKind::Conflict { left, right },
            (&[left, right], &[result]) => ExplanationKind::Compromise {
                left,
                right,
                result,
            },
            _ => panic!(
                "hit an unknown incompatibility shape while generating the explanation; \
                 this is a bug in the solver"
            ),
        }
    }

    fn premise(&mut self, incompatibility: &'a Incompatibility<R>) {
        let kind = self.classify(incompatibility);
        (self.handler)(ExplanationEvent::Premise(kind));
    }

    fn conclusion(&mut self, incompatibility: &'a Incompatibility<R>) {
        let kind = self.classify(incompatibility);
        (self.handler)(ExplanationEvent::Conclusion(kind));
    }

    fn separator(&mut self) {
        (self.handler)(ExplanationEvent::Separator);
    }

    /// Whether both parents of a derived incompatibility are external facts.
    fn is_doubly_external(&self, incompatibility: &Incompatibility<R>) -> bool {
        let Cause::Conflict { left, right } = incompatibility.cause() else {
            return false;
        };
        !self.failure.get(left).is_derived() && !self.failure.get(right).is_derived()
    }

    fn generate_for(&mut self, incompatibility: &'a Incompatibility<R>) {
        if let Cause::Conflict { left, right } = incompatibility.cause() {
            self.generate_for_derived(
                incompatibility,
                self.failure.get(left),
                self.failure.get(right),
            );
        }
    }

    fn generate_for_derived(
        &mut self,
        incompatibility: &'a Incompatibility<R>,
        left: &'a Incompatibility<R>,
        right: &'a Incompatibility<R>,
    ) {
        match (left.is_derived(), right.is_derived()) {
            (true, true) => self.generate_complex(incompatibility, left, right),
            (true, false) => self.generate_partial(incompatibility, left, right),
            (false, true) => self.generate_partial(incompatibility, right, left),
            (false, false) => {
                self.premise(left);
                self.premise(right);
                self.conclusion(incompatibility);
            }
        }
    }

    /// One parent is derived and the other external. When the derived parent itself has
    /// exactly one derived parent, its conclusion is folded into this step so that the most
    /// recent derivation stays adjacent to the conclusion it feeds.
    fn generate_partial(
        &mut self,
        child: &'a Incompatibility<R>,
        derived: &'a Incompatibility<R>,
        external: &'a Incompatibility<R>,
    ) {
        let Cause::Conflict { left, right } = derived.cause() else {
            unreachable!("generate_partial is only called with a derived incompatibility")
        };
        let left = self.failure.get(left);
        let right = self.failure.get(right);

        match (left.is_derived(), right.is_derived()) {
            (true, false) => {
                self.generate_for(left);
                self.premise(right);
                self.premise(external);
                self.conclusion(child);
            }
            (false, true) => {
                self.generate_for(right);
                self.premise(left);
                self.premise(external);
                self.conclusion(child);
            }
            _ => {
                self.generate_for(derived);
                self.premise(external);
                self.conclusion(child);
            }
        }
    }

    /// Both parents are derived. The recursion order keeps a doubly-external parent adjacent
    /// to the conclusion it feeds; when neither qualifies, the two subtrees are generated
    /// independently with separators between them.
    fn generate_complex(
        &mut self,
        child: &'a Incompatibility<R>,
        parent_left: &'a Incompatibility<R>,
        parent_right: &'a Incompatibility<R>,
    ) {
        if self.is_doubly_external(parent_left) {
            self.generate_for(parent_right);
            self.generate_for(parent_left);
            self.conclusion(child);
        } else if self.is_doubly_external(parent_right) {
            self.generate_for(parent_left);
            self.generate_for(parent_right);
            self.conclusion(child);
        } else {
            self.generate_for(parent_left);
            self.separator();
            self.generate_for(parent_right);
            self.separator();
            self.premise(parent_left);
            self.conclusion(child);
        }
    }
}
