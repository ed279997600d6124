//! Cooperative cancellation of a running solve.
//!
//! The solver has no suspension points, so it cannot be stopped from the outside; instead it
//! polls a [`Cancellation`] between propagation steps and abandons the solve with
//! [`SolveError::Cancelled`][crate::SolveError::Cancelled] once cancellation is reported. Any
//! `FnMut() -> bool` closure works as a cancel predicate; [`Deadline`] and [`CancelToken`]
//! cover the two common cases of a time limit and of another thread asking the solve to stop.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// A cancel predicate polled by the solver between propagation steps.
pub trait Cancellation {
    /// Returning `true` makes the solver abandon the solve.
    fn is_cancelled(&mut self) -> bool;
}

impl<F: FnMut() -> bool> Cancellation for F {
    fn is_cancelled(&mut self) -> bool {
        self()
    }
}

/// Cancels the solve once a point in time has passed.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    /// The deadline which expires `timeout` from now.
    pub fn after(timeout: Duration) -> Deadline {
        Deadline {
            expires_at: Instant::now() + timeout,
        }
    }

    /// The deadline which expires at the given point in time.
    pub fn at(expires_at: Instant) -> Deadline {
        Deadline { expires_at }
    }
}

impl Cancellation for Deadline {
    fn is_cancelled(&mut self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// A handle through which a solve can be cancelled from outside, typically by another thread.
///
/// Clones share their state: handing one clone to the solver and keeping another is what makes
/// [`CancelToken::cancel`] reach a solve in progress.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Makes every solve polling this token abandon its next propagation step.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl Cancellation for CancelToken {
    fn is_cancelled(&mut self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
