//! Single-flight gate
//!
//! Collapses concurrent requests for the same asynchronous result into one
//! execution. The first caller becomes the *leader* and does the work; callers
//! arriving while it runs become *waiters* and receive a clone of the leader's
//! outcome, in the order they arrived.
//!
//! The in-progress flag and the waiter queue live under one short-lived
//! mutex that is never held across an `.await`.

use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Returned to waiters when the leader was dropped before completing
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("single-flight leader dropped before completing")]
pub struct FlightAbandoned;

struct FlightState<T, E> {
    in_progress: bool,
    waiters: Vec<oneshot::Sender<Result<T, E>>>,
}

/// Gate that runs one asynchronous job at a time and shares its outcome
/// with the callers queued behind it
pub struct SingleFlight<T, E> {
    state: Mutex<FlightState<T, E>>,
}

/// What a caller of [`SingleFlight::join_or`] has to do next
pub enum Role<'a, T, E> {
    /// Nothing in flight: do the work and report through the guard
    Leader(FlightGuard<'a, T, E>),
    /// Work already in flight: await its outcome
    Waiter(Waiter<T, E>),
    /// The shortcut produced a value, no work needed
    Ready(T),
}

impl<T, E> Default for SingleFlight<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> SingleFlight<T, E> {
    #[must_use]
    pub const fn new() -> Self {
        Self { state: Mutex::new(FlightState { in_progress: false, waiters: Vec::new() }) }
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.lock().in_progress
    }

    pub fn waiter_count(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Join the current flight, start a new one, or short-circuit.
    ///
    /// `shortcut` runs under the gate's lock and only when nothing is in
    /// flight, so a result published by a leader that just finished is seen
    /// atomically with the decision to start another flight. Keep it cheap
    /// and never block in it.
    pub fn join_or(&self, shortcut: impl FnOnce() -> Option<T>) -> Role<'_, T, E> {
        let mut state = self.state.lock();
        if state.in_progress {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            return Role::Waiter(Waiter { rx });
        }
        if let Some(value) = shortcut() {
            return Role::Ready(value);
        }
        state.in_progress = true;
        Role::Leader(FlightGuard { flight: self, completed: false })
    }

    /// Run `work` at most once across concurrent callers.
    ///
    /// Waiters whose leader is dropped mid-flight get `on_abandoned()`.
    ///
    /// # Errors
    /// Returns the leader's error (cloned for every waiter).
    pub async fn run<F, Fut>(
        &self,
        shortcut: impl FnOnce() -> Option<T>,
        work: F,
        on_abandoned: impl FnOnce() -> E,
    ) -> Result<T, E>
    where
        T: Clone,
        E: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.join_or(shortcut) {
            Role::Ready(value) => Ok(value),
            Role::Waiter(waiter) => {
                waiter.wait().await.unwrap_or_else(|FlightAbandoned| Err(on_abandoned()))
            }
            Role::Leader(guard) => {
                let outcome = work().await;
                guard.complete(outcome)
            }
        }
    }
}

/// Held by the leader for the duration of the flight
///
/// Dropping it without calling [`FlightGuard::complete`] clears the flag and
/// releases every waiter with [`FlightAbandoned`].
#[must_use = "dropping the guard abandons the flight"]
pub struct FlightGuard<'a, T, E> {
    flight: &'a SingleFlight<T, E>,
    completed: bool,
}

impl<T: Clone, E: Clone> FlightGuard<'_, T, E> {
    /// Publish `outcome` to all waiters in arrival order and end the flight.
    ///
    /// # Errors
    /// Hands `outcome` back unchanged.
    pub fn complete(mut self, outcome: Result<T, E>) -> Result<T, E> {
        let waiters = self.finish();
        for waiter in waiters {
            // A waiter that gave up has dropped its receiver
            let _ = waiter.send(outcome.clone());
        }
        outcome
    }
}

impl<T, E> FlightGuard<'_, T, E> {
    fn finish(&mut self) -> Vec<oneshot::Sender<Result<T, E>>> {
        self.completed = true;
        let mut state = self.flight.state.lock();
        state.in_progress = false;
        std::mem::take(&mut state.waiters)
    }
}

impl<T, E> Drop for FlightGuard<'_, T, E> {
    fn drop(&mut self) {
        if !self.completed {
            drop(self.finish());
        }
    }
}

/// Receiving end for a caller queued behind a leader
pub struct Waiter<T, E> {
    rx: oneshot::Receiver<Result<T, E>>,
}

impl<T, E> Waiter<T, E> {
    /// # Errors
    /// `FlightAbandoned` if the leader was dropped without completing.
    pub async fn wait(self) -> Result<Result<T, E>, FlightAbandoned> {
        self.rx.await.map_err(|_| FlightAbandoned)
    }
}
