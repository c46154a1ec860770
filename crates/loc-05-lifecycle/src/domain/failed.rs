//! # Failed Transitions

use shared_types::LocError;
use std::error::Error;
use std::fmt;

/// A transition that did not happen: the untouched state and the cause.
///
/// The state is still live and may be used to retry or to try something
/// else. Converts into [`LocError`] for `?`.
#[derive(Debug)]
pub struct Failed<S> {
    /// State the transition was called on.
    pub state: S,
    /// Cause of the failure.
    pub error: LocError,
}

impl<S> Failed<S> {
    /// Pair a state with its error.
    pub fn new(state: S, error: LocError) -> Self {
        Self { state, error }
    }

    /// Recover the state.
    pub fn into_state(self) -> S {
        self.state
    }

    /// Cause of the failure.
    pub fn error(&self) -> &LocError {
        &self.error
    }
}

impl<S> fmt::Display for Failed<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transition failed: {}", self.error)
    }
}

impl<S: fmt::Debug> Error for Failed<S> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

impl<S> From<Failed<S>> for LocError {
    fn from(failed: Failed<S>) -> Self {
        failed.error
    }
}

/// Attach `state` to the error of `outcome`.
pub(crate) fn settle<S, T>(state: S, outcome: Result<T, LocError>) -> Result<T, Failed<S>> {
    outcome.map_err(|error| Failed::new(state, error))
}
