//! Per-operation state and transition outcomes.
//!
//! The controller runs three independent asynchronous operations. Each kind
//! carries its own in-flight flag so a duplicate submission of the same kind
//! can be swallowed while other kinds proceed.

use serde::{Deserialize, Serialize};

use std::fmt;

/// The asynchronous operations the controller coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Chat,
    Upload,
    Fill,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Chat => write!(f, "chat"),
            OperationKind::Upload => write!(f, "upload"),
            OperationKind::Fill => write!(f, "fill"),
        }
    }
}

/// Loading and error state for one operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationState {
    pub in_flight: bool,
    pub last_error: Option<String>,
}

impl OperationState {
    /// Idle -> InFlight. Clears the previous error.
    pub fn begin(&mut self) {
        self.in_flight = true;
        self.last_error = None;
    }

    /// InFlight -> Idle after a successful call.
    pub fn succeed(&mut self) {
        self.in_flight = false;
    }

    /// InFlight -> Idle after a failed call, keeping the surfaced text.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.in_flight = false;
        self.last_error = Some(error.into());
    }
}

/// Why an operation returned without doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Another call of the same kind is still in flight.
    InFlight,
    /// Chat input was empty after trimming.
    EmptyMessage,
    /// Form fill requested with nothing selected.
    NoFormSelected,
    /// The catalog has already been fetched.
    AlreadyLoaded,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InFlight => write!(f, "already in flight"),
            SkipReason::EmptyMessage => write!(f, "empty message"),
            SkipReason::NoFormSelected => write!(f, "no form selected"),
            SkipReason::AlreadyLoaded => write!(f, "already loaded"),
        }
    }
}

/// Outcome of one operation invocation.
///
/// Failures have already been recorded on the timeline and banner by the
/// time a caller sees `Failed`; the reason is the bare backend text without
/// the operation prefix.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<T> {
    Completed(T),
    Failed(String),
    Skipped(SkipReason),
}

impl<T> Transition<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Transition::Completed(_))
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Transition::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn skipped(&self) -> Option<SkipReason> {
        match self {
            Transition::Skipped(reason) => Some(*reason),
            _ => None,
        }
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Transition::Completed(value) => Some(value),
            _ => None,
        }
    }
}
