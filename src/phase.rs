//! Generic state holder for one asynchronous operation.
//!
//! Every workflow in the product drives the same four-state lifecycle:
//! nothing has happened yet, a request is in flight, a payload arrived, or
//! the attempt failed. Declaring it once keeps the per-workflow code down to
//! the calls themselves.

use std::fmt;
use std::future::Future;

use tracing::debug;

/// Lifecycle of one async operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    Pending,
    Ok(T),
    Err(String),
}

impl<T> Default for Phase<T> {
    fn default() -> Self {
        Phase::Idle
    }
}

impl<T> Phase<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Phase::Pending)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Phase::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Phase::Err(_))
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Phase::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn err(&self) -> Option<&str> {
        match self {
            Phase::Err(message) => Some(message),
            _ => None,
        }
    }
}

/// Why a tracker refused or failed a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// A run is already in flight; the caller must wait for it to settle.
    Busy,
    /// A precondition failed before any request was made.
    Invalid(String),
    /// The operation itself failed.
    Failed(String),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Busy => write!(f, "an operation is already in progress"),
            TrackerError::Invalid(message) => write!(f, "{message}"),
            TrackerError::Failed(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for TrackerError {}

/// Drives exactly one async operation at a time and records its phase.
#[derive(Debug, Clone)]
pub struct Tracker<T> {
    phase: Phase<T>,
    label: &'static str,
}

impl<T: Clone> Tracker<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            phase: Phase::Idle,
            label,
        }
    }

    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }

    /// Rejects the attempt before any request is made. The phase records the
    /// validation message without ever passing through `Pending`.
    pub fn reject(&mut self, message: impl Into<String>) -> TrackerError {
        let message = message.into();
        self.phase = Phase::Err(message.clone());
        TrackerError::Invalid(message)
    }

    /// Runs one operation to completion. Refuses to start while a previous
    /// run is still pending, so a double trigger cannot race the in-flight
    /// request.
    pub async fn run<E>(
        &mut self,
        op: impl Future<Output = Result<T, E>>,
    ) -> Result<T, TrackerError>
    where
        E: fmt::Display,
    {
        if self.phase.is_pending() {
            return Err(TrackerError::Busy);
        }

        debug!("{}: request started", self.label);
        self.phase = Phase::Pending;

        match op.await {
            Ok(value) => {
                self.phase = Phase::Ok(value.clone());
                debug!("{}: request succeeded", self.label);
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                self.phase = Phase::Err(message.clone());
                debug!("{}: request failed: {message}", self.label);
                Err(TrackerError::Failed(message))
            }
        }
    }

    /// Returns the tracker to its initial state for a fresh attempt.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_stores_payload() {
        let mut tracker: Tracker<String> = Tracker::new("test");
        assert!(tracker.phase().is_idle());

        let value = tracker
            .run(async { Ok::<_, TrackerError>("hello".to_string()) })
            .await
            .expect("run succeeds");

        assert_eq!(value, "hello");
        assert_eq!(tracker.phase().ok().map(String::as_str), Some("hello"));
    }

    #[tokio::test]
    async fn failure_records_message_and_no_payload() {
        let mut tracker: Tracker<String> = Tracker::new("test");

        let err = tracker
            .run(async { Err::<String, _>(TrackerError::Failed("boom".into())) })
            .await
            .expect_err("run fails");

        assert_eq!(err, TrackerError::Failed("boom".into()));
        assert!(tracker.phase().is_err());
        assert!(tracker.phase().ok().is_none());
    }

    #[tokio::test]
    async fn rejection_never_reaches_pending() {
        let mut tracker: Tracker<String> = Tracker::new("test");
        let err = tracker.reject("prompt must not be empty");
        assert_eq!(err, TrackerError::Invalid("prompt must not be empty".into()));
        assert_eq!(tracker.phase().err(), Some("prompt must not be empty"));
    }

    #[tokio::test]
    async fn reset_returns_to_idle() {
        let mut tracker: Tracker<u32> = Tracker::new("test");
        tracker
            .run(async { Ok::<_, TrackerError>(7) })
            .await
            .expect("run succeeds");
        tracker.reset();
        assert!(tracker.phase().is_idle());
    }
}
