//! Product workflows: each one drives the calls behind a dashboard page.

pub mod export;
pub mod mount;
pub mod publish;
pub mod script;
pub mod stats;
pub mod video;

use std::fmt;

use crate::api::ApiError;
use crate::exports::ExportStoreError;
use crate::phase::TrackerError;

#[derive(Debug)]
pub enum WorkflowError {
    /// Rejected before any network call.
    Validation(String),
    /// A previous run of the same operation is still in flight.
    Busy,
    /// A tracked operation failed; the message is what the tracker recorded.
    Failed(String),
    /// An untracked call failed with a typed API error.
    Api(ApiError),
    Store(ExportStoreError),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Validation(message) => write!(f, "{message}"),
            WorkflowError::Busy => write!(f, "an operation is already in progress"),
            WorkflowError::Failed(message) => write!(f, "{message}"),
            WorkflowError::Api(err) => write!(f, "API error: {err}"),
            WorkflowError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WorkflowError {}

impl From<TrackerError> for WorkflowError {
    fn from(value: TrackerError) -> Self {
        match value {
            TrackerError::Busy => WorkflowError::Busy,
            TrackerError::Invalid(message) => WorkflowError::Validation(message),
            TrackerError::Failed(message) => WorkflowError::Failed(message),
        }
    }
}

impl From<ApiError> for WorkflowError {
    fn from(value: ApiError) -> Self {
        WorkflowError::Api(value)
    }
}

impl From<ExportStoreError> for WorkflowError {
    fn from(value: ExportStoreError) -> Self {
        WorkflowError::Store(value)
    }
}
