//! Outcome envelope returned by every orchestrator operation.

use crate::error::SubmissionError;

/// Why an operation did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected locally before any network call.
    Validation,
    /// Non-2xx status, or a 2xx reply whose own `success` flag is false.
    RemoteRejection,
    /// Connection, timeout or DNS failure.
    Transport,
    Unexpected,
}

/// Built once per call and never mutated after it is returned.
#[derive(Debug)]
pub struct ServiceResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error_message: Option<String>,
    pub failure: Option<FailureKind>,
    /// Underlying fault for transport/unexpected failures.
    pub fault: Option<SubmissionError>,
}

impl<T> ServiceResult<T> {
    pub fn ok(data: T) -> Self {
        Self::completed(Some(data))
    }

    /// Successful call that may carry no payload (e.g. a `null` body).
    pub fn completed(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            error_message: None,
            failure: None,
            fault: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::failed(FailureKind::Validation, message, None)
    }

    pub fn rejected(message: impl Into<String>, data: Option<T>) -> Self {
        Self::failed(FailureKind::RemoteRejection, message, data)
    }

    pub fn faulted(message: impl Into<String>, fault: SubmissionError) -> Self {
        let kind = if fault.is_transport() {
            FailureKind::Transport
        } else {
            FailureKind::Unexpected
        };
        Self {
            fault: Some(fault),
            ..Self::failed(kind, message, None)
        }
    }

    fn failed(kind: FailureKind, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: false,
            data,
            error_message: Some(message.into()),
            failure: Some(kind),
            fault: None,
        }
    }

    /// Text of the underlying fault, if any.
    pub fn fault_message(&self) -> Option<String> {
        self.fault.as_ref().map(ToString::to_string)
    }
}
