//! Faults raised inside a KRA eTIMS call.
//!
//! These never leave [`crate::KraEtimsService`]'s public operations; they are
//! mapped onto a [`crate::ServiceResult`] at the boundary.

use thiserror::Error;

use etims_invoicing::CodecError;

#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Connection refused, timeout, DNS, or a broken body stream.
    #[error("{0}")]
    Transport(reqwest::Error),

    /// The request could not be built (e.g. an invalid URL).
    #[error("{0}")]
    Request(reqwest::Error),

    #[error("KRA base URL is not configured")]
    MissingBaseUrl,

    #[error("invalid KRA endpoint URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Request(err)
        } else {
            Self::Transport(err)
        }
    }
}

impl SubmissionError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Caller-facing description used by the submission path.
    pub fn describe(&self) -> String {
        if self.is_transport() {
            format!("Network error: {self}")
        } else {
            format!("Unexpected error: {self}")
        }
    }
}
