//! Infrastructure layer: configuration, local artifact storage, QR rendering
//! and the KRA eTIMS client that orchestrates a submission.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod http;
pub mod qr;
pub mod result;
pub mod service;

pub use artifacts::{ArtifactError, ArtifactKind, ArtifactStore};
pub use config::KraEtimsConfig;
pub use error::SubmissionError;
pub use qr::{PngQrEncoder, QrEncoder, QrError};
pub use result::{FailureKind, ServiceResult};
pub use service::KraEtimsService;
