//! Error types for gitdrill-core.

use thiserror::Error;

/// Errors raised while turning a raw project reference into a
/// [`RemoteDescriptor`](crate::RemoteDescriptor).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The reference has no extractable owner or project.
    #[error("malformed project reference '{raw}': {reason}")]
    MalformedReference { raw: String, reason: String },
}

pub(crate) fn malformed(raw: &str, reason: impl Into<String>) -> RemoteError {
    RemoteError::MalformedReference {
        raw: raw.to_owned(),
        reason: reason.into(),
    }
}
