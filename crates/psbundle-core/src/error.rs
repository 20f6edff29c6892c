//! # Design
//!
//! - Provide structured, constant-message errors for the conversion pipeline.
//! - Capture context (input name, sizes, operation) as fields rather than in messages.
//! - Expose a single generic message for end users so read failures never leak detail.

use std::io;

use thiserror::Error;

/// Message shown to end users whenever an input could not be fully read.
pub const READ_FAILURE_MESSAGE: &str = "Process failed. File might be too large.";

/// Message shown to end users when a supplied payload cannot be decoded.
const INVALID_PAYLOAD_MESSAGE: &str = "Payload is not valid base64 data.";

/// Result alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors produced while turning an input into a script.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The byte source could not be opened or consumed.
    #[error("failed to read input source")]
    Read {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Display name of the input.
        name: String,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The byte source yielded a different number of bytes than it declared.
    #[error("input source size changed during read")]
    Truncated {
        /// Display name of the input.
        name: String,
        /// Size declared before the read started.
        expected: u64,
        /// Bytes actually consumed.
        actual: u64,
    },
    /// Supplied payload text is not valid base-64.
    #[error("payload is not valid base64")]
    InvalidPayload {
        /// Underlying decode error.
        source: base64::DecodeError,
    },
    /// Data URL header lacks the `;base64,` marker.
    #[error("data url is not base64 encoded")]
    MalformedDataUrl {
        /// Header portion that failed validation.
        header: String,
    },
}

impl ConvertError {
    pub(crate) fn read(operation: &'static str, name: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            operation,
            name: name.into(),
            source,
        }
    }

    /// Whether the error means the input could not be fully consumed.
    #[must_use]
    pub const fn is_read_failure(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Truncated { .. })
    }

    /// User-facing message that omits internal detail.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        if self.is_read_failure() {
            READ_FAILURE_MESSAGE
        } else {
            INVALID_PAYLOAD_MESSAGE
        }
    }
}
