//! Domain values flowing through a single conversion.
//!
//! Every value here is created once and never mutated; a new conversion
//! allocates a fresh chain from `InputSource` through `ConversionResult`.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::policy::script_file_name;

/// Marker appended to script previews in place of the hidden payload lines.
pub const PREVIEW_MARKER: &str = "[...] Payload Hidden to Prevent Lag";

/// Asynchronous byte source together with the identity the caller declared for it.
#[derive(Debug)]
pub struct InputSource<R> {
    name: String,
    declared_size: Option<u64>,
    reader: R,
}

impl<R> InputSource<R> {
    /// Wrap a reader under the given display name.
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            declared_size: None,
            reader,
        }
    }

    /// Record the size the source is expected to yield.
    #[must_use]
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = Some(size);
        self
    }

    /// Display name supplied by the caller.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size declared by the caller, when known.
    #[must_use]
    pub const fn declared_size(&self) -> Option<u64> {
        self.declared_size
    }

    pub(crate) fn into_parts(self) -> (String, Option<u64>, R) {
        (self.name, self.declared_size, self.reader)
    }
}

/// Fully consumed input bytes with their display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    name: String,
    bytes: Vec<u8>,
}

impl RawInput {
    /// Bind bytes to a display name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Display name of the input.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw bytes of the input.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length of the input.
    #[must_use]
    pub fn len(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }

    /// Whether the input carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Base-64 text of an input's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub(crate) const fn new(text: String) -> Self {
        Self(text)
    }

    /// Encoded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the encoded text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload encodes an empty input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for EncodedPayload {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Display name reduced to characters safe inside the script and as a temp file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SanitizedName(String);

impl SanitizedName {
    pub(crate) const fn new(text: String) -> Self {
        Self(text)
    }

    /// Sanitized token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SanitizedName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Final script text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GeneratedScript(String);

impl GeneratedScript {
    pub(crate) const fn new(text: String) -> Self {
        Self(text)
    }

    /// Script text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the script into its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Size of the script text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for rendered scripts; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of lines in the script.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.0.lines().count()
    }

    /// First `lines` lines of the script followed by [`PREVIEW_MARKER`].
    ///
    /// Long payloads make the full text impractical to display; the preview
    /// keeps the header readable while signalling that content was omitted.
    #[must_use]
    pub fn preview(&self, lines: usize) -> String {
        let mut preview = self.0.lines().take(lines).collect::<Vec<_>>().join("\n");
        preview.push('\n');
        preview.push_str(PREVIEW_MARKER);
        preview
    }
}

impl Display for GeneratedScript {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// One completed conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    /// Display name of the original input.
    pub file_name: String,
    /// Byte length of the original input.
    pub original_size: u64,
    /// When the conversion finished.
    pub created_at: DateTime<Utc>,
    /// Rendered script.
    pub script: GeneratedScript,
}

impl ConversionResult {
    /// Bind a rendered script to the input it was produced from.
    #[must_use]
    pub fn new(input: &RawInput, script: GeneratedScript) -> Self {
        Self {
            file_name: input.name().to_string(),
            original_size: input.len(),
            created_at: Utc::now(),
            script,
        }
    }

    /// File name the script should be persisted under.
    #[must_use]
    pub fn script_file_name(&self) -> String {
        script_file_name(&self.file_name)
    }
}
