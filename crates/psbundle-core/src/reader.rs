//! Binary reader: consume a byte source and produce its base-64 payload.
//!
//! # Design
//! - The read is the only await point of a conversion.
//! - A read either yields the complete payload or an error; partial buffers are dropped.
//! - Declared sizes are checked after the read so sources that change mid-read are rejected.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::model::{EncodedPayload, InputSource, RawInput};

const DATA_URL_SCHEME: &str = "data:";
const DATA_URL_BASE64_MARKER: &str = ";base64";
/// Upper bound for buffer preallocation taken from a declared size.
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

/// Encode bytes with the standard base-64 alphabet and padding.
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> EncodedPayload {
    EncodedPayload::new(STANDARD.encode(bytes))
}

/// Consume the whole source and encode it.
///
/// # Errors
///
/// Returns [`ConvertError::Read`] when the source fails before reaching its
/// end, and [`ConvertError::Truncated`] when the number of bytes read differs
/// from the declared size.
pub async fn read_payload<R>(source: InputSource<R>) -> ConvertResult<(RawInput, EncodedPayload)>
where
    R: AsyncRead + Unpin,
{
    let (name, declared_size, mut reader) = source.into_parts();
    let capacity = declared_size
        .map(|size| size.min(MAX_PREALLOCATION))
        .and_then(|size| usize::try_from(size).ok())
        .unwrap_or_default();
    let mut bytes = Vec::with_capacity(capacity);

    reader
        .read_to_end(&mut bytes)
        .await
        .map_err(|source| ConvertError::read("read_to_end", name.as_str(), source))?;

    let input = RawInput::new(name, bytes);
    if let Some(expected) = declared_size
        && expected != input.len()
    {
        return Err(ConvertError::Truncated {
            name: input.name().to_string(),
            expected,
            actual: input.len(),
        });
    }

    let payload = encode_bytes(input.bytes());
    debug!(
        name = input.name(),
        bytes = input.len(),
        encoded = payload.len(),
        "input encoded"
    );
    Ok((input, payload))
}

/// Open a path and read it through [`read_payload`].
///
/// Regular files declare their metadata length. Pipes, character devices and
/// procfs entries report no usable length and are read to end unchecked.
///
/// # Errors
///
/// Returns [`ConvertError::Read`] when the path cannot be opened, inspected,
/// or read, and [`ConvertError::Truncated`] when a regular file changes size
/// while being read.
pub async fn read_file(path: impl AsRef<Path>) -> ConvertResult<(RawInput, EncodedPayload)> {
    let path = path.as_ref();
    let name = display_name(path);
    let file = File::open(path)
        .await
        .map_err(|source| ConvertError::read("open", name.as_str(), source))?;
    let metadata = file
        .metadata()
        .await
        .map_err(|source| ConvertError::read("metadata", name.as_str(), source))?;

    let source = InputSource::new(name, file);
    let source = if metadata.is_file() {
        source.with_declared_size(metadata.len())
    } else {
        source
    };
    read_payload(source).await
}

/// Display name for a path: its final component, or the full path when there is none.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

impl EncodedPayload {
    /// Accept base-64 text, stripping a `data:<mime>;base64,` header when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MalformedDataUrl`] for data URLs that are not
    /// base-64 encoded and [`ConvertError::InvalidPayload`] when the remaining
    /// text does not decode.
    pub fn from_data_url(input: &str) -> ConvertResult<Self> {
        let trimmed = input.trim();
        let encoded = match trimmed.strip_prefix(DATA_URL_SCHEME) {
            Some(rest) => {
                let (header, data) =
                    rest.split_once(',')
                        .ok_or_else(|| ConvertError::MalformedDataUrl {
                            header: rest.to_string(),
                        })?;
                if !header.ends_with(DATA_URL_BASE64_MARKER) {
                    return Err(ConvertError::MalformedDataUrl {
                        header: header.to_string(),
                    });
                }
                data
            }
            None => trimmed,
        };

        STANDARD
            .decode(encoded)
            .map_err(|source| ConvertError::InvalidPayload { source })?;
        Ok(Self::new(encoded.to_string()))
    }

    /// Decode the payload back into the original bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidPayload`] if the text is not valid base-64.
    pub fn decode(&self) -> ConvertResult<Vec<u8>> {
        STANDARD
            .decode(self.as_str())
            .map_err(|source| ConvertError::InvalidPayload { source })
    }
}
