//! Conversion pipeline: source → payload → sanitized name → script → result.
//!
//! # Design
//! - Plain async functions; progress and busy state belong to the caller.
//! - Each call allocates its own values, so concurrent conversions share nothing.
//! - Failures surface as one `ConvertError`; nothing partial is returned.

use std::path::Path;

use tokio::io::AsyncRead;
use tracing::{debug, instrument};

use crate::error::ConvertResult;
use crate::model::{ConversionResult, EncodedPayload, InputSource, RawInput};
use crate::reader::{read_file, read_payload};
use crate::sanitize::sanitize_name;
use crate::template::render_script;

/// Convert a byte source into a self-extracting script.
///
/// # Errors
///
/// Returns a read failure when the source cannot be fully consumed; no script
/// is produced in that case.
#[instrument(name = "convert", skip(source), fields(name = %source.name()))]
pub async fn convert<R>(source: InputSource<R>) -> ConvertResult<ConversionResult>
where
    R: AsyncRead + Unpin,
{
    let (input, payload) = read_payload(source).await?;
    Ok(assemble(&input, &payload))
}

/// Convert a file on disk, naming the result after the file's final path component.
///
/// # Errors
///
/// Returns a read failure when the file cannot be opened or fully read.
#[instrument(name = "convert_file", skip(path), fields(path = %path.as_ref().display()))]
pub async fn convert_file(path: impl AsRef<Path>) -> ConvertResult<ConversionResult> {
    let (input, payload) = read_file(path).await?;
    Ok(assemble(&input, &payload))
}

fn assemble(input: &RawInput, payload: &EncodedPayload) -> ConversionResult {
    let name = sanitize_name(input.name());
    let script = render_script(&name, payload);
    debug!(
        sanitized = %name,
        original_size = input.len(),
        script_bytes = script.len(),
        "script rendered"
    );
    ConversionResult::new(input, script)
}
