//! Output renderers and formatting helpers for CLI commands.

use std::path::Path;

use anyhow::anyhow;
use chrono::{DateTime, SecondsFormat, Utc};
use psbundle_core::{ConversionResult, PS1_MIME_TYPE, format_size, format_size_default};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::context::{CliError, CliResult};

#[derive(Debug, Serialize)]
struct ConversionSummary<'a> {
    file_name: &'a str,
    original_size: u64,
    original_size_display: String,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    script_path: Option<String>,
    script_bytes: usize,
    script_lines: usize,
    mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
}

#[derive(Debug, Serialize)]
struct SizeSummary {
    bytes: u64,
    precision: i32,
    formatted: String,
}

pub(crate) fn render_conversion(
    result: &ConversionResult,
    script_path: Option<&Path>,
    preview: Option<String>,
    format: OutputFormat,
) -> CliResult<String> {
    let summary = ConversionSummary {
        file_name: &result.file_name,
        original_size: result.original_size,
        original_size_display: format_size_default(result.original_size),
        created_at: result.created_at,
        script_path: script_path.map(|path| path.display().to_string()),
        script_bytes: result.script.len(),
        script_lines: result.script.line_count(),
        mime_type: PS1_MIME_TYPE,
        preview,
    };

    match format {
        OutputFormat::Json => to_json(&summary),
        OutputFormat::Table => {
            let script_bytes = u64::try_from(summary.script_bytes).unwrap_or(u64::MAX);
            let mut lines = vec![
                format!("file: {}", summary.file_name),
                format!("size: {}", summary.original_size_display),
            ];
            if let Some(path) = &summary.script_path {
                lines.push(format!("script: {path}"));
            }
            lines.push(format!(
                "script size: {} ({} lines, {})",
                format_size_default(script_bytes),
                summary.script_lines,
                summary.mime_type
            ));
            lines.push(format!(
                "created: {}",
                summary.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
            if let Some(preview) = &summary.preview {
                lines.push(format!("preview:\n{preview}"));
            }
            Ok(lines.join("\n"))
        }
    }
}

pub(crate) fn render_size(bytes: u64, precision: i32, format: OutputFormat) -> CliResult<String> {
    let formatted = format_size(bytes, precision);
    match format {
        OutputFormat::Json => to_json(&SizeSummary {
            bytes,
            precision,
            formatted,
        }),
        OutputFormat::Table => Ok(formatted),
    }
}

fn to_json(value: &impl Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}
