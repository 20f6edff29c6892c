#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Encode-and-template pipeline that wraps a binary file in a self-extracting
//! PowerShell script.
//!
//! Layout:
//! - `reader.rs`: asynchronous byte source consumption and base-64 encoding
//! - `sanitize.rs`: display name to script-safe token mapping
//! - `template.rs`: the fixed script skeleton
//! - `size.rs`: human-readable byte counts
//! - `policy.rs`: extension confirmation and output naming helpers for callers
//! - `pipeline.rs`: `convert` / `convert_file` composing the pieces above

pub mod error;
pub mod model;
pub mod pipeline;
pub mod policy;
pub mod reader;
pub mod sanitize;
pub mod size;
pub mod template;

pub use error::{ConvertError, ConvertResult, READ_FAILURE_MESSAGE};
pub use model::{
    ConversionResult, EncodedPayload, GeneratedScript, InputSource, PREVIEW_MARKER, RawInput,
    SanitizedName,
};
pub use pipeline::{convert, convert_file};
pub use policy::{
    EXPECTED_EXTENSION, ExtensionPolicy, PS1_MIME_TYPE, SCRIPT_EXTENSION, script_file_name,
};
pub use reader::{display_name, encode_bytes, read_file, read_payload};
pub use sanitize::sanitize_name;
pub use size::{DEFAULT_PRECISION, format_size, format_size_default};
pub use template::render_script;
