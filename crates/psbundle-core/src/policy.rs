//! Caller-side policy helpers.
//!
//! The pipeline accepts any input. Front ends that want to warn about inputs
//! that do not look like executables consult [`ExtensionPolicy`] before calling
//! into it, and name persisted scripts with [`script_file_name`].

/// Extension the front end expects inputs to carry.
pub const EXPECTED_EXTENSION: &str = ".exe";

/// Extension appended to persisted scripts.
pub const SCRIPT_EXTENSION: &str = ".ps1";

/// MIME type used when handing a script to a download or save surface.
pub const PS1_MIME_TYPE: &str = "text/plain";

/// Decides when a caller should ask for confirmation before converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionPolicy {
    expected_extension: &'static str,
}

impl Default for ExtensionPolicy {
    fn default() -> Self {
        Self::new(EXPECTED_EXTENSION)
    }
}

impl ExtensionPolicy {
    /// Policy expecting the given extension (including the leading dot).
    #[must_use]
    pub const fn new(expected_extension: &'static str) -> Self {
        Self { expected_extension }
    }

    /// Extension this policy expects.
    #[must_use]
    pub const fn expected_extension(&self) -> &'static str {
        self.expected_extension
    }

    /// True when `name` does not end with the expected extension, ignoring case.
    #[must_use]
    pub fn requires_confirmation(&self, name: &str) -> bool {
        !name
            .to_lowercase()
            .ends_with(&self.expected_extension.to_lowercase())
    }
}

/// File name for a persisted script: the original name with `.ps1` appended.
#[must_use]
pub fn script_file_name(original: &str) -> String {
    format!("{original}{SCRIPT_EXTENSION}")
}
