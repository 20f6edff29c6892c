//! Filename sanitizer.

use crate::model::SanitizedName;

/// Character substituted for anything outside the allow-set.
pub const REPLACEMENT: char = '_';

/// Map a display name to a token that is safe inside a double-quoted
/// PowerShell string and as a file name under `%TEMP%`.
///
/// Every character other than ASCII letters, digits, `.` and `-` becomes
/// [`REPLACEMENT`]. The mapping is one character for one character; runs of
/// replaced characters are kept as-is.
#[must_use]
pub fn sanitize_name(name: &str) -> SanitizedName {
    SanitizedName::new(
        name.chars()
            .map(|ch| if is_allowed(ch) { ch } else { REPLACEMENT })
            .collect(),
    )
}

const fn is_allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-')
}
