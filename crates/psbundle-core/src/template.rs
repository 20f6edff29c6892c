//! Script templater.
//!
//! # Design
//! - The skeleton is fixed; only the name and payload slots vary.
//! - The payload sits in a here-string so base-64 text needs no escaping.
//! - Extraction, launch, and reporting run inside `try`; `finally` removes the
//!   temporary file whether the launch succeeded, failed, or the child errored.
//!
//! The guarded region launches whatever bytes were embedded. The templater does
//! not inspect or filter them.

use crate::model::{EncodedPayload, GeneratedScript, SanitizedName};

const HERE_STRING_OPEN: &str = "$d = @\"";
const HERE_STRING_CLOSE: &str = "\"@";

const SCRIPT_BODY: &str = concat!(
    "\n",
    "Write-Host \"Extracting $f...\" -ForegroundColor Cyan\n",
    "\n",
    "try {\n",
    "    $b = [Convert]::FromBase64String($d)\n",
    "    [IO.File]::WriteAllBytes($p, $b)\n",
    "    \n",
    "    Write-Host \"Running $f...\" -ForegroundColor Green\n",
    "    $proc = Start-Process -FilePath $p -Wait -PassThru\n",
    "    \n",
    "    Write-Host \"Done. Exit code: $($proc.ExitCode)\" -ForegroundColor Cyan\n",
    "}\n",
    "catch {\n",
    "    Write-Error \"Error: $($_.Exception.Message)\"\n",
    "}\n",
    "finally {\n",
    "    if (Test-Path $p) {\n",
    "        Remove-Item -Path $p -Force\n",
    "    }\n",
    "}\n",
);

/// Render the self-extracting script for a sanitized name and payload.
#[must_use]
pub fn render_script(name: &SanitizedName, payload: &EncodedPayload) -> GeneratedScript {
    let name = name.as_str();
    let mut script = String::with_capacity(name.len() + payload.len() + SCRIPT_BODY.len() + 64);

    script.push_str("$f = \"");
    script.push_str(name);
    script.push_str("\"\n");
    script.push_str("$p = Join-Path $env:TEMP $f\n");
    script.push_str(HERE_STRING_OPEN);
    script.push('\n');
    script.push_str(payload.as_str());
    script.push('\n');
    script.push_str(HERE_STRING_CLOSE);
    script.push('\n');
    script.push_str(SCRIPT_BODY);

    GeneratedScript::new(script)
}
