use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use psbundle_core::{ConversionResult, ConvertError, convert_file, display_name};
use tracing::{debug, info};

use crate::cli::ConvertArgs;
use crate::context::{AppContext, CliError, CliResult, Confirm};
use crate::output::render_conversion;

pub(crate) const CONFIRM_QUESTION: &str = "Proceed with non-EXE file?";
pub(crate) const PREVIEW_LINES: usize = 10;

pub(crate) async fn handle_convert(
    ctx: &AppContext,
    args: ConvertArgs,
    prompt: &mut dyn Confirm,
) -> CliResult<()> {
    let name = display_name(&args.file);
    confirm_input(ctx, &name, args.yes, prompt)?;

    let result = convert_file(&args.file).await.map_err(conversion_failure)?;

    if args.stdout {
        return write_script(&mut io::stdout().lock(), &result);
    }

    let path = persist_script(&result, &args.out_dir).await?;
    info!(path = %path.display(), bytes = result.script.len(), "script written");

    let preview = args.preview.then(|| result.script.preview(PREVIEW_LINES));
    println!(
        "{}",
        render_conversion(&result, Some(&path), preview, ctx.output)?
    );
    Ok(())
}

fn confirm_input(
    ctx: &AppContext,
    name: &str,
    assume_yes: bool,
    prompt: &mut dyn Confirm,
) -> CliResult<()> {
    if assume_yes || !ctx.policy.requires_confirmation(name) {
        return Ok(());
    }

    let accepted = prompt
        .confirm(CONFIRM_QUESTION)
        .context("failed to read confirmation")
        .map_err(CliError::failure)?;
    if accepted {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "conversion of '{name}' cancelled; pass --yes to convert files without a {} extension",
            ctx.policy.expected_extension()
        )))
    }
}

pub(crate) async fn persist_script(
    result: &ConversionResult,
    out_dir: &Path,
) -> CliResult<PathBuf> {
    let path = out_dir.join(result.script_file_name());
    tokio::fs::write(&path, result.script.as_str())
        .await
        .with_context(|| format!("failed to write {}", path.display()))
        .map_err(CliError::failure)?;
    Ok(path)
}

pub(crate) fn write_script(out: &mut impl Write, result: &ConversionResult) -> CliResult<()> {
    out.write_all(result.script.as_str().as_bytes())
        .and_then(|()| out.flush())
        .context("failed to write script to stdout")
        .map_err(CliError::failure)
}

fn conversion_failure(err: ConvertError) -> CliError {
    debug!(error = ?err, "conversion failed");
    CliError::failure(anyhow!(err.user_message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use psbundle_core::{ExtensionPolicy, READ_FAILURE_MESSAGE};
    use psbundle_test_support::fixtures::{MZ_HEADER, temp_dir, write_file};
    use std::fs;

    struct ScriptedPrompt {
        answer: bool,
        questions: Vec<String>,
    }

    impl ScriptedPrompt {
        const fn answering(answer: bool) -> Self {
            Self {
                answer,
                questions: Vec::new(),
            }
        }
    }

    impl Confirm for ScriptedPrompt {
        fn confirm(&mut self, question: &str) -> io::Result<bool> {
            self.questions.push(question.to_string());
            Ok(self.answer)
        }
    }

    struct BrokenPrompt;

    impl Confirm for BrokenPrompt {
        fn confirm(&mut self, _question: &str) -> io::Result<bool> {
            Err(io::Error::other("terminal closed"))
        }
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn context() -> AppContext {
        AppContext {
            output: OutputFormat::Table,
            policy: ExtensionPolicy::default(),
        }
    }

    fn args(file: PathBuf, out_dir: &Path) -> ConvertArgs {
        ConvertArgs {
            file,
            out_dir: out_dir.to_path_buf(),
            stdout: false,
            preview: false,
            yes: false,
        }
    }

    #[tokio::test]
    async fn executables_convert_without_prompting() -> anyhow::Result<()> {
        let input = temp_dir()?;
        let output = temp_dir()?;
        let file = write_file(input.path(), "My App!.exe", &MZ_HEADER)?;
        let mut prompt = ScriptedPrompt::answering(false);

        handle_convert(&context(), args(file, output.path()), &mut prompt)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        assert!(prompt.questions.is_empty());
        let script = fs::read_to_string(output.path().join("My App!.exe.ps1"))?;
        assert!(script.starts_with("$f = \"My_App_.exe\"\n"));
        assert!(script.contains("$d = @\"\nTVqQAA==\n\"@\n"));
        Ok(())
    }

    #[tokio::test]
    async fn declined_confirmation_writes_nothing() -> anyhow::Result<()> {
        let input = temp_dir()?;
        let output = temp_dir()?;
        let file = write_file(input.path(), "notes.txt", b"hello")?;
        let mut prompt = ScriptedPrompt::answering(false);

        let result = handle_convert(&context(), args(file, output.path()), &mut prompt).await;

        let Err(err) = result else {
            panic!("expected declined conversion to fail");
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("--yes"));
        assert_eq!(prompt.questions, vec![CONFIRM_QUESTION.to_string()]);
        assert_eq!(fs::read_dir(output.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn accepted_confirmation_converts() -> anyhow::Result<()> {
        let input = temp_dir()?;
        let output = temp_dir()?;
        let file = write_file(input.path(), "payload.bin", &[1, 2, 3])?;
        let mut prompt = ScriptedPrompt::answering(true);

        handle_convert(&context(), args(file, output.path()), &mut prompt)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        assert_eq!(prompt.questions.len(), 1);
        assert!(output.path().join("payload.bin.ps1").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn yes_flag_skips_prompt() -> anyhow::Result<()> {
        let input = temp_dir()?;
        let output = temp_dir()?;
        let file = write_file(input.path(), "payload.bin", &[1])?;
        let mut prompt = ScriptedPrompt::answering(false);
        let mut convert_args = args(file, output.path());
        convert_args.yes = true;

        handle_convert(&context(), convert_args, &mut prompt)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        assert!(prompt.questions.is_empty());
        assert!(output.path().join("payload.bin.ps1").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn prompt_errors_are_failures() -> anyhow::Result<()> {
        let output = temp_dir()?;
        let result = handle_convert(
            &context(),
            args(PathBuf::from("notes.txt"), output.path()),
            &mut BrokenPrompt,
        )
        .await;

        assert!(matches!(result, Err(ref err) if err.exit_code() == 3));
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_input_reports_generic_message() -> anyhow::Result<()> {
        let input = temp_dir()?;
        let output = temp_dir()?;
        let missing = input.path().join("missing.exe");
        let mut prompt = ScriptedPrompt::answering(true);

        let result = handle_convert(&context(), args(missing, output.path()), &mut prompt).await;

        let Err(err) = result else {
            panic!("expected read failure");
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.display_message(), READ_FAILURE_MESSAGE);
        assert_eq!(fs::read_dir(output.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn persist_script_reports_missing_directory() -> anyhow::Result<()> {
        let input = temp_dir()?;
        let file = write_file(input.path(), "app.exe", &MZ_HEADER)?;
        let result = convert_file(&file).await?;

        let missing_dir = input.path().join("nope");
        let outcome = persist_script(&result, &missing_dir).await;

        let Err(err) = outcome else {
            panic!("expected write failure");
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().starts_with("failed to write"));
        Ok(())
    }

    #[tokio::test]
    async fn write_script_emits_exact_script() -> anyhow::Result<()> {
        let input = temp_dir()?;
        let file = write_file(input.path(), "app.exe", &MZ_HEADER)?;
        let result = convert_file(&file).await?;

        let mut out = Vec::new();
        write_script(&mut out, &result).map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(out, result.script.as_str().as_bytes());
        Ok(())
    }

    #[tokio::test]
    async fn closed_stdout_is_a_failure_not_a_panic() -> anyhow::Result<()> {
        let input = temp_dir()?;
        let file = write_file(input.path(), "app.exe", &MZ_HEADER)?;
        let result = convert_file(&file).await?;

        let Err(err) = write_script(&mut ClosedPipe, &result) else {
            panic!("expected broken pipe to fail");
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().starts_with("failed to write script to stdout"));
        Ok(())
    }
}
