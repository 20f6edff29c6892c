//! Argument parsing, logging setup, and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use psbundle_core::{DEFAULT_PRECISION, ExtensionPolicy};
use psbundle_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::commands::{handle_convert, handle_size};
use crate::context::{AppContext, CliResult, Confirm, TerminalPrompt};

const DEFAULT_OUT_DIR: &str = ".";

/// Parses CLI arguments, installs logging, and executes the requested
/// command. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_sha: option_env!("PSBUNDLE_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("error: {:#}", anyhow::Error::new(err));
        return 3;
    }

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4();
    let span = info_span!("psbundle", command = command_name, trace_id = %trace_id);

    let mut prompt = TerminalPrompt;
    match dispatch(cli, &mut prompt).instrument(span).await {
        Ok(()) => 0,
        Err(err) => {
            let exit_code = err.exit_code();
            debug!(command = command_name, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

async fn dispatch(cli: Cli, prompt: &mut dyn Confirm) -> CliResult<()> {
    let ctx = AppContext {
        output: cli.output,
        policy: ExtensionPolicy::default(),
    };

    match cli.command {
        Command::Convert(args) => handle_convert(&ctx, args, prompt).await,
        Command::Size(args) => handle_size(&ctx, &args),
    }
}

#[derive(Parser)]
#[command(
    name = "psbundle",
    version,
    about = "Wrap a binary in a self-extracting PowerShell script"
)]
pub(crate) struct Cli {
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for command summaries"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "PSBUNDLE_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    pub(crate) log_level: String,
    #[arg(
        long,
        global = true,
        env = "PSBUNDLE_LOG_FORMAT",
        value_parser = parse_log_format
    )]
    pub(crate) log_format: Option<LogFormat>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate `<file>.ps1` from a binary.
    Convert(ConvertArgs),
    /// Format a byte count the way summaries do.
    Size(SizeArgs),
}

#[derive(Args)]
pub(crate) struct ConvertArgs {
    #[arg(help = "Binary to embed in the script")]
    pub(crate) file: PathBuf,
    #[arg(long, env = "PSBUNDLE_OUT_DIR", default_value = DEFAULT_OUT_DIR)]
    pub(crate) out_dir: PathBuf,
    #[arg(long, help = "Write the script to stdout instead of a file")]
    pub(crate) stdout: bool,
    #[arg(long, help = "Include the first lines of the script in the summary")]
    pub(crate) preview: bool,
    #[arg(
        long,
        short = 'y',
        help = "Convert inputs without an .exe extension without asking"
    )]
    pub(crate) yes: bool,
}

#[derive(Args)]
pub(crate) struct SizeArgs {
    pub(crate) bytes: u64,
    #[arg(long, default_value_t = DEFAULT_PRECISION, allow_negative_numbers = true)]
    pub(crate) precision: i32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input
        .parse::<LogFormat>()
        .map_err(|_| format!("invalid log format '{input}': expected 'pretty' or 'json'"))
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Convert(_) => "convert",
        Command::Size(_) => "size",
    }
}
