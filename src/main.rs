//! Command-line driver.
//!
//! Reads one expression from the arguments, prints the requested artifact and
//! exits with status 1 on any compile or I/O error.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use exprcc::{Dialect, Emit, Options};
use tracing::{debug, Level};

#[derive(Debug, Parser)]
#[command(name = "exprcc", version, about = "Compile an arithmetic expression to x86-64 assembly")]
struct Cli {
  /// Expression to compile, e.g. "2+3*4" or "-(3+5)".
  #[arg(allow_hyphen_values = true)]
  expr: String,

  /// Assembly syntax to emit (intel or att).
  #[arg(short, long, default_value_t = Dialect::Intel, value_parser = parse_dialect)]
  syntax: Dialect,

  /// Artifact to print (asm, tokens or ast).
  #[arg(short, long, default_value_t = Emit::Asm, value_parser = parse_emit)]
  emit: Emit,

  /// Output file; "-" writes to stdout.
  #[arg(short, long, value_name = "FILE", default_value = "-")]
  output: PathBuf,

  /// Increase log verbosity (repeatable).
  #[arg(short, long, action = ArgAction::Count)]
  verbose: u8,
}

impl Cli {
  fn options(&self) -> Options {
    Options {
      dialect: self.syntax,
      emit: self.emit,
    }
  }

  fn log_level(&self) -> Level {
    match self.verbose {
      0 => Level::WARN,
      1 => Level::INFO,
      2 => Level::DEBUG,
      _ => Level::TRACE,
    }
  }
}

fn parse_dialect(value: &str) -> Result<Dialect, String> {
  value.parse()
}

fn parse_emit(value: &str) -> Result<Emit, String> {
  value.parse()
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_target(false)
    .with_max_level(cli.log_level())
    .init();

  let options = cli.options();
  debug!(syntax = %options.dialect, emit = %options.emit, "compiling expression");

  let output = match exprcc::compile(&cli.expr, &options) {
    Ok(output) => output,
    Err(err) => {
      eprintln!("{}", err.render(&cli.expr));
      return ExitCode::FAILURE;
    }
  };

  match write_output(&cli.output, &output) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn write_output(path: &Path, output: &str) -> anyhow::Result<()> {
  if path.as_os_str() == "-" {
    let mut stdout = io::stdout().lock();
    stdout
      .write_all(output.as_bytes())
      .context("Failed to write to stdout")?;
    return stdout.flush().context("Failed to flush stdout");
  }

  let mut file = File::create(path)
    .with_context(|| format!("Failed to open for writing: {}", path.display()))?;
  file
    .write_all(output.as_bytes())
    .with_context(|| format!("Failed to write to file: {}", path.display()))
}
