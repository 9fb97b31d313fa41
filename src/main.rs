//! parse-args - typed argument declarations for shell scripts.

use anyhow::{Context, Result};
use clap::Parser;
use parse_args::{compile, generate_output, project, split_at_separator, InvocationError};
use tracing_subscriber::EnvFilter;

/// Parse script arguments against option descriptors and print the path of
/// a file of shell assignments.
///
/// Usage: parse-args <DESCRIPTOR>... -- <ARGS>...
///
/// Every word before the first `--` is a descriptor, so the tool has no
/// flags of its own.
#[derive(Parser, Debug)]
#[command(
    name = "parse-args",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Option descriptors, e.g. `out`, `verbose-`, `needs!`, `input+`, `extra?`, `files*`
    #[arg(
        allow_hyphen_values = true,
        trailing_var_arg = true,
        value_name = "DESCRIPTOR"
    )]
    descriptors: Vec<String>,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("PARSE_ARGS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let argv: Vec<String> = std::env::args().collect();
    let (head, tokens) = split_at_separator(&argv);

    let cli = Cli::parse_from(head);
    let tokens = tokens.ok_or(InvocationError::MissingSeparator)?;

    let parser = compile(&cli.descriptors);
    let parsed = parser.parse(tokens);
    let options = project(&cli.descriptors, &parsed);

    let path = generate_output(&options).context("failed to generate output file")?;
    println!("{}", path.display());

    Ok(())
}
