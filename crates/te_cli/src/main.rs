mod logging;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use te_emit::{compile, CompileRequest};

#[derive(Parser)]
#[command(
    name = "tsesm",
    version,
    about = "Compile a TypeScript project to ES modules with explicit import extensions"
)]
struct Cli {
    /// Path to tsconfig.json, or a directory containing one.
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print the summary line.
    #[arg(short, long)]
    quiet: bool,

    /// Print diagnostics as JSON on stdout instead of text on stderr.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let outcome = compile(&CompileRequest {
        cwd,
        project: cli.project.clone(),
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.diagnostics)?);
    } else {
        for diagnostic in &outcome.diagnostics {
            eprintln!("{}", report::format_diagnostic(diagnostic));
        }
    }

    if !cli.quiet {
        eprintln!("{}", report::summary(outcome.emitted.len(), &outcome.diagnostics));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["tsesm", "--project", "app/tsconfig.json", "-vv", "--quiet"]);
        assert_eq!(cli.project, Some(PathBuf::from("app/tsconfig.json")));
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
        assert!(!cli.json);
    }
}
