//! # confsite CLI entry point
//!
//! Parses command-line arguments, loads the site configuration, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use confsite_cli::check::{run_check, CheckArgs};
use confsite_cli::normalize::{run_normalize, NormalizeArgs};
use confsite_cli::speakers::{run_speakers, SpeakersArgs};
use confsite_cli::validate::{run_validate, ValidateArgs};
use confsite_cli::CliContext;

/// Conference site content tooling.
///
/// Checks and reports on bilingual schedule data, produces render-ready
/// schedules, and keeps speaker rosters in line with the schedule.
#[derive(Parser, Debug)]
#[command(name = "confsite", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the site configuration file. Defaults to ./confsite.yaml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Strict pre-build check of a schedule file.
    Check(CheckArgs),

    /// Print a full validation report for a schedule file.
    Validate(ValidateArgs),

    /// Print the normalized, render-ready form of a schedule file.
    Normalize(NormalizeArgs),

    /// Speaker roster cross-checks and event tags.
    Speakers(SpeakersArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("confsite CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = CliContext::load(cli.config.as_deref(), &cwd);
    if let Ok(ctx) = &ctx {
        tracing::debug!(base_dir = %ctx.base_dir.display(), "loaded site context");
    }
    let result = match &cli.command {
        Commands::Check(args) => Ok(run_check(args, ctx)),
        Commands::Validate(args) => ctx.and_then(|ctx| run_validate(args, &ctx)),
        Commands::Normalize(args) => ctx.and_then(|_| run_normalize(args)),
        Commands::Speakers(args) => ctx.and_then(|ctx| run_speakers(args, &ctx)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use confsite_core::Language;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_speakers_tags() {
        let cli = Cli::try_parse_from([
            "confsite",
            "-vv",
            "speakers",
            "tags",
            "--schedule",
            "s.json",
            "--roster",
            "r.json",
            "--emit",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Speakers(_)));
    }

    #[test]
    fn test_parse_speakers_check_language() {
        let base = [
            "confsite", "speakers", "check", "--schedule", "s.json", "--roster-en", "en.json",
            "--roster-zh", "zh.json",
        ];
        let cli = Cli::try_parse_from(base.iter().chain(&["--lang", "zh"]).copied()).unwrap();
        match cli.command {
            Commands::Speakers(args) => assert!(matches!(
                args.command,
                confsite_cli::speakers::SpeakersCommand::Check { lang: Some(Language::Zh), .. }
            )),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(base.iter().chain(&["--lang", "fr"]).copied()).is_err());
    }

    #[test]
    fn test_emit_requires_roster() {
        let parsed = Cli::try_parse_from(["confsite", "speakers", "tags", "--schedule", "s.json", "--emit"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_validate_with_global_config() {
        let cli = Cli::try_parse_from([
            "confsite",
            "validate",
            "s.json",
            "--context",
            "build",
            "--config",
            "site.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("site.yaml")));
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.context.as_deref(), Some("build")),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
