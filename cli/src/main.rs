#![deny(missing_docs)]

//! # OAS Grouper CLI
//!
//! Command Line Interface for the endpoint grouping engine.
//!
//! Supported Commands:
//! - `parse`: Directory of OpenAPI documents -> grouped endpoints JSON.
//! - `validate`: Reports routes emitted under more than one tag.

use clap::{Parser, Subcommand};
use grouper_core::AppResult;
use tracing_subscriber::EnvFilter;

mod parse;
mod validate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI endpoint grouper")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Groups the endpoints of every OpenAPI document under a directory by tag.
    Parse(parse::ParseArgs),
    /// Reports duplicated routes in a previously written endpoints file.
    Validate(validate::ValidateArgs),
}

fn main() -> AppResult<()> {
    // Logs go to stderr so the validation report owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Parse(args) => parse::execute(args)?,
        Commands::Validate(args) => validate::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["oas-grouper", "parse", "specs"]).unwrap();
        let Commands::Parse(args) = cli.command else {
            panic!("Expected parse command")
        };
        assert_eq!(args.input_dir, std::path::PathBuf::from("specs"));
        assert!(args.exclude_tag.is_empty());
    }
}
