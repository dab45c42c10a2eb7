//! topicsync CLI
//!
//! Command-line tools for working with serialized command batches.
//!
//! # Commands
//!
//! - `check` - Decode a batch and count its change variants
//! - `replay` - Apply a batch to fresh in-memory topics
//! - `invert` - Print the batch that undoes a batch

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use commands::replay::TopicSpec;
use logging::LogLevel;
use std::path::PathBuf;

/// topicsync command batch tools.
#[derive(Parser)]
#[command(name = "topicsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Minimum level of log output
    #[arg(global = true, long, value_enum, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every change in a batch without applying it
    Check {
        /// Batch file (JSON array of command records)
        file: PathBuf,
    },

    /// Replay a batch against in-memory topics and print their final values
    Replay {
        /// Batch file (JSON array of command records)
        file: PathBuf,

        /// Topic to create, as name=value_type[=json]
        #[arg(short, long = "topic", value_name = "SPEC")]
        topics: Vec<TopicSpec>,

        /// Undo the batch after replaying it
        #[arg(short, long)]
        preview: bool,
    },

    /// Print the batch that undoes a batch
    Invert {
        /// Batch file (JSON array of command records)
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    match cli.command {
        Commands::Check { file } => commands::check::run(&file)?,
        Commands::Replay {
            file,
            topics,
            preview,
        } => commands::replay::run(&file, &topics, preview)?,
        Commands::Invert { file } => commands::invert::run(&file)?,
        Commands::Version => {
            println!("topicsync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
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
    fn parses_replay_arguments() {
        let cli = Cli::try_parse_from([
            "topicsync",
            "--log-level",
            "warning",
            "replay",
            "batch.json",
            "--topic",
            "tags=collection",
            "-t",
            "n=int=3",
            "--preview",
        ])
        .unwrap();

        assert_eq!(cli.log_level, LogLevel::Warning);
        match cli.command {
            Commands::Replay {
                file,
                topics,
                preview,
            } => {
                assert_eq!(file, PathBuf::from("batch.json"));
                assert_eq!(topics.len(), 2);
                assert_eq!(topics[1].value, Some(serde_json::json!(3)));
                assert!(preview);
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn log_level_defaults_to_info() {
        let cli = Cli::try_parse_from(["topicsync", "check", "b.json"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn rejects_malformed_topic_spec() {
        assert!(Cli::try_parse_from(["topicsync", "replay", "b.json", "--topic", "x=tuple"]).is_err());
    }
}
