//! WordRDM CLI - Command-line interface for building word RDMs
//!
//! This binary builds representational dissimilarity matrices for word lists
//! under the supported similarity channels and writes them as CSV.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use wordrdm_cli::commands;

/// WordRDM - Word dissimilarity matrices for RSA
#[derive(Parser)]
#[command(name = "wordrdm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log progress (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one channel's RDM for a word list
    Build {
        /// Channel name (see `wordrdm channels`)
        #[arg(short, long)]
        channel: String,

        /// Word-list files, one word per line; several files are concatenated
        #[arg(short, long, required = true, num_args = 1..)]
        words: Vec<String>,

        /// Study file declaring asset locations
        #[arg(short, long)]
        study: Option<String>,

        /// Output CSV path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Build every channel of a study for each of its conditions
    Batch {
        /// Study file
        #[arg(short, long)]
        study: String,

        /// Only build these conditions (repeatable)
        #[arg(long = "condition")]
        conditions: Vec<String>,

        /// Only build these channels (repeatable)
        #[arg(long = "channel")]
        channels: Vec<String>,

        /// Output directory (default: the study's out_dir)
        #[arg(short, long)]
        out_dir: Option<String>,
    },

    /// List the available channels
    Channels {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a study file, its assets, and word coverage per channel
    Check {
        /// Study file
        #[arg(short, long)]
        study: String,
    },

    /// Render words as PNG images with the visual channel's canvas
    Render {
        /// Word-list files
        #[arg(short, long, required = true, num_args = 1..)]
        words: Vec<String>,

        /// Output directory for `{word}.png`
        #[arg(short, long)]
        out_dir: String,

        /// Study file providing the visual canvas
        #[arg(short, long)]
        study: Option<String>,

        /// Write binarized masks instead of gray renderings
        #[arg(long)]
        binary: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = match cli.command {
        Commands::Build {
            channel,
            words,
            study,
            output,
        } => commands::build::run(&channel, &words, study.as_deref(), output.as_deref()),
        Commands::Batch {
            study,
            conditions,
            channels,
            out_dir,
        } => commands::batch::run(&study, &conditions, &channels, out_dir.as_deref()),
        Commands::Channels { json } => commands::channels::run(json),
        Commands::Check { study } => commands::check::run(&study),
        Commands::Render {
            words,
            out_dir,
            study,
            binary,
        } => commands::render::run(&words, &out_dir, study.as_deref(), binary),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_build() {
        let cli = Cli::try_parse_from([
            "wordrdm",
            "build",
            "--channel",
            "semantic",
            "--words",
            "aloud.txt",
            "silent.txt",
            "--study",
            "study.json",
        ])
        .unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Build {
                channel,
                words,
                study,
                output,
            } => {
                assert_eq!(channel, "semantic");
                assert_eq!(words, vec!["aloud.txt", "silent.txt"]);
                assert_eq!(study.as_deref(), Some("study.json"));
                assert!(output.is_none());
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_cli_build_requires_words() {
        assert!(Cli::try_parse_from(["wordrdm", "build", "--channel", "word-length"]).is_err());
    }

    #[test]
    fn test_cli_parses_batch_filters() {
        let cli = Cli::try_parse_from([
            "wordrdm",
            "-v",
            "batch",
            "-s",
            "study.json",
            "--condition",
            "list1",
            "--condition",
            "list2",
            "--channel",
            "acoustic",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Batch {
                study,
                conditions,
                channels,
                out_dir,
            } => {
                assert_eq!(study, "study.json");
                assert_eq!(conditions, vec!["list1", "list2"]);
                assert_eq!(channels, vec!["acoustic"]);
                assert!(out_dir.is_none());
            }
            _ => panic!("expected batch command"),
        }
    }

    #[test]
    fn test_cli_verbose_is_global() {
        let cli = Cli::try_parse_from(["wordrdm", "channels", "--json", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Channels { json: true }));
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "wordrdm", "render", "-w", "list.txt", "-o", "masks", "--binary",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                words,
                out_dir,
                study,
                binary,
            } => {
                assert_eq!(words, vec!["list.txt"]);
                assert_eq!(out_dir, "masks");
                assert!(study.is_none());
                assert!(binary);
            }
            _ => panic!("expected render command"),
        }
    }
}
