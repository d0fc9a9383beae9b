//! Command-line argument parsing
//!
//! Supports:
//! - One-shot rendering of a document (ANSI, plain or JSON)
//! - A live full-screen watch view
//! - Adding a list to the configuration
//! - Listing configured lists

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;

/// Highlight configured words and phrases
#[derive(Parser, Debug)]
#[command(name = "phrasemark", version, about = "Highlight configured words and phrases")]
pub struct CliArgs {
    /// Configuration file (default: ~/.phrasemark.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a document with its matches highlighted
    Show {
        /// Document to highlight
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Ansi)]
        format: OutputFormat,
    },
    /// Show a document full-screen and re-highlight as it or the lists change
    Watch {
        /// Document to highlight
        file: PathBuf,
    },
    /// Append a word list at the lowest priority
    Add {
        /// List source file
        list: PathBuf,
        /// Highlight colour (generated when omitted)
        #[arg(long)]
        color: Option<String>,
        /// Add the list disabled
        #[arg(long)]
        disabled: bool,
    },
    /// Show configured lists in priority order
    Lists,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Terminal colours
    Ansi,
    /// Matches as [text]{list}
    Plain,
    /// Spans per list as JSON
    Json,
}

impl CliArgs {
    /// Config path from the flag or the default location
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show() {
        let args = CliArgs::parse_from(["phrasemark", "show", "doc.txt", "--format", "json"]);
        match args.command {
            Command::Show { file, format } => {
                assert_eq!(file, PathBuf::from("doc.txt"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_show_defaults_to_ansi() {
        let args = CliArgs::parse_from(["phrasemark", "show", "doc.txt"]);
        assert!(matches!(
            args.command,
            Command::Show {
                format: OutputFormat::Ansi,
                ..
            }
        ));
    }

    #[test]
    fn test_global_config_flag() {
        let args = CliArgs::parse_from(["phrasemark", "lists", "--config", "/tmp/p.toml"]);
        assert_eq!(args.config_path(), Some(PathBuf::from("/tmp/p.toml")));
        assert!(matches!(args.command, Command::Lists));
    }

    #[test]
    fn test_parse_add() {
        let args = CliArgs::parse_from([
            "phrasemark",
            "-c",
            "p.toml",
            "add",
            "names.txt",
            "--color",
            "#ff0000",
            "--disabled",
        ]);
        match args.command {
            Command::Add {
                list,
                color,
                disabled,
            } => {
                assert_eq!(list, PathBuf::from("names.txt"));
                assert_eq!(color.as_deref(), Some("#ff0000"));
                assert!(disabled);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(CliArgs::try_parse_from(["phrasemark"]).is_err());
    }
}
