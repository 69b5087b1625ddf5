//! Command line definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "scrobstats", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level, overriding the configured one
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Dashboard commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch every chart and list and print the dashboard state as JSON.
    Dashboard {
        /// Last.fm user name.
        #[arg(long)]
        user: String,
        /// Year to show; all years when omitted.
        #[arg(long, allow_negative_numbers = true)]
        year: Option<i32>,
    },

    /// Add the year before the earliest tab.
    AddYear {
        /// Last.fm user name.
        #[arg(long)]
        user: String,
    },

    /// Print the year tabs.
    Years,

    /// Summarize a Discogs collection.
    Collection {
        /// Discogs user name.
        #[arg(long)]
        user: String,
    },

    /// Exchange a Last.fm auth token for a session and store it.
    Session {
        /// Token returned by the Last.fm auth callback.
        #[arg(long)]
        token: String,
    },

    /// Print the backend profile and adopt its year tabs.
    Profile {
        /// Last.fm user name.
        #[arg(long)]
        user: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_with_year() {
        let args = Args::parse_from(["scrobstats", "dashboard", "--user", "rj", "--year", "2024"]);
        assert_eq!(
            args.command,
            Command::Dashboard {
                user: "rj".into(),
                year: Some(2024)
            }
        );
        assert!(args.config.is_none());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::parse_from([
            "scrobstats",
            "years",
            "--config",
            "custom.yaml",
            "-l",
            "debug",
        ]);
        assert_eq!(args.command, Command::Years);
        assert_eq!(args.config, Some(PathBuf::from("custom.yaml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_subcommand_names_are_kebab_case() {
        let args = Args::parse_from(["scrobstats", "add-year", "--user", "rj"]);
        assert_eq!(args.command, Command::AddYear { user: "rj".into() });
        assert!(Args::try_parse_from(["scrobstats", "dashboard"]).is_err());
    }
}
