//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Login credentials, or use VESTDASH_USER / VESTDASH_PASSWORD
#[derive(Debug, Clone, Args)]
pub struct CredentialArgs {
    /// Dashboard username
    #[arg(short, long, global = true, env = "VESTDASH_USER")]
    pub user: Option<String>,

    /// Dashboard password (prompted for when omitted on a terminal)
    #[arg(long, global = true, env = "VESTDASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,
}

#[derive(Parser)]
#[command(name = "vestdash")]
#[command(author, version, about = "Operator dashboard for wearable sensor vests", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Base URL of the vest API (overrides config)
    #[arg(long, global = true, env = "VESTDASH_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(short = 'T', long, global = true)]
    pub timeout: Option<u64>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check credentials and show the vests assigned to you
    Login,

    /// List the vests assigned to you
    Vests {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show one vest and its sensors
    Vest {
        /// Vest ID
        vest_id: i64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the sensors of a vest
    Sensors {
        /// Vest ID
        vest_id: i64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Fetch recent measurements of a vest and chart them
    Measurements {
        /// Vest ID
        vest_id: i64,

        /// Look-back window in seconds (overrides config)
        #[arg(short, long)]
        seconds: Option<u64>,

        /// Skip the sparkline charts in text output
        #[arg(long)]
        no_chart: bool,

        /// Maximum table rows in text output (0 for all)
        #[arg(long, default_value = "20")]
        rows: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Submit a new measurement value for a sensor
    Add {
        /// Sensor ID
        sensor_id: i64,

        /// Measurement value
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Refresh and show this vest's measurements afterwards
        #[arg(long)]
        vest: Option<i64>,
    },

    /// Exercise every API endpoint once, printing each response
    Exercise,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write a starter config file (fails if one exists)
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_measurements() {
        let cli = Cli::try_parse_from([
            "vestdash",
            "measurements",
            "4",
            "--seconds",
            "600",
            "--format",
            "csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Measurements {
                vest_id,
                seconds,
                output,
                ..
            } => {
                assert_eq!(vest_id, 4);
                assert_eq!(seconds, Some(600));
                assert_eq!(output.format, OutputFormat::Csv);
            }
            _ => panic!("expected measurements command"),
        }
    }

    #[test]
    fn test_parse_add_negative_value() {
        let cli = Cli::try_parse_from(["vestdash", "add", "7", "-3.5", "--vest", "2"]).unwrap();
        match cli.command {
            Commands::Add {
                sensor_id,
                value,
                vest,
            } => {
                assert_eq!(sensor_id, 7);
                assert_eq!(value, -3.5);
                assert_eq!(vest, Some(2));
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_global_credentials() {
        let cli = Cli::try_parse_from(["vestdash", "vests", "--user", "coach"]).unwrap();
        assert_eq!(cli.credentials.user.as_deref(), Some("coach"));
    }
}
