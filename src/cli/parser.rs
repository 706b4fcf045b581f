use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rGameNight
/// Reaction-driven signup coordinator for a weekly game night
#[derive(Parser)]
#[command(
    name = "rgamenight",
    version = env!("CARGO_PKG_VERSION"),
    about = "Run the weekly game night signup: capacity-checked rosters driven by reactions",
    long_about = None
)]
pub struct Cli {
    /// Override the data directory (snapshot, board and activity log)
    #[arg(global = true, long = "data", value_name = "DIR")]
    pub data: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Verbose diagnostics (same as RUST_LOG=debug)
    #[arg(global = true, long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and an empty roster
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Post a fresh signup message and schedule the event
    Setup {
        #[arg(long, default_value_t = 1, help = "Channel to post the signup in")]
        channel: u64,

        #[arg(long = "day", help = "Weekday: name, 3-letter abbreviation or 0-6 (0 = Monday)")]
        day: Option<String>,

        #[arg(long, help = "Start time: HH:MM, 7:30pm, 7:30 PM or 7pm")]
        time: Option<String>,

        #[arg(long = "tz", help = "IANA timezone, e.g. Europe/London")]
        tz: Option<String>,

        #[arg(long, help = "One-off date (YYYY-MM-DD) instead of the weekly rule")]
        date: Option<String>,
    },

    /// Add a reaction on the signup message
    React {
        #[arg(long)]
        user: u64,

        #[arg(long)]
        token: String,
    },

    /// Remove a reaction from the signup message
    Unreact {
        #[arg(long)]
        user: u64,

        #[arg(long)]
        token: String,
    },

    /// Read `add|remove <user> <token>` lines from stdin until EOF
    Listen,

    /// Print the current roster summary
    Status,

    /// Empty the roster, keeping the signup message
    Clear,

    /// Clear the roster and forget the signup message and event
    Reset {
        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Create a backup copy of the roster snapshot
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Write a zip archive")]
        compress: bool,
    },

    /// Export the roster
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Absolute output path")]
        file: String,

        #[arg(long, help = "Overwrite without asking")]
        force: bool,
    },

    /// Print the internal activity log
    Log {
        #[arg(long = "print", help = "Print the activity log")]
        print: bool,
    },
}
