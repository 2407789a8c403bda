use crate::models::category::Category;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rpeetracker
#[derive(Parser)]
#[command(
    name = "rpeetracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Log water intake and bathroom trips, and see today's tallies. Everything stays on this device.",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Log an event right now
    Add {
        #[arg(value_enum)]
        category: Category,
    },

    /// Show the counts for a day
    Status {
        #[arg(long, help = "Day to show (YYYY-MM-DD), default today")]
        date: Option<String>,
    },

    /// List the events logged on a day
    List {
        #[arg(long, help = "Day to list (YYYY-MM-DD), default today")]
        date: Option<String>,
    },

    /// Delete every event of a day
    Reset {
        #[arg(long, help = "Day to reset (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Keep today's counts on screen, following the day as it rolls over
    Watch {
        #[arg(long, help = "Seconds between day checks (default from config)")]
        interval: Option<u64>,
    },

    /// Manage the offline cache of the application shell assets
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Fetch every manifest asset into the current generation
    Install,

    /// Delete every cache generation other than the current one
    Activate,

    /// Serve one asset (cache first, refreshed from the network)
    Fetch {
        /// Asset path, e.g. /app.js
        path: String,

        #[arg(long, short = 'o', value_name = "FILE", help = "Write the body to FILE")]
        output: Option<String>,
    },

    /// List cache generations
    List,
}
