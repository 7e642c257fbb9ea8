//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Singer tap for sharded, Vitess-based MySQL databases
#[derive(Parser, Debug)]
#[command(name = "vitess-tap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON) with the source credentials
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit a catalog describing the source's tables
    Discover {
        /// Mark discovered tables and columns as selected
        #[arg(long)]
        auto_select: bool,

        /// Tables to leave out of the catalog (comma-separated)
        #[arg(long)]
        excluded_tables: Option<String>,

        /// Type tinyint(1) columns as boolean instead of integer
        #[arg(long)]
        treat_tiny_int_as_boolean: bool,

        /// Mark discovered streams for incremental replication
        #[arg(long)]
        default_incremental: bool,
    },

    /// Stream rows for the selected catalog as Singer messages
    Sync {
        /// Catalog file (JSON)
        #[arg(long)]
        catalog: PathBuf,

        /// State file (JSON) from a previous run
        #[arg(long)]
        state: Option<PathBuf>,

        /// Sync from replica tablets
        #[arg(long, conflicts_with = "use_rdonly")]
        use_replica: bool,

        /// Sync from read-only tablets
        #[arg(long)]
        use_rdonly: bool,

        /// The tinyint(1) setting the catalog was discovered under
        #[arg(long)]
        treat_tiny_int_as_boolean: bool,

        /// Records buffered before the stdout sink writes them
        #[arg(long, default_value = "10000")]
        buffer_size: usize,

        /// Ship records to this import API instead of stdout
        #[arg(long, requires = "api_token")]
        api_url: Option<String>,

        /// Token for the import API
        #[arg(long)]
        api_token: Option<String>,

        /// Records accumulated before an import batch is flushed
        #[arg(long, default_value = "20")]
        batch_size: usize,

        /// Directory where the import sink saves received state
        #[arg(long, default_value = "state")]
        state_directory: PathBuf,
    },

    /// Read Singer messages from stdin and ship them to the import API
    Commit {
        /// Import API URL
        #[arg(long, default_value = "https://api.stitchdata.com")]
        api_url: String,

        /// Token for the import API
        #[arg(long)]
        api_token: String,

        /// Records accumulated before an import batch is flushed
        #[arg(long, default_value = "20")]
        batch_size: usize,

        /// Directory where received state is saved
        #[arg(long, default_value = "state")]
        state_directory: PathBuf,
    },
}
