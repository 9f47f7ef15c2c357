mod clear;
mod inspect;
mod stats;

use clap::{Args, Parser, Subcommand};
use splitdex_core::IndexConfig;
use splitdex_core::store::FileNodeStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "splitdex",
    version,
    about = "Inspect and maintain split relationship index directories",
    long_about = "Splitdex persists relationship facts as one node file per indexed unit. \
                  These commands read a node directory without loading any analysis context."
)]
pub struct Cli {
    #[command(flatten)]
    pub location: IndexLocation,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct IndexLocation {
    /// Node directory. Defaults to $SPLITDEX_INDEX_DIR or ~/.splitdex/nodes.
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// JSON config file; `--dir` still wins over its index_dir.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl IndexLocation {
    pub fn resolve(&self) -> splitdex_core::Result<IndexConfig> {
        let mut config = match &self.config {
            Some(path) => IndexConfig::load(path)?,
            None => IndexConfig::from_env(),
        };
        if let Some(dir) = &self.dir {
            config.index_dir = dir.clone();
        }
        Ok(config)
    }

    pub fn open(&self) -> splitdex_core::Result<FileNodeStore> {
        Ok(FileNodeStore::from_config(&self.resolve()?))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stored nodes, or show one node's entries
    Inspect {
        /// Node file name, e.g. 0_3_7.index
        #[arg(value_name = "NODE")]
        name: Option<String>,
    },
    /// Summarize the node directory
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Delete every node file in the directory
    #[command(
        long_about = "Removes all *.index files from the node directory. Other files are left alone."
    )]
    Clear,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = splitdex_core::logging::init_logging("cli", true);

    let store = cli.location.open()?;
    match cli.command {
        Commands::Inspect { name } => inspect::run(&store, name.as_deref()),
        Commands::Stats { json } => stats::run(&store, json),
        Commands::Clear => clear::run(&store),
    }
}

/// Formats a byte count the way `ls -h` would, roughly.
pub(crate) fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    }
}
