//! CLI argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::kind::SnapshotType;

#[derive(Parser)]
#[command(name = "cms-backup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to use instead of the default lookup
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Snapshot the database into a new backup file
    Backup {
        /// Which entity kinds to include: full, tables or sections
        #[arg(short = 't', long = "type", default_value = "full")]
        snapshot_type: SnapshotType,
    },

    /// List backup files, newest first
    List,

    /// Show the metadata and record counts of a backup
    Show {
        /// Backup file name
        filename: String,
    },

    /// Delete a backup file
    Delete {
        /// Backup file name
        filename: String,
    },

    /// Restore from a snapshot file anywhere on disk
    Import {
        /// Path to the snapshot JSON file
        path: PathBuf,
    },

    /// Restore from a file in the backup directory
    Restore {
        /// Backup file name
        filename: String,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination, defaults to the XDG config location
        path: Option<PathBuf>,
    },
}
