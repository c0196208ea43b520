//! CLI definition using clap

use clap::{Parser, Subcommand};
use furiwake_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "furiwake")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Inspection lot assignment board for the appearance inspection floor")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Chart document path (overrides config)
    #[arg(long, global = true)]
    pub chart: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the seating chart when missing, corrupt, or undersized
    Init {
        /// Path to the inspector master CSV (overrides config)
        #[arg(long)]
        roster: Option<PathBuf>,
    },

    /// Show the stored seating chart
    Show,

    /// Assign production lots against the shortage table
    Allocate {
        /// Path to the shortage CSV
        #[arg(long)]
        shortage: PathBuf,

        /// Path to the production lot CSV
        #[arg(long)]
        lots: PathBuf,

        /// Write the result rows as JSON to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Re-attach an inspector-to-lots mapping to the chart and save
    Bind {
        /// Path to the mapping JSON (inspector name or seat id -> lots)
        mapping: PathBuf,

        /// Keep split lots already sitting on their seats
        #[arg(long)]
        preserve_split_lots: bool,

        /// Path to the inspector master CSV, used only when the chart
        /// needs a rebuild first (overrides config)
        #[arg(long)]
        roster: Option<PathBuf>,
    },

    /// Repair split metadata in the stored chart and save
    Normalize,

    /// Split one lot into N parts
    Split {
        /// Seat id holding the lot, or "unassigned"
        seat: String,

        /// Lot id to split
        lot: String,

        /// Number of parts (minimum 2)
        #[arg(long, short = 'n', default_value = "2")]
        count: u32,
    },

    /// Swap the grid positions of two seats
    Swap {
        first: String,
        second: String,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set the chart document path
        #[arg(long)]
        set_chart: Option<PathBuf>,

        /// Set the inspector master CSV path
        #[arg(long)]
        set_roster: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
