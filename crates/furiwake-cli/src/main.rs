//! Furiwake - inspection lot assignment board
//!
//! CLI shell around the seating-chart engine: chart bring-up, shortage
//! allocation, lot binding, and board maintenance commands.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
