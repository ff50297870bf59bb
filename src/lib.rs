#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
mod ui;
pub mod utils;

pub use app::{App, Dashboard};
pub use data::{PageLocation, ServerOrigin};

// CLI argument parsing
use {clap::Parser, std::path::PathBuf};

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scan server origin, e.g. http://192.168.1.20:5001 (defaults to the local server)
    #[arg(long)]
    pub server: Option<String>,

    /// Coin list file (.txt, one symbol per line or comma separated) to load at startup
    #[arg(long)]
    pub coin_list: Option<PathBuf>,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> App {
    App::new(cc, args)
}
