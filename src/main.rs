mod cli;
mod command_table;
mod dispatch;
mod handler_directory;
mod handlers_root;
mod icons;
mod launcher;
mod lifecycle;
mod menu;
mod selection;
mod tree_builder;
mod tui;
mod utils;
mod workflow;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli_args = cli::Cli::parse();
    init_tracing(cli_args.verbose);

    // Delegate the main application logic to the workflow module
    workflow::run_openwith(cli_args)
}
