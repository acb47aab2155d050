use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// openwith – category-aware "Open with" menu for a file selection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Handler registry root (defaults to "<Documents>/Open With Handlers for")
    #[arg(long, global = true, env = "OPENWITH_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the handler menu for the selection and launch the chosen entry
    Menu(MenuArgs),
    /// Print the command table for the selection without any UI
    Table(TableArgs),
    /// Launch command ID for the selection without any UI
    Invoke(InvokeArgs),
    /// Create the handler root and its category folders
    Init(InitArgs),
    /// Print the handler registry as a tree
    Tree,
}

/// Command id range granted by the host.
#[derive(Args, Debug, Clone, Copy)]
pub struct IdRange {
    /// First command id this menu may use
    #[arg(long, default_value_t = 1, value_name = "ID")]
    pub id_first: u32,

    /// Exclusive upper bound of usable command ids
    #[arg(long, default_value_t = 0x7FFF, value_name = "ID")]
    pub id_last: u32,
}

#[derive(Args, Debug, Clone)]
pub struct LaunchConfig {
    /// Program used to browse the handler root
    #[arg(long, env = "OPENWITH_FILE_MANAGER", value_name = "PROGRAM")]
    pub file_manager: Option<String>,

    /// Program used to run a handler elevated
    #[arg(long, env = "OPENWITH_ELEVATE_WITH", value_name = "PROGRAM")]
    pub elevate_with: Option<String>,

    /// Print what would be launched instead of launching it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct MenuArgs {
    /// Selected files and folders
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub ids: IdRange,

    #[command(flatten)]
    pub launch: LaunchConfig,
}

#[derive(Args, Debug)]
pub struct TableArgs {
    /// Selected files and folders
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub ids: IdRange,
}

#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Command id taken from `openwith table`
    #[arg(value_name = "ID")]
    pub id: u32,

    /// Selected files and folders, as passed to `table`
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Run the handler elevated
    #[arg(long)]
    pub elevate: bool,

    #[command(flatten)]
    pub ids: IdRange,

    #[command(flatten)]
    pub launch: LaunchConfig,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Open the handler root in the file manager afterwards
    #[arg(long)]
    pub open: bool,

    #[command(flatten)]
    pub launch: LaunchConfig,
}
