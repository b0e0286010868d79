//! tgsrender CLI — convert Telegram animated stickers (*.tgs).
//!
//! Usage:
//!   tgsrender [OPTIONS] <PATHS>...
//!
//! Directories are expanded one level deep to the `.tgs` files they hold.
//! Set `USE_SANDBOX=false` to run the browser without its sandbox.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "tgsrender",
    about = "Animated stickers for Telegram (*.tgs) converter",
    version,
    author
)]
struct Cli {
    /// Output image width. Default: auto
    #[arg(long)]
    width: Option<u32>,

    /// Output image height. Default: auto
    #[arg(long)]
    height: Option<u32>,

    /// Output image path and format; `{stem}` and `{dir}` expand per input
    #[arg(long = "out_path", value_name = "TEMPLATE")]
    out_path: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/tgsrender/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Exit with a failure status when any file fails to convert
    #[arg(long)]
    strict: bool,

    /// Paths to .tgs files or directories to convert
    #[arg(required = true, num_args = 1..)]
    paths: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    commands::convert::run(cli).await
}
