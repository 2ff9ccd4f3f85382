//! `vc3d` entry point

use anyhow::Result;
use clap::Parser;

use vc3d_terminal::{execute, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    execute(cli)
}
