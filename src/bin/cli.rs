// src/bin/cli.rs
use borough_map::cli::{self, Args};
use clap::Parser;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    cli::run(args)?;
    Ok(())
}
