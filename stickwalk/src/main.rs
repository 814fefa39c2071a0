//! # Stick Walk
//!
//! Entry point for the Stick Walk binary. Loads a rig (the built-in stickman
//! by default) and drives it with a fixed-timestep scheduler at the
//! requested frame and physics rates. Set `RUST_LOG=debug` for per-frame
//! accounting.

use anyhow::Result;
use clap::Parser;
use stickwalk::app::{self, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    app::run(&cli)?;
    Ok(())
}
