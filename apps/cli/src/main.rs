//! ftapi CLI — fetch content items and site pages from the FT content API.
//!
//! Each result is printed to stdout as one JSON event per line.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);

    // Request tasks are spawned onto this runtime through its handle.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("ftapi-worker")
        .build()?;
    let handle = runtime.handle().clone();
    runtime.block_on(commands::run(cli, handle))
}
