//! DecisioMate CLI - serve the phone price form or predict from the shell.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use decisiomate_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Verbosity directives are layered on top of RUST_LOG
    let mut filter = EnvFilter::from_default_env();
    for directive in cli.log_directives() {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("DecisioMate CLI starting...");

    match cli.command {
        Commands::Serve(cmd) => cmd.run().await?,
        Commands::Predict(cmd) => cmd.run()?,
        Commands::Features(cmd) => cmd.run()?,
    }

    Ok(())
}
