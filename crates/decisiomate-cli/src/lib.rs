//! DecisioMate CLI Library
//!
//! This crate provides the command-line interface for DecisioMate:
//!
//! - **Serve**: the web form and JSON API
//! - **Predict**: a one-off prediction from the command line
//! - **Features**: the model inputs, their types and sample values
//!
//! # Example
//!
//! ```bash
//! # Serve the form on the default port
//! decisiomate serve --weights rec_data/mobile_price_prediction_weights.json
//!
//! # Predict for the sample phone with more RAM
//! decisiomate predict --sample --set ram=3900
//!
//! # List the inputs as JSON
//! decisiomate features --json
//! ```

pub mod commands;

use clap::{Parser, Subcommand};

pub use commands::{FeaturesCommand, PredictCommand, ServeCommand};

/// DecisioMate - decide whether a phone can be sold at a high price
#[derive(Parser, Debug)]
#[command(name = "decisiomate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv to include HTTP traces)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default `EnvFilter` directives for the chosen verbosity.
    pub fn log_directives(&self) -> Vec<&'static str> {
        match self.verbose {
            0 => vec!["decisiomate=info"],
            1 => vec!["decisiomate=debug"],
            _ => vec!["decisiomate=debug", "tower_http=debug"],
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the prediction form over HTTP
    Serve(ServeCommand),

    /// Predict the price decision for one phone
    Predict(PredictCommand),

    /// List the model inputs
    Features(FeaturesCommand),
}

/// Result type alias for CLI operations
pub type CliResult<T> = anyhow::Result<T>;
