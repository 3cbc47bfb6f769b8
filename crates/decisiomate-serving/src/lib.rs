//! Web serving for DecisioMate.
//!
//! This crate exposes the phone price predictor over HTTP:
//!
//! - **Form**: an HTML page with one box per phone attribute and a Predict
//!   button; the decision sentence is shown in a disabled result box
//! - **JSON API**: `POST /api/predict` for programmatic clients
//! - **Health**: `GET /health` reporting artifact availability
//!
//! # Quick Start
//!
//! ```no_run
//! use decisiomate_serving::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder()
//!         .host("0.0.0.0")
//!         .port(10101)
//!         .build();
//!
//!     Server::new(config)?.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod server;

pub use api::{ErrorResponse, HealthResponse, PredictRequest, PredictResponse};
pub use config::{ConfigError, FooterLink, PageConfig, ServerConfig, ServerConfigBuilder};
pub use error::{ServingError, ServingResult};
pub use form::{render_page, FormView};
pub use server::{router, AppState, Server};
