//! CLI Command Implementations
//!
//! - [`serve`]: the web form and JSON API
//! - [`predict`]: a single prediction
//! - [`features`]: the input schema

mod features;
mod predict;
mod serve;

pub use features::FeaturesCommand;
pub use predict::PredictCommand;
pub use serve::ServeCommand;
