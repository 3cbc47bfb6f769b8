//! Phone price classification for DecisioMate.
//!
//! This crate holds the whole prediction path:
//!
//! - **Features**: the fixed-order schema of 20 phone attributes and
//!   coercion of raw form text into a [`FeatureVector`]
//! - **Scaler**: a fitted [`StandardScaler`] read from a JSON artifact
//! - **Network**: the [`PriceClassifier`], a three-layer Candle network with a
//!   hard-coded architecture and weights read from a JSON artifact
//! - **Predictor**: [`Predictor`], which loads both artifacts, scales the row,
//!   runs the forward pass and maps the arg-max class to a [`PriceDecision`]
//!
//! # Quick Start
//!
//! ```no_run
//! use decisiomate_model::prelude::*;
//!
//! let predictor = Predictor::new(ArtifactPaths::default(), ArtifactPolicy::Reload);
//! let features = FeatureVector::sample();
//! let prediction = predictor.predict(&features)?;
//! println!("{}", prediction.message());
//! # Ok::<(), ModelError>(())
//! ```

#![warn(missing_docs)]

pub mod decision;
pub mod error;
pub mod features;
#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;
pub mod network;
pub mod predictor;
pub mod scaler;

pub use decision::{Prediction, PriceDecision};
pub use error::{ErrorKind, ModelError, ModelResult};
pub use features::{FeatureKind, FeatureSpec, FeatureValue, FeatureVector, FEATURES, NUM_FEATURES};
pub use network::{PriceClassifier, ARCHITECTURE, NUM_CLASSES};
pub use predictor::{ArtifactPaths, ArtifactPolicy, LoadedArtifacts, Predictor};
pub use scaler::StandardScaler;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::decision::{Prediction, PriceDecision};
    pub use crate::error::{ErrorKind, ModelError, ModelResult};
    pub use crate::features::{FeatureKind, FeatureValue, FeatureVector, FEATURES};
    pub use crate::network::PriceClassifier;
    pub use crate::predictor::{ArtifactPaths, ArtifactPolicy, Predictor};
    pub use crate::scaler::StandardScaler;
}
