//! The prediction handler: features in, decision out.
//!
//! [`Predictor`] ties together artifact loading, scaling, the forward pass
//! and the class-to-sentence mapping. By default artifacts are re-read from
//! disk on every call; [`ArtifactPolicy::Cached`] keeps the first successful
//! load for the lifetime of the predictor.

use crate::decision::{PriceDecision, Prediction};
use crate::error::{ModelError, ModelResult};
use crate::features::FeatureVector;
use crate::network::{argmax, PriceClassifier};
use crate::scaler::StandardScaler;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Default location of the weights artifact, relative to the working
/// directory.
pub const DEFAULT_WEIGHTS_PATH: &str = "rec_data/mobile_price_prediction_weights.json";

/// Default location of the scaler artifact, relative to the working
/// directory.
pub const DEFAULT_SCALER_PATH: &str = "rec_data/scaler.json";

/// File locations of the two artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Dense params of the classifier
    pub weights: PathBuf,
    /// Fitted scaler
    pub scaler: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            weights: PathBuf::from(DEFAULT_WEIGHTS_PATH),
            scaler: PathBuf::from(DEFAULT_SCALER_PATH),
        }
    }
}

impl ArtifactPaths {
    /// Create paths from explicit locations.
    pub fn new(weights: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        Self {
            weights: weights.into(),
            scaler: scaler.into(),
        }
    }

    /// Whether both files currently exist.
    pub fn exist(&self) -> bool {
        self.weights.is_file() && self.scaler.is_file()
    }
}

/// When artifacts are read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactPolicy {
    /// Read both files on every prediction.
    #[default]
    Reload,
    /// Read once on first use and reuse afterwards.
    Cached,
}

impl std::str::FromStr for ArtifactPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reload" => Ok(Self::Reload),
            "cached" | "cache" => Ok(Self::Cached),
            other => Err(format!(
                "unknown artifact policy {other:?} (expected \"reload\" or \"cached\")"
            )),
        }
    }
}

/// A scaler and classifier loaded together.
#[derive(Debug)]
pub struct LoadedArtifacts {
    /// The classifier
    pub classifier: PriceClassifier,
    /// The scaler
    pub scaler: StandardScaler,
    /// When the artifacts were read
    pub loaded_at: Instant,
}

impl LoadedArtifacts {
    /// Reads both artifacts. The weights are read first.
    pub fn load(paths: &ArtifactPaths) -> ModelResult<Self> {
        let classifier = PriceClassifier::load(&paths.weights)?;
        let scaler = StandardScaler::load(&paths.scaler)?;
        Ok(Self {
            classifier,
            scaler,
            loaded_at: Instant::now(),
        })
    }

    /// Scales a row, runs the classifier and picks the arg-max class.
    pub fn predict(&self, features: &FeatureVector) -> ModelResult<Prediction> {
        let scaled = self.scaler.transform(&features.to_f32_vec())?;
        let probabilities = self.classifier.predict_proba(&scaled)?;
        let class_index = argmax(&probabilities)
            .ok_or_else(|| ModelError::inference("model produced no classes"))?;
        let decision = PriceDecision::from_class_index(class_index)?;
        Ok(Prediction {
            decision,
            class_index,
            probabilities,
        })
    }
}

/// Prediction handler.
///
/// # Example
///
/// ```no_run
/// use decisiomate_model::predictor::{ArtifactPaths, ArtifactPolicy, Predictor};
/// use decisiomate_model::features::FeatureVector;
///
/// let predictor = Predictor::new(ArtifactPaths::default(), ArtifactPolicy::Reload);
/// let prediction = predictor.predict(&FeatureVector::sample()).unwrap();
/// println!("{}", prediction.message());
/// ```
pub struct Predictor {
    paths: ArtifactPaths,
    policy: ArtifactPolicy,
    cache: RwLock<Option<Arc<LoadedArtifacts>>>,
}

impl Predictor {
    /// Create a predictor reading from `paths`.
    pub fn new(paths: ArtifactPaths, policy: ArtifactPolicy) -> Self {
        Self {
            paths,
            policy,
            cache: RwLock::new(None),
        }
    }

    /// Artifact locations.
    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Loading policy.
    pub fn policy(&self) -> ArtifactPolicy {
        self.policy
    }

    /// Whether artifacts are currently held in memory.
    pub fn is_cached(&self) -> bool {
        self.cache.read().is_some()
    }

    /// Drops any cached artifacts so the next prediction re-reads them.
    pub fn invalidate(&self) {
        let mut cache = self.cache.write();
        if cache.take().is_some() {
            info!("Dropped cached artifacts");
        }
    }

    /// Returns artifacts according to the loading policy.
    ///
    /// Failed loads are never cached.
    pub fn artifacts(&self) -> ModelResult<Arc<LoadedArtifacts>> {
        match self.policy {
            ArtifactPolicy::Reload => LoadedArtifacts::load(&self.paths).map(Arc::new),
            ArtifactPolicy::Cached => {
                if let Some(loaded) = self.cache.read().as_ref() {
                    return Ok(Arc::clone(loaded));
                }
                let mut cache = self.cache.write();
                if let Some(loaded) = cache.as_ref() {
                    return Ok(Arc::clone(loaded));
                }
                let loaded = Arc::new(LoadedArtifacts::load(&self.paths)?);
                info!(
                    "Cached artifacts from {:?} and {:?}",
                    self.paths.weights, self.paths.scaler
                );
                *cache = Some(Arc::clone(&loaded));
                Ok(loaded)
            }
        }
    }

    /// Predicts the price decision for one phone.
    ///
    /// Errors are logged and returned; nothing is retried.
    pub fn predict(&self, features: &FeatureVector) -> ModelResult<Prediction> {
        debug!("Predicting price range for: {}", features);
        let result = self
            .artifacts()
            .and_then(|artifacts| artifacts.predict(features));
        match &result {
            Ok(prediction) => debug!(
                "Predicted class {} with probabilities {:?}",
                prediction.class_index, prediction.probabilities
            ),
            Err(e) => error!("Error predicting price range: {}", e),
        }
        result
    }

    /// Assembles features from raw text fields and predicts.
    pub fn predict_from_fields<V: AsRef<str>>(
        &self,
        fields: &HashMap<String, V>,
    ) -> ModelResult<Prediction> {
        let features = FeatureVector::from_map(fields).map_err(|e| {
            error!("Error assembling features: {}", e);
            e
        })?;
        self.predict(&features)
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("paths", &self.paths)
            .field("policy", &self.policy)
            .field("cached", &self.is_cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{feature_index, FeatureValue};
    use crate::fixtures::{sample_centered_scaler, sign_params, write_artifacts};
    use tempfile::tempdir;

    fn ram_index() -> usize {
        feature_index("ram").unwrap()
    }

    fn with_ram(ram: i64) -> FeatureVector {
        let mut values = FeatureVector::sample().values().to_vec();
        values[ram_index()] = FeatureValue::Int(ram);
        FeatureVector::from_values(values).unwrap()
    }

    #[test]
    fn test_default_paths() {
        let paths = ArtifactPaths::default();
        assert_eq!(paths.weights, PathBuf::from(DEFAULT_WEIGHTS_PATH));
        assert_eq!(paths.scaler, PathBuf::from(DEFAULT_SCALER_PATH));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("reload".parse::<ArtifactPolicy>(), Ok(ArtifactPolicy::Reload));
        assert_eq!("Cached".parse::<ArtifactPolicy>(), Ok(ArtifactPolicy::Cached));
        assert!("sometimes".parse::<ArtifactPolicy>().is_err());
    }

    #[test]
    fn test_predict_follows_scaled_sign() {
        let dir = tempdir().unwrap();
        let paths =
            write_artifacts(dir.path(), &sign_params(ram_index()), &sample_centered_scaler())
                .unwrap();
        let predictor = Predictor::new(paths, ArtifactPolicy::Reload);

        let high = predictor.predict(&with_ram(4000)).unwrap();
        assert_eq!(high.decision, PriceDecision::CanSellHigh);
        assert_eq!(high.class_index, 1);

        let low = predictor.predict(&with_ram(500)).unwrap();
        assert_eq!(low.decision, PriceDecision::CannotSellHigh);
        assert_eq!(low.message(), "You cannot sell this phone at a high price.");
    }

    #[test]
    fn test_reload_policy_sees_new_files() {
        let dir = tempdir().unwrap();
        let paths =
            write_artifacts(dir.path(), &sign_params(ram_index()), &sample_centered_scaler())
                .unwrap();
        let predictor = Predictor::new(paths.clone(), ArtifactPolicy::Reload);
        assert_eq!(predictor.predict(&with_ram(4000)).unwrap().class_index, 1);
        assert!(!predictor.is_cached());

        std::fs::remove_file(&paths.weights).unwrap();
        let err = predictor.predict(&with_ram(4000)).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactIo { .. }));
    }

    #[test]
    fn test_cached_policy_reuses_artifacts() {
        let dir = tempdir().unwrap();
        let paths =
            write_artifacts(dir.path(), &sign_params(ram_index()), &sample_centered_scaler())
                .unwrap();
        let predictor = Predictor::new(paths.clone(), ArtifactPolicy::Cached);
        assert!(!predictor.is_cached());

        let first = predictor.artifacts().unwrap();
        assert!(predictor.is_cached());
        std::fs::remove_file(&paths.weights).unwrap();

        let second = predictor.artifacts().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(predictor.predict(&with_ram(4000)).unwrap().class_index, 1);

        predictor.invalidate();
        assert!(!predictor.is_cached());
        assert!(predictor.predict(&with_ram(4000)).is_err());
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("w.json"), dir.path().join("s.json"));
        let predictor = Predictor::new(paths.clone(), ArtifactPolicy::Cached);
        assert!(predictor.artifacts().is_err());
        assert!(!predictor.is_cached());

        write_artifacts(dir.path(), &sign_params(0), &sample_centered_scaler()).unwrap();
        std::fs::rename(dir.path().join("weights.json"), &paths.weights).unwrap();
        std::fs::rename(dir.path().join("scaler.json"), &paths.scaler).unwrap();
        assert!(predictor.artifacts().is_ok());
        assert!(predictor.is_cached());
    }

    #[test]
    fn test_predict_from_fields_missing() {
        let dir = tempdir().unwrap();
        let paths =
            write_artifacts(dir.path(), &sign_params(0), &sample_centered_scaler()).unwrap();
        let predictor = Predictor::new(paths, ArtifactPolicy::Reload);

        let mut fields = FeatureVector::sample().to_text_map();
        fields.remove("wifi");
        let err = predictor.predict_from_fields(&fields).unwrap_err();
        assert!(err.is_validation());
    }
}
