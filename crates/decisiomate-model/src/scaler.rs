//! Standardization of feature rows with a previously fitted scaler.

use crate::error::{ModelError, ModelResult};
use crate::features::{FEATURES, NUM_FEATURES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A fitted per-feature standardization transform.
///
/// Stored as JSON. Field names follow the fitted-estimator attribute names,
/// with or without the trailing underscore:
///
/// ```json
/// { "mean": [..20 values..], "scale": [..20 values..] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature mean
    #[serde(alias = "mean_")]
    pub mean: Vec<f32>,
    /// Per-feature scale (standard deviation)
    #[serde(alias = "scale_")]
    pub scale: Vec<f32>,
    /// Per-feature variance, informational only
    #[serde(default, alias = "var_", skip_serializing_if = "Option::is_none")]
    pub var: Option<Vec<f32>>,
    /// Feature names the scaler was fitted on
    #[serde(
        default,
        alias = "feature_names_in_",
        skip_serializing_if = "Option::is_none"
    )]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    /// Creates a scaler from mean and scale vectors.
    pub fn new(mean: Vec<f32>, scale: Vec<f32>) -> Self {
        Self {
            mean,
            scale,
            var: None,
            feature_names: None,
        }
    }

    /// Reads and validates a scaler artifact.
    ///
    /// # Errors
    ///
    /// [`ModelError::ArtifactIo`] if the file cannot be read,
    /// [`ModelError::ArtifactFormat`] if it does not describe a 20-feature
    /// scaler.
    pub fn load(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        debug!("Loading scaler from {:?}", path);
        let bytes = std::fs::read(path).map_err(|source| ModelError::ArtifactIo {
            path: path.to_path_buf(),
            source,
        })?;
        let scaler: StandardScaler = serde_json::from_slice(&bytes)
            .map_err(|e| ModelError::artifact_format(path, format!("malformed scaler: {e}")))?;
        scaler
            .validate()
            .map_err(|message| ModelError::artifact_format(path, message))?;
        debug!("Scaler loaded successfully");
        Ok(scaler)
    }

    /// Checks dimensions, finiteness and feature order.
    pub fn validate(&self) -> Result<(), String> {
        if self.mean.len() != NUM_FEATURES || self.scale.len() != NUM_FEATURES {
            return Err(format!(
                "expected {} features, got mean={} scale={}",
                NUM_FEATURES,
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(var) = &self.var {
            if var.len() != NUM_FEATURES {
                return Err(format!("var has {} entries", var.len()));
            }
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err("mean and scale must be finite".to_string());
        }
        if let Some(names) = &self.feature_names {
            let expected: Vec<&str> = FEATURES.iter().map(|s| s.name).collect();
            if names.iter().map(String::as_str).ne(expected.iter().copied()) {
                return Err(format!(
                    "feature order {:?} does not match {:?}",
                    names, expected
                ));
            }
        }
        Ok(())
    }

    /// Number of features this scaler transforms.
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardizes one row: `(x - mean) / scale`.
    ///
    /// A zero scale is treated as one, so constant training features map to
    /// `x - mean` instead of infinity.
    pub fn transform(&self, row: &[f32]) -> ModelResult<Vec<f32>> {
        if row.len() != self.n_features() {
            return Err(ModelError::inference(format!(
                "scaler expects {} features, got {}",
                self.n_features(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&mean, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - mean) / scale
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn unit_scaler() -> StandardScaler {
        StandardScaler::new(vec![0.0; NUM_FEATURES], vec![1.0; NUM_FEATURES])
    }

    #[test]
    fn test_transform_standardizes() {
        let mut scaler = unit_scaler();
        scaler.mean[0] = 1000.0;
        scaler.scale[0] = 500.0;
        let mut row = vec![1.0; NUM_FEATURES];
        row[0] = 1500.0;

        let out = scaler.transform(&row).unwrap();
        assert_eq!(out[0], 1.0);
        assert_eq!(out[1], 1.0);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let mut scaler = unit_scaler();
        scaler.mean[3] = 2.0;
        scaler.scale[3] = 0.0;
        let out = scaler.transform(&[5.0; NUM_FEATURES]).unwrap();
        assert_eq!(out[3], 3.0);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_transform_wrong_length() {
        let err = unit_scaler().transform(&[1.0; 3]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Inference);
    }

    #[test]
    fn test_validate_rejects_wrong_count() {
        let scaler = StandardScaler::new(vec![0.0; 21], vec![1.0; 21]);
        assert!(scaler.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_feature_order() {
        let mut scaler = unit_scaler();
        let mut names: Vec<String> = FEATURES.iter().map(|s| s.name.to_string()).collect();
        names.swap(0, 1);
        scaler.feature_names = Some(names);
        assert!(scaler.validate().is_err());

        let names: Vec<String> = FEATURES.iter().map(|s| s.name.to_string()).collect();
        scaler.feature_names = Some(names);
        assert!(scaler.validate().is_ok());
    }

    #[test]
    fn test_load_accepts_fitted_attribute_names() {
        let mut file = NamedTempFile::new().unwrap();
        let json = serde_json::json!({
            "mean_": vec![1.0; NUM_FEATURES],
            "scale_": vec![2.0; NUM_FEATURES],
            "var_": vec![4.0; NUM_FEATURES],
        });
        write!(file, "{json}").unwrap();

        let scaler = StandardScaler::load(file.path()).unwrap();
        assert_eq!(scaler.mean, vec![1.0; NUM_FEATURES]);
        assert_eq!(scaler.var.as_ref().map(Vec::len), Some(NUM_FEATURES));
    }

    #[test]
    fn test_load_missing_file() {
        let err = StandardScaler::load("/nonexistent/scaler.json").unwrap_err();
        assert!(matches!(err, ModelError::ArtifactIo { .. }));
    }

    #[test]
    fn test_load_corrupt_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95pickle").unwrap();
        let err = StandardScaler::load(file.path()).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactFormat { .. }));
    }
}
