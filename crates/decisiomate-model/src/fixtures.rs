//! Small synthetic artifacts for tests and local experiments.
//!
//! These are not trained models. [`sign_params`] builds weights whose
//! decision depends only on the sign of one scaled feature, which makes
//! expected outcomes easy to reason about.

use crate::error::{ModelError, ModelResult};
use crate::features::{FeatureVector, NUM_FEATURES};
use crate::network::{bias_name, weight_name, DenseParams};
use crate::predictor::ArtifactPaths;
use crate::scaler::StandardScaler;
use std::path::Path;

/// Weights that predict class 1 when scaled feature `hot` is positive and
/// class 0 when it is negative.
///
/// # Panics
///
/// Panics if `hot >= NUM_FEATURES`.
pub fn sign_params(hot: usize) -> DenseParams {
    assert!(hot < NUM_FEATURES, "feature index {hot} out of range");
    let mut params = DenseParams::new();

    // h0 = relu(x[hot]), h1 = relu(-x[hot])
    let mut w0 = vec![0.0; 8 * NUM_FEATURES];
    w0[hot] = 1.0;
    w0[NUM_FEATURES + hot] = -1.0;
    params.insert(weight_name(0), w0);
    params.insert(bias_name(0), vec![0.0; 8]);

    // g0 = h0, g1 = h1
    let mut w1 = vec![0.0; 4 * 8];
    w1[0] = 1.0;
    w1[8 + 1] = 1.0;
    params.insert(weight_name(1), w1);
    params.insert(bias_name(1), vec![0.0; 4]);

    // class 0 favours g1, class 1 favours g0
    params.insert(
        weight_name(2),
        vec![-3.0, 3.0, 0.0, 0.0, 3.0, -3.0, 0.0, 0.0],
    );
    params.insert(bias_name(2), vec![0.0; 2]);
    params
}

/// A scaler whose mean is the sample phone and whose scale is one, so the
/// sample scales to all zeros.
pub fn sample_centered_scaler() -> StandardScaler {
    StandardScaler::new(
        FeatureVector::sample().to_f32_vec(),
        vec![1.0; NUM_FEATURES],
    )
}

/// Writes a weights file and a scaler file into `dir`.
pub fn write_artifacts(
    dir: &Path,
    params: &DenseParams,
    scaler: &StandardScaler,
) -> ModelResult<ArtifactPaths> {
    let paths = ArtifactPaths {
        weights: dir.join("weights.json"),
        scaler: dir.join("scaler.json"),
    };
    write_json(&paths.weights, params)?;
    write_json(&paths.scaler, scaler)?;
    Ok(paths)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> ModelResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ModelError::artifact_format(path, e.to_string()))?;
    std::fs::write(path, text).map_err(|source| ModelError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })
}
