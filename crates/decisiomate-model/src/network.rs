//! Candle-backed price classifier.
//!
//! The network architecture is fixed: three dense layers
//! (20 → 8 relu, 8 → 4 relu, 4 → 2 softmax). Only the weights come from disk.
//! The weights artifact is a flat JSON object of dense params:
//!
//! ```text
//! {
//!   "mlp.layers.0.weight": [.. 8 * 20 values, row-major [out, in] ..],
//!   "mlp.layers.0.bias":   [.. 8 values ..],
//!   ...
//!   "mlp.layers.2.bias":   [.. 2 values ..]
//! }
//! ```
//!
//! Loading fails if a param is missing, has the wrong length, or if the file
//! carries params this architecture does not have.

use crate::error::{ModelError, ModelResult};
use crate::features::NUM_FEATURES;
use candle_core::{Device, Tensor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Number of output classes.
pub const NUM_CLASSES: usize = 2;

/// Flat dense parameters keyed by name.
pub type DenseParams = HashMap<String, Vec<f32>>;

/// Activation applied after a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Rectified linear unit
    Relu,
    /// Softmax over the class axis
    Softmax,
}

impl Activation {
    fn apply(&self, t: Tensor) -> candle_core::Result<Tensor> {
        match self {
            Activation::Relu => t.relu(),
            Activation::Softmax => candle_nn::ops::softmax(&t, 1),
        }
    }
}

/// Shape of one dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DenseSpec {
    /// Input width
    pub in_dim: usize,
    /// Output width
    pub out_dim: usize,
    /// Activation after the affine transform
    pub activation: Activation,
}

/// The hard-coded network.
pub const ARCHITECTURE: [DenseSpec; 3] = [
    DenseSpec {
        in_dim: NUM_FEATURES,
        out_dim: 8,
        activation: Activation::Relu,
    },
    DenseSpec {
        in_dim: 8,
        out_dim: 4,
        activation: Activation::Relu,
    },
    DenseSpec {
        in_dim: 4,
        out_dim: NUM_CLASSES,
        activation: Activation::Softmax,
    },
];

/// Param name of a layer's weight matrix.
pub fn weight_name(layer: usize) -> String {
    format!("mlp.layers.{layer}.weight")
}

/// Param name of a layer's bias vector.
pub fn bias_name(layer: usize) -> String {
    format!("mlp.layers.{layer}.bias")
}

const PARAMS_SOURCE: &str = "<dense params>";

fn tensor_from_vec(
    params: &DenseParams,
    name: &str,
    shape: &[usize],
    device: &Device,
) -> ModelResult<Tensor> {
    let data = params.get(name).ok_or_else(|| {
        ModelError::artifact_format(PARAMS_SOURCE, format!("missing dense param {name:?}"))
    })?;
    let numel: usize = shape.iter().product();
    if data.len() != numel {
        return Err(ModelError::artifact_format(
            PARAMS_SOURCE,
            format!(
                "param {:?} has len {}, expected {} for shape {:?}",
                name,
                data.len(),
                numel,
                shape
            ),
        ));
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::artifact_format(
            PARAMS_SOURCE,
            format!("param {name:?} contains non-finite values"),
        ));
    }
    Tensor::from_slice(data, shape, device).map_err(|e| {
        ModelError::artifact_format(PARAMS_SOURCE, format!("tensor init failed: {e}"))
    })
}

fn linear(x: &Tensor, w: &Tensor, b: &Tensor) -> candle_core::Result<Tensor> {
    // x: [B, in], w: [out, in]
    x.matmul(&w.t()?)?.broadcast_add(b)
}

#[derive(Debug)]
struct DenseLayer {
    weight: Tensor,
    bias: Tensor,
    activation: Activation,
}

/// Trained three-layer classifier.
#[derive(Debug)]
pub struct PriceClassifier {
    layers: Vec<DenseLayer>,
    device: Device,
}

impl PriceClassifier {
    /// Reads a weights artifact and builds the network.
    ///
    /// # Errors
    ///
    /// [`ModelError::ArtifactIo`] if the file cannot be read,
    /// [`ModelError::ArtifactFormat`] if it is not valid JSON or does not
    /// match [`ARCHITECTURE`].
    pub fn load(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        debug!("Loading model weights from {:?}", path);
        let bytes = std::fs::read(path).map_err(|source| ModelError::ArtifactIo {
            path: path.to_path_buf(),
            source,
        })?;
        let params: DenseParams = serde_json::from_slice(&bytes).map_err(|e| {
            ModelError::artifact_format(path, format!("malformed dense params: {e}"))
        })?;
        let model = Self::from_params(&params).map_err(|err| match err {
            ModelError::ArtifactFormat { message, .. } => {
                ModelError::artifact_format(path, message)
            }
            other => other,
        })?;
        debug!("Model loaded successfully");
        Ok(model)
    }

    /// Builds the network from in-memory params.
    pub fn from_params(params: &DenseParams) -> ModelResult<Self> {
        let device = Device::Cpu;
        let mut layers = Vec::with_capacity(ARCHITECTURE.len());
        for (i, spec) in ARCHITECTURE.iter().enumerate() {
            let weight =
                tensor_from_vec(params, &weight_name(i), &[spec.out_dim, spec.in_dim], &device)?;
            let bias = tensor_from_vec(params, &bias_name(i), &[spec.out_dim], &device)?;
            layers.push(DenseLayer {
                weight,
                bias,
                activation: spec.activation,
            });
        }

        let expected = ARCHITECTURE.len() * 2;
        if params.len() != expected {
            let mut unexpected: Vec<&str> = params
                .keys()
                .map(String::as_str)
                .filter(|name| {
                    !(0..ARCHITECTURE.len())
                        .any(|i| *name == weight_name(i) || *name == bias_name(i))
                })
                .collect();
            unexpected.sort_unstable();
            return Err(ModelError::artifact_format(
                PARAMS_SOURCE,
                format!("unexpected dense params {unexpected:?}"),
            ));
        }

        Ok(Self { layers, device })
    }

    /// Runs the forward pass on one scaled row and returns class
    /// probabilities.
    pub fn predict_proba(&self, scaled: &[f32]) -> ModelResult<Vec<f32>> {
        if scaled.len() != NUM_FEATURES {
            return Err(ModelError::inference(format!(
                "model expects {} inputs, got {}",
                NUM_FEATURES,
                scaled.len()
            )));
        }
        let mut x = Tensor::from_slice(scaled, (1, NUM_FEATURES), &self.device)?;
        for layer in &self.layers {
            x = linear(&x, &layer.weight, &layer.bias)?;
            x = layer.activation.apply(x)?;
        }
        let probs = x
            .to_vec2::<f32>()?
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::inference("empty model output"))?;
        if probs.len() != NUM_CLASSES || probs.iter().any(|p| !p.is_finite()) {
            return Err(ModelError::inference(format!(
                "unusable model output {probs:?}"
            )));
        }
        Ok(probs)
    }
}

/// Index of the largest probability; ties go to the lowest index.
pub fn argmax(probs: &[f32]) -> Option<usize> {
    probs
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((i, p)),
        })
        .map(|(i, _)| i)
}
