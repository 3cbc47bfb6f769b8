//! Mapping from class index to the sentence shown to the user.

use crate::error::{ModelError, ModelResult};
use serde::Serialize;
use std::fmt;

/// Whether a phone can be sold at a high price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDecision {
    /// Class 0
    CannotSellHigh,
    /// Class 1
    CanSellHigh,
}

impl PriceDecision {
    /// Maps a classifier output to a decision.
    pub fn from_class_index(index: usize) -> ModelResult<Self> {
        match index {
            0 => Ok(Self::CannotSellHigh),
            1 => Ok(Self::CanSellHigh),
            other => Err(ModelError::inference(format!(
                "class index {other} out of range"
            ))),
        }
    }

    /// The class index this decision corresponds to.
    pub fn class_index(&self) -> usize {
        match self {
            Self::CannotSellHigh => 0,
            Self::CanSellHigh => 1,
        }
    }

    /// The sentence displayed in the form.
    pub fn message(&self) -> &'static str {
        match self {
            Self::CannotSellHigh => "You cannot sell this phone at a high price.",
            Self::CanSellHigh => "You can sell this phone at a high price.",
        }
    }
}

impl fmt::Display for PriceDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Selected class
    pub decision: PriceDecision,
    /// Arg-max class index
    pub class_index: usize,
    /// Softmax output, one entry per class
    pub probabilities: Vec<f32>,
}

impl Prediction {
    /// The sentence for the selected class.
    pub fn message(&self) -> &'static str {
        self.decision.message()
    }
}
