//! Feature schema and feature-vector assembly.
//!
//! The classifier was trained on twenty phone-hardware attributes in a fixed
//! order. [`FEATURES`] is the single source of truth for that order, the
//! numeric type each attribute is coerced to, its form label and the sample
//! value shown when the form is first rendered.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Number of features the scaler and network expect.
pub const NUM_FEATURES: usize = 20;

/// Numeric type a raw feature value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Whole number (counts, flags, pixels, megabytes).
    Int,
    /// Floating point (GHz, cm).
    Float,
}

impl FeatureKind {
    /// Name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int => "integer",
            Self::Float => "float",
        }
    }

    /// Coerces a raw text value to this kind.
    ///
    /// Surrounding whitespace is ignored. Integer features reject fractional
    /// text such as `"2.0"`; float features reject `nan` and infinities.
    pub fn coerce(&self, field: &str, raw: &str) -> ModelResult<FeatureValue> {
        let text = raw.trim();
        match self {
            Self::Int => text
                .parse::<i64>()
                .map(FeatureValue::Int)
                .map_err(|_| ModelError::invalid_field(field, raw, self.type_name())),
            Self::Float => text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FeatureValue::Float)
                .ok_or_else(|| ModelError::invalid_field(field, raw, self.type_name())),
        }
    }
}

/// A single coerced feature value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
}

impl FeatureValue {
    /// Returns the value as the `f32` the network consumes.
    pub fn as_f32(&self) -> f32 {
        match *self {
            Self::Int(v) => v as f32,
            Self::Float(v) => v as f32,
        }
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> FeatureKind {
        match self {
            Self::Int(_) => FeatureKind::Int,
            Self::Float(_) => FeatureKind::Float,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(v) => write!(f, "{v}"),
            // Whole floats keep one decimal so they read back as floats.
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Description of one model input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSpec {
    /// Form field name
    pub name: &'static str,
    /// Display label
    pub label: &'static str,
    /// Numeric type
    pub kind: FeatureKind,
    /// Default value shown on first render
    pub sample: FeatureValue,
}

const fn int(name: &'static str, label: &'static str, sample: i64) -> FeatureSpec {
    FeatureSpec {
        name,
        label,
        kind: FeatureKind::Int,
        sample: FeatureValue::Int(sample),
    }
}

const fn float(name: &'static str, label: &'static str, sample: f64) -> FeatureSpec {
    FeatureSpec {
        name,
        label,
        kind: FeatureKind::Float,
        sample: FeatureValue::Float(sample),
    }
}

/// The model inputs, in training order.
pub static FEATURES: [FeatureSpec; NUM_FEATURES] = [
    int("battery_power", "Battery Power", 842),
    int("blue", "Blue", 0),
    float("clock_speed", "Clock Speed", 2.2),
    int("dual_sim", "Dual Sim", 0),
    int("fc", "FC", 1),
    int("four_g", "Four G", 0),
    int("int_memory", "Internal Memory", 7),
    float("m_dep", "M Dep", 0.6),
    int("mobile_wt", "Mobile Weight", 188),
    int("n_cores", "N Cores", 2),
    int("pc", "PC", 2),
    int("px_height", "Px Height", 20),
    int("px_width", "Px Width", 756),
    int("ram", "RAM", 2549),
    int("sc_h", "SC H", 9),
    int("sc_w", "SC W", 7),
    int("talk_time", "Talk Time", 19),
    int("three_g", "Three G", 0),
    int("touch_screen", "Touch Screen", 0),
    int("wifi", "WiFi", 1),
];

/// Returns the position of a feature in the training order.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURES.iter().position(|spec| spec.name == name)
}

/// A complete, ordered row of coerced feature values.
///
/// # Example
///
/// ```
/// use decisiomate_model::features::{FeatureVector, FeatureValue};
///
/// let row = FeatureVector::from_pairs([
///     ("battery_power", "842"), ("blue", "0"), ("clock_speed", "2.2"),
///     ("dual_sim", "0"), ("fc", "1"), ("four_g", "0"), ("int_memory", "7"),
///     ("m_dep", "0.6"), ("mobile_wt", "188"), ("n_cores", "2"), ("pc", "2"),
///     ("px_height", "20"), ("px_width", "756"), ("ram", "2549"), ("sc_h", "9"),
///     ("sc_w", "7"), ("talk_time", "19"), ("three_g", "0"),
///     ("touch_screen", "0"), ("wifi", "1"),
/// ]).unwrap();
/// assert_eq!(row.get("ram"), Some(FeatureValue::Int(2549)));
/// assert_eq!(row, FeatureVector::sample());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    values: Vec<FeatureValue>,
}

impl FeatureVector {
    /// The documented sample phone.
    pub fn sample() -> Self {
        Self {
            values: FEATURES.iter().map(|spec| spec.sample).collect(),
        }
    }

    /// Builds a row from already-typed values in training order.
    ///
    /// # Errors
    ///
    /// Fails if the count is wrong or an integer feature holds a float.
    pub fn from_values(values: Vec<FeatureValue>) -> ModelResult<Self> {
        if values.len() != NUM_FEATURES {
            return Err(ModelError::invalid_field(
                "features",
                format!("{} values", values.len()),
                "20 values",
            ));
        }
        for (spec, value) in FEATURES.iter().zip(values.iter()) {
            if spec.kind == FeatureKind::Int && value.kind() != FeatureKind::Int {
                return Err(ModelError::invalid_field(
                    spec.name,
                    value.to_string(),
                    spec.kind.type_name(),
                ));
            }
        }
        Ok(Self { values })
    }

    /// Assembles a row from raw text values keyed by feature name.
    ///
    /// Keys that are not features are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingField`] for the first absent feature and
    /// [`ModelError::InvalidField`] for the first value that cannot be coerced.
    pub fn from_map<V: AsRef<str>>(fields: &HashMap<String, V>) -> ModelResult<Self> {
        let values = FEATURES
            .iter()
            .map(|spec| {
                let raw = fields.get(spec.name).ok_or_else(|| ModelError::MissingField {
                    field: spec.name.to_string(),
                })?;
                spec.kind.coerce(spec.name, raw.as_ref())
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { values })
    }

    /// Assembles a row from `(name, raw value)` pairs.
    ///
    /// Later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_map(&fields)
    }

    /// Returns the value of a named feature.
    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        feature_index(name).map(|i| self.values[i])
    }

    /// Returns the values in training order.
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// Iterates over `(spec, value)` pairs in training order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FeatureSpec, FeatureValue)> + '_ {
        FEATURES.iter().zip(self.values.iter().copied())
    }

    /// Converts the row to the `f32` layout fed to the scaler.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.values.iter().map(FeatureValue::as_f32).collect()
    }

    /// Returns the values rendered as form text, keyed by feature name.
    pub fn to_text_map(&self) -> HashMap<String, String> {
        self.iter()
            .map(|(spec, value)| (spec.name.to_string(), value.to_string()))
            .collect()
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (spec, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", spec.name, value)?;
        }
        Ok(())
    }
}
