//! Predict Command Implementation
//!
//! Runs a single prediction without starting the server.

use anyhow::{Context, Result};
use clap::Args;
use decisiomate_model::{ArtifactPaths, ArtifactPolicy, FeatureVector, Predictor};
use decisiomate_serving::{PredictRequest, PredictResponse};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

/// Parses a `name=value` pair.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty feature name in {s:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Predict the price decision for one phone
///
/// Inputs are merged in order: the sample phone (with `--sample`), then the
/// `--input` JSON object, then each `--set`. Every feature must end up with
/// a value.
///
/// # Example
///
/// ```bash
/// decisiomate predict --sample --set ram=3900 --set battery_power=600
/// decisiomate predict --input phone.json --json
/// ```
#[derive(Args, Debug, Clone, Default)]
pub struct PredictCommand {
    /// Path to the weights artifact
    #[arg(
        long,
        env = "DECISIOMATE_WEIGHTS",
        default_value = decisiomate_model::predictor::DEFAULT_WEIGHTS_PATH
    )]
    pub weights: PathBuf,

    /// Path to the scaler artifact
    #[arg(
        long,
        env = "DECISIOMATE_SCALER",
        default_value = decisiomate_model::predictor::DEFAULT_SCALER_PATH
    )]
    pub scaler: PathBuf,

    /// Start from the sample phone
    #[arg(long)]
    pub sample: bool,

    /// JSON object of feature values
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Set one feature, as NAME=VALUE (repeatable)
    #[arg(long = "set", short = 's', value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

impl PredictCommand {
    /// Collects the raw text fields from all input sources.
    pub fn fields(&self) -> Result<HashMap<String, String>> {
        let mut fields = if self.sample {
            FeatureVector::sample().to_text_map()
        } else {
            HashMap::new()
        };

        if let Some(path) = &self.input {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {:?}", path))?;
            let request: PredictRequest = serde_json::from_str(&text)
                .with_context(|| format!("Input file {:?} is not a JSON object", path))?;
            fields.extend(request.to_text_fields());
        }

        fields.extend(self.set.iter().cloned());
        Ok(fields)
    }

    /// Execute the predict command
    pub fn run(&self) -> Result<()> {
        let fields = self.fields()?;
        let paths = ArtifactPaths::new(&self.weights, &self.scaler);
        info!("Predicting with weights={:?} scaler={:?}", paths.weights, paths.scaler);

        let predictor = Predictor::new(paths, ArtifactPolicy::Reload);
        let prediction = predictor
            .predict_from_fields(&fields)
            .context("Prediction failed")?;

        if self.json {
            let response = PredictResponse::from(prediction);
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("{}", prediction.message());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("ram=3900"),
            Ok(("ram".to_string(), "3900".to_string()))
        );
        assert_eq!(
            parse_key_val(" m_dep =0.6"),
            Ok(("m_dep".to_string(), "0.6".to_string()))
        );
        assert!(parse_key_val("ram").is_err());
        assert!(parse_key_val("=1").is_err());
    }

    #[test]
    fn test_fields_merge_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ram": 1000, "wifi": 0}}"#).unwrap();

        let cmd = PredictCommand {
            sample: true,
            input: Some(file.path().to_path_buf()),
            set: vec![("ram".to_string(), "3900".to_string())],
            ..Default::default()
        };
        let fields = cmd.fields().unwrap();

        assert_eq!(fields["ram"], "3900");
        assert_eq!(fields["wifi"], "0");
        assert_eq!(fields["battery_power"], "842");
    }

    #[test]
    fn test_fields_without_sample_are_partial() {
        let cmd = PredictCommand {
            set: vec![("ram".to_string(), "3900".to_string())],
            ..Default::default()
        };
        let fields = cmd.fields().unwrap();
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_run_with_missing_artifacts_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = PredictCommand {
            weights: dir.path().join("w.json"),
            scaler: dir.path().join("s.json"),
            sample: true,
            ..Default::default()
        };
        assert!(cmd.run().is_err());
    }
}
