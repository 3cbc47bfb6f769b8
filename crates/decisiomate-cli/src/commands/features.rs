//! Features Command Implementation

use anyhow::Result;
use clap::Args;
use decisiomate_model::{FeatureSpec, FEATURES};

/// List the model inputs in training order
#[derive(Args, Debug, Clone, Default)]
pub struct FeaturesCommand {
    /// Print as a JSON array
    #[arg(long)]
    pub json: bool,
}

impl FeaturesCommand {
    /// Renders the listing.
    pub fn render(&self) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(&FEATURES[..])?);
        }

        let mut out = format!("{:<4}{:<16}{:<18}{:<9}{}\n", "#", "NAME", "LABEL", "TYPE", "SAMPLE");
        for (i, spec) in FEATURES.iter().enumerate() {
            out.push_str(&row(i, spec));
        }
        Ok(out)
    }

    /// Execute the features command
    pub fn run(&self) -> Result<()> {
        print!("{}", self.render()?);
        Ok(())
    }
}

fn row(index: usize, spec: &FeatureSpec) -> String {
    format!(
        "{:<4}{:<16}{:<18}{:<9}{}\n",
        index,
        spec.name,
        spec.label,
        spec.kind.type_name(),
        spec.sample
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_feature() {
        let table = FeaturesCommand::default().render().unwrap();
        assert_eq!(table.lines().count(), FEATURES.len() + 1);
        assert!(table.lines().nth(1).unwrap().contains("battery_power"));
        assert!(table.lines().last().unwrap().contains("wifi"));
    }

    #[test]
    fn test_json_listing() {
        let json = FeaturesCommand { json: true }.render().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 20);
        assert_eq!(items[2]["name"], "clock_speed");
        assert_eq!(items[2]["sample"], 2.2);
    }
}
