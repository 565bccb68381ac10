//! Model adapter: feature derivation and single-row scoring
//!
//! Wraps the one classifier artifact loaded at startup. Each call derives
//! the two synthetic features the artifact was trained with, assembles a
//! single-row frame whose named columns match the trained layout, and
//! coerces the artifact's first output to a plain 0/1 integer.

use crate::error::{Result, ScoreboxError};
use crate::model::{fetch_artifact_bytes, ClassifierArtifact, ModelSource};
use crate::schema::{FeatureVector, FEATURE_NAMES};
use polars::prelude::*;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::info;

/// Names of the derived columns, in trained order.
///
/// These names and the formulas in [`derived_features`] are part of the
/// artifact's trained layout: changing either silently changes predictions,
/// which is why [`ModelAdapter::new`] cross-checks the layout up front.
pub const DERIVED_FEATURE_NAMES: [&str; 2] = ["positive_predictors_sum", "main_interaction"];

/// Compute the two derived features from a validated vector
pub fn derived_features(vector: &FeatureVector) -> (f64, f64) {
    let positive_predictors_sum = vector.feature_3 + vector.feature_7 + vector.feature_12;
    let main_interaction = vector.feature_3 * vector.feature_9;
    (positive_predictors_sum, main_interaction)
}

/// Shared, immutable adapter around one loaded artifact
#[derive(Debug, Clone)]
pub struct ModelAdapter {
    artifact: ClassifierArtifact,
}

impl ModelAdapter {
    /// Wrap an artifact, verifying its trained layout is exactly the 15
    /// schema fields plus the 2 derived columns. A mismatch is fatal.
    pub fn new(artifact: ClassifierArtifact) -> Result<Self> {
        let expected: BTreeSet<&str> = FEATURE_NAMES
            .iter()
            .copied()
            .chain(DERIVED_FEATURE_NAMES)
            .collect();
        let actual: BTreeSet<&str> = artifact.feature_names.iter().map(String::as_str).collect();

        if artifact.feature_names.len() != expected.len() || actual != expected {
            let missing: Vec<&&str> = expected.difference(&actual).collect();
            let unexpected: Vec<&&str> = actual.difference(&expected).collect();
            return Err(ScoreboxError::ConfigError(format!(
                "artifact layout mismatch: missing columns {:?}, unexpected columns {:?}",
                missing, unexpected
            )));
        }

        Ok(Self { artifact })
    }

    /// Fetch, parse, and validate the artifact from its configured source.
    ///
    /// Called once at startup; any failure here must keep the process from
    /// serving traffic.
    pub async fn load(source: &ModelSource, timeout: Duration) -> Result<Self> {
        let bytes = fetch_artifact_bytes(source, timeout).await?;
        let artifact = ClassifierArtifact::from_json_bytes(&bytes)?;
        info!(
            source = %source,
            n_features = artifact.n_features(),
            "Model artifact loaded"
        );
        Self::new(artifact)
    }

    /// Classify one validated vector into {0, 1}
    pub fn predict(&self, vector: &FeatureVector) -> Result<i64> {
        let row = self.assemble_row(vector)?;
        let predictions = self.artifact.predict(&row)?;
        let first = predictions
            .first()
            .copied()
            .ok_or_else(|| ScoreboxError::ModelError("artifact produced no output".to_string()))?;
        Ok(first as i64)
    }

    /// Build the single-row frame: 15 originals plus the 2 derived columns
    fn assemble_row(&self, vector: &FeatureVector) -> Result<DataFrame> {
        let (positive_predictors_sum, main_interaction) = derived_features(vector);

        let names = FEATURE_NAMES.iter().copied().chain(DERIVED_FEATURE_NAMES);
        let values = vector
            .values()
            .into_iter()
            .chain([positive_predictors_sum, main_interaction]);

        let columns: Vec<Column> = names
            .zip(values)
            .map(|(name, v)| Series::new(name.into(), &[v]).into())
            .collect();

        DataFrame::new(columns).map_err(|e| ScoreboxError::DataError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassifierModel, LogisticModel};
    use ndarray::Array1;

    /// Logistic artifact whose whole decision weight sits on
    /// `positive_predictors_sum`, matching the reference scenarios.
    fn reference_artifact() -> ClassifierArtifact {
        let feature_names: Vec<String> = FEATURE_NAMES
            .iter()
            .copied()
            .chain(DERIVED_FEATURE_NAMES)
            .map(str::to_string)
            .collect();
        let mut coefficients = vec![0.0; feature_names.len()];
        coefficients[FEATURE_NAMES.len()] = 1.0;
        ClassifierArtifact {
            feature_names,
            model: ClassifierModel::Logistic(LogisticModel {
                coefficients: Array1::from_vec(coefficients),
                intercept: 0.0,
            }),
        }
    }

    #[test]
    fn test_derived_feature_formulas() {
        let mut values = [0.0; 15];
        values[3] = 2.0;
        values[7] = 3.0;
        values[9] = -4.0;
        values[12] = 5.0;
        let vector = FeatureVector::from_values(values);

        let (sum, interaction) = derived_features(&vector);
        assert_eq!(sum, 10.0);
        assert_eq!(interaction, -8.0);
    }

    #[test]
    fn test_reference_scenario_negative_class() {
        let adapter = ModelAdapter::new(reference_artifact()).unwrap();
        let vector = FeatureVector::from_values([
            -0.1, 1.2, -0.5, 0.8, -2.1, 0.3, 1.1, -0.0, 0.9, 4.4, -2.2, -2.1, -2.4, 2.4, 1.1,
        ]);
        assert_eq!(adapter.predict(&vector).unwrap(), 0);
    }

    #[test]
    fn test_reference_scenario_positive_class() {
        let adapter = ModelAdapter::new(reference_artifact()).unwrap();
        let vector = FeatureVector::from_values([
            0.9, -1.9, 0.0, 5.8, -2.1, 0.3, -4.9, 2.8, 0.3, -4.5, 0.1, -1.3, 2.0, 1.1, -1.3,
        ]);
        assert_eq!(adapter.predict(&vector).unwrap(), 1);
    }

    #[test]
    fn test_layout_mismatch_is_fatal() {
        let mut artifact = reference_artifact();
        artifact.feature_names[16] = "renamed_interaction".to_string();
        let err = ModelAdapter::new(artifact).unwrap_err();
        assert!(matches!(err, ScoreboxError::ConfigError(_)));
    }

    #[test]
    fn test_truncated_layout_is_fatal() {
        let mut artifact = reference_artifact();
        artifact.feature_names.pop();
        match &mut artifact.model {
            ClassifierModel::Logistic(m) => {
                m.coefficients = Array1::from_vec(vec![0.0; 16]);
            }
            _ => unreachable!(),
        }
        assert!(ModelAdapter::new(artifact).is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "scorebox-adapter-load-{}.json",
            std::process::id()
        ));
        let json = serde_json::to_vec(&reference_artifact()).unwrap();
        std::fs::write(&path, json).unwrap();

        let source = ModelSource::File(path.clone());
        let adapter = ModelAdapter::load(&source, Duration::from_secs(1))
            .await
            .unwrap();
        let vector = FeatureVector::from_values([1.0; 15]);
        let prediction = adapter.predict(&vector).unwrap();
        assert!(prediction == 0 || prediction == 1);

        let _ = std::fs::remove_file(&path);
    }
}
