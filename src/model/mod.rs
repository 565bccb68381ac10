//! Classifier artifact format and scoring
//!
//! The artifact is an opaque, pre-trained binary classifier serialized as
//! JSON: the ordered column layout it was trained with plus the parameters
//! of one supported model family. This module owns deserialization and the
//! pure scoring math; fetching the bytes lives in [`fetch`], and request-time
//! orchestration lives in [`crate::inference`].

pub mod fetch;

use crate::error::{Result, ScoreboxError};
use ndarray::{Array1, Array2, ArrayView1};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub use fetch::{fetch_artifact_bytes, ModelSource};

/// A deserialized classifier artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// Column names the model was trained with, in training order
    pub feature_names: Vec<String>,
    /// Model parameters
    pub model: ClassifierModel,
}

/// Supported classifier families
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassifierModel {
    Logistic(LogisticModel),
    GradientBoosting(GradientBoostingModel),
}

/// Logistic regression parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One coefficient per trained column
    pub coefficients: Array1<f64>,
    pub intercept: f64,
}

/// Gradient-boosted trees over logit scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingModel {
    /// Initial logit before any tree contribution
    pub base_score: f64,
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
}

/// One regression tree, nodes stored as an index arena rooted at 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Tree {
    /// Walk the arena from the root for a single row.
    ///
    /// Traversal is bounded by the node count, so a malformed artifact with
    /// a cycle or dangling index fails instead of hanging.
    fn score(&self, row: ArrayView1<'_, f64>) -> Result<f64> {
        let mut idx = 0;
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                ScoreboxError::ModelError(format!("tree node index {} out of bounds", idx))
            })?;
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    let v = row.get(*feature_idx).ok_or_else(|| {
                        ScoreboxError::ModelError(format!(
                            "tree split references feature index {} beyond input width",
                            feature_idx
                        ))
                    })?;
                    idx = if *v <= *threshold { *left } else { *right };
                }
            }
        }
        Err(ScoreboxError::ModelError(
            "tree traversal exceeded node count".to_string(),
        ))
    }
}

impl ClassifierModel {
    /// Positive-class probabilities for each row
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            ClassifierModel::Logistic(m) => {
                if m.coefficients.len() != x.ncols() {
                    return Err(ScoreboxError::ModelError(format!(
                        "coefficient count {} does not match input width {}",
                        m.coefficients.len(),
                        x.ncols()
                    )));
                }
                let z = x.dot(&m.coefficients) + m.intercept;
                Ok(z.mapv(sigmoid))
            }
            ClassifierModel::GradientBoosting(m) => {
                let mut probs = Vec::with_capacity(x.nrows());
                for row in x.rows() {
                    let mut logit = m.base_score;
                    for tree in &m.trees {
                        logit += m.learning_rate * tree.score(row)?;
                    }
                    probs.push(sigmoid(logit));
                }
                Ok(Array1::from_vec(probs))
            }
        }
    }
}

impl ClassifierArtifact {
    /// Deserialize an artifact from its JSON wire form
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        let artifact: Self = serde_json::from_slice(bytes)
            .map_err(|e| ScoreboxError::SerializationError(format!("artifact parse: {}", e)))?;
        if artifact.feature_names.is_empty() {
            return Err(ScoreboxError::ModelError(
                "artifact declares no feature columns".to_string(),
            ));
        }
        Ok(artifact)
    }

    /// Number of trained input columns
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Classify each row of `df` into {0.0, 1.0}.
    ///
    /// Columns are pulled by name in the artifact's trained order, so the
    /// caller's column arrangement never silently reorders the input.
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let x = columns_to_array2(df, &self.feature_names)?;
        let probs = self.model.predict_proba(&x)?;
        probs
            .iter()
            .map(|p| {
                if p.is_nan() {
                    Err(ScoreboxError::ModelError(
                        "model produced a non-finite probability".to_string(),
                    ))
                } else {
                    Ok(if *p >= 0.5 { 1.0 } else { 0.0 })
                }
            })
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from_vec)
    }
}

/// Extract named columns from a DataFrame into a row-major `Array2<f64>`,
/// casting each column to Float64 on the way through.
fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|col_name| {
            let series = df
                .column(col_name)
                .map_err(|_| ScoreboxError::FeatureNotFound(col_name.clone()))?;
            let series_f64 = series
                .cast(&DataType::Float64)
                .map_err(|e| ScoreboxError::DataError(e.to_string()))?;
            let values: Vec<f64> = series_f64
                .f64()
                .map_err(|e| ScoreboxError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect();
            Ok(values)
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
        col_refs[c][r]
    }))
}
