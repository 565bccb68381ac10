//! Scorebox - binary classification serving with durable prediction logging
//!
//! This crate exposes a pre-trained binary classifier behind an HTTP
//! endpoint and records every inference request and result in a relational
//! store before acknowledging it.
//!
//! # Modules
//!
//! - [`schema`] - Request feature schema and structural validation
//! - [`model`] - Classifier artifact format, scoring math, and retrieval
//! - [`inference`] - Model adapter: derived features and single-row scoring
//! - [`storage`] - Prediction log store (sqlx, SQLite/PostgreSQL)
//! - [`server`] - HTTP server, routes, and probes
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Domain modules
pub mod schema;
pub mod model;
pub mod inference;
pub mod storage;

// Services
pub mod server;
pub mod cli;

pub use error::{Result, ScoreboxError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Result, ScoreboxError};
    pub use crate::inference::{derived_features, ModelAdapter, DERIVED_FEATURE_NAMES};
    pub use crate::model::{ClassifierArtifact, ClassifierModel, ModelSource};
    pub use crate::schema::{FeatureVector, ValidationErrors, FEATURE_COUNT, FEATURE_NAMES};
    pub use crate::server::{create_router, run_server, AppState, ServerConfig};
    pub use crate::storage::{LogEntry, LogStore};
}
