use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One rendered top-level step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use]
pub struct StepReport {
    /// `None` for elements of the variable list that do not define a step.
    pub name: Option<String>,
    pub references: Vec<String>,
    pub rendered: String,
}

/// Outline of one input document, as emitted by `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub steps: Vec<StepReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unhandled_kinds: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented step blocks.
    #[default]
    Text,
    /// JSON array of per-file reports.
    Json,
}
