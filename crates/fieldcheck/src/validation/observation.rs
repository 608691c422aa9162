//! Observation types for problems found in CSV field values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of problem detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationType {
    /// Value parses but fails a domain check (bad coordinate, date, language code).
    InvalidValue,
    /// Subvalue does not match the field's structured grammar.
    MalformedValue,
    /// Date lies in the future.
    FutureDate,
    /// More subvalues than the field's cardinality allows.
    CardinalityExceeded,
    /// Subvalue longer than the field's maximum length.
    LengthExceeded,
}

impl ObservationType {
    /// Get a human-readable label for the observation type.
    pub fn label(&self) -> &'static str {
        match self {
            ObservationType::InvalidValue => "Invalid Value",
            ObservationType::MalformedValue => "Malformed Value",
            ObservationType::FutureDate => "Future Date",
            ObservationType::CardinalityExceeded => "Cardinality Exceeded",
            ObservationType::LengthExceeded => "Length Exceeded",
        }
    }
}

/// Severity level of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only, may not require action.
    Info,
    /// The value will be altered (truncated, dropped) on ingest.
    Warning,
    /// The row cannot be ingested as is.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// Evidence supporting an observation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Evidence {
    /// The problematic value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Position of the offending subvalue within the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Expected form or limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
}

impl Evidence {
    /// Create empty evidence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the subvalue position.
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Set expected value.
    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

/// A problem found in one cell of the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Unique identifier for this observation.
    pub id: String,
    /// Type of issue.
    #[serde(rename = "type")]
    pub observation_type: ObservationType,
    /// Severity level.
    pub severity: Severity,
    /// Affected column name.
    pub column: String,
    /// 1-based data row number.
    pub row: usize,
    /// Human-readable description.
    pub description: String,
    /// Supporting evidence.
    pub evidence: Evidence,
    /// When detected.
    pub detected_at: DateTime<Utc>,
    /// What detected this issue.
    pub detector: String,
}

impl Observation {
    /// Create a new observation.
    pub fn new(
        observation_type: ObservationType,
        severity: Severity,
        column: impl Into<String>,
        row: usize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_observation_id(),
            observation_type,
            severity,
            column: column.into(),
            row,
            description: description.into(),
            evidence: Evidence::new(),
            detected_at: Utc::now(),
            detector: String::new(),
        }
    }

    /// Set the evidence.
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }

    /// Set the detector name.
    pub fn with_detector(mut self, detector: impl Into<String>) -> Self {
        self.detector = detector.into();
        self
    }
}

/// Generate a unique observation ID.
fn generate_observation_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    format!("obs_{:03}", COUNTER.fetch_add(1, Ordering::SeqCst))
}
