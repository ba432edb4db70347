//! Serializable validation report, for `--json` output and embedding services.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::document::{Document, Message};
use crate::pipeline::ValidationOutcome;
use crate::validation::LineRejection;

/// Report of one validation job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "valid" or "rejected"
    pub status: String,

    pub success: bool,

    pub generated_at: DateTime<Utc>,

    /// File the lines came from, if any
    pub source: Option<String>,

    pub encoding: Option<String>,

    pub valid_records: Vec<String>,

    pub invalid_records: Vec<String>,

    pub rejections: Vec<LineRejection>,

    /// Present when the document structure was checked
    pub structure: Option<StructureSummary>,
}

/// Outcome of document assembly and validation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureSummary {
    pub rejected: bool,
    pub group_count: usize,
    pub dropped_groups: usize,
    pub messages: Vec<Message>,
}

impl From<&Document> for StructureSummary {
    fn from(document: &Document) -> Self {
        Self {
            rejected: document.is_rejected(),
            group_count: document.group_count(),
            dropped_groups: document.dropped_groups().len(),
            messages: document.all_messages().into_iter().cloned().collect(),
        }
    }
}

impl From<ValidationOutcome> for ValidationReport {
    fn from(outcome: ValidationOutcome) -> Self {
        let success = outcome.is_valid();
        let structure = outcome.document.as_ref().map(StructureSummary::from);

        ValidationReport {
            job_id: Uuid::new_v4().to_string(),
            status: if success { "valid" } else { "rejected" }.to_string(),
            success,
            generated_at: Utc::now(),
            source: None,
            encoding: outcome.encoding,
            valid_records: outcome.partition.valid_records,
            invalid_records: outcome.partition.invalid_records,
            rejections: outcome.partition.rejections,
            structure,
        }
    }
}

impl ValidationReport {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Report for a job that could not run at all.
pub fn error_report(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "success": false,
        "generatedAt": Utc::now(),
        "error": error,
        "validRecords": [],
        "invalidRecords": [],
    })
}
