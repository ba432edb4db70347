//! Error types for the CWR validator.
//!
//! This module defines one error type per concern:
//!
//! - [`RecordError`] - A line cannot be turned into a record at all
//! - [`FieldMismatch`] / [`FormatMismatch`] - A record does not match its layout
//! - [`ScanError`] - The flat scan was aborted on a specific line
//! - [`InputError`] - Reading and decoding input files
//! - [`ConfigError`] - Invalid configuration values
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Record Resolution Errors
// =============================================================================

/// Errors raised while resolving a raw line into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum RecordError {
    /// The line is empty.
    #[error("Record line is empty")]
    EmptyOrNullInput,

    /// The 3-character prefix is not a registered record type.
    #[error("Unknown record type '{0}'")]
    UnknownRecordType(String),
}

// =============================================================================
// Format Errors
// =============================================================================

/// One field of a record that does not match its primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMismatch {
    /// Position of the field in the layout.
    pub index: usize,
    /// Character offset of the field in the line.
    pub offset: usize,
    /// Width of the field in characters.
    pub width: usize,
    /// Primitive kind, e.g. `numeric` or `date`.
    pub kind: String,
    /// The characters found at the field position (may be shorter than `width`).
    pub found: String,
}

/// A record whose content fails its anchored layout pattern.
///
/// This is an outcome, not a fatal error: the scan keeps going and the line
/// lands in the invalid partition.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{type_code} record does not match its layout ({} field(s) rejected, {actual_width}/{expected_width} characters)", .fields.len())]
pub struct FormatMismatch {
    /// Record type code.
    pub type_code: String,
    /// Width required by the layout.
    pub expected_width: usize,
    /// Number of characters in the raw line.
    pub actual_width: usize,
    /// Fields that fail when matched on their own.
    pub fields: Vec<FieldMismatch>,
}

// =============================================================================
// Scan Errors
// =============================================================================

/// The flat scan stopped on a line that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line}: {source}")]
pub struct ScanError {
    /// 1-based line number.
    pub line: usize,
    /// Resolution failure.
    #[source]
    pub source: RecordError,
}

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading and decoding an input file.
#[derive(Debug, Error)]
pub enum InputError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode content.
    #[error("Failed to decode content as {0}")]
    Encoding(String),

    /// The input holds no records.
    #[error("Input contains no records")]
    Empty,

    /// File extension not in the allowed list.
    #[error("Unsupported file extension '{extension}' (allowed: {allowed})")]
    UnsupportedExtension { extension: String, allowed: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::pipeline`] entry points.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input error.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// The scan was aborted on an unresolvable line.
    #[error("Scan aborted: {0}")]
    Scan(#[from] ScanError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for record resolution.
pub type RecordResult<T> = Result<T, RecordError>;

/// Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let input_err = InputError::Empty;
        let pipeline_err: PipelineError = input_err.into();
        assert!(pipeline_err.to_string().contains("no records"));

        let scan_err = ScanError {
            line: 4,
            source: RecordError::UnknownRecordType("XYZ".into()),
        };
        let pipeline_err: PipelineError = scan_err.into();
        let msg = pipeline_err.to_string();
        assert!(msg.contains("Line 4"));
        assert!(msg.contains("XYZ"));
    }

    #[test]
    fn test_format_mismatch_message() {
        let err = FormatMismatch {
            type_code: "TER".into(),
            expected_width: 24,
            actual_width: 24,
            fields: vec![FieldMismatch {
                index: 1,
                offset: 19,
                width: 1,
                kind: "defined".into(),
                found: "J".into(),
            }],
        };
        let msg = err.to_string();
        assert!(msg.contains("TER"));
        assert!(msg.contains("1 field(s)"));
        assert!(msg.contains("24/24"));
    }

    #[test]
    fn test_record_error_serialization() {
        let err = RecordError::UnknownRecordType("ZZZ".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "unknownRecordType");
        assert_eq!(json["detail"], "ZZZ");
    }
}
