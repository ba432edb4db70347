//! # cwr-validator - Structural validation of CWR interchange files
//!
//! Checks CWR v2.1 fixed-width files record by record against their layouts,
//! and checks the header / group / transaction / trailer structure of the
//! whole transmission.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CWR File   │────▶│   Parser    │────▶│  Validator  │────▶│  Document   │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (per line)  │     │ (structure) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │                   │
//!                                                └──── Report ◀──────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cwr_validator::{validate_file, ValidateOptions};
//!
//! let outcome = validate_file("CW130001EMI_059.V21", &ValidateOptions::default())?;
//! println!("valid: {}", outcome.is_valid());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per concern
//! - [`models`] - Record kinds and transaction types
//! - [`schema`] - Field primitives, layouts and the record registry
//! - [`record`] - A line bound to its layout
//! - [`validation`] - Flat valid/invalid partition
//! - [`document`] - Document assembly and structural checks
//! - [`parser`] - Line reading with encoding detection
//! - [`pipeline`] - High-level entry points
//! - [`report`] - Serializable reports
//! - [`config`] - Environment configuration
//! - [`logs`] - Progress log broadcasting

// Core modules
pub mod error;
pub mod models;

// Records
pub mod record;
pub mod schema;

// Validation
pub mod document;
pub mod validation;

// Input
pub mod parser;

// Orchestration
pub mod config;
pub mod logs;
pub mod pipeline;
pub mod report;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, FieldMismatch, FormatMismatch, InputError, PipelineError, RecordError, ScanError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{RecordKind, TransactionType};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use record::Record;
pub use schema::{FieldKind, FieldSpec, RecordLayout, SchemaRegistry};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{FormatPartition, LineRejection, RejectionReason, Validator};

pub use document::{assemble, Document, Group, Message, MessageScope, Transaction};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_encoding, read_bytes_auto, read_file_auto, split_lines, DecodedInput,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use config::{DuplicateGroupPolicy, UnknownRecordPolicy, ValidatorConfig};
pub use pipeline::{validate_bytes, validate_file, validate_lines, ValidateOptions, ValidationOutcome};
pub use report::{error_report, StructureSummary, ValidationReport};

// =============================================================================
// Re-exports - Logs
// =============================================================================

pub use logs::{LogBroadcaster, LogEntry, LogLevel, LOG_BROADCASTER};
