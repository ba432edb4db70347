//! High-level validation API.
//!
//! Combines the steps a caller usually wants: decode the input, run the flat
//! format scan and, unless disabled, assemble and validate the document
//! structure. Both verdicts are returned side by side.
//!
//! # Example
//!
//! ```rust,ignore
//! use cwr_validator::pipeline::{validate_file, ValidateOptions};
//!
//! let outcome = validate_file("CW130001EMI_059.V21", &ValidateOptions::default())?;
//! println!("{} valid, {} invalid", outcome.partition.valid_records.len(),
//!          outcome.partition.invalid_records.len());
//! ```

use std::path::Path;

use crate::config::ValidatorConfig;
use crate::document::{assemble, Document};
use crate::error::PipelineResult;
use crate::logs::{log_error, log_info, log_success, log_warning, log_warning_indent};
use crate::parser::{read_bytes_auto, read_file_auto, DecodedInput};
use crate::validation::{FormatPartition, Validator};

/// Options for the validation pipeline
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Also assemble the document and run the structural checks.
    pub structure: bool,
    pub config: ValidatorConfig,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            structure: true,
            config: ValidatorConfig::default(),
        }
    }
}

impl ValidateOptions {
    pub fn from_config(config: ValidatorConfig) -> Self {
        Self { structure: true, config }
    }

    /// Flat format scan only.
    pub fn flat(mut self) -> Self {
        self.structure = false;
        self
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// Encoding of the input, when it was decoded from bytes.
    pub encoding: Option<String>,
    pub partition: FormatPartition,
    /// The validated document, when structure checks were requested.
    pub document: Option<Document>,
}

impl ValidationOutcome {
    /// Every line well-formed and, if assembled, the document not rejected.
    pub fn is_valid(&self) -> bool {
        self.partition.is_clean() && !self.document.as_ref().is_some_and(Document::is_rejected)
    }
}

/// Validate lines that are already split and decoded.
pub fn validate_lines<I, S>(lines: I, options: &ValidateOptions) -> PipelineResult<ValidationOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    log_info("Scanning records...");
    let mut validator = Validator::new().with_unknown_record_policy(options.config.on_unknown_record);
    let partition = validator.validate_document_format(lines).map_err(|e| {
        log_error(format!("Scan aborted: {e}"));
        e
    })?;

    if partition.is_clean() {
        log_success(format!("{} records well-formed", partition.valid_records.len()));
    } else {
        log_warning(format!(
            "{} of {} records rejected",
            partition.invalid_records.len(),
            partition.total()
        ));
        for rejection in partition.rejections.iter().take(options.config.max_reported) {
            log_warning_indent(format!("line {}: {}", rejection.line, rejection.reason), 1);
        }
    }

    let document = options.structure.then(|| {
        log_info("Assembling document structure...");
        let mut document = assemble(validator.take_records(), options.config.duplicate_groups);
        document.validate();
        if document.is_rejected() {
            log_warning(format!(
                "Document rejected ({} message(s))",
                document.all_messages().len()
            ));
        } else {
            log_success(format!("{} group(s) consistent", document.group_count()));
        }
        document
    });

    Ok(ValidationOutcome {
        encoding: None,
        partition,
        document,
    })
}

/// Validate raw file content with auto-detected encoding.
pub fn validate_bytes(bytes: &[u8], options: &ValidateOptions) -> PipelineResult<ValidationOutcome> {
    let input = read_bytes_auto(bytes)?;
    validate_decoded(input, options)
}

/// Validate a CWR file on disk.
pub fn validate_file<P: AsRef<Path>>(path: P, options: &ValidateOptions) -> PipelineResult<ValidationOutcome> {
    log_info(format!("Reading {}...", path.as_ref().display()));
    let input = read_file_auto(path, &options.config)?;
    validate_decoded(input, options)
}

fn validate_decoded(input: DecodedInput, options: &ValidateOptions) -> PipelineResult<ValidationOutcome> {
    log_success(format!("Detected encoding: {}", input.encoding));
    log_success(format!("Read {} lines", input.lines.len()));

    let mut outcome = validate_lines(&input.lines, options)?;
    outcome.encoding = Some(input.encoding);
    Ok(outcome)
}
