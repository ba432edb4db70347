//! Flat, line-by-line format validation.
//!
//! Every line is resolved against the [`SchemaRegistry`] and matched against
//! its layout; the raw lines come back split into a valid and an invalid
//! partition, each in input order. Group and sequence checks are not done
//! here: feed the collected records to [`crate::document::assemble`] for that.
//!
//! # Example
//!
//! ```rust,ignore
//! use cwr_validator::Validator;
//!
//! let mut validator = Validator::new();
//! let partition = validator.validate_document_format(["TER0000000000000000J2136"])?;
//! assert_eq!(partition.invalid_records.len(), 1);
//! ```

use serde::Serialize;

use crate::config::UnknownRecordPolicy;
use crate::error::{FormatMismatch, RecordError, ScanError};
use crate::record::Record;
use crate::schema::SchemaRegistry;

/// Why a line ended up in the invalid partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum RejectionReason {
    /// The record does not match its layout.
    Format(FormatMismatch),
    /// The line could not be resolved (only under [`UnknownRecordPolicy::Reject`]).
    Unresolved(RecordError),
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(err) => write!(f, "{err}"),
            Self::Unresolved(err) => write!(f, "{err}"),
        }
    }
}

/// One invalid line with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRejection {
    /// 1-based line number.
    pub line: usize,
    pub type_code: String,
    pub reason: RejectionReason,
}

/// Result of a flat scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatPartition {
    pub valid_records: Vec<String>,
    pub invalid_records: Vec<String>,
    /// One entry per invalid line, same order as `invalid_records`.
    pub rejections: Vec<LineRejection>,
}

impl FormatPartition {
    /// Whether every line was valid.
    pub fn is_clean(&self) -> bool {
        self.invalid_records.is_empty()
    }

    pub fn total(&self) -> usize {
        self.valid_records.len() + self.invalid_records.len()
    }
}

/// Runs the flat scan and keeps every record it resolved.
pub struct Validator<'r> {
    registry: &'r SchemaRegistry,
    on_unknown: UnknownRecordPolicy,
    records: Vec<Record>,
}

impl Validator<'static> {
    /// Validator over the global registry that aborts on unknown record types.
    pub fn new() -> Self {
        Self::with_registry(SchemaRegistry::global())
    }
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Validator<'r> {
    pub fn with_registry(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            on_unknown: UnknownRecordPolicy::Abort,
            records: Vec::new(),
        }
    }

    pub fn with_unknown_record_policy(mut self, policy: UnknownRecordPolicy) -> Self {
        self.on_unknown = policy;
        self
    }

    /// Validate every line and partition the raw lines by outcome.
    ///
    /// # Errors
    /// Under [`UnknownRecordPolicy::Abort`], the first line that cannot be
    /// resolved stops the scan. Records resolved before it stay collected.
    pub fn validate_document_format<I, S>(&mut self, lines: I) -> Result<FormatPartition, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut partition = FormatPartition::default();

        for (index, line) in lines.into_iter().enumerate() {
            let raw = line.as_ref();
            let number = index + 1;

            let record = match self.registry.resolve(raw) {
                Ok(record) => record,
                Err(source) => match self.on_unknown {
                    UnknownRecordPolicy::Abort => {
                        return Err(ScanError { line: number, source });
                    }
                    UnknownRecordPolicy::Reject => {
                        partition.invalid_records.push(raw.to_string());
                        partition.rejections.push(LineRejection {
                            line: number,
                            type_code: raw.chars().take(3).collect(),
                            reason: RejectionReason::Unresolved(source),
                        });
                        continue;
                    }
                },
            };

            match record.validate() {
                Ok(()) => partition.valid_records.push(raw.to_string()),
                Err(mismatch) => {
                    partition.invalid_records.push(raw.to_string());
                    partition.rejections.push(LineRejection {
                        line: number,
                        type_code: record.type_code().to_string(),
                        reason: RejectionReason::Format(mismatch),
                    });
                }
            }
            self.records.push(record);
        }

        Ok(partition)
    }

    /// Every record resolved so far, across all scans, in input order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Hand over the collected records, leaving the validator empty.
    pub fn take_records(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HDR_BAD_DATE: &str = "HDRPB226144593EMI MUSICAL SA DE CV                         01.10201308090259112013080A               ";

    #[test]
    fn test_malformed_header() {
        let line = HDR_BAD_DATE.to_string();
        assert_eq!(line.chars().count(), 101);

        let mut validator = Validator::new();
        let partition = validator.validate_document_format([line.as_str()]).unwrap();
        assert_eq!(partition.valid_records.len(), 0);
        assert_eq!(partition.invalid_records, vec![line.clone()]);

        let RejectionReason::Format(mismatch) = &partition.rejections[0].reason else {
            panic!("expected a format rejection");
        };
        assert_eq!(mismatch.fields.len(), 1);
        assert_eq!(mismatch.fields[0].kind, "date");
        assert_eq!(mismatch.fields[0].found, "2013080A");
    }

    #[test]
    fn test_truncated_group_header() {
        let mut validator = Validator::new();
        let partition = validator
            .validate_document_format(["GRHAGD0000102.100130400001  "])
            .unwrap();
        assert!(partition.valid_records.is_empty());
        assert_eq!(partition.invalid_records.len(), 1);
        assert!(!partition.is_clean());
    }

    #[test]
    fn test_malformed_territory() {
        let mut validator = Validator::new();
        let partition = validator
            .validate_document_format(["TER0000000000000000J2136"])
            .unwrap();
        assert_eq!((partition.valid_records.len(), partition.invalid_records.len()), (0, 1));
        assert_eq!(partition.rejections[0].line, 1);
        assert_eq!(partition.rejections[0].type_code, "TER");
    }

    #[test]
    fn test_partition_keeps_input_order() {
        let lines = [
            "TER0000000000000000I2136",
            "TER0000000000000001J2136",
            "TER0000000000000002E0250",
            "TER0000000000000003X2136",
        ];
        let mut validator = Validator::new();
        let partition = validator.validate_document_format(lines).unwrap();
        assert_eq!(partition.valid_records, vec![lines[0], lines[2]]);
        assert_eq!(partition.invalid_records, vec![lines[1], lines[3]]);
        assert_eq!(partition.rejections.iter().map(|r| r.line).collect::<Vec<_>>(), [2, 4]);
        assert_eq!(partition.total(), 4);
        assert_eq!(validator.records().len(), 4);
    }

    #[test]
    fn test_unknown_record_aborts() {
        let mut validator = Validator::new();
        let err = validator
            .validate_document_format(["TER0000000000000000I2136", "XYZ000", "TER0000000000000000I2136"])
            .unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.source, RecordError::UnknownRecordType("XYZ".into()));
        assert_eq!(validator.records().len(), 1);
    }

    #[test]
    fn test_empty_line_aborts() {
        let mut validator = Validator::new();
        let err = validator.validate_document_format([""]).unwrap_err();
        assert_eq!(err.source, RecordError::EmptyOrNullInput);
    }

    #[test]
    fn test_unknown_record_rejected_under_policy() {
        let mut validator = Validator::new().with_unknown_record_policy(UnknownRecordPolicy::Reject);
        let partition = validator
            .validate_document_format(["XYZ000", "TER0000000000000000I2136"])
            .unwrap();
        assert_eq!(partition.invalid_records, vec!["XYZ000"]);
        assert_eq!(partition.valid_records.len(), 1);
        assert_eq!(
            partition.rejections[0].reason,
            RejectionReason::Unresolved(RecordError::UnknownRecordType("XYZ".into()))
        );
        assert_eq!(validator.records().len(), 1);
    }

    #[test]
    fn test_take_records_feeds_assembly() {
        let mut validator = Validator::new();
        validator
            .validate_document_format(["TER0000000000000000I2136"])
            .unwrap();
        let records = validator.take_records();
        assert_eq!(records.len(), 1);
        assert!(validator.records().is_empty());
    }

    #[test]
    fn test_rejection_serialization() {
        let mut validator = Validator::new();
        let partition = validator
            .validate_document_format(["TER0000000000000000J2136"])
            .unwrap();
        let json = serde_json::to_value(&partition).unwrap();
        assert_eq!(json["invalidRecords"][0], "TER0000000000000000J2136");
        assert_eq!(json["rejections"][0]["reason"]["kind"], "format");
        assert_eq!(json["rejections"][0]["reason"]["detail"]["fields"][0]["found"], "J");
        assert_eq!(json["rejections"][0]["typeCode"], "TER");
    }
}
