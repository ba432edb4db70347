//! End-to-end checks over complete and broken transmissions.

use cwr_validator::{
    assemble, read_file_auto, validate_bytes, validate_file, validate_lines, DuplicateGroupPolicy,
    MessageScope, PipelineError, RecordError, ValidateOptions, ValidationReport, Validator,
    ValidatorConfig, LOG_BROADCASTER,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/CW130001EMI_059.V21");

fn quiet() {
    LOG_BROADCASTER.set_quiet(true);
}

fn fixture_lines() -> Vec<String> {
    read_file_auto(FIXTURE, &ValidatorConfig::default()).unwrap().lines
}

fn flat(lines: &[&str]) -> (usize, usize) {
    let mut validator = Validator::new();
    let partition = validator.validate_document_format(lines).unwrap();
    (partition.valid_records.len(), partition.invalid_records.len())
}

#[test]
fn test_malformed_transmission_header() {
    let line = "HDRPB226144593EMI MUSICAL SA DE CV                         01.10201308090259112013080A               ";
    assert_eq!(flat(&[line]), (0, 1));
}

#[test]
fn test_malformed_group_header() {
    assert_eq!(flat(&["GRHAGD0000102.100130400001  "]), (0, 1));
}

#[test]
fn test_malformed_territory() {
    assert_eq!(flat(&["TER0000000000000000J2136"]), (0, 1));
}

#[test]
fn test_complete_file_is_valid() {
    quiet();
    let outcome = validate_file(FIXTURE, &ValidateOptions::default()).unwrap();

    assert_eq!(outcome.encoding.as_deref(), Some("utf-8"));
    assert_eq!(outcome.partition.valid_records.len(), 26);
    assert!(outcome.partition.invalid_records.is_empty());
    assert_eq!(outcome.partition.valid_records, fixture_lines());

    let document = outcome.document.as_ref().unwrap();
    assert!(!document.is_rejected(), "{:?}", document.all_messages());
    assert_eq!(document.group_count(), 2);
    assert_eq!(document.group(1).unwrap().transaction_type(), "AGR");
    assert_eq!(document.group(2).unwrap().transactions().len(), 2);
    assert!(outcome.is_valid());
}

#[test]
fn test_complete_file_renders_back_identically() {
    quiet();
    let lines = fixture_lines();
    let mut validator = Validator::new();
    validator.validate_document_format(&lines).unwrap();
    let document = assemble(validator.take_records(), DuplicateGroupPolicy::Report);

    let expected: String = lines.iter().map(|l| format!("{l}\n")).collect();
    assert_eq!(document.render(), expected);
    assert_eq!(document.render(), document.render());
}

/// Lines of the fixture with the second group relabelled as a second AGR
/// group, up to and including its trailer.
fn duplicate_type_lines() -> Vec<String> {
    fixture_lines()
        .into_iter()
        .take_while(|l| !l.starts_with("TRL"))
        .map(|l| l.replacen("GRHNWR00002", "GRHAGR00002", 1))
        .collect()
}

#[test]
fn test_duplicate_transaction_type_group_is_dropped() {
    let lines = duplicate_type_lines();
    let mut validator = Validator::new();
    let partition = validator.validate_document_format(&lines).unwrap();
    assert!(partition.is_clean());

    let document = assemble(validator.take_records(), DuplicateGroupPolicy::Report);
    assert!(document.group(1).is_some());
    assert!(document.group(2).is_none());
    assert_eq!(document.last_record_type(), Some("GRT"));
    assert!(document.is_rejected());
    assert_eq!(document.messages()[0].scope, MessageScope::Group);
    assert_eq!(document.messages()[0].sequence, 2);
}

#[test]
fn test_duplicate_transaction_type_legacy_policy() {
    quiet();
    let mut lines = duplicate_type_lines();
    lines.push("TRL000020000000400000026".to_string());

    let config = ValidatorConfig::default().with_duplicate_group_policy(DuplicateGroupPolicy::Legacy);
    let outcome = validate_lines(&lines, &ValidateOptions::from_config(config)).unwrap();
    let document = outcome.document.as_ref().unwrap();
    assert!(document.group(2).is_none());
    assert_eq!(document.dropped_groups().len(), 1);
    assert!(!document.is_rejected(), "{:?}", document.all_messages());
}

#[test]
fn test_structural_errors_do_not_stop_assembly() {
    quiet();
    let lines: Vec<String> = fixture_lines()
        .into_iter()
        .filter(|l| !l.starts_with("GRT00001"))
        .map(|l| l.replacen("TRL00002", "TRL00003", 1))
        .collect();

    let outcome = validate_lines(&lines, &ValidateOptions::default()).unwrap();
    assert!(outcome.partition.is_clean());

    let document = outcome.document.as_ref().unwrap();
    assert!(document.is_rejected());
    let texts: Vec<&str> = document.all_messages().iter().map(|m| m.text.as_str()).collect();
    assert!(texts.contains(&"Group expected after HDR or GRT"));
    assert!(texts.contains(&"Group trailer expected"));
    assert!(texts.iter().any(|t| t.starts_with("Group count in transmission trailer")));
}

#[test]
fn test_unknown_record_type_aborts_scan() {
    quiet();
    let mut lines = fixture_lines();
    lines.insert(3, "ZZZ0000000000000001".to_string());

    let err = validate_lines(&lines, &ValidateOptions::default()).unwrap_err();
    match err {
        PipelineError::Scan(scan) => {
            assert_eq!(scan.line, 4);
            assert_eq!(scan.source, RecordError::UnknownRecordType("ZZZ".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_bytes_with_crlf_and_bom() {
    quiet();
    let mut bytes = "\u{feff}".as_bytes().to_vec();
    bytes.extend(std::fs::read(FIXTURE).unwrap());

    let outcome = validate_bytes(&bytes, &ValidateOptions::default()).unwrap();
    assert!(outcome.is_valid());
    assert_eq!(outcome.partition.total(), 26);
}

#[test]
fn test_json_report_for_complete_file() {
    quiet();
    let outcome = validate_file(FIXTURE, &ValidateOptions::default()).unwrap();
    let report = ValidationReport::from(outcome).with_source(FIXTURE);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["status"], "valid");
    assert_eq!(json["success"], true);
    assert_eq!(json["validRecords"].as_array().unwrap().len(), 26);
    assert_eq!(json["structure"]["groupCount"], 2);
    assert!(json["structure"]["messages"].as_array().unwrap().is_empty());
}
