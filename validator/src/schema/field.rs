//! Fixed-width field primitives.
//!
//! Every primitive knows its exact character width and renders a regular
//! expression fragment that consumes exactly that many characters. Record
//! layouts are plain lists of these values; the registry concatenates the
//! fragments once per layout.
//!
//! ```rust,ignore
//! use cwr_validator::schema::field::{alpha, numeric};
//!
//! // Record prefix: type (3) + transaction sequence (8) + record sequence (8)
//! let prefix = alpha(3) + numeric(8) + numeric(8);
//! assert_eq!(prefix.width(), 19);
//! ```

use std::fmt;
use std::ops::Add;

/// `YYYYMMDD` with plausible month and day digits.
const DATE_PATTERN: &str = "[0-9]{4}(?:0[1-9]|1[0-2])(?:0[1-9]|[12][0-9]|3[01])";

/// `HHMMSS` on a 24-hour clock.
const TIME_PATTERN: &str = "(?:[01][0-9]|2[0-3])[0-5][0-9][0-5][0-9]";

/// Category of a field primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Alpha,
    Alphanumeric,
    /// Printable ASCII.
    Text,
    /// One of a fixed set of literal values.
    Defined(Vec<String>),
    /// `Y` or `N`.
    Boolean,
    /// `Y`, `N` or `U` (unknown).
    Flag,
    Date,
    Time,
    /// Reserved blank space.
    Filler,
    /// Any non-control Unicode text.
    NonRoman,
    /// Concatenation of several primitives.
    Composite(Vec<FieldSpec>),
}

impl FieldKind {
    /// Short lowercase name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Alpha => "alpha",
            Self::Alphanumeric => "alphanumeric",
            Self::Text => "text",
            Self::Defined(_) => "defined",
            Self::Boolean => "boolean",
            Self::Flag => "flag",
            Self::Date => "date",
            Self::Time => "time",
            Self::Filler => "filler",
            Self::NonRoman => "non-roman",
            Self::Composite(_) => "composite",
        }
    }
}

/// A fixed-width field: its kind, its width and whether blanks are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    kind: FieldKind,
    width: usize,
    optional: bool,
}

impl FieldSpec {
    fn new(kind: FieldKind, width: usize) -> Self {
        Self { kind, width, optional: false }
    }

    /// Accept an all-blank value as an alternative.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Width in characters.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Regular expression fragment matching exactly `width` characters.
    ///
    /// The fragment is wrapped in a non-capturing group so it can be
    /// concatenated with other fragments safely.
    pub fn pattern(&self) -> String {
        let w = self.width;
        let body = match &self.kind {
            FieldKind::Numeric => format!("[0-9]{{{w}}}"),
            FieldKind::Alpha => justified("[A-Z]", "[A-Z ]", w),
            FieldKind::Alphanumeric => justified("[A-Z0-9]", "[A-Z0-9 ]", w),
            FieldKind::Text => justified(r"[\x21-\x7E]", r"[\x20-\x7E]", w),
            FieldKind::NonRoman => justified(r"[^\p{Cc}\x20]", r"[^\p{Cc}]", w),
            FieldKind::Defined(values) => values
                .iter()
                .map(|v| regex::escape(&format!("{v:<w$}")))
                .collect::<Vec<_>>()
                .join("|"),
            FieldKind::Boolean => "[YN]".to_string(),
            FieldKind::Flag => "[YNU]".to_string(),
            FieldKind::Date if self.optional => format!("{DATE_PATTERN}|0{{8}}"),
            FieldKind::Date => DATE_PATTERN.to_string(),
            FieldKind::Time => TIME_PATTERN.to_string(),
            FieldKind::Filler => format!(" {{{w}}}"),
            FieldKind::Composite(parts) => parts.iter().map(FieldSpec::pattern).collect(),
        };

        if self.optional && self.kind != FieldKind::Filler {
            format!("(?:{body}| {{{w}}})")
        } else {
            format!("(?:{body})")
        }
    }

    /// A value that satisfies this field, used to build sample lines.
    #[cfg(test)]
    pub(crate) fn sample(&self) -> String {
        let w = self.width;
        match &self.kind {
            FieldKind::Numeric => "0".repeat(w),
            FieldKind::Alpha | FieldKind::Alphanumeric => "A".repeat(w),
            FieldKind::Text => "X".repeat(w),
            FieldKind::NonRoman => "Ж".repeat(w),
            FieldKind::Defined(values) => format!("{:<w$}", values[0]),
            FieldKind::Boolean => "Y".to_string(),
            FieldKind::Flag => "U".to_string(),
            FieldKind::Date => "20130809".to_string(),
            FieldKind::Time => "025911".to_string(),
            FieldKind::Filler => " ".repeat(w),
            FieldKind::Composite(parts) => parts.iter().map(FieldSpec::sample).collect(),
        }
    }
}

/// Left-justified content: a non-blank lead character, then `rest` padding.
fn justified(lead: &str, rest: &str, width: usize) -> String {
    match width {
        0 => String::new(),
        1 => lead.to_string(),
        _ => format!("{lead}{rest}{{{}}}", width - 1),
    }
}

impl Add for FieldSpec {
    type Output = FieldSpec;

    /// Concatenate two primitives into a composite; widths add up.
    fn add(self, rhs: FieldSpec) -> FieldSpec {
        let width = self.width + rhs.width;
        let mut parts = match self.kind {
            FieldKind::Composite(parts) if !self.optional => parts,
            _ => vec![self],
        };
        match rhs.kind {
            FieldKind::Composite(more) if !rhs.optional => parts.extend(more),
            _ => parts.push(rhs),
        }
        FieldSpec::new(FieldKind::Composite(parts), width)
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.name(), self.width)?;
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}

// =============================================================================
// Constructors
// =============================================================================

pub fn numeric(width: usize) -> FieldSpec {
    FieldSpec::new(FieldKind::Numeric, width)
}

pub fn alpha(width: usize) -> FieldSpec {
    FieldSpec::new(FieldKind::Alpha, width)
}

pub fn alphanumeric(width: usize) -> FieldSpec {
    FieldSpec::new(FieldKind::Alphanumeric, width)
}

pub fn text(width: usize) -> FieldSpec {
    FieldSpec::new(FieldKind::Text, width)
}

/// One of `values`, each left-justified to `width`.
pub fn defined(width: usize, values: &[&str]) -> FieldSpec {
    debug_assert!(values.iter().all(|v| v.chars().count() <= width));
    let values = values.iter().map(|v| v.to_string()).collect();
    FieldSpec::new(FieldKind::Defined(values), width)
}

pub fn boolean() -> FieldSpec {
    FieldSpec::new(FieldKind::Boolean, 1)
}

pub fn flag() -> FieldSpec {
    FieldSpec::new(FieldKind::Flag, 1)
}

pub fn date() -> FieldSpec {
    FieldSpec::new(FieldKind::Date, 8)
}

pub fn time() -> FieldSpec {
    FieldSpec::new(FieldKind::Time, 6)
}

pub fn filler(width: usize) -> FieldSpec {
    FieldSpec::new(FieldKind::Filler, width)
}

pub fn non_roman(width: usize) -> FieldSpec {
    FieldSpec::new(FieldKind::NonRoman, width)
}

// =============================================================================
// Composites
// =============================================================================

/// Record type (3) + transaction sequence (8) + record sequence (8).
pub fn record_prefix() -> FieldSpec {
    alpha(3) + numeric(8) + numeric(8)
}

/// Three independent single-digit society affiliation flags.
pub fn society_affiliation() -> FieldSpec {
    numeric(1).optional() + numeric(1).optional() + numeric(1).optional()
}

/// V-ISAN: version (8) + ISAN (12) + episode (4) + check digit (1).
pub fn visan() -> FieldSpec {
    numeric(8).optional() + numeric(12).optional() + numeric(4).optional() + numeric(1).optional()
}

/// AV index key: society code (3) + audio-visual number (15).
pub fn av_key() -> FieldSpec {
    numeric(3).optional() + text(15).optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn matches(spec: &FieldSpec, value: &str) -> bool {
        Regex::new(&format!("^{}$", spec.pattern())).unwrap().is_match(value)
    }

    #[test]
    fn test_numeric() {
        assert!(matches(&numeric(5), "00012"));
        assert!(!matches(&numeric(5), "0001"));
        assert!(!matches(&numeric(5), "0001A"));
        assert!(!matches(&numeric(5), "     "));
        assert!(matches(&numeric(5).optional(), "     "));
    }

    #[test]
    fn test_alpha_requires_leading_letter() {
        assert!(matches(&alpha(3), "HDR"));
        assert!(matches(&alpha(3), "EN "));
        assert!(!matches(&alpha(3), " EN"));
        assert!(!matches(&alpha(3), "   "));
        assert!(!matches(&alpha(2), "E1"));
        assert!(matches(&alpha(2).optional(), "  "));
    }

    #[test]
    fn test_alphanumeric() {
        assert!(matches(&alphanumeric(6), "AB12  "));
        assert!(!matches(&alphanumeric(6), "ab12  "));
        assert!(!matches(&alphanumeric(6), "AB-12 "));
    }

    #[test]
    fn test_text() {
        assert!(matches(&text(10), "EMI SA #1 "));
        assert!(!matches(&text(3), "  A"));
        assert!(!matches(&text(3), "A\tB"));
        assert!(!matches(&text(3), "AÉB"));
        assert!(matches(&text(3).optional(), "   "));
    }

    #[test]
    fn test_non_roman() {
        assert!(matches(&non_roman(5), "東京 ЖX"));
        assert!(!matches(&non_roman(3), " AB"));
        assert!(!matches(&non_roman(3), "A\u{1}B"));
    }

    #[test]
    fn test_defined_values_are_padded_and_escaped() {
        let version = defined(5, &["02.10"]);
        assert!(matches(&version, "02.10"));
        assert!(!matches(&version, "02110"));

        let status = defined(2, &["E", "I"]);
        assert!(matches(&status, "E "));
        assert!(!matches(&status, "E"));
        assert!(!matches(&status, "J "));
    }

    #[test]
    fn test_boolean_and_flag() {
        assert!(matches(&boolean(), "Y"));
        assert!(!matches(&boolean(), "U"));
        assert!(matches(&flag(), "U"));
        assert!(!matches(&flag(), " "));
        assert!(matches(&flag().optional(), " "));
    }

    #[test]
    fn test_date() {
        assert!(matches(&date(), "20130809"));
        assert!(!matches(&date(), "2013080A"));
        assert!(!matches(&date(), "20131309"));
        assert!(!matches(&date(), "00000000"));
        assert!(matches(&date().optional(), "00000000"));
        assert!(matches(&date().optional(), "        "));
    }

    #[test]
    fn test_time() {
        assert!(matches(&time(), "025911"));
        assert!(matches(&time(), "000000"));
        assert!(!matches(&time(), "245911"));
        assert!(!matches(&time(), "026011"));
    }

    #[test]
    fn test_filler() {
        assert!(matches(&filler(2), "  "));
        assert!(!matches(&filler(2), "0 "));
    }

    #[test]
    fn test_composition_sums_widths() {
        let prefix = record_prefix();
        assert_eq!(prefix.width(), 19);
        assert!(matches(&prefix, "TER0000000100000002"));
        assert!(!matches(&prefix, "TER000000010000000"));

        let society = society_affiliation();
        assert_eq!(society.width(), 3);
        assert!(matches(&society, "0 2"));
        assert!(matches(&society, "   "));
        assert!(!matches(&society, "0A2"));

        assert_eq!(visan().width(), 25);
        assert_eq!(av_key().width(), 18);
    }

    #[test]
    fn test_composition_flattens_parts() {
        let combined = alpha(1) + alpha(1) + numeric(2);
        match combined.kind() {
            FieldKind::Composite(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected composite, got {other:?}"),
        }
        assert_eq!(combined.to_string(), "composite(4)");
    }

    #[test]
    fn test_sample_matches_pattern() {
        for spec in [record_prefix(), date().optional(), defined(3, &["GRH"]), non_roman(4), visan()] {
            assert!(matches(&spec, &spec.sample()), "{spec} sample rejected");
        }
    }
}
