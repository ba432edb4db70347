//! Record schema registry.
//!
//! Maps every 3-character record-type code to a compiled [`RecordLayout`].
//! Layouts are compiled once: the anchored whole-record pattern, one anchored
//! pattern per field (for diagnostics), field offsets and the total width.
//! Lookup is a single hash-map access, so resolving a line costs O(1) and
//! validating it costs O(width).
//!
//! # Example
//!
//! ```rust,ignore
//! use cwr_validator::schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::global();
//! let record = registry.resolve("TER0000000000000000I2136")?;
//! assert!(record.check_format());
//! ```

pub mod field;
pub mod layouts;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{RecordError, RecordResult};
use crate::models::RecordKind;
use crate::record::Record;

pub use field::{FieldKind, FieldSpec};
use layouts::{catalogue, LayoutDef};

/// Compiled program budget for the widest layouts (640-character non-Roman titles).
const PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Process-wide registry, built on first use.
static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::new);

// =============================================================================
// Record Layout
// =============================================================================

/// A record type's field list plus everything derived from it.
#[derive(Debug)]
pub struct RecordLayout {
    name: &'static str,
    kind: RecordKind,
    fields: Vec<FieldSpec>,
    offsets: Vec<usize>,
    total_width: usize,
    matcher: Regex,
    field_matchers: Vec<Regex>,
}

impl RecordLayout {
    /// Compile a layout from its field list.
    pub fn new(name: &'static str, kind: RecordKind, fields: Vec<FieldSpec>) -> Self {
        let mut offsets = Vec::with_capacity(fields.len());
        let mut total_width = 0;
        for field in &fields {
            offsets.push(total_width);
            total_width += field.width();
        }

        let body: String = fields.iter().map(FieldSpec::pattern).collect();
        let matcher = anchored(&body);
        let field_matchers = fields.iter().map(|f| anchored(&f.pattern())).collect();

        Self {
            name,
            kind,
            fields,
            offsets,
            total_width,
            matcher,
            field_matchers,
        }
    }

    /// Human-readable layout name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Character offset of each field.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Sum of all field widths.
    pub fn total_width(&self) -> usize {
        self.total_width
    }

    /// The anchored whole-record pattern.
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// The anchored pattern of field `index`.
    pub fn field_matcher(&self, index: usize) -> Option<&Regex> {
        self.field_matchers.get(index)
    }

    /// A line that satisfies every field, with `code` as its type prefix.
    #[cfg(test)]
    pub(crate) fn sample_line(&self, code: &str) -> String {
        let sample: String = self.fields.iter().map(FieldSpec::sample).collect();
        format!("{code}{}", sample.chars().skip(3).collect::<String>())
    }
}

/// Compile `^(?:body)$`.
///
/// Patterns are generated from field primitives, never from input, so a
/// compile failure is a bug in the primitives themselves.
fn anchored(body: &str) -> Regex {
    RegexBuilder::new(&format!("^(?:{body})$"))
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .expect("field primitives always produce a valid pattern")
}

// =============================================================================
// Registry
// =============================================================================

/// Mapping from record-type code to its compiled layout.
pub struct SchemaRegistry {
    layouts: HashMap<&'static str, Arc<RecordLayout>>,
}

impl SchemaRegistry {
    /// Build a registry from the full CWR layout catalogue.
    pub fn new() -> Self {
        Self::from_defs(catalogue())
    }

    /// Build a registry from explicit layout definitions.
    pub fn from_defs(defs: Vec<LayoutDef>) -> Self {
        let mut layouts = HashMap::new();
        for def in defs {
            let layout = Arc::new(RecordLayout::new(def.name, def.kind, def.fields));
            for code in def.codes {
                layouts.insert(*code, Arc::clone(&layout));
            }
        }
        Self { layouts }
    }

    /// The shared process-wide registry.
    pub fn global() -> &'static SchemaRegistry {
        &REGISTRY
    }

    /// Layout registered for `code`.
    pub fn get(&self, code: &str) -> Option<&Arc<RecordLayout>> {
        self.layouts.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.layouts.contains_key(code)
    }

    /// Registered codes, sorted.
    pub fn codes(&self) -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = self.layouts.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Resolve a raw line into a record bound to its layout.
    ///
    /// # Errors
    /// * [`RecordError::EmptyOrNullInput`] if the line is empty
    /// * [`RecordError::UnknownRecordType`] if the first 3 characters are not registered
    pub fn resolve(&self, raw: &str) -> RecordResult<Record> {
        if raw.is_empty() {
            return Err(RecordError::EmptyOrNullInput);
        }

        let code: String = raw.chars().take(3).collect();
        let layout = self
            .layouts
            .get(code.as_str())
            .ok_or_else(|| RecordError::UnknownRecordType(code.clone()))?;

        Ok(Record::new(raw, Arc::clone(layout)))
    }

    /// Like [`resolve`](Self::resolve), for callers holding an optional line.
    pub fn resolve_opt(&self, raw: Option<&str>) -> RecordResult<Record> {
        self.resolve(raw.ok_or(RecordError::EmptyOrNullInput)?)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_codes() {
        let registry = SchemaRegistry::global();
        assert_eq!(registry.len(), 39);
        for code in ["HDR", "GRH", "GRT", "TRL", "NWR", "SPU", "OPU", "NVT", "ACK", "MSG"] {
            assert!(registry.contains(code), "{code} missing");
        }
        let codes = registry.codes();
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_shared_layouts_are_the_same_instance() {
        let registry = SchemaRegistry::global();
        let spu = registry.get("SPU").unwrap();
        let opu = registry.get("OPU").unwrap();
        assert!(Arc::ptr_eq(spu, opu));
        assert!(Arc::ptr_eq(registry.get("NWR").unwrap(), registry.get("EXC").unwrap()));
    }

    #[test]
    fn test_offsets_follow_widths() {
        let layout = SchemaRegistry::global().get("TER").unwrap();
        assert_eq!(layout.offsets(), &[0, 19, 20]);
        assert_eq!(layout.total_width(), 24);
        assert_eq!(layout.kind(), RecordKind::Detail);
    }

    #[test]
    fn test_resolve_known_type() {
        let record = SchemaRegistry::global()
            .resolve("TER0000000000000000I2136")
            .unwrap();
        assert_eq!(record.type_code(), "TER");
        assert_eq!(record.layout().name(), "Territory in Agreement");
    }

    #[test]
    fn test_resolve_unknown_type() {
        let err = SchemaRegistry::global().resolve("XYZ0000000000000000").unwrap_err();
        assert_eq!(err, RecordError::UnknownRecordType("XYZ".into()));

        let err = SchemaRegistry::global().resolve("HD").unwrap_err();
        assert_eq!(err, RecordError::UnknownRecordType("HD".into()));
    }

    #[test]
    fn test_resolve_empty() {
        let registry = SchemaRegistry::global();
        assert_eq!(registry.resolve("").unwrap_err(), RecordError::EmptyOrNullInput);
        assert_eq!(registry.resolve_opt(None).unwrap_err(), RecordError::EmptyOrNullInput);
    }

    #[test]
    fn test_every_sample_line_validates() {
        let registry = SchemaRegistry::global();
        for code in registry.codes() {
            let layout = registry.get(code).unwrap();
            let line = layout.sample_line(code);
            assert_eq!(line.chars().count(), layout.total_width(), "{code}");
            let record = registry.resolve(&line).unwrap();
            assert!(record.check_format(), "{code} sample rejected: {line:?}");
        }
    }

    #[test]
    fn test_custom_registry() {
        let registry = SchemaRegistry::from_defs(vec![LayoutDef {
            codes: &["ZZZ"],
            name: "Test",
            kind: RecordKind::Detail,
            fields: vec![field::defined(3, &["ZZZ"]), field::numeric(2)],
        }]);
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("ZZZ12").unwrap().check_format());
        assert!(registry.resolve("HDR").is_err());
    }
}
