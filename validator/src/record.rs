//! A single fixed-width line bound to its layout.
//!
//! Records are immutable: validation returns a verdict instead of flipping a
//! flag, so independent records can be checked from any thread.

use std::fmt;
use std::sync::Arc;

use crate::error::{FieldMismatch, FormatMismatch};
use crate::models::RecordKind;
use crate::schema::RecordLayout;

/// One input line and the layout it was resolved to.
#[derive(Debug, Clone)]
pub struct Record {
    type_code: String,
    raw: String,
    layout: Arc<RecordLayout>,
}

impl Record {
    /// Bind `raw` to `layout` without looking at the registry.
    pub fn new(raw: impl Into<String>, layout: Arc<RecordLayout>) -> Self {
        let raw = raw.into();
        let type_code = raw.chars().take(3).collect();
        Self { type_code, raw, layout }
    }

    /// The 3-character record-type code.
    pub fn type_code(&self) -> &str {
        &self.type_code
    }

    /// The line exactly as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    pub fn kind(&self) -> RecordKind {
        self.layout.kind()
    }

    /// The first `total_width` characters; anything after (e.g. a line
    /// terminator) is not part of the record.
    fn significant(&self) -> &str {
        let width = self.layout.total_width();
        match self.raw.char_indices().nth(width) {
            Some((end, _)) => &self.raw[..end],
            None => &self.raw,
        }
    }

    /// Whether the record matches its layout.
    pub fn check_format(&self) -> bool {
        self.layout.matcher().is_match(self.significant())
    }

    /// Match the record against its layout.
    ///
    /// On failure every field is matched on its own so the caller learns which
    /// ones are wrong; a line shorter than the layout reports every field
    /// that it does not fully cover.
    pub fn validate(&self) -> Result<(), FormatMismatch> {
        if self.check_format() {
            return Ok(());
        }

        Err(FormatMismatch {
            type_code: self.type_code.clone(),
            expected_width: self.layout.total_width(),
            actual_width: self.raw.chars().count(),
            fields: self.field_mismatches(),
        })
    }

    fn field_mismatches(&self) -> Vec<FieldMismatch> {
        let chars: Vec<char> = self.significant().chars().collect();
        let layout = &self.layout;

        layout
            .fields()
            .iter()
            .zip(layout.offsets())
            .enumerate()
            .filter_map(|(index, (spec, &offset))| {
                let end = (offset + spec.width()).min(chars.len());
                let found: String = chars.get(offset..end).unwrap_or_default().iter().collect();
                let ok = layout
                    .field_matcher(index)
                    .is_some_and(|m| m.is_match(&found));
                (!ok).then(|| FieldMismatch {
                    index,
                    offset,
                    width: spec.width(),
                    kind: spec.kind().name().to_string(),
                    found,
                })
            })
            .collect()
    }

    /// Raw content of field `index`, or `None` when the line is too short.
    pub fn field(&self, index: usize) -> Option<&str> {
        let offset = *self.layout.offsets().get(index)?;
        let width = self.layout.fields().get(index)?.width();
        char_slice(&self.raw, offset, width)
    }

    /// Field `index` parsed as an unsigned number.
    pub fn numeric_field(&self, index: usize) -> Option<u32> {
        self.field(index)?.trim().parse().ok()
    }

    /// Transaction sequence number from the record prefix.
    pub fn transaction_sequence(&self) -> Option<u32> {
        self.prefix_number(3)
    }

    /// Record sequence number from the record prefix.
    pub fn record_sequence(&self) -> Option<u32> {
        self.prefix_number(11)
    }

    fn prefix_number(&self, offset: usize) -> Option<u32> {
        if !self.kind().has_prefix() {
            return None;
        }
        char_slice(&self.raw, offset, 8)?.parse().ok()
    }
}

/// `width` characters of `s` starting at character `offset`.
fn char_slice(s: &str, offset: usize, width: usize) -> Option<&str> {
    let mut indices = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let start = indices.nth(offset)?;
    let end = if width == 0 { start } else { indices.nth(width - 1)? };
    Some(&s[start..end])
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
