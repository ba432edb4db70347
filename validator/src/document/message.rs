//! Structural complaints collected while assembling a document.
//!
//! Shaped after the CWR `MSG` record: a scope letter, the sequence number of
//! the thing complained about, the originating record type and a free text.

use serde::Serialize;
use std::fmt;

use crate::record::Record;

/// What a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageScope {
    #[serde(rename = "F")]
    File,
    #[serde(rename = "G")]
    Group,
    #[serde(rename = "T")]
    Transaction,
    #[serde(rename = "R")]
    Record,
}

impl MessageScope {
    pub fn to_code(self) -> char {
        match self {
            Self::File => 'F',
            Self::Group => 'G',
            Self::Transaction => 'T',
            Self::Record => 'R',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'F' => Some(Self::File),
            'G' => Some(Self::Group),
            'T' => Some(Self::Transaction),
            'R' => Some(Self::Record),
            _ => None,
        }
    }
}

impl fmt::Display for MessageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Group => "group",
            Self::Transaction => "transaction",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub scope: MessageScope,
    /// Group id, transaction or record sequence; 0 for the file itself.
    pub sequence: u32,
    pub record_type: String,
    pub level: MessageScope,
    pub text: String,
}

impl Message {
    pub fn new(
        scope: MessageScope,
        sequence: u32,
        record_type: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            scope,
            sequence,
            record_type: record_type.into(),
            level: scope,
            text: text.into(),
        }
    }

    pub fn file(record_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(MessageScope::File, 0, record_type, text)
    }

    pub fn group(id: u32, record_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(MessageScope::Group, id, record_type, text)
    }

    /// A message about `record`, numbered from its prefix when it has one.
    pub fn about(record: &Record, scope: MessageScope, text: impl Into<String>) -> Self {
        let sequence = match scope {
            MessageScope::Transaction => record.transaction_sequence(),
            MessageScope::Record => record.record_sequence(),
            MessageScope::Group | MessageScope::File => None,
        };
        Self::new(scope, sequence.unwrap_or(0), record.type_code(), text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} #{}: {}",
            self.scope.to_code(),
            self.record_type,
            self.sequence,
            self.text
        )
    }
}
