//! Domain models shared by the registry, the validator and the assembler.
//!
//! - [`RecordKind`] - Structural shape of a record (header, trailer, detail, ...)
//! - [`TransactionType`] - Codes that open a transaction inside a group

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Record Kind
// =============================================================================

/// Structural role of a record within a CWR file.
///
/// Several record-type codes share one kind; the assembler only needs the
/// kind to place a record in the header/group/transaction/trailer tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    /// HDR - first record of a transmission.
    TransmissionHeader,
    /// TRL - last record of a transmission.
    TransmissionTrailer,
    /// GRH - opens a group of same-type transactions.
    GroupHeader,
    /// GRT - closes a group.
    GroupTrailer,
    /// AGR, NWR, REV, ISW, EXC, ACK - opens a transaction.
    TransactionHeader,
    /// Any record nested in a transaction.
    Detail,
}

impl RecordKind {
    /// Whether records of this kind start with the 19-character record prefix.
    pub fn has_prefix(&self) -> bool {
        matches!(self, Self::TransactionHeader | Self::Detail)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TransmissionHeader => "transmission header",
            Self::TransmissionTrailer => "transmission trailer",
            Self::GroupHeader => "group header",
            Self::GroupTrailer => "group trailer",
            Self::TransactionHeader => "transaction header",
            Self::Detail => "detail",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Transaction Type
// =============================================================================

/// Record types that may head a transaction (and name a group's content).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// AGR - Agreement supporting work registration.
    Agreement,
    /// NWR - New works registration.
    NewWork,
    /// REV - Revised registration.
    Revision,
    /// ISW - Notification of ISWC assigned to a work.
    IswcNotification,
    /// EXC - Existing work in conflict.
    ExistingWorkInConflict,
    /// ACK - Acknowledgement of a transaction.
    Acknowledgement,
}

impl TransactionType {
    /// Every transaction type, in registry order.
    pub const ALL: [TransactionType; 6] = [
        Self::Agreement,
        Self::NewWork,
        Self::Revision,
        Self::IswcNotification,
        Self::ExistingWorkInConflict,
        Self::Acknowledgement,
    ];

    /// Parse from a 3-character record-type code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "AGR" => Some(Self::Agreement),
            "NWR" => Some(Self::NewWork),
            "REV" => Some(Self::Revision),
            "ISW" => Some(Self::IswcNotification),
            "EXC" => Some(Self::ExistingWorkInConflict),
            "ACK" => Some(Self::Acknowledgement),
            _ => None,
        }
    }

    /// Convert to the 3-character record-type code.
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::Agreement => "AGR",
            Self::NewWork => "NWR",
            Self::Revision => "REV",
            Self::IswcNotification => "ISW",
            Self::ExistingWorkInConflict => "EXC",
            Self::Acknowledgement => "ACK",
        }
    }

    /// All codes, for defined-value fields listing transaction types.
    pub fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.to_code()).collect()
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_code())
    }
}

// =============================================================================
// Tests
// =============================================================================
