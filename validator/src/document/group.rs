//! Groups and the transactions they hold.

use crate::models::RecordKind;
use crate::record::Record;

use super::message::{Message, MessageScope};

// GRH / GRT field positions.
const GRH_TRANSACTION_TYPE: usize = 1;
const GRH_GROUP_ID: usize = 2;
const GRT_GROUP_ID: usize = 1;
const GRT_TRANSACTION_COUNT: usize = 2;
const GRT_RECORD_COUNT: usize = 3;

// =============================================================================
// Transaction
// =============================================================================

/// A transaction header and the detail records that follow it.
#[derive(Debug, Clone)]
pub struct Transaction {
    header: Record,
    details: Vec<Record>,
}

impl Transaction {
    pub fn new(header: Record) -> Self {
        Self { header, details: Vec::new() }
    }

    pub fn header(&self) -> &Record {
        &self.header
    }

    pub fn details(&self) -> &[Record] {
        &self.details
    }

    pub fn add_detail(&mut self, record: Record) {
        self.details.push(record);
    }

    /// Number of physical records: the header plus its details.
    pub fn record_count(&self) -> usize {
        1 + self.details.len()
    }

    /// The detail records, in file order.
    pub fn extract_records(&self) -> Vec<&Record> {
        self.details.iter().collect()
    }
}

// =============================================================================
// Group
// =============================================================================

/// A GRH..GRT run of same-type transactions.
#[derive(Debug, Clone)]
pub struct Group {
    header: Record,
    trailer: Option<Record>,
    id: u32,
    transaction_type: String,
    transactions: Vec<Transaction>,
    rejected: bool,
    messages: Vec<Message>,
    /// Rejections raised before validation, kept across validation runs.
    assembly_messages: Vec<Message>,
    assembly_rejected: bool,
}

impl Group {
    /// Open a group from its GRH record.
    ///
    /// An unreadable group id becomes 0, which never matches a sequence
    /// position and so gets the group rejected when it is added.
    pub fn new(header: Record) -> Self {
        let id = header.numeric_field(GRH_GROUP_ID).unwrap_or(0);
        let transaction_type = header
            .field(GRH_TRANSACTION_TYPE)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        Self {
            header,
            trailer: None,
            id,
            transaction_type,
            transactions: Vec::new(),
            rejected: false,
            messages: Vec::new(),
            assembly_messages: Vec::new(),
            assembly_rejected: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn transaction_type(&self) -> &str {
        &self.transaction_type
    }

    pub fn header(&self) -> &Record {
        &self.header
    }

    pub fn trailer(&self) -> Option<&Record> {
        self.trailer.as_ref()
    }

    /// The last control record seen for this group.
    pub fn record_type(&self) -> &'static str {
        if self.trailer.is_some() {
            "GRT"
        } else {
            "GRH"
        }
    }

    pub fn set_trailer(&mut self, trailer: Record) {
        self.trailer = Some(trailer);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// The transaction currently receiving detail records.
    pub fn last_transaction_mut(&mut self) -> Option<&mut Transaction> {
        self.transactions.last_mut()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Reject the group with a GROUP-scope message. The rejection outlives
    /// later calls to [`Group::group_level_validation`].
    pub fn group_reject(&mut self, text: impl Into<String>) {
        let message = Message::group(self.id, self.header.type_code(), text);
        self.assembly_messages.push(message.clone());
        self.assembly_rejected = true;
        self.reject_with(message);
    }

    fn reject_with(&mut self, message: Message) {
        self.messages.push(message);
        self.rejected = true;
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Physical records from GRH to GRT inclusive.
    pub fn record_count(&self) -> usize {
        let body: usize = self.transactions.iter().map(Transaction::record_count).sum();
        1 + body + usize::from(self.trailer.is_some())
    }

    /// Checks that only need the group itself: the trailer agrees with the
    /// header and the contents, every transaction has the group's type and
    /// every record is well-formed.
    ///
    /// Findings of a previous run are replaced, not added to.
    pub fn group_level_validation(&mut self) {
        self.messages = self.assembly_messages.clone();
        self.rejected = self.assembly_rejected;

        if let Err(err) = self.header.validate() {
            let message = Message::group(self.id, self.header.type_code(), err.to_string());
            self.reject_with(message);
        }

        self.check_trailer();

        let mut found = Vec::new();
        for transaction in &self.transactions {
            let header = transaction.header();
            if header.kind() == RecordKind::TransactionHeader
                && header.type_code() != self.transaction_type
            {
                found.push(Message::about(
                    header,
                    MessageScope::Transaction,
                    format!(
                        "Transaction type {} does not match group type {}",
                        header.type_code(),
                        self.transaction_type
                    ),
                ));
            }
            for record in std::iter::once(header).chain(transaction.details()) {
                if let Err(err) = record.validate() {
                    found.push(Message::about(record, MessageScope::Record, err.to_string()));
                }
            }
        }
        for message in found {
            self.reject_with(message);
        }
    }

    fn check_trailer(&mut self) {
        let Some(trailer) = &self.trailer else {
            let message = Message::group(self.id, self.header.type_code(), "Group trailer expected");
            self.reject_with(message);
            return;
        };

        if let Err(err) = trailer.validate() {
            let message = Message::group(self.id, trailer.type_code(), err.to_string());
            self.reject_with(message);
            return;
        }

        let checks = [
            (GRT_GROUP_ID, self.id as usize, "Group id"),
            (GRT_TRANSACTION_COUNT, self.transaction_count(), "Transaction count"),
            (GRT_RECORD_COUNT, self.record_count(), "Record count"),
        ];
        let mut found = Vec::new();
        for (index, actual, label) in checks {
            let declared = trailer.numeric_field(index).map(|n| n as usize);
            if declared != Some(actual) {
                found.push(Message::group(
                    self.id,
                    trailer.type_code(),
                    format!(
                        "{label} in group trailer is {}, expected {actual}",
                        declared.map_or_else(|| "unreadable".to_string(), |n| n.to_string())
                    ),
                ));
            }
        }
        for message in found {
            self.reject_with(message);
        }
    }

    /// GRH, every transaction with its details, then GRT.
    pub fn extract_records(&self) -> Vec<&Record> {
        let mut records = vec![&self.header];
        for transaction in &self.transactions {
            records.push(transaction.header());
            records.extend(transaction.extract_records());
        }
        records.extend(self.trailer.as_ref());
        records
    }
}
