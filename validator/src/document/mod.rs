//! Hierarchical view of a transmission: HDR, groups of transactions, TRL.
//!
//! A [`Document`] is filled in file order with [`Document::set_header`],
//! [`Document::add_group`] and [`Document::set_trailer`] (or all at once with
//! [`assemble`]). Structural problems are recorded as [`Message`]s and flip
//! the document to rejected, but never stop the assembly, so one pass
//! reports everything that is wrong with a file.

pub mod assembler;
pub mod group;
pub mod message;

use std::collections::{BTreeMap, HashSet};

use crate::config::DuplicateGroupPolicy;
use crate::record::Record;

pub use assembler::assemble;
pub use group::{Group, Transaction};
pub use message::{Message, MessageScope};

// TRL field positions.
const TRL_GROUP_COUNT: usize = 1;
const TRL_TRANSACTION_COUNT: usize = 2;
const TRL_RECORD_COUNT: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct Document {
    header: Option<Record>,
    trailer: Option<Record>,
    /// Admitted groups by id; ids are admitted in sequence so key order is
    /// insertion order.
    groups: BTreeMap<u32, Group>,
    groups_types: HashSet<String>,
    last_record_type: Option<String>,
    rejected: bool,
    messages: Vec<Message>,
    /// Messages raised while the document was filled in; every validation
    /// run starts over from these.
    assembly_messages: Vec<Message>,
    assembly_rejected: bool,
    /// Groups received but left out of `groups`.
    dropped: Vec<Group>,
    duplicate_policy: DuplicateGroupPolicy,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicate_policy(policy: DuplicateGroupPolicy) -> Self {
        Self {
            duplicate_policy: policy,
            ..Self::default()
        }
    }

    pub fn header(&self) -> Option<&Record> {
        self.header.as_ref()
    }

    pub fn set_header(&mut self, header: Record) {
        self.header = Some(header);
        self.last_record_type = Some("HDR".to_string());
    }

    pub fn trailer(&self) -> Option<&Record> {
        self.trailer.as_ref()
    }

    pub fn set_trailer(&mut self, trailer: Record) {
        self.trailer = Some(trailer);
        self.last_record_type = Some("TRL".to_string());
    }

    /// Type code of the last control record supplied (HDR, GRH, GRT or TRL).
    pub fn last_record_type(&self) -> Option<&str> {
        self.last_record_type.as_deref()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    /// Document-level messages, in the order they were raised.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Document messages followed by the messages of every group, admitted
    /// groups first.
    pub fn all_messages(&self) -> Vec<&Message> {
        self.messages
            .iter()
            .chain(self.groups.values().flat_map(|g| g.messages()))
            .chain(self.dropped.iter().flat_map(|g| g.messages()))
            .collect()
    }

    /// Record `message` and mark the document rejected. The rejection
    /// outlives later calls to [`Document::validate`].
    pub fn reject(&mut self, message: Message) {
        self.assembly_messages.push(message.clone());
        self.assembly_rejected = true;
        self.flag(message);
    }

    fn flag(&mut self, message: Message) {
        self.messages.push(message);
        self.rejected = true;
    }

    pub fn group(&self, id: u32) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Admitted groups in id order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Groups that were received but not admitted, in arrival order.
    pub fn dropped_groups(&self) -> &[Group] {
        &self.dropped
    }

    /// Add the next group in file order.
    ///
    /// Returns whether the group was admitted into the group mapping. A group
    /// out of place rejects the document; a group with an out-of-sequence id
    /// is rejected itself and left out; a group repeating an earlier
    /// transaction type is left out and, under [`DuplicateGroupPolicy::Report`],
    /// rejects the document.
    pub fn add_group(&mut self, mut group: Group) -> bool {
        if !matches!(self.last_record_type(), Some("HDR" | "GRT")) {
            self.reject(Message::group(
                group.id(),
                group.header().type_code(),
                "Group expected after HDR or GRT",
            ));
        }

        self.last_record_type = Some(group.record_type().to_string());

        let expected = self.groups.len() + 1;
        if group.id() as usize != expected {
            group.group_reject(format!(
                "Groups expected in sequence: found {}, expected {expected}",
                group.id()
            ));
            self.dropped.push(group);
            return false;
        }

        if self.groups_types.contains(group.transaction_type()) {
            if self.duplicate_policy == DuplicateGroupPolicy::Report {
                self.reject(Message::group(
                    group.id(),
                    group.header().type_code(),
                    format!(
                        "Transaction type {} already used by an earlier group",
                        group.transaction_type()
                    ),
                ));
            }
            self.dropped.push(group);
            return false;
        }

        self.groups_types.insert(group.transaction_type().to_string());
        self.groups.insert(group.id(), group);
        true
    }

    /// Run every validation hook: header, each admitted group (group level,
    /// then file level), the dropped groups, then the trailer.
    ///
    /// Findings of a previous run are discarded first, so validating twice
    /// gives the same messages as validating once.
    ///
    /// Dropped groups have their contents checked too, except duplicates
    /// under [`DuplicateGroupPolicy::Legacy`], which stay silent.
    pub fn validate(&mut self) {
        self.messages = self.assembly_messages.clone();
        self.rejected = self.assembly_rejected;

        self.header_file_level_validation();

        let ids: Vec<u32> = self.groups.keys().copied().collect();
        for id in ids {
            if let Some(group) = self.groups.get_mut(&id) {
                group.group_level_validation();
            }
            self.group_file_level_validation(id);
        }

        let report_duplicates = self.duplicate_policy == DuplicateGroupPolicy::Report;
        for group in &mut self.dropped {
            if report_duplicates || group.is_rejected() {
                group.group_level_validation();
            }
        }
        if self.dropped.iter().any(Group::is_rejected) {
            self.rejected = true;
        }

        self.trailer_file_level_validation();
    }

    fn header_file_level_validation(&mut self) {
        match &self.header {
            None => self.flag(Message::file("HDR", "Transmission header expected")),
            Some(header) => {
                if let Err(err) = header.validate() {
                    self.flag(Message::file("HDR", err.to_string()));
                }
            }
        }
    }

    fn group_file_level_validation(&mut self, id: u32) {
        if self.groups.get(&id).is_some_and(Group::is_rejected) {
            self.rejected = true;
        }
    }

    /// Trailer counts cover every group received, admitted or not, since they
    /// describe the file as written.
    fn trailer_file_level_validation(&mut self) {
        let Some(trailer) = &self.trailer else {
            self.flag(Message::file("TRL", "Transmission trailer expected"));
            return;
        };

        if let Err(err) = trailer.validate() {
            let message = Message::file("TRL", err.to_string());
            self.flag(message);
            return;
        }

        let received = || self.groups.values().chain(&self.dropped);
        let group_count = received().count();
        let transaction_count: usize = received().map(Group::transaction_count).sum();
        let record_count: usize = 2 + received().map(Group::record_count).sum::<usize>();

        let checks = [
            (TRL_GROUP_COUNT, group_count, "Group count"),
            (TRL_TRANSACTION_COUNT, transaction_count, "Transaction count"),
            (TRL_RECORD_COUNT, record_count, "Record count"),
        ];
        let found: Vec<Message> = checks
            .into_iter()
            .filter_map(|(index, actual, label)| {
                let declared = trailer.numeric_field(index).map(|n| n as usize);
                (declared != Some(actual)).then(|| {
                    Message::file(
                        "TRL",
                        format!(
                            "{label} in transmission trailer is {}, expected {actual}",
                            declared.map_or_else(|| "unreadable".to_string(), |n| n.to_string())
                        ),
                    )
                })
            })
            .collect();
        for message in found {
            self.flag(message);
        }
    }

    /// Every record in canonical file order: HDR, each admitted group with
    /// its transactions, TRL.
    pub fn extract_records(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.header.iter().collect();
        for group in self.groups.values() {
            records.extend(group.extract_records());
        }
        records.extend(self.trailer.as_ref());
        records
    }

    /// The canonical record sequence, one newline-terminated line per record.
    pub fn render(&self) -> String {
        self.extract_records()
            .into_iter()
            .map(|r| format!("{}\n", r.raw()))
            .collect()
    }
}
