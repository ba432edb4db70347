//! Fold a flat record sequence into a [`Document`].

use crate::config::DuplicateGroupPolicy;
use crate::models::RecordKind;
use crate::record::Record;

use super::group::{Group, Transaction};
use super::message::{Message, MessageScope};
use super::Document;

/// Build a document from records in file order.
///
/// A group is handed to the document once its GRT arrives, or when the next
/// GRH, the TRL or the end of input shows that it was never closed. Records
/// that have no place to go (a second HDR, a detail outside a transaction,
/// anything after TRL) are reported and skipped. The returned document has
/// not been validated yet; call [`Document::validate`] for the full checks.
pub fn assemble<I>(records: I, policy: DuplicateGroupPolicy) -> Document
where
    I: IntoIterator<Item = Record>,
{
    let mut doc = Document::with_duplicate_policy(policy);
    let mut open: Option<Group> = None;

    for record in records {
        if doc.last_record_type() == Some("TRL") {
            doc.reject(Message::about(
                &record,
                MessageScope::Record,
                "Record found after transmission trailer",
            ));
            continue;
        }

        match record.kind() {
            RecordKind::TransmissionHeader => {
                if doc.header().is_some() || doc.last_record_type().is_some() || open.is_some() {
                    doc.reject(Message::file(
                        record.type_code(),
                        "Transmission header expected only at the start of the file",
                    ));
                } else {
                    doc.set_header(record);
                }
            }
            RecordKind::GroupHeader => {
                if let Some(group) = open.take() {
                    doc.add_group(group);
                }
                open = Some(Group::new(record));
            }
            RecordKind::GroupTrailer => match open.take() {
                Some(mut group) => {
                    group.set_trailer(record);
                    doc.add_group(group);
                }
                None => {
                    let id = record.numeric_field(1).unwrap_or(0);
                    doc.reject(Message::group(
                        id,
                        record.type_code(),
                        "Group trailer without group header",
                    ));
                }
            },
            RecordKind::TransactionHeader => match open.as_mut() {
                Some(group) => group.add_transaction(Transaction::new(record)),
                None => doc.reject(Message::about(
                    &record,
                    MessageScope::Transaction,
                    "Transaction found outside of a group",
                )),
            },
            RecordKind::Detail => match open.as_mut().and_then(Group::last_transaction_mut) {
                Some(transaction) => transaction.add_detail(record),
                None => doc.reject(Message::about(
                    &record,
                    MessageScope::Record,
                    "Detail record found outside of a transaction",
                )),
            },
            RecordKind::TransmissionTrailer => {
                if let Some(group) = open.take() {
                    doc.add_group(group);
                }
                doc.set_trailer(record);
            }
        }
    }

    if let Some(group) = open.take() {
        doc.add_group(group);
    }
    doc
}
