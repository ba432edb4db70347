//! CWR v2.1 record layouts.
//!
//! Each entry lists the record-type codes sharing a layout, a display name,
//! the structural kind and the ordered field primitives. Adding a record type
//! is a change to this table only.

use super::field::{
    alpha, alphanumeric, av_key, boolean, date, defined, filler, flag, non_roman, numeric,
    record_prefix, society_affiliation, text, time, visan, FieldSpec,
};
use crate::models::{RecordKind, TransactionType};

/// Declarative description of one record layout.
pub struct LayoutDef {
    pub codes: &'static [&'static str],
    pub name: &'static str,
    pub kind: RecordKind,
    pub fields: Vec<FieldSpec>,
}

impl LayoutDef {
    fn new(
        codes: &'static [&'static str],
        name: &'static str,
        kind: RecordKind,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self { codes, name, kind, fields }
    }
}

/// Every layout known to the validator.
pub fn catalogue() -> Vec<LayoutDef> {
    use RecordKind::*;

    let transaction_codes = TransactionType::codes();

    vec![
        // ---------------------------------------------------------------------
        // Control records
        // ---------------------------------------------------------------------
        LayoutDef::new(&["HDR"], "Transmission Header", TransmissionHeader, vec![
            defined(3, &["HDR"]),
            alpha(2),                   // sender type
            numeric(9),                 // sender id
            text(45),                   // sender name
            defined(5, &["01.10"]),     // EDI standard version
            date(),                     // creation date
            time(),                     // creation time
            date(),                     // transmission date
            alphanumeric(15).optional(), // character set
        ]),
        LayoutDef::new(&["GRH"], "Group Header", GroupHeader, vec![
            defined(3, &["GRH"]),
            defined(3, &transaction_codes),
            numeric(5),                 // group id
            defined(5, &["02.10"]),     // transaction type version
            numeric(10).optional(),     // batch request
            filler(2),
        ]),
        LayoutDef::new(&["GRT"], "Group Trailer", GroupTrailer, vec![
            defined(3, &["GRT"]),
            numeric(5),                 // group id
            numeric(8),                 // transaction count
            numeric(8),                 // record count
            alpha(3).optional(),        // currency indicator
            numeric(10).optional(),     // total monetary value
        ]),
        LayoutDef::new(&["TRL"], "Transmission Trailer", TransmissionTrailer, vec![
            defined(3, &["TRL"]),
            numeric(5),                 // group count
            numeric(8),                 // transaction count
            numeric(8),                 // record count
        ]),
        // ---------------------------------------------------------------------
        // Transaction headers
        // ---------------------------------------------------------------------
        LayoutDef::new(&["AGR"], "Agreement Supporting Work Registration", TransactionHeader, vec![
            record_prefix(),
            alphanumeric(14),
            alphanumeric(14).optional(),
            alpha(2),
            date(),
            date().optional(),
            date().optional(),
            defined(1, &["A", "D", "N"]),
            date().optional(),
            defined(1, &["D", "N", "O"]),
            date().optional(),
            date().optional(),
            numeric(5),
            defined(1, &["N", "S"]).optional(),
            boolean().optional(),
            boolean().optional(),
            alphanumeric(14).optional(),
        ]),
        LayoutDef::new(&["NWR", "REV", "ISW", "EXC"], "Work Registration", TransactionHeader, vec![
            record_prefix(),
            text(60),                   // work title
            alpha(2).optional(),        // language code
            text(14),                   // submitter work number
            text(11).optional(),        // ISWC
            date().optional(),          // copyright date
            text(12).optional(),        // copyright number
            alpha(3),                   // distribution category
            time().optional(),          // duration
            flag(),                     // recorded indicator
            alpha(3).optional(),
            alpha(3).optional(),
            alpha(3),                   // version type
            alpha(3).optional(),
            alpha(3).optional(),
            alpha(3).optional(),
            text(30).optional(),
            text(10).optional(),
            alpha(2).optional(),
            boolean().optional(),
            numeric(3).optional(),
            date().optional(),
            flag().optional(),
            text(25).optional(),
            text(25).optional(),
            flag().optional(),
        ]),
        LayoutDef::new(&["ACK"], "Acknowledgement", TransactionHeader, vec![
            record_prefix(),
            date(),                     // creation date
            time(),                     // creation time
            numeric(5),                 // original group id
            numeric(8),                 // original transaction sequence
            defined(3, &transaction_codes),
            text(60).optional(),
            text(20).optional(),
            text(20).optional(),
            date(),                     // processing date
            defined(2, &["AS", "AC", "SR", "CO", "DU", "RA", "RC", "RJ", "NP"]),
        ]),
        // ---------------------------------------------------------------------
        // Parties and territories
        // ---------------------------------------------------------------------
        LayoutDef::new(&["TER"], "Territory in Agreement", Detail, vec![
            record_prefix(),
            defined(1, &["E", "I"]),
            numeric(4),
        ]),
        LayoutDef::new(&["IPA"], "Interested Party of Agreement", Detail, vec![
            record_prefix(),
            alpha(2),                   // agreement role
            text(11).optional(),        // IPI name number
            numeric(13).optional(),     // IPI base number
            text(9),
            text(45),
            text(30).optional(),
            society_affiliation(),
            numeric(5),
            society_affiliation(),
            numeric(5),
            society_affiliation(),
            numeric(5),
        ]),
        LayoutDef::new(&["NPA"], "Non-Roman Alphabet Agreement Party Name", Detail, vec![
            record_prefix(),
            text(9),
            non_roman(160),             // party name
            non_roman(160),             // party writer first name
            alpha(2).optional(),
        ]),
        LayoutDef::new(&["SPU", "OPU"], "Publisher Controlled By Submitter", Detail, vec![
            record_prefix(),
            numeric(2),                 // publisher sequence
            text(9).optional(),
            text(45).optional(),
            flag().optional(),
            alpha(1).optional() + alpha(1).optional(),
            text(9).optional(),
            numeric(11).optional(),
            text(14).optional(),
            society_affiliation(),
            numeric(5).optional(),
            society_affiliation(),
            numeric(5).optional(),
            society_affiliation(),
            numeric(5).optional(),
            flag().optional(),
            flag().optional(),
            filler(1),
            text(13).optional(),
            text(14).optional(),
            text(14).optional(),
            alpha(2).optional(),
            alpha(1).optional(),
        ]),
        LayoutDef::new(&["NPN"], "Non-Roman Alphabet Publisher Name", Detail, vec![
            record_prefix(),
            numeric(2),
            text(9),
            text(480),
            alpha(2).optional(),
        ]),
        LayoutDef::new(&["SPT"], "Publisher Territory of Control", Detail, vec![
            record_prefix(),
            text(9),
            filler(6),
            numeric(5).optional(),
            numeric(5).optional(),
            numeric(5).optional(),
            defined(1, &["E", "I"]),
            numeric(4),
            boolean(),
            numeric(3),
        ]),
        LayoutDef::new(&["SWR", "OWR"], "Writer Controlled By Submitter", Detail, vec![
            record_prefix(),
            text(9).optional(),
            text(45).optional(),
            text(30).optional(),
            flag().optional(),
            alpha(1).optional() + alpha(1).optional(),
            text(9).optional(),
            numeric(11).optional(),
            society_affiliation(),
            numeric(5).optional(),
            society_affiliation(),
            numeric(5).optional(),
            society_affiliation(),
            numeric(5).optional(),
            flag().optional(),
            boolean().optional(),
            boolean().optional(),
            filler(1),
            text(13).optional(),
            numeric(12).optional(),
            alpha(1).optional(),
        ]),
        LayoutDef::new(&["NWN"], "Non-Roman Alphabet Writer Name", Detail, vec![
            record_prefix(),
            text(9),
            text(160),                  // writer last name
            text(160),                  // writer first name
            alpha(2).optional(),
        ]),
        LayoutDef::new(&["SWT"], "Writer Territory of Control", Detail, vec![
            record_prefix(),
            text(9),
            numeric(5).optional(),
            numeric(5).optional(),
            numeric(5).optional(),
            defined(1, &["E", "I"]),
            numeric(4),
            boolean(),
            numeric(3),
        ]),
        LayoutDef::new(&["PWR"], "Publisher For Writer", Detail, vec![
            record_prefix(),
            text(9),
            text(45),
            text(14).optional(),
            text(14).optional(),
            text(9),
        ]),
        // ---------------------------------------------------------------------
        // Titles
        // ---------------------------------------------------------------------
        LayoutDef::new(&["ALT"], "Alternate Title", Detail, vec![
            record_prefix(),
            non_roman(60),
            alpha(2),
            alpha(2).optional(),
        ]),
        LayoutDef::new(&["NAT"], "Non-Roman Alphabet Title", Detail, vec![
            record_prefix(),
            text(640),
            text(2),                    // title type
            alpha(2).optional(),
        ]),
        LayoutDef::new(&["EWT"], "Entire Work Title for Excerpts", Detail, source_work_fields()),
        LayoutDef::new(&["VER"], "Original Work Title for Versions", Detail, source_work_fields()),
        LayoutDef::new(&["NET", "NCT", "NVT"], "Non-Roman Alphabet Entire, Component or Original Title", Detail, vec![
            record_prefix(),
            text(640),
            alpha(2).optional(),
        ]),
        LayoutDef::new(&["COM"], "Component", Detail, vec![
            record_prefix(),
            text(60),
            text(11).optional(),
            text(14).optional(),
            time().optional(),
            text(45),
            text(30).optional(),
            numeric(11).optional(),
            text(45).optional(),
            text(30).optional(),
            numeric(11).optional(),
            numeric(13).optional(),
            numeric(13).optional(),
        ]),
        LayoutDef::new(&["NOW"], "Non-Roman Alphabet Other Writer Name", Detail, vec![
            record_prefix(),
            text(160),
            text(160),
            alpha(2).optional(),
            alpha(1).optional(),
        ]),
        // ---------------------------------------------------------------------
        // Performance, recording and origin
        // ---------------------------------------------------------------------
        LayoutDef::new(&["PER"], "Performing Artist", Detail, vec![
            record_prefix(),
            text(45),
            text(30).optional(),
            text(11).optional(),
            text(13).optional(),
        ]),
        LayoutDef::new(&["NPR"], "Non-Roman Alphabet Performance Data", Detail, vec![
            record_prefix(),
            text(160).optional(),
            text(160).optional(),
            text(11).optional(),
            text(13).optional(),
            alpha(2).optional(),
            alpha(2).optional(),
            alpha(3).optional(),
        ]),
        LayoutDef::new(&["REC"], "Recording Detail", Detail, vec![
            record_prefix(),
            date().optional(),          // first release date
            filler(60),
            time().optional(),          // first release duration
            filler(5),
            text(60).optional(),
            text(60).optional(),
            text(18).optional(),
            text(13).optional(),
            text(12).optional(),
            alpha(1).optional(),
            alpha(1).optional(),
            text(3).optional(),
        ]),
        LayoutDef::new(&["ORN"], "Work Origin", Detail, vec![
            record_prefix(),
            text(3),                    // intended purpose
            text(60).optional(),
            text(15).optional(),
            numeric(4).optional(),
            text(60).optional(),
            text(1).optional(),
            visan(),
            text(12).optional(),
            text(60).optional(),
            text(20).optional(),
            numeric(4).optional(),
            av_key(),
        ]),
        LayoutDef::new(&["INS"], "Instrumentation Summary", Detail, vec![
            record_prefix(),
            numeric(3).optional(),
            text(3).optional(),
            text(50).optional(),
        ]),
        LayoutDef::new(&["IND"], "Instrumentation Detail", Detail, vec![
            record_prefix(),
            alpha(3),
            numeric(3).optional(),
        ]),
        LayoutDef::new(&["ARI"], "Additional Related Information", Detail, vec![
            record_prefix(),
            numeric(3),
            text(14).optional(),
            alpha(3),
            alpha(2).optional(),
            text(160).optional(),
        ]),
        LayoutDef::new(&["MSG"], "Message", Detail, vec![
            record_prefix(),
            defined(1, &["F", "R", "T", "G", "E"]),
            numeric(8),
            alpha(3),
            defined(1, &["E", "G", "T", "R", "F"]),
            alphanumeric(3),
            text(150),
        ]),
    ]
}

/// Shared by EWT and VER: the title and writers of a source work.
fn source_work_fields() -> Vec<FieldSpec> {
    vec![
        record_prefix(),
        text(60),
        text(11).optional(),
        alpha(2).optional(),
        text(45).optional(),
        text(30).optional(),
        text(60).optional(),
        numeric(11).optional(),     // writer 1 IPI name
        numeric(13).optional(),     // writer 1 IPI base
        text(45).optional(),
        text(30).optional(),
        numeric(11).optional(),     // writer 2 IPI name
        numeric(13).optional(),     // writer 2 IPI base
        text(14).optional(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn width(def: &LayoutDef) -> usize {
        def.fields.iter().map(FieldSpec::width).sum()
    }

    fn find<'a>(defs: &'a [LayoutDef], code: &str) -> &'a LayoutDef {
        defs.iter().find(|d| d.codes.contains(&code)).unwrap()
    }

    #[test]
    fn test_catalogue_has_39_distinct_codes() {
        let defs = catalogue();
        let codes: Vec<&str> = defs.iter().flat_map(|d| d.codes.iter().copied()).collect();
        let unique: HashSet<&str> = codes.iter().copied().collect();
        assert_eq!(codes.len(), 39);
        assert_eq!(unique.len(), 39);
    }

    #[test]
    fn test_control_record_widths() {
        let defs = catalogue();
        assert_eq!(width(find(&defs, "HDR")), 101);
        assert_eq!(width(find(&defs, "GRH")), 28);
        assert_eq!(width(find(&defs, "GRT")), 37);
        assert_eq!(width(find(&defs, "TRL")), 24);
    }

    #[test]
    fn test_detail_record_widths() {
        let defs = catalogue();
        assert_eq!(width(find(&defs, "TER")), 24);
        assert_eq!(width(find(&defs, "SPT")), 58);
        assert_eq!(width(find(&defs, "SWT")), 52);
        assert_eq!(width(find(&defs, "IPA")), 153);
        assert_eq!(width(find(&defs, "SPU")), 183);
        assert_eq!(width(find(&defs, "SWR")), 180);
        assert_eq!(width(find(&defs, "ACK")), 159);
        assert_eq!(width(find(&defs, "MSG")), 185);
    }

    #[test]
    fn test_every_prefixed_layout_starts_with_prefix() {
        for def in catalogue() {
            if def.kind.has_prefix() {
                assert_eq!(def.fields[0], record_prefix(), "{}", def.name);
            }
        }
    }
}
