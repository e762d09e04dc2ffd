//! Property-based tests for table layout and address selection.

#![allow(clippy::expect_used)]

use alamo_cli::domain::bootstrap::select_address;
use alamo_cli::domain::table::{SERVER_COLUMNS, TAB_WIDTH, format_table};
use alamo_common::ServerRecord;
use proptest::prelude::*;

use crate::mocks::server;

fn arb_record() -> impl Strategy<Value = ServerRecord> {
    (
        "[a-z0-9-]{1,50}",
        "[a-z]{0,30}",
        prop::sample::select(vec!["ACTIVE", "BUILD", "ERROR", "SHUTOFF"]),
        prop::collection::vec(("(public|private|mgmt)", "10\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}"), 0..4),
    )
        .prop_map(|(id, name, status, addresses)| {
            let pairs: Vec<(&str, &str)> = addresses
                .iter()
                .map(|(n, a)| (n.as_str(), a.as_str()))
                .collect();
            let mut record = server(&id, status, &pairs);
            record.name = name;
            record
        })
}

proptest! {
    #[test]
    fn prop_one_line_per_record_plus_header(records in prop::collection::vec(arb_record(), 0..8)) {
        let lines = format_table(SERVER_COLUMNS, &records).expect("format");
        prop_assert_eq!(lines.len(), records.len() + 1);
    }

    #[test]
    fn prop_lines_have_no_trailing_whitespace(records in prop::collection::vec(arb_record(), 0..8)) {
        for line in format_table(SERVER_COLUMNS, &records).expect("format") {
            prop_assert_eq!(line.trim_end(), line.as_str());
        }
    }

    #[test]
    fn prop_short_ids_are_padded_to_first_column(record in arb_record()) {
        let width = SERVER_COLUMNS[0].1 * TAB_WIDTH;
        prop_assume!(record.id.len() < width);
        let lines = format_table(SERVER_COLUMNS, std::slice::from_ref(&record)).expect("format");
        let line = &lines[1];
        prop_assert!(line.starts_with(&record.id));
        // Status always sits after the id and name columns when neither overflows.
        prop_assume!(record.name.len() < SERVER_COLUMNS[1].1 * TAB_WIDTH);
        let status_col = (SERVER_COLUMNS[0].1 + SERVER_COLUMNS[1].1) * TAB_WIDTH;
        prop_assert!(line[status_col..].starts_with(&record.status));
    }

    #[test]
    fn prop_overflowing_values_are_kept_whole(record in arb_record()) {
        let lines = format_table(SERVER_COLUMNS, std::slice::from_ref(&record)).expect("format");
        prop_assert!(lines[1].contains(&record.id));
        for entry in record.all_addresses() {
            prop_assert!(lines[1].contains(&entry.addr));
        }
    }

    #[test]
    fn prop_selected_address_belongs_to_server(record in arb_record()) {
        match select_address(&record) {
            Some(addr) => prop_assert!(record.all_addresses().any(|e| e.addr == addr)),
            None => prop_assert!(!record.has_address()),
        }
    }
}
