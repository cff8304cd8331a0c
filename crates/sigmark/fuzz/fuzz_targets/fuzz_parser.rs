//! Fuzz target for the data parser.
//!
//! The delimited parser and the measurement conversion must never panic on
//! malformed input. Errors are expected and ignored.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sigmark::{ColumnMapping, MeasurementTable, input::Parser};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let parser = Parser::new();
    if let Ok(table) = parser.parse_str(text) {
        if let Ok(mapping) = ColumnMapping::positional(&table) {
            let _ = MeasurementTable::from_data_table(&table, &mapping);
        }
    }
});
