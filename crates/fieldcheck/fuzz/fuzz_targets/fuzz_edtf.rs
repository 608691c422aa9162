//! Fuzz target for the date validators.
//!
//! EDTF, calendar and created-date checks must return a verdict for any
//! string without panicking, including on pathological qualifier and set
//! syntax.

#![no_main]

use fieldcheck::validation::{
    validate_calendar_date, validate_edtf_value, validate_node_created_date_string,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    if let Ok(value) = std::str::from_utf8(data) {
        let _ = validate_edtf_value(value);
        let _ = validate_calendar_date(value);
        let _ = validate_node_created_date_string(value);
    }
});
