//! Fuzz target: `Command::parse`
//!
//! Drives arbitrary byte sequences through the command interpreter and
//! asserts that it never panics and that unrecognized payloads are
//! echoed back verbatim.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use blehub::commands::Command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match Command::parse(data) {
        Command::Unrecognized(raw) => assert_eq!(raw, data),
        recognized => {
            // Only the four exact verbs may parse as recognized.
            assert_eq!(recognized.as_str().map(str::as_bytes), Some(data));
        }
    }
});
