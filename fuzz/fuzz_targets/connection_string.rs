#![no_main]

use libfuzzer_sys::fuzz_target;
use servfor_di::{ConnectionInfo, DiError};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    match ConnectionInfo::parse(text) {
        Ok(info) => {
            assert!(!info.data_source.is_empty());
            if info.password.is_some() {
                assert!(format!("{info:?}").contains("\"***\""));
            }
        }
        Err(DiError::InvalidConnectionString(_)) => {}
        Err(other) => panic!("unexpected error: {other:?}"),
    }
});
