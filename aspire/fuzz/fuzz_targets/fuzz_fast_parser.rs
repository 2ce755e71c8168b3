#![no_main]

use aspire::parser::fast;
use aspire::ResourceLimits;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = fast::parse_line(line, &ResourceLimits::default());
    }
});
