#![no_main]

use aspire::parser::arguments::{parse_argument, ArgOptions};
use aspire::ResourceLimits;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let limits = ResourceLimits::default();
        let _ = parse_argument(text, ArgOptions::default(), &limits);
        let _ = parse_argument(text, ArgOptions::integers_unparsed(), &limits);
    }
});
