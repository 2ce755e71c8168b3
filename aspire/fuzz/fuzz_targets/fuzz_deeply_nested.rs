#![no_main]

use aspire::parser::{careful, fast};
use aspire::ResourceLimits;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|depth: u8| {
    let depth = depth as usize;
    let line = format!("p({}x{}).", "f(".repeat(depth), ")".repeat(depth));
    let limits = ResourceLimits::default();

    let _ = fast::parse_line(&line, &limits);
    let _ = careful::parse_line(&line, &limits);
});
