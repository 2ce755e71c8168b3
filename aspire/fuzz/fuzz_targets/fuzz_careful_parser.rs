#![no_main]

use aspire::parser::careful;
use aspire::{Answers, ResourceLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = careful::parse_line(line, &ResourceLimits::default());

        // every typed stage runs on top of the grammar parser
        if let Ok(answers) = Answers::from_lines(vec![line.to_string()]).parse_args() {
            let _ = answers.iter().next();
        }
    }
});
