#![no_main]

use aspire::{Answers, Framing};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let answers = Answers::from_reader(std::io::Cursor::new(data.to_vec()), Framing::Solver);
    for model in answers.iter().take(64) {
        let _ = model;
    }
});
