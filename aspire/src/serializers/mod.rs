//! Exporting answers
//!
//! [`text`] is the solver's own output format and can be loaded back;
//! [`json`] is for other tools.

pub mod json;
pub mod text;

pub use json::{to_json, to_json_pretty, write_json_lines};
pub use text::{load, read_answer_sets, save, write_answer_set, write_answers};
