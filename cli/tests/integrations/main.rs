mod parse;
mod read;
mod solve;
