mod fast_parsing;


// Solver output tests
mod framing;
