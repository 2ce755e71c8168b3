/// Resource limits applied while parsing solver output
///
/// Model lines of large programs can be long, but nesting stays shallow in
/// practice. The depth limit keeps the recursive grammar away from the stack
/// limit on hostile input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum length of a single model line in bytes
    /// Real usage: a few MB for grounded programs with many shown atoms, Limit: 256 MB
    pub max_line_bytes: usize,

    /// Maximum parenthesis nesting depth inside one line
    /// Real usage: ~3 levels, Limit: 100 (30x+)
    pub max_nesting_depth: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_line_bytes: 256 * 1024 * 1024, // 256 MB
            max_nesting_depth: 100,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }
}
