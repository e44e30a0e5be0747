/// Engine settings that stay fixed across `reset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequiturConfig {
    /// A terminal value that never takes part in a digram, so no rule ever
    /// spans it (for example a line separator).
    pub delimiter: Option<u32>,
}

impl SequiturConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delimiter value.
    pub fn with_delimiter(mut self, delimiter: u32) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}
