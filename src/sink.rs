//! Accumulator for the corpus lines produced by a run.

/// Ordered, append-only list of corpus lines
#[derive(Debug, Default, Clone)]
pub struct CorpusSink {
    lines: Vec<String>,
}

impl CorpusSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one serialized corpus line
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Number of lines accumulated
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line has been accumulated
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join the accumulated lines with `\n` (no trailing newline)
    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}
