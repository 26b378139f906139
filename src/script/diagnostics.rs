//! Operator-facing notes about skipped rules and conditions.

/// Collects one `#`-prefixed line per skipped rule or condition.
///
/// Notes are always collected; whether they reach the operator is decided
/// by the caller (the `--debug` flag). Each note is also logged at debug
/// level.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    lines: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a note. The `# ` prefix is added here.
    pub fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(note = %message, "Diagnostic");
        self.lines.push(format!("# {message}"));
    }

    /// Recorded lines, each starting with `# `.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All notes joined with trailing newlines, ready for stderr.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}
