//! Raw page text to ordered non-blank lines

/// Non-blank lines of one page, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLines {
    lines: Vec<String>,
}

impl PageLines {
    /// Split raw OCR text into lines, dropping whitespace-only ones.
    ///
    /// Lines are kept as printed (no trimming) so markers and column
    /// spacing survive for the format strategies.
    pub fn from_raw(raw: &str) -> Self {
        let lines = raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        PageLines { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    /// Index of the first line containing `marker`.
    pub fn position_of(&self, marker: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.contains(marker))
    }
}
