//! Indentation-aware writer for MapServer mapfile blocks.

use std::fmt::{self, Display};

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct MapfileWriter {
    text: String,
    depth: usize,
}

impl MapfileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer whose first level is already indented `depth` times, for stanzas that are
    /// spliced into a larger file.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            text: String::new(),
            depth,
        }
    }

    pub fn line(&mut self, line: impl Display) {
        for _ in 0..self.depth {
            self.text.push_str(INDENT);
        }
        self.text.push_str(&line.to_string());
        self.text.push('\n');
    }

    /// `KEYWORD value`
    pub fn entry(&mut self, keyword: &str, value: impl Display) {
        self.line(format_args!("{keyword} {value}"));
    }

    /// `KEYWORD "value"`
    pub fn quoted(&mut self, keyword: &str, value: impl Display) {
        self.line(format_args!("{keyword} \"{value}\""));
    }

    /// `KEYWORD ... END`, with the content written by `body`.
    pub fn block(&mut self, keyword: &str, body: impl FnOnce(&mut Self)) {
        self.line(keyword);
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line("END");
    }

    /// Splice already rendered text, re-indented to the current depth.
    pub fn raw(&mut self, text: &str) {
        for line in text.lines() {
            if line.trim().is_empty() {
                self.text.push('\n');
            } else {
                self.line(line);
            }
        }
    }

    pub fn blank(&mut self) {
        self.text.push('\n');
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl Display for MapfileWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Quote a string for a single-quoted mapfile value.
pub fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "\\'"))
}
