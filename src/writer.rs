//! Indented source text builder for the emitters.

use std::fmt::Write;

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct Writer {
    out: String,
    depth: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// One line at the current depth. Empty lines carry no indentation.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Line then one level deeper; `text` normally ends with `{`.
    pub fn open(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.line(text);
        self.depth += 1;
        self
    }

    /// One level shallower then line.
    pub fn close(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(text)
    }

    /// Doc comment lines with `marker` (`///` or `//!`); nothing for empty text.
    pub fn doc(&mut self, marker: &str, text: &str) -> &mut Self {
        for l in text.lines() {
            let l = l.trim_end();
            if l.is_empty() {
                self.line(marker);
            } else {
                let mut s = String::with_capacity(marker.len() + 1 + l.len());
                let _ = write!(s, "{} {}", marker, l);
                self.line(s);
            }
        }
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}
