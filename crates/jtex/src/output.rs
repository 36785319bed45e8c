//! The output line buffer

/// Splits a string on `\r\n` and `\n` line breaks.
///
/// A string without line breaks is returned as a single element.
pub fn split_line_breaks(s: &str) -> Vec<&str> {
    s.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Line oriented output sink.
///
/// Most output is appended to the current line.
/// Some constructs, like package imports and math blocks, start new lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl Default for LineBuffer {
    fn default() -> Self {
        LineBuffer::new()
    }
}

impl LineBuffer {
    pub fn new() -> LineBuffer {
        LineBuffer {
            lines: vec![String::new()],
        }
    }

    /// Appends to the current line.
    pub fn append(&mut self, s: &str) {
        if let Some(line) = self.lines.last_mut() {
            line.push_str(s);
        }
    }

    /// Starts a new line with the given content.
    pub fn append_new_line(&mut self, s: &str) {
        self.lines.push(s.to_string());
    }

    /// Appends the first element to the current line and every other element as a new line.
    pub fn append_many<S: AsRef<str>>(&mut self, lines: &[S]) {
        let mut iter = lines.iter();
        if let Some(first) = iter.next() {
            self.append(first.as_ref());
        }
        for line in iter {
            self.append_new_line(line.as_ref());
        }
    }

    /// Appends every element as a new line.
    pub fn append_many_new_line<S: AsRef<str>>(&mut self, lines: &[S]) {
        for line in lines {
            self.append_new_line(line.as_ref());
        }
    }

    /// Appends text that may contain line breaks.
    pub fn append_text(&mut self, s: &str) {
        self.append_many(&split_line_breaks(s));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn join(&self, line_break: &str) -> String {
        self.lines.join(line_break)
    }
}

impl std::fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.join("\n"))
    }
}
