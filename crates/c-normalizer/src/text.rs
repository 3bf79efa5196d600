use std::{
    fmt::{Display, Formatter},
    ops::RangeInclusive,
};

/// Inclusive source range with 1-based lines and 1-based byte columns.
///
/// `end_col` addresses the last byte of the last token, so a single-character
/// token has `start_col == end_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Extent {
    pub fn new(
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
    ) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    pub fn lines(&self) -> RangeInclusive<u32> {
        self.start_line..=self.end_line
    }

    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }

    /// Whether `other` lies entirely within this extent.
    pub fn contains(
        &self,
        other: &Extent,
    ) -> bool {
        (self.start_line, self.start_col) <= (other.start_line, other.start_col)
            && (other.end_line, other.end_col) <= (self.end_line, self.end_col)
    }
}

/// Source file held as lines so edits never shift line numbers.
///
/// Splitting is done on `\n` only and rendering joins with `\n`, so a
/// trailing newline survives as a final empty line and `render(parse(s)) == s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line by 1-based number.
    pub fn line(
        &self,
        line: u32,
    ) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        self.lines.get(idx).map(String::as_str)
    }

    /// Replace a line's content with the empty string. Out-of-range lines are ignored.
    pub fn blank_line(
        &mut self,
        line: u32,
    ) {
        if let Some(idx) = (line as usize).checked_sub(1)
            && let Some(content) = self.lines.get_mut(idx)
        {
            content.clear();
        }
    }

    pub fn blank_extent(
        &mut self,
        extent: &Extent,
    ) {
        for line in extent.lines() {
            self.blank_line(line);
        }
    }

    /// Delete the inclusive byte-column range `start_col..=end_col` on `line`.
    ///
    /// Returns `false` without editing when the range is out of bounds or
    /// does not fall on character boundaries.
    pub fn remove_columns(
        &mut self,
        line: u32,
        start_col: u32,
        end_col: u32,
    ) -> bool {
        let Some(idx) = (line as usize).checked_sub(1) else {
            return false;
        };
        let Some(content) = self.lines.get_mut(idx) else {
            return false;
        };
        let Some(start) = (start_col as usize).checked_sub(1) else {
            return false;
        };
        let end = end_col as usize;
        if start > end || end > content.len() || !content.is_char_boundary(start) || !content.is_char_boundary(end) {
            return false;
        }
        content.replace_range(start..end, "");
        true
    }

    /// Text covered by `extent`, lines joined with `\n`.
    pub fn slice(
        &self,
        extent: &Extent,
    ) -> Option<String> {
        let first = (extent.start_line as usize).checked_sub(1)?;
        let last = (extent.end_line as usize).checked_sub(1)?;
        if last < first || last >= self.lines.len() {
            return None;
        }
        let start = (extent.start_col as usize).checked_sub(1)?;
        let end = extent.end_col as usize;

        if first == last {
            return self.lines[first].get(start..end).map(str::to_owned);
        }

        let mut out = String::new();
        out.push_str(self.lines[first].get(start..)?);
        for line in &self.lines[first + 1..last] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        out.push_str(self.lines[last].get(..end)?);
        Some(out)
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl Display for SourceText {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
#[path = "../tests/src/text_tests.rs"]
mod tests;
