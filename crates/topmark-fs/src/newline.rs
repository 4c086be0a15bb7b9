//! Newline styles, streaming newline histograms and line splitting

use serde::{Deserialize, Serialize};

/// A line terminator convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewlineStyle {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl NewlineStyle {
    /// The literal terminator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// A short human-readable label (`LF`, `CRLF`, `CR`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lf => "LF",
            Self::CrLf => "CRLF",
            Self::Cr => "CR",
        }
    }
}

impl std::fmt::Display for NewlineStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw counts of each newline style seen in a byte stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NewlineHistogram {
    pub lf: usize,
    pub crlf: usize,
    pub cr: usize,
}

impl NewlineHistogram {
    /// Count newline styles in a complete text.
    pub fn of_text(text: &str) -> Self {
        let mut counter = NewlineCounter::new();
        counter.feed(text.as_bytes());
        counter.finish()
    }

    /// Number of distinct styles with a non-zero count.
    pub fn distinct_styles(&self) -> usize {
        [self.lf, self.crlf, self.cr]
            .iter()
            .filter(|count| **count > 0)
            .count()
    }

    /// Whether two or more styles were observed.
    pub fn is_mixed(&self) -> bool {
        self.distinct_styles() >= 2
    }

    /// Total number of terminators.
    pub fn total(&self) -> usize {
        self.lf + self.crlf + self.cr
    }

    /// The most frequent style; LF when nothing was observed.
    ///
    /// Ties resolve in the order LF, CRLF, CR.
    pub fn dominant(&self) -> NewlineStyle {
        let mut best = (NewlineStyle::Lf, self.lf);
        for candidate in [(NewlineStyle::CrLf, self.crlf), (NewlineStyle::Cr, self.cr)] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        best.0
    }
}

/// Incremental newline counter that survives CR/LF pairs split across
/// chunk boundaries.
///
/// A trailing `\r` is held back as "pending" until the next chunk (or
/// [`NewlineCounter::finish`]) reveals whether it starts a CRLF pair.
#[derive(Debug, Clone, Default)]
pub struct NewlineCounter {
    histogram: NewlineHistogram,
    pending_cr: bool,
}

impl NewlineCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of bytes.
    pub fn feed(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            match (self.pending_cr, byte) {
                (true, b'\n') => {
                    self.histogram.crlf += 1;
                    self.pending_cr = false;
                }
                (true, b'\r') => {
                    self.histogram.cr += 1;
                }
                (true, _) => {
                    self.histogram.cr += 1;
                    self.pending_cr = false;
                }
                (false, b'\r') => self.pending_cr = true,
                (false, b'\n') => self.histogram.lf += 1,
                (false, _) => {}
            }
        }
    }

    /// Counts observed so far, without settling a pending CR.
    pub fn snapshot(&self) -> NewlineHistogram {
        self.histogram
    }

    /// Settle any pending CR and return the final histogram.
    pub fn finish(mut self) -> NewlineHistogram {
        if self.pending_cr {
            self.histogram.cr += 1;
            self.pending_cr = false;
        }
        self.histogram
    }
}

/// Split text into lines that keep their original terminators.
///
/// Recognizes `\r\n`, `\n` and lone `\r`. The final line has no
/// terminator when the text does not end with one; an empty text yields
/// no lines.
pub fn split_lines_keepends(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\n' => {
                lines.push(text[start..=idx].to_string());
                start = idx + 1;
            }
            b'\r' => {
                let end = if bytes.get(idx + 1) == Some(&b'\n') {
                    idx + 1
                } else {
                    idx
                };
                lines.push(text[start..=end].to_string());
                idx = end;
                start = end + 1;
            }
            _ => {}
        }
        idx += 1;
    }
    if start < bytes.len() {
        lines.push(text[start..].to_string());
    }
    lines
}

/// The terminator at the end of `line`, or `""`.
pub fn line_terminator(line: &str) -> &str {
    if line.ends_with("\r\n") {
        &line[line.len() - 2..]
    } else if line.ends_with('\n') || line.ends_with('\r') {
        &line[line.len() - 1..]
    } else {
        ""
    }
}

/// `line` without its terminator.
pub fn strip_terminator(line: &str) -> &str {
    &line[..line.len() - line_terminator(line).len()]
}

/// Whether a line holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_preserves_terminators() {
        let lines = split_lines_keepends("a\r\nb\nc\rd");
        assert_eq!(lines, vec!["a\r\n", "b\n", "c\r", "d"]);
    }

    #[test]
    fn test_split_empty_text_yields_no_lines() {
        assert!(split_lines_keepends("").is_empty());
    }

    #[test]
    fn test_counter_handles_crlf_split_across_chunks() {
        let mut counter = NewlineCounter::new();
        counter.feed(b"one\r");
        counter.feed(b"\ntwo\r\n");
        let histogram = counter.finish();
        assert_eq!(histogram.crlf, 2);
        assert_eq!(histogram.cr, 0);
        assert_eq!(histogram.lf, 0);
    }

    #[test]
    fn test_counter_settles_trailing_cr() {
        let mut counter = NewlineCounter::new();
        counter.feed(b"a\r");
        assert_eq!(counter.snapshot().cr, 0);
        assert_eq!(counter.finish().cr, 1);
    }

    #[test]
    fn test_consecutive_crs_count_separately() {
        let histogram = NewlineHistogram::of_text("a\r\r\nb");
        assert_eq!(histogram.cr, 1);
        assert_eq!(histogram.crlf, 1);
        assert!(histogram.is_mixed());
    }

    #[test]
    fn test_dominant_defaults_to_lf() {
        assert_eq!(NewlineHistogram::default().dominant(), NewlineStyle::Lf);
        let histogram = NewlineHistogram {
            lf: 1,
            crlf: 3,
            cr: 0,
        };
        assert_eq!(histogram.dominant(), NewlineStyle::CrLf);
    }

    #[test]
    fn test_terminator_helpers() {
        assert_eq!(line_terminator("x\r\n"), "\r\n");
        assert_eq!(strip_terminator("x\r\n"), "x");
        assert_eq!(strip_terminator("x"), "x");
        assert!(is_blank("  \t\n"));
    }
}
