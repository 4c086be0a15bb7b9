//! Comment syntax and header line classification

use topmark_fs::NewlineStyle;
use topmark_fs::newline::strip_terminator;

/// Content of the line that opens a header.
pub const START_MARKER: &str = "topmark:header:start";
/// Content of the line that closes a header.
pub const END_MARKER: &str = "topmark:header:end";

/// Comment syntax used to wrap header lines.
///
/// Line-comment styles only set `line_prefix` (and occasionally
/// `line_suffix`). Wrapped styles put the header inside one comment
/// block, opened by `block_start` and closed by `block_end` on lines of
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentStyle {
    pub block_start: Option<&'static str>,
    pub line_prefix: &'static str,
    pub line_suffix: &'static str,
    pub block_end: Option<&'static str>,
}

/// What a single line inside (or around) a header is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    StartMarker,
    EndMarker,
    /// The comment block opener or closer of a wrapped style.
    Wrapper,
    /// A comment line with no content.
    Blank,
    Field { key: String, value: String },
    /// A comment line whose content is not a field.
    Invalid,
    /// Not a comment line of this style.
    Foreign,
}

impl CommentStyle {
    pub const fn line(prefix: &'static str) -> Self {
        Self {
            block_start: None,
            line_prefix: prefix,
            line_suffix: "",
            block_end: None,
        }
    }

    pub const fn wrapped(
        block_start: &'static str,
        line_prefix: &'static str,
        block_end: &'static str,
    ) -> Self {
        Self {
            block_start: Some(block_start),
            line_prefix,
            line_suffix: "",
            block_end: Some(block_end),
        }
    }

    pub fn is_wrapped(&self) -> bool {
        self.block_start.is_some()
    }

    /// Comment content of `line`, or `None` if it is not a comment line
    /// of this style.
    pub fn content<'a>(&self, line: &'a str) -> Option<&'a str> {
        let mut text = strip_terminator(line).trim();
        let prefix = self.line_prefix.trim();
        if !prefix.is_empty() {
            text = text.strip_prefix(prefix)?;
        }
        let suffix = self.line_suffix.trim();
        if !suffix.is_empty() {
            text = text.trim_end().strip_suffix(suffix)?;
        }
        Some(text.trim())
    }

    fn is_wrapper(&self, line: &str) -> bool {
        let text = strip_terminator(line).trim();
        self.block_start.is_some_and(|open| text == open.trim())
            || self.block_end.is_some_and(|close| text == close.trim())
    }

    /// Whether `line` is the marker `marker` in this style.
    pub fn is_marker(&self, line: &str, marker: &str) -> bool {
        self.content(line) == Some(marker)
    }

    /// Classify one line of a header span.
    pub fn classify(&self, line: &str) -> LineKind {
        if self.is_wrapper(line) {
            return LineKind::Wrapper;
        }
        let Some(content) = self.content(line) else {
            return LineKind::Foreign;
        };
        match content {
            START_MARKER => LineKind::StartMarker,
            END_MARKER => LineKind::EndMarker,
            "" => LineKind::Blank,
            _ => parse_field(content).unwrap_or(LineKind::Invalid),
        }
    }

    /// Render one comment line with the given content.
    pub fn render_line(&self, indent: &str, content: &str, newline: NewlineStyle) -> String {
        let mut line = String::from(indent);
        if self.line_prefix.is_empty() {
            line.push_str(content);
        } else {
            line.push_str(self.line_prefix);
            if !content.is_empty() {
                line.push(' ');
                line.push_str(content);
            }
        }
        if !self.line_suffix.is_empty() {
            line.push(' ');
            line.push_str(self.line_suffix);
        }
        line.push_str(newline.as_str());
        line
    }
}

fn parse_field(content: &str) -> Option<LineKind> {
    let (key, value) = content.split_once(':')?;
    let key = key.trim();
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    valid_key.then(|| LineKind::Field {
        key: key.to_string(),
        value: value.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const POUND: CommentStyle = CommentStyle::line("#");
    const CBLOCK: CommentStyle = CommentStyle::wrapped("/*", " *", " */");

    #[rstest]
    #[case("# topmark:header:start\n", LineKind::StartMarker)]
    #[case("  #   topmark:header:end\r\n", LineKind::EndMarker)]
    #[case("#\n", LineKind::Blank)]
    #[case("# file: a.py\n", LineKind::Field { key: "file".into(), value: "a.py".into() })]
    #[case("# not a field\n", LineKind::Invalid)]
    #[case("print('x')\n", LineKind::Foreign)]
    fn test_pound_classification(#[case] line: &str, #[case] expected: LineKind) {
        assert_eq!(POUND.classify(line), expected);
    }

    #[rstest]
    #[case("/*\n", LineKind::Wrapper)]
    #[case(" */\n", LineKind::Wrapper)]
    #[case(" * topmark:header:start\n", LineKind::StartMarker)]
    #[case(" * file: site.css\n", LineKind::Field { key: "file".into(), value: "site.css".into() })]
    fn test_block_classification(#[case] line: &str, #[case] expected: LineKind) {
        assert_eq!(CBLOCK.classify(line), expected);
    }

    #[test]
    fn test_render_line_keeps_indent_and_newline() {
        let line = POUND.render_line("    ", "file: a.py", NewlineStyle::CrLf);
        assert_eq!(line, "    # file: a.py\r\n");
    }

    #[test]
    fn test_url_value_keeps_colons() {
        assert_eq!(
            POUND.classify("# homepage: https://example.com\n"),
            LineKind::Field {
                key: "homepage".into(),
                value: "https://example.com".into()
            }
        );
    }
}
