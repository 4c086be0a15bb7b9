//! The header processor trait

use std::fmt;

use topmark_filetypes::HeaderPolicy;
use topmark_fs::NewlineStyle;
use topmark_fs::newline::strip_terminator;

use crate::bounds::{HeaderBounds, InsertAnchor};
use crate::fields::{FieldMap, ParsedFields};
use crate::splice::{self, Padding};
use crate::style::{CommentStyle, END_MARKER, LineKind, START_MARKER};

/// Comment-syntax strategy for one family of file types.
///
/// Only [`HeaderProcessor::name`] and [`HeaderProcessor::style`] are
/// required; everything else has a default driven by the style.
/// Processors are stateless and shared across file types and threads.
pub trait HeaderProcessor: Send + Sync + fmt::Debug {
    /// Stable identifier (`pound`, `cblock`, `xml`, ...).
    fn name(&self) -> &str;

    fn style(&self) -> &CommentStyle;

    /// Locate the header in a BOM-stripped image.
    ///
    /// The first start marker opens the header and the next end marker
    /// closes it. An end marker with no start, a second start before the
    /// end, or a start with no end is malformed. Wrapped styles must have
    /// their block opener directly above the start marker and their
    /// closer directly below the end marker; both lines are part of the
    /// span.
    fn header_bounds(&self, lines: &[String], _newline: NewlineStyle) -> HeaderBounds {
        let style = self.style();
        let mut start = None;
        for (idx, line) in lines.iter().enumerate() {
            if style.is_marker(line, START_MARKER) {
                if start.is_some() {
                    return HeaderBounds::malformed(format!(
                        "second start marker on line {} before an end marker",
                        idx + 1
                    ));
                }
                start = Some(idx);
            } else if style.is_marker(line, END_MARKER) {
                let Some(open) = start else {
                    return HeaderBounds::malformed(format!(
                        "end marker on line {} without a start marker",
                        idx + 1
                    ));
                };
                return wrap_span(style, lines, open, idx + 1);
            }
        }
        match start {
            Some(open) => HeaderBounds::malformed(format!(
                "start marker on line {} without an end marker",
                open + 1
            )),
            None => HeaderBounds::None,
        }
    }

    /// Parse the fields of a header span, counting good and bad lines.
    fn parse_fields(&self, header_lines: &[String]) -> ParsedFields {
        let mut parsed = ParsedFields::default();
        for line in header_lines {
            match self.style().classify(line) {
                LineKind::Field { key, value } => {
                    parsed.fields.insert(key, value);
                    parsed.success += 1;
                }
                LineKind::Invalid | LineKind::Foreign => parsed.errors += 1,
                LineKind::StartMarker | LineKind::EndMarker | LineKind::Wrapper | LineKind::Blank => {}
            }
        }
        parsed
    }

    /// Render a complete header block, one terminated line per entry.
    fn render_header(&self, fields: &FieldMap, newline: NewlineStyle, indent: &str) -> Vec<String> {
        let style = self.style();
        let mut lines = Vec::with_capacity(fields.len() + 4);
        if let Some(open) = style.block_start {
            lines.push(format!("{indent}{open}{}", newline.as_str()));
        }
        lines.push(style.render_line(indent, START_MARKER, newline));
        for (key, value) in fields.iter() {
            let content = if value.is_empty() {
                format!("{key}:")
            } else {
                format!("{key}: {value}")
            };
            lines.push(style.render_line(indent, &content, newline));
        }
        lines.push(style.render_line(indent, END_MARKER, newline));
        if let Some(close) = style.block_end {
            lines.push(format!("{indent}{close}{}", newline.as_str()));
        }
        lines
    }

    /// Where a new header goes. `None` when no valid position exists.
    ///
    /// The default keeps a shebang and then an encoding declaration above
    /// the header, as the file type's policy allows.
    fn insert_anchor(&self, lines: &[String], policy: &HeaderPolicy) -> Option<InsertAnchor> {
        let mut index = 0;
        if policy.supports_shebang && lines.first().is_some_and(|line| line.starts_with("#!")) {
            index = 1;
        }
        if let Some(encoding) = &policy.encoding_line {
            if lines.get(index).is_some_and(|line| encoding.is_match(strip_terminator(line))) {
                index += 1;
            }
        }
        Some(InsertAnchor::Line(index))
    }

    /// Blank-line padding this processor adds around inserted headers.
    fn padding(&self, policy: &HeaderPolicy) -> Padding {
        if self.style().is_wrapped() {
            Padding::NONE
        } else {
            Padding {
                blank_before: true,
                blank_after: policy.blank_line_after_header,
            }
        }
    }

    /// Insert rendered header lines at `anchor`.
    fn insert_header(
        &self,
        lines: &[String],
        anchor: InsertAnchor,
        header: &[String],
        newline: NewlineStyle,
        policy: &HeaderPolicy,
    ) -> Vec<String> {
        match anchor {
            InsertAnchor::Line(index) => {
                splice::insert_at_line(lines, index, header, newline, self.padding(policy))
            }
            InsertAnchor::Offset(offset) => splice::insert_at_offset(lines, offset, header, newline),
        }
    }

    /// Remove the header span and the padding this processor owns.
    fn remove_header(&self, lines: &[String], start: usize, end: usize) -> Vec<String> {
        splice::remove_span(lines, start, end, !self.style().is_wrapped())
    }
}

fn wrap_span(style: &CommentStyle, lines: &[String], start: usize, end: usize) -> HeaderBounds {
    let (Some(open), Some(close)) = (style.block_start, style.block_end) else {
        return HeaderBounds::Span { start, end };
    };
    let opened = start > 0 && strip_terminator(&lines[start - 1]).trim() == open.trim();
    let closed = lines
        .get(end)
        .is_some_and(|line| strip_terminator(line).trim() == close.trim());
    if opened && closed {
        HeaderBounds::Span {
            start: start - 1,
            end: end + 1,
        }
    } else {
        HeaderBounds::malformed(format!(
            "header markers are not enclosed in a {open} ... {} comment",
            close.trim()
        ))
    }
}

/// Leading whitespace of `line`.
pub fn indent_of(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}
