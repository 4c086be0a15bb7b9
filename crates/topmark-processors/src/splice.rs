//! Line-image splicing for header insertion, replacement and removal
//!
//! All functions are pure: they take a newline-preserving line image and
//! return a new one. Blank lines added around an inserted header are
//! "owned" padding; removal takes back at most one owned blank line on
//! each side and never touches other content.

use topmark_fs::NewlineStyle;
use topmark_fs::newline::{is_blank, line_terminator, split_lines_keepends};

/// Blank-line padding a processor may add around an inserted header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    /// Separate the header from non-blank content above it.
    pub blank_before: bool,
    /// Separate the header from non-blank content below it.
    pub blank_after: bool,
}

impl Padding {
    pub const NONE: Self = Self {
        blank_before: false,
        blank_after: false,
    };
}

fn terminate(line: &mut String, newline: NewlineStyle) {
    if line_terminator(line).is_empty() {
        line.push_str(newline.as_str());
    }
}

/// Insert `header` before line `index`.
///
/// Trailing blank lines after the insertion point are dropped when
/// nothing else follows, so a header at end of file never accumulates
/// blank lines.
pub fn insert_at_line(
    lines: &[String],
    index: usize,
    header: &[String],
    newline: NewlineStyle,
    padding: Padding,
) -> Vec<String> {
    let index = index.min(lines.len());
    let mut pre: Vec<String> = lines[..index].to_vec();
    let mut post: &[String] = &lines[index..];
    if post.iter().all(|line| is_blank(line)) {
        post = &[];
    }
    if let Some(last) = pre.last_mut() {
        terminate(last, newline);
    }

    let before = padding.blank_before
        && pre.last().is_some_and(|line| !is_blank(line))
        && post.first().is_none_or(|line| !is_blank(line));
    let after = padding.blank_after && post.first().is_some_and(|line| !is_blank(line));

    let mut out = pre;
    out.reserve(header.len() + post.len() + 2);
    if before {
        out.push(newline.as_str().to_string());
    }
    out.extend_from_slice(header);
    if let Some(last) = out.last_mut() {
        terminate(last, newline);
    }
    if after {
        out.push(newline.as_str().to_string());
    }
    out.extend_from_slice(post);
    out
}

/// Insert `header` at a character offset into the concatenated image.
///
/// If the text before the offset does not end a line, a line break is
/// added so the header starts on a line of its own.
pub fn insert_at_offset(
    lines: &[String],
    offset: usize,
    header: &[String],
    newline: NewlineStyle,
) -> Vec<String> {
    let text: String = lines.concat();
    let split = text
        .char_indices()
        .nth(offset)
        .map_or(text.len(), |(idx, _)| idx);
    let (before, after) = text.split_at(split);

    let mut out = String::with_capacity(text.len() + header.iter().map(String::len).sum::<usize>() + 2);
    out.push_str(before);
    if !before.is_empty() && !before.ends_with('\n') && !before.ends_with('\r') {
        out.push_str(newline.as_str());
    }
    for line in header {
        out.push_str(line);
    }
    if !out.ends_with('\n') && !out.ends_with('\r') {
        out.push_str(newline.as_str());
    }
    out.push_str(after);
    split_lines_keepends(&out)
}

/// Replace lines `start..end` with `header`.
pub fn replace_span(lines: &[String], start: usize, end: usize, header: &[String]) -> Vec<String> {
    let end = end.min(lines.len());
    let start = start.min(end);
    let mut out = Vec::with_capacity(lines.len() - (end - start) + header.len());
    out.extend_from_slice(&lines[..start]);
    out.extend_from_slice(header);
    out.extend_from_slice(&lines[end..]);
    out
}

/// Remove lines `start..end`, taking back owned padding when `padded`.
///
/// A blank line directly above the header is owned padding, and so is a
/// blank line directly below it when there was blank padding above or
/// the header started the file.
pub fn remove_span(lines: &[String], start: usize, end: usize, padded: bool) -> Vec<String> {
    let end = end.min(lines.len());
    let start = start.min(end);
    let mut head = start;
    let mut tail = end;
    if padded {
        let blank_above = start > 0 && is_blank(&lines[start - 1]);
        if blank_above {
            head -= 1;
        }
        if (blank_above || start == 0) && lines.get(end).is_some_and(|line| is_blank(line)) {
            tail += 1;
        }
    }
    let mut out = Vec::with_capacity(lines.len() - (tail - head));
    out.extend_from_slice(&lines[..head]);
    out.extend_from_slice(&lines[tail..]);
    out
}
