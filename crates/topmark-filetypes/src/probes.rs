//! Content probes and XML prolog helpers used by built-in file types

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::filetype::{InsertCapability, PreInsertInput};

/// Upper bound on bytes a probe may read.
const PROBE_LIMIT: u64 = 64 * 1024;

fn read_head(path: &Path, limit: u64) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).ok()?;
    Some(String::from_utf8_lossy(&buf).into_owned())
}

/// Whether the file starts with a shebang naming one of `interpreters`.
///
/// Matches both `#!/usr/bin/python3` and `#!/usr/bin/env python3`; the
/// interpreter token may carry a version suffix.
pub fn shebang_mentions(path: &Path, interpreters: &[&str]) -> bool {
    let Some(head) = read_head(path, 256) else {
        return false;
    };
    let head = head.strip_prefix('\u{feff}').unwrap_or(&head);
    let Some(first) = head.lines().next() else {
        return false;
    };
    let Some(command) = first.strip_prefix("#!") else {
        return false;
    };
    command.split_whitespace().take(3).any(|token| {
        let program = token.rsplit('/').next().unwrap_or(token);
        interpreters.iter().any(|interp| {
            program
                .strip_prefix(interp)
                .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit() || c == '.'))
        })
    })
}

/// Whether JSON-like text contains `//` or `/* */` comments outside strings.
pub fn json_has_comments(path: &Path) -> bool {
    read_head(path, PROBE_LIMIT).is_some_and(|text| text_has_c_comments(&text))
}

fn text_has_c_comments(text: &str) -> bool {
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '/' if matches!(chars.peek(), Some('/') | Some('*')) => return true,
            _ => {}
        }
    }
    false
}

/// Char offset just past the XML declaration and DOCTYPE, if any.
///
/// When the prolog is followed by a line break the offset lands after
/// it, so a header inserted there starts on its own line. Returns
/// `None` when the text has no prolog at all.
pub fn xml_prolog_end(text: &str) -> Option<usize> {
    let mut cursor = 0;
    let mut found = false;
    loop {
        let rest = &text[cursor..];
        let trimmed = rest.trim_start();
        let skipped = rest.len() - trimmed.len();
        let close = if trimmed.starts_with("<?xml") {
            trimmed.find("?>").map(|idx| idx + 2)
        } else if trimmed
            .get(..9)
            .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"))
        {
            doctype_end(trimmed)
        } else {
            None
        };
        match close {
            Some(end) => {
                cursor += skipped + end;
                found = true;
            }
            None => break,
        }
    }
    if !found {
        return None;
    }
    let rest = &text[cursor..];
    let line_break = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') || rest.starts_with('\r') {
        1
    } else {
        0
    };
    Some(text[..cursor + line_break].chars().count())
}

fn doctype_end(text: &str) -> Option<usize> {
    // Internal subsets may contain '>' inside brackets
    let mut depth = 0usize;
    for (idx, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '>' if depth == 0 => return Some(idx + 1),
            _ => {}
        }
    }
    None
}

/// Pre-insert check for XML-family files.
///
/// Inserting after a prolog that shares its line with markup would
/// split that line; the stripped result could never reproduce the
/// original, so the split is only allowed when reflow is enabled.
pub fn xml_insert_check(input: &PreInsertInput<'_>) -> InsertCapability {
    let text: String = input.lines.concat();
    let Some(offset) = xml_prolog_end(&text) else {
        return InsertCapability::Ok;
    };
    let at_line_start = offset == 0
        || text
            .chars()
            .nth(offset - 1)
            .is_some_and(|c| c == '\n' || c == '\r');
    let at_end = offset >= text.chars().count();
    if at_line_start || at_end || input.allow_reflow {
        InsertCapability::Ok
    } else {
        InsertCapability::SkipIdempotenceRisk {
            reason: "XML prolog shares a line with markup; inserting would reflow it \
                     (enable allow_reflow to permit)"
                .to_string(),
        }
    }
}
