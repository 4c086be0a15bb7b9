//! Markdown processor

use topmark_filetypes::HeaderPolicy;
use topmark_fs::newline::strip_terminator;

use crate::bounds::InsertAnchor;
use crate::processor::HeaderProcessor;
use crate::style::CommentStyle;

/// HTML-comment header placed after any YAML front matter.
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
    style: CommentStyle,
}

impl MarkdownProcessor {
    pub const fn new() -> Self {
        Self {
            style: CommentStyle::wrapped("<!--", "", "-->"),
        }
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderProcessor for MarkdownProcessor {
    fn name(&self) -> &str {
        "markdown"
    }

    fn style(&self) -> &CommentStyle {
        &self.style
    }

    /// Front matter must stay first; an unterminated block has no anchor.
    fn insert_anchor(&self, lines: &[String], _policy: &HeaderPolicy) -> Option<InsertAnchor> {
        let opens = lines
            .first()
            .is_some_and(|line| strip_terminator(line).trim_end() == "---");
        if !opens {
            return Some(InsertAnchor::Line(0));
        }
        lines
            .iter()
            .skip(1)
            .position(|line| matches!(strip_terminator(line).trim_end(), "---" | "..."))
            .map(|idx| InsertAnchor::Line(idx + 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topmark_fs::split_lines_keepends;

    #[test]
    fn test_anchor_after_front_matter() {
        let image = split_lines_keepends("---\ntitle: x\n---\n# Title\n");
        let anchor = MarkdownProcessor::new().insert_anchor(&image, &HeaderPolicy::default());
        assert_eq!(anchor, Some(InsertAnchor::Line(3)));
    }

    #[test]
    fn test_unterminated_front_matter_has_no_anchor() {
        let image = split_lines_keepends("---\ntitle: x\n# Title\n");
        let anchor = MarkdownProcessor::new().insert_anchor(&image, &HeaderPolicy::default());
        assert_eq!(anchor, None);
    }

    #[test]
    fn test_plain_document_anchors_at_top() {
        let image = split_lines_keepends("# Title\n");
        let anchor = MarkdownProcessor::new().insert_anchor(&image, &HeaderPolicy::default());
        assert_eq!(anchor, Some(InsertAnchor::Line(0)));
    }
}
