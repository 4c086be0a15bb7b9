//! C-style block-comment processor

use crate::processor::HeaderProcessor;
use crate::style::CommentStyle;

/// Wraps the header in a single `/* ... */` comment.
#[derive(Debug, Clone)]
pub struct BlockCommentProcessor {
    style: CommentStyle,
}

impl BlockCommentProcessor {
    pub const fn new() -> Self {
        Self {
            style: CommentStyle::wrapped("/*", " *", " */"),
        }
    }
}

impl Default for BlockCommentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderProcessor for BlockCommentProcessor {
    fn name(&self) -> &str {
        "cblock"
    }

    fn style(&self) -> &CommentStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::HeaderBounds;
    use crate::fields::FieldMap;
    use pretty_assertions::assert_eq;
    use topmark_fs::{NewlineStyle, split_lines_keepends};

    #[test]
    fn test_render_block_header() {
        let fields: FieldMap = [("file", "site.css")].into_iter().collect();
        let lines = BlockCommentProcessor::new().render_header(&fields, NewlineStyle::Lf, "");
        insta::assert_snapshot!(lines.concat(), @r"
        /*
         * topmark:header:start
         * file: site.css
         * topmark:header:end
         */
        ");
    }

    #[test]
    fn test_span_includes_delimiters() {
        let processor = BlockCommentProcessor::new();
        let image = split_lines_keepends(
            "/*\n * topmark:header:start\n * file: a.css\n * topmark:header:end\n */\nbody {}\n",
        );
        assert_eq!(
            processor.header_bounds(&image, NewlineStyle::Lf),
            HeaderBounds::Span { start: 0, end: 5 }
        );
        let parsed = processor.parse_fields(&image[0..5]);
        assert_eq!(parsed.errors, 0);
        assert_eq!(parsed.fields.get("file"), Some("a.css"));
    }

    #[test]
    fn test_markers_outside_comment_are_malformed() {
        let processor = BlockCommentProcessor::new();
        let image = split_lines_keepends(" * topmark:header:start\n * topmark:header:end\n");
        assert!(matches!(
            processor.header_bounds(&image, NewlineStyle::Lf),
            HeaderBounds::Malformed { .. }
        ));
    }

    #[test]
    fn test_strip_removes_only_the_block() {
        let processor = BlockCommentProcessor::new();
        let image = split_lines_keepends(
            "/*\n * topmark:header:start\n * topmark:header:end\n */\n\nbody {}\n",
        );
        let stripped = processor.remove_header(&image, 0, 4);
        assert_eq!(stripped.concat(), "\nbody {}\n");
    }
}
