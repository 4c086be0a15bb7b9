//! Line-comment processors (`#`, `//`, `--`, `;`, `%`)

use crate::processor::HeaderProcessor;
use crate::style::CommentStyle;

/// Header processor for languages with a single-line comment prefix.
#[derive(Debug, Clone)]
pub struct LineCommentProcessor {
    name: &'static str,
    style: CommentStyle,
}

impl LineCommentProcessor {
    pub const fn new(name: &'static str, prefix: &'static str) -> Self {
        Self {
            name,
            style: CommentStyle::line(prefix),
        }
    }

    pub const fn pound() -> Self {
        Self::new("pound", "#")
    }

    pub const fn slash() -> Self {
        Self::new("slash", "//")
    }

    pub const fn dash() -> Self {
        Self::new("dash", "--")
    }

    pub const fn semicolon() -> Self {
        Self::new("semicolon", ";")
    }

    pub const fn percent() -> Self {
        Self::new("percent", "%")
    }
}

impl HeaderProcessor for LineCommentProcessor {
    fn name(&self) -> &str {
        self.name
    }

    fn style(&self) -> &CommentStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{HeaderBounds, InsertAnchor};
    use crate::fields::FieldMap;
    use pretty_assertions::assert_eq;
    use topmark_filetypes::HeaderPolicy;
    use topmark_fs::{NewlineStyle, split_lines_keepends};

    #[test]
    fn test_render_pound_header() {
        let fields: FieldMap = [("file", "hello.py"), ("license", "MIT")].into_iter().collect();
        let lines = LineCommentProcessor::pound().render_header(&fields, NewlineStyle::Lf, "");
        insta::assert_snapshot!(lines.concat(), @r"
        # topmark:header:start
        # file: hello.py
        # license: MIT
        # topmark:header:end
        ");
    }

    #[test]
    fn test_bounds_of_rendered_header() {
        let processor = LineCommentProcessor::slash();
        let image = split_lines_keepends(
            "// topmark:header:start\n// file: main.rs\n// topmark:header:end\n\nfn main() {}\n",
        );
        assert_eq!(
            processor.header_bounds(&image, NewlineStyle::Lf),
            HeaderBounds::Span { start: 0, end: 3 }
        );
    }

    #[test]
    fn test_end_marker_alone_is_malformed() {
        let processor = LineCommentProcessor::pound();
        let image = split_lines_keepends("x = 1\n# topmark:header:end\n");
        assert!(matches!(
            processor.header_bounds(&image, NewlineStyle::Lf),
            HeaderBounds::Malformed { .. }
        ));
    }

    #[test]
    fn test_unclosed_start_is_malformed() {
        let processor = LineCommentProcessor::pound();
        let image = split_lines_keepends("# topmark:header:start\n# file: a\n");
        assert!(matches!(
            processor.header_bounds(&image, NewlineStyle::Lf),
            HeaderBounds::Malformed { .. }
        ));
    }

    #[test]
    fn test_anchor_skips_shebang_only_when_supported() {
        let processor = LineCommentProcessor::pound();
        let image = split_lines_keepends("#!/bin/sh\necho\n");
        let with = HeaderPolicy {
            supports_shebang: true,
            ..HeaderPolicy::default()
        };
        assert_eq!(processor.insert_anchor(&image, &with), Some(InsertAnchor::Line(1)));
        assert_eq!(
            processor.insert_anchor(&image, &HeaderPolicy::default()),
            Some(InsertAnchor::Line(0))
        );
    }

    #[test]
    fn test_parse_counts_invalid_lines() {
        let processor = LineCommentProcessor::pound();
        let header = split_lines_keepends(
            "# topmark:header:start\n# file: a.py\n# what is this\n#\n# topmark:header:end\n",
        );
        let parsed = processor.parse_fields(&header);
        assert_eq!(parsed.success, 1);
        assert_eq!(parsed.errors, 1);
        assert_eq!(parsed.fields.get("file"), Some("a.py"));
    }
}
