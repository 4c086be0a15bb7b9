//! Existing header detection

use topmark_processors::HeaderBounds;
use topmark_processors::processor::indent_of;

use crate::context::{HintContext, ProcessingContext, StepContext};
use crate::status::{Axis, ContentStatus, HeaderStatus};
use crate::steps::Step;
use crate::views::HeaderView;

/// Locates the header span through the processor and parses its fields.
///
/// Structurally broken markers halt the file. Field-level parse errors do
/// not: later steps decide what a partially parsed header means.
#[derive(Debug, Default)]
pub struct ScannerStep;

impl Step for ScannerStep {
    fn name(&self) -> &'static str {
        "scanner"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Header]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        ctx.status().content == ContentStatus::Ok && ctx.processor().is_some()
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        let Some(processor) = ctx.processor().cloned() else {
            return;
        };
        let lines = ctx.views().image_lines();
        let (start, end) = match processor.header_bounds(lines, ctx.facts().newline) {
            HeaderBounds::None => {
                ctx.set_status(HeaderStatus::Missing);
                return;
            }
            HeaderBounds::Malformed { reason } => {
                ctx.set_status(HeaderStatus::Malformed);
                ctx.warn(format!("malformed header: {reason}"));
                ctx.request_halt("malformed header");
                return;
            }
            HeaderBounds::Span { start, end } => (start, end),
        };

        let Some(header_lines) = lines.get(start..end).map(<[String]>::to_vec) else {
            let total = lines.len();
            ctx.set_status(HeaderStatus::Malformed);
            ctx.error(format!(
                "processor {} reported header lines {start}..{end} outside a {total}-line file",
                processor.name()
            ));
            ctx.request_halt("malformed header");
            return;
        };
        let parsed = processor.parse_fields(&header_lines);
        let view = HeaderView {
            start,
            end,
            block: header_lines.concat(),
            indent: header_lines
                .first()
                .map(|line| indent_of(line).to_string())
                .unwrap_or_default(),
            lines: header_lines,
            fields: parsed.fields,
            success: parsed.success,
            errors: parsed.errors,
        };

        let status = match (view.errors, view.success) {
            (0, _) if view.fields.is_empty() => HeaderStatus::Empty,
            (0, _) => HeaderStatus::Detected,
            (_, 0) => HeaderStatus::MalformedAllFields,
            _ => HeaderStatus::MalformedSomeFields,
        };
        if status.is_malformed() {
            ctx.warn(format!(
                "{} of {} header field lines could not be parsed",
                view.errors,
                view.errors + view.success
            ));
        }
        tracing::debug!(path = %ctx.path(), start, end, status = %status, "Scanned header");
        ctx.views_mut().header = Some(view);
        ctx.set_status(status);
    }

    fn hint(&self, ctx: &mut HintContext<'_>) {
        match ctx.status().header {
            HeaderStatus::Missing => {
                ctx.hint(Axis::Header, "no_header", "the file has no header yet")
            }
            HeaderStatus::MalformedSomeFields | HeaderStatus::MalformedAllFields => ctx.hint(
                Axis::Header,
                "unparsable_fields",
                "fix or remove the unparsable header lines; the header is left as is",
            ),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::StepContext;
    use crate::status::ContentStatus;
    use crate::steps::ReaderStep;
    use std::sync::Arc;
    use topmark_fs::NewlineStyle;
    use topmark_processors::{CommentStyle, HeaderProcessor, LineCommentProcessor};

    #[derive(Debug)]
    struct OverreachingProcessor {
        style: CommentStyle,
    }

    impl HeaderProcessor for OverreachingProcessor {
        fn name(&self) -> &str {
            "overreaching"
        }

        fn style(&self) -> &CommentStyle {
            &self.style
        }

        fn header_bounds(&self, lines: &[String], _newline: NewlineStyle) -> HeaderBounds {
            HeaderBounds::Span {
                start: 1,
                end: lines.len() + 3,
            }
        }
    }

    fn scan(content: &str) -> ProcessingContext {
        scan_with(content, Arc::new(LineCommentProcessor::pound()))
    }

    fn scan_with(content: &str, processor: Arc<dyn HeaderProcessor>) -> ProcessingContext {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.py");
        std::fs::write(&path, content).unwrap();
        let mut ctx = ProcessingContext::bootstrap(path.as_path(), Arc::new(Config::default()));
        {
            let mut step = StepContext::new(&mut ctx, "resolver", &[Axis::Resolve]);
            step.set_resolution(
                Arc::new(topmark_filetypes::FileType::new("python", "Python")),
                Some(processor),
            );
        }
        let reader = ReaderStep;
        reader.run(&mut StepContext::new(&mut ctx, reader.name(), reader.axes_written()));
        assert_eq!(ctx.status().content, ContentStatus::Ok);
        let scanner = ScannerStep;
        scanner.run(&mut StepContext::new(&mut ctx, scanner.name(), scanner.axes_written()));
        ctx
    }

    #[test]
    fn test_missing_header() {
        let ctx = scan("import os\n");
        assert_eq!(ctx.status().header, HeaderStatus::Missing);
        assert!(ctx.views().header.is_none());
    }

    #[test]
    fn test_detected_header() {
        let ctx = scan(
            "#!/bin/sh\n\n# topmark:header:start\n# file: a.py\n# topmark:header:end\n\nx = 1\n",
        );
        assert_eq!(ctx.status().header, HeaderStatus::Detected);
        let view = ctx.views().header.as_ref().unwrap();
        assert_eq!((view.start, view.end), (2, 5));
        assert_eq!(view.fields.get("file"), Some("a.py"));
    }

    #[test]
    fn test_markers_only_is_empty() {
        let ctx = scan("# topmark:header:start\n# topmark:header:end\n");
        assert_eq!(ctx.status().header, HeaderStatus::Empty);
    }

    #[test]
    fn test_end_marker_without_start_halts() {
        let ctx = scan("x = 1\n# topmark:header:end\n");
        assert_eq!(ctx.status().header, HeaderStatus::Malformed);
        assert!(ctx.is_halted());
    }

    #[test]
    fn test_partially_malformed_fields_do_not_halt() {
        let ctx = scan("# topmark:header:start\n# file: a.py\n# ???\n# topmark:header:end\n");
        assert_eq!(ctx.status().header, HeaderStatus::MalformedSomeFields);
        assert!(!ctx.is_halted());
    }

    #[test]
    fn test_indent_is_recorded() {
        let ctx = scan("  # topmark:header:start\n  # file: a.py\n  # topmark:header:end\n");
        assert_eq!(ctx.views().header.as_ref().unwrap().indent, "  ");
    }

    #[test]
    fn test_out_of_range_span_is_malformed() {
        let processor = OverreachingProcessor {
            style: CommentStyle::line("#"),
        };
        let ctx = scan_with("x = 1\ny = 2\n", Arc::new(processor));
        assert_eq!(ctx.status().header, HeaderStatus::Malformed);
        assert!(ctx.is_halted());
        assert!(ctx.diagnostics().has_errors());
        assert!(ctx.views().header.is_none());
    }
}
