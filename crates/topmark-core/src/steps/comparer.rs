//! Existing header against expected header

use crate::context::{ProcessingContext, StepContext};
use crate::status::{Axis, ComparisonStatus, ContentStatus, HeaderStatus, RenderStatus};
use crate::steps::Step;

/// Decides whether the file would change.
///
/// A precomputed image (from the stripper) is compared line by line.
/// Otherwise the parsed fields are compared first and the exact block
/// text second, so formatting drift still counts as a change.
#[derive(Debug, Default)]
pub struct ComparerStep;

impl Step for ComparerStep {
    fn name(&self) -> &'static str {
        "comparer"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Comparison]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        ctx.status().content == ContentStatus::Ok && !ctx.status().header.is_pending()
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        let status = decide(ctx);
        if status == ComparisonStatus::Skipped {
            ctx.info("header fields could not be parsed; comparison skipped");
            ctx.request_halt("malformed header fields");
        }
        ctx.set_status(status);
    }
}

fn decide(ctx: &mut StepContext<'_>) -> ComparisonStatus {
    let status = *ctx.status();

    if let Some(updated) = ctx.views_mut().updated.as_mut() {
        let planned = updated.image.materialize().to_vec();
        return if planned.as_slice() == ctx.views().image_lines() {
            ComparisonStatus::Unchanged
        } else {
            ComparisonStatus::Changed
        };
    }

    if status.header.is_malformed() {
        return ComparisonStatus::Skipped;
    }
    if status.generation.is_pending() {
        return ComparisonStatus::Unchanged;
    }
    if status.render != RenderStatus::Rendered {
        return ComparisonStatus::CannotCompare;
    }

    let views = ctx.views();
    let (Some(header), Some(build), Some(render)) = (&views.header, &views.build, &views.render)
    else {
        return match status.header {
            HeaderStatus::Missing => ComparisonStatus::Changed,
            _ => ComparisonStatus::CannotCompare,
        };
    };
    if header.fields != build.selected || header.block != render.block {
        ComparisonStatus::Changed
    } else {
        ComparisonStatus::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Config;
    use crate::status::{GenerationStatus, StripStatus};
    use crate::views::{BuilderView, FileImageView, HeaderView, Image, RenderView, UpdatedView};
    use topmark_processors::FieldMap;

    const ALL: &[Axis] = Axis::ALL;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    fn base() -> ProcessingContext {
        let mut ctx = ProcessingContext::bootstrap("/r/a.py", Arc::new(Config::default()));
        {
            let mut setup = StepContext::new(&mut ctx, "setup", ALL);
            setup.set_status(ContentStatus::Ok);
            setup.views_mut().image = Some(FileImageView {
                lines: lines(&["# topmark:header:start\n", "# b: 2\n", "# a: 1\n", "# topmark:header:end\n"]),
            });
        }
        ctx
    }

    fn compare(ctx: &mut ProcessingContext) -> ComparisonStatus {
        let step = ComparerStep;
        step.run(&mut StepContext::new(ctx, step.name(), step.axes_written()));
        ctx.status().comparison
    }

    fn with_header(ctx: &mut ProcessingContext, rendered: &[&str]) {
        let mut setup = StepContext::new(ctx, "setup", ALL);
        let image = setup.views().image_lines().to_vec();
        let fields: FieldMap = [("b", "2"), ("a", "1")].into_iter().collect();
        setup.views_mut().header = Some(HeaderView {
            start: 0,
            end: 4,
            block: image.concat(),
            lines: image,
            fields: fields.clone(),
            success: 2,
            errors: 0,
            indent: String::new(),
        });
        setup.views_mut().build = Some(BuilderView {
            builtins: FieldMap::new(),
            selected: fields,
        });
        let rendered = lines(rendered);
        setup.views_mut().render = Some(RenderView {
            block: rendered.concat(),
            lines: rendered,
        });
        setup.set_status(HeaderStatus::Detected);
        setup.set_status(GenerationStatus::Generated);
        setup.set_status(RenderStatus::Rendered);
    }

    #[test]
    fn test_identical_header_is_unchanged() {
        let mut ctx = base();
        with_header(
            &mut ctx,
            &["# topmark:header:start\n", "# b: 2\n", "# a: 1\n", "# topmark:header:end\n"],
        );
        assert_eq!(compare(&mut ctx), ComparisonStatus::Unchanged);
    }

    #[test]
    fn test_reordered_lines_are_formatting_drift() {
        let mut ctx = base();
        with_header(
            &mut ctx,
            &["# topmark:header:start\n", "# a: 1\n", "# b: 2\n", "# topmark:header:end\n"],
        );
        assert_eq!(compare(&mut ctx), ComparisonStatus::Changed);
    }

    #[test]
    fn test_malformed_fields_skip_and_halt() {
        let mut ctx = base();
        StepContext::new(&mut ctx, "setup", ALL).set_status(HeaderStatus::MalformedSomeFields);
        assert_eq!(compare(&mut ctx), ComparisonStatus::Skipped);
        assert!(ctx.is_halted());
    }

    #[test]
    fn test_no_generation_is_unchanged() {
        let mut ctx = base();
        StepContext::new(&mut ctx, "setup", ALL).set_status(HeaderStatus::Missing);
        assert_eq!(compare(&mut ctx), ComparisonStatus::Unchanged);
    }

    #[test]
    fn test_strip_image_is_compared_directly() {
        let mut ctx = base();
        {
            let mut setup = StepContext::new(&mut ctx, "setup", ALL);
            setup.set_status(HeaderStatus::Detected);
            setup.set_status(StripStatus::Ready);
            setup.views_mut().updated = Some(UpdatedView {
                image: Image::Materialized(Vec::new()),
            });
        }
        assert_eq!(compare(&mut ctx), ComparisonStatus::Changed);
    }

    #[test]
    fn test_skipped_render_cannot_compare() {
        let mut ctx = base();
        {
            let mut setup = StepContext::new(&mut ctx, "setup", ALL);
            setup.set_status(HeaderStatus::Missing);
            setup.set_status(GenerationStatus::NoFields);
            setup.set_status(RenderStatus::Skipped);
        }
        assert_eq!(compare(&mut ctx), ComparisonStatus::CannotCompare);
    }
}
