//! Header removal

use crate::context::{ProcessingContext, StepContext};
use crate::status::{Axis, HeaderStatus, StripStatus};
use crate::steps::Step;
use crate::views::{Image, UpdatedView};

/// Computes the image without its header, dropping the blank lines the
/// processor itself pads a header with. The result carries no BOM; the
/// planner reattaches it.
#[derive(Debug, Default)]
pub struct StripperStep;

impl Step for StripperStep {
    fn name(&self) -> &'static str {
        "stripper"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Strip]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        !ctx.status().header.is_pending()
            && ctx.status().header != HeaderStatus::Malformed
            && ctx.processor().is_some()
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        if ctx.status().header == HeaderStatus::Missing {
            ctx.set_status(StripStatus::NotNeeded);
            return;
        }
        let span = ctx.views().header.as_ref().map(|view| (view.start, view.end));
        let (Some(processor), Some((start, end))) = (ctx.processor().cloned(), span) else {
            ctx.set_status(StripStatus::Failed);
            ctx.error("no header span available to strip");
            return;
        };
        let stripped = processor.remove_header(ctx.views().image_lines(), start, end);
        ctx.views_mut().updated = Some(UpdatedView {
            image: Image::Materialized(stripped),
        });
        ctx.set_status(StripStatus::Ready);
    }
}
