//! Persisting the planned image

use topmark_fs::io;

use crate::context::{HintContext, ProcessingContext, StepContext};
use crate::status::{Axis, PlanStatus, WriteStatus};
use crate::steps::Step;

/// Writes the planned image when changes are applied, otherwise reports
/// the change as previewed.
#[derive(Debug, Default)]
pub struct WriterStep;

impl Step for WriterStep {
    fn name(&self) -> &'static str {
        "writer"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Write]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        !ctx.status().plan.is_pending()
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        let plan = ctx.status().plan;
        if plan == PlanStatus::Previewed {
            ctx.set_status(WriteStatus::Previewed);
            return;
        }
        if !plan.is_mutation() {
            ctx.set_status(WriteStatus::Skipped);
            return;
        }
        if !ctx.config().apply_changes {
            ctx.set_status(WriteStatus::Previewed);
            return;
        }
        let Some(updated) = ctx.views_mut().updated.as_mut() else {
            ctx.set_status(WriteStatus::Failed);
            ctx.error("no planned image to write");
            return;
        };
        let content = updated.image.text();
        let mode = ctx.config().write_mode;
        match io::write_with_mode(ctx.path(), content.as_bytes(), mode) {
            Ok(()) => {
                tracing::info!(path = %ctx.path(), plan = %plan, "Wrote file");
                ctx.set_status(WriteStatus::Written);
            }
            Err(err) => {
                ctx.set_status(WriteStatus::Failed);
                ctx.error(format!("write failed: {err}"));
            }
        }
    }

    fn hint(&self, ctx: &mut HintContext<'_>) {
        if ctx.status().write == WriteStatus::Previewed && ctx.status().plan.is_mutation() {
            ctx.hint(Axis::Write, "dry_run", "re-run with --apply to write this change");
        }
    }
}
