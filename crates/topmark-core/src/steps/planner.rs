//! Planned image synthesis
//!
//! The planner is the only step that decides what the file will look
//! like. It never touches the filesystem; the writer persists the image
//! later if asked to.

use topmark_processors::splice;

use crate::config::HeaderFormat;
use crate::context::{ProcessingContext, StepContext};
use crate::status::{Axis, ComparisonStatus, ContentStatus, PlanStatus, StripStatus};
use crate::steps::Step;
use crate::views::{Image, UpdatedView};

const BOM: char = '\u{FEFF}';

#[derive(Debug, Default)]
pub struct PlannerStep;

impl Step for PlannerStep {
    fn name(&self) -> &'static str {
        "planner"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Plan]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        ctx.status().content == ContentStatus::Ok && !ctx.status().comparison.is_pending()
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        if ctx.status().strip == StripStatus::Ready {
            plan_strip(ctx);
            return;
        }
        match ctx.status().comparison {
            ComparisonStatus::Changed => {}
            ComparisonStatus::Unchanged => {
                mirror_original(ctx);
                ctx.set_status(PlanStatus::Skipped);
                return;
            }
            _ => {
                ctx.set_status(PlanStatus::Skipped);
                return;
            }
        }
        if ctx.config().header_format == HeaderFormat::Plain {
            ctx.set_status(PlanStatus::Previewed);
            return;
        }
        plan_update(ctx);
    }
}

/// Reattach the BOM to a stripped image.
fn plan_strip(ctx: &mut StepContext<'_>) {
    let Some(updated) = ctx.views_mut().updated.take() else {
        ctx.set_status(PlanStatus::Failed);
        ctx.error("strip was ready but no stripped image is available");
        return;
    };
    let lines = updated.image.into_lines();
    let supports_shebang = ctx.header_policy().is_some_and(|p| p.supports_shebang);
    if ctx.facts().has_bom
        && supports_shebang
        && lines.first().is_some_and(|line| line.starts_with("#!"))
    {
        ctx.set_status(PlanStatus::Failed);
        ctx.error("removing the header would leave the byte order mark in front of the shebang");
        ctx.request_halt("BOM would precede shebang");
        return;
    }
    let lines = with_bom(lines, ctx.facts().has_bom);
    ctx.views_mut().updated = Some(UpdatedView {
        image: Image::Materialized(lines),
    });
    ctx.set_status(PlanStatus::Removed);
}

fn plan_update(ctx: &mut StepContext<'_>) {
    let Some(processor) = ctx.processor().cloned() else {
        ctx.set_status(PlanStatus::Failed);
        ctx.error("no processor bound");
        return;
    };
    let Some(rendered) = ctx.views().render.as_ref().map(|view| view.lines.clone()) else {
        ctx.set_status(PlanStatus::Failed);
        ctx.error("no rendered header to plan with");
        return;
    };
    let policy = *ctx.policy();
    let original = ctx.views().image_lines().to_vec();
    let span = ctx.views().header.as_ref().map(|view| (view.start, view.end));

    let (planned, status) = match span {
        Some((start, end)) => {
            if policy.add_only {
                ctx.hint(
                    Axis::Plan,
                    "add_only",
                    "the existing header differs but add_only forbids updating it",
                );
                ctx.set_status(PlanStatus::Skipped);
                return;
            }
            (
                splice::replace_span(&original, start, end, &rendered),
                PlanStatus::Replaced,
            )
        }
        None => {
            if policy.update_only {
                ctx.hint(
                    Axis::Plan,
                    "update_only",
                    "the file has no header and update_only forbids inserting one",
                );
                ctx.set_status(PlanStatus::Skipped);
                return;
            }
            let capability = ctx.insert_capability();
            if let Some(reason) = capability.reason() {
                ctx.info(format!("insertion vetoed: {reason}"));
                ctx.hint(Axis::Plan, "insert_vetoed", reason);
                ctx.set_status(PlanStatus::Skipped);
                return;
            }
            let header_policy = ctx.header_policy().cloned().unwrap_or_default();
            let Some(anchor) = processor.insert_anchor(&original, &header_policy) else {
                ctx.set_status(PlanStatus::Failed);
                ctx.error("no valid position for a new header");
                ctx.request_halt("no insertion anchor");
                return;
            };
            let newline = ctx.facts().newline;
            (
                processor.insert_header(&original, anchor, &rendered, newline, &header_policy),
                PlanStatus::Inserted,
            )
        }
    };

    if planned == original {
        ctx.info("planned image is identical to the original");
        mirror_original(ctx);
        ctx.set_status(PlanStatus::Skipped);
        return;
    }

    tracing::debug!(path = %ctx.path(), plan = %status, lines = planned.len(), "Planned update");
    let lines = with_bom(planned, ctx.facts().has_bom);
    ctx.views_mut().updated = Some(UpdatedView {
        image: Image::Materialized(lines),
    });
    ctx.set_status(status);
}

/// Plan the original bytes unchanged, as a lazy image.
fn mirror_original(ctx: &mut StepContext<'_>) {
    let lines = with_bom(ctx.views().image_lines().to_vec(), ctx.facts().has_bom);
    ctx.views_mut().updated = Some(UpdatedView {
        image: Image::Lazy(Box::new(lines.into_iter())),
    });
}

fn with_bom(mut lines: Vec<String>, has_bom: bool) -> Vec<String> {
    if has_bom {
        match lines.first_mut() {
            Some(first) => first.insert(0, BOM),
            None => lines.push(BOM.to_string()),
        }
    }
    lines
}
