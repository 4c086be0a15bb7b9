//! Unified diff of the planned change

use similar::TextDiff;

use crate::context::{ProcessingContext, StepContext};
use crate::status::{Axis, ComparisonStatus, PatchStatus};
use crate::steps::Step;
use crate::views::DiffView;

const CONTEXT_LINES: usize = 3;
const BOM: char = '\u{FEFF}';

/// Renders the difference between the original and the planned image.
/// Presentation only: nothing here affects what gets written.
#[derive(Debug, Default)]
pub struct PatcherStep;

impl Step for PatcherStep {
    fn name(&self) -> &'static str {
        "patcher"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Patch]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        !ctx.status().comparison.is_pending() && !ctx.status().plan.is_pending()
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        if ctx.status().comparison == ComparisonStatus::Unchanged || !ctx.status().plan.is_mutation()
        {
            ctx.set_status(PatchStatus::Skipped);
            return;
        }
        let Some(updated) = ctx.views_mut().updated.as_mut() else {
            ctx.set_status(PatchStatus::Skipped);
            return;
        };
        let new_text = updated.image.text();

        let mut old_text = ctx.views().image_lines().concat();
        if ctx.facts().has_bom {
            old_text.insert(0, BOM);
        }
        if old_text == new_text {
            ctx.info("planned image matches the original; no diff");
            ctx.set_status(PatchStatus::Skipped);
            return;
        }

        let path = ctx.path().as_str();
        let diff = TextDiff::from_lines(old_text.as_str(), new_text.as_str())
            .unified_diff()
            .context_radius(CONTEXT_LINES)
            .header(&format!("a/{path}"), &format!("b/{path}"))
            .to_string();

        if diff.is_empty() {
            ctx.set_status(PatchStatus::Failed);
            ctx.error("the planned image differs but no diff could be produced");
            return;
        }
        ctx.views_mut().diff = Some(DiffView { text: diff });
        ctx.set_status(PatchStatus::Generated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Config;
    use crate::status::{ContentStatus, PlanStatus};
    use crate::views::{FileImageView, Image, UpdatedView};

    const ALL: &[Axis] = Axis::ALL;

    fn patch(original: &[&str], planned: &[&str], plan: PlanStatus) -> ProcessingContext {
        let mut ctx = ProcessingContext::bootstrap("src/a.py", Arc::new(Config::default()));
        {
            let mut setup = StepContext::new(&mut ctx, "setup", ALL);
            setup.set_status(ContentStatus::Ok);
            setup.set_status(ComparisonStatus::Changed);
            setup.set_status(plan);
            setup.views_mut().image = Some(FileImageView {
                lines: original.iter().map(|s| s.to_string()).collect(),
            });
            setup.views_mut().updated = Some(UpdatedView {
                image: Image::Materialized(planned.iter().map(|s| s.to_string()).collect()),
            });
        }
        let step = PatcherStep;
        step.run(&mut StepContext::new(&mut ctx, step.name(), step.axes_written()));
        ctx
    }

    #[test]
    fn test_diff_for_insertion() {
        let ctx = patch(&["x = 1\n"], &["# h\n", "\n", "x = 1\n"], PlanStatus::Inserted);
        assert_eq!(ctx.status().patch, PatchStatus::Generated);
        let diff = &ctx.views().diff.as_ref().unwrap().text;
        assert!(diff.starts_with("--- a/src/a.py\n+++ b/src/a.py\n"));
        assert!(diff.contains("+# h\n"));
        assert!(diff.contains(" x = 1\n"));
    }

    #[test]
    fn test_identical_images_are_skipped() {
        let ctx = patch(&["x\n"], &["x\n"], PlanStatus::Replaced);
        assert_eq!(ctx.status().patch, PatchStatus::Skipped);
        assert!(ctx.views().diff.is_none());
    }

    #[test]
    fn test_skipped_plan_has_no_diff() {
        let ctx = patch(&["x\n"], &["y\n"], PlanStatus::Skipped);
        assert_eq!(ctx.status().patch, PatchStatus::Skipped);
    }
}
