//! Expected header rendering

use topmark_fs::NewlineStyle;
use topmark_processors::FieldMap;

use crate::config::HeaderFormat;
use crate::context::{ProcessingContext, StepContext};
use crate::status::{Axis, GenerationStatus, RenderStatus};
use crate::steps::Step;
use crate::views::RenderView;

/// Renders the selected fields in the file's newline style, reusing the
/// indentation of an existing header.
#[derive(Debug, Default)]
pub struct RendererStep;

impl Step for RendererStep {
    fn name(&self) -> &'static str {
        "renderer"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Render]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        !ctx.status().generation.is_pending() && ctx.processor().is_some()
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        if ctx.status().generation == GenerationStatus::NoFields
            && !ctx.policy().render_empty_header_when_no_fields
        {
            ctx.set_status(RenderStatus::Skipped);
            return;
        }
        let Some(processor) = ctx.processor().cloned() else {
            return;
        };
        let fields = ctx
            .views()
            .build
            .as_ref()
            .map(|view| view.selected.clone())
            .unwrap_or_default();
        let newline = ctx.facts().newline;

        let lines = match ctx.config().header_format {
            HeaderFormat::Native => {
                let indent = ctx
                    .views()
                    .header
                    .as_ref()
                    .map(|view| view.indent.as_str())
                    .unwrap_or("");
                processor.render_header(&fields, newline, indent)
            }
            HeaderFormat::Plain => render_plain(&fields, newline),
        };

        ctx.views_mut().render = Some(RenderView {
            block: lines.concat(),
            lines,
        });
        ctx.set_status(RenderStatus::Rendered);
    }
}

/// Bare `key: value` lines.
fn render_plain(fields: &FieldMap, newline: NewlineStyle) -> Vec<String> {
    fields
        .iter()
        .map(|(key, value)| format!("{key}: {value}{}", newline.as_str()))
        .collect()
}
