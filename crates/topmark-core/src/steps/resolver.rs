//! File-type resolution

use std::sync::Arc;

use topmark_filetypes::{FileType, best_match};

use crate::context::{HintContext, ProcessingContext, StepContext};
use crate::registry::Registry;
use crate::status::{Axis, ResolveStatus};
use crate::steps::Step;

/// Picks the best-scoring file type for the path and binds its processor.
///
/// Types outside the configured include/exclude filters never compete.
/// Content probes run only where the type's policy allows them.
#[derive(Debug)]
pub struct ResolverStep {
    registry: Arc<Registry>,
}

impl ResolverStep {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

impl Step for ResolverStep {
    fn name(&self) -> &'static str {
        "resolver"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Resolve]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        ctx.status().resolve.is_pending()
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        let config = ctx.config();
        let allow_probe =
            |ft: &FileType| config.policies.for_type(Some(&ft.name)).allow_content_probe;
        let entries = self.registry.file_types.entries();
        let admitted = entries
            .iter()
            .filter(|ft| config.admits_file_type(&ft.name))
            .cloned();
        let found = best_match(admitted, ctx.path(), &allow_probe);

        let Some((file_type, score)) = found else {
            let excluded = best_match(entries, ctx.path(), &allow_probe).map(|(ft, _)| ft);
            ctx.set_status(ResolveStatus::Unsupported);
            match excluded {
                Some(ft) => {
                    ctx.info(format!("file type {} is filtered out by configuration", ft.name));
                    ctx.request_halt(format!("file type {} excluded", ft.name));
                }
                None => ctx.request_halt("unsupported file type"),
            }
            return;
        };

        tracing::debug!(
            path = %ctx.path(),
            file_type = %file_type.name,
            score = score.score,
            "Resolved file type"
        );

        if file_type.skip_processing {
            let name = file_type.name.clone();
            ctx.set_resolution(file_type, None);
            ctx.set_status(ResolveStatus::TypeResolvedHeadersUnsupported);
            ctx.info(format!("headers are not supported for file type {name}"));
            ctx.request_halt("headers unsupported for this file type");
            return;
        }

        let processor = self.registry.processor_for(&file_type.name);
        match processor {
            Some(processor) => {
                ctx.set_resolution(file_type, Some(processor));
                ctx.set_status(ResolveStatus::Resolved);
            }
            None => {
                let name = file_type.name.clone();
                ctx.set_resolution(file_type, None);
                ctx.set_status(ResolveStatus::TypeResolvedNoProcessor);
                ctx.warn(format!("no header processor is registered for file type {name}"));
                ctx.request_halt("no processor registered");
            }
        }
    }

    fn hint(&self, ctx: &mut HintContext<'_>) {
        match ctx.status().resolve {
            ResolveStatus::Unsupported => ctx.hint(
                Axis::Resolve,
                "unsupported_file_type",
                "no registered file type matches this path",
            ),
            ResolveStatus::TypeResolvedHeadersUnsupported => ctx.hint(
                Axis::Resolve,
                "headers_unsupported",
                "this file type is recognized but never carries a header",
            ),
            _ => {}
        }
    }
}
