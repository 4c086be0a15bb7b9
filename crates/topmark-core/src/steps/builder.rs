//! Header field generation

use topmark_fs::NormalizedPath;
use topmark_processors::FieldMap;

use crate::context::{ProcessingContext, StepContext};
use crate::status::{Axis, ContentStatus, GenerationStatus};
use crate::steps::Step;
use crate::views::BuilderView;

/// Names of the fields derived from the file path.
pub const BUILTIN_FIELDS: &[&str] = &["file", "file_relpath", "file_abspath", "relpath", "abspath"];

/// Computes built-in fields, overlays configured values and selects the
/// configured field order.
#[derive(Debug, Default)]
pub struct BuilderStep;

impl Step for BuilderStep {
    fn name(&self) -> &'static str {
        "builder"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Generation]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        ctx.status().content == ContentStatus::Ok
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        let builtins = builtin_fields(ctx.path(), &ctx.config().relative_to);

        let overridden: Vec<String> = ctx
            .config()
            .field_values
            .keys()
            .filter(|key| builtins.contains_key(key))
            .cloned()
            .collect();
        for key in overridden {
            ctx.warn(format!("configured field {key} overrides the built-in value"));
        }

        let mut selected = FieldMap::new();
        let mut unknown = Vec::new();
        for name in &ctx.config().header_fields {
            let value = ctx
                .config()
                .field_values
                .get(name)
                .map(String::as_str)
                .or_else(|| builtins.get(name));
            match value {
                Some(value) => {
                    selected.insert(name.as_str(), value);
                }
                None => unknown.push(name.clone()),
            }
        }
        for name in unknown {
            ctx.error(format!("unknown header field {name}"));
        }

        let status = if selected.is_empty() {
            GenerationStatus::NoFields
        } else {
            GenerationStatus::Generated
        };
        ctx.views_mut().build = Some(BuilderView { builtins, selected });
        ctx.set_status(status);
    }
}

/// Path-derived fields with POSIX separators.
///
/// Relative values are taken against `root`; a path with no relative
/// form (another drive) gets no relative fields.
pub fn builtin_fields(path: &NormalizedPath, root: &NormalizedPath) -> FieldMap {
    let absolute = path.absolutize();
    let mut fields = FieldMap::new();
    if let Some(name) = absolute.file_name() {
        fields.insert("file", name);
    }
    if let Some(relative) = absolute.relative_to(root) {
        fields.insert("file_relpath", relative.as_str());
    }
    fields.insert("file_abspath", absolute.as_str());
    if let Some(parent) = absolute.parent() {
        if let Some(relative) = parent.relative_to(root) {
            fields.insert("relpath", relative.as_str());
        }
        fields.insert("abspath", parent.as_str());
    }
    fields
}
