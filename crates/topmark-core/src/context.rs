//! The per-file unit of work
//!
//! A [`ProcessingContext`] is created for one path, handed to each step in
//! turn, and reported once the runner is done. Steps never touch it
//! directly: they receive a [`StepContext`] that only lets them write the
//! status axes they declared, and hint callbacks receive a
//! [`HintContext`] that can only add hints.

use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;
use topmark_filetypes::{FileType, HeaderPolicy, InsertCapability, PreInsertInput};
use topmark_fs::{NewlineHistogram, NewlineStyle, NormalizedPath};
use topmark_processors::HeaderProcessor;

use crate::config::{Config, Policy};
use crate::diagnostics::{DiagnosticLevel, DiagnosticLog};
use crate::hints::HintLog;
use crate::status::{Axis, AxisUpdate, ProcessingStatus};
use crate::views::Views;

/// Byte-level facts gathered by the sniffer and finalized by the reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFacts {
    pub byte_len: u64,
    /// A UTF-8 byte order mark precedes the content.
    pub has_bom: bool,
    /// The first BOM-stripped line starts with `#!`.
    pub has_shebang: bool,
    /// Dominant newline style.
    pub newline: NewlineStyle,
    pub histogram: NewlineHistogram,
    pub ends_with_newline: bool,
}

/// Why and where processing of a file stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HaltState {
    pub reason: String,
    pub step: &'static str,
}

pub struct ProcessingContext {
    path: NormalizedPath,
    config: Arc<Config>,
    file_type: Option<Arc<FileType>>,
    processor: Option<Arc<dyn HeaderProcessor>>,
    facts: FileFacts,
    views: Views,
    status: ProcessingStatus,
    diagnostics: DiagnosticLog,
    hints: HintLog,
    halt: Option<HaltState>,
    insert_capability: Option<InsertCapability>,
}

impl ProcessingContext {
    /// Fresh context for one file. Every axis starts pending.
    pub fn bootstrap(path: impl Into<NormalizedPath>, config: Arc<Config>) -> Self {
        Self {
            path: path.into(),
            config,
            file_type: None,
            processor: None,
            facts: FileFacts::default(),
            views: Views::default(),
            status: ProcessingStatus::default(),
            diagnostics: DiagnosticLog::default(),
            hints: HintLog::default(),
            halt: None,
            insert_capability: None,
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn file_type(&self) -> Option<&Arc<FileType>> {
        self.file_type.as_ref()
    }

    pub fn file_type_name(&self) -> Option<&str> {
        self.file_type.as_deref().map(|ft| ft.name.as_str())
    }

    pub fn processor(&self) -> Option<&Arc<dyn HeaderProcessor>> {
        self.processor.as_ref()
    }

    /// Placement rules of the resolved type.
    pub fn header_policy(&self) -> Option<&HeaderPolicy> {
        self.file_type.as_deref().map(|ft| &ft.header_policy)
    }

    /// Effective policy for the resolved type, or the global one.
    pub fn policy(&self) -> &Policy {
        self.config.policies.for_type(self.file_type_name())
    }

    pub fn facts(&self) -> &FileFacts {
        &self.facts
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn status(&self) -> &ProcessingStatus {
        &self.status
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn hints(&self) -> &HintLog {
        &self.hints
    }

    pub fn halt(&self) -> Option<&HaltState> {
        self.halt.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.halt.is_some()
    }

    /// Mutable views, for the runner's pruning and for consumers of a
    /// finished context.
    pub fn views_mut(&mut self) -> &mut Views {
        &mut self.views
    }
}

impl std::fmt::Debug for ProcessingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessingContext")
            .field("path", &self.path)
            .field("file_type", &self.file_type_name())
            .field("processor", &self.processor.as_ref().map(|p| p.name()))
            .field("status", &self.status)
            .field("halt", &self.halt)
            .finish_non_exhaustive()
    }
}

/// Write access handed to a step's `run`.
///
/// Reads go through `Deref` to the context. Status writes are checked
/// against the axes the step owns; a write to any other axis is dropped
/// and recorded as an error diagnostic.
pub struct StepContext<'a> {
    ctx: &'a mut ProcessingContext,
    step: &'static str,
    owned: &'static [Axis],
}

impl<'a> StepContext<'a> {
    pub fn new(ctx: &'a mut ProcessingContext, step: &'static str, owned: &'static [Axis]) -> Self {
        Self { ctx, step, owned }
    }

    pub fn step(&self) -> &'static str {
        self.step
    }

    pub fn set_status(&mut self, update: impl Into<AxisUpdate>) {
        let update = update.into();
        let axis = update.axis();
        if !self.owned.contains(&axis) {
            self.error(format!(
                "step {} may not write the {axis} axis (attempted {})",
                self.step,
                update.label()
            ));
            return;
        }
        tracing::trace!(
            path = %self.ctx.path,
            step = self.step,
            axis = axis.name(),
            value = update.label(),
            "Status updated"
        );
        self.ctx.status.apply(update);
    }

    /// Bind the resolved file type and processor. Only the step that owns
    /// the resolve axis may do this.
    pub fn set_resolution(
        &mut self,
        file_type: Arc<FileType>,
        processor: Option<Arc<dyn HeaderProcessor>>,
    ) {
        if !self.owned.contains(&Axis::Resolve) {
            self.error(format!("step {} may not bind a file type", self.step));
            return;
        }
        self.ctx.file_type = Some(file_type);
        self.ctx.processor = processor;
    }

    pub fn views_mut(&mut self) -> &mut Views {
        &mut self.ctx.views
    }

    pub fn facts_mut(&mut self) -> &mut FileFacts {
        &mut self.ctx.facts
    }

    /// Record a diagnostic and mirror it as a tracing event.
    pub fn diagnose(&mut self, level: DiagnosticLevel, message: impl Into<String>) {
        let message = message.into();
        let path = &self.ctx.path;
        match level {
            DiagnosticLevel::Info => tracing::info!(path = %path, step = self.step, "{message}"),
            DiagnosticLevel::Warning => tracing::warn!(path = %path, step = self.step, "{message}"),
            DiagnosticLevel::Error => tracing::error!(path = %path, step = self.step, "{message}"),
        }
        self.ctx.diagnostics.push(level, self.step, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.diagnose(DiagnosticLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.diagnose(DiagnosticLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.diagnose(DiagnosticLevel::Error, message);
    }

    pub fn hint(&mut self, axis: Axis, code: &'static str, message: impl Into<String>) {
        self.ctx.hints.push(axis, code, message);
    }

    /// Stop the pipeline for this file after the current step.
    /// The first halt wins.
    pub fn request_halt(&mut self, reason: impl Into<String>) {
        if self.ctx.halt.is_some() {
            return;
        }
        let reason = reason.into();
        tracing::debug!(path = %self.ctx.path, step = self.step, reason = %reason, "Processing halted");
        self.ctx.halt = Some(HaltState {
            reason,
            step: self.step,
        });
    }

    /// Pre-insert verdict of the file type, computed once per file.
    pub fn insert_capability(&mut self) -> InsertCapability {
        if let Some(cached) = &self.ctx.insert_capability {
            return cached.clone();
        }
        let capability = match self.ctx.file_type.as_deref() {
            Some(file_type) => file_type.check_insert(&PreInsertInput {
                lines: self.ctx.views.image_lines(),
                newline: self.ctx.facts.newline,
                allow_reflow: self.ctx.policy().allow_reflow,
            }),
            None => InsertCapability::Ok,
        };
        self.ctx.insert_capability = Some(capability.clone());
        capability
    }
}

impl Deref for StepContext<'_> {
    type Target = ProcessingContext;

    fn deref(&self) -> &ProcessingContext {
        self.ctx
    }
}

/// Hint-only access, used for advisory callbacks that also run after a halt.
pub struct HintContext<'a> {
    ctx: &'a mut ProcessingContext,
}

impl<'a> HintContext<'a> {
    pub fn new(ctx: &'a mut ProcessingContext) -> Self {
        Self { ctx }
    }

    pub fn hint(&mut self, axis: Axis, code: &'static str, message: impl Into<String>) {
        self.ctx.hints.push(axis, code, message);
    }
}

impl Deref for HintContext<'_> {
    type Target = ProcessingContext;

    fn deref(&self) -> &ProcessingContext {
        self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{FsStatus, HeaderStatus};

    const SNIFF_AXES: &[Axis] = &[Axis::Fs];

    fn context() -> ProcessingContext {
        ProcessingContext::bootstrap("src/app.py", Arc::new(Config::default()))
    }

    #[test]
    fn test_owned_axis_write_is_applied() {
        let mut ctx = context();
        let mut step = StepContext::new(&mut ctx, "sniffer", SNIFF_AXES);
        step.set_status(FsStatus::Binary);
        assert_eq!(ctx.status().fs, FsStatus::Binary);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_foreign_axis_write_is_rejected() {
        let mut ctx = context();
        let mut step = StepContext::new(&mut ctx, "sniffer", SNIFF_AXES);
        step.set_status(HeaderStatus::Detected);
        assert!(ctx.status().header.is_pending());
        assert!(ctx.diagnostics().has_errors());
    }

    #[test]
    fn test_first_halt_wins() {
        let mut ctx = context();
        let mut step = StepContext::new(&mut ctx, "reader", &[]);
        step.request_halt("first");
        step.request_halt("second");
        let halt = ctx.halt().unwrap();
        assert_eq!(halt.reason, "first");
        assert_eq!(halt.step, "reader");
    }

    #[test]
    fn test_resolution_requires_resolve_axis() {
        let mut ctx = context();
        let mut step = StepContext::new(&mut ctx, "scanner", &[Axis::Header]);
        step.set_resolution(Arc::new(FileType::new("python", "Python")), None);
        assert!(ctx.file_type().is_none());
        assert!(ctx.diagnostics().has_errors());
    }

    #[test]
    fn test_hint_context_only_adds_hints() {
        let mut ctx = context();
        HintContext::new(&mut ctx).hint(Axis::Fs, "empty_file_skipped", "opt in");
        assert_eq!(ctx.hints().len(), 1);
    }
}
