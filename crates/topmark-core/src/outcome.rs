//! Per-file result classification
//!
//! A finished [`ProcessingContext`] carries eleven status axes. Callers
//! mostly want one answer per file: did it change, would it change, or
//! why was it left alone. [`Outcome::classify`] folds the axes into that
//! answer and [`FileReport`] bundles it with everything an emitter needs.

use std::fmt;

use serde::Serialize;
use topmark_fs::NormalizedPath;

use crate::context::{HaltState, ProcessingContext};
use crate::diagnostics::DiagnosticLog;
use crate::hints::HintLog;
use crate::status::{
    Axis, ComparisonStatus, ContentStatus, FsStatus, PatchStatus, PlanStatus, ProcessingStatus,
    ResolveStatus, StripStatus, WriteStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The header already matches.
    Unchanged,
    WouldInsert,
    Inserted,
    WouldReplace,
    Replaced,
    WouldStrip,
    Stripped,
    /// A plain-format header was rendered for display only.
    Previewed,
    /// A probe run finished without computing any change.
    Inspected,
    Skipped { reason: String },
    Unsupported { reason: String },
    Failed { reason: String },
}

impl Outcome {
    pub fn classify(ctx: &ProcessingContext) -> Self {
        let status = ctx.status();
        let halt_reason = || ctx.halt().map(|halt| halt.reason.clone());

        match status.resolve {
            ResolveStatus::Unsupported | ResolveStatus::TypeResolvedNoProcessor => {
                return Self::Unsupported {
                    reason: halt_reason().unwrap_or_else(|| status.resolve.to_string()),
                };
            }
            ResolveStatus::TypeResolvedHeadersUnsupported => {
                return Self::Skipped {
                    reason: halt_reason().unwrap_or_else(|| status.resolve.to_string()),
                };
            }
            _ => {}
        }

        if let Some(reason) = failure(status) {
            let reason = ctx
                .diagnostics()
                .iter()
                .rev()
                .find(|d| d.level == crate::diagnostics::DiagnosticLevel::Error)
                .map(|d| d.message.clone())
                .unwrap_or_else(|| reason.to_string());
            return Self::Failed { reason };
        }

        let written = status.write == WriteStatus::Written;
        match status.plan {
            PlanStatus::Inserted if written => return Self::Inserted,
            PlanStatus::Inserted => return Self::WouldInsert,
            PlanStatus::Replaced if written => return Self::Replaced,
            PlanStatus::Replaced => return Self::WouldReplace,
            PlanStatus::Removed if written => return Self::Stripped,
            PlanStatus::Removed => return Self::WouldStrip,
            PlanStatus::Previewed => return Self::Previewed,
            PlanStatus::Skipped if status.comparison == ComparisonStatus::Unchanged => {
                return Self::Unchanged;
            }
            PlanStatus::Skipped => {
                let reason = ctx
                    .hints()
                    .iter()
                    .rev()
                    .find(|hint| hint.axis == Axis::Plan)
                    .map(|hint| hint.message.clone())
                    .or_else(halt_reason)
                    .unwrap_or_else(|| format!("comparison {}", status.comparison));
                return Self::Skipped { reason };
            }
            _ => {}
        }

        if let Some(reason) = halt_reason() {
            return Self::Skipped { reason };
        }
        Self::Inspected
    }

    /// Whether the file was or would be modified.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::WouldInsert
                | Self::Inserted
                | Self::WouldReplace
                | Self::Replaced
                | Self::WouldStrip
                | Self::Stripped
        )
    }

    /// A change that was computed but not written.
    pub fn is_pending_change(&self) -> bool {
        matches!(self, Self::WouldInsert | Self::WouldReplace | Self::WouldStrip)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::WouldInsert => "would insert",
            Self::Inserted => "inserted",
            Self::WouldReplace => "would replace",
            Self::Replaced => "replaced",
            Self::WouldStrip => "would strip",
            Self::Stripped => "stripped",
            Self::Previewed => "previewed",
            Self::Inspected => "inspected",
            Self::Skipped { .. } => "skipped",
            Self::Unsupported { .. } => "unsupported",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Skipped { reason } | Self::Unsupported { reason } | Self::Failed { reason } => {
                Some(reason)
            }
            _ => None,
        }
    }
}

/// First terminal status that means the tool could not do its job.
fn failure(status: &ProcessingStatus) -> Option<&'static str> {
    if matches!(
        status.fs,
        FsStatus::NotFound | FsStatus::NoReadPermission | FsStatus::Unreadable
    ) {
        return Some(status.fs.label());
    }
    if status.content == ContentStatus::Unreadable {
        return Some("content unreadable");
    }
    if status.strip == StripStatus::Failed {
        return Some("strip failed");
    }
    if status.plan == PlanStatus::Failed {
        return Some("plan failed");
    }
    if status.patch == PatchStatus::Failed {
        return Some("diff failed");
    }
    if status.write == WriteStatus::Failed {
        return Some("write failed");
    }
    None
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{} ({reason})", self.label()),
            None => f.write_str(self.label()),
        }
    }
}

/// Everything an emitter reports for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: NormalizedPath,
    pub file_type: Option<String>,
    pub outcome: Outcome,
    pub status: ProcessingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halt: Option<HaltState>,
    pub diagnostics: DiagnosticLog,
    pub hints: HintLog,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileReport {
    pub fn from_context(ctx: &ProcessingContext) -> Self {
        Self {
            path: ctx.path().clone(),
            file_type: ctx.file_type_name().map(str::to_string),
            outcome: Outcome::classify(ctx),
            status: *ctx.status(),
            halt: ctx.halt().cloned(),
            diagnostics: ctx.diagnostics().clone(),
            hints: ctx.hints().clone(),
            diff: ctx.views().diff.as_ref().map(|view| view.text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rstest::rstest;

    use crate::config::Config;
    use crate::context::StepContext;
    use crate::status::{AxisUpdate, HeaderStatus};

    fn finished(updates: &[AxisUpdate], halt: Option<&str>) -> ProcessingContext {
        let mut ctx = ProcessingContext::bootstrap("/r/a.py", Arc::new(Config::default()));
        {
            let mut setup = StepContext::new(&mut ctx, "setup", Axis::ALL);
            for update in updates {
                setup.set_status(*update);
            }
            if let Some(reason) = halt {
                setup.request_halt(reason);
            }
        }
        ctx
    }

    #[rstest]
    #[case(PlanStatus::Inserted, WriteStatus::Previewed, Outcome::WouldInsert)]
    #[case(PlanStatus::Inserted, WriteStatus::Written, Outcome::Inserted)]
    #[case(PlanStatus::Replaced, WriteStatus::Previewed, Outcome::WouldReplace)]
    #[case(PlanStatus::Replaced, WriteStatus::Written, Outcome::Replaced)]
    #[case(PlanStatus::Removed, WriteStatus::Previewed, Outcome::WouldStrip)]
    #[case(PlanStatus::Removed, WriteStatus::Written, Outcome::Stripped)]
    #[case(PlanStatus::Previewed, WriteStatus::Previewed, Outcome::Previewed)]
    fn test_plan_outcomes(
        #[case] plan: PlanStatus,
        #[case] write: WriteStatus,
        #[case] expected: Outcome,
    ) {
        let ctx = finished(
            &[
                ResolveStatus::Resolved.into(),
                ComparisonStatus::Changed.into(),
                plan.into(),
                write.into(),
            ],
            None,
        );
        assert_eq!(Outcome::classify(&ctx), expected);
    }

    #[test]
    fn test_unchanged() {
        let ctx = finished(
            &[
                ResolveStatus::Resolved.into(),
                ComparisonStatus::Unchanged.into(),
                PlanStatus::Skipped.into(),
            ],
            None,
        );
        let outcome = Outcome::classify(&ctx);
        assert_eq!(outcome, Outcome::Unchanged);
        assert!(!outcome.is_change());
    }

    #[test]
    fn test_headers_unsupported_is_skipped_not_failed() {
        let ctx = finished(
            &[ResolveStatus::TypeResolvedHeadersUnsupported.into()],
            Some("headers unsupported for file type json"),
        );
        let outcome = Outcome::classify(&ctx);
        assert_eq!(
            outcome,
            Outcome::Skipped {
                reason: "headers unsupported for file type json".into()
            }
        );
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_missing_file_fails() {
        let ctx = finished(&[ResolveStatus::Resolved.into(), FsStatus::NotFound.into()], Some("gone"));
        assert!(Outcome::classify(&ctx).is_failure());
    }

    #[test]
    fn test_halted_sniff_is_skipped() {
        let ctx = finished(
            &[ResolveStatus::Resolved.into(), FsStatus::Binary.into()],
            Some("binary content"),
        );
        assert_eq!(
            Outcome::classify(&ctx),
            Outcome::Skipped {
                reason: "binary content".into()
            }
        );
    }

    #[test]
    fn test_probe_is_inspected() {
        let ctx = finished(
            &[
                ResolveStatus::Resolved.into(),
                FsStatus::Ok.into(),
                ContentStatus::Ok.into(),
                HeaderStatus::Detected.into(),
            ],
            None,
        );
        assert_eq!(Outcome::classify(&ctx), Outcome::Inspected);
    }

    #[test]
    fn test_report_json_shape() {
        let ctx = finished(
            &[ResolveStatus::Unsupported.into()],
            Some("unsupported file type"),
        );
        let json = serde_json::to_value(FileReport::from_context(&ctx)).unwrap();
        assert_eq!(json["path"], "/r/a.py");
        assert_eq!(json["outcome"]["kind"], "unsupported");
        assert_eq!(json["outcome"]["reason"], "unsupported file type");
        assert_eq!(json["status"]["resolve"], "unsupported");
        assert_eq!(json["halt"]["step"], "setup");
        assert!(json.get("diff").is_none());
    }
}
