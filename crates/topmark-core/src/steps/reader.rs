//! Full decode into a newline-preserving line image

use std::borrow::Cow;

use topmark_fs::{NewlineHistogram, io, split_lines_keepends};

use crate::context::{ProcessingContext, StepContext};
use crate::status::{Axis, ContentStatus, FsStatus};
use crate::steps::Step;
use crate::views::FileImageView;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Default)]
pub struct ReaderStep;

impl Step for ReaderStep {
    fn name(&self) -> &'static str {
        "reader"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Content]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        matches!(ctx.status().fs, FsStatus::Ok | FsStatus::Empty)
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        let bytes = match io::read_bytes(ctx.path()) {
            Ok(bytes) => bytes,
            Err(err) => {
                // The file changed between sniffing and reading
                ctx.set_status(ContentStatus::Unreadable);
                ctx.error(format!("cannot read file: {err}"));
                ctx.request_halt("file unreadable");
                return;
            }
        };

        let (has_bom, body) = match bytes.strip_prefix(UTF8_BOM) {
            Some(rest) => (true, rest),
            None => (false, bytes.as_slice()),
        };
        let text = String::from_utf8_lossy(body);
        if matches!(text, Cow::Owned(_)) {
            ctx.warn("undecodable bytes were replaced while reading");
        }

        let histogram = NewlineHistogram::of_text(&text);
        if histogram.is_mixed() {
            ctx.set_status(ContentStatus::SkippedMixedLineEndings);
            ctx.warn("mixed line endings");
            ctx.request_halt("mixed line endings");
            return;
        }

        let lines = split_lines_keepends(&text);
        let facts = ctx.facts_mut();
        facts.byte_len = bytes.len() as u64;
        facts.has_bom = has_bom;
        facts.has_shebang = lines.first().is_some_and(|line| line.starts_with("#!"));
        facts.newline = histogram.dominant();
        facts.histogram = histogram;
        facts.ends_with_newline = text.ends_with(['\n', '\r']);

        tracing::trace!(path = %ctx.path(), lines = lines.len(), "Read file image");
        ctx.views_mut().image = Some(FileImageView { lines });
        ctx.set_status(ContentStatus::Ok);
    }
}
