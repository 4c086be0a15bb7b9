//! Cheap byte-level classification before a full read

use std::fs::File;
use std::io::{self, Read};

use topmark_fs::NewlineCounter;

use crate::context::{HintContext, ProcessingContext, StepContext};
use crate::status::{Axis, FsStatus, ResolveStatus};
use crate::steps::Step;

/// Bytes inspected at most.
pub const SNIFF_LIMIT: usize = 64 * 1024;
const CHUNK_SIZE: usize = 4 * 1024;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rejects files the pipeline must not touch: binaries, invalid UTF-8,
/// a BOM in front of a shebang, and mixed line endings.
#[derive(Debug, Default)]
pub struct SnifferStep;

impl Step for SnifferStep {
    fn name(&self) -> &'static str {
        "sniffer"
    }

    fn axes_written(&self) -> &'static [Axis] {
        &[Axis::Fs]
    }

    fn may_proceed(&self, ctx: &ProcessingContext) -> bool {
        ctx.status().resolve == ResolveStatus::Resolved
    }

    fn run(&self, ctx: &mut StepContext<'_>) {
        let native = ctx.path().to_native();
        let file = match File::open(&native) {
            Ok(file) => file,
            Err(err) => return record_io_failure(ctx, &err),
        };
        let byte_len = file.metadata().map(|m| m.len()).unwrap_or_default();

        let mut reader = file.take(SNIFF_LIMIT as u64);
        let mut buf = [0u8; CHUNK_SIZE];
        let mut head: Vec<u8> = Vec::with_capacity(5);
        let mut pending_utf8: Vec<u8> = Vec::new();
        let mut newlines = NewlineCounter::new();
        let mut total = 0usize;

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return record_io_failure(ctx, &err),
            };
            let chunk = &buf[..n];
            total += n;

            if head.len() < 5 {
                let take = (5 - head.len()).min(n);
                head.extend_from_slice(&chunk[..take]);
            }

            if let Some(offset) = chunk.iter().position(|b| *b == 0) {
                ctx.set_status(FsStatus::Binary);
                ctx.info(format!("NUL byte at offset {}", total - n + offset));
                ctx.request_halt("binary file");
                return;
            }

            // Incomplete multi-byte sequences carry over to the next chunk
            pending_utf8.extend_from_slice(chunk);
            let decoded = std::str::from_utf8(&pending_utf8).map(|_| ());
            match decoded {
                Ok(()) => pending_utf8.clear(),
                Err(err) if err.error_len().is_none() => {
                    pending_utf8.drain(..err.valid_up_to());
                }
                Err(err) => {
                    let offset = total - pending_utf8.len() + err.valid_up_to();
                    ctx.set_status(FsStatus::InvalidEncoding);
                    ctx.error(format!("invalid UTF-8 at byte offset {offset}"));
                    ctx.request_halt("invalid encoding");
                    return;
                }
            }

            newlines.feed(chunk);
        }

        let reached_eof = total as u64 >= byte_len;
        if reached_eof && !pending_utf8.is_empty() {
            ctx.set_status(FsStatus::InvalidEncoding);
            ctx.error("truncated UTF-8 sequence at end of file");
            ctx.request_halt("invalid encoding");
            return;
        }

        if total == 0 {
            ctx.set_status(FsStatus::Empty);
            ctx.facts_mut().byte_len = 0;
            if !ctx.policy().allow_header_in_empty_files {
                ctx.request_halt("empty file");
            }
            return;
        }

        let has_bom = head.starts_with(UTF8_BOM);
        let supports_shebang = ctx.header_policy().is_some_and(|p| p.supports_shebang);
        if has_bom && head[UTF8_BOM.len()..].starts_with(b"#!") && supports_shebang {
            ctx.set_status(FsStatus::BomBeforeShebang);
            ctx.warn("a byte order mark precedes the shebang; the file is left untouched");
            ctx.request_halt("BOM before shebang");
            return;
        }

        // A trailing CR at the sniff limit may still open a CRLF pair
        let histogram = if reached_eof {
            newlines.finish()
        } else {
            newlines.snapshot()
        };
        if histogram.is_mixed() {
            ctx.set_status(FsStatus::MixedLineEndings);
            ctx.warn(format!(
                "mixed line endings (lf={}, crlf={}, cr={})",
                histogram.lf, histogram.crlf, histogram.cr
            ));
            ctx.request_halt("mixed line endings");
            return;
        }

        let facts = ctx.facts_mut();
        facts.byte_len = byte_len;
        facts.has_bom = has_bom;
        facts.newline = histogram.dominant();
        facts.histogram = histogram;
        ctx.set_status(FsStatus::Ok);
    }

    fn hint(&self, ctx: &mut HintContext<'_>) {
        if ctx.status().fs == FsStatus::Empty && !ctx.policy().allow_header_in_empty_files {
            let scope = ctx.file_type_name().unwrap_or("<type>").to_string();
            ctx.hint(
                Axis::Fs,
                "empty_file_skipped",
                format!(
                    "set allow_header_in_empty_files = true under [policy_by_type.{scope}] to add headers to empty files"
                ),
            );
        }
    }
}

fn record_io_failure(ctx: &mut StepContext<'_>, err: &io::Error) {
    let status = match err.kind() {
        io::ErrorKind::NotFound => FsStatus::NotFound,
        io::ErrorKind::PermissionDenied => FsStatus::NoReadPermission,
        _ => FsStatus::Unreadable,
    };
    ctx.set_status(status);
    ctx.error(format!("cannot read file: {err}"));
    ctx.request_halt(status.label());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::registry::Registry;
    use crate::steps::ResolverStep;
    use std::sync::Arc;
    use topmark_fs::NewlineStyle;

    fn sniff(name: &str, content: &[u8]) -> ProcessingContext {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();

        let mut ctx = ProcessingContext::bootstrap(path.as_path(), Arc::new(Config::default()));
        let steps: [Box<dyn Step>; 2] = [
            Box::new(ResolverStep::new(Arc::new(Registry::builtin()))),
            Box::new(SnifferStep),
        ];
        for step in &steps {
            step.run(&mut StepContext::new(&mut ctx, step.name(), step.axes_written()));
        }
        ctx
    }

    #[test]
    fn test_plain_file_is_ok() {
        let ctx = sniff("a.py", b"print('hi')\r\n");
        assert_eq!(ctx.status().fs, FsStatus::Ok);
        assert_eq!(ctx.facts().newline, NewlineStyle::CrLf);
        assert_eq!(ctx.facts().byte_len, 13);
    }

    #[test]
    fn test_nul_byte_is_binary() {
        let ctx = sniff("a.py", b"abc\0def");
        assert_eq!(ctx.status().fs, FsStatus::Binary);
        assert!(ctx.is_halted());
    }

    #[test]
    fn test_invalid_utf8() {
        let ctx = sniff("a.py", b"ok\n\xff\xfe\n");
        assert_eq!(ctx.status().fs, FsStatus::InvalidEncoding);
    }

    #[test]
    fn test_truncated_utf8_at_eof() {
        let ctx = sniff("a.py", b"caf\xc3");
        assert_eq!(ctx.status().fs, FsStatus::InvalidEncoding);
    }

    #[test]
    fn test_multibyte_char_across_chunk_boundary() {
        let mut content = vec![b'#'; CHUNK_SIZE - 1];
        content.extend_from_slice("é\n".as_bytes());
        let ctx = sniff("a.py", &content);
        assert_eq!(ctx.status().fs, FsStatus::Ok);
    }

    #[test]
    fn test_crlf_across_chunk_boundary_is_not_mixed() {
        let mut content = vec![b'x'; CHUNK_SIZE - 1];
        content.extend_from_slice(b"\r\nnext\r\n");
        let ctx = sniff("a.py", &content);
        assert_eq!(ctx.status().fs, FsStatus::Ok);
        assert_eq!(ctx.facts().histogram.crlf, 2);
    }

    #[test]
    fn test_crlf_split_at_sniff_limit_is_not_mixed() {
        let mut content = b"a\r\n".to_vec();
        content.resize(SNIFF_LIMIT - 1, b'x');
        content.extend_from_slice(b"\r\nmore\r\n");
        let ctx = sniff("a.py", &content);
        assert_eq!(ctx.status().fs, FsStatus::Ok);
        assert_eq!(ctx.facts().histogram.cr, 0);
        assert_eq!(ctx.facts().newline, NewlineStyle::CrLf);
    }

    #[test]
    fn test_bom_before_shebang() {
        let ctx = sniff("run.py", b"\xEF\xBB\xBF#!/usr/bin/env python\n");
        assert_eq!(ctx.status().fs, FsStatus::BomBeforeShebang);
        assert!(ctx.is_halted());
    }

    #[test]
    fn test_bom_without_shebang_support_is_fine() {
        let ctx = sniff("a.rs", b"\xEF\xBB\xBF#!x\n");
        assert_eq!(ctx.status().fs, FsStatus::Ok);
        assert!(ctx.facts().has_bom);
    }

    #[test]
    fn test_mixed_line_endings() {
        let ctx = sniff("a.py", b"a\nb\r\n");
        assert_eq!(ctx.status().fs, FsStatus::MixedLineEndings);
    }

    #[test]
    fn test_empty_file_halts_by_default() {
        let ctx = sniff("a.py", b"");
        assert_eq!(ctx.status().fs, FsStatus::Empty);
        assert!(ctx.is_halted());
    }

    #[test]
    fn test_missing_file() {
        let mut ctx = ProcessingContext::bootstrap("/nonexistent/x.py", Arc::new(Config::default()));
        let step = SnifferStep;
        step.run(&mut StepContext::new(&mut ctx, step.name(), step.axes_written()));
        assert_eq!(ctx.status().fs, FsStatus::NotFound);
        assert!(ctx.diagnostics().has_errors());
    }
}
