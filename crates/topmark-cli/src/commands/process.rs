//! Check, strip, and probe command implementations
//!
//! All three run a core pipeline over every collected file and report
//! one line (or one JSON object) per file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::{ColoredString, Colorize};
use topmark_core::config::HeaderFormat;
use topmark_core::{
    Config, FileReport, MutableConfig, MutablePolicy, Outcome, Pipeline, ProcessingContext,
    Registry,
};
use topmark_fs::{NormalizedPath, WriteMode};

use super::{EXIT_CHANGES, EXIT_FAILURE, EXIT_OK};
use crate::cli::{ConfigArgs, FormatArg, RunArgs, WriteModeArg};
use crate::error::Result;
use crate::files;

/// Load the configuration file, if any, and apply flag overrides.
pub fn load_config(path: Option<&Path>, overrides: &ConfigArgs, apply: bool) -> Result<Config> {
    let mut config = match path {
        Some(path) => MutableConfig::load(&NormalizedPath::new(path))?,
        None => MutableConfig::default(),
    };
    apply_overrides(&mut config, overrides);
    config.apply_changes = apply;
    Ok(config.freeze()?)
}

fn apply_overrides(config: &mut MutableConfig, args: &ConfigArgs) {
    if !args.fields.is_empty() {
        config.header.fields = Some(args.fields.clone());
    }
    config.fields.extend(args.values.iter().cloned());
    if let Some(root) = &args.relative_to {
        config.header.relative_to = Some(root.clone());
    }
    config
        .files
        .include_file_types
        .extend(args.include_file_types.iter().cloned());
    config
        .files
        .exclude_file_types
        .extend(args.exclude_file_types.iter().cloned());

    let flag = |set: bool| set.then_some(true);
    let overlay = MutablePolicy {
        add_only: flag(args.add_only),
        update_only: flag(args.update_only),
        allow_header_in_empty_files: flag(args.allow_empty),
        allow_reflow: flag(args.allow_reflow),
        ..MutablePolicy::default()
    };
    config.policy.merge(&overlay);
    if args.add_only {
        config.policy.update_only = Some(false);
    }
    if args.update_only {
        config.policy.add_only = Some(false);
    }

    if let Some(format) = args.format {
        config.header.format = Some(match format {
            FormatArg::Native => HeaderFormat::Native,
            FormatArg::Plain => HeaderFormat::Plain,
        });
    }
    if let Some(mode) = args.write_mode {
        config.writer.mode = Some(match mode {
            WriteModeArg::Atomic => WriteMode::Atomic,
            WriteModeArg::InPlace => WriteMode::InPlace,
            WriteModeArg::Stdout => WriteMode::Stdout,
        });
    }
}

/// Run `check` or `strip` and return the process exit code.
pub fn run_pipeline(pipeline: Pipeline, config_path: Option<&Path>, args: &RunArgs) -> Result<i32> {
    let config = Arc::new(load_config(config_path, &args.config, args.apply)?);
    let reports = process(pipeline, &args.paths, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report, args.diff);
        }
        print_summary(&reports);
    }

    let failed = reports.iter().any(|r| r.outcome.is_failure());
    let pending = reports.iter().any(|r| r.outcome.is_pending_change());
    if failed {
        return Ok(EXIT_FAILURE);
    }
    if pending {
        if !args.json {
            println!();
            println!(
                "Run {} to write these changes.",
                format!("topmark {pipeline} --apply").as_str().cyan()
            );
        }
        return Ok(EXIT_CHANGES);
    }
    Ok(EXIT_OK)
}

/// Run the probe pipeline and describe what was found.
pub fn run_probe(
    config_path: Option<&Path>,
    paths: &[PathBuf],
    overrides: &ConfigArgs,
    json: bool,
) -> Result<i32> {
    let config = Arc::new(load_config(config_path, overrides, false)?);
    let runner = Pipeline::Probe.runner(Arc::new(Registry::builtin()));

    let mut reports = Vec::new();
    for path in files::collect(paths)? {
        let ctx = runner.process(path.as_path(), Arc::clone(&config));
        if !json {
            print_probe(&path, &ctx);
        }
        reports.push(FileReport::from_context(&ctx));
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let failed = reports.iter().any(|r| r.outcome.is_failure());
    Ok(if failed { EXIT_FAILURE } else { EXIT_OK })
}

fn process(pipeline: Pipeline, paths: &[PathBuf], config: &Arc<Config>) -> Result<Vec<FileReport>> {
    let runner = pipeline.runner(Arc::new(Registry::builtin()));
    let files = files::collect(paths)?;
    tracing::debug!(pipeline = %pipeline, files = files.len(), "Running pipeline");
    Ok(files
        .iter()
        .map(|path| FileReport::from_context(&runner.process(path.as_path(), Arc::clone(config))))
        .collect())
}

fn styled(outcome: &Outcome) -> ColoredString {
    let padded = format!("{:>13}", outcome.label());
    let label = padded.as_str();
    match outcome {
        Outcome::Inserted | Outcome::Replaced | Outcome::Stripped => label.green().bold(),
        Outcome::WouldInsert | Outcome::WouldReplace | Outcome::WouldStrip => label.yellow().bold(),
        Outcome::Failed { .. } => label.red().bold(),
        Outcome::Previewed | Outcome::Inspected => label.cyan(),
        Outcome::Unchanged | Outcome::Skipped { .. } | Outcome::Unsupported { .. } => label.dimmed(),
    }
}

fn print_report(report: &FileReport, show_diff: bool) {
    let path = files::display(Path::new(report.path.as_str()));
    match report.outcome.reason() {
        Some(reason) => println!(
            "{} {} {}",
            styled(&report.outcome),
            path,
            format!("({reason})").as_str().dimmed()
        ),
        None => println!("{} {}", styled(&report.outcome), path),
    }
    for hint in report.hints.iter() {
        println!("{} {}", format!("{:>13}", "hint").as_str().blue(), hint.message);
    }
    if show_diff {
        if let Some(diff) = &report.diff {
            print!("{diff}");
        }
    }
}

fn print_summary(reports: &[FileReport]) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for report in reports {
        *counts.entry(report.outcome.label()).or_default() += 1;
    }
    let parts: Vec<String> = counts
        .iter()
        .map(|(label, count)| format!("{count} {label}"))
        .collect();
    println!();
    println!(
        "{} {} file(s): {}",
        "=>".blue().bold(),
        reports.len(),
        if parts.is_empty() {
            "nothing to do".to_string()
        } else {
            parts.join(", ")
        }
    );
}

fn print_probe(path: &Path, ctx: &ProcessingContext) {
    let status = ctx.status();
    println!(
        "{} {}",
        files::display(path).as_str().bold(),
        ctx.file_type_name().unwrap_or("-").cyan()
    );
    println!(
        "   resolve={} fs={} content={} header={}",
        status.resolve, status.fs, status.content, status.header
    );
    if let Some(header) = &ctx.views().header {
        for (key, value) in header.fields.iter() {
            println!("   {} {}: {}", "+".green(), key, value);
        }
    }
    if let Some(halt) = ctx.halt() {
        println!("   {} {} ({})", "halted".yellow(), halt.reason, halt.step);
    }
}
