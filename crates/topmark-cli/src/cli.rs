//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// topmark - Manage metadata headers in source files
#[derive(Parser, Debug)]
#[command(name = "topmark")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true, env = "TOPMARK_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Add or update headers
    ///
    /// Without --apply nothing is written and the exit code is 2 when
    /// any file would change.
    ///
    /// Examples:
    ///   topmark check src/            # Report files that need a header
    ///   topmark check --diff src/     # Show the changes as a unified diff
    ///   topmark check --apply src/    # Write the changes
    Check(RunArgs),

    /// Remove headers
    Strip(RunArgs),

    /// Show how files resolve and what header they carry
    Probe {
        /// Files or directories to inspect
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List the known file types
    Filetypes {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Arguments shared by `check` and `strip`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Files or directories to process
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Write changes instead of previewing them
    #[arg(long)]
    pub apply: bool,

    /// Print a unified diff for every changed file
    #[arg(long)]
    pub diff: bool,

    /// Output as JSON for CI/CD integration
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Settings that override the configuration file
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Header field to render, in order (repeatable)
    #[arg(long = "field", value_name = "NAME")]
    pub fields: Vec<String>,

    /// Value of a custom field (repeatable)
    #[arg(long = "value", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub values: Vec<(String, String)>,

    /// Root for relative path fields
    #[arg(long, value_name = "DIR")]
    pub relative_to: Option<PathBuf>,

    /// Only process these file types (repeatable)
    #[arg(long = "include-type", value_name = "TYPE")]
    pub include_file_types: Vec<String>,

    /// Never process these file types (repeatable)
    #[arg(long = "exclude-type", value_name = "TYPE")]
    pub exclude_file_types: Vec<String>,

    /// Only add headers to files that have none
    #[arg(long, conflicts_with = "update_only")]
    pub add_only: bool,

    /// Only update headers that already exist
    #[arg(long)]
    pub update_only: bool,

    /// Add headers to empty files
    #[arg(long)]
    pub allow_empty: bool,

    /// Allow inserting a header that splits an existing line
    #[arg(long)]
    pub allow_reflow: bool,

    /// Header output format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// How changed files are written
    #[arg(long, value_enum)]
    pub write_mode: Option<WriteModeArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Native,
    Plain,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteModeArg {
    Atomic,
    InPlace,
    Stdout,
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in {raw:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from(["topmark"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_check_defaults_to_current_dir() {
        let cli = Cli::parse_from(["topmark", "check"]);
        match cli.command {
            Some(Commands::Check(args)) => {
                assert_eq!(args.paths, vec![PathBuf::from(".")]);
                assert!(!args.apply);
                assert_eq!(args.config, ConfigArgs::default());
            }
            other => panic!("Expected Check command, got {:?}", other),
        }
    }

    #[test]
    fn parse_check_with_overrides() {
        let cli = Cli::parse_from([
            "topmark",
            "-v",
            "check",
            "--apply",
            "--field",
            "file",
            "--field",
            "project",
            "--value",
            "project=demo",
            "--exclude-type",
            "markdown",
            "--format",
            "plain",
            "src",
        ]);
        assert!(cli.verbose);
        let Some(Commands::Check(args)) = cli.command else {
            panic!("Expected Check command");
        };
        assert!(args.apply);
        assert_eq!(args.paths, vec![PathBuf::from("src")]);
        assert_eq!(args.config.fields, ["file", "project"]);
        assert_eq!(
            args.config.values,
            vec![("project".to_string(), "demo".to_string())]
        );
        assert_eq!(args.config.exclude_file_types, ["markdown"]);
        assert_eq!(args.config.format, Some(FormatArg::Plain));
    }

    #[test]
    fn parse_rejects_conflicting_policies() {
        let result = Cli::try_parse_from(["topmark", "check", "--add-only", "--update-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_malformed_value() {
        let result = Cli::try_parse_from(["topmark", "check", "--value", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_strip_and_filetypes() {
        let cli = Cli::parse_from(["topmark", "strip", "--diff", "a.py"]);
        assert!(matches!(cli.command, Some(Commands::Strip(RunArgs { diff: true, .. }))));

        let cli = Cli::parse_from(["topmark", "filetypes", "--json"]);
        assert_eq!(cli.command, Some(Commands::Filetypes { json: true }));
    }
}
