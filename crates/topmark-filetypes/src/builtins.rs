//! Built-in file-type catalogue
//!
//! Each family shares a comment syntax; the processor binding for every
//! name lives in `topmark-processors`.

use std::path::Path;
use std::sync::Arc;

use regex::Regex;

use crate::filetype::{ContentGate, FileType, HeaderPolicy};
use crate::probes;

/// PEP 263 encoding declaration.
const PYTHON_ENCODING: &str = r"^[ \t\f]*#.*?coding[:=][ \t]*[-_.a-zA-Z0-9]+";

/// Names of built-in types bound to the `#` line-comment processor.
pub const POUND_TYPES: &[&str] = &[
    "codeowners",
    "cmake",
    "dockerfile",
    "editorconfig",
    "elixir",
    "env",
    "gitignore",
    "julia",
    "makefile",
    "perl",
    "powershell",
    "properties",
    "python",
    "python-requirements",
    "r",
    "ruby",
    "shell",
    "terraform",
    "toml",
    "yaml",
];

/// Names of built-in types bound to the `//` line-comment processor.
pub const SLASH_TYPES: &[&str] = &[
    "c",
    "cpp",
    "csharp",
    "dart",
    "go",
    "groovy",
    "java",
    "javascript",
    "jsonc",
    "kotlin",
    "protobuf",
    "rust",
    "scala",
    "swift",
    "typescript",
];

/// Names bound to the `--` line-comment processor.
pub const DASH_TYPES: &[&str] = &["haskell", "lua", "sql"];

/// Names bound to the `;` line-comment processor.
pub const SEMICOLON_TYPES: &[&str] = &["clojure", "ini", "lisp"];

/// Names bound to the `%` line-comment processor.
pub const PERCENT_TYPES: &[&str] = &["erlang", "tex"];

/// Names bound to the `/* */` block-comment processor.
pub const CBLOCK_TYPES: &[&str] = &["css", "less", "scss"];

/// Names bound to the XML processor.
pub const XML_TYPES: &[&str] = &["html", "svg", "xml"];

/// Names bound to the Markdown processor.
pub const MARKDOWN_TYPES: &[&str] = &["markdown"];

fn with_shebang() -> HeaderPolicy {
    HeaderPolicy {
        supports_shebang: true,
        ..HeaderPolicy::default()
    }
}

fn shebang_probe(interpreters: &'static [&'static str]) -> crate::ContentMatcher {
    Arc::new(move |path: &Path| probes::shebang_mentions(path, interpreters))
}

fn patterned(file_type: FileType, patterns: &[&str]) -> FileType {
    file_type
        .with_patterns(patterns.iter().copied())
        .expect("built-in file type patterns are valid")
}

fn typed(name: &str, description: &str, extensions: &[&str]) -> FileType {
    FileType::new(name, description).with_extensions(extensions.iter().copied())
}

fn pound_types() -> Vec<FileType> {
    let python_policy = HeaderPolicy {
        supports_shebang: true,
        encoding_line: Some(Regex::new(PYTHON_ENCODING).expect("encoding regex is valid")),
        ..HeaderPolicy::default()
    };
    vec![
        typed("python", "Python source", &[".py", ".pyi", ".pyw"])
            .with_header_policy(python_policy)
            .with_content_matcher(ContentGate::IfNone, shebang_probe(&["python"])),
        patterned(
            FileType::new("python-requirements", "pip requirements file"),
            &[r"requirements.*\.(txt|in)", r"constraints.*\.txt"],
        ),
        typed("shell", "POSIX shell script", &[".sh", ".bash", ".zsh", ".ksh"])
            .with_filenames([".bashrc", ".bash_profile", ".zshrc", ".profile"])
            .with_header_policy(with_shebang())
            .with_content_matcher(
                ContentGate::IfNone,
                shebang_probe(&["sh", "bash", "zsh", "ksh", "dash"]),
            ),
        typed("ruby", "Ruby source", &[".rb", ".rake", ".gemspec"])
            .with_filenames(["Gemfile", "Rakefile"])
            .with_header_policy(with_shebang())
            .with_content_matcher(ContentGate::IfNone, shebang_probe(&["ruby"])),
        typed("perl", "Perl source", &[".pl", ".pm"])
            .with_header_policy(with_shebang())
            .with_content_matcher(ContentGate::IfNone, shebang_probe(&["perl"])),
        typed("r", "R source", &[".r", ".R"]).with_header_policy(with_shebang()),
        typed("julia", "Julia source", &[".jl"]).with_header_policy(with_shebang()),
        typed("toml", "TOML document", &[".toml"]),
        typed("yaml", "YAML document", &[".yaml", ".yml"]),
        patterned(
            typed("dockerfile", "Dockerfile", &[".dockerfile"]).with_filenames(["Dockerfile"]),
            &[r"Dockerfile\..+"],
        ),
        typed("makefile", "Makefile", &[".mk"]).with_filenames([
            "Makefile",
            "GNUmakefile",
            "makefile",
        ]),
        typed("cmake", "CMake script", &[".cmake"]).with_filenames(["CMakeLists.txt"]),
        patterned(
            FileType::new("env", "dotenv file").with_filenames([".env"]),
            &[r"\.env\..+"],
        ),
        FileType::new("gitignore", "Ignore file").with_filenames([
            ".gitignore",
            ".dockerignore",
            ".gitattributes",
        ]),
        FileType::new("editorconfig", "EditorConfig").with_filenames([".editorconfig"]),
        FileType::new("codeowners", "CODEOWNERS").with_filenames([
            ".github/CODEOWNERS",
            "docs/CODEOWNERS",
            "CODEOWNERS",
        ]),
        typed("powershell", "PowerShell script", &[".ps1", ".psm1"]),
        typed("elixir", "Elixir source", &[".ex", ".exs"]),
        typed("terraform", "Terraform configuration", &[".tf", ".tfvars"]),
        typed("properties", "Java properties", &[".properties"]),
    ]
}

fn slash_types() -> Vec<FileType> {
    vec![
        typed("rust", "Rust source", &[".rs"]),
        typed("c", "C source", &[".c", ".h"]),
        typed("cpp", "C++ source", &[".cpp", ".cc", ".cxx", ".hpp", ".hh", ".hxx"]),
        typed("csharp", "C# source", &[".cs"]),
        typed("java", "Java source", &[".java"]),
        typed("kotlin", "Kotlin source", &[".kt", ".kts"]),
        typed("scala", "Scala source", &[".scala", ".sc"]),
        typed("go", "Go source", &[".go"]),
        typed("javascript", "JavaScript source", &[".js", ".mjs", ".cjs", ".jsx"]),
        typed("typescript", "TypeScript source", &[".ts", ".tsx", ".mts", ".cts"]),
        typed("swift", "Swift source", &[".swift"]),
        typed("dart", "Dart source", &[".dart"]),
        typed("groovy", "Groovy source", &[".groovy", ".gradle"]),
        typed("protobuf", "Protocol Buffers schema", &[".proto"]),
        // Overlays plain JSON; only files that actually carry comments qualify
        typed("jsonc", "JSON with comments", &[".jsonc", ".json"])
            .with_filenames(["tsconfig.json", "jsconfig.json", ".vscode/settings.json"])
            .with_content_matcher(
                ContentGate::IfExtension,
                Arc::new(|path: &Path| {
                    path.extension().is_some_and(|ext| ext == "jsonc")
                        || probes::json_has_comments(path)
                }),
            ),
    ]
}

fn other_line_types() -> Vec<FileType> {
    vec![
        typed("sql", "SQL script", &[".sql"]),
        typed("lua", "Lua source", &[".lua"]),
        typed("haskell", "Haskell source", &[".hs"]),
        typed("ini", "INI configuration", &[".ini"]),
        typed("lisp", "Lisp source", &[".lisp", ".el", ".scm"]),
        typed("clojure", "Clojure source", &[".clj", ".cljs", ".cljc", ".edn"]),
        typed("tex", "TeX document", &[".tex", ".sty", ".cls"]),
        typed("erlang", "Erlang source", &[".erl", ".hrl"]),
    ]
}

fn block_types() -> Vec<FileType> {
    vec![
        typed("css", "CSS stylesheet", &[".css"]),
        typed("scss", "Sass stylesheet", &[".scss"]),
        typed("less", "Less stylesheet", &[".less"]),
    ]
}

fn markup_types() -> Vec<FileType> {
    let xml_check: crate::PreInsertChecker = Arc::new(probes::xml_insert_check);
    vec![
        typed("xml", "XML document", &[".xml", ".xsd", ".xsl", ".xslt", ".plist"])
            .with_pre_insert_checker(xml_check.clone()),
        typed("svg", "SVG image", &[".svg"]).with_pre_insert_checker(xml_check.clone()),
        typed("html", "HTML document", &[".html", ".htm", ".xhtml"])
            .with_pre_insert_checker(xml_check),
        typed("markdown", "Markdown document", &[".md", ".markdown"]),
    ]
}

fn recognized_only() -> Vec<FileType> {
    vec![
        typed("json", "JSON document", &[".json"]).skipping_processing(),
        typed("text", "Plain text", &[".txt"]).skipping_processing(),
        patterned(
            FileType::new("license", "License text"),
            &[r"(LICENSE|LICENCE|COPYING)(-[A-Za-z0-9.]+)?(\.(md|txt))?"],
        )
        .skipping_processing(),
        FileType::new("lockfile", "Dependency lockfile")
            .with_filenames([
                "Cargo.lock",
                "package-lock.json",
                "yarn.lock",
                "pnpm-lock.yaml",
                "poetry.lock",
                "Gemfile.lock",
                "uv.lock",
            ])
            .skipping_processing(),
    ]
}

/// The full built-in catalogue.
pub fn builtin_file_types() -> Vec<FileType> {
    let mut types = pound_types();
    types.extend(slash_types());
    types.extend(other_line_types());
    types.extend(block_types());
    types.extend(markup_types());
    types.extend(recognized_only());
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_every_processable_builtin_has_a_family() {
        let families: BTreeSet<&str> = [
            POUND_TYPES,
            SLASH_TYPES,
            DASH_TYPES,
            SEMICOLON_TYPES,
            PERCENT_TYPES,
            CBLOCK_TYPES,
            XML_TYPES,
            MARKDOWN_TYPES,
        ]
        .concat()
        .into_iter()
        .collect();
        for ft in builtin_file_types() {
            assert_eq!(
                families.contains(ft.name.as_str()),
                !ft.skip_processing,
                "family membership mismatch for {}",
                ft.name
            );
        }
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let types = builtin_file_types();
        let names: BTreeSet<&str> = types.iter().map(|ft| ft.name.as_str()).collect();
        assert_eq!(names.len(), types.len());
    }

    #[test]
    fn test_python_encoding_line() {
        let types = builtin_file_types();
        let python = types.iter().find(|ft| ft.name == "python").unwrap();
        let encoding = python.header_policy.encoding_line.as_ref().unwrap();
        assert!(encoding.is_match("# -*- coding: utf-8 -*-\n"));
        assert!(!encoding.is_match("print('coding: x')\n"));
    }
}
