//! Filetypes command implementation

use colored::Colorize;
use serde::Serialize;
use topmark_core::Registry;

use super::EXIT_OK;
use crate::error::Result;

/// One catalogue entry as reported to the user.
#[derive(Debug, Serialize)]
struct FileTypeRow {
    name: String,
    description: String,
    extensions: Vec<String>,
    filenames: Vec<String>,
    skip_processing: bool,
    processor: Option<String>,
}

fn rows(registry: &Registry) -> Vec<FileTypeRow> {
    registry
        .file_types
        .entries()
        .into_iter()
        .map(|ft| FileTypeRow {
            processor: registry.processor_for(&ft.name).map(|p| p.name().to_string()),
            name: ft.name.clone(),
            description: ft.description.clone(),
            extensions: ft.extensions.clone(),
            filenames: ft.filenames.clone(),
            skip_processing: ft.skip_processing,
        })
        .collect()
}

/// List every registered file type with its processor binding.
pub fn run_filetypes(json: bool) -> Result<i32> {
    let rows = rows(&Registry::builtin());
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(EXIT_OK);
    }

    println!("{}", "File Types".bold());
    println!();
    for row in &rows {
        let processor = match (&row.processor, row.skip_processing) {
            (_, true) => "headers unsupported".dimmed(),
            (Some(name), false) => name.as_str().cyan(),
            (None, false) => "no processor".yellow(),
        };
        let mut rules = row.extensions.clone();
        rules.extend(row.filenames.iter().cloned());
        println!(
            "  {} {} ({}) {}",
            "+".green(),
            row.name,
            processor,
            rules.join(" ").as_str().dimmed()
        );
    }
    println!();
    println!("{} file types", rows.len());
    Ok(EXIT_OK)
}
