use std::path::{Path, PathBuf};

use colored::Colorize;
use quizbank_core::merge::load_collection;
use quizbank_core::plan::DEFAULT_DATA_DIR;
use serde::Serialize;

use crate::prelude::*;
use crate::prelude::println;

#[derive(Debug, clap::Parser)]
#[command(name = "summary")]
#[command(about = "List the collections found in a data directory")]
pub struct App {
    /// Directory to scan for `*.json` collections
    #[arg(env = "QUIZBANK_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "questions", rename_all = "snake_case")]
enum FileStatus {
    Questions(usize),
    InvalidStructure,
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct FileSummary {
    name: String,
    #[serde(flatten)]
    status: FileStatus,
}

/// Every `*.json` file directly under `dir`, sorted by name.
fn summarize(dir: &Path) -> Result<Vec<FileSummary>> {
    let entries = std::fs::read_dir(dir)
        .wrap_err_with(|| f!("Failed to list {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    Ok(paths
        .iter()
        .map(|path| {
            let status = match std::fs::read_to_string(path) {
                Err(e) => {
                    log::debug!("cannot read {}: {}", path.display(), e);
                    FileStatus::Unreadable
                }
                Ok(raw) => match load_collection(&raw) {
                    Ok(data) => FileStatus::Questions(data.quiz.questions.len()),
                    Err(e) => {
                        log::debug!("{}: {}", path.display(), e);
                        FileStatus::InvalidStructure
                    }
                },
            };
            FileSummary {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                status,
            }
        })
        .collect())
}

pub fn run(app: App, _global: crate::Global) -> Result<()> {
    let files = summarize(&app.dir)?;

    if app.json {
        std::println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if files.is_empty() {
        println!("No collections found in {}", app.dir.display());
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "File".bold().cyan(),
        "Questions".bold().cyan()
    ]);
    for file in &files {
        let status = match file.status {
            FileStatus::Questions(count) => count.to_string().green(),
            FileStatus::InvalidStructure => "invalid structure".bright_yellow(),
            FileStatus::Unreadable => "unreadable".red(),
        };
        table.add_row(prettytable::row![file.name.bright_white(), status]);
    }
    table.printstd();

    Ok(())
}
