use std::path::{Path, PathBuf};

use colored::Colorize;
use quizbank_core::merge::{load_collection, merge_collections, NamedSource, SourceReport};
use quizbank_core::plan::MergePlan;
use serde::Serialize;

use crate::prelude::*;
use crate::prelude::println;
use crate::store::write_collection;

#[derive(Debug, clap::Parser)]
#[command(name = "merge")]
#[command(about = "Merge several collections into one, renumbering questions")]
pub struct App {
    /// Collections to merge, in order [default: the plan's sources]
    sources: Vec<PathBuf>,

    /// Merged collection file [default: the plan's output]
    #[arg(short, long, env = "QUIZBANK_OUTPUT")]
    output: Option<PathBuf>,

    /// Directory the plan's sources and output are relative to
    #[arg(long, env = "QUIZBANK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// TOML merge plan
    #[arg(long, env = "QUIZBANK_PLAN")]
    plan: Option<PathBuf>,

    /// Title of the merged collection
    #[arg(long)]
    title: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// A source left out of the merge and why.
#[derive(Debug, Clone, Serialize)]
struct SkippedSource {
    path: String,
    reason: String,
}

#[derive(Debug, Serialize)]
struct MergeOutput {
    output: String,
    total: usize,
    duplicate_codes: usize,
    sources: Vec<SourceReport>,
    skipped: Vec<SkippedSource>,
}

/// Plan file (or defaults) with command line values applied on top.
fn resolve_plan(app: &App) -> Result<MergePlan> {
    let mut plan = match &app.plan {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .wrap_err_with(|| f!("Failed to read merge plan {}", path.display()))?;
            MergePlan::from_toml_str(&raw)
                .wrap_err_with(|| f!("Invalid merge plan {}", path.display()))?
        }
        None => MergePlan::default(),
    };

    if let Some(data_dir) = &app.data_dir {
        plan.data_dir = data_dir.clone();
    }
    if let Some(title) = &app.title {
        plan.title = title.clone();
    }

    Ok(plan)
}

/// Source files to read, in merge order.
fn source_paths(app: &App, plan: &MergePlan) -> Vec<PathBuf> {
    if app.sources.is_empty() {
        plan.source_paths()
    } else {
        app.sources.clone()
    }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load every readable, well-formed source. The others are reported back
/// instead of failing the merge.
fn load_sources(paths: &[PathBuf]) -> (Vec<NamedSource>, Vec<SkippedSource>) {
    let mut sources = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();

    for path in paths {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| load_collection(&raw).map_err(|e| e.to_string()));

        match loaded {
            Ok(data) => {
                log::info!(
                    "{}: {} questions",
                    source_name(path),
                    data.quiz.questions.len()
                );
                sources.push(NamedSource::new(source_name(path), data));
            }
            Err(reason) => {
                log::warn!("skipping {}: {}", path.display(), reason);
                skipped.push(SkippedSource {
                    path: path.display().to_string(),
                    reason,
                });
            }
        }
    }

    (sources, skipped)
}

pub fn run(app: App, _global: crate::Global) -> Result<()> {
    let plan = resolve_plan(&app)?;
    let paths = source_paths(&app, &plan);
    let output_path = app.output.clone().unwrap_or_else(|| plan.output_path());

    let (sources, skipped) = load_sources(&paths);
    let outcome = merge_collections(sources, plan.title.as_str());

    if !outcome.codes_unique() {
        log::warn!("{} duplicated codes detected", outcome.duplicate_codes);
    }

    write_collection(&output_path, &outcome.data)?;

    let output = MergeOutput {
        output: output_path.display().to_string(),
        total: outcome.total(),
        duplicate_codes: outcome.duplicate_codes,
        sources: outcome.sources,
        skipped,
    };

    if app.json {
        std::println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Source".bold().cyan(),
        "Questions".bold().cyan(),
        "Ids".bold().cyan()
    ]);
    for source in &output.sources {
        let ids = source
            .id_range
            .map(|(first, last)| f!("{first}..={last}"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(prettytable::row![
            source.name.bright_white(),
            source.questions.to_string().green(),
            ids.bright_black()
        ]);
    }
    for source in &output.skipped {
        table.add_row(prettytable::row![
            source.path.bright_white(),
            "skipped".bright_yellow(),
            source.reason.bright_black()
        ]);
    }
    table.printstd();

    println!(
        "{} {} questions into {}",
        "Merged".green().bold(),
        output.total.to_string().bright_white(),
        output.output
    );
    if output.duplicate_codes == 0 {
        println!("{}", "All codes are unique".green());
    } else {
        println!(
            "{}",
            f!("{} duplicated codes detected", output.duplicate_codes).bright_yellow()
        );
    }

    Ok(())
}
