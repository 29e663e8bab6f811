use std::path::PathBuf;

use colored::Colorize;
use quizbank_core::verify::{verify_collection, VerifyReport};
use serde::Serialize;

use crate::prelude::*;
use crate::prelude::println;
use crate::store::read_collection;

#[derive(Debug, clap::Parser)]
#[command(name = "verify")]
#[command(about = "Print health statistics for a collection")]
pub struct App {
    /// Collection file to check
    file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Exit with an error when the collection is not healthy
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Serialize)]
struct VerifyOutput<'a> {
    file: String,
    healthy: bool,
    #[serde(flatten)]
    report: &'a VerifyReport,
}

/// Human readable list of what makes `report` unhealthy.
fn problems(report: &VerifyReport) -> Vec<String> {
    let mut problems = Vec::new();

    if report.unique_ids != report.total {
        problems.push(f!(
            "{} duplicated ids",
            report.total - report.unique_ids
        ));
    }
    if !report.ids_contiguous {
        problems.push(f!("ids are not 1..={}", report.total));
    }
    if report.with_answers != report.total {
        problems.push(f!(
            "{} questions without correct answers",
            report.total - report.with_answers
        ));
    }
    if !report.type_mismatches.is_empty() {
        problems.push(f!(
            "type disagrees with answers for ids {:?}",
            report.type_mismatches
        ));
    }

    problems
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value {
        "yes".green()
    } else {
        "no".red()
    }
}

pub fn run(app: App, _global: crate::Global) -> Result<()> {
    let data = read_collection(&app.file)?;
    let report = verify_collection(&data.quiz);
    let healthy = report.is_healthy();

    if app.json {
        let output = VerifyOutput {
            file: app.file.display().to_string(),
            healthy,
            report: &report,
        };
        std::println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let mut table = new_table();
        table.add_row(prettytable::row!["Total questions", report.total]);
        table.add_row(prettytable::row!["Single choice", report.single]);
        table.add_row(prettytable::row!["Multiple choice", report.multiple]);
        table.add_row(prettytable::row!["Unique codes", report.unique_codes]);
        table.add_row(prettytable::row!["Unique ids", report.unique_ids]);
        table.add_row(prettytable::row![
            f!("Contiguous ids (1..={})", report.total),
            yes_no(report.ids_contiguous)
        ]);
        table.add_row(prettytable::row!["With correct answers", report.with_answers]);
        table.add_row(prettytable::row![
            "Code sample",
            report.sample_codes.join(", ").bright_black()
        ]);
        table.printstd();

        if healthy {
            println!("{}", "Collection is healthy".green().bold());
        } else {
            for problem in problems(&report) {
                println!("{} {}", "!".bright_yellow().bold(), problem);
            }
        }
    }

    if app.strict && !healthy {
        return Err(Error::Unhealthy {
            path: app.file.display().to_string(),
            problems: problems(&report).join("; "),
        }
        .into());
    }

    Ok(())
}
