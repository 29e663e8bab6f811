use std::path::{Path, PathBuf};

use colored::Colorize;
use quizbank_core::merge::append_questions;
use quizbank_core::model::{Quiz, QuizData, DEFAULT_TITLE};
use quizbank_core::parser::{parse_document, parse_numbered, ParseReport, RejectedBlock};
use serde::Serialize;

use crate::prelude::*;
use crate::prelude::println;
use crate::store::{read_collection, write_collection};

#[derive(Debug, clap::Parser)]
#[command(name = "parse")]
#[command(about = "Parse a raw question text file into a JSON collection")]
pub struct App {
    /// Raw question text file (blocks separated by `////////`)
    input: PathBuf,

    /// Collection file to write
    #[arg(short, long, env = "QUIZBANK_OUTPUT")]
    output: PathBuf,

    /// Identifier of the first parsed question [default: 1, or the next
    /// free identifier with --append]
    #[arg(long)]
    start_id: Option<u32>,

    /// Collection title (ignored with --append)
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Extend the collection in OUTPUT instead of replacing it
    #[arg(long)]
    append: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ParseOutput {
    input: String,
    output: String,
    accepted: usize,
    rejected: Vec<RejectedBlock>,
    ids: Option<(u32, u32)>,
    next_id: u32,
    total: usize,
}

/// Parse `raw` and fold the result into `existing`, or into a new collection
/// titled `title` when there is none.
fn build_collection(
    raw: &str,
    existing: Option<QuizData>,
    start_id: Option<u32>,
    title: &str,
) -> (QuizData, ParseReport) {
    match existing {
        Some(mut data) => {
            let first_id = start_id.or_else(|| data.quiz.next_free_id());
            let report = parse_numbered(raw, first_id);
            append_questions(&mut data, report.questions.clone());
            (data, report)
        }
        None => {
            let report = parse_document(raw, start_id.unwrap_or(1));
            let data = QuizData::new(Quiz::new(title, report.questions.clone()));
            (data, report)
        }
    }
}

fn load_existing(output: &Path, append: bool) -> Result<Option<QuizData>> {
    if !append {
        return Ok(None);
    }
    if !output.exists() {
        log::info!(
            "{} does not exist yet, starting a new collection",
            output.display()
        );
        return Ok(None);
    }
    read_collection(output).map(Some)
}

pub fn run(app: App, _global: crate::Global) -> Result<()> {
    let raw = std::fs::read_to_string(&app.input)
        .wrap_err_with(|| f!("Failed to read {}", app.input.display()))?;

    let existing = load_existing(&app.output, app.append)?;
    let (data, report) = build_collection(&raw, existing, app.start_id, &app.title);

    for rejected in &report.rejected {
        log::debug!("block {} dropped: {}", rejected.index, rejected.reason);
    }

    write_collection(&app.output, &data)?;

    let ids = report
        .questions
        .first()
        .zip(report.questions.last())
        .map(|(first, last)| (first.id, last.id));
    let output = ParseOutput {
        input: app.input.display().to_string(),
        output: app.output.display().to_string(),
        accepted: report.accepted_count(),
        rejected: report.rejected,
        ids,
        next_id: report.next_id,
        total: data.quiz.questions.len(),
    };

    if app.json {
        std::println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} questions from {}",
        "Parsed".green().bold(),
        output.accepted.to_string().bright_white(),
        output.input
    );
    if let Some((first, last)) = output.ids {
        println!("  ids {first}..={last}");
    }
    if !output.rejected.is_empty() {
        println!(
            "  {} blocks dropped (use --verbose for details)",
            output.rejected.len().to_string().bright_yellow()
        );
    }
    println!(
        "{} {} ({} questions)",
        "Wrote".green().bold(),
        output.output,
        output.total
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizbank_core::model::describe;
    use quizbank_core::parser::Rejection;

    const RAW: &str = "Quelle couleur ?\n[] Rouge XXX\n[] Bleu\nCODE1\n////////\nAutre ?\n[] A\n[] B XXX\n[] C XXX\nCODE2";

    fn app(input: PathBuf, output: PathBuf) -> App {
        App {
            input,
            output,
            start_id: None,
            title: DEFAULT_TITLE.to_string(),
            append: false,
            json: true,
        }
    }

    fn global() -> crate::Global {
        crate::Global { verbose: false }
    }

    #[test]
    fn test_new_collection_starts_at_one() {
        let (data, report) = build_collection(RAW, None, None, "Titre");

        assert_eq!(data.quiz.title, "Titre");
        assert_eq!(data.quiz.description, describe(2));
        assert_eq!(
            data.quiz.questions.iter().map(|q| q.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(report.next_id, 3);
    }

    #[test]
    fn test_append_continues_after_existing_ids() {
        let (existing, _) = build_collection(RAW, None, Some(10), "Base");
        let (data, report) =
            build_collection("Q ?\n[] Oui XXX\n[] Non\nC3", Some(existing), None, "ignored");

        assert_eq!(data.quiz.title, "Base");
        assert_eq!(
            data.quiz.questions.iter().map(|q| q.id).collect::<Vec<_>>(),
            vec![10, 11, 12]
        );
        assert_eq!(data.quiz.description, describe(3));
        assert_eq!(report.next_id, 13);
    }

    #[test]
    fn test_explicit_start_id_wins_when_appending() {
        let (existing, _) = build_collection(RAW, None, None, "Base");
        let (data, _) =
            build_collection("Q ?\n[] Oui XXX\n[] Non\nC3", Some(existing), Some(500), "Base");

        assert_eq!(data.quiz.questions.last().map(|q| q.id), Some(500));
    }

    #[test]
    fn test_append_after_u32_max_adds_nothing() {
        let (existing, _) =
            build_collection("Q ?\n[] Oui XXX\n[] Non\nC0", None, Some(u32::MAX), "Base");
        let (data, report) = build_collection(RAW, Some(existing), None, "Base");

        assert_eq!(data.quiz.questions.len(), 1);
        assert_eq!(report.accepted_count(), 0);
        assert!(report
            .rejected
            .iter()
            .all(|r| r.reason == Rejection::IdsExhausted));
    }

    #[test]
    fn test_run_writes_collection_and_records_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("questions.txt");
        let output = dir.path().join("data").join("questions.json");
        let raw = f!("{RAW}\n////////\nSans options ?\n// note\nCODE3");
        std::fs::write(&input, &raw).unwrap();

        run(app(input, output.clone()), global()).unwrap();

        let data = read_collection(&output).unwrap();
        assert_eq!(data.quiz.questions.len(), 2);
        assert_eq!(data.quiz.title, DEFAULT_TITLE);

        let (_, report) = build_collection(&raw, None, None, DEFAULT_TITLE);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].reason, Rejection::NoOptions);
    }

    #[test]
    fn test_run_append_on_missing_output_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("supp.txt");
        let output = dir.path().join("supp.json");
        std::fs::write(&input, RAW).unwrap();

        let mut first = app(input.clone(), output.clone());
        first.append = true;
        run(first, global()).unwrap();

        let mut second = app(input, output.clone());
        second.append = true;
        run(second, global()).unwrap();

        let data = read_collection(&output).unwrap();
        assert_eq!(
            data.quiz.questions.iter().map(|q| q.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(data.quiz.description, describe(4));
    }

    #[test]
    fn test_run_fails_on_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");

        let err = run(app(dir.path().join("missing.txt"), output.clone()), global())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
        assert!(!output.exists());
    }
}
