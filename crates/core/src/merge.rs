//! Collection loading, merging and appending.
//!
//! Merging concatenates collections in caller order and renumbers every
//! question so the result holds the contiguous range `1..=N`. Duplicate
//! classification codes are counted but never block the merge.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{describe, Question, Quiz, QuizData};

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid structure: missing `quiz.questions` array")]
    MissingQuestions,
    #[error("invalid question at index {index}: {message}")]
    InvalidQuestion { index: usize, message: String },
    #[error("invalid collection: {0}")]
    InvalidCollection(String),
}

/// Decode a persisted collection, checking its shape before its content so
/// a wrongly shaped file is reported as such.
pub fn load_collection(json: &str) -> Result<QuizData, CollectionError> {
    let value: Value = serde_json::from_str(json)?;

    let questions = value
        .get("quiz")
        .and_then(|quiz| quiz.get("questions"))
        .and_then(Value::as_array)
        .ok_or(CollectionError::MissingQuestions)?;

    for (index, question) in questions.iter().enumerate() {
        serde_json::from_value::<Question>(question.clone()).map_err(|e| {
            CollectionError::InvalidQuestion {
                index,
                message: e.to_string(),
            }
        })?;
    }

    serde_json::from_value(value).map_err(|e| CollectionError::InvalidCollection(e.to_string()))
}

/// A loaded collection labelled with where it came from.
#[derive(Debug, Clone)]
pub struct NamedSource {
    pub name: String,
    pub data: QuizData,
}

impl NamedSource {
    pub fn new(name: impl Into<String>, data: QuizData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub name: String,
    pub questions: usize,
    /// First and last identifier given to this source's questions.
    pub id_range: Option<(u32, u32)>,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub data: QuizData,
    pub sources: Vec<SourceReport>,
    pub duplicate_codes: usize,
}

impl MergeOutcome {
    pub fn total(&self) -> usize {
        self.data.quiz.questions.len()
    }

    pub fn codes_unique(&self) -> bool {
        self.duplicate_codes == 0
    }
}

/// Number of codes that repeat an earlier one.
///
/// Questions without a code count as the empty code.
pub fn duplicate_code_count(questions: &[Question]) -> usize {
    let distinct: HashSet<&str> = questions.iter().map(Question::code_str).collect();
    questions.len() - distinct.len()
}

/// Concatenate `sources` in order and renumber from 1.
pub fn merge_collections(sources: Vec<NamedSource>, title: impl Into<String>) -> MergeOutcome {
    let mut questions = Vec::new();
    let mut reports = Vec::with_capacity(sources.len());
    let mut next_id: u32 = 1;

    for source in sources {
        let first_id = next_id;
        let count = source.data.quiz.questions.len();

        for question in &source.data.quiz.questions {
            questions.push(question.renumbered(next_id));
            next_id += 1;
        }

        reports.push(SourceReport {
            name: source.name,
            questions: count,
            id_range: (count > 0).then(|| (first_id, next_id - 1)),
        });
    }

    let duplicate_codes = duplicate_code_count(&questions);
    let quiz = Quiz {
        title: title.into(),
        description: describe(questions.len()),
        questions,
        extra: Default::default(),
    };

    MergeOutcome {
        data: QuizData::new(quiz),
        sources: reports,
        duplicate_codes,
    }
}

/// Add freshly parsed questions to an existing collection and refresh its
/// description. Identifiers are taken as given.
pub fn append_questions(data: &mut QuizData, questions: Vec<Question>) {
    data.quiz.questions.extend(questions);
    data.quiz.refresh_description();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionType, QuizOption};
    use crate::parser::parse_document;

    fn question(id: u32, code: &str) -> Question {
        Question {
            id,
            text: format!("Question {code}"),
            kind: QuestionType::Single,
            options: vec![QuizOption::new("1", "A"), QuizOption::new("2", "B")],
            correct_answers: vec!["1".to_string()],
            code: Some(Some(code.to_string())),
            image: None,
            image_alt: None,
            extra: Default::default(),
        }
    }

    fn source(name: &str, questions: Vec<Question>) -> NamedSource {
        NamedSource::new(name, QuizData::new(Quiz::new("Source", questions)))
    }

    fn ids(data: &QuizData) -> Vec<u32> {
        data.quiz.questions.iter().map(|q| q.id).collect()
    }

    fn codes(data: &QuizData) -> Vec<&str> {
        data.quiz.questions.iter().map(Question::code_str).collect()
    }

    #[test]
    fn test_merge_two_sources() {
        let a = source("a.json", vec![question(1, "A1"), question(2, "A2")]);
        let b = source(
            "b.json",
            vec![question(1, "B1"), question(2, "B2"), question(3, "B3")],
        );

        let outcome = merge_collections(vec![a, b], "Merged");

        assert_eq!(outcome.total(), 5);
        assert_eq!(ids(&outcome.data), vec![1, 2, 3, 4, 5]);
        assert_eq!(codes(&outcome.data), vec!["A1", "A2", "B1", "B2", "B3"]);
        assert_eq!(outcome.data.quiz.title, "Merged");
        assert_eq!(outcome.data.quiz.description, describe(5));
        assert!(outcome.codes_unique());
        assert_eq!(
            outcome.sources,
            vec![
                SourceReport {
                    name: "a.json".to_string(),
                    questions: 2,
                    id_range: Some((1, 2)),
                },
                SourceReport {
                    name: "b.json".to_string(),
                    questions: 3,
                    id_range: Some((3, 5)),
                },
            ]
        );
    }

    #[test]
    fn test_merge_counts_sum_and_ids_are_contiguous() {
        let sizes = [4usize, 0, 7, 1];
        let sources = sizes
            .iter()
            .enumerate()
            .map(|(s, &n)| {
                let questions = (0..n)
                    .map(|i| question(100 + i as u32, &format!("S{s}Q{i}")))
                    .collect();
                source(&format!("s{s}"), questions)
            })
            .collect();

        let outcome = merge_collections(sources, "Merged");
        let expected: Vec<u32> = (1..=12).collect();

        assert_eq!(ids(&outcome.data), expected);
        assert_eq!(outcome.sources[1].id_range, None);
        assert_eq!(outcome.sources[2].id_range, Some((5, 11)));
    }

    #[test]
    fn test_merge_single_source_only_renumbers() {
        let mut original = question(42, "X");
        original.image = Some(Some("/images/x.png".to_string()));
        original
            .extra
            .insert("explanation".to_string(), Value::String("why".to_string()));
        let second = question(43, "Y");

        let outcome = merge_collections(
            vec![source("only", vec![original.clone(), second.clone()])],
            "Merged",
        );
        let merged = &outcome.data.quiz.questions;

        assert_eq!(merged[0], Question { id: 1, ..original });
        assert_eq!(merged[1], Question { id: 2, ..second });
    }

    #[test]
    fn test_duplicate_codes_are_counted_not_rejected() {
        let a = source("a", vec![question(1, "DUP"), question(2, "X")]);
        let b = source("b", vec![question(1, "DUP"), question(2, "DUP")]);

        let outcome = merge_collections(vec![a, b], "Merged");

        assert_eq!(outcome.total(), 4);
        assert_eq!(outcome.duplicate_codes, 2);
        assert!(!outcome.codes_unique());
    }

    #[test]
    fn test_missing_codes_count_as_empty() {
        let mut a = question(1, "");
        a.code = None;
        let b = question(2, "");
        assert_eq!(duplicate_code_count(&[a, b]), 1);
    }

    #[test]
    fn test_merge_nothing() {
        let outcome = merge_collections(Vec::new(), "Empty");
        assert_eq!(outcome.total(), 0);
        assert_eq!(outcome.data.quiz.description, describe(0));
        assert!(outcome.codes_unique());
    }

    #[test]
    fn test_load_collection_valid() {
        let json = r#"{"quiz":{"title":"T","description":"D","questions":[
            {"id":1,"question":"Q","type":"single","options":[{"id":"1","text":"A"}],"correctAnswers":["1"],"code":"C"}
        ]}}"#;
        let data = load_collection(json).unwrap();
        assert_eq!(data.quiz.questions.len(), 1);
        assert_eq!(data.quiz.questions[0].code(), Some("C"));
    }

    #[test]
    fn test_source_without_description_is_merged() {
        let json = r#"{"quiz":{"title":"T","questions":[
            {"id":9,"question":"Q","type":"single","options":[{"id":"1","text":"A"}],"correctAnswers":["1"],"code":"C"}
        ]}}"#;
        let data = load_collection(json).unwrap();
        assert_eq!(data.quiz.description, "");

        let outcome = merge_collections(vec![NamedSource::new("bare", data)], "Merged");
        assert_eq!(ids(&outcome.data), vec![1]);
        assert_eq!(outcome.data.quiz.description, describe(1));
    }

    #[test]
    fn test_merge_keeps_explicit_nulls() {
        let json = r#"{"quiz":{"questions":[
            {"id":4,"question":"Q","type":"single","options":[{"id":"1","text":"A","image":null}],"correctAnswers":["1"],"code":"C","image":null,"imageAlt":null}
        ]}}"#;
        let outcome = merge_collections(
            vec![NamedSource::new("nulls", load_collection(json).unwrap())],
            "Merged",
        );

        let written = serde_json::to_value(&outcome.data.quiz.questions[0]).unwrap();
        assert_eq!(written["id"], 1);
        assert!(written["image"].is_null());
        assert!(written["imageAlt"].is_null());
        assert!(written["options"][0]["image"].is_null());
        assert!(written["options"][0].get("imageAlt").is_none());
    }

    #[test]
    fn test_load_collection_rejections() {
        assert!(matches!(
            load_collection("not json"),
            Err(CollectionError::Json(_))
        ));
        assert!(matches!(
            load_collection(r#"{"questions":[]}"#),
            Err(CollectionError::MissingQuestions)
        ));
        assert!(matches!(
            load_collection(r#"{"quiz":{"title":"T","description":"D","questions":{}}}"#),
            Err(CollectionError::MissingQuestions)
        ));
        assert!(matches!(
            load_collection(
                r#"{"quiz":{"title":"T","description":"D","questions":[{"id":1,"question":"Q","type":"maybe","options":[],"correctAnswers":[]}]}}"#
            ),
            Err(CollectionError::InvalidQuestion { index: 0, .. })
        ));
        assert!(matches!(
            load_collection(r#"{"quiz":{"title":5,"questions":[]}}"#),
            Err(CollectionError::InvalidCollection(_))
        ));
    }

    #[test]
    fn test_append_parsed_questions() {
        let mut data = QuizData::new(Quiz::new("Bank", vec![question(1, "A"), question(9, "B")]));
        let report = parse_document(
            "Quelle couleur ?\n[] Rouge XXX\n[] Bleu\nCODE1",
            data.quiz.next_free_id().unwrap(),
        );

        append_questions(&mut data, report.questions);

        assert_eq!(ids(&data), vec![1, 9, 10]);
        assert_eq!(data.quiz.description, describe(3));
    }
}
