//! Block parser for the hand-authored raw text format.
//!
//! ```text
//! Quelle couleur ?
//! [] Rouge XXX
//! [] Bleu
//! CODE1
//! ////////
//! Autre ?
//! ...
//! ```
//!
//! A block is the text between two [`BLOCK_DELIMITER`]s. Its first
//! non-blank line is the question, `[]` lines are options (a trailing
//! ` XXX` marks the correct ones) and the first other line that is not a
//! `//` comment is the classification code.
//!
//! Parsing never fails: blocks that miss a required part are returned as
//! [`RejectedBlock`]s next to the accepted questions.

use serde::Serialize;

use crate::model::{Question, QuestionType, QuizOption};

pub const BLOCK_DELIMITER: &str = "////////";
pub const OPTION_MARKER: &str = "[]";
pub const CORRECT_MARKER: &str = " XXX";
pub const COMMENT_MARKER: &str = "//";

/// Question text, option line and code line.
const MIN_BLOCK_LINES: usize = 3;

/// Why a block did not produce a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Fewer than three non-blank lines.
    TooShort,
    NoOptions,
    NoCorrectAnswer,
    MissingCode,
    /// Valid block, but every identifier up to `u32::MAX` is taken.
    IdsExhausted,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TooShort => write!(f, "fewer than {MIN_BLOCK_LINES} non-blank lines"),
            Rejection::NoOptions => write!(f, "no option line"),
            Rejection::NoCorrectAnswer => write!(f, "no option marked correct"),
            Rejection::MissingCode => write!(f, "no classification code"),
            Rejection::IdsExhausted => write!(f, "no identifier left after {}", u32::MAX),
        }
    }
}

/// A block that passed validation but has no identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBlock {
    pub text: String,
    pub options: Vec<QuizOption>,
    pub correct_answers: Vec<String>,
    pub code: String,
}

impl ParsedBlock {
    pub fn into_question(self, id: u32) -> Question {
        Question {
            id,
            kind: QuestionType::from_answer_count(self.correct_answers.len()),
            text: self.text,
            options: self.options,
            correct_answers: self.correct_answers,
            code: Some(Some(self.code)),
            image: None,
            image_alt: None,
            extra: Default::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedBlock {
    /// 0-based position of the block in the document.
    pub index: usize,
    pub reason: Rejection,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseReport {
    pub questions: Vec<Question>,
    pub rejected: Vec<RejectedBlock>,
    /// Identifier the next question would have received. Feed it as the
    /// `start_id` of a following run to keep numbering continuous.
    pub next_id: u32,
}

impl ParseReport {
    pub fn accepted_count(&self) -> usize {
        self.questions.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Interpret one block.
pub fn parse_block(block: &str) -> Result<ParsedBlock, Rejection> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < MIN_BLOCK_LINES {
        return Err(Rejection::TooShort);
    }

    let text = lines[0].to_string();
    let mut options = Vec::new();
    let mut correct_answers = Vec::new();
    let mut code = None;

    for line in &lines[1..] {
        if let Some(rest) = line.strip_prefix(OPTION_MARKER) {
            let id = (options.len() + 1).to_string();
            let mut option_text = rest.trim();

            if let Some(stripped) = option_text.strip_suffix(CORRECT_MARKER) {
                option_text = stripped.trim();
                correct_answers.push(id.clone());
            }

            options.push(QuizOption::new(id, option_text));
        } else if !line.starts_with(COMMENT_MARKER) {
            code = Some(line.to_string());
            break;
        }
    }

    if options.is_empty() {
        return Err(Rejection::NoOptions);
    }
    if correct_answers.is_empty() {
        return Err(Rejection::NoCorrectAnswer);
    }
    let code = code.ok_or(Rejection::MissingCode)?;

    Ok(ParsedBlock {
        text,
        options,
        correct_answers,
        code,
    })
}

/// Parse every block of `document`, numbering accepted questions from
/// `start_id`.
///
/// `next_id` saturates at `u32::MAX`; once that id is used, further valid
/// blocks are rejected with [`Rejection::IdsExhausted`].
pub fn parse_document(document: &str, start_id: u32) -> ParseReport {
    parse_numbered(document, Some(start_id))
}

/// Like [`parse_document`], with `None` meaning no identifier is left at
/// all (see [`Quiz::next_free_id`](crate::model::Quiz::next_free_id)).
pub fn parse_numbered(document: &str, first_id: Option<u32>) -> ParseReport {
    let mut report = ParseReport::default();
    let mut next = first_id;

    for (index, block) in document.split(BLOCK_DELIMITER).enumerate() {
        match (parse_block(block), next) {
            (Ok(parsed), Some(id)) => {
                report.questions.push(parsed.into_question(id));
                next = id.checked_add(1);
            }
            (Ok(_), None) => report.rejected.push(RejectedBlock {
                index,
                reason: Rejection::IdsExhausted,
            }),
            (Err(reason), _) => report.rejected.push(RejectedBlock { index, reason }),
        }
    }

    report.next_id = next.unwrap_or(u32::MAX);
    report
}
