//! Question bank domain model.
//!
//! These types mirror the JSON document consumed by the quiz application:
//!
//! ```json
//! { "quiz": { "title": "...", "description": "...", "questions": [ ... ] } }
//! ```
//!
//! Every record keeps the fields it does not know about in a flattened
//! `extra` map, so loading and re-writing a collection never drops data.
//! Optional string fields are [`Nullable`]: an explicit `null` on disk is
//! written back as `null`, an absent key stays absent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Title given to collections built from a single raw text source.
pub const DEFAULT_TITLE: &str = "Quiz de Révision EPSF";

/// Title given to merged collections.
pub const MERGED_TITLE: &str = "Quiz de Révision EPSF - Collection Complète";

/// Build the collection description for a given question count.
///
/// The description embeds the live count, so it has to be rebuilt every
/// time the number of questions changes.
pub fn describe(question_count: usize) -> String {
    format!(
        "Testez vos connaissances avec ce quiz interactif pour la licence EPSF - {question_count} questions"
    )
}

/// `None` when the key is absent, `Some(None)` for an explicit `null`.
pub type Nullable<T> = Option<Option<T>>;

fn present<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn value_of(field: &Nullable<String>) -> Option<&str> {
    field.as_ref().and_then(|v| v.as_deref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiple,
}

impl QuestionType {
    /// `Multiple` iff more than one answer is correct.
    pub fn from_answer_count(count: usize) -> Self {
        if count > 1 {
            QuestionType::Multiple
        } else {
            QuestionType::Single
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single answer option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    /// 1-based position within the parent question, as a string.
    pub id: String,
    pub text: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_alt: Nullable<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuizOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            image: None,
            image_alt: None,
            extra: Map::new(),
        }
    }

    pub fn image(&self) -> Option<&str> {
        value_of(&self.image)
    }

    pub fn image_alt(&self) -> Option<&str> {
        value_of(&self.image_alt)
    }

    pub fn set_image(&mut self, path: impl Into<String>, alt: impl Into<String>) {
        self.image = Some(Some(path.into()));
        self.image_alt = Some(Some(alt.into()));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    #[serde(rename = "question")]
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub options: Vec<QuizOption>,
    pub correct_answers: Vec<String>,
    /// Optional on disk: hand-edited collections may omit it.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub code: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_alt: Nullable<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Question {
    /// Copy of this question carrying a new identifier. Everything else,
    /// including unknown fields, is carried over unchanged.
    pub fn renumbered(&self, id: u32) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    pub fn code(&self) -> Option<&str> {
        value_of(&self.code)
    }

    /// The code, or an empty string when the question has none.
    pub fn code_str(&self) -> &str {
        self.code().unwrap_or("")
    }

    pub fn image(&self) -> Option<&str> {
        value_of(&self.image)
    }

    pub fn image_alt(&self) -> Option<&str> {
        value_of(&self.image_alt)
    }

    pub fn set_image(&mut self, path: impl Into<String>, alt: impl Into<String>) {
        self.image = Some(Some(path.into()));
        self.image_alt = Some(Some(alt.into()));
    }

    pub fn has_answers(&self) -> bool {
        !self.correct_answers.is_empty()
    }

    /// Whether `type` agrees with the number of correct answers.
    pub fn type_is_consistent(&self) -> bool {
        self.kind == QuestionType::from_answer_count(self.correct_answers.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Sources written by hand may leave out the title and description;
    /// both are rebuilt whenever a collection is merged.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quiz {
    /// New collection with a description matching its question count.
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            description: describe(questions.len()),
            questions,
            extra: Map::new(),
        }
    }

    pub fn refresh_description(&mut self) {
        self.description = describe(self.questions.len());
    }

    /// Smallest id strictly greater than every id in the collection, or
    /// `None` when `u32::MAX` is already taken.
    pub fn next_free_id(&self) -> Option<u32> {
        match self.questions.iter().map(|q| q.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }
}

/// Top-level document wrapper (`{ "quiz": ... }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizData {
    pub quiz: Quiz,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuizData {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            extra: Map::new(),
        }
    }
}

impl From<Quiz> for QuizData {
    fn from(quiz: Quiz) -> Self {
        QuizData::new(quiz)
    }
}
