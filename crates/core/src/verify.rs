//! Collection health statistics.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{QuestionType, Quiz};

/// How many codes to show in the sample.
pub const CODE_SAMPLE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub total: usize,
    pub single: usize,
    pub multiple: usize,
    pub unique_codes: usize,
    pub unique_ids: usize,
    /// Sorted ids equal `1..=total`.
    pub ids_contiguous: bool,
    pub with_answers: usize,
    /// Ids of questions whose `type` disagrees with their answer count.
    pub type_mismatches: Vec<u32>,
    pub sample_codes: Vec<String>,
}

impl VerifyReport {
    pub fn is_healthy(&self) -> bool {
        self.unique_ids == self.total
            && self.ids_contiguous
            && self.with_answers == self.total
            && self.type_mismatches.is_empty()
    }
}

pub fn verify_collection(quiz: &Quiz) -> VerifyReport {
    let questions = &quiz.questions;
    let total = questions.len();

    let count_kind = |kind: QuestionType| questions.iter().filter(|q| q.kind == kind).count();

    let unique_codes = questions
        .iter()
        .map(|q| q.code_str())
        .collect::<HashSet<_>>()
        .len();

    let mut ids: Vec<u32> = questions.iter().map(|q| q.id).collect();
    let unique_ids = ids.iter().collect::<HashSet<_>>().len();
    ids.sort_unstable();
    let ids_contiguous = ids.iter().copied().eq(1..=total as u32);

    VerifyReport {
        total,
        single: count_kind(QuestionType::Single),
        multiple: count_kind(QuestionType::Multiple),
        unique_codes,
        unique_ids,
        ids_contiguous,
        with_answers: questions.iter().filter(|q| q.has_answers()).count(),
        type_mismatches: questions
            .iter()
            .filter(|q| !q.type_is_consistent())
            .map(|q| q.id)
            .collect(),
        sample_codes: questions
            .iter()
            .take(CODE_SAMPLE_SIZE)
            .map(|q| q.code_str().to_string())
            .collect(),
    }
}
