//! Draft questions built from the text of a PDF page.
//!
//! The PDF holds one question per page: the first line is the prompt,
//! numbered lines (`1. ...`) are the options and the question code
//! (letters followed by digits) sits near the bottom of the page. The
//! correct answers are only distinguishable by color in the PDF, so drafts
//! always come out without answers and need a manual review.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Question, QuestionType, QuizOption};

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s*(.+)$").expect("valid option regex"));

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)\s*(\d+)").expect("valid code regex"));

const MULTIPLE_HINT: &str = "plusieurs réponses";

/// Build a draft question from a page. `page_number` is 1-based and becomes
/// the question id. Returns `None` for pages without text.
pub fn parse_page(text: &str, page_number: u32) -> Option<Question> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let question_text = lines.first()?.to_string();

    let code = lines
        .iter()
        .rev()
        .find_map(|line| CODE_RE.captures(line))
        .map(|caps| format!("{}{}", &caps[1], &caps[2]))
        .unwrap_or_else(|| format!("Q{page_number}"));

    let is_multiple = lines
        .iter()
        .any(|line| line.to_lowercase().contains(MULTIPLE_HINT));

    let options = lines[1..]
        .iter()
        .filter_map(|line| OPTION_RE.captures(line))
        .map(|caps| QuizOption::new(&caps[1], caps[2].trim()))
        .collect();

    Some(Question {
        id: page_number,
        text: question_text,
        kind: if is_multiple {
            QuestionType::Multiple
        } else {
            QuestionType::Single
        },
        options,
        correct_answers: Vec::new(),
        code: Some(Some(code)),
        image: None,
        image_alt: None,
        extra: Default::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        let text = "Que signifie ce signal ?\n\n1. Arrêt immédiat\n2.Ralentir\n 3.   Voie libre \nSIG 042\n";
        let question = parse_page(text, 3).unwrap();

        assert_eq!(question.id, 3);
        assert_eq!(question.text, "Que signifie ce signal ?");
        assert_eq!(question.kind, QuestionType::Single);
        assert_eq!(question.code(), Some("SIG042"));
        assert!(question.correct_answers.is_empty());

        let options: Vec<(&str, &str)> = question
            .options
            .iter()
            .map(|o| (o.id.as_str(), o.text.as_str()))
            .collect();
        assert_eq!(
            options,
            vec![("1", "Arrêt immédiat"), ("2", "Ralentir"), ("3", "Voie libre")]
        );
    }

    #[test]
    fn test_code_is_taken_from_the_last_matching_line() {
        let text = "Question AB 1 ?\n1. Oui\n2. Non\nREG 12\nPage 4";
        let question = parse_page(text, 4).unwrap();
        assert_eq!(question.code(), Some("REG12"));
    }

    #[test]
    fn test_code_falls_back_to_page_number() {
        let question = parse_page("question sans code\n1. oui", 9).unwrap();
        assert_eq!(question.code(), Some("Q9"));
    }

    #[test]
    fn test_multiple_hint() {
        let text = "Choisir les bons gestes (Plusieurs Réponses possibles)\n1. A\n2. B\nSEC 1";
        let question = parse_page(text, 1).unwrap();
        assert_eq!(question.kind, QuestionType::Multiple);
    }

    #[test]
    fn test_question_line_is_not_an_option() {
        let question = parse_page("1. Première ligne\n2. Seconde\nX 1", 1).unwrap();
        assert_eq!(question.text, "1. Première ligne");
        assert_eq!(question.options.len(), 1);
        assert_eq!(question.options[0].id, "2");
    }

    #[test]
    fn test_blank_page() {
        assert!(parse_page("", 1).is_none());
        assert!(parse_page("  \n\t\n", 2).is_none());
    }
}
