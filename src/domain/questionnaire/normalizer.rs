//! Answer normalizer - Maps raw recognized tokens to canonical answers.

use super::answers::AnswerValue;
use super::question::QuestionKind;

const AFFIRMATIVE: &[&str] = &["yes", "y", "true"];
const NEGATIVE: &[&str] = &["no", "n", "false"];

const DIGIT_WORDS: &[(&str, u64)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
];

/// Pure conversion from gesture labels, transcripts or cleaned text.
///
/// Returns `None` for anything outside the vocabulary; it never guesses.
pub struct AnswerNormalizer;

impl AnswerNormalizer {
    pub fn normalize(raw: &str, kind: QuestionKind) -> Option<AnswerValue> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }

        match kind {
            QuestionKind::YesNo => {
                if AFFIRMATIVE.contains(&text.as_str()) {
                    Some(AnswerValue::Yes)
                } else if NEGATIVE.contains(&text.as_str()) {
                    Some(AnswerValue::No)
                } else {
                    None
                }
            }
            QuestionKind::Number | QuestionKind::DigitCount => text
                .parse::<u64>()
                .ok()
                .or_else(|| {
                    DIGIT_WORDS
                        .iter()
                        .find(|(word, _)| *word == text)
                        .map(|(_, n)| *n)
                })
                .map(AnswerValue::Number),
        }
    }
}
