//! Keyword text cleanup - Offline transcript coercion.
//!
//! Pulls a yes/no or a number out of a conversational transcript
//! ("yes I am married", "around fifty thousand"). Anything unclear is
//! passed through unchanged so the normalizer can reject it.

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::domain::foundation::DomainError;
use crate::domain::questionnaire::QuestionKind;
use crate::ports::TextCleanup;

const EXPLICIT_YES: &[&str] = &["yes", "yeah", "yep", "sure", "okay", "ok", "fine"];
const EXPLICIT_NO: &[&str] = &["no", "nope", "nah"];
const NEGATIONS: &[&str] = &["not", "don't", "doesn't", "haven't", "hasn't", "isn't", "dont"];
const WEAK_YES: &[&str] = &["married", "have", "has", "do", "does"];
const NOTHING: &[&str] = &["no", "none", "nothing"];
/// Word pairs that mean the speaker has not decided.
const HEDGES: &[[&str; 2]] = &[
    ["not", "sure"],
    ["not", "certain"],
    ["don't", "know"],
    ["dont", "know"],
    ["no", "idea"],
];

static UNITS: Lazy<HashMap<&'static str, u64>> = Lazy::new(|| {
    HashMap::from([
        ("zero", 0),
        ("o", 0),
        ("oh", 0),
        ("one", 1),
        ("two", 2),
        ("three", 3),
        ("four", 4),
        ("five", 5),
        ("six", 6),
        ("seven", 7),
        ("eight", 8),
        ("nine", 9),
        ("ten", 10),
        ("eleven", 11),
        ("twelve", 12),
        ("thirteen", 13),
        ("fourteen", 14),
        ("fifteen", 15),
        ("sixteen", 16),
        ("seventeen", 17),
        ("eighteen", 18),
        ("nineteen", 19),
        ("twenty", 20),
        ("thirty", 30),
        ("forty", 40),
        ("fifty", 50),
        ("sixty", 60),
        ("seventy", 70),
        ("eighty", 80),
        ("ninety", 90),
    ])
});

/// Rule-based `TextCleanup` that needs no network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTextCleanup;

impl KeywordTextCleanup {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of the cleanup.
    pub fn clean(&self, raw: &str, expected: QuestionKind) -> String {
        let cleaned = match expected {
            QuestionKind::YesNo => yes_no(raw),
            QuestionKind::Number | QuestionKind::DigitCount => number(raw),
        };
        cleaned.unwrap_or_else(|| raw.to_string())
    }
}

#[async_trait]
impl TextCleanup for KeywordTextCleanup {
    async fn cleanup(&self, raw: &str, expected: QuestionKind) -> Result<String, DomainError> {
        Ok(self.clean(raw, expected))
    }
}

fn words(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .replace('\u{2019}', "'")
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_string()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn yes_no(raw: &str) -> Option<String> {
    let words = words(raw);
    if let [only] = words.as_slice() {
        match only.as_str() {
            "true" => return Some("yes".to_string()),
            "false" => return Some("no".to_string()),
            _ => {}
        }
    }

    let hedged = words
        .windows(2)
        .any(|pair| HEDGES.iter().any(|hedge| pair[0] == hedge[0] && pair[1] == hedge[1]));
    if hedged {
        return None;
    }

    for (i, word) in words.iter().enumerate() {
        if EXPLICIT_YES.contains(&word.as_str()) {
            // "not okay" is neither a yes nor a clear no.
            let negated = i
                .checked_sub(1)
                .is_some_and(|prev| NEGATIONS.contains(&words[prev].as_str()));
            if negated {
                return None;
            }
            return Some("yes".to_string());
        }
        if EXPLICIT_NO.contains(&word.as_str()) {
            return Some("no".to_string());
        }
    }
    if words.iter().any(|w| NEGATIONS.contains(&w.as_str())) {
        return Some("no".to_string());
    }
    if words.iter().any(|w| WEAK_YES.contains(&w.as_str())) {
        return Some("yes".to_string());
    }
    None
}

fn number(raw: &str) -> Option<String> {
    let words = words(raw);

    let integer = words.iter().find_map(|w| {
        let digits = w.replace(',', "");
        (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
            .then(|| digits.parse::<u64>().ok())
            .flatten()
    });
    if let Some(n) = integer {
        return Some(n.to_string());
    }

    if let Some(n) = spelled_number(&words) {
        return Some(n.to_string());
    }

    words
        .iter()
        .any(|w| NOTHING.contains(&w.as_str()))
        .then(|| "0".to_string())
}

/// Parses the first run of number words, e.g. "two hundred fifty thousand".
fn spelled_number(words: &[String]) -> Option<u64> {
    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut seen = false;

    for word in words {
        let word = word.as_str();
        if let Some(value) = UNITS.get(word) {
            // "o" only counts as zero on its own, not inside a sentence.
            if matches!(word, "o" | "oh") && words.len() > 1 {
                if seen {
                    break;
                }
                continue;
            }
            current = current.saturating_add(*value);
            seen = true;
        } else if word == "hundred" && seen {
            current = current.max(1).saturating_mul(100);
        } else if word == "thousand" && seen {
            total = total.saturating_add(current.max(1).saturating_mul(1000));
            current = 0;
        } else if word == "and" && seen {
            continue;
        } else if seen {
            break;
        }
    }

    seen.then_some(total.saturating_add(current))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str, kind: QuestionKind) -> String {
        KeywordTextCleanup::new().clean(raw, kind)
    }

    mod yes_no {
        use super::*;

        #[test]
        fn explicit_words_decide() {
            assert_eq!(clean("yes I am married", QuestionKind::YesNo), "yes");
            assert_eq!(clean("Nope.", QuestionKind::YesNo), "no");
            assert_eq!(clean("no I'm not married", QuestionKind::YesNo), "no");
            assert_eq!(clean("yeah sure", QuestionKind::YesNo), "yes");
        }

        #[test]
        fn negation_beats_weak_affirmative() {
            assert_eq!(clean("I don't have children", QuestionKind::YesNo), "no");
            assert_eq!(clean("she doesn\u{2019}t work", QuestionKind::YesNo), "no");
        }

        #[test]
        fn weak_affirmatives_mean_yes() {
            assert_eq!(clean("I am married", QuestionKind::YesNo), "yes");
            assert_eq!(clean("we have two kids", QuestionKind::YesNo), "yes");
        }

        #[test]
        fn booleans_pass_as_answers() {
            assert_eq!(clean("True", QuestionKind::YesNo), "yes");
            assert_eq!(clean("false", QuestionKind::YesNo), "no");
        }

        #[test]
        fn unclear_text_is_unchanged() {
            assert_eq!(clean("maybe later", QuestionKind::YesNo), "maybe later");
        }

        #[test]
        fn hedges_are_unchanged() {
            assert_eq!(clean("I'm not sure", QuestionKind::YesNo), "I'm not sure");
            assert_eq!(clean("I don't know", QuestionKind::YesNo), "I don't know");
            assert_eq!(clean("no idea", QuestionKind::YesNo), "no idea");
        }

        #[test]
        fn negated_affirmative_is_unchanged() {
            assert_eq!(clean("not okay", QuestionKind::YesNo), "not okay");
            assert_eq!(
                clean("I'm not fine with that", QuestionKind::YesNo),
                "I'm not fine with that"
            );
        }

        #[test]
        fn matches_whole_words_only() {
            // "nothing" contains "no" and "not" as substrings.
            assert_eq!(clean("nothing", QuestionKind::YesNo), "nothing");
        }
    }

    mod numbers {
        use super::*;

        #[test]
        fn extracts_first_integer() {
            assert_eq!(clean("I have 3 kids", QuestionKind::DigitCount), "3");
            assert_eq!(clean("about 50,000 a year", QuestionKind::Number), "50000");
        }

        #[test]
        fn spelled_numbers() {
            assert_eq!(clean("my salary is fifty thousand", QuestionKind::Number), "50000");
            assert_eq!(clean("around twenty thousand", QuestionKind::Number), "20000");
            assert_eq!(clean("I have three kids", QuestionKind::DigitCount), "3");
            assert_eq!(
                clean("two hundred and fifty thousand", QuestionKind::Number),
                "250000"
            );
            assert_eq!(
                clean("forty five thousand six hundred", QuestionKind::Number),
                "45600"
            );
        }

        #[test]
        fn no_income_is_zero() {
            assert_eq!(clean("no income", QuestionKind::Number), "0");
            assert_eq!(clean("zero income", QuestionKind::Number), "0");
            assert_eq!(clean("O", QuestionKind::Number), "0");
            assert_eq!(clean("none", QuestionKind::Number), "0");
        }

        #[test]
        fn unclear_text_is_unchanged() {
            assert_eq!(clean("quite a lot", QuestionKind::Number), "quite a lot");
        }
    }

    #[tokio::test]
    async fn port_returns_cleaned_text() {
        let cleanup = KeywordTextCleanup::new();
        let result = cleanup.cleanup("yep", QuestionKind::YesNo).await.unwrap();
        assert_eq!(result, "yes");
    }
}
