//! Utterance extraction
//!
//! The only NLU in the system is case-insensitive substring matching over
//! fixed keyword sets. This is deliberate: the matching behavior is part of
//! the observable contract and must not be upgraded to word-boundary or
//! fuzzy matching.

/// Polarity of a yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Affirmative,
    Negative,
    /// Matched neither keyword set; the step re-prompts without advancing
    Ambiguous,
}

const AFFIRMATIVE: &[&str] = &["yes", "correct", "right"];
const NEGATIVE: &[&str] = &["no", "incorrect", "wrong"];
/// Additional acceptance words recognized when a slot is proposed
const SLOT_AFFIRMATIVE: &[&str] = &["okay", "sure"];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Classify a name-confirmation answer
///
/// Affirmative keywords are checked before negative ones, so an utterance
/// containing both counts as affirmative.
pub fn yes_no(text: &str) -> Polarity {
    let text = text.to_lowercase();

    if contains_any(&text, AFFIRMATIVE) {
        Polarity::Affirmative
    } else if contains_any(&text, NEGATIVE) {
        Polarity::Negative
    } else {
        Polarity::Ambiguous
    }
}

/// Classify a slot accept/decline answer ("okay" and "sure" also accept)
pub fn slot_answer(text: &str) -> Polarity {
    let text = text.to_lowercase();

    if contains_any(&text, AFFIRMATIVE) || contains_any(&text, SLOT_AFFIRMATIVE) {
        Polarity::Affirmative
    } else if contains_any(&text, NEGATIVE) {
        Polarity::Negative
    } else {
        Polarity::Ambiguous
    }
}

/// Take the whole trimmed utterance as a spoken name
pub fn spoken_name(text: &str) -> &str {
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no_affirmative() {
        assert_eq!(yes_no("Yes"), Polarity::Affirmative);
        assert_eq!(yes_no("yes, that's right"), Polarity::Affirmative);
        assert_eq!(yes_no("CORRECT"), Polarity::Affirmative);
        assert_eq!(yes_no("that's right"), Polarity::Affirmative);
    }

    #[test]
    fn test_yes_no_negative() {
        assert_eq!(yes_no("No"), Polarity::Negative);
        assert_eq!(yes_no("that is incorrect"), Polarity::Negative);
        assert_eq!(yes_no("wrong"), Polarity::Negative);
    }

    #[test]
    fn test_yes_no_ambiguous() {
        assert_eq!(yes_no("maybe"), Polarity::Ambiguous);
        assert_eq!(yes_no("what did you say"), Polarity::Ambiguous);
        assert_eq!(yes_no(""), Polarity::Ambiguous);
    }

    #[test]
    fn test_affirmative_wins_over_negative() {
        // Substring contract: the affirmative set is checked first
        assert_eq!(yes_no("yes no"), Polarity::Affirmative);
    }

    #[test]
    fn test_slot_answer_accepts_okay_and_sure() {
        assert_eq!(slot_answer("okay"), Polarity::Affirmative);
        assert_eq!(slot_answer("sure, why not"), Polarity::Affirmative);
        assert_eq!(slot_answer("yes"), Polarity::Affirmative);
    }

    #[test]
    fn test_slot_answer_decline() {
        assert_eq!(slot_answer("no thanks"), Polarity::Negative);
        assert_eq!(slot_answer("hmm"), Polarity::Ambiguous);
    }

    #[test]
    fn test_okay_not_accepted_at_name_confirmation() {
        assert_eq!(yes_no("okay"), Polarity::Ambiguous);
    }

    #[test]
    fn test_spoken_name_trims() {
        assert_eq!(spoken_name("  John Smith \n"), "John Smith");
    }
}
