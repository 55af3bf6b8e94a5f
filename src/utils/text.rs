//! Cheap text heuristics applied before a passage is sent to a model.

use lazy_static::lazy_static;
use regex::Regex;

/// Spelled-out numbers that mark a phrase as possibly statistical.
pub const NUMBER_WORDS: [&str; 37] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen",
    "seventeen", "eighteen", "nineteen", "twenty", "thirty", "forty", "fifty",
    "sixty", "seventy", "eighty", "ninety", "hundred", "hundreds", "thousand",
    "thousands", "million", "millions", "billion", "billions", "trillion", "trillions",
];

/// A number, optionally decimal, optionally followed by `%` or a magnitude suffix such as `M` or `bn`.
const NUMERIC_PATTERN: &str = r"\b\d+(?:\.\d+)?(?:%|bn|[kmbt])?\b";

lazy_static! {
    static ref STATISTIC_RE: Regex = {
        let words = NUMBER_WORDS.iter().map(|w| format!(r"\b{}\b", w)).collect::<Vec<_>>().join("|");
        Regex::new(&format!("(?i){}|{}", NUMERIC_PATTERN, words)).unwrap()
    };
    static ref SENTENCE_BREAK_RE: Regex = Regex::new(r"\.\s+[A-Z]").unwrap();
}

/// Returns the whole text if it looks like it carries a statistic, `None` otherwise.
///
/// This is a gate, not an extractor: nothing is pulled out of the text.
///
/// # Example
/// ```
/// use finprompt::utils::text::contains_statistic;
/// assert_eq!(contains_statistic("We had $500M in revenue"), Some("We had $500M in revenue"));
/// assert_eq!(contains_statistic("The sky is blue"), None);
/// ```
pub fn contains_statistic(text: &str) -> Option<&str> {
    STATISTIC_RE.is_match(text).then_some(text)
}

/// Splits text into sentences at a period followed by whitespace and an uppercase letter.
///
/// The period and whitespace are dropped; the last sentence keeps its final period.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK_RE.find_iter(text) {
        sentences.push(&text[start..m.start()]);
        // the uppercase letter is a single ASCII byte
        start = m.end() - 1;
    }
    sentences.push(&text[start..]);
    sentences
}

#[cfg(test)]
mod test_text {
    use super::{contains_statistic, split_sentences};

    #[test]
    fn test_statistics() {
        for text in [
            "We had $500M in revenue",
            "There are 300 passengers on the airplane.",
            "My property taxes went up by 9.99%.",
            "Sales reached $2.5bn.",
            "Three new stores opened",
            "Revenue topped a BILLION dollars",
            "Margins grew 40 basis points",
        ] {
            assert_eq!(Some(text), contains_statistic(text), "text: {}", text);
        }
    }

    #[test]
    fn test_not_statistics() {
        for text in [
            "The sky is blue",
            "The document number is A1024.",
            "Someone said nothing",
            "Our tenth anniversary",
            "",
        ] {
            assert_eq!(None, contains_statistic(text), "text: {}", text);
        }
    }

    #[test]
    fn test_split_sentences() {
        let text = "Revenue grew. Margins expanded.  We opened 3 stores. e.g. this stays";
        assert_eq!(
            vec!["Revenue grew", "Margins expanded", "We opened 3 stores. e.g. this stays"],
            split_sentences(text)
        );
        assert_eq!(vec!["single"], split_sentences("single"));
        assert_eq!(vec![""], split_sentences(""));
    }
}
