use std::collections::{HashMap, HashSet};
use regex::{Captures, Regex};
use lazy_static::lazy_static;

lazy_static! {
    pub(crate) static ref PLACEHOLDER_MATCH_RE: Regex = Regex::new(r"\{\[.*?\]\}").unwrap();
}

#[inline]
pub(crate) fn strip_format(key: &str) -> &str {
    //! Strips "{\[" and "\]}" for a string, which is algorithmically unsafe.
    //! Ensure the string is properly formatted like "{\[a\]}".
    &key[2..key.len() - 2]
}

/// Replaces every placeholder that has a filling value in `mapping`.
///
/// Placeholders that are missing from the mapping, or mapped to `None`, are left as they are.
pub(crate) fn replace_all_placeholders(original: &str, mapping: &HashMap<String, Option<String>>) -> String {
    PLACEHOLDER_MATCH_RE
        .replace_all(original, |captures: &Captures| {
            let match_text = &captures[0];
            match mapping.get(strip_format(match_text)) {
                Some(Some(value)) => value.clone(),
                _ => match_text.to_string(),
            }
        })
        .into_owned()
}

pub fn get_placeholders(string: &str) -> HashSet<String> {
    PLACEHOLDER_MATCH_RE.captures_iter(string)
        .map(|captures| strip_format(&captures[0]).to_string())
        .collect()
}

#[cfg(test)]
mod test_prompt_processing {
    use std::collections::{HashMap, HashSet};
    use super::{get_placeholders, replace_all_placeholders};

    #[test]
    fn test_get_keys() {
        let keys = get_placeholders("{[text]}");
        assert_eq!(HashSet::from(["text".to_string()]), keys);

        let keys = get_placeholders("{[text\n]}");
        assert_eq!(0, keys.len());

        let keys = get_placeholders("Examples:\n{[examples_text]}\nText: {[text]}");
        let expect_keys = HashSet::from(["examples_text".to_string(), "text".to_string()]);
        assert_eq!(expect_keys, keys);
    }

    #[test]
    fn test_replace() {
        let string = "{[a]} and {[b]} and {[a]}";
        let mapping = HashMap::from([
            ("a".to_string(), Some("alice".to_string())),
            ("b".to_string(), Some("bob".to_string())),
        ]);
        assert_eq!("alice and bob and alice", replace_all_placeholders(string, &mapping));
    }

    #[test]
    fn test_replace_keeps_unfilled() {
        let string = "{[a]} and {[b]}";
        let mapping = HashMap::from([
            ("a".to_string(), Some("alice".to_string())),
            ("b".to_string(), None),
        ]);
        assert_eq!("alice and {[b]}", replace_all_placeholders(string, &mapping));
    }

    #[test]
    fn test_fill_value_with_braces_is_not_rescanned() {
        let string = "Data: {[a]}";
        let mapping = HashMap::from([("a".to_string(), Some("{\"results\": []}".to_string()))]);
        assert_eq!("Data: {\"results\": []}", replace_all_placeholders(string, &mapping));
    }
}
