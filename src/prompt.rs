//! # Prompt
//! A prompt is simply a string
//! ## PromptTemplate
//! A prompt template is a string with placeholders. Some placeholders can be filled once, when the template is built,
//! which is how few-shot examples are baked into the classification and extraction templates.
//!
//! ## Placeholder
//! A placeholder is a string that is in the format of `{[name]}`. It can be filled with a value.
//! It has a name, which is the string inside the square brackets.
//!
//! ## PartialPrompt
//! A partial prompt is a prompt template with some placeholders filled. A partial prompt can be only constructed from a
//! prompt template via [PromptTemplate::construct_prompt], and it starts with the template's pre-filled values.
//!
//! The placeholders in a partial prompt can be filled with values via [PartialPrompt::fill] or [PartialPrompt::try_fill].
//! When all placeholders are filled, the partial prompt can be completed via [PartialPrompt::complete], in which the
//! placeholders in a template are **actually** replaced with the filling values.


use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use log::warn;
use crate::filler::Fill;
use crate::prompt::errors::{PlaceholderNotExist, UnfilledPlaceholders};
use crate::utils::prompt_processing::{get_placeholders, replace_all_placeholders};
use crate::utils::token::CountToken;


/// A prompt template with some placeholders filled. A partial prompt can be only constructed from a prompt template via [PromptTemplate::construct_prompt].
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PartialPrompt {
    /// The template of the partial prompt, readonly
    #[readonly]
    pub template: PromptTemplate,

    /// Mapping from placeholder name to its filling value
    pub(crate) placeholder_to_vals: HashMap<String, Option<String>>,

    /// Record the placeholders that are not filled yet
    pub(crate) unfilled_placeholders: HashSet<String>,
}

impl PartialPrompt {
    /// Fill the placeholders in the partial prompt with the given values.
    /// Panics if the placeholder does not exist.
    pub fn fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> &mut Self {
        match self.try_fill(placeholder, value) {
            Ok(this) => this,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fill the placeholders in the partial prompt with the given values.
    /// Returns an error if the placeholder does not exist.
    pub fn try_fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, PlaceholderNotExist> {
        let placeholder = placeholder.into();
        if self.placeholder_to_vals.contains_key(&placeholder) {
            self.unfilled_placeholders.remove(&placeholder);
            self.placeholder_to_vals.insert(placeholder, Some(value.into()));
            Ok(self)
        } else {
            Err(PlaceholderNotExist::new(placeholder, value, &self.template.placeholders))
        }
    }

    /// Names of the placeholders that still need a value.
    pub fn unfilled(&self) -> Vec<&str> {
        let mut unfilled: Vec<&str> = self.unfilled_placeholders.iter().map(String::as_str).collect();
        unfilled.sort_unstable();
        unfilled
    }

    /// Count the number of tokens in the prompt. Unfilled placeholders are counted as their literal `{[name]}` form.
    pub fn current_token_num(&self, counter: &impl CountToken) -> usize {
        let current = replace_all_placeholders(self.template.str(), &self.placeholder_to_vals);
        counter.count_token(&current)
    }

    /// Complete the partial prompt and return the completed prompt.
    /// Returns an error if there are still unfilled placeholders.
    pub fn complete(&self) -> Result<String, UnfilledPlaceholders> {
        if self.unfilled_placeholders.is_empty() {
            Ok(replace_all_placeholders(self.template.str(), &self.placeholder_to_vals))
        } else {
            let mut all_placeholders: Vec<String> = self.template.placeholders.iter().cloned().collect();
            all_placeholders.sort_unstable();
            Err(UnfilledPlaceholders {
                all_placeholders,
                unfilled_placeholders: self.unfilled().into_iter().map(String::from).collect(),
            })
        }
    }
}

/// A prompt template with placeholders, some of which may be pre-filled.
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PromptTemplate {
    /// The template string, immutable
    template: Arc<String>,

    /// The placeholders in the template, readonly
    #[readonly]
    pub placeholders: HashSet<String>,

    /// Values filled at construction time, readonly
    #[readonly]
    pub partials: Arc<HashMap<String, String>>,
}

impl PromptTemplate {
    /// Create a prompt template from a string. Warns if the template does not have any placeholder.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let placeholders = get_placeholders(&template);
        if placeholders.is_empty() {
            warn!("Your prompt template does not have a placeholder. If this is intended, ignore this message. \
            Otherwise, check whether you have written placeholders correctly.\n\
            Got prompt template:\n\
            {}", template);
        }
        Self {
            template: Arc::new(template),
            placeholders,
            partials: Arc::new(HashMap::new()),
        }
    }

    /// Pre-fill a placeholder so that every prompt constructed from this template starts with it filled.
    pub fn with_partial(mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Result<Self, PlaceholderNotExist> {
        let placeholder = placeholder.into();
        if !self.placeholders.contains(&placeholder) {
            return Err(PlaceholderNotExist::new(placeholder, value, &self.placeholders));
        }
        Arc::make_mut(&mut self.partials).insert(placeholder, value.into());
        Ok(self)
    }

    /// Pre-fill whatever the filler fills.
    pub fn with_partial_filler(mut self, filler: &impl Fill) -> anyhow::Result<Self> {
        let mut partial_prompt = self.construct_prompt();
        filler.fill(&mut partial_prompt)?;
        let filled: HashMap<String, String> = partial_prompt.placeholder_to_vals
            .into_iter()
            .filter_map(|(p, v)| v.map(|v| (p, v)))
            .collect();
        self.partials = Arc::new(filled);
        Ok(self)
    }

    /// Get the prompt template as a string.
    #[inline]
    pub fn str(&self) -> &str {
        &self.template
    }

    /// Construct a partial prompt from the prompt template.
    pub fn construct_prompt(&self) -> PartialPrompt {
        let placeholder_to_vals: HashMap<String, Option<String>> = self.placeholders
            .iter()
            .map(|p| (p.clone(), self.partials.get(p).cloned()))
            .collect();
        let unfilled_placeholders = placeholder_to_vals
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(p, _)| p.clone())
            .collect();
        PartialPrompt {
            template: self.clone(),
            placeholder_to_vals,
            unfilled_placeholders,
        }
    }

    /// Shortcut for templates whose only free placeholder is `{[text]}`.
    pub fn format_text(&self, text: &str) -> anyhow::Result<String> {
        let mut partial_prompt = self.construct_prompt();
        partial_prompt.try_fill("text", text)?;
        Ok(partial_prompt.complete()?)
    }
}

pub mod errors {
    use std::collections::HashSet;
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when trying to complete a partial prompt but there are still unfilled placeholders.
    #[derive(Debug)]
    pub struct UnfilledPlaceholders {
        pub unfilled_placeholders: Vec<String>,
        pub all_placeholders: Vec<String>,
    }

    impl fmt::Display for UnfilledPlaceholders {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "UnfilledPlaceholders: to complete the prompt template,\n  Requires Placeholders:{:?}\n  Unfilled Placeholders:{:?}",
                   self.all_placeholders, self.unfilled_placeholders)
        }
    }

    impl Error for UnfilledPlaceholders {}

    /// Error when trying to fill a placeholder that does not exist in the prompt template.
    #[derive(Debug)]
    pub struct PlaceholderNotExist {
        pub try_fill_placeholder: String,
        pub value: String,
        pub available_placeholders: Vec<String>,
    }

    impl PlaceholderNotExist {
        pub(crate) fn new(try_fill_placeholder: impl Into<String>,
                          value: impl Into<String>,
                          available_placeholders: &HashSet<String>) -> Self {
            let mut available_placeholders: Vec<String> = available_placeholders.iter().cloned().collect();
            available_placeholders.sort_unstable();
            PlaceholderNotExist {
                try_fill_placeholder: try_fill_placeholder.into(),
                value: value.into(),
                available_placeholders,
            }
        }
    }

    impl fmt::Display for PlaceholderNotExist {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "PlaceholderNotExist: try to fill placeholder = {} with value = {}, but available placeholders are {:?}",
                   self.try_fill_placeholder,
                   self.value,
                   self.available_placeholders)
        }
    }

    impl Error for PlaceholderNotExist {}
}

#[cfg(test)]
mod test_prompt {
    use super::PromptTemplate;
    use crate::utils::token::count_tokens_by_len;

    #[test]
    fn test_partial_is_prefilled() {
        let template = PromptTemplate::new("Examples:\n{[examples_text]}\nText: {[text]}")
            .with_partial("examples_text", "none")
            .expect("examples_text exists");
        let partial_prompt = template.construct_prompt();
        assert_eq!(vec!["text"], partial_prompt.unfilled());
        assert_eq!("Examples:\nnone\nText: hello", template.format_text("hello").unwrap());
    }

    #[test]
    fn test_partial_on_unknown_placeholder() {
        let err = PromptTemplate::new("Text: {[text]}")
            .with_partial("examples", "none")
            .expect_err("examples is not a placeholder");
        assert_eq!("examples", err.try_fill_placeholder);
        assert_eq!(vec!["text".to_string()], err.available_placeholders);
    }

    #[test]
    fn test_complete_requires_all_filled() {
        let template = PromptTemplate::new("{[a]} {[b]}");
        let mut partial_prompt = template.construct_prompt();
        partial_prompt.fill("a", "x");
        let err = partial_prompt.complete().expect_err("b is unfilled");
        assert_eq!(vec!["b".to_string()], err.unfilled_placeholders);
        partial_prompt.fill("b", "y");
        assert_eq!("x y", partial_prompt.complete().unwrap());
    }

    #[test]
    fn test_try_fill_unknown() {
        let template = PromptTemplate::new("{[a]}");
        let mut partial_prompt = template.construct_prompt();
        assert!(partial_prompt.try_fill("z", "value").is_err());
    }

    #[test]
    fn test_current_token_num() {
        let template = PromptTemplate::new("ab {[c]}");
        let mut partial_prompt = template.construct_prompt();
        assert_eq!("ab {[c]}".len(), partial_prompt.current_token_num(&count_tokens_by_len));
        partial_prompt.fill("c", "d");
        assert_eq!(4, partial_prompt.current_token_num(&count_tokens_by_len));
    }
}
