//! Few-shot examples rendered into a prompt.

use std::fmt::Write;
use anyhow::Result;
use crate::filler::{FillPlaceholders, FillWith};
use crate::prompt::PartialPrompt;
use crate::schema::{Extraction, Label};

/// Placeholder that few-shot examples are rendered into.
pub const EXAMPLES_PLACEHOLDER: &str = "examples_text";

/// A fixed list of (input, expected extraction) pairs.
#[derive(Debug, Clone)]
pub struct FewShot<L: Label> {
    examples: Vec<(String, Extraction<L>)>,
    placeholders_to_fill: Vec<String>,
}

impl<L: Label> FewShot<L> {
    pub fn new(examples: Vec<(String, Extraction<L>)>) -> Self {
        Self {
            examples,
            placeholders_to_fill: vec![EXAMPLES_PLACEHOLDER.to_string()],
        }
    }

    pub fn examples(&self) -> &[(String, Extraction<L>)] {
        &self.examples
    }

    /// Render every example as an `Input:` line followed by its expected data in a JSON fence.
    pub fn format(&self) -> Result<String> {
        let mut formatted = String::new();
        for (text, data) in &self.examples {
            let data_json = serde_json::to_string(data)?;
            writeln!(formatted, "Input: {}", text)?;
            write!(formatted, "Extracted Data:\n```json\n{}\n```\n\n", data_json)?;
        }
        Ok(formatted)
    }
}

impl<L: Label> FillPlaceholders for FewShot<L> {
    fn placeholders_to_fill(&self) -> &Vec<String> {
        &self.placeholders_to_fill
    }
}

impl<L: Label> FillWith<()> for FewShot<L> {
    fn fill_with(&self, partial_prompt: &mut PartialPrompt, context: ()) -> Result<()> {
        partial_prompt.try_fill(EXAMPLES_PLACEHOLDER, self.format()?)?;
        Ok(context)
    }
}

#[cfg(test)]
mod test_few_shot {
    use super::FewShot;
    use crate::filler::Fill;
    use crate::prompt::PromptTemplate;
    use crate::schema::{Evidence, Extraction, Sentiment};

    fn few_shot() -> FewShot<Sentiment> {
        FewShot::new(vec![(
            "We saw currency headwinds in the quarter.".to_string(),
            Extraction::single(Evidence::new(
                "We saw currency headwinds in the quarter.",
                Some("currency headwinds."),
                Sentiment::Challenge,
            )),
        )])
    }

    #[test]
    fn test_format() {
        let formatted = few_shot().format().unwrap();
        let expected = "Input: We saw currency headwinds in the quarter.\n\
            Extracted Data:\n```json\n\
            {\"results\":[{\"text\":\"We saw currency headwinds in the quarter.\",\"note\":\"currency headwinds.\",\"classification\":\"challenge\"}]}\n\
            ```\n\n";
        assert_eq!(expected, formatted);
    }

    #[test]
    fn test_fill_template() {
        let template = PromptTemplate::new("{[examples_text]}Text: {[text]}")
            .with_partial_filler(&few_shot())
            .unwrap();
        let prompt = template.format_text("Revenue fell.").unwrap();
        assert!(prompt.starts_with("Input: We saw currency headwinds"));
        assert!(prompt.ends_with("```\n\nText: Revenue fell."));
    }

    #[test]
    fn test_fill_without_placeholder_fails() {
        let mut partial_prompt = PromptTemplate::new("Text: {[text]}").construct_prompt();
        assert!(few_shot().fill(&mut partial_prompt).is_err());
    }
}
