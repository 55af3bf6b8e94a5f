//! Business-sentiment classification of phrases.

use lazy_static::lazy_static;
use crate::exemplars::few_shot_template;
use crate::extractor::{EvidenceExtractor, ExtractorConfig};
use crate::filler::FewShot;
use crate::prompt::PromptTemplate;
use crate::schema::{Evidence, Extraction, Sentiment};
use crate::utils::llm::CompleteText;

const CLASSIFICATION_TEMPLATE: &str = "\
You are an expert sentiment classification algorithm.
For each provided text, return one classification of the following
(strength, opportunity, milestone, weakness, challenge, unclassified).

Only extract relevant information containing notes from the text.
If you do not know the value of an attribute, return null for that attribute.
Do not guess.

Here are some examples:
{[examples_text]}
Please provide the extracted data in JSON format matching the schema of the 'Note' class,
and enclose it within triple backticks. Do not include any additional text or explanations.

Text: {[text]}
";

fn example(text: &str, note: Option<&str>, classification: Sentiment) -> (String, Extraction<Sentiment>) {
    (text.to_string(), Extraction::single(Evidence::new(text, note, classification)))
}

lazy_static! {
    static ref CLASSIFICATION_EXAMPLES: FewShot<Sentiment> = FewShot::new(vec![
        example("We saw strong revenue growth in the quarter.", Some("strong revenue growth."), Sentiment::Strength),
        example("The quarter saw some deceleration in our product performance.", Some("deceleration in our product performance."), Sentiment::Weakness),
        example("We believe that this market will grow above expectations.", Some("grow above expectations."), Sentiment::Opportunity),
        example("We saw record sales in the third quarter.", Some("record sales."), Sentiment::Milestone),
        example("We saw currency headwinds in the quarter.", Some("currency headwinds."), Sentiment::Challenge),
        example("We had $500M in revenue this quarter.", None, Sentiment::Unclassified),
    ]);
    static ref CLASSIFICATION: PromptTemplate = few_shot_template(CLASSIFICATION_TEMPLATE, &CLASSIFICATION_EXAMPLES);
}

/// The few-shot examples baked into [classification_template].
pub fn classification_examples() -> &'static FewShot<Sentiment> {
    &CLASSIFICATION_EXAMPLES
}

/// Template asking for one [Sentiment] per text. Only `{[text]}` is left to fill.
pub fn classification_template() -> &'static PromptTemplate {
    &CLASSIFICATION
}

/// Extractor running [classification_template] against `llm`.
pub fn classifier<M: CompleteText>(llm: M) -> EvidenceExtractor<Sentiment, M> {
    EvidenceExtractor::new(CLASSIFICATION.clone(), llm, ExtractorConfig::default())
}

#[cfg(test)]
mod test_classification {
    use super::{classification_examples, classification_template};
    use crate::schema::{Label, Sentiment};

    #[test]
    fn test_only_text_is_left() {
        let partial_prompt = classification_template().construct_prompt();
        assert_eq!(vec!["text"], partial_prompt.unfilled());
    }

    #[test]
    fn test_every_label_has_an_example() {
        let examples = classification_examples().examples();
        for choice in Sentiment::choices() {
            assert!(
                examples.iter().any(|(_, data)| data.results[0].classification.as_ref().map(Label::as_str) == Some(*choice)),
                "no example for {}", choice
            );
        }
    }

    #[test]
    fn test_examples_quote_their_input() {
        for (text, data) in classification_examples().examples() {
            assert_eq!(Some(text), data.results[0].text.as_ref());
        }
    }

    #[test]
    fn test_prompt_renders_examples() {
        let prompt = classification_template().format_text("Churn increased.").unwrap();
        assert!(prompt.contains("\"classification\":\"unclassified\""));
        assert!(prompt.contains("\"note\":null"));
        assert!(prompt.ends_with("Text: Churn increased.\n"));
        assert!(!prompt.contains("{["));
    }
}
