//! Statistic extraction.

use lazy_static::lazy_static;
use crate::exemplars::few_shot_template;
use crate::extractor::{EvidenceExtractor, ExtractorConfig};
use crate::filler::FewShot;
use crate::prompt::PromptTemplate;
use crate::schema::{Evidence, Extraction, StatKind};
use crate::utils::llm::CompleteText;

const EXTRACTION_TEMPLATE: &str = "\
You are an expert statistic extraction algorithm.
For each provided text, return one classification of the following
(stat, not stat).

Only extract relevant information containing statistics, numbers, figures or percentages from the text.
If you do not know the value of an attribute, return null for that attribute.
Do not guess.

Here are some examples:
{[examples_text]}
Please provide the extracted data in JSON format matching the schema of the 'Stat' class,
and enclose it within triple backticks. Do not include any additional text or explanations.

Text: {[text]}
";

fn example(text: &str, note: Option<&str>, classification: StatKind) -> (String, Extraction<StatKind>) {
    (text.to_string(), Extraction::single(Evidence::new(text, note, classification)))
}

lazy_static! {
    static ref EXTRACTION_EXAMPLES: FewShot<StatKind> = FewShot::new(vec![
        example("There are 300 passengers on the airplane.", Some("300 passengers."), StatKind::Stat),
        example("The date is March 11, 2025.", None, StatKind::NotStat),
        example("One-fifth of the students got A's on the test", Some("One-fifth of the students."), StatKind::Stat),
        example("I have three things on my mind.", None, StatKind::NotStat),
        example("My property taxes went up by 9.99%.", Some("property taxes went up by 9.99%."), StatKind::Stat),
        example("The document number is A1024.", None, StatKind::NotStat),
    ]);
    static ref EXTRACTION: PromptTemplate = few_shot_template(EXTRACTION_TEMPLATE, &EXTRACTION_EXAMPLES);
}

/// The few-shot examples baked into [extraction_template].
pub fn extraction_examples() -> &'static FewShot<StatKind> {
    &EXTRACTION_EXAMPLES
}

/// Template asking whether a text carries a statistic. Only `{[text]}` is left to fill.
pub fn extraction_template() -> &'static PromptTemplate {
    &EXTRACTION
}

/// Extractor running [extraction_template] against `llm`, skipping passages without numeric content.
pub fn statistic_extractor<M: CompleteText>(llm: M) -> EvidenceExtractor<StatKind, M> {
    let config = ExtractorConfig {
        require_statistic: true,
        ..ExtractorConfig::default()
    };
    EvidenceExtractor::new(EXTRACTION.clone(), llm, config)
}
