//! # Prompt Exemplars
//!
//! Ready-made templates for financial-document analysis. Each template is built once, on first use, with its few-shot
//! examples already rendered into it, so only `{[text]}` is left to fill.
//!
//! * [classification]: tag phrases as strength, opportunity, milestone, weakness, challenge or unclassified
//! * [statistics]: tell phrases carrying statistics from ones that merely contain numbers
//! * [summarization]: map/combine templates and a map-reduce summarizer
//! * [knowledge_graph]: knowledge-triple extraction

pub mod classification;
pub mod knowledge_graph;
pub mod statistics;
pub mod summarization;

use crate::filler::FewShot;
use crate::prompt::PromptTemplate;
use crate::schema::Label;

/// Template with its `{[examples_text]}` placeholder filled by `few_shot`.
///
/// Only called on the built-in templates, whose placeholders are known to exist.
pub(crate) fn few_shot_template<L: Label>(template: &str, few_shot: &FewShot<L>) -> PromptTemplate {
    PromptTemplate::new(template)
        .with_partial_filler(few_shot)
        .unwrap_or_else(|e| panic!("built-in template is malformed: {}", e))
}
