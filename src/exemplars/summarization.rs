//! Map-reduce summarization of financial documents.
//!
//! Every document is summarized on its own with the map template, then the partial summaries are joined and condensed
//! once with the combine template.

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use log::debug;
use crate::prompt::PromptTemplate;
use crate::utils::llm::CompleteText;

const MAP_TEMPLATE: &str = "\
The following is a document:
{[text]}
Please identify the main themes of this document.
Pay close attention to mentions of financial performance,
product strength/weakness, geographic strength/weakness,
future business outlook and financial guidance.
No yapping, no preamble, no other remarks.
";

const COMBINE_TEMPLATE: &str = "\
The following are summaries of different documents:
{[text]}
Please provide a consolidated summary of the main themes.
Pay close attention to mentions of financial performance,
product strength/weakness, geographic strength/weakness,
future business outlook and financial guidance.
No yapping, no preamble, no other remarks.
";

lazy_static! {
    static ref MAP: PromptTemplate = PromptTemplate::new(MAP_TEMPLATE);
    static ref COMBINE: PromptTemplate = PromptTemplate::new(COMBINE_TEMPLATE);
}

/// Template summarizing the themes of a single document.
pub fn map_template() -> &'static PromptTemplate {
    &MAP
}

/// Template consolidating several summaries into one.
pub fn combine_template() -> &'static PromptTemplate {
    &COMBINE
}

/// Summarizes documents with a map step per document and a single combine step.
pub struct MapReduceSummarizer<M: CompleteText> {
    llm: M,
    pub map_template: PromptTemplate,
    pub combine_template: PromptTemplate,
}

impl<M: CompleteText> MapReduceSummarizer<M> {
    pub fn new(llm: M) -> Self {
        Self {
            llm,
            map_template: MAP.clone(),
            combine_template: COMBINE.clone(),
        }
    }

    /// Summarize one document with the map template.
    pub async fn map(&self, document: &str) -> Result<String> {
        let prompt = self.map_template.format_text(document)?;
        self.llm.complete(&prompt).await
    }

    /// Consolidate partial summaries with the combine template.
    pub async fn combine<S: AsRef<str>>(&self, summaries: &[S]) -> Result<String> {
        let joined = summaries.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n\n");
        let prompt = self.combine_template.format_text(&joined)?;
        self.llm.complete(&prompt).await
    }

    /// Map every document in order, then combine.
    pub async fn summarize<S: AsRef<str>>(&self, documents: &[S]) -> Result<String> {
        if documents.is_empty() {
            bail!("nothing to summarize");
        }
        let mut summaries = Vec::with_capacity(documents.len());
        for (idx, document) in documents.iter().enumerate() {
            debug!("Summarizing document {}/{}", idx + 1, documents.len());
            summaries.push(self.map(document.as_ref()).await?);
        }
        self.combine(&summaries).await
    }
}

#[cfg(test)]
mod test_summarization {
    use super::{combine_template, map_template, MapReduceSummarizer};
    use crate::utils::llm::test_llm::ScriptedLlm;

    #[test]
    fn test_templates() {
        let prompt = map_template().format_text("Q3 revenue was up.").unwrap();
        assert!(prompt.starts_with("The following is a document:\nQ3 revenue was up.\n"));
        let prompt = combine_template().format_text("a\n\nb").unwrap();
        assert!(prompt.contains("summaries of different documents:\na\n\nb\n"));
    }

    #[tokio::test]
    async fn test_map_reduce() {
        let llm = ScriptedLlm::new(["growth", "headwinds", "growth despite headwinds"]);
        let summarizer = MapReduceSummarizer::new(llm);
        let summary = summarizer.summarize(&["doc one", "doc two"]).await.unwrap();
        assert_eq!("growth despite headwinds", summary);

        let prompts = summarizer.llm.prompts();
        assert_eq!(3, prompts.len());
        assert!(prompts[0].contains("doc one"));
        assert!(prompts[1].contains("doc two"));
        assert!(prompts[2].contains("growth\n\nheadwinds"));
    }

    #[tokio::test]
    async fn test_nothing_to_summarize() {
        let summarizer = MapReduceSummarizer::new(ScriptedLlm::default());
        let documents: [&str; 0] = [];
        assert!(summarizer.summarize(&documents).await.is_err());
    }
}
