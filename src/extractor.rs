//! # Extractor
//! The full classify/extract loop for one passage:
//!
//! ```text
//! template + passage -> prompt -> LLM -> parse_output -> verify -> accepted | rejected
//! ```
//!
//! Passages are processed one after another. Parsing and verification never fail; only the LLM call can. In a batch,
//! a failed call costs that passage only.

use anyhow::Result;
use log::{debug, warn};
use crate::prompt::PromptTemplate;
use crate::schema::Label;
use crate::utils::llm::CompleteText;
use crate::utils::postprocess::{parse_output, verify, ResultBuckets, Verdict};
use crate::utils::text::contains_statistic;
use crate::utils::token::{estimate_tokens, CountToken};

/// Knobs of an [EvidenceExtractor].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Skip passages without numeric content before calling the model
    pub require_statistic: bool,
    /// Warn when a prompt is estimated to exceed this many tokens
    pub max_prompt_tokens: Option<usize>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            require_statistic: false,
            max_prompt_tokens: None,
        }
    }
}

/// Everything a batch produced: the verified results and the passages whose LLM call failed.
#[derive(Debug)]
pub struct ExtractionRun<L: Label> {
    pub buckets: ResultBuckets<L>,
    /// Index of the passage and the error of its LLM call
    pub failures: Vec<(usize, anyhow::Error)>,
}

impl<L: Label> ExtractionRun<L> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sends passages through a prompt template and keeps the grounded results.
pub struct EvidenceExtractor<L: Label, M: CompleteText, C: CountToken = fn(&str) -> usize> {
    template: PromptTemplate,
    llm: M,
    counter: C,
    pub config: ExtractorConfig,
    _label: std::marker::PhantomData<L>,
}

impl<L: Label, M: CompleteText> EvidenceExtractor<L, M> {
    /// Extractor that estimates prompt sizes with [estimate_tokens].
    pub fn new(template: PromptTemplate, llm: M, config: ExtractorConfig) -> Self {
        Self::with_counter(template, llm, config, estimate_tokens)
    }
}

impl<L: Label, M: CompleteText, C: CountToken> EvidenceExtractor<L, M, C> {
    pub fn with_counter(template: PromptTemplate, llm: M, config: ExtractorConfig, counter: C) -> Self {
        Self {
            template,
            llm,
            counter,
            config,
            _label: std::marker::PhantomData,
        }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn llm(&self) -> &M {
        &self.llm
    }

    /// Run one passage through the model and verify the reply against it.
    pub async fn extract(&self, text: &str) -> Result<Verdict<L>> {
        if self.config.require_statistic && contains_statistic(text).is_none() {
            debug!("No statistic in passage, skipping: {}", text);
            return Ok(Verdict::Discarded("no statistic in passage".to_string()));
        }
        let mut partial_prompt = self.template.construct_prompt();
        partial_prompt.try_fill("text", text)?;
        if let Some(budget) = self.config.max_prompt_tokens {
            let tokens = partial_prompt.current_token_num(&self.counter);
            if tokens > budget {
                warn!("Prompt is {} tokens, over the budget of {}", tokens, budget);
            }
        }
        let prompt = partial_prompt.complete()?;
        let reply = self.llm.complete(&prompt).await?;
        Ok(verify(text, parse_output::<L>(&reply)))
    }

    /// Run every passage in order, collecting grounded and suspected results.
    ///
    /// A passage whose LLM call fails is logged and recorded in [ExtractionRun::failures]; the rest of the batch still
    /// runs.
    pub async fn extract_all<S: AsRef<str>>(&self, passages: impl IntoIterator<Item = S>) -> ExtractionRun<L> {
        let mut buckets = ResultBuckets::new();
        let mut failures = Vec::new();
        for (index, passage) in passages.into_iter().enumerate() {
            let passage = passage.as_ref();
            match self.extract(passage).await {
                Ok(verdict) => buckets.push(verdict),
                Err(e) => {
                    warn!("Extraction failed for passage {}: {}\nPassage: {}", index, e, passage);
                    failures.push((index, e));
                }
            }
        }
        debug!("Extraction done: {} accepted, {} rejected, {} failed",
            buckets.accepted.len(), buckets.rejected.len(), failures.len());
        ExtractionRun { buckets, failures }
    }
}
