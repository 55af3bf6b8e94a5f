//! # finprompt
//!
//! Prompt-centric utilities for analysing financial documents with LLMs.
//!
//! ## What is in here
//!
//! * A sentiment classifier that tags phrases as strength, opportunity, milestone, weakness, challenge or unclassified
//! * A statistic extractor that tells phrases carrying statistics from ones that merely mention numbers
//! * Map/combine summarization templates
//! * Knowledge-triple extraction and an SVG knowledge-graph renderer
//!
//! ## Concepts and Design
//!
//! ### Prompt Template and Placeholder
//!
//! A template looks like
//!
//! ```text
//! Here are some examples:
//! {[examples_text]}
//! Text: {[text]}
//! ```
//!
//! `{[examples_text]}` and `{[text]}` are placeholders. The built-in templates in [exemplars] fill `examples_text` with
//! few-shot examples once, when they are first used, so a caller only ever fills `text`. See [prompt] and [filler].
//!
//! ### Parsing and Self-Verification
//!
//! LLM output formatting is unreliable, so nothing in the post-processing stages is fatal:
//!
//! 1. [parse_output](utils::postprocess::parse_output) looks for JSON in a fenced block, then in the whole output, and
//!    falls back to an empty extraction.
//! 2. [verify](utils::postprocess::verify) checks that the text the model claims to quote really occurs in the passage.
//!    Extractions whose quote is missing are kept apart as suspected hallucinations rather than thrown away.
//!
//! ### Endpoint or LLM
//!
//! Models sit behind [CompleteText](utils::llm::CompleteText). [EvidenceExtractor](extractor::EvidenceExtractor) wires a
//! template, a model and the post-processing stages together. A batch keeps going past failed LLM calls and reports
//! them next to its results.
//!
//! ## Example
//!
//! ```rust,no_run
//! use finprompt::exemplars::classification::classifier;
//! use finprompt::utils::llm::{ChatConfig, OpenAIChat};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let classifier = classifier(OpenAIChat::from_env(ChatConfig::default()));
//! let run = classifier
//!     .extract_all(["We saw record sales in the third quarter.", "We saw currency headwinds in the quarter."])
//!     .await;
//! println!("{} accepted, {} suspected hallucinations", run.buckets.accepted.len(), run.buckets.rejected.len());
//! for (index, error) in &run.failures {
//!     eprintln!("passage {} failed: {}", index, error);
//! }
//! # Ok(())
//! # }
//! ```

pub mod exemplars;
pub mod extractor;
pub mod filler;
pub mod graph;
pub mod prompt;
pub mod schema;
pub mod utils;
