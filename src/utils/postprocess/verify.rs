//! Self-verification of extracted records against the passage they came from.
//!
//! A model asked to quote the original text sometimes quotes text that is not there. The check here is deliberately
//! coarse: only the first record's `text` is looked up, with one trailing period stripped, as a plain substring of the
//! passage. A batch whose first record fails is rejected as a whole.

use log::{info, warn};
use crate::schema::{ExtractedData, Extraction, Label};

/// Outcome of checking an extraction against its passage.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<L: Label> {
    /// The quoted text occurs in the passage
    Accepted(Extraction<L>),
    /// The quoted text does not occur in the passage, a suspected hallucination
    Rejected(Extraction<L>),
    /// Nothing to keep: no records, or data that could not be normalized
    Discarded(String),
}

impl<L: Label> Verdict<L> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

/// Accepted and rejected extractions, in the order they were produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBuckets<L: Label> {
    pub accepted: Vec<Extraction<L>>,
    pub rejected: Vec<Extraction<L>>,
}

impl<L: Label> Default for ResultBuckets<L> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<L: Label> ResultBuckets<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a verdict into its bucket. Discarded verdicts are dropped.
    pub fn push(&mut self, verdict: Verdict<L>) {
        match verdict {
            Verdict::Accepted(extraction) => self.accepted.push(extraction),
            Verdict::Rejected(extraction) => self.rejected.push(extraction),
            Verdict::Discarded(_) => {}
        }
    }

    /// Check `extracted` against `original_text` and route the outcome.
    pub fn reconcile(&mut self, original_text: &str, extracted: impl Into<ExtractedData<L>>) {
        reconcile(original_text, extracted, &mut self.accepted, &mut self.rejected);
    }
}

/// Strips one trailing period, if present.
#[inline]
fn strip_trailing_period(text: &str) -> &str {
    text.strip_suffix('.').unwrap_or(text)
}

/// Decide whether an extraction is grounded in `original_text`.
pub fn verify<L: Label>(original_text: &str, extracted: impl Into<ExtractedData<L>>) -> Verdict<L> {
    let extraction = match extracted.into().normalize() {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!("Dropping extracted data ({}) for passage: {}", e, original_text);
            return Verdict::Discarded(e.to_string());
        }
    };
    let Some(first) = extraction.results.first() else {
        return Verdict::Discarded("no records".to_string());
    };
    let Some(quoted) = first.text.as_deref() else {
        warn!("Dropping extracted data (first record has no text) for passage: {}", original_text);
        return Verdict::Discarded("first record has no text".to_string());
    };
    if original_text.contains(strip_trailing_period(quoted)) {
        Verdict::Accepted(extraction)
    } else {
        info!("Quoted text not found in passage, suspected hallucination: {:?}", quoted);
        Verdict::Rejected(extraction)
    }
}

/// Check `extracted` against `original_text`, appending it to `accepted` or `rejected`.
///
/// Never fails: data that cannot be normalized, or that has no records, is dropped without touching either list.
pub fn reconcile<L: Label>(
    original_text: &str,
    extracted: impl Into<ExtractedData<L>>,
    accepted: &mut Vec<Extraction<L>>,
    rejected: &mut Vec<Extraction<L>>,
) {
    match verify(original_text, extracted) {
        Verdict::Accepted(extraction) => accepted.push(extraction),
        Verdict::Rejected(extraction) => rejected.push(extraction),
        Verdict::Discarded(_) => {}
    }
}
