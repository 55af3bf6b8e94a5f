//! # Schema
//! Records extracted from a passage by an LLM.
//!
//! Both the sentiment classifier and the statistic extractor ask the model for the same shape,
//!
//! ```json
//! {"results": [{"text": "...", "note": "...", "classification": "..."}]}
//! ```
//!
//! and only differ in the label set, so a record is an [Evidence] generic over its [Label].
//! Labels are closed enums with an `Other` variant: any string the model returns still deserializes and serializes back
//! unchanged.

use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A classification label that can be read from and written back to the string the model produces.
pub trait Label: Clone + Debug + PartialEq + Serialize + DeserializeOwned + From<String> + Into<String> {
    /// All labels the prompt asks the model to choose from, in prompt order.
    fn choices() -> &'static [&'static str];

    /// The label as the model spells it.
    fn as_str(&self) -> &str;

    /// Whether the label is one of [Label::choices].
    fn is_known(&self) -> bool {
        Self::choices().contains(&self.as_str())
    }
}

/// Business-sentiment category of a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Strength,
    Opportunity,
    Milestone,
    Weakness,
    Challenge,
    Unclassified,
    /// Anything the model returned outside the known set
    Other(String),
}

impl Label for Sentiment {
    fn choices() -> &'static [&'static str] {
        &["strength", "opportunity", "milestone", "weakness", "challenge", "unclassified"]
    }

    fn as_str(&self) -> &str {
        match self {
            Sentiment::Strength => "strength",
            Sentiment::Opportunity => "opportunity",
            Sentiment::Milestone => "milestone",
            Sentiment::Weakness => "weakness",
            Sentiment::Challenge => "challenge",
            Sentiment::Unclassified => "unclassified",
            Sentiment::Other(other) => other,
        }
    }
}

impl From<String> for Sentiment {
    fn from(value: String) -> Self {
        match value.as_str() {
            "strength" => Sentiment::Strength,
            "opportunity" => Sentiment::Opportunity,
            "milestone" => Sentiment::Milestone,
            "weakness" => Sentiment::Weakness,
            "challenge" => Sentiment::Challenge,
            "unclassified" => Sentiment::Unclassified,
            _ => Sentiment::Other(value),
        }
    }
}

impl From<Sentiment> for String {
    fn from(value: Sentiment) -> Self {
        match value {
            Sentiment::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// Whether a phrase carries a statistic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatKind {
    Stat,
    NotStat,
    Other(String),
}

impl Label for StatKind {
    fn choices() -> &'static [&'static str] {
        &["stat", "not stat"]
    }

    fn as_str(&self) -> &str {
        match self {
            StatKind::Stat => "stat",
            StatKind::NotStat => "not stat",
            StatKind::Other(other) => other,
        }
    }
}

impl From<String> for StatKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "stat" => StatKind::Stat,
            "not stat" => StatKind::NotStat,
            _ => StatKind::Other(value),
        }
    }
}

impl From<StatKind> for String {
    fn from(value: StatKind) -> Self {
        match value {
            StatKind::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for StatKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of evidence extracted from a passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "L: Label")]
pub struct Evidence<L: Label> {
    /// The original text
    pub text: Option<String>,
    /// The phrase carrying the signal
    pub note: Option<String>,
    pub classification: Option<L>,
}

impl<L: Label> Evidence<L> {
    pub fn new(text: impl Into<String>, note: Option<&str>, classification: L) -> Self {
        Self {
            text: Some(text.into()),
            note: note.map(String::from),
            classification: Some(classification),
        }
    }
}

/// Records the model returned for a single passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "L: Label")]
pub struct Extraction<L: Label> {
    pub results: Vec<Evidence<L>>,
}

impl<L: Label> Extraction<L> {
    pub fn empty() -> Self {
        Self { results: Vec::new() }
    }

    pub fn single(evidence: Evidence<L>) -> Self {
        Self { results: vec![evidence] }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

impl<L: Label> Default for Extraction<L> {
    fn default() -> Self {
        Self::empty()
    }
}

pub type Note = Evidence<Sentiment>;
pub type Notes = Extraction<Sentiment>;
pub type Stat = Evidence<StatKind>;
pub type Stats = Extraction<StatKind>;

/// Parser output before it is trusted: either a generic JSON value or an already typed extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedData<L: Label> {
    Untyped(Value),
    Typed(Extraction<L>),
}

impl<L: Label> From<Extraction<L>> for ExtractedData<L> {
    fn from(value: Extraction<L>) -> Self {
        ExtractedData::Typed(value)
    }
}

impl<L: Label> From<Value> for ExtractedData<L> {
    fn from(value: Value) -> Self {
        ExtractedData::Untyped(value)
    }
}

impl<L: Label> ExtractedData<L> {
    /// Turn the data into a typed extraction.
    ///
    /// An untyped value must be an object whose `results` is an array of objects. Only `text`, `note` and
    /// `classification` are read from each entry, and each of them must be a string or null.
    pub fn normalize(self) -> Result<Extraction<L>, errors::NormalizeError> {
        match self {
            ExtractedData::Typed(extraction) => Ok(extraction),
            ExtractedData::Untyped(value) => normalize_value(&value),
        }
    }
}

fn normalize_value<L: Label>(value: &Value) -> Result<Extraction<L>, errors::NormalizeError> {
    use errors::NormalizeError;

    let object = value.as_object().ok_or(NormalizeError::NotAnObject)?;
    let results = object
        .get("results")
        .ok_or(NormalizeError::MissingResults)?
        .as_array()
        .ok_or(NormalizeError::ResultsNotArray)?;
    let results = results
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = entry.as_object().ok_or(NormalizeError::EntryNotObject { index })?;
            let field = |name: &'static str| -> Result<Option<String>, NormalizeError> {
                match entry.get(name) {
                    None | Some(Value::Null) => Ok(None),
                    Some(Value::String(s)) => Ok(Some(s.clone())),
                    Some(other) => Err(NormalizeError::FieldNotString { index, field: name, found: other.clone() }),
                }
            };
            Ok(Evidence {
                text: field("text")?,
                note: field("note")?,
                classification: field("classification")?.map(L::from),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Extraction { results })
}

pub mod errors {
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;
    use serde_json::Value;

    /// Error when an untyped JSON value does not have the shape of an extraction.
    #[derive(Debug, Clone, PartialEq)]
    pub enum NormalizeError {
        NotAnObject,
        MissingResults,
        ResultsNotArray,
        EntryNotObject { index: usize },
        FieldNotString { index: usize, field: &'static str, found: Value },
    }

    impl fmt::Display for NormalizeError {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            match self {
                NormalizeError::NotAnObject => write!(f, "NormalizeError: extracted data is not a JSON object"),
                NormalizeError::MissingResults => write!(f, "NormalizeError: extracted data has no `results` key"),
                NormalizeError::ResultsNotArray => write!(f, "NormalizeError: `results` is not an array"),
                NormalizeError::EntryNotObject { index } => write!(f, "NormalizeError: results[{}] is not an object", index),
                NormalizeError::FieldNotString { index, field, found } =>
                    write!(f, "NormalizeError: results[{}].{} should be a string or null, got {}", index, field, found),
            }
        }
    }

    impl Error for NormalizeError {}
}
