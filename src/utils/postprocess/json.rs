use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use serde_json::Value;
use crate::schema::{ExtractedData, Extraction, Label};

/// Marker that opens and closes a fenced block.
pub const FENCE: &str = "```";

lazy_static! {
    static ref JSON_FENCE_RE: Regex = Regex::new(r"(?s)```json\n(.*?)```").unwrap();
}

/// Returns the trimmed content of the first fenced block tagged `json`, if any.
///
/// # Example
/// ```
/// use finprompt::utils::postprocess::json::extract_fenced_json;
/// let output = "Sure!\n```json\n{\"results\": []}\n```";
/// assert_eq!(extract_fenced_json(output), Some("{\"results\": []}"));
/// assert_eq!(extract_fenced_json("{\"results\": []}"), None);
/// ```
pub fn extract_fenced_json(output: &str) -> Option<&str> {
    JSON_FENCE_RE
        .captures(output)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
}

fn try_parse_output<L: Label>(output: &str) -> Result<ExtractedData<L>> {
    if let Some(json_str) = extract_fenced_json(output) {
        let data: Extraction<L> = serde_json::from_str(json_str)?;
        Ok(ExtractedData::Typed(data))
    } else if output.contains(FENCE) {
        let value: Value = serde_json::from_str(&output.replace(FENCE, ""))?;
        Ok(ExtractedData::Untyped(value))
    } else {
        let data: Extraction<L> = serde_json::from_str(output)?;
        Ok(ExtractedData::Typed(data))
    }
}

/// Parses an LLM completion into extracted data. Never fails.
///
/// The payload is looked up in this order:
/// 1. the first fenced block tagged `json`, deserialized against the schema;
/// 2. if the output has any fence marker, the whole output with the markers removed, as generic JSON that is
///    normalized later;
/// 3. the whole output, deserialized against the schema.
///
/// Anything that fails to parse is logged and yields an empty extraction.
///
/// # Example
/// ```
/// use finprompt::schema::{ExtractedData, Sentiment};
/// use finprompt::utils::postprocess::json::parse_output;
/// let data = parse_output::<Sentiment>("no json here");
/// assert_eq!(data, ExtractedData::Typed(Default::default()));
/// ```
pub fn parse_output<L: Label>(output: &str) -> ExtractedData<L> {
    match try_parse_output(output) {
        Ok(data) => data,
        Err(e) => {
            warn!("Error parsing output: {}", e);
            debug!("Unparsable output:\n{}", output);
            ExtractedData::Typed(Extraction::empty())
        }
    }
}
