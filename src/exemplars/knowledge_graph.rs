//! Knowledge-triple extraction.
//!
//! The model is asked for `(subject, predicate, object)` tuples separated by [TRIPLE_DELIMITER], or `NONE` when the text
//! states no facts. The reply is turned into [KnowledgeTriple]s for [KnowledgeGraph](crate::graph::KnowledgeGraph).

use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, warn};
use crate::graph::KnowledgeTriple;
use crate::prompt::PromptTemplate;
use crate::utils::llm::CompleteText;

/// Separates triples in the model's reply.
pub const TRIPLE_DELIMITER: &str = "<|>";

const TRIPLE_EXTRACTION_TEMPLATE: &str = "\
You are a networked intelligence helping a human track knowledge triples about all relevant people, things, \
concepts, etc. and integrating them with your knowledge stored within your weights as well as that stored in a \
knowledge graph. Extract all of the knowledge triples from the text. A knowledge triple is a clause that contains a \
subject, a predicate, and an object. The subject is the entity being described, the predicate is the property of the \
subject that is being described, and the object is the value of the property.

EXAMPLE
It's a state in the US. It's also the number 1 producer of gold in the US.

Output: (Nevada, is a, state)<|>(Nevada, is in, US)<|>(Nevada, is the number 1 producer of, gold)
END OF EXAMPLE

EXAMPLE
I'm going to the store.

Output: NONE
END OF EXAMPLE

EXAMPLE
Acme Corp reported record revenue in 2023. Its largest market is Europe.

Output: (Acme Corp, reported, record revenue in 2023)<|>(Acme Corp, has largest market, Europe)
END OF EXAMPLE

{[text]}
Output:";

lazy_static! {
    static ref TRIPLE_EXTRACTION: PromptTemplate = PromptTemplate::new(TRIPLE_EXTRACTION_TEMPLATE);
}

/// Default template for [infer_triples]. Only `{[text]}` is left to fill.
pub fn triple_extraction_template() -> &'static PromptTemplate {
    &TRIPLE_EXTRACTION
}

/// Parses a `(subject, predicate, object)<|>(...)` reply.
///
/// `NONE` or an empty reply yields no triples. Fields are separated by `, `; anything after the second separator
/// belongs to the object. Chunks with fewer than three fields, or an empty subject or object, are skipped with a
/// warning.
///
/// # Example
/// ```
/// use finprompt::exemplars::knowledge_graph::parse_triples;
/// let triples = parse_triples("(Acme, sells, widgets)<|>(Acme, is based in, Ohio)");
/// assert_eq!(triples.len(), 2);
/// assert_eq!(triples[1].object, "Ohio");
/// assert!(parse_triples("NONE").is_empty());
/// ```
pub fn parse_triples(reply: &str) -> Vec<KnowledgeTriple> {
    let reply = reply.trim();
    if reply.is_empty() || reply == "NONE" {
        return Vec::new();
    }
    reply
        .split(TRIPLE_DELIMITER)
        .filter_map(|chunk| {
            let chunk = chunk.trim();
            let inner = chunk.strip_prefix('(').unwrap_or(chunk);
            let inner = inner.strip_suffix(')').unwrap_or(inner);
            // numbers like `$1,200` keep their comma; only `, ` separates fields
            let parts: Vec<&str> = inner.splitn(3, ", ").map(str::trim).collect();
            match parts.as_slice() {
                [subject, predicate, object] if !subject.is_empty() && !object.is_empty() =>
                    Some(KnowledgeTriple::new(*subject, *predicate, *object)),
                _ => {
                    warn!("Skipping malformed knowledge triple: {:?}", chunk);
                    None
                }
            }
        })
        .collect()
}

/// Asks `llm` for the knowledge triples stated in `text`.
///
/// `custom_prompt` replaces [triple_extraction_template]; it must have a `{[text]}` placeholder.
pub async fn infer_triples(llm: &impl CompleteText, text: &str, custom_prompt: Option<&PromptTemplate>) -> Result<Vec<KnowledgeTriple>> {
    let template = custom_prompt.unwrap_or(&TRIPLE_EXTRACTION);
    let prompt = template.format_text(text)?;
    let reply = llm.complete(&prompt).await?;
    let triples = parse_triples(&reply);
    debug!("Inferred {} knowledge triples", triples.len());
    Ok(triples)
}

#[cfg(test)]
mod test_knowledge_graph {
    use super::{infer_triples, parse_triples, triple_extraction_template};
    use crate::graph::KnowledgeTriple;
    use crate::prompt::PromptTemplate;
    use crate::utils::llm::test_llm::ScriptedLlm;

    #[test]
    fn test_parse() {
        let triples = parse_triples(" (Nevada, is a, state)<|>(Nevada, is in, US) \n");
        assert_eq!(
            vec![
                KnowledgeTriple::new("Nevada", "is a", "state"),
                KnowledgeTriple::new("Nevada", "is in", "US"),
            ],
            triples
        );
    }

    #[test]
    fn test_parse_skips_malformed() {
        let triples = parse_triples("(a, b)<|>(x, y, z)<|>(, is, empty)");
        assert_eq!(vec![KnowledgeTriple::new("x", "y", "z")], triples);
        assert!(parse_triples("  NONE ").is_empty());
        assert!(parse_triples("").is_empty());
    }

    #[test]
    fn test_parse_keeps_thousands_separators() {
        let triples = parse_triples("(Acme, reported revenue of, $1,200 million)<|>(Acme, is based in, Ohio)");
        assert_eq!(
            vec![
                KnowledgeTriple::new("Acme", "reported revenue of", "$1,200 million"),
                KnowledgeTriple::new("Acme", "is based in", "Ohio"),
            ],
            triples
        );
        let triples = parse_triples("(Acme, sells, bolts, nuts, washers)");
        assert_eq!(vec![KnowledgeTriple::new("Acme", "sells", "bolts, nuts, washers")], triples);
    }

    #[tokio::test]
    async fn test_infer_default_prompt() {
        let llm = ScriptedLlm::new(["(Acme, reported, record sales)"]);
        let triples = infer_triples(&llm, "Acme reported record sales.", None).await.unwrap();
        assert_eq!(vec![KnowledgeTriple::new("Acme", "reported", "record sales")], triples);
        let prompts = llm.prompts();
        assert!(prompts[0].ends_with("Acme reported record sales.\nOutput:"));
        assert_eq!(vec!["text"], triple_extraction_template().construct_prompt().unfilled());
    }

    #[tokio::test]
    async fn test_infer_prefilled_custom_prompt() {
        let llm = ScriptedLlm::new(["(Acme, acquired, Widget Ltd)"]);
        let custom = PromptTemplate::new(format!("Only extract facts about {{[focus]}}.\n\n{}", triple_extraction_template().str()))
            .with_partial("focus", "acquisitions")
            .unwrap();
        let triples = infer_triples(&llm, "Acme acquired Widget Ltd.", Some(&custom)).await.unwrap();
        assert_eq!(vec![KnowledgeTriple::new("Acme", "acquired", "Widget Ltd")], triples);
        let prompts = llm.prompts();
        assert!(prompts[0].starts_with("Only extract facts about acquisitions.\n\n"));
        assert!(prompts[0].ends_with("Acme acquired Widget Ltd.\nOutput:"));
    }

    #[tokio::test]
    async fn test_infer_custom_prompt() {
        let llm = ScriptedLlm::new(["NONE"]);
        let custom = PromptTemplate::new("Triples in: {[text]}");
        let triples = infer_triples(&llm, "Hello.", Some(&custom)).await.unwrap();
        assert!(triples.is_empty());
        assert_eq!(vec!["Triples in: Hello.".to_string()], llm.prompts());
    }
}
