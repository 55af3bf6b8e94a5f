use std::env;
use std::fs;
use finprompt::exemplars::knowledge_graph::{infer_triples, parse_triples, triple_extraction_template};
use finprompt::graph::{KnowledgeGraph, LayoutConfig, RenderConfig};
use finprompt::prompt::PromptTemplate;
use finprompt::utils::llm::{ChatConfig, OpenAIChat};

const TEXT: &str = "Acme Corp reported record revenue of $1,200 million in 2023. Its largest market is Europe, \
where it faces currency headwinds. Acme Corp acquired Widget Ltd.";

/// Draws the graph of a canned reply, or of a live one when `--live` is passed.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let triples = if env::args().any(|arg| arg == "--live") {
        let prompt = PromptTemplate::new(format!("Only extract facts about {{[focus]}}.\n\n{}", triple_extraction_template().str()))
            .with_partial("focus", "revenue, markets and acquisitions")?;
        infer_triples(&OpenAIChat::from_env(ChatConfig::default()), TEXT, Some(&prompt)).await?
    } else {
        parse_triples("(Acme Corp, reported, record revenue of $1,200 million in 2023)<|>(Acme Corp, has largest market, Europe)\
            <|>(Acme Corp, faces, currency headwinds)<|>(Acme Corp, acquired, Widget Ltd)")
    };
    let graph = KnowledgeGraph::from_triples(&triples);
    let svg = graph.draw(&LayoutConfig::default(), &RenderConfig::default())?;
    fs::write("knowledge_graph.svg", svg)?;
    println!("Wrote knowledge_graph.svg ({} nodes, {} edges)", graph.node_count(), graph.edge_count());
    Ok(())
}
