use finprompt::exemplars::classification::classifier;
use finprompt::exemplars::statistics::statistic_extractor;
use finprompt::schema::Label;
use finprompt::utils::llm::{ChatConfig, OpenAIChat};
use finprompt::utils::printing::EvidencePrinter;
use finprompt::utils::text::split_sentences;

const TRANSCRIPT: &str = "We saw record sales in the third quarter. \
Revenue grew 12% year over year to $500M. \
We saw currency headwinds in the quarter. \
We believe that this market will grow above expectations.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let sentences = split_sentences(TRANSCRIPT);
    let printer = EvidencePrinter::default();

    let classifier = classifier(OpenAIChat::from_env(ChatConfig::default()));
    let notes = classifier.extract_all(&sentences).await;
    printer.print(&notes.buckets)?;
    let off_taxonomy = notes.buckets.accepted
        .iter()
        .flat_map(|e| e.results.iter())
        .filter_map(|r| r.classification.as_ref())
        .filter(|label| !label.is_known())
        .count();
    if off_taxonomy > 0 {
        println!("{} accepted notes carry a label outside the taxonomy", off_taxonomy);
    }

    let extractor = statistic_extractor(OpenAIChat::from_env(ChatConfig::default()));
    let stats = extractor.extract_all(&sentences).await;
    printer.print(&stats.buckets)?;

    for (index, error) in notes.failures.iter().chain(stats.failures.iter()) {
        eprintln!("Sentence {} failed: {}", index, error);
    }
    Ok(())
}
