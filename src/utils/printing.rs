//! Terminal report of extraction results.

use std::collections::BTreeMap;
use std::fmt::{self, Write};
use termimad::crossterm::style::{Color, Stylize};
use termimad::{FmtText, MadSkin};
use crate::schema::{Evidence, Extraction, Label, Sentiment, StatKind};
use crate::utils::postprocess::ResultBuckets;

/// Terminal color of a label.
pub trait LabelColor: Label {
    fn color(&self) -> Option<Color>;
}

impl LabelColor for Sentiment {
    fn color(&self) -> Option<Color> {
        match self {
            Sentiment::Strength => Some(Color::DarkGreen),
            Sentiment::Opportunity => Some(Color::Magenta),
            Sentiment::Milestone => Some(Color::Cyan),
            Sentiment::Weakness => Some(Color::DarkRed),
            Sentiment::Challenge => Some(Color::DarkYellow),
            Sentiment::Unclassified => Some(Color::Grey),
            Sentiment::Other(_) => None,
        }
    }
}

impl LabelColor for StatKind {
    fn color(&self) -> Option<Color> {
        match self {
            StatKind::Stat => Some(Color::DarkGreen),
            StatKind::NotStat => Some(Color::Grey),
            StatKind::Other(_) => None,
        }
    }
}

/// The label, wrapped in its color escape codes when it has one.
pub fn colored_label<L: LabelColor>(label: &L) -> String {
    match label.color() {
        Some(color) => label.as_str().with(color).to_string(),
        None => label.as_str().to_string(),
    }
}

fn cell(value: Option<&str>) -> String {
    value.unwrap_or("-").replace('|', "/").replace('\n', " ")
}

fn write_table<L: Label>(markdown: &mut String, title: &str, extractions: &[Extraction<L>]) -> fmt::Result {
    let records: Vec<&Evidence<L>> = extractions.iter().flat_map(|e| e.results.iter()).collect();
    writeln!(markdown, "## {} ({})\n", title, records.len())?;
    if records.is_empty() {
        return Ok(());
    }
    markdown.push_str("|label|note|text|\n|:-|:-|:-|\n");
    for record in records {
        let label = record.classification.as_ref().map(Label::as_str);
        writeln!(markdown, "|{}|{}|{}|", cell(label), cell(record.note.as_deref()), cell(record.text.as_deref()))?;
    }
    markdown.push('\n');
    Ok(())
}

/// Markdown report with one table for accepted and one for rejected records.
pub fn report_markdown<L: Label>(buckets: &ResultBuckets<L>) -> Result<String, fmt::Error> {
    let mut markdown = String::new();
    write_table(&mut markdown, "Accepted", &buckets.accepted)?;
    write_table(&mut markdown, "Rejected", &buckets.rejected)?;
    Ok(markdown)
}

/// Accepted labels and how often each occurs, in label order.
pub fn label_counts<L: Label>(buckets: &ResultBuckets<L>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for label in buckets.accepted.iter().flat_map(|e| e.results.iter()).filter_map(|r| r.classification.as_ref()) {
        *counts.entry(label.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

pub struct EvidencePrinter {
    pub skin: MadSkin,
    pub wrap_width: Option<usize>,
}

impl Default for EvidencePrinter {
    fn default() -> Self {
        Self {
            skin: MadSkin::default(),
            wrap_width: None,
        }
    }
}

impl EvidencePrinter {
    /// Print the report tables followed by a colored tally of accepted labels.
    pub fn print<L: LabelColor>(&self, buckets: &ResultBuckets<L>) -> fmt::Result {
        let markdown = report_markdown(buckets)?;
        print!("{}", FmtText::from(&self.skin, &markdown, self.wrap_width));
        let tally: Vec<String> = label_counts(buckets)
            .into_iter()
            .map(|(label, count)| format!("{} x{}", colored_label(&L::from(label)), count))
            .collect();
        if !tally.is_empty() {
            println!("{}", tally.join("  "));
        }
        Ok(())
    }

    /// Print a single record as `[label] note: text`.
    pub fn print_record<L: LabelColor>(&self, record: &Evidence<L>) {
        let label = record.classification.as_ref().map(colored_label).unwrap_or_else(|| "-".to_string());
        println!("[{}] {}: {}", label, record.note.as_deref().unwrap_or("-"), record.text.as_deref().unwrap_or("-"));
    }
}
