//! # Knowledge Graph
//! A directed graph built from knowledge triples, laid out with a force-directed layout and drawn as SVG.
//!
//! Nodes are the unique subjects and objects, in the order they were first seen. Each ordered (subject, object) pair
//! is one edge labeled with its predicate; a later triple for the same pair replaces the label.

use std::collections::HashMap;
use log::info;
use serde::{Deserialize, Serialize};

pub mod layout;
pub mod render;

pub use layout::{spring_layout, LayoutConfig};
pub use render::{render_svg, RenderConfig};

/// A (subject, predicate, object) fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnowledgeTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl KnowledgeTriple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// An edge between two node indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: Vec<String>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<(usize, usize), usize>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triples<'a>(triples: impl IntoIterator<Item = &'a KnowledgeTriple>) -> Self {
        let mut graph = Self::new();
        for triple in triples {
            graph.add_triple(triple);
        }
        info!("Graph has {} nodes and {} edges", graph.node_count(), graph.edge_count());
        graph
    }

    /// Index of `name`, inserting it if it is new.
    pub fn add_node(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(name.to_string());
        self.node_index.insert(name.to_string(), idx);
        idx
    }

    pub fn add_triple(&mut self, triple: &KnowledgeTriple) {
        let source = self.add_node(&triple.subject);
        let target = self.add_node(&triple.object);
        match self.edge_index.get(&(source, target)) {
            Some(&edge) => self.edges[edge].label = triple.predicate.clone(),
            None => {
                self.edge_index.insert((source, target), self.edges.len());
                self.edges.push(Edge { source, target, label: triple.predicate.clone() });
            }
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Label of the edge from `source` to `target`, by node name.
    pub fn edge_label(&self, source: &str, target: &str) -> Option<&str> {
        let source = *self.node_index.get(source)?;
        let target = *self.node_index.get(target)?;
        self.edge_index
            .get(&(source, target))
            .map(|&edge| self.edges[edge].label.as_str())
    }

    /// Lay the graph out and draw it.
    pub fn draw(&self, layout: &LayoutConfig, render: &RenderConfig) -> Result<String, std::fmt::Error> {
        let positions = spring_layout(self, layout);
        render_svg(self, &positions, render)
    }
}

#[cfg(test)]
mod test_graph {
    use super::{KnowledgeGraph, KnowledgeTriple};

    fn triples() -> Vec<KnowledgeTriple> {
        vec![
            KnowledgeTriple::new("Acme", "reported", "record sales"),
            KnowledgeTriple::new("Acme", "operates in", "Europe"),
            KnowledgeTriple::new("Europe", "faces", "currency headwinds"),
            KnowledgeTriple::new("Acme", "expanded in", "Europe"),
        ]
    }

    #[test]
    fn test_unique_nodes_in_order() {
        let graph = KnowledgeGraph::from_triples(&triples());
        assert_eq!(
            vec!["Acme", "record sales", "Europe", "currency headwinds"],
            graph.nodes().iter().map(String::as_str).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_repeated_pair_keeps_last_predicate() {
        let graph = KnowledgeGraph::from_triples(&triples());
        assert_eq!(3, graph.edge_count());
        assert_eq!(Some("expanded in"), graph.edge_label("Acme", "Europe"));
        assert_eq!(None, graph.edge_label("Europe", "Acme"));
    }

    #[test]
    fn test_reverse_edge_is_distinct() {
        let graph = KnowledgeGraph::from_triples(&[
            KnowledgeTriple::new("a", "owns", "b"),
            KnowledgeTriple::new("b", "owned by", "a"),
        ]);
        assert_eq!(2, graph.node_count());
        assert_eq!(2, graph.edge_count());
    }

    #[test]
    fn test_triple_serde() {
        let triple: KnowledgeTriple = serde_json::from_str(r#"{"subject": "a", "predicate": "b", "object": "c"}"#).unwrap();
        assert_eq!(KnowledgeTriple::new("a", "b", "c"), triple);
    }
}
