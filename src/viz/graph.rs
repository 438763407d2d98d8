//! Schema graph assembly
//!
//! Selects a bounded subset of a snapshot's elements for display and links
//! them with a deterministic sample-edge chain. Node caps keep the layout
//! readable for large schemas.

use crate::schema::{ElementKind, NamespaceTable, SchemaElement, SchemaSnapshot};
use serde::Serialize;

/// Node size for classes (predicates render smaller)
const CLASS_NODE_SIZE: f32 = 20.0;
const PREDICATE_NODE_SIZE: f32 = 15.0;

/// Which slice of the schema to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphGroup {
    /// Every class plus domain predicates, capped
    All,

    /// Domain-specific classes and predicates only
    DomainSpecific,

    /// Elements of a single namespace
    Namespace(String),
}

impl GraphGroup {
    /// Parse a query-string group selector
    pub fn parse(s: &str) -> Self {
        match s {
            "" | "all" => GraphGroup::All,
            "domain" | "domain_specific" => GraphGroup::DomainSpecific,
            ns => GraphGroup::Namespace(ns.to_string()),
        }
    }
}

/// A drawable schema element
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub uri: String,
    pub label: String,
    pub kind: ElementKind,
    pub namespace: String,

    /// Namespace display color
    pub color: String,

    /// Render size, larger for classes
    pub size: f32,
}

impl GraphNode {
    fn from_element(el: &SchemaElement) -> Self {
        let size = match el.kind {
            ElementKind::Class => CLASS_NODE_SIZE,
            ElementKind::Predicate => PREDICATE_NODE_SIZE,
        };
        Self {
            uri: el.uri.clone(),
            label: el.label.clone(),
            kind: el.kind,
            namespace: el.namespace.clone(),
            color: NamespaceTable::color(&el.namespace).to_string(),
            size,
        }
    }
}

/// An undirected display edge between two nodes, by URI
#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// Unpositioned schema graph
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Build the display graph for a group selection
pub fn build_graph(snapshot: &SchemaSnapshot, group: &GraphGroup) -> SchemaGraph {
    let (classes, predicates): (Vec<&SchemaElement>, Vec<&SchemaElement>) = match group {
        GraphGroup::All => (
            snapshot.classes.iter().take(30).collect(),
            snapshot.domain_predicates().take(20).collect(),
        ),
        GraphGroup::DomainSpecific => (
            snapshot.domain_classes().collect(),
            snapshot.domain_predicates().take(15).collect(),
        ),
        GraphGroup::Namespace(ns) => (
            snapshot
                .classes
                .iter()
                .filter(|c| &c.namespace == ns)
                .take(20)
                .collect(),
            snapshot
                .domain_predicates()
                .filter(|p| &p.namespace == ns)
                .take(15)
                .collect(),
        ),
    };

    let nodes: Vec<GraphNode> = classes
        .into_iter()
        .chain(predicates)
        .map(GraphNode::from_element)
        .collect();

    let edges = sample_edges(&nodes);

    SchemaGraph { nodes, edges }
}

/// Deterministic sample chain: every third node links to its successor
///
/// The schema queries return flat element lists with no relation triples, so
/// the drawn edges are illustrative connectivity, not asserted statements.
fn sample_edges(nodes: &[GraphNode]) -> Vec<GraphEdge> {
    let mut edges = Vec::new();
    if nodes.len() < 2 {
        return edges;
    }

    let span = (nodes.len() - 1).min(25);
    for i in 0..span {
        if i % 3 == 0 {
            edges.push(GraphEdge {
                source: nodes[i].uri.clone(),
                target: nodes[i + 1].uri.clone(),
            });
        }
    }
    edges
}
