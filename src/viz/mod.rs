//! Schema graph visualization
//!
//! Builds a node/edge view over a snapshot and positions it with a
//! force-directed spring layout. All output is plain data; rendering is the
//! client's job.

mod graph;
mod layout;

pub use graph::{build_graph, GraphEdge, GraphGroup, GraphNode, SchemaGraph};
pub use layout::{spring_layout, Point, DEFAULT_ITERATIONS};

use crate::schema::SchemaSnapshot;
use serde::Serialize;

/// A graph node with layout coordinates in the unit square
#[derive(Debug, Clone, Serialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: GraphNode,
    pub x: f32,
    pub y: f32,
}

/// Fully laid-out schema graph, ready to serialize
#[derive(Debug, Clone, Serialize)]
pub struct PositionedGraph {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<GraphEdge>,
}

/// Build and lay out the schema graph for a group selection
pub fn positioned_graph(snapshot: &SchemaSnapshot, group: &GraphGroup) -> PositionedGraph {
    let graph = build_graph(snapshot, group);

    let index_of: std::collections::HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.uri.as_str(), i))
        .collect();

    let edge_indices: Vec<(usize, usize)> = graph
        .edges
        .iter()
        .filter_map(|e| {
            Some((
                *index_of.get(e.source.as_str())?,
                *index_of.get(e.target.as_str())?,
            ))
        })
        .collect();

    let positions = spring_layout(graph.nodes.len(), &edge_indices, DEFAULT_ITERATIONS);

    let nodes = graph
        .nodes
        .into_iter()
        .zip(positions)
        .map(|(node, p)| PositionedNode {
            node,
            x: p.x,
            y: p.y,
        })
        .collect();

    PositionedGraph {
        nodes,
        edges: graph.edges,
    }
}
