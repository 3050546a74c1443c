//! Display graph structures for astview.
//!
//! Represents the identified, labelled node/edge structure handed to the
//! renderer. The graph mirrors the syntax tree (minus folded context
//! markers), so it is acyclic and the root has no incoming edges.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Uniquely addresses one syntax node within one build: the node's type name
/// plus an identity token drawn from a per-build counter. Tokens are never
/// reused inside a build, so two structurally identical nodes always get
/// distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeKey {
    pub type_name: String,
    pub token: u64,
}

impl NodeKey {
    pub fn new(type_name: impl Into<String>, token: u64) -> Self {
        Self {
            type_name: type_name.into(),
            token,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.type_name, self.token)
    }
}

/// A parent→child edge in the display graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEdge {
    pub from: NodeKey,
    pub to: NodeKey,
}

/// The displayable graph: node keys in discovery order, edges in insertion
/// order, one label per node, and the designated root (the first node the
/// traversal visited). Holds no references back to the syntax tree.
#[derive(Debug, Clone, Default)]
pub struct DisplayGraph {
    pub root: Option<NodeKey>,
    pub nodes: Vec<NodeKey>,
    pub edges: Vec<DisplayEdge>,
    pub labels: HashMap<NodeKey, String>,
}

impl DisplayGraph {
    /// The label recorded for a node key.
    pub fn label(&self, key: &NodeKey) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Number of edges pointing at `key`.
    pub fn incoming_count(&self, key: &NodeKey) -> usize {
        self.edges.iter().filter(|e| &e.to == key).count()
    }

    /// Keys of the direct children of `key`, in edge insertion order.
    pub fn outgoing<'a>(&'a self, key: &'a NodeKey) -> impl Iterator<Item = &'a NodeKey> {
        self.edges
            .iter()
            .filter(move |e| &e.from == key)
            .map(|e| &e.to)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when the edge structure contains no directed cycle. The builder
    /// only ever mirrors a tree, so this holds for every graph it produces;
    /// exposed for validation and tests.
    pub fn is_acyclic(&self) -> bool {
        // Kahn-style elimination over in-degrees.
        let mut indegree: HashMap<&NodeKey, usize> =
            self.nodes.iter().map(|k| (k, 0)).collect();
        for edge in &self.edges {
            if let Some(d) = indegree.get_mut(&edge.to) {
                *d += 1;
            }
        }
        let mut ready: Vec<&NodeKey> = indegree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(k, _)| *k)
            .collect();
        let mut removed = 0;
        while let Some(key) = ready.pop() {
            removed += 1;
            for next in self.outgoing(key) {
                if let Some(d) = indegree.get_mut(next) {
                    *d -= 1;
                    if *d == 0 {
                        ready.push(next);
                    }
                }
            }
        }
        removed == self.nodes.len()
    }
}
