//! Graph builder: turns a syntax tree into a display graph.
//!
//! Walks the tree breadth-first, assigns every node a unique key, records
//! parent→child edges, and synthesises labels. Usage-context markers
//! (Load/Store/Del) never become graph nodes: they are folded into the
//! parent's label when the parent exposes an identifier, so `x = 1` renders
//! its name reference as `x` rather than as a `Name` node with a dangling
//! `Store` child.

use crate::domain::ast::{NodeKind, SyntaxNode};
use crate::domain::graph::{DisplayEdge, DisplayGraph, NodeKey};
use crate::error::VizError;
use std::collections::VecDeque;

/// Builds a [`DisplayGraph`] from one syntax tree. Identity tokens come from
/// a counter scoped to the build, so concurrent builds never share state and
/// keys are unique by construction — no post-hoc collision patching.
pub struct GraphBuilder {
    next_token: u64,
}

impl GraphBuilder {
    /// Build the display graph for the tree rooted at `root`.
    ///
    /// The first node visited becomes the graph's designated root. An absent
    /// root is the only failure mode; any well-formed tree — childless
    /// roots, deeply nested constants, chains of context markers — builds
    /// without error.
    pub fn build(root: Option<&SyntaxNode>) -> Result<DisplayGraph, VizError> {
        let root = root.ok_or(VizError::MalformedTree)?;

        let mut builder = GraphBuilder { next_token: 0 };
        let mut graph = DisplayGraph::default();
        let root_key = builder.admit(root, &mut graph);
        graph.root = Some(root_key.clone());

        let mut queue: VecDeque<(&SyntaxNode, NodeKey)> = VecDeque::new();
        queue.push_back((root, root_key));

        while let Some((node, key)) = queue.pop_front() {
            for child in node.children() {
                if let NodeKind::ContextMarker(_) = child.kind() {
                    // Fold: drop the marker and let the parent's label show
                    // the referenced name instead, when there is one.
                    if let Some(ident) = node.identifier() {
                        graph.labels.insert(key.clone(), ident.to_string());
                    }
                    continue;
                }
                let child_key = builder.admit(child, &mut graph);
                graph.edges.push(DisplayEdge {
                    from: key.clone(),
                    to: child_key.clone(),
                });
                queue.push_back((child, child_key));
            }
        }

        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "display graph built"
        );
        Ok(graph)
    }

    /// Assign a fresh key to `node` and record it with its label.
    fn admit(&mut self, node: &SyntaxNode, graph: &mut DisplayGraph) -> NodeKey {
        let key = NodeKey::new(node.type_name.clone(), self.next_token);
        self.next_token += 1;
        graph.nodes.push(key.clone());
        graph.labels.insert(key.clone(), Self::label_for(node));
        key
    }

    /// Synthesise the display label: the type name, with the rendered value
    /// appended for constants and the declared name for function
    /// definitions. Every other type name labels as itself.
    fn label_for(node: &SyntaxNode) -> String {
        match node.kind() {
            NodeKind::Constant => match node.scalar("value") {
                Some(value) => format!("{} {}", node.type_name, value),
                None => node.type_name.clone(),
            },
            NodeKind::FunctionDef => match node.scalar("name") {
                Some(name) => format!("{} {}", node.type_name, name),
                None => node.type_name.clone(),
            },
            _ => node.type_name.clone(),
        }
    }
}
