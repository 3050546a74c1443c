//! Graphviz DOT exporter.
//!
//! Renders a display graph as DOT for Graphviz to lay out and draw. Node
//! fill colours follow the classifier: modules green, class definitions
//! yellow, function definitions pink, everything else blue.

use crate::domain::classify::{classify, Category};
use crate::domain::graph::DisplayGraph;
use crate::ports::GraphExporter;

pub struct DotExporter;

impl GraphExporter for DotExporter {
    fn export(&self, graph: &DisplayGraph, path: &str) -> std::io::Result<()> {
        std::fs::write(path, Self::to_dot(graph))
    }
}

impl DotExporter {
    /// Convert a display graph to DOT text.
    pub fn to_dot(graph: &DisplayGraph) -> String {
        let mut lines = Vec::new();

        lines.push("digraph Ast {".to_string());
        lines.push("    rankdir=TB;".to_string());
        lines.push("    node [fontname=\"Helvetica\", fontsize=11, style=filled];".to_string());
        lines.push("    edge [arrowsize=0.7];".to_string());
        lines.push(String::new());

        for key in &graph.nodes {
            let label = graph.label(key).unwrap_or(&key.type_name);
            lines.push(format!(
                "    \"{}\" [label=\"{}\", fillcolor=\"{}\"];",
                key,
                Self::escape_label(label),
                Self::fill_color(classify(label)),
            ));
        }

        lines.push(String::new());

        for edge in &graph.edges {
            lines.push(format!("    \"{}\" -> \"{}\";", edge.from, edge.to));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }

    fn fill_color(category: Category) -> &'static str {
        match category {
            Category::Module => "#b3ffb3",             // Green
            Category::ClassDefinition => "#ffffb3",    // Yellow
            Category::FunctionDefinition => "#ffb3ff", // Pink
            Category::Other => "#1f78b4",              // Blue
        }
    }

    fn escape_label(label: &str) -> String {
        label
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{DisplayEdge, NodeKey};
    use std::collections::HashMap;

    fn sample_graph() -> DisplayGraph {
        let root = NodeKey::new("Module", 0);
        let child = NodeKey::new("FunctionDef", 1);
        let mut labels = HashMap::new();
        labels.insert(root.clone(), "Module".to_string());
        labels.insert(child.clone(), "FunctionDef main".to_string());
        DisplayGraph {
            root: Some(root.clone()),
            nodes: vec![root.clone(), child.clone()],
            edges: vec![DisplayEdge {
                from: root,
                to: child,
            }],
            labels,
        }
    }

    #[test]
    fn test_to_dot_structure() {
        let dot = DotExporter::to_dot(&sample_graph());
        assert!(dot.contains("digraph Ast"));
        assert!(dot.contains("rankdir=TB"));
        assert!(dot.contains("\"Module_0\""));
        assert!(dot.contains("\"Module_0\" -> \"FunctionDef_1\";"));
    }

    #[test]
    fn test_category_colours() {
        let dot = DotExporter::to_dot(&sample_graph());
        assert!(dot.contains("label=\"Module\", fillcolor=\"#b3ffb3\""));
        assert!(dot.contains("label=\"FunctionDef main\", fillcolor=\"#ffb3ff\""));
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut graph = sample_graph();
        let key = NodeKey::new("Constant", 2);
        graph.nodes.push(key.clone());
        graph
            .labels
            .insert(key, "Constant \"quoted\"".to_string());
        let dot = DotExporter::to_dot(&graph);
        assert!(dot.contains("Constant \\\"quoted\\\""));
    }
}
