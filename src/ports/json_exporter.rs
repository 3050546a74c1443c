//! JSON exporter.
//!
//! Serialises a display graph for consumers that do their own drawing.

use crate::domain::classify::{classify, Category};
use crate::domain::graph::{DisplayEdge, DisplayGraph, NodeKey};
use crate::ports::GraphExporter;
use serde::Serialize;

pub struct JsonExporter;

#[derive(Debug, Serialize)]
struct GraphDto<'a> {
    root: Option<&'a NodeKey>,
    nodes: Vec<NodeDto<'a>>,
    edges: &'a [DisplayEdge],
}

#[derive(Debug, Serialize)]
struct NodeDto<'a> {
    id: String,
    label: &'a str,
    category: &'static str,
}

impl GraphExporter for JsonExporter {
    fn export(&self, graph: &DisplayGraph, path: &str) -> std::io::Result<()> {
        std::fs::write(path, Self::to_json(graph)?)
    }
}

impl JsonExporter {
    /// Convert a display graph to pretty-printed JSON.
    pub fn to_json(graph: &DisplayGraph) -> std::io::Result<String> {
        let dto = GraphDto {
            root: graph.root.as_ref(),
            nodes: graph
                .nodes
                .iter()
                .map(|key| {
                    let label = graph.label(key).unwrap_or(&key.type_name);
                    NodeDto {
                        id: key.to_string(),
                        label,
                        category: category_name(classify(label)),
                    }
                })
                .collect(),
            edges: &graph.edges,
        };
        serde_json::to_string_pretty(&dto).map_err(std::io::Error::from)
    }
}

fn category_name(category: Category) -> &'static str {
    match category {
        Category::Module => "module",
        Category::ClassDefinition => "class-definition",
        Category::FunctionDefinition => "function-definition",
        Category::Other => "other",
    }
}
