//! Application layer: wires parser, graph builder, and exporter together.

use crate::domain::builder::GraphBuilder;
use crate::error::VizError;
use crate::ports::{AstParser, GraphExporter};

/// One-shot visualisation pipeline: parse source, build the display graph,
/// export it. Every run is independent; nothing is shared across calls.
pub struct VisualizeUsecase<'a> {
    pub parser: &'a dyn AstParser,
    pub exporter: &'a dyn GraphExporter,
}

impl<'a> VisualizeUsecase<'a> {
    pub fn run(&self, source: &str, export_path: &str) -> Result<(), VizError> {
        let ast = self.parser.parse(source)?;
        let graph = GraphBuilder::build(Some(&ast))?;
        tracing::info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            path = export_path,
            "exporting display graph"
        );
        self.exporter.export(&graph, export_path)?;
        Ok(())
    }
}
