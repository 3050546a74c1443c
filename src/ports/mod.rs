//! Output and parsing boundaries for astview.

use crate::domain::ast::SyntaxNode;
use crate::domain::graph::DisplayGraph;
use crate::error::VizError;

pub mod dot_exporter;
pub mod json_exporter;

/// Turns source text into a syntax tree.
pub trait AstParser {
    fn parse(&self, source: &str) -> Result<SyntaxNode, VizError>;
}

/// Writes a display graph to a file in some concrete format.
pub trait GraphExporter {
    fn export(&self, graph: &DisplayGraph, path: &str) -> std::io::Result<()>;
}
