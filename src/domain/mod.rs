//! Domain layer: AST shape, display graph, graph builder, classifier.

pub mod ast;
pub mod builder;
pub mod classify;
pub mod graph;
