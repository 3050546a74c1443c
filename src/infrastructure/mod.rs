//! Infrastructure implementations for astview: source acquisition and the
//! tree-sitter-backed Python parser.

pub mod parser;
pub mod source;

pub use parser::PythonAstParser;
