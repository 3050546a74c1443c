//! Error taxonomy for astview.
//!
//! Every failure surfaces to the caller unmodified: this is a single-shot
//! transformer, not a resilient service. No retries, no silent recovery.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    /// Source text, URL content, or code string was empty.
    #[error("cannot build an AST from empty source")]
    EmptyInput,

    /// The parser rejected the source; a malformed program cannot be
    /// visualised.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A path or URL could not be read.
    #[error("source unavailable: {0}")]
    UnavailableSource(String),

    /// The graph builder was handed no root node.
    #[error("malformed tree: no root node")]
    MalformedTree,

    /// The exported graph could not be written.
    #[error("cannot write output")]
    Output(#[from] std::io::Error),
}
