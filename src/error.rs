use crate::syntax::{LexError, ParseError};

/// Anything that can go wrong while turning an equation into a graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
