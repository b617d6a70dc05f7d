//! Turn a mathematical equation into a graph of its syntax.
//!
//! The text goes through three stages,
//!
//! 1. [`tokenize()`] splits it into [`Token`]s
//! 2. [`parse()`] arranges the tokens into an [`Expression`] tree, honouring
//!    operator precedence, implicit multiplication (`3x`), and the
//!    right-associativity of `**`
//! 3. [`build()`] lowers the tree into an immutable [`Graph`] of typed,
//!    labeled nodes connected by edges that remember each operand's role
//!
//! [`make_graph()`] does all three at once.
//!
//! ```rust
//! use numgraph::{NodeKind, Role};
//!
//! let graph = numgraph::make_graph("x**2 + y**2 = 25").unwrap();
//!
//! assert_eq!(graph.node_count(), 9);
//! assert_eq!(graph.root().kind(), NodeKind::Equation);
//!
//! let roles: Vec<_> = graph
//!     .children_of(graph.root().id())
//!     .map(|(role, _)| role)
//!     .collect();
//! assert_eq!(roles, vec![Role::Lhs, Role::Rhs]);
//! ```

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

mod error;
pub mod graph;
pub mod syntax;

pub use error::Error;
pub use graph::{build, build_with, Edge, Graph, Node, NodeId, NodeKind, Role, Statistics};
pub use syntax::{
    parse, parse_with, tokenize, tokenize_with, BinaryOperation, Builtins,
    Expression, LexError, ParseError, Token, TokenKind,
};

use std::str::FromStr;

/// Parse an equation and lower it into a [`Graph`] using the default
/// [`Builtins`].
pub fn make_graph(equation: &str) -> Result<Graph, Error> {
    make_graph_with(equation, &Builtins::default())
}

/// Parse an equation and lower it into a [`Graph`], using a custom set of
/// functions and constants.
pub fn make_graph_with(
    equation: &str,
    builtins: &Builtins<'_>,
) -> Result<Graph, Error> {
    let tokens = tokenize_with(equation, builtins)?;
    let expr = parse_with(&tokens, builtins)?;
    let graph = build_with(expr, builtins);

    log::debug!(
        "\"{}\" has {} nodes and {} edges",
        equation,
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}

impl FromStr for Graph {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> { make_graph(s) }
}
