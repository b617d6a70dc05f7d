//! Turning the text of an equation into an [`Expression`] tree.

mod builtins;
mod expr;
mod parse;
mod tokens;

pub use builtins::{Arity, Builtins, Function, CONSTANTS, FUNCTIONS};
pub use expr::{BinaryOperation, Expression};
pub use parse::{parse, parse_with, Expected, Found, ParseError, MAX_NESTING};
pub use tokens::{
    tokenize, tokenize_with, LexError, LexErrorKind, Token, TokenKind,
};
