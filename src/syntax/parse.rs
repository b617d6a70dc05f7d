use crate::syntax::{Arity, BinaryOperation, Builtins, Expression, Token, TokenKind};
use std::{
    fmt::{self, Display, Formatter},
    ops::Range,
};

/// Parse an [`Expression`] tree from a sequence of [`Token`]s using the
/// default [`Builtins`].
pub fn parse(tokens: &[Token<'_>]) -> Result<Expression, ParseError> {
    parse_with(tokens, &Builtins::default())
}

/// Parse an [`Expression`] tree, checking function calls against the
/// arities in `builtins`.
pub fn parse_with(
    tokens: &[Token<'_>],
    builtins: &Builtins<'_>,
) -> Result<Expression, ParseError> {
    let expr = Parser::new(tokens, builtins).parse()?;
    log::trace!("Parsed {} tokens as \"{}\"", tokens.len(), expr);

    Ok(expr)
}

/// A simple recursive descent parser (`LL(1)`) for converting a stream of
/// tokens into an expression tree.
///
/// The grammar:
///
/// ```text
/// equation       := expression ( "=" expression )?
///
/// expression     := term ( ("+" | "-") term )*
///
/// term           := unary ( ("*" | "/") unary | power )*
///
/// unary          := "-" unary
///                 | power
///
/// power          := primary ( "**" unary )?
///
/// primary        := NUMBER
///                 | IDENTIFIER
///                 | FUNCTION "(" arguments ")"
///                 | "(" expression ")"
///
/// arguments      := expression ( "," expression )*
/// ```
///
/// A `power` directly after a `term` (i.e. `3x`, `2(x + 1)`, `x sin(y)`) is
/// an implicit multiplication. Two numbers next to each other (`3 4`) are
/// not.
///
/// Every level of nesting (parentheses, arguments, negation, exponents)
/// passes through `unary`, which refuses to go deeper than
/// [`MAX_NESTING`].
#[derive(Debug, Clone)]
pub(crate) struct Parser<'t, 'a, 'b> {
    tokens: &'t [Token<'a>],
    cursor: usize,
    depth: usize,
    builtins: &'b Builtins<'b>,
}

/// How deeply an equation may nest before the parser gives up.
pub const MAX_NESTING: usize = 256;

impl<'t, 'a, 'b> Parser<'t, 'a, 'b> {
    pub(crate) fn new(
        tokens: &'t [Token<'a>],
        builtins: &'b Builtins<'b>,
    ) -> Self {
        Parser {
            tokens,
            cursor: 0,
            depth: 0,
            builtins,
        }
    }

    pub(crate) fn parse(mut self) -> Result<Expression, ParseError> {
        let expr = self.equation()?;

        match self.peek() {
            None => Ok(expr),
            Some(_) => Err(self.unexpected(Expected::EndOfInput)),
        }
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.cursor).map(|tok| tok.kind)
    }

    fn advance(&mut self) -> Option<&'t Token<'a>> {
        let tokens = self.tokens;
        let token = tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    /// Skip past the next token if it is one of `candidates`.
    fn eat(&mut self, candidates: &[TokenKind]) -> Option<TokenKind> {
        let kind = self.peek()?;

        if candidates.contains(&kind) {
            self.cursor += 1;
            Some(kind)
        } else {
            None
        }
    }

    fn expect(
        &mut self,
        expected: &'static [TokenKind],
    ) -> Result<&'t Token<'a>, ParseError> {
        let tokens = self.tokens;

        match tokens.get(self.cursor) {
            Some(token) if expected.contains(&token.kind) => {
                self.cursor += 1;
                Ok(token)
            },
            _ => Err(self.unexpected(Expected::OneOf(expected))),
        }
    }

    fn unexpected(&self, expected: Expected) -> ParseError {
        match self.tokens.get(self.cursor) {
            Some(token) => ParseError {
                position: self.cursor,
                span: token.span.clone(),
                expected,
                found: Found::Token(token.kind),
            },
            None => {
                let end = self.tokens.last().map_or(0, |tok| tok.span.end);

                ParseError {
                    position: self.cursor,
                    span: end..end,
                    expected,
                    found: Found::EndOfInput,
                }
            },
        }
    }

    fn equation(&mut self) -> Result<Expression, ParseError> {
        let left = self.expression()?;

        if self.eat(&[TokenKind::Equals]).is_some() {
            let right = self.expression()?;
            Ok(Expression::equation(left, right))
        } else {
            Ok(left)
        }
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.term()?;

        while let Some(kind) = self.eat(&[TokenKind::Plus, TokenKind::Minus])
        {
            let right = self.term()?;
            left = binary(left, kind.as_binary_op(), right);
        }

        Ok(left)
    }

    fn term(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.unary()?;

        loop {
            let (op, right) = match self.peek() {
                Some(kind @ TokenKind::Times)
                | Some(kind @ TokenKind::Divide) => {
                    self.cursor += 1;
                    (kind.as_binary_op(), self.unary()?)
                },
                // implicit multiplication
                Some(TokenKind::Identifier)
                | Some(TokenKind::Function)
                | Some(TokenKind::OpenParen) => {
                    (BinaryOperation::Times, self.power()?)
                },
                _ => break,
            };

            left = binary(left, op, right);
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<Expression, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.unexpected(Expected::ShallowerNesting));
        }

        self.depth += 1;
        let expr = self.negation_or_power();
        self.depth -= 1;

        expr
    }

    fn negation_or_power(&mut self) -> Result<Expression, ParseError> {
        if self.eat(&[TokenKind::Minus]).is_some() {
            let operand = self.unary()?;
            Ok(Expression::Negate(Box::new(operand)))
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<Expression, ParseError> {
        let base = self.primary()?;

        if self.eat(&[TokenKind::Power]).is_some() {
            // right associative, "2**3**2" is "2**(3**2)"
            let exponent = self.unary()?;
            Ok(base.pow(exponent))
        } else {
            Ok(base)
        }
    }

    fn primary(&mut self) -> Result<Expression, ParseError> {
        let tokens = self.tokens;

        match tokens.get(self.cursor) {
            Some(Token {
                kind: TokenKind::Number,
                text,
                ..
            }) => {
                self.cursor += 1;
                Ok(Expression::constant(*text))
            },
            Some(Token {
                kind: TokenKind::Identifier,
                text,
                ..
            }) => {
                self.cursor += 1;
                Ok(Expression::variable(*text))
            },
            Some(Token {
                kind: TokenKind::Function,
                ..
            }) => self.function_call(),
            Some(Token {
                kind: TokenKind::OpenParen,
                ..
            }) => {
                self.cursor += 1;
                let expr = self.expression()?;
                self.expect(&[TokenKind::CloseParen])?;
                Ok(expr)
            },
            _ => Err(self.unexpected(Expected::Operand)),
        }
    }

    fn function_call(&mut self) -> Result<Expression, ParseError> {
        let position = self.cursor;
        let name = match self.advance() {
            Some(token) => token,
            None => return Err(self.unexpected(Expected::Operand)),
        };
        debug_assert_eq!(name.kind, TokenKind::Function);

        self.expect(&[TokenKind::OpenParen])?;

        let mut arguments = vec![self.expression()?];
        while self.eat(&[TokenKind::Comma]).is_some() {
            arguments.push(self.expression()?);
        }

        let close_paren = self.expect(&[TokenKind::CloseParen])?;

        // tokens may have been tagged using a different table, in which
        // case there is no arity to check
        if let Some(function) = self.builtins.function(name.text) {
            if !function.arity.accepts(arguments.len()) {
                return Err(ParseError {
                    position,
                    span: name.span.start..close_paren.span.end,
                    expected: Expected::Arguments(function.arity),
                    found: Found::Arguments(arguments.len()),
                });
            }
        }

        Ok(Expression::call(name.text, arguments))
    }
}

fn binary(left: Expression, op: BinaryOperation, right: Expression) -> Expression {
    Expression::Binary {
        left: Box::new(left),
        right: Box::new(right),
        op,
    }
}

/// The equation doesn't follow the grammar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Expected {expected} but found {found} (token {position})")]
pub struct ParseError {
    /// The index of the offending token, or the number of tokens when the
    /// input ended early.
    pub position: usize,
    /// Byte offsets into the original equation.
    pub span: Range<usize>,
    pub expected: Expected,
    pub found: Found,
}

/// What the parser was looking for when it gave up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Expected {
    OneOf(&'static [TokenKind]),
    /// Something which can start an expression (number, identifier,
    /// function call, parenthesised expression, or negation).
    Operand,
    EndOfInput,
    Arguments(Arity),
    /// The equation nests more than [`MAX_NESTING`] levels deep.
    ShallowerNesting,
}

impl Display for Expected {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expected::OneOf(kinds) => {
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            },
            Expected::Operand => write!(f, "an operand"),
            Expected::EndOfInput => write!(f, "the end of input"),
            Expected::Arguments(arity) => write!(f, "{}", arity),
            Expected::ShallowerNesting => {
                write!(f, "at most {} levels of nesting", MAX_NESTING)
            },
        }
    }
}

/// What the parser actually found.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Found {
    Token(TokenKind),
    EndOfInput,
    Arguments(usize),
}

impl Display for Found {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Found::Token(kind) => write!(f, "{}", kind),
            Found::EndOfInput => write!(f, "the end of input"),
            Found::Arguments(1) => write!(f, "1 argument"),
            Found::Arguments(n) => write!(f, "{} arguments", n),
        }
    }
}
