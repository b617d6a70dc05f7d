use crate::syntax::{BinaryOperation, Builtins};
use std::{
    fmt::{self, Display, Formatter},
    ops::Range,
};

/// Split an equation into its [`Token`]s using the default [`Builtins`].
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, LexError> {
    tokenize_with(src, &Builtins::default())
}

/// Split an equation into its [`Token`]s, using `builtins` to decide which
/// identifiers are function names.
pub fn tokenize_with<'a>(
    src: &'a str,
    builtins: &Builtins<'_>,
) -> Result<Vec<Token<'a>>, LexError> {
    let tokens = Tokens::new(src, builtins).collect::<Result<Vec<_>, _>>()?;
    log::trace!("Split {:?} into {} tokens", src, tokens.len());

    Ok(tokens)
}

/// Something went wrong while tokenizing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct LexError {
    /// The byte offset the problem was found at.
    pub offset: usize,
    pub kind: LexErrorKind,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LexErrorKind {
    InvalidCharacter(char),
    /// A numeric literal with a misplaced decimal point, e.g. `1.2.3`.
    MalformedNumber,
    /// Only a single `=` is allowed in an equation.
    MultipleEquals,
}

impl Display for LexErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::InvalidCharacter(c) => {
                write!(f, "Invalid character, {:?},", c)
            },
            LexErrorKind::MalformedNumber => write!(f, "Malformed number"),
            LexErrorKind::MultipleEquals => {
                write!(f, "An equation may only contain one \"=\"")
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tokens<'a, 'b> {
    src: &'a str,
    cursor: usize,
    builtins: &'b Builtins<'b>,
    seen_equals: bool,
}

impl<'a, 'b> Tokens<'a, 'b> {
    pub(crate) fn new(src: &'a str, builtins: &'b Builtins<'b>) -> Self {
        Tokens {
            src,
            cursor: 0,
            builtins,
            seen_equals: false,
        }
    }

    fn rest(&self) -> &'a str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn peek_second(&self) -> Option<char> { self.rest().chars().nth(1) }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn chomp(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.cursor;
        self.advance();
        Token::from_text(self.src, start..self.cursor, kind)
    }

    fn chomp_power_or_times(&mut self) -> Token<'a> {
        let start = self.cursor;
        self.advance();

        if self.peek() == Some('*') {
            self.advance();
            Token::from_text(self.src, start..self.cursor, TokenKind::Power)
        } else {
            Token::from_text(self.src, start..self.cursor, TokenKind::Times)
        }
    }

    fn chomp_equals(&mut self) -> Result<Token<'a>, LexError> {
        if self.seen_equals {
            return Err(LexError {
                offset: self.cursor,
                kind: LexErrorKind::MultipleEquals,
            });
        }

        self.seen_equals = true;
        Ok(self.chomp(TokenKind::Equals))
    }

    fn take_while<P>(&mut self, mut predicate: P) -> Range<usize>
    where
        P: FnMut(char) -> bool,
    {
        let start = self.cursor;

        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }

            self.advance();
        }

        start..self.cursor
    }

    fn chomp_integer(&mut self) -> Range<usize> {
        self.take_while(|c| c.is_ascii_digit())
    }

    fn chomp_number(&mut self) -> Result<Token<'a>, LexError> {
        let start = self.cursor;
        let integer_part = self.chomp_integer();

        if self.peek() == Some('.') {
            let decimal_point = self.cursor;
            // skip past the decimal
            self.advance();
            let fractional_part = self.chomp_integer();

            // "." on its own isn't a number
            if integer_part.is_empty() && fractional_part.is_empty() {
                return Err(LexError {
                    offset: decimal_point,
                    kind: LexErrorKind::MalformedNumber,
                });
            }
        }

        // a second decimal point, e.g. "1.2.3" or "3.."
        if self.peek() == Some('.') {
            return Err(LexError {
                offset: self.cursor,
                kind: LexErrorKind::MalformedNumber,
            });
        }

        Ok(Token::from_text(
            self.src,
            start..self.cursor,
            TokenKind::Number,
        ))
    }

    fn chomp_identifier(&mut self) -> Token<'a> {
        let mut seen_first_character = false;

        let span = self.take_while(|c| {
            if seen_first_character {
                c.is_alphabetic() || c.is_ascii_digit() || c == '_'
            } else {
                seen_first_character = true;
                c.is_alphabetic()
            }
        });

        let kind = if self.builtins.is_function(&self.src[span.clone()]) {
            TokenKind::Function
        } else {
            TokenKind::Identifier
        };

        Token::from_text(self.src, span, kind)
    }
}

impl<'a, 'b> Iterator for Tokens<'a, 'b> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            return match self.peek()? {
                space if space.is_whitespace() => {
                    self.advance();
                    continue;
                },
                '(' => Some(Ok(self.chomp(TokenKind::OpenParen))),
                ')' => Some(Ok(self.chomp(TokenKind::CloseParen))),
                '+' => Some(Ok(self.chomp(TokenKind::Plus))),
                '-' => Some(Ok(self.chomp(TokenKind::Minus))),
                '*' => Some(Ok(self.chomp_power_or_times())),
                '/' => Some(Ok(self.chomp(TokenKind::Divide))),
                ',' => Some(Ok(self.chomp(TokenKind::Comma))),
                '=' => Some(self.chomp_equals()),
                '0'..='9' => Some(self.chomp_number()),
                '.' if self.peek_second().map_or(false, |c| c.is_ascii_digit()) => {
                    Some(self.chomp_number())
                },
                letter if letter.is_alphabetic() => {
                    Some(Ok(self.chomp_identifier()))
                },
                '.' => Some(Err(LexError {
                    offset: self.cursor,
                    kind: LexErrorKind::MalformedNumber,
                })),
                other => Some(Err(LexError {
                    offset: self.cursor,
                    kind: LexErrorKind::InvalidCharacter(other),
                })),
            };
        }
    }
}

/// A single lexical unit, borrowing its text from the original equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Byte offsets into the original equation.
    pub span: Range<usize>,
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    fn from_text(
        original_source: &'a str,
        span: Range<usize>,
        kind: TokenKind,
    ) -> Self {
        Token {
            text: &original_source[span.clone()],
            span,
            kind,
        }
    }
}

/// The kinds of token that can appear in an equation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Identifier,
    /// An identifier naming a known function.
    Function,
    Plus,
    Minus,
    Times,
    Divide,
    Power,
    OpenParen,
    CloseParen,
    Equals,
    Comma,
}

impl TokenKind {
    pub fn is_operator(self) -> bool {
        match self {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Times
            | TokenKind::Divide
            | TokenKind::Power => true,
            _ => false,
        }
    }

    pub(crate) fn as_binary_op(self) -> BinaryOperation {
        match self {
            TokenKind::Plus => BinaryOperation::Plus,
            TokenKind::Minus => BinaryOperation::Minus,
            TokenKind::Times => BinaryOperation::Times,
            TokenKind::Divide => BinaryOperation::Divide,
            TokenKind::Power => BinaryOperation::Power,
            other => unreachable!("{:?} is not a binary op", other),
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "a number",
            TokenKind::Identifier => "an identifier",
            TokenKind::Function => "a function name",
            TokenKind::Plus => "\"+\"",
            TokenKind::Minus => "\"-\"",
            TokenKind::Times => "\"*\"",
            TokenKind::Divide => "\"/\"",
            TokenKind::Power => "\"**\"",
            TokenKind::OpenParen => "\"(\"",
            TokenKind::CloseParen => "\")\"",
            TokenKind::Equals => "\"=\"",
            TokenKind::Comma => "\",\"",
        };

        f.write_str(name)
    }
}

#[cfg(test)]
mod tokenizer_tests {
    use super::*;

    macro_rules! tokenize_test {
        ($name:ident, $src:expr, $should_be:expr) => {
            #[test]
            fn $name() {
                let builtins = Builtins::default();
                let mut tokens = Tokens::new($src, &builtins);

                let got = tokens.next().unwrap().unwrap();

                let Range { start, end } = got.span;
                assert_eq!(start, 0);
                assert_eq!(end, $src.len());
                assert_eq!(got.text, $src);
                assert_eq!(got.kind, $should_be);

                assert!(
                    tokens.next().is_none(),
                    "{:?} should be empty",
                    tokens
                );
            }
        };
    }

    tokenize_test!(open_paren, "(", TokenKind::OpenParen);
    tokenize_test!(close_paren, ")", TokenKind::CloseParen);
    tokenize_test!(plus, "+", TokenKind::Plus);
    tokenize_test!(minus, "-", TokenKind::Minus);
    tokenize_test!(times, "*", TokenKind::Times);
    tokenize_test!(power, "**", TokenKind::Power);
    tokenize_test!(divide, "/", TokenKind::Divide);
    tokenize_test!(equals, "=", TokenKind::Equals);
    tokenize_test!(comma, ",", TokenKind::Comma);
    tokenize_test!(single_digit_integer, "3", TokenKind::Number);
    tokenize_test!(multi_digit_integer, "31", TokenKind::Number);
    tokenize_test!(number_with_trailing_dot, "31.", TokenKind::Number);
    tokenize_test!(number_with_leading_dot, ".5", TokenKind::Number);
    tokenize_test!(simple_decimal, "3.14", TokenKind::Number);
    tokenize_test!(decimal_keeps_trailing_zero, "3.0", TokenKind::Number);
    tokenize_test!(simple_identifier, "x", TokenKind::Identifier);
    tokenize_test!(longer_identifier, "hello", TokenKind::Identifier);
    tokenize_test!(
        identifiers_can_have_underscores,
        "y_pred",
        TokenKind::Identifier
    );
    tokenize_test!(
        identifiers_can_contain_numbers,
        "m1",
        TokenKind::Identifier
    );
    tokenize_test!(unicode_identifier, "θ", TokenKind::Identifier);
    tokenize_test!(known_function, "sin", TokenKind::Function);
    tokenize_test!(
        function_name_prefix_is_an_identifier,
        "sine",
        TokenKind::Identifier
    );

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn whitespace_is_never_emitted() {
        let got = tokenize("  x\t+ \n 1 ").unwrap();

        let texts: Vec<_> = got.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["x", "+", "1"]);
        assert_eq!(got[1].span, 4..5);
    }

    #[test]
    fn power_is_preferred_over_times() {
        assert_eq!(
            kinds("x**2*y"),
            vec![
                TokenKind::Identifier,
                TokenKind::Power,
                TokenKind::Number,
                TokenKind::Times,
                TokenKind::Identifier,
            ]
        );
        // "***" is a power followed by a times
        assert_eq!(kinds("***"), vec![TokenKind::Power, TokenKind::Times]);
    }

    #[test]
    fn operators() {
        let operators: Vec<_> = kinds("x + - * / ** ( ) = , 1 sin")
            .into_iter()
            .filter(|kind| kind.is_operator())
            .collect();

        assert_eq!(
            operators,
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Times,
                TokenKind::Divide,
                TokenKind::Power,
            ]
        );
    }

    #[test]
    fn numbers_run_into_identifiers() {
        assert_eq!(
            kinds("3x"),
            vec![TokenKind::Number, TokenKind::Identifier]
        );
        assert_eq!(
            kinds("2sin(x)"),
            vec![
                TokenKind::Number,
                TokenKind::Function,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn a_full_equation() {
        assert_eq!(
            kinds("y = log(x, 10) - 4.5"),
            vec![
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Function,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::CloseParen,
                TokenKind::Minus,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn custom_builtins_change_function_tagging() {
        use crate::syntax::{Arity, Function};

        const FUNCTIONS: &[Function<'static>] = &[Function::new("f", Arity::Exactly(1))];
        let builtins = Builtins::new(FUNCTIONS, &[]);

        let got = tokenize_with("f sin", &builtins).unwrap();

        assert_eq!(got[0].kind, TokenKind::Function);
        assert_eq!(got[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn invalid_characters() {
        let inputs = vec![
            ("x $ 2", 2, '$'),
            ("x^2", 1, '^'),
            ("_x", 0, '_'),
            ("x²", 1, '²'),
            ("a½", 1, '½'),
            ("①", 0, '①'),
        ];

        for (src, offset, character) in inputs {
            let got = tokenize(src).unwrap_err();

            assert_eq!(
                got,
                LexError {
                    offset,
                    kind: LexErrorKind::InvalidCharacter(character),
                }
            );
        }
    }

    #[test]
    fn malformed_numbers() {
        let inputs = vec![("1.2.3", 3), ("3..", 2), ("x + .", 4), ("1 + 2.5.", 7)];

        for (src, offset) in inputs {
            let got = tokenize(src).unwrap_err();

            assert_eq!(
                got,
                LexError {
                    offset,
                    kind: LexErrorKind::MalformedNumber,
                },
                "{}",
                src
            );
        }
    }

    #[test]
    fn only_one_equals_sign_is_allowed() {
        let got = tokenize("x = y = 2").unwrap_err();

        assert_eq!(
            got,
            LexError {
                offset: 6,
                kind: LexErrorKind::MultipleEquals,
            }
        );
        assert!(tokenize("x == 2").is_err());
    }

    #[test]
    fn error_messages_mention_the_offset() {
        let got = tokenize("x $ 2").unwrap_err();

        assert_eq!(got.to_string(), "Invalid character, '$', at offset 2");
    }
}
