use crate::{syntax, Error};
use smol_str::SmolStr;
use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Div, Mul, Neg, Sub},
    str::FromStr,
};

/// A node in the expression tree.
///
/// Every node owns its children, so the same subexpression written twice
/// (e.g. the `x` in `x**2 + 3*x`) is two separate nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A numeric literal, kept exactly as it was written.
    Constant(SmolStr),
    Variable(SmolStr),
    /// An expression involving two operands.
    Binary {
        left: Box<Expression>,
        right: Box<Expression>,
        op: BinaryOperation,
    },
    /// Negate the expression.
    Negate(Box<Expression>),
    /// Invoke a builtin function.
    Call {
        function: SmolStr,
        arguments: Vec<Expression>,
    },
    /// Two expressions separated by an `=`. Only ever found at the root.
    Equation {
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn constant(literal: impl Into<SmolStr>) -> Self {
        Expression::Constant(literal.into())
    }

    pub fn variable(name: impl Into<SmolStr>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn call<A>(function: impl Into<SmolStr>, arguments: A) -> Self
    where
        A: IntoIterator<Item = Expression>,
    {
        Expression::Call {
            function: function.into(),
            arguments: arguments.into_iter().collect(),
        }
    }

    pub fn equation(left: Expression, right: Expression) -> Self {
        Expression::Equation {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn pow(self, exponent: Expression) -> Self {
        Expression::Binary {
            left: Box::new(self),
            right: Box::new(exponent),
            op: BinaryOperation::Power,
        }
    }

    pub fn is_equation(&self) -> bool {
        match self {
            Expression::Equation { .. } => true,
            _ => false,
        }
    }

    /// How tightly this expression binds when written out. Higher binds
    /// tighter.
    fn precedence(&self) -> u8 {
        match self {
            Expression::Equation { .. } => 0,
            Expression::Binary { op, .. } => op.precedence(),
            Expression::Negate(_) => NEGATE_PRECEDENCE,
            Expression::Constant(_)
            | Expression::Variable(_)
            | Expression::Call { .. } => ATOM_PRECEDENCE,
        }
    }
}

const NEGATE_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

/// An operation that can be applied to two arguments.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperation {
    Plus,
    Minus,
    Times,
    Divide,
    Power,
}

impl BinaryOperation {
    /// The operator as it is written in an equation.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperation::Plus => "+",
            BinaryOperation::Minus => "-",
            BinaryOperation::Times => "*",
            BinaryOperation::Divide => "/",
            BinaryOperation::Power => "**",
        }
    }

    pub fn is_right_associative(self) -> bool {
        self == BinaryOperation::Power
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOperation::Plus | BinaryOperation::Minus => 1,
            BinaryOperation::Times | BinaryOperation::Divide => 2,
            BinaryOperation::Power => 4,
        }
    }

    /// The minimum precedence each operand needs to be written without
    /// parentheses.
    fn operand_precedence(self) -> (u8, u8) {
        let p = self.precedence();

        if self.is_right_associative() {
            // the exponent may itself be negated, "2**-x"
            (p + 1, NEGATE_PRECEDENCE)
        } else {
            (p, p + 1)
        }
    }
}

impl Display for BinaryOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// define some operator overloads to make constructing an expression easier.

impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Expression {
        Expression::Binary {
            left: Box::new(self),
            right: Box::new(rhs),
            op: BinaryOperation::Plus,
        }
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Expression {
        Expression::Binary {
            left: Box::new(self),
            right: Box::new(rhs),
            op: BinaryOperation::Minus,
        }
    }
}

impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        Expression::Binary {
            left: Box::new(self),
            right: Box::new(rhs),
            op: BinaryOperation::Times,
        }
    }
}

impl Div for Expression {
    type Output = Expression;

    fn div(self, rhs: Expression) -> Expression {
        Expression::Binary {
            left: Box::new(self),
            right: Box::new(rhs),
            op: BinaryOperation::Divide,
        }
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Self::Output { Expression::Negate(Box::new(self)) }
}

impl FromStr for Expression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = syntax::tokenize(s)?;
        let expr = syntax::parse(&tokens)?;
        Ok(expr)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(literal) => write!(f, "{}", literal),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Binary { left, right, op } => {
                let (left_precedence, right_precedence) =
                    op.operand_precedence();

                write_operand(left, left_precedence, f)?;

                match op {
                    BinaryOperation::Plus | BinaryOperation::Minus => {
                        write!(f, " {} ", op)?
                    },
                    _ => write!(f, "{}", op)?,
                }

                write_operand(right, right_precedence, f)
            },
            Expression::Negate(inner) => {
                write!(f, "-")?;
                write_operand(inner, NEGATE_PRECEDENCE, f)
            },
            Expression::Call {
                function,
                arguments,
            } => {
                write!(f, "{}(", function)?;

                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }

                write!(f, ")")
            },
            Expression::Equation { left, right } => {
                write!(f, "{} = {}", left, right)
            },
        }
    }
}

fn write_operand(
    expr: &Expression,
    min_precedence: u8,
    f: &mut Formatter<'_>,
) -> fmt::Result {
    if expr.precedence() < min_precedence {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(literal: &str) -> Expression { Expression::constant(literal) }

    fn v(name: &str) -> Expression { Expression::variable(name) }

    #[test]
    fn display() {
        let inputs = vec![
            (c("3"), "3"),
            (c("3.0"), "3.0"),
            (Expression::call("sin", vec![c("5")]), "sin(5)"),
            (-c("5"), "-5"),
            (-Expression::call("sin", vec![c("5")]), "-sin(5)"),
            (c("1") + c("1"), "1 + 1"),
            (c("1") - c("1"), "1 - 1"),
            (c("1") * c("1"), "1*1"),
            (c("1") / c("1"), "1/1"),
            (v("x").pow(c("2")), "x**2"),
            ((c("1") + c("2")) / c("3"), "(1 + 2)/3"),
            (c("1") - (c("2") - c("3")), "1 - (2 - 3)"),
            ((c("1") - c("2")) - c("3"), "1 - 2 - 3"),
            (c("2").pow(c("3").pow(c("2"))), "2**3**2"),
            (c("2").pow(c("3")).pow(c("2")), "(2**3)**2"),
            (-v("x").pow(c("2")), "-x**2"),
            ((-v("x")).pow(c("2")), "(-x)**2"),
            (v("x").pow(-v("y")), "x**-y"),
            (-(v("a") * v("b")), "-(a*b)"),
            (-v("a") * v("b"), "-a*b"),
            (v("a") - -v("b"), "a - -b"),
            (
                Expression::call("log", vec![v("x"), c("10")]),
                "log(x, 10)",
            ),
            (
                Expression::equation(v("y"), v("x") + c("1")),
                "y = x + 1",
            ),
        ];

        for (expr, should_be) in inputs {
            let got = expr.to_string();
            assert_eq!(got, should_be);
        }
    }

    #[test]
    fn only_equations_are_equations() {
        assert!(Expression::equation(v("y"), c("1")).is_equation());
        assert!(!(v("y") - c("1")).is_equation());
    }

    #[test]
    fn parse_from_a_string() {
        let got: Expression = "2*x + 1".parse().unwrap();

        assert_eq!(got, c("2") * v("x") + c("1"));
    }

    #[test]
    fn parse_errors_are_surfaced() {
        assert!(matches!("x $ 1".parse::<Expression>(), Err(Error::Lex(_))));
        assert!(matches!("x +".parse::<Expression>(), Err(Error::Parse(_))));
    }
}
