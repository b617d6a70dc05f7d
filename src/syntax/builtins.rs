//! The table of functions and named constants the front end recognises.

use std::fmt::{self, Display, Formatter};

/// How many arguments a [`Function`] accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    /// Inclusive on both ends.
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::Between(min, max) => min <= count && count <= max,
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exactly(1) => write!(f, "1 argument"),
            Arity::Exactly(n) => write!(f, "{} arguments", n),
            Arity::Between(min, max) => {
                write!(f, "{} to {} arguments", min, max)
            },
            Arity::AtLeast(1) => write!(f, "at least 1 argument"),
            Arity::AtLeast(n) => write!(f, "at least {} arguments", n),
        }
    }
}

/// A function which may be called from an equation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Function<'a> {
    pub name: &'a str,
    pub arity: Arity,
}

impl<'a> Function<'a> {
    pub const fn new(name: &'a str, arity: Arity) -> Self {
        Function { name, arity }
    }
}

/// The functions recognised by [`Builtins::default()`].
pub const FUNCTIONS: &[Function<'static>] = &[
    Function::new("sin", Arity::Exactly(1)),
    Function::new("cos", Arity::Exactly(1)),
    Function::new("tan", Arity::Exactly(1)),
    Function::new("asin", Arity::Exactly(1)),
    Function::new("acos", Arity::Exactly(1)),
    Function::new("atan", Arity::Exactly(1)),
    Function::new("atan2", Arity::Exactly(2)),
    Function::new("sinh", Arity::Exactly(1)),
    Function::new("cosh", Arity::Exactly(1)),
    Function::new("tanh", Arity::Exactly(1)),
    Function::new("exp", Arity::Exactly(1)),
    // log(x) or log(x, base)
    Function::new("log", Arity::Between(1, 2)),
    Function::new("ln", Arity::Exactly(1)),
    Function::new("sqrt", Arity::Exactly(1)),
    Function::new("abs", Arity::Exactly(1)),
    Function::new("floor", Arity::Exactly(1)),
    Function::new("ceil", Arity::Exactly(1)),
    Function::new("min", Arity::AtLeast(2)),
    Function::new("max", Arity::AtLeast(2)),
];

/// Identifiers which name a well-known numeric constant rather than an
/// unknown.
pub const CONSTANTS: &[&str] = &["e", "pi"];

/// The set of builtin functions and constants used while tokenizing,
/// parsing, and building a graph.
///
/// The tables are borrowed, so they can be the static defaults or
/// something assembled at runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Builtins<'a> {
    functions: &'a [Function<'a>],
    constants: &'a [&'a str],
}

impl<'a> Builtins<'a> {
    pub const fn new(
        functions: &'a [Function<'a>],
        constants: &'a [&'a str],
    ) -> Self {
        Builtins {
            functions,
            constants,
        }
    }

    pub fn function(&self, name: &str) -> Option<&'a Function<'a>> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains(&name)
    }

    pub fn functions(&self) -> &'a [Function<'a>] { self.functions }

    pub fn constants(&self) -> &'a [&'a str] { self.constants }
}

impl Default for Builtins<'static> {
    fn default() -> Self { Builtins::new(FUNCTIONS, CONSTANTS) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_rules() {
        let inputs = vec![
            (Arity::Exactly(1), 1, true),
            (Arity::Exactly(1), 0, false),
            (Arity::Exactly(1), 2, false),
            (Arity::Between(1, 2), 1, true),
            (Arity::Between(1, 2), 2, true),
            (Arity::Between(1, 2), 3, false),
            (Arity::AtLeast(2), 1, false),
            (Arity::AtLeast(2), 7, true),
        ];

        for (arity, count, should_be) in inputs {
            assert_eq!(arity.accepts(count), should_be, "{:?} {}", arity, count);
        }
    }

    #[test]
    fn look_up_known_names() {
        let builtins = Builtins::default();

        assert_eq!(builtins.function("log").unwrap().arity, Arity::Between(1, 2));
        assert!(builtins.is_function("sqrt"));
        assert!(!builtins.is_function("x"));
        assert!(builtins.is_constant("pi"));
        assert!(!builtins.is_constant("sin"));
    }

    #[test]
    fn custom_tables_replace_the_defaults() {
        const ONLY_F: &[Function<'static>] = &[Function::new("f", Arity::Exactly(1))];
        let builtins = Builtins::new(ONLY_F, &[]);

        assert!(builtins.is_function("f"));
        assert!(!builtins.is_function("sin"));
        assert!(!builtins.is_constant("pi"));
    }

    #[test]
    fn tables_can_be_assembled_at_runtime() {
        let names = vec![String::from("relu"), String::from("clamp")];
        let functions: Vec<_> = names
            .iter()
            .map(|name| Function::new(name, Arity::Exactly(1)))
            .collect();
        let constant = String::from("tau");
        let constants = [constant.as_str()];

        let builtins = Builtins::new(&functions, &constants);

        assert!(builtins.is_function("relu"));
        assert!(builtins.is_constant("tau"));
        assert_eq!(builtins.functions().len(), 2);
        assert_eq!(builtins.constants(), &["tau"]);
    }

    #[test]
    fn arity_display() {
        assert_eq!(Arity::Exactly(1).to_string(), "1 argument");
        assert_eq!(Arity::Between(1, 2).to_string(), "1 to 2 arguments");
        assert_eq!(Arity::AtLeast(2).to_string(), "at least 2 arguments");
    }
}
