//! Algebraic formula compiler and evaluator.
//!
//! Formulas such as scaling curves or cost functions are authored as text,
//! parsed once into an immutable [`Expression`] tree and evaluated many
//! times against different variable bindings.
//!
//! ```
//! use formula_core::parse;
//! use std::collections::HashMap;
//!
//! let curve = parse("9(x+1)", &["x"]).unwrap();
//! let bindings = HashMap::from([("x".to_string(), 1.0)]);
//! assert_eq!(curve.evaluate(&bindings).unwrap(), 18.0);
//! ```
//!
//! The grammar is constants, registered variable names, the binary
//! operators `^ * / % + -`, parentheses, and implicit multiplication by
//! adjacency (`3x`, `(a)(b)`). There is no unary minus and no functions.

/// Compiled formula cache
pub mod cache;
/// Parser configuration loaded from TOML or the environment
pub mod config;
/// Error types for parsing and evaluation
pub mod error;
/// Binding providers and tree evaluation
pub mod evaluator;
/// Immutable expression tree
pub mod expression;
/// Compiled formula handle
pub mod formula;
/// Case correction and implicit multiplication insertion
pub mod normalizer;
/// Operator table and precedence tiers
pub mod operator;
/// Parse pipeline entry points
pub mod parser;
/// Precedence folding of tokens
pub mod reducer;
/// Parenthesis sectioning
pub mod sectioner;
/// Flat-section tokenization
pub mod tokenizer;
/// Raw input validation
pub mod validator;

pub use cache::{CacheStats, DEFAULT_CACHE_CAPACITY, FormulaCache};
pub use config::{ConfigError, FORMULA_LENGTH_CEILING, ParserConfig, TREE_DEPTH_CEILING};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::Bindings;
pub use expression::Expression;
pub use formula::Formula;
pub use operator::Operator;
pub use parser::FormulaParser;

/// Parse `formula` with the default configuration.
///
/// `variables` lists the legal variable names in canonical casing.
pub fn parse<S: AsRef<str>>(formula: &str, variables: &[S]) -> FormulaResult<Expression> {
    FormulaParser::default().parse(formula, variables)
}

/// Parse `formula` with the default configuration into a [`Formula`] handle
pub fn compile<S: AsRef<str>>(formula: &str, variables: &[S]) -> FormulaResult<Formula> {
    FormulaParser::default().compile(formula, variables)
}
