//! Error handling for formula parsing and evaluation
//!
//! Every stage of the pipeline fails fast with one of four categories. Parse
//! failures mean the formula itself is invalid; evaluation failures mean the
//! caller omitted a required input. Neither is retryable without changing
//! the input.

use thiserror::Error;

/// Error type for formula parsing and evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// Structurally illegal raw input, rejected before any transformation
    #[error("Validation error: {message}")]
    Validation { message: String, formula: Option<String>, character: Option<char> },

    /// Unbalanced parentheses, dangling operators or uncombinable tokens
    #[error("Syntax error: {message}")]
    Syntax { message: String, formula: Option<String>, depth: Option<usize> },

    /// A leaf that is neither a registered variable nor a numeric literal
    #[error("Unknown symbol '{symbol}'")]
    UnknownSymbol { symbol: String, formula: Option<String> },

    /// A referenced variable is absent from the binding map
    #[error("Missing binding for variable '{variable}'")]
    MissingBinding { variable: String },
}

/// Result type alias for formula operations
pub type FormulaResult<T> = Result<T, FormulaError>;

impl FormulaError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            FormulaError::Validation { .. } => "validation",
            FormulaError::Syntax { .. } => "syntax",
            FormulaError::UnknownSymbol { .. } => "unknown_symbol",
            FormulaError::MissingBinding { .. } => "missing_binding",
        }
    }

    /// True for failures raised while evaluating a tree rather than parsing it
    pub fn is_evaluation_error(&self) -> bool {
        matches!(self, FormulaError::MissingBinding { .. })
    }

    /// Attach the formula text to a parse error that does not carry one yet
    pub fn with_formula(self, text: &str) -> Self {
        match self {
            FormulaError::Validation { message, formula: None, character } => {
                FormulaError::Validation { message, formula: Some(text.to_string()), character }
            }
            FormulaError::Syntax { message, formula: None, depth } => {
                FormulaError::Syntax { message, formula: Some(text.to_string()), depth }
            }
            FormulaError::UnknownSymbol { symbol, formula: None } => {
                FormulaError::UnknownSymbol { symbol, formula: Some(text.to_string()) }
            }
            other => other,
        }
    }
}

/// Convenience constructors for common error scenarios
impl FormulaError {
    /// Blank or whitespace-only input
    pub fn blank() -> Self {
        Self::Validation {
            message: "formula is blank".to_string(),
            formula: None,
            character: None,
        }
    }

    /// A character outside the formula alphabet
    pub fn illegal_character(character: char) -> Self {
        Self::Validation {
            message: format!("illegal character '{character}'"),
            formula: None,
            character: Some(character),
        }
    }

    /// Input with no alphanumeric or operator characters at all
    pub fn no_content() -> Self {
        Self::Validation {
            message: "formula contains no operands or operators".to_string(),
            formula: None,
            character: None,
        }
    }

    /// Whitespace between two operands, which stripping would fuse
    pub fn separating_whitespace(before: char, after: char) -> Self {
        Self::Validation {
            message: format!("whitespace separates '{before}' and '{after}' with no operator"),
            formula: None,
            character: Some(' '),
        }
    }

    /// Input longer than the configured limit
    pub fn too_long(length: usize, limit: usize) -> Self {
        Self::Validation {
            message: format!("formula length {length} exceeds limit of {limit}"),
            formula: None,
            character: None,
        }
    }

    /// Generic syntax error
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax { message: message.into(), formula: None, depth: None }
    }

    /// A `)` with no preceding `(`
    pub fn unmatched_close() -> Self {
        Self::syntax("unmatched ')' with no preceding '('")
    }

    /// A `(` still open at the end of input
    pub fn unmatched_open() -> Self {
        Self::syntax("unmatched '(' is never closed")
    }

    /// An operator with no left-hand expression
    pub fn dangling_operator(symbol: char) -> Self {
        Self::syntax(format!("dangling operator '{symbol}' has no left-hand expression"))
    }

    /// An operator with no right-hand expression
    pub fn trailing_operator(symbol: char) -> Self {
        Self::syntax(format!("dangling operator '{symbol}' has no right-hand expression"))
    }

    /// Parenthesis nesting beyond the configured limit
    pub fn nesting_too_deep(depth: usize, limit: usize) -> Self {
        Self::Syntax {
            message: format!("parenthesis nesting depth {depth} exceeds limit of {limit}"),
            formula: None,
            depth: Some(depth),
        }
    }

    /// Expression tree deeper than the configured limit
    pub fn tree_too_deep(limit: usize) -> Self {
        Self::Syntax {
            message: format!("expression tree exceeds depth limit of {limit}"),
            formula: None,
            depth: Some(limit + 1),
        }
    }

    /// Leaf that is neither a registered variable nor a number
    pub fn unknown_symbol(symbol: &str) -> Self {
        Self::UnknownSymbol { symbol: symbol.to_string(), formula: None }
    }

    /// Variable absent from the binding map
    pub fn missing_binding(variable: &str) -> Self {
        Self::MissingBinding { variable: variable.to_string() }
    }
}
