//! Compiled formula handle

use crate::error::FormulaResult;
use crate::evaluator::Bindings;
use crate::expression::Expression;
use std::fmt;
use std::sync::Arc;

/// A parsed formula ready for repeated evaluation.
///
/// Clones share the same tree.
#[derive(Debug, Clone)]
pub struct Formula {
    /// Original formula text
    source: String,
    /// Text after case correction and multiplication insertion
    normalized: String,
    /// Legal variable names supplied at parse time
    variables: Vec<String>,
    expression: Arc<Expression>,
}

impl Formula {
    pub(crate) fn new(
        source: String,
        normalized: String,
        variables: Vec<String>,
        expression: Expression,
    ) -> Self {
        Self { source, normalized, variables, expression: Arc::new(expression) }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Shared handle to the tree
    pub fn shared_expression(&self) -> Arc<Expression> {
        Arc::clone(&self.expression)
    }

    /// Names the tree actually references, sorted
    pub fn variables_used(&self) -> Vec<String> {
        self.expression.variables()
    }

    /// Referenced names that `bindings` does not supply
    pub fn missing_bindings<B: Bindings + ?Sized>(&self, bindings: &B) -> Vec<String> {
        self.variables_used().into_iter().filter(|name| bindings.value_of(name).is_none()).collect()
    }

    pub fn evaluate<B: Bindings + ?Sized>(&self, bindings: &B) -> FormulaResult<f64> {
        self.expression.evaluate(bindings)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}
