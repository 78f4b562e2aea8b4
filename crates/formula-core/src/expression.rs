//! Expression tree for parsed formulas

use crate::operator::Operator;
use std::collections::BTreeSet;
use std::fmt;

/// Immutable node of a parsed formula
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal number
    Constant(f64),

    /// Variable reference, resolved at evaluation time
    Variable(String),

    /// Binary operation owning both operands
    BinaryOp { operator: Operator, left: Box<Expression>, right: Box<Expression> },
}

impl Expression {
    /// Create a constant expression
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    /// Create a variable reference
    pub fn var(name: &str) -> Self {
        Self::Variable(name.to_string())
    }

    /// Create a binary operation
    pub fn binary(operator: Operator, left: Expression, right: Expression) -> Self {
        Self::BinaryOp { operator, left: Box::new(left), right: Box::new(right) }
    }

    /// Sorted, deduplicated names of every variable referenced in the tree
    pub fn variables(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names.into_iter().map(str::to_string).collect()
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Expression::Constant(_) => {}
            Expression::Variable(name) => {
                names.insert(name.as_str());
            }
            Expression::BinaryOp { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
        }
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Expression::Constant(_) | Expression::Variable(_) => 1,
            Expression::BinaryOp { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path, counting the root
    pub fn depth(&self) -> usize {
        match self {
            Expression::Constant(_) | Expression::Variable(_) => 1,
            Expression::BinaryOp { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Renders a re-parseable form. Binary nodes are always parenthesised so
/// the printed text rebuilds the same tree regardless of precedence.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Formulas have no unary minus
            Expression::Constant(value) if value.is_sign_negative() && *value != 0.0 => {
                write!(f, "(0-{})", -value)
            }
            Expression::Constant(value) => write!(f, "{value}"),
            Expression::Variable(name) => write!(f, "{name}"),
            Expression::BinaryOp { operator, left, right } => {
                write!(f, "({left}{operator}{right})")
            }
        }
    }
}
