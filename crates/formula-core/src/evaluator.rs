//! Expression evaluator
//!
//! Evaluation is a pure walk over an immutable tree. Nothing is cached and
//! nothing is mutated, so one tree can be evaluated from many threads with
//! different bindings at the same time.

use crate::error::{FormulaError, FormulaResult};
use crate::expression::Expression;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Source of variable values consulted during evaluation
pub trait Bindings {
    /// Value bound to `name`, or `None` when absent
    fn value_of(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Bindings for HashMap<String, f64, S> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<S: BuildHasher> Bindings for HashMap<&str, f64, S> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// A `None` value counts as absent.
impl<S: BuildHasher> Bindings for HashMap<String, Option<f64>, S> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied().flatten()
    }
}

impl Bindings for BTreeMap<String, f64> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Bindings for [(&str, f64)] {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
    }
}

impl<const N: usize> Bindings for [(&str, f64); N] {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.as_slice().value_of(name)
    }
}

impl<B: Bindings + ?Sized> Bindings for &B {
    fn value_of(&self, name: &str) -> Option<f64> {
        (**self).value_of(name)
    }
}

impl Expression {
    /// Evaluate the tree against `bindings`
    pub fn evaluate<B: Bindings + ?Sized>(&self, bindings: &B) -> FormulaResult<f64> {
        match self {
            Expression::Constant(value) => Ok(*value),
            Expression::Variable(name) => {
                bindings.value_of(name).ok_or_else(|| FormulaError::missing_binding(name))
            }
            Expression::BinaryOp { operator, left, right } => {
                let left_val = left.evaluate(bindings)?;
                let right_val = right.evaluate(bindings)?;
                Ok(operator.apply(left_val, right_val))
            }
        }
    }
}
