//! Parse pipeline: validate, normalize, section, tokenize, reduce

use crate::config::ParserConfig;
use crate::error::{FormulaError, FormulaResult};
use crate::expression::Expression;
use crate::formula::Formula;
use crate::normalizer::normalize;
use crate::reducer::reduce;
use crate::sectioner::{nesting_depth, section};
use crate::tokenizer::tokenize_sections;
use crate::validator::validate;
use std::borrow::Cow;
use tracing::{debug, instrument, trace, warn};

/// Formula parser holding its configuration
#[derive(Debug, Clone, Default)]
pub struct FormulaParser {
    config: ParserConfig,
}

impl FormulaParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `formula` into an expression tree. `variables` lists the legal
    /// variable names in their canonical casing.
    pub fn parse<S: AsRef<str>>(
        &self,
        formula: &str,
        variables: &[S],
    ) -> FormulaResult<Expression> {
        let names = owned_names(variables);
        self.build(formula, &names).map(|(_, expression)| expression)
    }

    /// Parse `formula` and keep its source, normalized text and variable list
    #[instrument(level = "debug", skip(self, variables), fields(length = formula.len()))]
    pub fn compile<S: AsRef<str>>(&self, formula: &str, variables: &[S]) -> FormulaResult<Formula> {
        let names = owned_names(variables);
        let (normalized, expression) = self.build(formula, &names)?;
        Ok(Formula::new(formula.to_string(), normalized, names, expression))
    }

    fn build(&self, formula: &str, variables: &[String]) -> FormulaResult<(String, Expression)> {
        self.build_inner(formula, variables).map_err(|err| {
            debug!(category = err.category(), error = %err, "Formula rejected");
            err.with_formula(formula)
        })
    }

    fn build_inner(
        &self,
        formula: &str,
        variables: &[String],
    ) -> FormulaResult<(String, Expression)> {
        let text: Cow<'_, str> = if self.config.strip_whitespace {
            Cow::Owned(strip_whitespace(formula)?)
        } else {
            Cow::Borrowed(formula)
        };

        if text.len() > self.config.max_formula_length {
            return Err(FormulaError::too_long(text.len(), self.config.max_formula_length));
        }

        validate(&text)?;

        let depth = nesting_depth(&text);
        if depth > self.config.max_nesting_depth {
            warn!(depth, limit = self.config.max_nesting_depth, "Formula nesting too deep");
            return Err(FormulaError::nesting_too_deep(depth, self.config.max_nesting_depth));
        }

        let normalized = normalize(&text, variables);
        trace!(%normalized, "Normalized formula");

        let expression = parse_group(&normalized, variables, self.config.max_tree_depth)?;
        debug!(
            %normalized,
            nodes = expression.node_count(),
            "Parsed formula"
        );

        Ok((normalized, expression))
    }
}

fn owned_names<S: AsRef<str>>(variables: &[S]) -> Vec<String> {
    variables.iter().map(|name| name.as_ref().to_string()).collect()
}

/// Remove ASCII whitespace. Whitespace is only a separator when an operator
/// or parenthesis sits beside it; between two operands it would fuse them
/// (`1 2` into `12`) and is rejected.
fn strip_whitespace(formula: &str) -> FormulaResult<String> {
    let mut stripped = String::with_capacity(formula.len());
    let mut pending_gap = false;

    for ch in formula.chars() {
        if ch.is_ascii_whitespace() {
            pending_gap = true;
            continue;
        }
        if pending_gap {
            if let Some(before) = stripped.chars().next_back() {
                if ends_operand(before) && starts_operand(ch) {
                    return Err(FormulaError::separating_whitespace(before, ch));
                }
            }
            pending_gap = false;
        }
        stripped.push(ch);
    }

    Ok(stripped)
}

fn ends_operand(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || ch == ')'
}

fn starts_operand(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || ch == '('
}

/// Parse one level of text; parenthesized groups recurse through here.
/// Nesting depth is bounded before the first call.
fn parse_group(text: &str, variables: &[String], max_depth: usize) -> FormulaResult<Expression> {
    if text.is_empty() {
        return Err(FormulaError::syntax("empty parentheses"));
    }

    let sections = section(text)?;
    trace!(text, sections = sections.len(), "Sectioned text");

    let tokens =
        tokenize_sections(&sections, variables, |inner| parse_group(inner, variables, max_depth))?;
    reduce(tokens, max_depth)
}
