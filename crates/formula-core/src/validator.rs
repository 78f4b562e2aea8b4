//! Pass/fail gate for raw formula text

use crate::error::{FormulaError, FormulaResult};
use crate::operator::Operator;

/// True for characters permitted anywhere in a formula
pub fn is_formula_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '(' | ')') || Operator::is_symbol(ch)
}

/// Reject structurally illegal input before any transformation
pub fn validate(formula: &str) -> FormulaResult<()> {
    if formula.trim().is_empty() {
        return Err(FormulaError::blank());
    }

    if let Some(illegal) = formula.chars().find(|ch| !is_formula_char(*ch)) {
        return Err(FormulaError::illegal_character(illegal));
    }

    if !formula.chars().any(|ch| ch.is_ascii_alphanumeric() || Operator::is_symbol(ch)) {
        return Err(FormulaError::no_content());
    }

    Ok(())
}
