//! Splitting formula text on top-level parenthesis boundaries

use crate::error::{FormulaError, FormulaResult};

/// A run of formula text between top-level parenthesis boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// Text of the section; for parenthesized sections, the contents without
    /// the enclosing parentheses
    pub text: &'a str,
    /// Whether the text was enclosed in a top-level parenthesis pair
    pub parenthesized: bool,
}

impl<'a> Section<'a> {
    fn plain(text: &'a str) -> Self {
        Self { text, parenthesized: false }
    }

    fn grouped(text: &'a str) -> Self {
        Self { text, parenthesized: true }
    }
}

/// Split `formula` into ordered sections. Nested parentheses stay inside
/// their top-level group and are sectioned later, when that group is parsed.
pub fn section(formula: &str) -> FormulaResult<Vec<Section<'_>>> {
    let mut sections = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (index, ch) in formula.char_indices() {
        match ch {
            '(' => {
                if depth == 0 {
                    if index > start {
                        sections.push(Section::plain(&formula[start..index]));
                    }
                    start = index + 1;
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    return Err(FormulaError::unmatched_close());
                }
                depth -= 1;
                if depth == 0 {
                    sections.push(Section::grouped(&formula[start..index]));
                    start = index + 1;
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(FormulaError::unmatched_open());
    }

    if start < formula.len() {
        sections.push(Section::plain(&formula[start..]));
    }

    Ok(sections)
}

/// Deepest parenthesis nesting in `formula`, ignoring balance errors
pub fn nesting_depth(formula: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    for ch in formula.chars() {
        match ch {
            '(' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}
