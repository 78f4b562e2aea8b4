//! Text rewriting applied before sectioning
//!
//! Two passes, each producing a new string:
//! - case correction of registered variable names
//! - insertion of explicit `*` where multiplication is written by adjacency,
//!   so `3x`, `9(x+1)` and `(a)(b)` all reach the tokenizer as products

use crate::operator::Operator;

/// Run both normalization passes
pub fn normalize(formula: &str, variables: &[String]) -> String {
    let cased = fix_variable_case(formula, variables);
    insert_implicit_multiplication(&cased, variables)
}

/// Rewrite the first case-insensitive occurrence of each variable name to
/// its registered spelling. One replacement per variable.
pub fn fix_variable_case(formula: &str, variables: &[String]) -> String {
    let mut text = formula.to_string();

    for name in variables.iter().filter(|name| !name.is_empty()) {
        let haystack = text.to_ascii_lowercase();
        let needle = name.to_ascii_lowercase();

        if let Some(start) = haystack.find(&needle) {
            let end = start + needle.len();
            if text.is_char_boundary(start) && text.is_char_boundary(end) {
                text.replace_range(start..end, name);
            }
        }
    }

    text
}

/// Insert `*` wherever two operands are adjacent without an operator
pub fn insert_implicit_multiplication(formula: &str, variables: &[String]) -> String {
    let around_variables = multiply_around_variables(formula, variables);
    multiply_around_parentheses(&around_variables)
}

fn joins_without_operator(ch: char, bracket: char) -> bool {
    ch != bracket && !Operator::is_symbol(ch)
}

/// A variable directly preceded by anything but `(` or an operator, or
/// directly followed by anything but `)` or an operator, is a factor.
///
/// The longest registered name wins at each position so that names sharing a
/// prefix (`rate`, `rate_cap`) are not split apart.
fn multiply_around_variables(formula: &str, variables: &[String]) -> String {
    let mut names: Vec<&str> =
        variables.iter().map(String::as_str).filter(|name| !name.is_empty()).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut out = String::with_capacity(formula.len() * 2);
    let mut rest = formula;

    while let Some(ch) = rest.chars().next() {
        let Some(name) = names.iter().find(|name| rest.starts_with(**name)) else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        };

        if out.chars().next_back().is_some_and(|prev| joins_without_operator(prev, '(')) {
            out.push('*');
        }
        out.push_str(name);
        rest = &rest[name.len()..];

        if rest.chars().next().is_some_and(|next| joins_without_operator(next, ')')) {
            out.push('*');
        }
    }

    out
}

/// `(` preceded by `)` or a digit, and `)` followed by a digit or a decimal
/// point, are products.
fn multiply_around_parentheses(formula: &str) -> String {
    let chars: Vec<char> = formula.chars().collect();
    let mut out = String::with_capacity(formula.len() * 2);

    for (index, &ch) in chars.iter().enumerate() {
        if ch == '(' && index > 0 {
            let prev = chars[index - 1];
            if prev == ')' || prev.is_ascii_digit() {
                out.push('*');
            }
        }

        out.push(ch);

        let number_follows =
            chars.get(index + 1).is_some_and(|next| next.is_ascii_digit() || *next == '.');
        if ch == ')' && number_follows {
            out.push('*');
        }
    }

    out
}
