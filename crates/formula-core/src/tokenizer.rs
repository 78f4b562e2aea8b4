//! Tokenizer for sectioned formula text
//!
//! A token is one leaf or sub-expression together with the operators written
//! immediately to its left and right. Tokens only live while the reducer
//! folds them into a tree.

use crate::error::{FormulaError, FormulaResult};
use crate::expression::Expression;
use crate::operator::Operator;
use crate::sectioner::Section;

/// Expression annotated with its neighbouring operators
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub expression: Expression,
    pub left: Option<Operator>,
    pub right: Option<Operator>,
}

impl Token {
    pub fn new(expression: Expression, left: Option<Operator>, right: Option<Operator>) -> Self {
        Self { expression, left, right }
    }
}

/// Resolve a leaf: registered variable, then decimal literal
pub fn leaf_expression(leaf: &str, variables: &[String]) -> FormulaResult<Expression> {
    if variables.iter().any(|name| name == leaf) {
        return Ok(Expression::var(leaf));
    }

    let is_decimal = leaf.chars().all(|ch| ch.is_ascii_digit() || ch == '.');
    match leaf.parse::<f64>() {
        Ok(value) if is_decimal => Ok(Expression::constant(value)),
        _ => Err(FormulaError::unknown_symbol(leaf)),
    }
}

/// Tokenize one flat section, splitting on operator characters.
///
/// `first` is true when nothing to the left could serve as the operand of a
/// leading operator.
pub fn tokenize(text: &str, first: bool, variables: &[String]) -> FormulaResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut carried: Option<Operator> = None;
    let mut leaf_start = 0;

    for (index, ch) in text.char_indices() {
        let Some(operator) = Operator::from_symbol(ch) else {
            continue;
        };

        let leaf = &text[leaf_start..index];
        if !leaf.is_empty() {
            let expression = leaf_expression(leaf, variables)?;
            tokens.push(Token::new(expression, carried, Some(operator)));
        } else if index == 0 {
            if first {
                return Err(FormulaError::dangling_operator(ch));
            }
        } else {
            let previous = carried.map_or(ch, Operator::symbol);
            return Err(FormulaError::syntax(format!(
                "missing operand between '{previous}' and '{ch}'"
            )));
        }

        carried = Some(operator);
        leaf_start = index + ch.len_utf8();
    }

    let leaf = &text[leaf_start..];
    if !leaf.is_empty() {
        tokens.push(Token::new(leaf_expression(leaf, variables)?, carried, None));
    }

    Ok(tokens)
}

/// Build the token sequence for an ordered list of sections.
///
/// Parenthesized sections are handed to `parse_group` and become a single
/// token. Flat sections are tokenized in place; an operator at either end of
/// a flat section links it to the neighbouring group.
pub fn tokenize_sections<F>(
    sections: &[Section<'_>],
    variables: &[String],
    mut parse_group: F,
) -> FormulaResult<Vec<Token>>
where
    F: FnMut(&str) -> FormulaResult<Expression>,
{
    let mut tokens: Vec<Token> = Vec::new();
    let mut carried: Option<Operator> = None;

    for (index, section) in sections.iter().enumerate() {
        if section.parenthesized {
            let expression = parse_group(section.text)?;
            tokens.push(Token::new(expression, carried.take(), None));
            continue;
        }

        let run = tokenize(section.text, index == 0, variables)?;

        let leading = section.text.chars().next().and_then(Operator::from_symbol);
        if let (Some(previous), Some(operator)) = (tokens.last_mut(), leading) {
            previous.right = Some(operator);
        }

        carried = section.text.chars().next_back().and_then(Operator::from_symbol);
        tokens.extend(run);
    }

    if let Some(operator) = carried {
        return Err(FormulaError::trailing_operator(operator.symbol()));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sectioner::section;

    fn vars(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_leaf_resolution() {
        let names = vars(&["x"]);
        assert_eq!(leaf_expression("x", &names), Ok(Expression::var("x")));
        assert_eq!(leaf_expression("2.5", &names), Ok(Expression::constant(2.5)));
        assert_eq!(leaf_expression(".5", &names), Ok(Expression::constant(0.5)));
        assert_eq!(leaf_expression("y", &names), Err(FormulaError::unknown_symbol("y")));
        assert_eq!(leaf_expression("1.2.3", &names), Err(FormulaError::unknown_symbol("1.2.3")));
    }

    #[test]
    fn test_float_keywords_are_not_numbers() {
        let names = vars(&[]);
        assert!(leaf_expression("inf", &names).is_err());
        assert!(leaf_expression("NaN", &names).is_err());
        assert!(leaf_expression("1e5", &names).is_err());
    }

    #[test]
    fn test_tokenize_records_neighbouring_operators() {
        let tokens = tokenize("2+x*3", true, &vars(&["x"])).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(Expression::constant(2.0), None, Some(Operator::Add)),
                Token::new(Expression::var("x"), Some(Operator::Add), Some(Operator::Multiply)),
                Token::new(Expression::constant(3.0), Some(Operator::Multiply), None),
            ]
        );
    }

    #[test]
    fn test_dangling_leading_operator() {
        assert_eq!(tokenize("+3", true, &vars(&[])), Err(FormulaError::dangling_operator('+')));
    }

    #[test]
    fn test_leading_operator_allowed_after_group() {
        let tokens = tokenize("-1", false, &vars(&[])).unwrap();
        let expected = Token::new(Expression::constant(1.0), Some(Operator::Subtract), None);
        assert_eq!(tokens, vec![expected]);
    }

    #[test]
    fn test_consecutive_operators() {
        let err = tokenize("2*-3", true, &vars(&[])).unwrap_err();
        assert_eq!(err, FormulaError::syntax("missing operand between '*' and '-'"));
    }

    #[test]
    fn test_sections_link_through_operators() {
        let sections = section("2*(x)-1").unwrap();
        let names = vars(&["x"]);
        let tokens =
            tokenize_sections(&sections, &names, |inner| Ok(Expression::var(inner))).unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::new(Expression::constant(2.0), None, Some(Operator::Multiply)),
                Token::new(
                    Expression::var("x"),
                    Some(Operator::Multiply),
                    Some(Operator::Subtract)
                ),
                Token::new(Expression::constant(1.0), Some(Operator::Subtract), None),
            ]
        );
    }

    #[test]
    fn test_lone_operator_section_between_groups() {
        let sections = section("(a)*(b)").unwrap();
        let tokens =
            tokenize_sections(&sections, &vars(&[]), |inner| Ok(Expression::var(inner))).unwrap();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].right, Some(Operator::Multiply));
        assert_eq!(tokens[1].left, Some(Operator::Multiply));
    }

    #[test]
    fn test_trailing_operator() {
        let sections = section("(1)+").unwrap();
        let result = tokenize_sections(&sections, &vars(&[]), |_| Ok(Expression::constant(1.0)));
        assert_eq!(result, Err(FormulaError::trailing_operator('+')));

        let sections = section("2+").unwrap();
        let result = tokenize_sections(&sections, &vars(&[]), |_| Ok(Expression::constant(1.0)));
        assert_eq!(result, Err(FormulaError::trailing_operator('+')));
    }

    #[test]
    fn test_group_failure_propagates() {
        let sections = section("1+(2)").unwrap();
        let result =
            tokenize_sections(&sections, &vars(&[]), |_| Err(FormulaError::unmatched_open()));
        assert_eq!(result, Err(FormulaError::unmatched_open()));
    }
}
