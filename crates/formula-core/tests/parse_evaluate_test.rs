use formula_core::*;
use std::collections::HashMap;

const NO_VARS: &[&str] = &[];

fn bindings(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(name, value)| (name.to_string(), *value)).collect()
}

fn eval(formula: &str, variables: &[&str], pairs: &[(&str, f64)]) -> f64 {
    parse(formula, variables).unwrap().evaluate(&bindings(pairs)).unwrap()
}

#[test]
fn test_multiply_before_add() {
    assert_eq!(eval("2+3*4", NO_VARS, &[]), 14.0);
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(eval("(2+3)*4", NO_VARS, &[]), 20.0);
}

#[test]
fn test_implicit_multiplication_with_coefficient() {
    assert_eq!(eval("3x", &["x"], &[("x", 4.0)]), 12.0);
}

#[test]
fn test_implicit_multiplication_before_parenthesis() {
    assert_eq!(eval("9(x+1)", &["x"], &[("x", 1.0)]), 18.0);
}

#[test]
fn test_case_normalization_rewrites_text_not_binding_key() {
    let expr = parse("X", &["x"]).unwrap();
    assert_eq!(expr, Expression::var("x"));
    assert_eq!(expr.evaluate(&bindings(&[("x", 5.0)])), Ok(5.0));
    assert_eq!(expr.evaluate(&bindings(&[("X", 5.0)])), Err(FormulaError::missing_binding("x")));
}

#[test]
fn test_blank_formula_is_validation_error() {
    assert!(matches!(parse("", NO_VARS), Err(FormulaError::Validation { .. })));
    assert!(matches!(parse("  ", NO_VARS), Err(FormulaError::Validation { .. })));
}

#[test]
fn test_unmatched_open_parenthesis() {
    assert!(matches!(parse("(2+3", NO_VARS), Err(FormulaError::Syntax { .. })));
}

#[test]
fn test_unmatched_close_parenthesis() {
    assert!(matches!(parse("2+3)", NO_VARS), Err(FormulaError::Syntax { .. })));
}

#[test]
fn test_dangling_leading_operator() {
    assert!(matches!(parse("+3", NO_VARS), Err(FormulaError::Syntax { .. })));
    assert!(matches!(parse("2*(-3)", NO_VARS), Err(FormulaError::Syntax { .. })));
}

#[test]
fn test_unknown_symbol() {
    match parse("y", NO_VARS) {
        Err(FormulaError::UnknownSymbol { symbol, .. }) => assert_eq!(symbol, "y"),
        other => panic!("Expected unknown symbol error, got {other:?}"),
    }
}

#[test]
fn test_missing_binding() {
    let expr = parse("x", &["x"]).unwrap();
    assert_eq!(expr.evaluate(&bindings(&[])), Err(FormulaError::missing_binding("x")));
}

#[test]
fn test_consecutive_operators_rejected() {
    assert!(matches!(parse("2+*3", NO_VARS), Err(FormulaError::Syntax { .. })));
    assert!(matches!(parse("2+", NO_VARS), Err(FormulaError::Syntax { .. })));
}

#[test]
fn test_all_operators() {
    assert_eq!(eval("2^10", NO_VARS, &[]), 1024.0);
    assert_eq!(eval("7%4", NO_VARS, &[]), 3.0);
    assert_eq!(eval("9/4", NO_VARS, &[]), 2.25);
    assert_eq!(eval("1-0.5", NO_VARS, &[]), 0.5);
}

#[test]
fn test_same_tier_folds_left_to_right() {
    assert_eq!(eval("8/2*4", NO_VARS, &[]), 16.0);
    assert_eq!(eval("10-4-3", NO_VARS, &[]), 3.0);
    assert_eq!(eval("10-4+3", NO_VARS, &[]), 9.0);
    assert_eq!(eval("7%4*2", NO_VARS, &[]), 6.0);
}

/// Repeated exponents fold left like every other tier, unlike the
/// conventional right-associative reading: 2^3^2 is (2^3)^2.
#[test]
fn test_repeated_exponent_is_left_associative() {
    assert_eq!(eval("2^3^2", NO_VARS, &[]), 64.0);
    assert_ne!(eval("2^3^2", NO_VARS, &[]), 512.0);
    assert_eq!(eval("2^(3^2)", NO_VARS, &[]), 512.0);
}

#[test]
fn test_division_by_zero_follows_ieee() {
    assert_eq!(eval("1/0", NO_VARS, &[]), f64::INFINITY);
    assert!(eval("0/0", NO_VARS, &[]).is_nan());
    assert_eq!(eval("1/(x-x)", &["x"], &[("x", 3.0)]), f64::INFINITY);
}

#[test]
fn test_realistic_scaling_curve() {
    let curve = compile("base(1.15^Level)+flat_bonus", &["base", "level", "flat_bonus"]).unwrap();
    assert_eq!(curve.normalized(), "base*(1.15^level)+flat_bonus");

    let at = |level: f64| {
        curve
            .evaluate(&bindings(&[("base", 100.0), ("level", level), ("flat_bonus", 5.0)]))
            .unwrap()
    };
    assert_eq!(at(0.0), 105.0);
    assert!((at(2.0) - (100.0 * 1.15f64.powi(2) + 5.0)).abs() < 1e-9);
}

#[test]
fn test_adjacent_groups_and_variables() {
    assert_eq!(eval("(a)(b)", &["a", "b"], &[("a", 3.0), ("b", 4.0)]), 12.0);
    assert_eq!(eval("2ab", &["a", "b"], &[("a", 3.0), ("b", 4.0)]), 24.0);
    assert_eq!(eval("(x+1)(x-1)", &["x"], &[("x", 3.0)]), 8.0);
    assert_eq!(eval("(2)(3)4", NO_VARS, &[]), 24.0);
}

#[test]
fn test_display_reparses_to_same_tree() {
    let variables = ["x", "y"];
    for source in ["2+3*4", "(2+3)*4", "3x^2-y/4", "9(x+1)", "2^3^2", "x%y-1.5"] {
        let expr = parse(source, &variables).unwrap();
        let reparsed = parse(&expr.to_string(), &variables).unwrap();
        assert_eq!(reparsed, expr, "{source} rendered as {expr}");
    }
}

#[test]
fn test_errors_report_formula_and_category() {
    let err = parse("2$", NO_VARS).unwrap_err();
    assert_eq!(err.category(), "validation");
    assert!(matches!(
        err,
        FormulaError::Validation { character: Some('$'), formula: Some(ref f), .. } if f == "2$"
    ));
}

#[test]
fn test_tree_is_shareable_across_threads() {
    let formula = compile("x^2+1", &["x"]).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let formula = &formula;
                scope.spawn(move || formula.evaluate(&[("x", i as f64)]).unwrap())
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), (i * i + 1) as f64);
        }
    });
}

#[test]
fn test_long_flat_chain_is_rejected_at_highest_limits() {
    let toml = format!(
        "[parser]\nmax_formula_length = {FORMULA_LENGTH_CEILING}\n\
         max_tree_depth = {TREE_DEPTH_CEILING}"
    );
    let config = ParserConfig::from_toml_str(&toml).unwrap();
    let parser = FormulaParser::new(config);

    let formula = format!("{}1", "1+".repeat(80_000));
    let err = parser.parse(&formula, NO_VARS).unwrap_err();
    assert_eq!(err.category(), "syntax");

    let deepest = format!("{}1", "1+".repeat(TREE_DEPTH_CEILING - 1));
    let value = parser.parse(&deepest, NO_VARS).unwrap().evaluate(&bindings(&[])).unwrap();
    assert_eq!(value, TREE_DEPTH_CEILING as f64);
}
