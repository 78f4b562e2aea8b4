//! Binary operators and their precedence tiers

use std::fmt;

/// Binary operators supported in formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Exponent,
    Multiply,
    Divide,
    Remainder,
    Add,
    Subtract,
}

impl Operator {
    /// Every operator, in symbol-table order
    pub const ALL: [Operator; 6] = [
        Operator::Exponent,
        Operator::Multiply,
        Operator::Divide,
        Operator::Remainder,
        Operator::Add,
        Operator::Subtract,
    ];

    /// Precedence tiers, highest binding first
    pub const TIERS: [&'static [Operator]; 3] = [
        &[Operator::Exponent],
        &[Operator::Multiply, Operator::Divide, Operator::Remainder],
        &[Operator::Add, Operator::Subtract],
    ];

    /// Look up the operator written as `symbol`
    pub fn from_symbol(symbol: char) -> Option<Operator> {
        match symbol {
            '^' => Some(Operator::Exponent),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            '%' => Some(Operator::Remainder),
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            _ => None,
        }
    }

    /// True if `symbol` is one of the operator characters
    pub fn is_symbol(symbol: char) -> bool {
        Self::from_symbol(symbol).is_some()
    }

    /// The single-character symbol of this operator
    pub fn symbol(self) -> char {
        match self {
            Operator::Exponent => '^',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Remainder => '%',
            Operator::Add => '+',
            Operator::Subtract => '-',
        }
    }

    /// Index into [`Operator::TIERS`]; lower binds tighter
    pub fn tier(self) -> usize {
        match self {
            Operator::Exponent => 0,
            Operator::Multiply | Operator::Divide | Operator::Remainder => 1,
            Operator::Add | Operator::Subtract => 2,
        }
    }

    /// Apply the operator using IEEE-754 double arithmetic.
    ///
    /// Division and remainder by zero yield infinities or NaN rather than errors.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Exponent => left.powf(right),
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::Remainder => left % right,
            Operator::Add => left + right,
            Operator::Subtract => left - right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup_matches_table() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Operator::from_symbol('('), None);
        assert_eq!(Operator::from_symbol('x'), None);
    }

    #[test]
    fn test_every_operator_in_exactly_one_tier() {
        for op in Operator::ALL {
            let tiers: Vec<usize> = Operator::TIERS
                .iter()
                .enumerate()
                .filter(|(_, tier)| tier.contains(&op))
                .map(|(index, _)| index)
                .collect();
            assert_eq!(tiers, vec![op.tier()]);
        }
    }

    #[test]
    fn test_operator_precedence() {
        assert!(Operator::Exponent.tier() < Operator::Multiply.tier());
        assert!(Operator::Multiply.tier() < Operator::Add.tier());
        assert_eq!(Operator::Divide.tier(), Operator::Remainder.tier());
        assert_eq!(Operator::Add.tier(), Operator::Subtract.tier());
    }

    #[test]
    fn test_apply() {
        assert_eq!(Operator::Exponent.apply(2.0, 10.0), 1024.0);
        assert_eq!(Operator::Multiply.apply(3.0, 4.0), 12.0);
        assert_eq!(Operator::Divide.apply(9.0, 2.0), 4.5);
        assert_eq!(Operator::Remainder.apply(7.0, 3.0), 1.0);
        assert_eq!(Operator::Add.apply(0.5, 0.25), 0.75);
        assert_eq!(Operator::Subtract.apply(1.0, 3.0), -2.0);
    }

    #[test]
    fn test_division_by_zero_follows_ieee() {
        assert_eq!(Operator::Divide.apply(1.0, 0.0), f64::INFINITY);
        assert_eq!(Operator::Divide.apply(-1.0, 0.0), f64::NEG_INFINITY);
        assert!(Operator::Divide.apply(0.0, 0.0).is_nan());
        assert!(Operator::Remainder.apply(5.0, 0.0).is_nan());
    }
}
