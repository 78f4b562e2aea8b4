//! Precedence folding of a token sequence into one expression
//!
//! Tiers are processed from tightest to loosest. Within a tier, adjacent
//! pairs are merged in left-to-right order, so operators sharing a tier
//! (including repeated `^`) group to the left.

use crate::error::{FormulaError, FormulaResult};
use crate::expression::Expression;
use crate::operator::Operator;
use crate::tokenizer::Token;
use tracing::trace;

/// Token plus the depth of the tree it holds
struct Pending {
    token: Token,
    depth: usize,
}

/// Operator joining two adjacent tokens, if any
fn connecting_operator(left: &Token, right: &Token) -> Option<Operator> {
    left.right.or(right.left)
}

/// Merge every adjacent pair joined by an operator of `tier`, building the
/// folded sequence in a fresh vector. Returns it with the number of merges.
fn fold_tier(
    pending: Vec<Pending>,
    tier: &[Operator],
    max_depth: usize,
) -> FormulaResult<(Vec<Pending>, usize)> {
    let mut folded: Vec<Pending> = Vec::with_capacity(pending.len());
    let mut merges = 0;

    for next in pending {
        let Some(last) = folded.last_mut() else {
            folded.push(next);
            continue;
        };

        let operator = match connecting_operator(&last.token, &next.token) {
            Some(operator) if tier.contains(&operator) => operator,
            _ => {
                folded.push(next);
                continue;
            }
        };

        let depth = 1 + last.depth.max(next.depth);
        if depth > max_depth {
            return Err(FormulaError::tree_too_deep(max_depth));
        }

        // The merged token stays last so it can absorb its next neighbour
        let left = std::mem::replace(&mut last.token.expression, Expression::Constant(0.0));
        last.token.expression = Expression::binary(operator, left, next.token.expression);
        last.token.right = next.token.right;
        last.depth = depth;
        merges += 1;
    }

    Ok((folded, merges))
}

/// Reduce tokens to a single expression no deeper than `max_depth` levels
pub fn reduce(tokens: Vec<Token>, max_depth: usize) -> FormulaResult<Expression> {
    if tokens.is_empty() {
        return Err(FormulaError::syntax("no expression to combine"));
    }

    let mut pending = Vec::with_capacity(tokens.len());
    for token in tokens {
        // Group results were already reduced under the same limit
        let depth = token.expression.depth();
        if depth > max_depth {
            return Err(FormulaError::tree_too_deep(max_depth));
        }
        pending.push(Pending { token, depth });
    }

    for tier in Operator::TIERS {
        if pending.len() == 1 {
            break;
        }
        let (folded, merges) = fold_tier(pending, tier, max_depth)?;
        pending = folded;
        trace!(tier = ?tier, merges, remaining = pending.len(), "folded precedence tier");
    }

    match pending.pop() {
        Some(last) if pending.is_empty() => Ok(last.token.expression),
        _ => Err(FormulaError::syntax("unable to combine all expressions")),
    }
}
