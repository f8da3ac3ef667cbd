//! Canonicalizing constructors.
//!
//! Every constructor applies a fixed, ordered list of rewrite rules and
//! returns the first match, falling back to an unreduced node. Building an
//! expression therefore always yields its normalized form; there is no
//! separate simplification pass.
//!
//! Equality used by the rules is syntactic: `sin(x)^2 + cos(x)^2` is not
//! recognized as `1`.

mod additive;
mod binary;
mod multiplicative;
mod operators;
mod power;
mod unary;

use crate::Expr;
use crate::functions::{BinaryOp, UnaryOp};

/// Element pairs for lifting a binary operator over arrays.
///
/// Two arrays pair up when they have the same length. With `broadcast`, a
/// scalar operand pairs with every element of an array operand.
pub(crate) fn vectorizable(left: &Expr, right: &Expr, broadcast: bool) -> Option<Vec<(Expr, Expr)>> {
    match (left.as_array(), right.as_array()) {
        (Some(a), Some(b)) if a.len() == b.len() => Some(
            a.iter()
                .cloned()
                .zip(b.iter().cloned())
                .collect(),
        ),
        (Some(a), None) if broadcast && right.rank() == 0 => {
            Some(a.iter().map(|item| (item.clone(), right.clone())).collect())
        }
        (None, Some(b)) if broadcast && left.rank() == 0 => {
            Some(b.iter().map(|item| (left.clone(), item.clone())).collect())
        }
        _ => None,
    }
}

/// Apply `f` to every pair and collect the results into an array
pub(crate) fn lift(pairs: Vec<(Expr, Expr)>, f: impl Fn(Expr, Expr) -> Expr) -> Expr {
    Expr::array_node(pairs.into_iter().map(|(a, b)| f(a, b)).collect())
}

/// Split `expr` into a numeric coefficient and the remaining factor.
///
/// `3*x → (3, x)`, `x/4 → (0.25, x)`, `-(2*x) → (-2, x)`, `x → (1, x)`.
/// Numbers have no symbolic part and yield `None`.
pub(crate) fn as_factor(expr: &Expr) -> Option<(f64, Expr)> {
    if expr.as_number(false).is_some() {
        return None;
    }
    if let Some((l, r)) = expr.as_binary(BinaryOp::Mul) {
        if let Some(k) = l.as_constant() {
            return Some((k, r.clone()));
        }
        if let Some(k) = r.as_constant() {
            return Some((k, l.clone()));
        }
    }
    if let Some((l, r)) = expr.as_binary(BinaryOp::Div)
        && let Some(k) = r.as_constant()
    {
        return Some((1.0 / k, l.clone()));
    }
    if let Some(arg) = expr.as_unary(UnaryOp::Negate) {
        return as_factor(arg).map(|(k, rest)| (-k, rest));
    }
    Some((1.0, expr.clone()))
}

/// The two operands of a `+` or `-` node, the second one negated for `-`
pub(crate) fn as_signed_pair(expr: &Expr) -> Option<(Expr, Expr)> {
    if let Some((l, r)) = expr.as_binary(BinaryOp::Add) {
        return Some((l.clone(), r.clone()));
    }
    if let Some((l, r)) = expr.as_binary(BinaryOp::Sub) {
        return Some((l.clone(), Expr::negate(r.clone())));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_factor() {
        let x = Expr::variable("x");
        assert_eq!(as_factor(&x), Some((1.0, x.clone())));
        assert_eq!(
            as_factor(&Expr::binary_node(BinaryOp::Mul, Expr::constant(3.0), x.clone())),
            Some((3.0, x.clone()))
        );
        assert_eq!(
            as_factor(&Expr::binary_node(BinaryOp::Div, x.clone(), Expr::constant(4.0))),
            Some((0.25, x.clone()))
        );
        assert_eq!(as_factor(&Expr::constant(2.0)), None);
    }

    #[test]
    fn test_vectorizable_broadcasts_scalars() {
        let v = Expr::array(vec![Expr::variable("a"), Expr::variable("b")]).unwrap();
        let pairs = vectorizable(&v, &Expr::constant(2.0), true).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(vectorizable(&v, &Expr::constant(2.0), false).is_none());

        let w = Expr::array(vec![Expr::one(), Expr::zero(), Expr::one()]).unwrap();
        assert!(vectorizable(&v, &w, true).is_none());
    }
}
