//! Addition, subtraction and n-ary sums

use super::{as_factor, as_signed_pair, lift, vectorizable};
use crate::functions::{BinaryOp, UnaryOp};
use crate::{Expr, ExprKind};
use log::trace;
use rustc_hash::FxHashMap;

impl Expr {
    /// `left + right`, normalized
    pub fn add_expr(left: Expr, right: Expr) -> Expr {
        if let Some(pairs) = vectorizable(&left, &right, true) {
            return lift(pairs, Expr::add_expr);
        }
        if let (Some(x), Some(y)) = (left.as_number(true), right.as_number(true)) {
            return Expr::constant(x + y);
        }
        if left.is_constant_value(0.0) {
            return right;
        }
        if right.is_constant_value(0.0) {
            return left;
        }
        if left == right {
            return Expr::mul_expr(Expr::constant(2.0), left);
        }

        let neg_left = left.as_unary(UnaryOp::Negate).cloned();
        let neg_right = right.as_unary(UnaryOp::Negate).cloned();
        match (neg_left, neg_right) {
            // (-a) + (-b) = -(b + a)
            (Some(a), Some(b)) => return Expr::negate(Expr::add_expr(b, a)),
            (None, Some(b)) => return Expr::sub_expr(left, b),
            (Some(a), None) => return Expr::sub_expr(right, a),
            (None, None) => {}
        }

        if let (Some((ka, a)), Some((kb, b))) = (as_factor(&left), as_factor(&right))
            && a == b
        {
            return Expr::mul_expr(Expr::constant(ka + kb), a);
        }

        if let (Some((a, b)), Some((c, d))) = (as_signed_pair(&left), as_signed_pair(&right)) {
            return Expr::sum(vec![a, b, c, d]);
        }

        // a + (k*y) with k < 0  ->  a - |k|*y
        if let Some((k, y)) = right.as_binary(BinaryOp::Mul)
            && let Some(k) = k.as_constant()
            && k < 0.0
        {
            return Expr::sub_expr(left, Expr::mul_expr(Expr::constant(-k), y.clone()));
        }

        Expr::binary_node(BinaryOp::Add, left, right)
    }

    /// `left - right`, normalized
    pub fn sub_expr(left: Expr, right: Expr) -> Expr {
        if let Some(pairs) = vectorizable(&left, &right, true) {
            return lift(pairs, Expr::sub_expr);
        }
        if let (Some(x), Some(y)) = (left.as_number(true), right.as_number(true)) {
            return Expr::constant(x - y);
        }
        if left.is_constant_value(0.0) {
            return Expr::negate(right);
        }
        if right.is_constant_value(0.0) {
            return left;
        }
        if left == right {
            return Expr::zero();
        }

        let neg_left = left.as_unary(UnaryOp::Negate).cloned();
        let neg_right = right.as_unary(UnaryOp::Negate).cloned();
        match (neg_left, neg_right) {
            // (-a) - (-b) = b - a
            (Some(a), Some(b)) => return Expr::sub_expr(b, a),
            (None, Some(b)) => return Expr::add_expr(left, b),
            // (-a) - b = -(a + b)
            (Some(a), None) => return Expr::negate(Expr::add_expr(a, right)),
            (None, None) => {}
        }

        if let (Some((ka, a)), Some((kb, b))) = (as_factor(&left), as_factor(&right))
            && a == b
        {
            return Expr::mul_expr(Expr::constant(ka - kb), a);
        }

        if let (Some((a, b)), Some((c, d))) = (as_signed_pair(&left), as_signed_pair(&right)) {
            return Expr::sum(vec![a, b, Expr::negate(c), Expr::negate(d)]);
        }

        // a - (k*y) with k < 0  ->  a + |k|*y
        if let Some((k, y)) = right.as_binary(BinaryOp::Mul)
            && let Some(k) = k.as_constant()
            && k < 0.0
        {
            return Expr::add_expr(left, Expr::mul_expr(Expr::constant(-k), y.clone()));
        }

        Expr::binary_node(BinaryOp::Sub, left, right)
    }

    /// Sum of many terms with like-term collection.
    ///
    /// Numbers are folded together. Named constants are folded into the
    /// numbers when there is more than one of them or when plain numbers are
    /// present. Structurally equal terms are merged as `count*term`, in
    /// order of first appearance.
    pub fn sum(terms: Vec<Expr>) -> Expr {
        let mut numbers = Vec::new();
        let mut named = Vec::new();
        let mut others: Vec<(Expr, usize)> = Vec::new();
        let mut index: FxHashMap<Expr, usize> = FxHashMap::default();

        for term in terms {
            match &term.kind {
                ExprKind::Constant(v) => numbers.push(*v),
                ExprKind::NamedConstant { .. } => named.push(term),
                _ => match index.get(&term) {
                    Some(&i) => others[i].1 += 1,
                    None => {
                        index.insert(term.clone(), others.len());
                        others.push((term, 1));
                    }
                },
            }
        }

        if named.len() > 1 || (!named.is_empty() && !numbers.is_empty()) {
            numbers.extend(named.iter().filter_map(|c| c.as_number(true)));
        } else if let Some(constant) = named.pop() {
            others.insert(0, (constant, 1));
        }
        trace!(
            "sum: {} distinct term(s), {} number(s)",
            others.len(),
            numbers.len()
        );

        let mut total = None;
        for (term, count) in others {
            let term = Expr::mul_expr(Expr::constant(count as f64), term);
            total = Some(match total {
                None => term,
                Some(acc) => Expr::add_expr(acc, term),
            });
        }
        let number: f64 = numbers.iter().sum();
        match total {
            None => Expr::constant(number),
            Some(acc) => Expr::add_expr(acc, Expr::constant(number)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Expr;

    fn x() -> Expr {
        Expr::variable("x")
    }

    fn y() -> Expr {
        Expr::variable("y")
    }

    #[test]
    fn test_add_folds_constants() {
        assert_eq!(
            Expr::add_expr(Expr::constant(2.0), Expr::constant(3.0)),
            Expr::constant(5.0)
        );
        assert_eq!(
            Expr::sub_expr(Expr::constant(2.0), Expr::constant(3.0)),
            Expr::constant(-1.0)
        );
    }

    #[test]
    fn test_add_identities() {
        assert_eq!(Expr::add_expr(x(), Expr::zero()), x());
        assert_eq!(Expr::add_expr(Expr::zero(), x()), x());
        assert_eq!(Expr::sub_expr(x(), x()), Expr::zero());
        assert_eq!(Expr::sub_expr(Expr::zero(), x()), Expr::negate(x()));
        assert_eq!(
            Expr::add_expr(x(), x()),
            Expr::mul_expr(Expr::constant(2.0), x())
        );
    }

    #[test]
    fn test_sign_normalization() {
        assert_eq!(
            Expr::add_expr(x(), Expr::negate(y())),
            Expr::sub_expr(x(), y())
        );
        assert_eq!(
            Expr::sub_expr(x(), Expr::negate(y())),
            Expr::add_expr(x(), y())
        );
        assert_eq!(
            Expr::add_expr(Expr::negate(x()), y()),
            Expr::sub_expr(y(), x())
        );
        // x + (-3)*y  ->  x - 3*y
        let neg_product = Expr::mul_expr(Expr::constant(-3.0), y());
        assert_eq!(
            Expr::add_expr(x(), neg_product),
            Expr::sub_expr(x(), Expr::mul_expr(Expr::constant(3.0), y()))
        );
    }

    #[test]
    fn test_like_terms() {
        let two_x = Expr::mul_expr(Expr::constant(2.0), x());
        let three_x = Expr::mul_expr(Expr::constant(3.0), x());
        assert_eq!(
            Expr::add_expr(two_x.clone(), three_x.clone()),
            Expr::mul_expr(Expr::constant(5.0), x())
        );
        assert_eq!(Expr::sub_expr(three_x, two_x), x());
    }

    #[test]
    fn test_sum_groups_terms() {
        let s = Expr::sum(vec![
            x(),
            Expr::constant(2.0),
            y(),
            x(),
            Expr::constant(3.0),
        ]);
        let expected = Expr::add_expr(
            Expr::add_expr(Expr::mul_expr(Expr::constant(2.0), x()), y()),
            Expr::constant(5.0),
        );
        assert_eq!(s, expected);
        assert_eq!(s.to_string(), "2*x + y + 5");
    }

    #[test]
    fn test_sum_folds_named_constants() {
        let folded = Expr::sum(vec![Expr::pi(), Expr::constant(1.0)]);
        assert_eq!(folded, Expr::constant(std::f64::consts::PI + 1.0));

        let kept = Expr::sum(vec![Expr::pi(), x()]);
        assert_eq!(kept, Expr::add_expr(Expr::pi(), x()));
    }

    #[test]
    fn test_nested_sums_flatten() {
        let left = Expr::add_expr(x(), Expr::constant(1.0));
        let right = Expr::add_expr(x(), Expr::constant(2.0));
        let s = Expr::add_expr(left, right);
        assert_eq!(
            s,
            Expr::add_expr(Expr::mul_expr(Expr::constant(2.0), x()), Expr::constant(3.0))
        );
    }
}
