//! Multiplication and division

use super::{as_factor, lift, vectorizable};
use crate::Expr;
use crate::functions::{BinaryOp, UnaryOp};

impl Expr {
    /// `left * right`, normalized. Arrays multiply element-wise here; the
    /// matrix product is [`Expr::product`].
    pub fn mul_expr(left: Expr, right: Expr) -> Expr {
        if let Some(pairs) = vectorizable(&left, &right, true) {
            return lift(pairs, Expr::mul_expr);
        }

        let neg_left = left.as_unary(UnaryOp::Negate).cloned();
        let neg_right = right.as_unary(UnaryOp::Negate).cloned();
        match (neg_left, neg_right) {
            (Some(a), Some(b)) => return Expr::mul_expr(a, b),
            (Some(a), None) => return Expr::negate(Expr::mul_expr(a, right)),
            (None, Some(b)) => return Expr::negate(Expr::mul_expr(left, b)),
            (None, None) => {}
        }

        let sqrt_left = left.as_unary(UnaryOp::Sqrt).cloned();
        let sqrt_right = right.as_unary(UnaryOp::Sqrt).cloned();
        match (sqrt_left, sqrt_right) {
            (Some(a), Some(b)) => return Expr::mul_expr(a, b).sqrt(),
            // sqrt(b)*b = sqrt(b^3)
            (Some(a), None) if a == right => {
                return Expr::pow_expr(right, Expr::constant(3.0)).sqrt();
            }
            (None, Some(b)) if b == left => {
                return Expr::pow_expr(left, Expr::constant(3.0)).sqrt();
            }
            _ => {}
        }

        if let (Some(x), Some(y)) = (left.as_number(true), right.as_number(true)) {
            return Expr::constant(x * y);
        }

        if let Some(a) = left.as_number(true) {
            if a == 0.0 {
                return Expr::zero();
            }
            if a == 1.0 {
                return right;
            }
        }
        if let Some(a) = left.as_constant() {
            if let Some((l, r)) = right.as_binary(BinaryOp::Mul) {
                if let Some(k) = l.as_constant() {
                    return Expr::mul_expr(Expr::constant(a * k), r.clone());
                }
                if let Some(k) = r.as_constant() {
                    return Expr::mul_expr(Expr::constant(a * k), l.clone());
                }
            }
            if let Some((l, r)) = right.as_binary(BinaryOp::Div) {
                if let Some(k) = l.as_constant() {
                    return Expr::div_expr(Expr::constant(a * k), r.clone());
                }
                if let Some(k) = r.as_constant() {
                    return Expr::mul_expr(Expr::constant(a / k), l.clone());
                }
            }
            if a.abs() < 0.2 {
                return Expr::div_expr(right, Expr::constant(1.0 / a));
            }
        }

        if let Some(b) = right.as_number(true) {
            if b == 0.0 {
                return Expr::zero();
            }
            if b == 1.0 {
                return left;
            }
        }
        if let Some(b) = right.as_constant() {
            // coefficients go in front; small ones become divisors
            return if b.abs() < 1.0 {
                Expr::div_expr(left, Expr::constant(1.0 / b))
            } else {
                Expr::mul_expr(right, left)
            };
        }

        if let (Some((ka, a)), Some((kb, b))) = (as_factor(&left), as_factor(&right))
            && (ka != 1.0 || kb != 1.0)
        {
            return Expr::mul_expr(Expr::constant(ka * kb), Expr::mul_expr(a, b));
        }

        // (x/a) * (y/b) = (x*y)/(a*b)
        if let (Some((x, a)), Some((y, b))) =
            (left.as_binary(BinaryOp::Div), right.as_binary(BinaryOp::Div))
        {
            return Expr::div_expr(
                Expr::mul_expr(x.clone(), y.clone()),
                Expr::mul_expr(a.clone(), b.clone()),
            );
        }

        // float constants outward
        if let Some((l, r)) = left.as_binary(BinaryOp::Mul) {
            if let Some(k) = l.as_constant() {
                return Expr::mul_expr(Expr::constant(k), Expr::mul_expr(r.clone(), right));
            }
            if let Some(k) = r.as_constant() {
                return Expr::mul_expr(Expr::constant(k), Expr::mul_expr(l.clone(), right));
            }
        }
        if let Some((l, r)) = left.as_binary(BinaryOp::Div) {
            if let Some(k) = l.as_constant() {
                return Expr::div_expr(Expr::mul_expr(Expr::constant(k), right), r.clone());
            }
            if let Some(k) = r.as_constant() {
                return Expr::div_expr(Expr::mul_expr(l.clone(), right), Expr::constant(k));
            }
        }
        if let Some((l, r)) = right.as_binary(BinaryOp::Mul) {
            if let Some(k) = l.as_constant() {
                return Expr::mul_expr(Expr::constant(k), Expr::mul_expr(left, r.clone()));
            }
            if let Some(k) = r.as_constant() {
                return Expr::mul_expr(Expr::constant(k), Expr::mul_expr(left, l.clone()));
            }
        }
        if let Some((l, r)) = right.as_binary(BinaryOp::Div) {
            if let Some(k) = l.as_constant() {
                return Expr::div_expr(Expr::mul_expr(Expr::constant(k), left), r.clone());
            }
            if let Some(k) = r.as_constant() {
                return Expr::div_expr(Expr::mul_expr(left, l.clone()), Expr::constant(k));
            }
        }

        if left == right {
            return Expr::pow_expr(left, Expr::constant(2.0));
        }

        Expr::binary_node(BinaryOp::Mul, left, right)
    }

    /// `left / right`, normalized. Arrays divide element-wise here; linear
    /// systems are solved by [`Expr::solve`].
    pub fn div_expr(left: Expr, right: Expr) -> Expr {
        if let Some(pairs) = vectorizable(&left, &right, true) {
            return lift(pairs, Expr::div_expr);
        }

        let neg_left = left.as_unary(UnaryOp::Negate).cloned();
        let neg_right = right.as_unary(UnaryOp::Negate).cloned();
        match (neg_left, neg_right) {
            (Some(a), Some(b)) => return Expr::div_expr(a, b),
            (Some(a), None) => return Expr::negate(Expr::div_expr(a, right)),
            (None, Some(b)) => return Expr::negate(Expr::div_expr(left, b)),
            (None, None) => {}
        }

        let sqrt_left = left.as_unary(UnaryOp::Sqrt).cloned();
        let sqrt_right = right.as_unary(UnaryOp::Sqrt).cloned();
        match (sqrt_left, sqrt_right) {
            (Some(a), Some(b)) => return Expr::div_expr(a, b).sqrt(),
            // sqrt(b)/b = 1/sqrt(b)
            (Some(a), None) if a == right => return Expr::inv(left),
            // a/sqrt(a) = sqrt(a)
            (None, Some(b)) if b == left => return right,
            _ => {}
        }

        if let (Some(x), Some(y)) = (left.as_constant(), right.as_constant()) {
            return Expr::constant(x / y);
        }

        if let Some(a) = left.as_constant() {
            return if a == 0.0 {
                Expr::zero()
            } else if a == 1.0 {
                Expr::inv(right)
            } else if a == -1.0 {
                Expr::negate(Expr::inv(right))
            } else if a.abs() < 0.2 {
                Expr::inv(Expr::mul_expr(Expr::constant(1.0 / a), right))
            } else {
                Expr::mul_expr(left, Expr::inv(right))
            };
        }

        let inv_left = left.as_unary(UnaryOp::Inverse).cloned();
        let inv_right = right.as_unary(UnaryOp::Inverse).cloned();
        match (inv_left, inv_right) {
            // (1/a)/(1/b) = b/a
            (Some(a), Some(b)) => return Expr::div_expr(b, a),
            (Some(a), None) => return Expr::inv(Expr::mul_expr(a, right)),
            (None, Some(b)) => return Expr::mul_expr(left, b),
            (None, None) => {}
        }

        if let Some(b) = right.as_number(true) {
            if b == 0.0 {
                return Expr::constant(f64::INFINITY);
            }
            if b == 1.0 {
                return left;
            }
        }
        if let Some(b) = right.as_constant() {
            if let Some((l, r)) = left.as_binary(BinaryOp::Mul) {
                if let Some(k) = l.as_constant() {
                    return Expr::mul_expr(Expr::constant(k / b), r.clone());
                }
                if let Some(k) = r.as_constant() {
                    return Expr::mul_expr(Expr::constant(k / b), l.clone());
                }
            }
            if let Some((l, r)) = left.as_binary(BinaryOp::Div) {
                if let Some(k) = l.as_constant() {
                    return Expr::div_expr(Expr::constant(k / b), r.clone());
                }
                if let Some(k) = r.as_constant() {
                    return Expr::div_expr(l.clone(), Expr::constant(k * b));
                }
            }
            if b.abs() < 0.2 {
                return Expr::mul_expr(Expr::constant(1.0 / b), left);
            }
        }

        if left == right {
            return Expr::one();
        }

        if let (Some((ka, a)), Some((kb, b))) = (as_factor(&left), as_factor(&right))
            && (ka != 1.0 || kb != 1.0)
        {
            return Expr::mul_expr(Expr::constant(ka / kb), Expr::div_expr(a, b));
        }

        // (a/b)/(c/d) = (a*d)/(b*c)
        if let (Some((a, b)), Some((c, d))) =
            (left.as_binary(BinaryOp::Div), right.as_binary(BinaryOp::Div))
        {
            return Expr::div_expr(
                Expr::mul_expr(a.clone(), d.clone()),
                Expr::mul_expr(b.clone(), c.clone()),
            );
        }

        // pull coefficients out of the denominator
        if let Some((l, r)) = right.as_binary(BinaryOp::Mul) {
            if let Some((k, rest)) = as_factor(l)
                && k != 1.0
            {
                return Expr::mul_expr(
                    Expr::constant(1.0 / k),
                    Expr::div_expr(left, Expr::mul_expr(rest, r.clone())),
                );
            }
            if let Some((k, rest)) = as_factor(r)
                && k != 1.0
            {
                return Expr::mul_expr(
                    Expr::constant(1.0 / k),
                    Expr::div_expr(left, Expr::mul_expr(l.clone(), rest)),
                );
            }
        }
        if let Some((l, r)) = right.as_binary(BinaryOp::Div) {
            if let Some((k, rest)) = as_factor(l)
                && k != 1.0
            {
                return Expr::mul_expr(
                    Expr::constant(1.0 / k),
                    Expr::div_expr(left, Expr::div_expr(rest, r.clone())),
                );
            }
            if let Some((k, rest)) = as_factor(r)
                && k != 1.0
            {
                return Expr::mul_expr(
                    Expr::constant(k),
                    Expr::div_expr(left, Expr::div_expr(l.clone(), rest)),
                );
            }
        }

        Expr::binary_node(BinaryOp::Div, left, right)
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
    fn test_fold_constants() {
        assert_eq!(
            Expr::mul_expr(Expr::constant(2.0), Expr::constant(3.0)),
            Expr::constant(6.0)
        );
        assert_eq!(
            Expr::div_expr(Expr::constant(3.0), Expr::constant(2.0)),
            Expr::constant(1.5)
        );
    }

    #[test]
    fn test_identities() {
        assert_eq!(Expr::mul_expr(x(), Expr::one()), x());
        assert_eq!(Expr::mul_expr(Expr::one(), x()), x());
        assert_eq!(Expr::mul_expr(x(), Expr::zero()), Expr::zero());
        assert_eq!(Expr::mul_expr(Expr::zero(), x()), Expr::zero());
        assert_eq!(Expr::div_expr(x(), x()), Expr::one());
        assert_eq!(Expr::div_expr(x(), Expr::one()), x());
        assert_eq!(Expr::div_expr(Expr::zero(), x()), Expr::zero());
    }

    #[test]
    fn test_square() {
        assert_eq!(
            Expr::mul_expr(x(), x()),
            Expr::pow_expr(x(), Expr::constant(2.0))
        );
    }

    #[test]
    fn test_coefficient_goes_first() {
        let e = Expr::mul_expr(x(), Expr::constant(3.0));
        assert_eq!(e, Expr::mul_expr(Expr::constant(3.0), x()));
        assert_eq!(e.to_string(), "3*x");
        // small coefficients become divisors
        let half = Expr::mul_expr(x(), Expr::constant(0.5));
        assert_eq!(half.to_string(), "x/2");
    }

    #[test]
    fn test_coefficients_combine() {
        let a = Expr::mul_expr(Expr::constant(2.0), x());
        let b = Expr::mul_expr(Expr::constant(3.0), y());
        assert_eq!(
            Expr::mul_expr(a, b),
            Expr::mul_expr(Expr::constant(6.0), Expr::mul_expr(x(), y()))
        );
    }

    #[test]
    fn test_negation_pulled_out() {
        let e = Expr::mul_expr(Expr::negate(x()), y());
        assert_eq!(e, Expr::negate(Expr::mul_expr(x(), y())));
        assert_eq!(
            Expr::div_expr(Expr::negate(x()), Expr::negate(y())),
            Expr::div_expr(x(), y())
        );
    }

    #[test]
    fn test_sqrt_products() {
        assert_eq!(
            Expr::mul_expr(x().sqrt(), y().sqrt()),
            Expr::mul_expr(x(), y()).sqrt()
        );
        assert_eq!(
            Expr::mul_expr(x().sqrt(), x()),
            Expr::pow_expr(x(), Expr::constant(3.0)).sqrt()
        );
        assert_eq!(Expr::div_expr(x(), x().sqrt()), x().sqrt());
        assert_eq!(Expr::div_expr(x().sqrt(), x()), Expr::inv(x().sqrt()));
    }

    #[test]
    fn test_reciprocals() {
        assert_eq!(Expr::div_expr(Expr::one(), x()), Expr::inv(x()));
        assert_eq!(Expr::div_expr(Expr::one(), Expr::inv(x())), x());
        assert_eq!(
            Expr::div_expr(Expr::inv(x()), Expr::inv(y())),
            Expr::div_expr(y(), x())
        );
        assert_eq!(
            Expr::div_expr(Expr::constant(1.0), Expr::zero()),
            Expr::constant(f64::INFINITY)
        );
    }

    #[test]
    fn test_quotients_merge() {
        let a = Expr::div_expr(x(), Expr::variable("a"));
        let b = Expr::div_expr(y(), Expr::variable("b"));
        assert_eq!(
            Expr::mul_expr(a, b),
            Expr::div_expr(
                Expr::mul_expr(x(), y()),
                Expr::mul_expr(Expr::variable("a"), Expr::variable("b"))
            )
        );
    }

    #[test]
    fn test_named_constant_quotient_stays_symbolic() {
        let deg = Expr::deg();
        assert_eq!(deg.to_string(), "pi/180");
        assert_eq!(deg.to_constant(), Err(crate::ExprError::NotAConstant("pi/180".into())));
    }
}
