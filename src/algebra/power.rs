//! Powers and logarithms

use super::{lift, vectorizable};
use crate::Expr;
use crate::functions::BinaryOp;

impl Expr {
    /// `base ^ exponent`, normalized
    pub fn pow_expr(base: Expr, exponent: Expr) -> Expr {
        if let Some(pairs) = vectorizable(&base, &exponent, true) {
            return lift(pairs, Expr::pow_expr);
        }
        if let Some(b) = exponent.as_constant() {
            if b == 0.0 {
                return Expr::one();
            }
            if b == 1.0 {
                return base;
            }
            if b == -1.0 {
                return Expr::div_expr(Expr::one(), base);
            }
        }
        if let Some(a) = base.as_constant() {
            if let Some(b) = exponent.as_constant() {
                return Expr::constant(a.powf(b));
            }
            // a^y = exp(ln(a)*y)
            if a > 0.0 {
                return Expr::mul_expr(Expr::constant(a.ln()), exponent).exp();
            }
        }
        if base == Expr::e() {
            return exponent.exp();
        }
        Expr::binary_node(BinaryOp::Pow, base, exponent)
    }

    /// Logarithm of `value` in `base`
    pub fn log(value: Expr, base: Expr) -> Expr {
        if let Some(pairs) = vectorizable(&value, &base, true) {
            return lift(pairs, Expr::log);
        }
        if let (Some(v), Some(b)) = (value.as_number(true), base.as_number(true)) {
            return Expr::constant(BinaryOp::Log.apply(v, b));
        }
        if base == Expr::e() {
            return value.ln();
        }
        if value == base {
            return Expr::one();
        }
        Expr::binary_node(BinaryOp::Log, value, base)
    }
}

#[cfg(test)]
mod tests {
    use crate::Expr;

    fn x() -> Expr {
        Expr::variable("x")
    }

    #[test]
    fn test_power_identities() {
        assert_eq!(Expr::pow_expr(x(), Expr::zero()), Expr::one());
        assert_eq!(Expr::pow_expr(x(), Expr::one()), x());
        assert_eq!(Expr::pow_expr(x(), Expr::constant(-1.0)), Expr::inv(x()));
        assert_eq!(
            Expr::pow_expr(Expr::constant(2.0), Expr::constant(10.0)),
            Expr::constant(1024.0)
        );
    }

    #[test]
    fn test_constant_base_becomes_exponential() {
        let e = Expr::pow_expr(Expr::constant(2.0), x());
        assert_eq!(
            e,
            Expr::mul_expr(Expr::constant(2.0_f64.ln()), x()).exp()
        );
        assert_eq!(Expr::pow_expr(Expr::e(), x()), x().exp());
    }

    #[test]
    fn test_log() {
        let three = Expr::log(Expr::constant(8.0), Expr::constant(2.0));
        assert!((three.to_constant().unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(Expr::log(x(), Expr::e()), x().ln());
        assert_eq!(Expr::log(x(), x()), Expr::one());
        assert_eq!(
            Expr::log(x(), Expr::constant(10.0)).to_string(),
            "log(x,10)"
        );
    }
}
