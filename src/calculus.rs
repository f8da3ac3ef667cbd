//! Differentiation
//!
//! Derivatives are assembled with the canonicalizing constructors, so the
//! results come back normalized.

use crate::error::ExprError;
use crate::functions::{BinaryOp, Registry};
use crate::linalg::{JaggedMatrix, Vector};
use crate::{Expr, ExprKind};

/// `a*b` without building nodes for the trivial factors 0 and 1
fn times(a: Expr, b: Expr) -> Expr {
    if a.is_constant_value(0.0) || b.is_constant_value(0.0) {
        return Expr::zero();
    }
    if a.is_constant_value(1.0) {
        return b;
    }
    if b.is_constant_value(1.0) {
        return a;
    }
    Expr::mul_expr(a, b)
}

impl Expr {
    /// Partial derivative with respect to `symbol`.
    ///
    /// A named constant whose name is `symbol` is differentiated like a
    /// variable. Arrays are differentiated element by element and an
    /// assignment `a = b` becomes `a' = b'`.
    ///
    /// ```
    /// use expr_algebra::parse;
    ///
    /// let f = parse("x^3 + 2*x*y").unwrap();
    /// let dfdx = f.partial_derivative("x");
    /// let value = dfdx.eval(&[("x", 2.0), ("y", 5.0)]).unwrap();
    /// assert_eq!(value.as_scalar().unwrap(), 22.0);
    /// ```
    pub fn partial_derivative(&self, symbol: &str) -> Expr {
        match &self.kind {
            ExprKind::Constant(_) => Expr::zero(),
            ExprKind::NamedConstant { name, .. } | ExprKind::Variable(name) => {
                if name.as_ref() == symbol {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            ExprKind::Unary { op, arg } => {
                let inner = arg.partial_derivative(symbol);
                if inner.is_constant_value(0.0) {
                    return Expr::zero();
                }
                times((Registry::of(*op).derivative)(arg), inner)
            }
            ExprKind::Binary { op, left, right } => {
                binary_derivative(*op, self, left, right, symbol)
            }
            ExprKind::Assign { target, value } => Expr::assign(
                target.partial_derivative(symbol),
                value.partial_derivative(symbol),
            ),
            ExprKind::Array(items) => Expr::array_node(
                items
                    .iter()
                    .map(|item| item.partial_derivative(symbol))
                    .collect(),
            ),
        }
    }

    /// Partial derivatives for each of `symbols`, one element per symbol.
    ///
    /// For a vector expression every element of the result is the column of
    /// derivatives of all components, so the conventional Jacobian matrix
    /// is the [`transpose`](Expr::transpose) of this array.
    pub fn jacobian(&self, symbols: &[&str]) -> Result<Expr, ExprError> {
        Expr::array(
            symbols
                .iter()
                .map(|symbol| self.partial_derivative(symbol))
                .collect(),
        )
    }

    /// Second derivatives of a scalar expression
    pub fn hessian(&self, symbols: &[&str]) -> Result<Expr, ExprError> {
        if self.rank() != 0 {
            return Err(ExprError::UnsupportedRank {
                rank: self.rank() + 2,
            });
        }
        self.jacobian(symbols)?.jacobian(symbols)
    }

    /// Chain rule over `(symbol, rate)` pairs: `Σ ∂f/∂symbol · rate`.
    ///
    /// Rates that are plain symbols are appended to `params`, since they
    /// become additional arguments of the derivative.
    pub fn total_derivative(&self, pairs: &[(&str, Expr)], params: &mut Vec<String>) -> Expr {
        let mut terms = Vec::with_capacity(pairs.len());
        for (symbol, rate) in pairs {
            if let Some(name) = rate.as_symbol()
                && !params.iter().any(|p| p == name)
            {
                params.push(name.to_owned());
            }
            terms.push(times(self.partial_derivative(symbol), rate.clone()));
        }
        Expr::sum(terms)
    }

    /// Name of the time rate of `name`: `x` becomes `ẋ`
    pub fn rate_symbol(name: &str) -> String {
        format!("{name}\u{307}")
    }

    /// Coefficients of a system that is linear in `symbols`.
    ///
    /// Returns `(A, b)` with `A·x = b`. Assignments count as `lhs - rhs = 0`.
    /// `None` when a coefficient still depends on a symbol or the system
    /// is not a vector of equations.
    pub fn extract_linear_system(&self, symbols: &[&str]) -> Option<(JaggedMatrix, Vector)> {
        let residual = self.as_residual();
        let a = residual.jacobian(symbols).ok()?.transpose().ok()?.to_matrix().ok()?;
        let zeros: Vec<(&str, f64)> = symbols.iter().map(|&s| (s, 0.0)).collect();
        let b = Expr::negate(residual.substitute_values(&zeros))
            .to_vector()
            .ok()?;
        Some((a, b))
    }

    /// `lhs - rhs` for assignments, element-wise through arrays
    fn as_residual(&self) -> Expr {
        match &self.kind {
            ExprKind::Assign { target, value } => {
                Expr::sub_expr(target.as_ref().clone(), value.as_ref().clone())
            }
            ExprKind::Array(items) => {
                Expr::array_node(items.iter().map(Expr::as_residual).collect())
            }
            _ => self.clone(),
        }
    }
}

fn binary_derivative(op: BinaryOp, whole: &Expr, left: &Expr, right: &Expr, symbol: &str) -> Expr {
    let dl = left.partial_derivative(symbol);
    let dr = right.partial_derivative(symbol);
    match op {
        BinaryOp::Add => Expr::add_expr(dl, dr),
        BinaryOp::Sub => Expr::sub_expr(dl, dr),
        BinaryOp::Mul => Expr::add_expr(times(dl, right.clone()), times(left.clone(), dr)),
        BinaryOp::Div => {
            // (l'r - lr')/r^2
            let numerator = Expr::sub_expr(times(dl, right.clone()), times(left.clone(), dr));
            if numerator.is_constant_value(0.0) {
                return Expr::zero();
            }
            Expr::div_expr(
                numerator,
                Expr::pow_expr(right.clone(), Expr::constant(2.0)),
            )
        }
        BinaryOp::Pow => {
            // the shortcuts only hold while the folded side is independent of `symbol`
            if let Some(n) = right.as_number(true)
                && right.rank() == 0
                && dr.is_constant_value(0.0)
            {
                let outer = times(
                    Expr::constant(n),
                    Expr::pow_expr(left.clone(), Expr::constant(n - 1.0)),
                );
                return times(outer, dl);
            }
            if let Some(a) = left.as_number(true)
                && dl.is_constant_value(0.0)
            {
                return times(times(Expr::constant(a.ln()), whole.clone()), dr);
            }
            // x^y (y' ln x + y x'/x)
            let log_term = times(dr, left.clone().ln());
            let power_term = Expr::div_expr(times(right.clone(), dl), left.clone());
            times(whole.clone(), Expr::add_expr(log_term, power_term))
        }
        BinaryOp::Log => {
            Expr::div_expr(left.clone().ln(), right.clone().ln()).partial_derivative(symbol)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Expr, parse};
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::variable("x")
    }

    fn at(expr: &Expr, x: f64) -> f64 {
        expr.eval(&[("x", x)]).unwrap().as_scalar().unwrap()
    }

    /// Central difference of `expr` in `x`
    fn numeric(expr: &Expr, x: f64) -> f64 {
        let h = 1e-6;
        (at(expr, x + h) - at(expr, x - h)) / (2.0 * h)
    }

    #[test]
    fn test_leaves() {
        assert_eq!(x().partial_derivative("x"), Expr::one());
        assert_eq!(x().partial_derivative("y"), Expr::zero());
        assert_eq!(Expr::constant(3.0).partial_derivative("x"), Expr::zero());
        assert_eq!(Expr::pi().partial_derivative("x"), Expr::zero());
        assert_eq!(
            Expr::named_constant("a", 2.0).partial_derivative("a"),
            Expr::one()
        );
    }

    #[test]
    fn test_named_constant_in_power_acts_as_variable() {
        let a = Expr::named_constant("a", 2.0);
        let bindings = [("x", 3.0)];

        let exponent = Expr::pow_expr(x(), a.clone()).partial_derivative("a");
        assert_relative_eq!(
            exponent.eval(&bindings).unwrap().as_scalar().unwrap(),
            9.0 * 3.0_f64.ln(),
            epsilon = 1e-12
        );

        let base = Expr::pow_expr(a.clone(), x()).partial_derivative("a");
        assert_relative_eq!(
            base.eval(&bindings).unwrap().as_scalar().unwrap(),
            12.0,
            epsilon = 1e-12
        );

        // other symbols still see `a` as the number 2
        let dx = Expr::pow_expr(x(), a).partial_derivative("x");
        assert_eq!(dx, Expr::mul_expr(Expr::constant(2.0), x()));
    }

    #[test]
    fn test_simple_rules() {
        assert_eq!(x().ln().partial_derivative("x"), Expr::inv(x()));
        assert_eq!(
            Expr::pow_expr(x(), Expr::constant(3.0)).partial_derivative("x"),
            Expr::mul_expr(
                Expr::constant(3.0),
                Expr::pow_expr(x(), Expr::constant(2.0))
            )
        );
        assert_eq!(x().sin().partial_derivative("y"), Expr::zero());
    }

    #[test]
    fn test_unary_table_against_finite_differences() {
        let point = 0.37;
        for op in crate::UnaryOp::ALL {
            if op == crate::UnaryOp::Sign {
                continue;
            }
            // acosh needs an argument above 1
            let arg = if op == crate::UnaryOp::Acosh {
                Expr::add_expr(x(), Expr::constant(2.0))
            } else {
                Expr::mul_expr(Expr::constant(2.0), x())
            };
            let f = Expr::unary(op, arg);
            let df = f.partial_derivative("x");
            assert_relative_eq!(
                at(&df, point),
                numeric(&f, point),
                epsilon = 1e-6,
                max_relative = 1e-6
            );
        }
    }

    #[test]
    fn test_binary_rules_against_finite_differences() {
        let cases = [
            "x*sin(x)",
            "sin(x)/(1 + x^2)",
            "x^x",
            "2^x",
            "pi^x",
            "(1 + x)^3.5",
            "log(x, 3)",
            "log(5, x + 1)",
            "exp(-x)*cos(3*x) - x/7",
        ];
        for text in cases {
            let f = parse(text).unwrap();
            let df = f.partial_derivative("x");
            for point in [0.4, 1.3, 2.1] {
                assert_relative_eq!(
                    at(&df, point),
                    numeric(&f, point),
                    epsilon = 1e-6,
                    max_relative = 1e-6
                );
            }
        }
    }

    #[test]
    fn test_arrays_and_assignments() {
        let v = parse("[x^2, 3*x, 1]").unwrap();
        let dv = v.partial_derivative("x");
        let values = dv.eval(&[("x", 2.0)]).unwrap();
        assert_eq!(values.as_vector().unwrap().as_slice(), &[4.0, 3.0, 0.0]);

        let eq = Expr::assign(Expr::variable("y"), Expr::pow_expr(x(), Expr::constant(2.0)));
        let deq = eq.partial_derivative("x");
        let (target, value) = deq.as_assign().unwrap();
        assert_eq!(*target, Expr::zero());
        assert_eq!(*value, Expr::mul_expr(Expr::constant(2.0), x()));
    }

    #[test]
    fn test_jacobian_and_hessian() {
        let f = parse("x^2*y + y^3").unwrap();
        let j = f.jacobian(&["x", "y"]).unwrap();
        let g = j.eval(&[("x", 1.0), ("y", 2.0)]).unwrap();
        assert_eq!(g.as_vector().unwrap().as_slice(), &[4.0, 13.0]);

        let h = f.hessian(&["x", "y"]).unwrap();
        let h = h.eval(&[("x", 1.0), ("y", 2.0)]).unwrap();
        let h = h.as_matrix().unwrap();
        assert_eq!(h[(0, 0)], 4.0);
        assert_eq!(h[(0, 1)], 2.0);
        assert_eq!(h[(1, 0)], 2.0);
        assert_eq!(h[(1, 1)], 12.0);
    }

    #[test]
    fn test_total_derivative() {
        let f = parse("x^2 + sin(y)").unwrap();
        let x_dot = Expr::rate_symbol("x");
        assert_eq!(x_dot, "x\u{307}");

        let mut params = vec!["x".to_owned(), "y".to_owned()];
        let rate = Expr::variable(&x_dot);
        let df = f.total_derivative(
            &[("x", rate), ("y", Expr::constant(2.0))],
            &mut params,
        );
        assert_eq!(params, vec!["x", "y", "x\u{307}"]);
        let value = df
            .eval(&[("x", 3.0), ("y", 0.0), (x_dot.as_str(), 0.5)])
            .unwrap()
            .as_scalar()
            .unwrap();
        assert_relative_eq!(value, 2.0 * 3.0 * 0.5 + 2.0);
    }

    #[test]
    fn test_extract_linear_system() {
        let mut ctx = crate::Context::new();
        let system = ctx
            .parse("[2*x - y + 3*z = 15, x + 3*z/2 = 3, x + 3*y = 1]")
            .unwrap();
        let (a, b) = system.extract_linear_system(&["x", "y", "z"]).unwrap();
        assert_eq!(a.row(0).as_slice(), &[2.0, -1.0, 3.0]);
        assert_eq!(a.row(1).as_slice(), &[1.0, 0.0, 1.5]);
        assert_eq!(a.row(2).as_slice(), &[1.0, 3.0, 0.0]);
        assert_eq!(b.as_slice(), &[15.0, 3.0, 1.0]);

        let x = a.solve(&b).unwrap();
        let residual = &b - &a.product_vector(&x).unwrap();
        assert!(residual.norm() < 1e-12);

        let nonlinear = parse("[x*y, x + y]").unwrap();
        assert!(nonlinear.extract_linear_system(&["x", "y"]).is_none());
    }
}
