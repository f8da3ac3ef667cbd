//! Unary operators and function shortcuts

use crate::functions::{BinaryOp, UnaryOp};
use crate::{Expr, ExprKind};

impl Expr {
    /// `op(arg)`, normalized.
    ///
    /// Constants fold, arrays and assignments are mapped through, directly
    /// nested inverse pairs cancel, and degree trigonometry is rewritten in
    /// radians.
    pub fn unary(op: UnaryOp, arg: Expr) -> Expr {
        if let Some(v) = arg.as_constant() {
            return Expr::constant(op.apply(v));
        }
        match &arg.kind {
            ExprKind::Assign { target, value } => {
                return Expr::assign(
                    Expr::unary(op, target.as_ref().clone()),
                    Expr::unary(op, value.as_ref().clone()),
                );
            }
            ExprKind::Array(items) => {
                return Expr::array_node(
                    items.iter().map(|item| Expr::unary(op, item.clone())).collect(),
                );
            }
            ExprKind::Unary {
                op: inner,
                arg: inner_arg,
            } => {
                if op.inverse_pair() == Some(*inner) {
                    return inner_arg.as_ref().clone();
                }
                if op == UnaryOp::Sqrt && *inner == UnaryOp::Square {
                    return inner_arg.as_ref().clone().abs();
                }
            }
            _ => {}
        }

        match op {
            UnaryOp::Negate => Expr::negate(arg),
            UnaryOp::Inverse => Expr::div_expr(Expr::one(), arg),
            UnaryOp::Sind => Expr::mul_expr(Expr::deg(), arg).sin(),
            UnaryOp::Cosd => Expr::mul_expr(Expr::deg(), arg).cos(),
            UnaryOp::Tand => Expr::mul_expr(Expr::deg(), arg).tan(),
            UnaryOp::Abs => {
                if let Some(inner) = arg.as_unary(UnaryOp::Negate) {
                    return Expr::unary(UnaryOp::Abs, inner.clone());
                }
                if arg.as_unary(UnaryOp::Abs).is_some() {
                    return arg;
                }
                Expr::unary_node(UnaryOp::Abs, arg)
            }
            UnaryOp::Ln if arg == Expr::e() => Expr::one(),
            _ => Expr::unary_node(op, arg),
        }
    }

    /// Unary operator by formula name, `None` for unknown names
    pub fn unary_by_name(name: &str, arg: Expr) -> Option<Expr> {
        UnaryOp::from_name(name).map(|op| Expr::unary(op, arg))
    }

    /// `-arg`, normalized
    pub fn negate(arg: Expr) -> Expr {
        if let Some(v) = arg.as_constant() {
            return Expr::constant(-v);
        }
        match &arg.kind {
            ExprKind::Unary {
                op: UnaryOp::Negate,
                arg: inner,
            } => inner.as_ref().clone(),
            ExprKind::Array(items) => {
                Expr::array_node(items.iter().map(|item| Expr::negate(item.clone())).collect())
            }
            ExprKind::Assign { target, value } => Expr::assign(
                Expr::negate(target.as_ref().clone()),
                Expr::negate(value.as_ref().clone()),
            ),
            ExprKind::Binary {
                op: BinaryOp::Mul,
                left,
                right,
            } if left.as_constant().is_some() => {
                Expr::mul_expr(Expr::negate(left.as_ref().clone()), right.as_ref().clone())
            }
            // -(a - b) = b - a
            ExprKind::Binary {
                op: BinaryOp::Sub,
                left,
                right,
            } => Expr::sub_expr(right.as_ref().clone(), left.as_ref().clone()),
            _ => Expr::unary_node(UnaryOp::Negate, arg),
        }
    }

    /// `1/arg` as an inverse node; constants fold and `inv(inv(x))` cancels
    pub fn inv(arg: Expr) -> Expr {
        if let Some(v) = arg.as_constant() {
            return Expr::constant(1.0 / v);
        }
        match &arg.kind {
            ExprKind::Unary {
                op: UnaryOp::Inverse,
                arg: inner,
            } => inner.as_ref().clone(),
            ExprKind::Array(items) => {
                Expr::array_node(items.iter().map(|item| Expr::inv(item.clone())).collect())
            }
            _ => Expr::unary_node(UnaryOp::Inverse, arg),
        }
    }
}

macro_rules! unary_shortcuts {
    ($($name:ident => $op:ident),* $(,)?) => {
        impl Expr {
            $(
                #[doc = concat!("`", stringify!($name), "(self)`")]
                pub fn $name(self) -> Expr {
                    Expr::unary(UnaryOp::$op, self)
                }
            )*
        }
    };
}

unary_shortcuts! {
    abs => Abs,
    sign => Sign,
    ln => Ln,
    exp => Exp,
    sqrt => Sqrt,
    sqr => Square,
    cub => Cube,
    cbrt => Cbrt,
    sin => Sin,
    cos => Cos,
    tan => Tan,
    asin => Asin,
    acos => Acos,
    atan => Atan,
    sinh => Sinh,
    cosh => Cosh,
    tanh => Tanh,
    asinh => Asinh,
    acosh => Acosh,
    atanh => Atanh,
}

#[cfg(test)]
mod tests {
    use crate::Expr;
    use crate::functions::UnaryOp;

    fn x() -> Expr {
        Expr::variable("x")
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(Expr::constant(0.0).cos(), Expr::one());
        assert_eq!(Expr::constant(4.0).sqrt(), Expr::constant(2.0));
        assert_eq!(Expr::negate(Expr::constant(3.0)), Expr::constant(-3.0));
    }

    #[test]
    fn test_inverse_pairs_cancel() {
        assert_eq!(x().exp().ln(), x());
        assert_eq!(x().ln().exp(), x());
        assert_eq!(x().asin().sin(), x());
        assert_eq!(x().tanh().atanh(), x());
        assert_eq!(x().cub().cbrt(), x());
        assert_eq!(Expr::negate(Expr::negate(x())), x());
        assert_eq!(Expr::inv(Expr::inv(x())), x());
        assert_eq!(x().sqr().sqrt(), x().abs());
    }

    #[test]
    fn test_degree_trig_is_rewritten() {
        let e = Expr::unary(UnaryOp::Sind, x());
        assert_eq!(e, Expr::mul_expr(Expr::deg(), x()).sin());
        assert_eq!(Expr::unary(UnaryOp::Inverse, x()), Expr::inv(x()));
    }

    #[test]
    fn test_unary_maps_over_arrays() {
        let v = Expr::array(vec![x(), Expr::zero()]).unwrap();
        assert_eq!(
            v.exp(),
            Expr::array(vec![x().exp(), Expr::one()]).unwrap()
        );
    }

    #[test]
    fn test_negate_rules() {
        let two_x = Expr::mul_expr(Expr::constant(2.0), x());
        assert_eq!(
            Expr::negate(two_x),
            Expr::mul_expr(Expr::constant(-2.0), x())
        );
        let y = Expr::variable("y");
        assert_eq!(
            Expr::negate(Expr::sub_expr(x(), y.clone())),
            Expr::sub_expr(y, x())
        );
        assert_eq!(Expr::negate(x()).abs(), x().abs());
        assert_eq!(Expr::e().ln(), Expr::one());
    }
}
