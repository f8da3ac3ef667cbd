//! `std::ops` overloads.
//!
//! Operators follow [`Expr::binary`] semantics. They cannot fail, so an
//! operand-shape error leaves the unreduced node in place; evaluating or
//! compiling it reports the mismatch.

use crate::Expr;
use crate::functions::BinaryOp;
use std::ops::{Add, Div, Mul, Neg, Sub};

fn combine(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    match Expr::binary(op, left.clone(), right.clone()) {
        Ok(expr) => expr,
        Err(_) => Expr::binary_node(op, left, right),
    }
}

macro_rules! impl_binary_ops {
    ($lhs:ty, $rhs:ty, $to_lhs:expr, $to_rhs:expr) => {
        impl Add<$rhs> for $lhs {
            type Output = Expr;
            fn add(self, rhs: $rhs) -> Expr {
                combine(BinaryOp::Add, $to_lhs(self), $to_rhs(rhs))
            }
        }
        impl Sub<$rhs> for $lhs {
            type Output = Expr;
            fn sub(self, rhs: $rhs) -> Expr {
                combine(BinaryOp::Sub, $to_lhs(self), $to_rhs(rhs))
            }
        }
        impl Mul<$rhs> for $lhs {
            type Output = Expr;
            fn mul(self, rhs: $rhs) -> Expr {
                combine(BinaryOp::Mul, $to_lhs(self), $to_rhs(rhs))
            }
        }
        impl Div<$rhs> for $lhs {
            type Output = Expr;
            fn div(self, rhs: $rhs) -> Expr {
                combine(BinaryOp::Div, $to_lhs(self), $to_rhs(rhs))
            }
        }
    };
}

impl_binary_ops!(Expr, Expr, |l: Expr| l, |r: Expr| r);
impl_binary_ops!(Expr, &Expr, |l: Expr| l, |r: &Expr| r.clone());
impl_binary_ops!(&Expr, Expr, |l: &Expr| l.clone(), |r: Expr| r);
impl_binary_ops!(&Expr, &Expr, |l: &Expr| l.clone(), |r: &Expr| r.clone());
impl_binary_ops!(Expr, f64, |l: Expr| l, Expr::constant);
impl_binary_ops!(&Expr, f64, |l: &Expr| l.clone(), Expr::constant);
impl_binary_ops!(f64, Expr, Expr::constant, |r: Expr| r);
impl_binary_ops!(f64, &Expr, Expr::constant, |r: &Expr| r.clone());

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::negate(self)
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::negate(self.clone())
    }
}

impl Expr {
    /// Raise to a power (Rust's `^` is XOR)
    pub fn pow(self, exponent: impl Into<Expr>) -> Expr {
        combine(BinaryOp::Pow, self, exponent.into())
    }
}
