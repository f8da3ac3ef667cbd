//! Derivative table for the unary operators.
//!
//! Each entry returns `f'(u)`; the chain-rule factor `u'` is applied by
//! [`Expr::partial_derivative`](crate::Expr::partial_derivative). Results are
//! built with the canonicalizing constructors.

use super::UnaryOp;
use super::registry::FunctionDefinition;
use crate::Expr;

fn square(u: &Expr) -> Expr {
    Expr::pow_expr(u.clone(), Expr::constant(2.0))
}

/// `1 - u^2`
fn one_minus_square(u: &Expr) -> Expr {
    Expr::sub_expr(Expr::one(), square(u))
}

pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        FunctionDefinition {
            name: "neg",
            op: UnaryOp::Negate,
            derivative: |_| Expr::constant(-1.0),
        },
        FunctionDefinition {
            name: "inv",
            op: UnaryOp::Inverse,
            // -1/u^2
            derivative: |u| Expr::negate(Expr::inv(square(u))),
        },
        FunctionDefinition {
            name: "abs",
            op: UnaryOp::Abs,
            derivative: |u| u.clone().sign(),
        },
        FunctionDefinition {
            name: "sign",
            op: UnaryOp::Sign,
            derivative: |_| Expr::zero(),
        },
        FunctionDefinition {
            name: "ln",
            op: UnaryOp::Ln,
            derivative: |u| Expr::inv(u.clone()),
        },
        FunctionDefinition {
            name: "exp",
            op: UnaryOp::Exp,
            derivative: |u| u.clone().exp(),
        },
        FunctionDefinition {
            name: "sqrt",
            op: UnaryOp::Sqrt,
            derivative: |u| Expr::div_expr(Expr::constant(0.5), u.clone().sqrt()),
        },
        FunctionDefinition {
            name: "sqr",
            op: UnaryOp::Square,
            derivative: |u| Expr::mul_expr(Expr::constant(2.0), u.clone()),
        },
        FunctionDefinition {
            name: "cub",
            op: UnaryOp::Cube,
            derivative: |u| Expr::mul_expr(Expr::constant(3.0), square(u)),
        },
        FunctionDefinition {
            name: "cbrt",
            op: UnaryOp::Cbrt,
            // 1/(3 cbrt(u)^2)
            derivative: |u| Expr::inv(Expr::mul_expr(Expr::constant(3.0), square(&u.clone().cbrt()))),
        },
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            op: UnaryOp::Sin,
            derivative: |u| u.clone().cos(),
        },
        FunctionDefinition {
            name: "cos",
            op: UnaryOp::Cos,
            derivative: |u| Expr::negate(u.clone().sin()),
        },
        FunctionDefinition {
            name: "tan",
            op: UnaryOp::Tan,
            // sec^2(u)
            derivative: |u| Expr::inv(square(&u.clone().cos())),
        },
        FunctionDefinition {
            name: "sind",
            op: UnaryOp::Sind,
            derivative: |u| Expr::mul_expr(Expr::deg(), Expr::unary(UnaryOp::Cosd, u.clone())),
        },
        FunctionDefinition {
            name: "cosd",
            op: UnaryOp::Cosd,
            derivative: |u| {
                Expr::negate(Expr::mul_expr(
                    Expr::deg(),
                    Expr::unary(UnaryOp::Sind, u.clone()),
                ))
            },
        },
        FunctionDefinition {
            name: "tand",
            op: UnaryOp::Tand,
            derivative: |u| {
                Expr::div_expr(Expr::deg(), square(&Expr::unary(UnaryOp::Cosd, u.clone())))
            },
        },
        // Inverse trigonometric
        FunctionDefinition {
            name: "asin",
            op: UnaryOp::Asin,
            derivative: |u| Expr::inv(one_minus_square(u).sqrt()),
        },
        FunctionDefinition {
            name: "acos",
            op: UnaryOp::Acos,
            derivative: |u| Expr::negate(Expr::inv(one_minus_square(u).sqrt())),
        },
        FunctionDefinition {
            name: "atan",
            op: UnaryOp::Atan,
            derivative: |u| Expr::inv(Expr::add_expr(Expr::one(), square(u))),
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            op: UnaryOp::Sinh,
            derivative: |u| u.clone().cosh(),
        },
        FunctionDefinition {
            name: "cosh",
            op: UnaryOp::Cosh,
            derivative: |u| u.clone().sinh(),
        },
        FunctionDefinition {
            name: "tanh",
            op: UnaryOp::Tanh,
            // sech^2(u)
            derivative: |u| Expr::inv(square(&u.clone().cosh())),
        },
        FunctionDefinition {
            name: "asinh",
            op: UnaryOp::Asinh,
            derivative: |u| Expr::inv(Expr::add_expr(square(u), Expr::one()).sqrt()),
        },
        FunctionDefinition {
            name: "acosh",
            op: UnaryOp::Acosh,
            derivative: |u| Expr::inv(Expr::sub_expr(square(u), Expr::one()).sqrt()),
        },
        FunctionDefinition {
            name: "atanh",
            op: UnaryOp::Atanh,
            derivative: |u| Expr::inv(one_minus_square(u)),
        },
    ]
}
