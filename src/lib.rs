//! Symbolic Expression Algebra
//!
//! Immutable expression trees over scalars, vectors and matrices, built by
//! canonicalizing constructors so that equal mathematics tends to produce
//! structurally equal trees.
//!
//! # Features
//! - Text parser with named constants and a per-parse [`Context`]
//! - Partial, total and Jacobian derivatives
//! - Element-wise lifting of every operator over arrays
//! - Symbolic linear solve by block elimination
//! - Bytecode compilation with common-subexpression caching
//! - Newton–Raphson root finding on compiled functions
//!
//! # Usage
//!
//! ```
//! use expr_algebra::{parse, CompiledFunction, Expr};
//!
//! let expr = parse("x^2 + sin(y)").unwrap();
//! let dx = expr.partial_derivative("x");
//! assert_eq!(dx, parse("2*x").unwrap());
//!
//! let f = CompiledFunction::compile(&expr, &["x", "y"]).unwrap();
//! assert_eq!(f.call_scalar(&[3.0, 0.0]).unwrap(), 9.0);
//!
//! let v = Expr::array(vec![Expr::variable("a"), Expr::constant(2.0)]).unwrap();
//! assert_eq!(v.rank(), 1);
//! ```

mod algebra;
mod arrays;
mod ast;
mod calculus;
mod context;
pub mod display;
mod error;
mod eval;
mod evaluator;
mod function;
pub mod functions;
mod linalg;
mod mechanics;
mod newton;
mod parser;
pub mod traits;
pub mod visitor;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

pub use ast::{Expr, ExprKind};
pub use context::Context;
pub use error::{ExprError, Span};
pub use evaluator::{
    CompiledFunction, FArg0, FArg1, FArg2, FArg3, FArg4, MAX_STACK_DEPTH, QArg0, QArg1, QArg2,
};
pub use function::Function;
pub use functions::{BinaryOp, UnaryOp};
pub use linalg::{JaggedMatrix, Quantity, Vector};
pub use mechanics::{Mat3, Vec3, Vec6};
pub use newton::{NewtonRaphson, NewtonReport};
pub use parser::{MAX_NESTING_DEPTH, parse, try_parse};
pub use traits::MathScalar;
pub use visitor::{ExprVisitor, walk_expr};
