//! Numeric vectors and matrices.
//!
//! These are the values of evaluated expressions. The solver uses the same
//! block elimination as the symbolic [`Expr::solve`](crate::Expr::solve).

mod matrix;
mod quantity;
mod vector;

pub use matrix::JaggedMatrix;
pub use quantity::Quantity;
pub use vector::Vector;
