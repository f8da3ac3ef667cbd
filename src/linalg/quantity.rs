use std::fmt;

use super::{JaggedMatrix, Vector};
use crate::Expr;
use crate::error::ExprError;

/// Value of an evaluated expression or of a compiled function call
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    Scalar(f64),
    Vector(Vector),
    Matrix(JaggedMatrix),
}

impl Quantity {
    pub fn rank(&self) -> usize {
        match self {
            Quantity::Scalar(_) => 0,
            Quantity::Vector(_) => 1,
            Quantity::Matrix(_) => 2,
        }
    }

    pub fn as_scalar(&self) -> Result<f64, ExprError> {
        match self {
            Quantity::Scalar(value) => Ok(*value),
            other => Err(ExprError::NotAConstant(other.to_string())),
        }
    }

    pub fn as_vector(&self) -> Result<&Vector, ExprError> {
        match self {
            Quantity::Vector(vector) => Ok(vector),
            other => Err(ExprError::NotAVector(other.to_string())),
        }
    }

    pub fn as_matrix(&self) -> Result<&JaggedMatrix, ExprError> {
        match self {
            Quantity::Matrix(matrix) => Ok(matrix),
            other => Err(ExprError::NotAMatrix(other.to_string())),
        }
    }

    /// Constant expression with this value
    pub fn to_expr(&self) -> Expr {
        match self {
            Quantity::Scalar(value) => Expr::constant(*value),
            Quantity::Vector(vector) => Expr::from_vector(vector),
            Quantity::Matrix(matrix) => Expr::from_matrix(matrix),
        }
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Scalar(value)
    }
}

impl From<Vector> for Quantity {
    fn from(vector: Vector) -> Self {
        Quantity::Vector(vector)
    }
}

impl From<JaggedMatrix> for Quantity {
    fn from(matrix: JaggedMatrix) -> Self {
        Quantity::Matrix(matrix)
    }
}

impl From<&Quantity> for Expr {
    fn from(quantity: &Quantity) -> Self {
        quantity.to_expr()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Scalar(value) => f.write_str(&crate::display::format_g(*value)),
            Quantity::Vector(vector) => write!(f, "{vector}"),
            Quantity::Matrix(matrix) => write!(f, "{matrix}"),
        }
    }
}
