//! Generic binary construction and assignment

use super::{lift, vectorizable};
use crate::Expr;
use crate::error::ExprError;
use crate::functions::BinaryOp;

/// Same array nesting and lengths at every level
fn same_shape(a: &Expr, b: &Expr) -> bool {
    match (a.as_array(), b.as_array()) {
        (Some(x), Some(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| same_shape(p, q))
        }
        (None, None) => true,
        _ => false,
    }
}

impl Expr {
    /// Apply a binary operator with operand-shape semantics.
    ///
    /// - An assignment operand distributes: `(a=b) + c` is `(a+c) = (b+c)`.
    /// - A scalar meets a matrix in `+ - *` as the diagonal matrix `s·I`.
    ///   `M / s` scales every element and `s / M` is `s·M⁻¹`.
    /// - Between two arrays `*` is the matrix/vector [`product`](Expr::product)
    ///   and `A / b` with a matrix `A` solves `A·x = b` (`b` a vector or a
    ///   matrix of right-hand sides); other operators work element-wise and
    ///   need equal shapes.
    /// - Everything else goes to the scalar constructors, broadcasting a
    ///   scalar over an array.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Result<Expr, ExprError> {
        let assign_left = left.as_assign().map(|(t, v)| (t.clone(), v.clone()));
        let assign_right = right.as_assign().map(|(t, v)| (t.clone(), v.clone()));
        match (assign_left, assign_right) {
            (Some((lt, lv)), Some((rt, rv))) => {
                return Ok(Expr::assign(
                    Expr::binary(op, lt, rt)?,
                    Expr::binary(op, lv, rv)?,
                ));
            }
            (Some((lt, lv)), None) => {
                return Ok(Expr::assign(
                    Expr::binary(op, lt, right.clone())?,
                    Expr::binary(op, lv, right)?,
                ));
            }
            (None, Some((rt, rv))) => {
                return Ok(Expr::assign(
                    Expr::binary(op, left.clone(), rt)?,
                    Expr::binary(op, left, rv)?,
                ));
            }
            (None, None) => {}
        }

        if matches!(
            op,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
        ) {
            // M*s multiplies from the right, so the diagonal follows the columns
            let left_size = left.matrix_rows().map(|rows| {
                if op == BinaryOp::Mul {
                    rows.first().map_or(0, |row| row.len())
                } else {
                    rows.len()
                }
            });
            if let Some(size) = left_size
                && right.rank() == 0
            {
                if op == BinaryOp::Div {
                    return Ok(Expr::div_expr(left, right));
                }
                let diagonal = Expr::diagonal(size, right)?;
                return Expr::binary(op, left, diagonal);
            }
            let right_size = right.matrix_rows().map(|rows| rows.len());
            if let Some(size) = right_size
                && left.rank() == 0
            {
                let diagonal = Expr::diagonal(size, left)?;
                if op == BinaryOp::Div {
                    // s / M is s·M⁻¹
                    return Expr::solve(&right, &diagonal);
                }
                return Expr::binary(op, diagonal, right);
            }
        }

        if left.is_array() && right.is_array() {
            return match op {
                BinaryOp::Mul => Expr::product(&left, &right),
                BinaryOp::Div if left.is_matrix() => Expr::solve(&left, &right),
                _ if same_shape(&left, &right) => Ok(Expr::apply_binary(op, left, right)),
                _ => Err(ExprError::dimension(format!(
                    "cannot apply '{}' to arrays of rank {} and {} with different shapes",
                    op.symbol(),
                    left.rank(),
                    right.rank()
                ))),
            };
        }

        Ok(Expr::apply_binary(op, left, right))
    }

    /// The canonicalizing constructor for `op`
    pub(crate) fn apply_binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        match op {
            BinaryOp::Add => Expr::add_expr(left, right),
            BinaryOp::Sub => Expr::sub_expr(left, right),
            BinaryOp::Mul => Expr::mul_expr(left, right),
            BinaryOp::Div => Expr::div_expr(left, right),
            BinaryOp::Pow => Expr::pow_expr(left, right),
            BinaryOp::Log => Expr::log(left, right),
        }
    }

    /// `target = value`; arrays of equal length assign element-wise.
    ///
    /// Recognizing `symbol = constant` as a named constant needs a
    /// [`Context`](crate::Context), see [`Context::assign`](crate::Context::assign).
    pub fn assign(target: Expr, value: Expr) -> Expr {
        if let Some(pairs) = vectorizable(&target, &value, false) {
            return lift(pairs, Expr::assign);
        }
        Expr::assign_node(target, value)
    }
}
