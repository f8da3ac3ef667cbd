//! Expression visitor pattern for AST traversal
//!
//! Provides a clean interface for walking the expression tree without
//! manually handling the recursive structure.

use crate::functions::{BinaryOp, UnaryOp};
use crate::{Expr, ExprKind};

/// Trait for visiting expression nodes in the AST
///
/// Every method has a default that continues the walk, so implementors only
/// override the node kinds they care about. Returning `false` skips the
/// children of the current node.
///
/// # Example
/// ```
/// use expr_algebra::{Expr, ExprVisitor, walk_expr};
///
/// struct ConstantCounter { count: usize }
///
/// impl ExprVisitor for ConstantCounter {
///     fn visit_constant(&mut self, _value: f64) -> bool { self.count += 1; true }
/// }
///
/// let expr = expr_algebra::parse("2*x + 3*y").unwrap();
/// let mut counter = ConstantCounter { count: 0 };
/// walk_expr(&expr, &mut counter);
/// assert_eq!(counter.count, 2);
/// ```
pub trait ExprVisitor {
    /// Called for every node before the kind-specific method
    fn visit_node(&mut self, _expr: &Expr) -> bool {
        true
    }

    fn visit_constant(&mut self, _value: f64) -> bool {
        true
    }

    fn visit_named_constant(&mut self, _name: &str, _value: f64) -> bool {
        true
    }

    fn visit_variable(&mut self, _name: &str) -> bool {
        true
    }

    fn visit_unary(&mut self, _op: UnaryOp, _arg: &Expr) -> bool {
        true
    }

    fn visit_binary(&mut self, _op: BinaryOp, _left: &Expr, _right: &Expr) -> bool {
        true
    }

    fn visit_assign(&mut self, _target: &Expr, _value: &Expr) -> bool {
        true
    }

    fn visit_array(&mut self, _items: &[Expr]) -> bool {
        true
    }
}

/// Walk an expression tree with a visitor
///
/// Visits nodes in pre-order (parent before children).
pub fn walk_expr<V: ExprVisitor>(expr: &Expr, visitor: &mut V) {
    if !visitor.visit_node(expr) {
        return;
    }
    match &expr.kind {
        ExprKind::Constant(value) => {
            visitor.visit_constant(*value);
        }
        ExprKind::NamedConstant { name, value } => {
            visitor.visit_named_constant(name, *value);
        }
        ExprKind::Variable(name) => {
            visitor.visit_variable(name);
        }
        ExprKind::Unary { op, arg } => {
            if visitor.visit_unary(*op, arg) {
                walk_expr(arg, visitor);
            }
        }
        ExprKind::Binary { op, left, right } => {
            if visitor.visit_binary(*op, left, right) {
                walk_expr(left, visitor);
                walk_expr(right, visitor);
            }
        }
        ExprKind::Assign { target, value } => {
            if visitor.visit_assign(target, value) {
                walk_expr(target, visitor);
                walk_expr(value, visitor);
            }
        }
        ExprKind::Array(items) => {
            if visitor.visit_array(items) {
                for item in items.iter() {
                    walk_expr(item, visitor);
                }
            }
        }
    }
}
