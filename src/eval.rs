//! Interpretive evaluation and substitution

use crate::error::ExprError;
use crate::linalg::{JaggedMatrix, Quantity, Vector};
use crate::{Expr, ExprKind};

impl Expr {
    /// Evaluate with the given symbol values.
    ///
    /// The result's shape follows [`rank`](Expr::rank). Free symbols without
    /// a binding are [`ExprError::UnresolvedSymbol`]; an unreduced operation
    /// between arrays of incompatible shape is reported when reached.
    pub fn eval(&self, bindings: &[(&str, f64)]) -> Result<Quantity, ExprError> {
        match &self.kind {
            ExprKind::Constant(v) => Ok(Quantity::Scalar(*v)),
            ExprKind::NamedConstant { value, .. } => Ok(Quantity::Scalar(*value)),
            ExprKind::Variable(name) => bindings
                .iter()
                .find(|(symbol, _)| *symbol == name.as_ref())
                .map(|&(_, value)| Quantity::Scalar(value))
                .ok_or_else(|| ExprError::UnresolvedSymbol(name.to_string())),
            ExprKind::Unary { op, arg } => Ok(match arg.eval(bindings)? {
                Quantity::Scalar(x) => Quantity::Scalar(op.apply(x)),
                Quantity::Vector(v) => Quantity::Vector(v.map(|x| op.apply(x))),
                Quantity::Matrix(m) => Quantity::Matrix(m.map(|x| op.apply(x))),
            }),
            ExprKind::Binary { op, left, right } => {
                match (left.eval(bindings)?, right.eval(bindings)?) {
                    (Quantity::Scalar(x), Quantity::Scalar(y)) => Ok(Quantity::Scalar(op.apply(x, y))),
                    // array operands: redo the shape-aware construction on the values
                    (l, r) => {
                        let folded = Expr::binary(*op, l.to_expr(), r.to_expr())?;
                        if folded.as_binary(*op).is_some() {
                            return Err(ExprError::dimension(format!(
                                "cannot evaluate '{}' between operands of rank {} and {}",
                                op.symbol(),
                                l.rank(),
                                r.rank()
                            )));
                        }
                        folded.eval(&[])
                    }
                }
            }
            ExprKind::Assign { value, .. } => value.eval(bindings),
            ExprKind::Array(items) => {
                let values = items
                    .iter()
                    .map(|item| item.eval(bindings))
                    .collect::<Result<Vec<_>, _>>()?;
                collect_array(values)
            }
        }
    }
}

/// Stack element values into a vector (all scalars) or a matrix (rows)
pub(crate) fn collect_array(values: Vec<Quantity>) -> Result<Quantity, ExprError> {
    if values.iter().all(|q| matches!(q, Quantity::Scalar(_))) {
        return Ok(Quantity::Vector(
            values
                .iter()
                .filter_map(|q| q.as_scalar().ok())
                .collect::<Vector>(),
        ));
    }
    let rows = values
        .into_iter()
        .map(|q| match q {
            Quantity::Scalar(x) => Ok(vec![x]),
            Quantity::Vector(v) => Ok(v.into_inner()),
            Quantity::Matrix(_) => Err(ExprError::UnsupportedRank { rank: 3 }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Quantity::Matrix(JaggedMatrix::new(rows)))
}

impl Expr {
    /// Replace the symbol `name` with `value`
    pub fn substitute(&self, name: &str, value: &Expr) -> Expr {
        self.substitute_all(&[(name, value.clone())])
    }

    /// Replace several symbols at once. The tree is rebuilt through the
    /// constructors, so the result is normalized again.
    pub fn substitute_all(&self, pairs: &[(&str, Expr)]) -> Expr {
        self.rebuild(&|name| {
            pairs
                .iter()
                .find(|(symbol, _)| *symbol == name)
                .map(|(_, value)| value.clone())
        })
    }

    /// Replace symbols with numbers
    pub fn substitute_values(&self, pairs: &[(&str, f64)]) -> Expr {
        self.rebuild(&|name| {
            pairs
                .iter()
                .find(|(symbol, _)| *symbol == name)
                .map(|&(_, value)| Expr::constant(value))
        })
    }

    fn rebuild(&self, lookup: &dyn Fn(&str) -> Option<Expr>) -> Expr {
        match &self.kind {
            ExprKind::Constant(_) => self.clone(),
            ExprKind::NamedConstant { name, .. } | ExprKind::Variable(name) => {
                lookup(name).unwrap_or_else(|| self.clone())
            }
            ExprKind::Unary { op, arg } => Expr::unary(*op, arg.rebuild(lookup)),
            ExprKind::Binary { op, left, right } => {
                let left = left.rebuild(lookup);
                let right = right.rebuild(lookup);
                Expr::binary(*op, left.clone(), right.clone())
                    .unwrap_or_else(|_| Expr::binary_node(*op, left, right))
            }
            ExprKind::Assign { target, value } => {
                Expr::assign(target.rebuild(lookup), value.rebuild(lookup))
            }
            ExprKind::Array(items) => {
                let items: Vec<Expr> = items.iter().map(|item| item.rebuild(lookup)).collect();
                Expr::array(items.clone()).unwrap_or_else(|_| Expr::array_node(items))
            }
        }
    }
}
