//! Abstract Syntax Tree for symbolic expressions

use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::error::ExprError;
use crate::functions::{BinaryOp, UnaryOp};
use crate::linalg::{JaggedMatrix, Vector};
use crate::visitor::{ExprVisitor, walk_expr};

/// Immutable expression node.
///
/// Nodes are only built through the canonicalizing constructors
/// (`add_expr`, `mul_expr`, `unary`, `array`, ...), so every `Expr` is
/// already in normalized form. Equality and hashing are structural.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Plain number
    Constant(f64),

    /// Symbol bound to a fixed value (`pi`, `e`, or a registered `a = 3`)
    NamedConstant { name: Arc<str>, value: f64 },

    /// Free symbol
    Variable(Arc<str>),

    Unary { op: UnaryOp, arg: Arc<Expr> },

    Binary {
        op: BinaryOp,
        left: Arc<Expr>,
        right: Arc<Expr>,
    },

    /// `target = value`
    Assign { target: Arc<Expr>, value: Arc<Expr> },

    /// Vector (rank 1) or jagged matrix of rows (rank 2); never fewer than two elements
    Array(Arc<[Expr]>),
}

// Floats compare by bit pattern so that Eq agrees with Hash. Constructors
// normalize -0.0 to 0.0.
impl PartialEq for ExprKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ExprKind::Constant(a), ExprKind::Constant(b)) => a.to_bits() == b.to_bits(),
            (
                ExprKind::NamedConstant { name: n1, value: v1 },
                ExprKind::NamedConstant { name: n2, value: v2 },
            ) => n1 == n2 && v1.to_bits() == v2.to_bits(),
            (ExprKind::Variable(a), ExprKind::Variable(b)) => a == b,
            (ExprKind::Unary { op: o1, arg: a1 }, ExprKind::Unary { op: o2, arg: a2 }) => {
                o1 == o2 && a1 == a2
            }
            (
                ExprKind::Binary {
                    op: o1,
                    left: l1,
                    right: r1,
                },
                ExprKind::Binary {
                    op: o2,
                    left: l2,
                    right: r2,
                },
            ) => o1 == o2 && l1 == l2 && r1 == r2,
            (
                ExprKind::Assign {
                    target: t1,
                    value: v1,
                },
                ExprKind::Assign {
                    target: t2,
                    value: v2,
                },
            ) => t1 == t2 && v1 == v2,
            (ExprKind::Array(a), ExprKind::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ExprKind {}

impl Hash for ExprKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ExprKind::Constant(v) => v.to_bits().hash(state),
            ExprKind::NamedConstant { name, value } => {
                name.hash(state);
                value.to_bits().hash(state);
            }
            ExprKind::Variable(name) => name.hash(state),
            ExprKind::Unary { op, arg } => {
                op.hash(state);
                arg.hash(state);
            }
            ExprKind::Binary { op, left, right } => {
                op.hash(state);
                left.hash(state);
                right.hash(state);
            }
            ExprKind::Assign { target, value } => {
                target.hash(state);
                value.hash(state);
            }
            ExprKind::Array(items) => {
                items.len().hash(state);
                for item in items.iter() {
                    item.hash(state);
                }
            }
        }
    }
}

impl Expr {
    pub(crate) fn new(kind: ExprKind) -> Self {
        Expr { kind }
    }

    // ===== Leaves =====

    /// Numeric constant. Exactly π and e map to the named constants `pi` and `e`.
    pub fn constant(value: f64) -> Expr {
        if value == std::f64::consts::PI {
            return Expr::pi();
        }
        if value == std::f64::consts::E {
            return Expr::e();
        }
        // -0.0 == 0.0 but their bit patterns differ
        let value = if value == 0.0 { 0.0 } else { value };
        Expr::new(ExprKind::Constant(value))
    }

    pub fn zero() -> Expr {
        Expr::new(ExprKind::Constant(0.0))
    }

    pub fn one() -> Expr {
        Expr::new(ExprKind::Constant(1.0))
    }

    pub fn pi() -> Expr {
        Expr::named_constant("pi", std::f64::consts::PI)
    }

    pub fn e() -> Expr {
        Expr::named_constant("e", std::f64::consts::E)
    }

    /// Radians per degree, `pi/180`
    pub fn deg() -> Expr {
        Expr::div_expr(Expr::pi(), Expr::constant(180.0))
    }

    /// Degrees per radian, `180/pi`
    pub fn rad() -> Expr {
        Expr::div_expr(Expr::constant(180.0), Expr::pi())
    }

    /// Radians per second for one revolution per minute, `pi/30`
    pub fn rpm() -> Expr {
        Expr::div_expr(Expr::pi(), Expr::constant(30.0))
    }

    pub fn named_constant(name: &str, value: f64) -> Expr {
        Expr::new(ExprKind::NamedConstant {
            name: Arc::from(name),
            value,
        })
    }

    pub fn variable(name: &str) -> Expr {
        Expr::new(ExprKind::Variable(Arc::from(name)))
    }

    /// `[name_1, name_2, ..., name_size]`
    pub fn symbol_vector(size: usize, name: &str) -> Result<Expr, ExprError> {
        Expr::array(
            (1..=size)
                .map(|i| Expr::variable(&format!("{name}_{i}")))
                .collect(),
        )
    }

    /// Constant vector expression
    pub fn from_vector(vector: &Vector) -> Expr {
        Expr::array_node(vector.iter().map(|&v| Expr::constant(v)).collect())
    }

    /// Constant matrix expression; single-row and empty matrices collapse
    /// like any other array
    pub fn from_matrix(matrix: &JaggedMatrix) -> Expr {
        Expr::matrix_unchecked(
            matrix
                .rows()
                .iter()
                .map(|row| row.iter().map(|&v| Expr::constant(v)).collect())
                .collect(),
        )
    }

    // ===== Unreduced node builders (callers are the canonicalizing constructors) =====

    pub(crate) fn unary_node(op: UnaryOp, arg: Expr) -> Expr {
        Expr::new(ExprKind::Unary {
            op,
            arg: Arc::new(arg),
        })
    }

    pub(crate) fn binary_node(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::new(ExprKind::Binary {
            op,
            left: Arc::new(left),
            right: Arc::new(right),
        })
    }

    pub(crate) fn assign_node(target: Expr, value: Expr) -> Expr {
        Expr::new(ExprKind::Assign {
            target: Arc::new(target),
            value: Arc::new(value),
        })
    }

    /// Array from elements whose shape is already known to be valid
    pub(crate) fn array_node(mut items: Vec<Expr>) -> Expr {
        match items.len() {
            0 => Expr::zero(),
            1 => items.remove(0),
            _ => Expr::new(ExprKind::Array(Arc::from(items))),
        }
    }

    // ===== Accessors =====

    /// Value of a plain numeric constant
    pub fn as_constant(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Constant(v) => Some(*v),
            _ => None,
        }
    }

    /// Value of a numeric constant, optionally also accepting named constants
    pub fn as_number(&self, include_named: bool) -> Option<f64> {
        match &self.kind {
            ExprKind::Constant(v) => Some(*v),
            ExprKind::NamedConstant { value, .. } if include_named => Some(*value),
            _ => None,
        }
    }

    /// Name of a free symbol
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Expr]> {
        match &self.kind {
            ExprKind::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Rows of a rank-2 array. A scalar row (a collapsed single-element row)
    /// is returned as a one-element slice.
    pub(crate) fn matrix_rows(&self) -> Option<Vec<&[Expr]>> {
        let items = self.as_array()?;
        if !self.is_matrix() {
            return None;
        }
        Some(
            items
                .iter()
                .map(|row| row.as_array().unwrap_or(std::slice::from_ref(row)))
                .collect(),
        )
    }

    /// Elements as a slice: an array's children, or the expression itself
    pub fn to_slice(&self) -> &[Expr] {
        self.as_array().unwrap_or(std::slice::from_ref(self))
    }

    pub(crate) fn as_unary(&self, op: UnaryOp) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Unary { op: o, arg } if *o == op => Some(arg),
            _ => None,
        }
    }

    pub(crate) fn as_binary(&self, op: BinaryOp) -> Option<(&Expr, &Expr)> {
        match &self.kind {
            ExprKind::Binary { op: o, left, right } if *o == op => Some((left, right)),
            _ => None,
        }
    }

    pub(crate) fn as_assign(&self) -> Option<(&Expr, &Expr)> {
        match &self.kind {
            ExprKind::Assign { target, value } => Some((target, value)),
            _ => None,
        }
    }

    pub(crate) fn is_constant_value(&self, value: f64) -> bool {
        self.as_constant() == Some(value)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ExprKind::Array(_))
    }

    pub fn is_vector(&self) -> bool {
        self.is_array() && self.rank() == 1
    }

    pub fn is_matrix(&self) -> bool {
        self.is_array() && self.rank() == 2
    }

    /// Value of a constant scalar expression (plain or named constant)
    pub fn to_constant(&self) -> Result<f64, ExprError> {
        self.as_number(true)
            .ok_or_else(|| ExprError::NotAConstant(self.to_string()))
    }

    /// Values of a vector whose elements are all constants
    pub fn to_vector(&self) -> Result<Vector, ExprError> {
        let not_a_vector = || ExprError::NotAVector(self.to_string());
        if !self.is_vector() {
            return Err(not_a_vector());
        }
        self.to_slice()
            .iter()
            .map(|item| item.as_number(true).ok_or_else(not_a_vector))
            .collect::<Result<Vec<_>, _>>()
            .map(Vector::new)
    }

    /// Values of a matrix whose elements are all constants
    pub fn to_matrix(&self) -> Result<JaggedMatrix, ExprError> {
        let not_a_matrix = || ExprError::NotAMatrix(self.to_string());
        let rows = self.matrix_rows().ok_or_else(not_a_matrix)?;
        rows.into_iter()
            .map(|row| {
                row.iter()
                    .map(|item| item.as_number(true).ok_or_else(not_a_matrix))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()
            .map(JaggedMatrix::new)
    }

    // ===== Structure queries =====

    /// 0 for scalars, 1 for vectors, 2 for matrices
    pub fn rank(&self) -> usize {
        match &self.kind {
            ExprKind::Constant(_) | ExprKind::NamedConstant { .. } | ExprKind::Variable(_) => 0,
            ExprKind::Unary { arg, .. } => arg.rank(),
            ExprKind::Binary { left, right, .. } => left.rank().max(right.rank()),
            ExprKind::Assign { value, .. } => value.rank(),
            ExprKind::Array(items) => 1 + items.iter().map(Expr::rank).max().unwrap_or(0),
        }
    }

    /// Free symbols in order of first appearance, or sorted when `alphabetical`
    pub fn symbols(&self, alphabetical: bool) -> Vec<String> {
        let mut collector = SymbolCollector::default();
        walk_expr(self, &mut collector);
        let mut names = collector.names;
        if alphabetical {
            names.sort();
        }
        names
    }

    pub fn contains_symbol(&self, name: &str) -> bool {
        let mut finder = SymbolFinder {
            target: name,
            found: false,
        };
        walk_expr(self, &mut finder);
        finder.found
    }

    /// Plain numeric constants in order of appearance
    pub fn values(&self) -> Vec<f64> {
        let mut collector = ValueCollector::default();
        walk_expr(self, &mut collector);
        collector.values
    }

    pub fn node_count(&self) -> usize {
        let mut counter = NodeCounter::default();
        walk_expr(self, &mut counter);
        counter.count
    }

    pub fn max_depth(&self) -> usize {
        match &self.kind {
            ExprKind::Constant(_) | ExprKind::NamedConstant { .. } | ExprKind::Variable(_) => 1,
            ExprKind::Unary { arg, .. } => 1 + arg.max_depth(),
            ExprKind::Binary { left, right, .. } => 1 + left.max_depth().max(right.max_depth()),
            ExprKind::Assign { target, value } => 1 + target.max_depth().max(value.max_depth()),
            ExprKind::Array(items) => 1 + items.iter().map(Expr::max_depth).max().unwrap_or(0),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::constant(value)
    }
}

impl From<&Vector> for Expr {
    fn from(vector: &Vector) -> Self {
        Expr::from_vector(vector)
    }
}

impl From<&JaggedMatrix> for Expr {
    fn from(matrix: &JaggedMatrix) -> Self {
        Expr::from_matrix(matrix)
    }
}

// ===== Visitors backing the structure queries =====

#[derive(Default)]
struct SymbolCollector {
    names: Vec<String>,
}

impl ExprVisitor for SymbolCollector {
    fn visit_variable(&mut self, name: &str) -> bool {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_owned());
        }
        true
    }
}

struct SymbolFinder<'a> {
    target: &'a str,
    found: bool,
}

impl ExprVisitor for SymbolFinder<'_> {
    fn visit_variable(&mut self, name: &str) -> bool {
        self.found |= name == self.target;
        !self.found
    }

    fn visit_node(&mut self, _expr: &Expr) -> bool {
        !self.found
    }
}

#[derive(Default)]
struct ValueCollector {
    values: Vec<f64>,
}

impl ExprVisitor for ValueCollector {
    fn visit_constant(&mut self, value: f64) -> bool {
        self.values.push(value);
        true
    }
}

#[derive(Default)]
struct NodeCounter {
    count: usize,
}

impl ExprVisitor for NodeCounter {
    fn visit_node(&mut self, _expr: &Expr) -> bool {
        self.count += 1;
        true
    }
}
