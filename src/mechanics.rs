//! Fixed-size symbolic vectors and matrices for rigid-body mechanics.
//!
//! Components are expressions, so a `Vec3` of constants folds to numbers
//! while one of symbols stays symbolic. Formulas are written out in full
//! instead of going through the general array code.

use std::fmt;
use std::ops::{Add, Index, Neg, Sub};

use crate::error::ExprError;
use crate::Expr;

/// Three-component expression vector
#[derive(Debug, Clone, PartialEq)]
pub struct Vec3 {
    pub x: Expr,
    pub y: Expr,
    pub z: Expr,
}

impl Vec3 {
    pub fn new(x: Expr, y: Expr, z: Expr) -> Self {
        Self { x, y, z }
    }

    pub fn zeros() -> Self {
        Self::new(Expr::zero(), Expr::zero(), Expr::zero())
    }

    pub fn ux() -> Self {
        Self::new(Expr::one(), Expr::zero(), Expr::zero())
    }

    pub fn uy() -> Self {
        Self::new(Expr::zero(), Expr::one(), Expr::zero())
    }

    pub fn uz() -> Self {
        Self::new(Expr::zero(), Expr::zero(), Expr::one())
    }

    /// `value` at component `index`, zeros elsewhere
    pub fn elemental(index: usize, value: Expr) -> Result<Self, ExprError> {
        match index {
            0 => Ok(Self::new(value, Expr::zero(), Expr::zero())),
            1 => Ok(Self::new(Expr::zero(), value, Expr::zero())),
            2 => Ok(Self::new(Expr::zero(), Expr::zero(), value)),
            _ => Err(ExprError::dimension(format!(
                "component {index} of a 3-vector"
            ))),
        }
    }

    pub fn dot(&self, other: &Vec3) -> Expr {
        Expr::sum(vec![
            Expr::mul_expr(self.x.clone(), other.x.clone()),
            Expr::mul_expr(self.y.clone(), other.y.clone()),
            Expr::mul_expr(self.z.clone(), other.z.clone()),
        ])
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        let det = |a: &Expr, b: &Expr, c: &Expr, d: &Expr| {
            Expr::sub_expr(
                Expr::mul_expr(a.clone(), b.clone()),
                Expr::mul_expr(c.clone(), d.clone()),
            )
        };
        Vec3::new(
            det(&self.y, &other.z, &self.z, &other.y),
            det(&self.z, &other.x, &self.x, &other.z),
            det(&self.x, &other.y, &self.y, &other.x),
        )
    }

    pub fn outer(&self, other: &Vec3) -> Mat3 {
        let row = |a: &Expr| {
            Vec3::new(
                Expr::mul_expr(a.clone(), other.x.clone()),
                Expr::mul_expr(a.clone(), other.y.clone()),
                Expr::mul_expr(a.clone(), other.z.clone()),
            )
        };
        Mat3::from_rows(row(&self.x), row(&self.y), row(&self.z))
    }

    /// Skew-symmetric matrix `[v×]` with `[v×]·u = v × u`
    pub fn cross_matrix(&self) -> Mat3 {
        Mat3::from_rows(
            Vec3::new(Expr::zero(), Expr::negate(self.z.clone()), self.y.clone()),
            Vec3::new(self.z.clone(), Expr::zero(), Expr::negate(self.x.clone())),
            Vec3::new(Expr::negate(self.y.clone()), self.x.clone(), Expr::zero()),
        )
    }

    pub fn norm(&self) -> Expr {
        self.dot(self).sqrt()
    }

    pub fn scale(&self, factor: &Expr) -> Vec3 {
        self.map(|c| Expr::mul_expr(factor.clone(), c.clone()))
    }

    fn map(&self, f: impl Fn(&Expr) -> Expr) -> Vec3 {
        Vec3::new(f(&self.x), f(&self.y), f(&self.z))
    }

    pub fn to_expr(&self) -> Expr {
        Expr::array_node(vec![self.x.clone(), self.y.clone(), self.z.clone()])
    }

    /// Read back a vector expression of length 3
    pub fn from_expr(expr: &Expr) -> Result<Self, ExprError> {
        match expr.as_array() {
            Some([x, y, z]) if !expr.is_matrix() => Ok(Self::new(x.clone(), y.clone(), z.clone())),
            _ => Err(ExprError::dimension(format!("'{expr}' is not a 3-vector"))),
        }
    }
}

impl Index<usize> for Vec3 {
    type Output = Expr;

    fn index(&self, index: usize) -> &Expr {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("index {index} out of range for Vec3"),
        }
    }
}

impl Add for &Vec3 {
    type Output = Vec3;

    fn add(self, rhs: &Vec3) -> Vec3 {
        Vec3::new(
            Expr::add_expr(self.x.clone(), rhs.x.clone()),
            Expr::add_expr(self.y.clone(), rhs.y.clone()),
            Expr::add_expr(self.z.clone(), rhs.z.clone()),
        )
    }
}

impl Sub for &Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: &Vec3) -> Vec3 {
        Vec3::new(
            Expr::sub_expr(self.x.clone(), rhs.x.clone()),
            Expr::sub_expr(self.y.clone(), rhs.y.clone()),
            Expr::sub_expr(self.z.clone(), rhs.z.clone()),
        )
    }
}

impl Neg for &Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        self.map(|c| Expr::negate(c.clone()))
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_expr())
    }
}

/// Six-component vector, e.g. a twist or wrench stacked from two `Vec3`
#[derive(Debug, Clone, PartialEq)]
pub struct Vec6 {
    components: [Expr; 6],
}

impl Vec6 {
    pub fn new(components: [Expr; 6]) -> Self {
        Self { components }
    }

    pub fn from_pair(a: Vec3, b: Vec3) -> Self {
        Self::new([a.x, a.y, a.z, b.x, b.y, b.z])
    }

    /// The two halves
    pub fn split(&self) -> (Vec3, Vec3) {
        let [x, y, z, u, v, w] = self.components.clone();
        (Vec3::new(x, y, z), Vec3::new(u, v, w))
    }

    pub fn components(&self) -> &[Expr; 6] {
        &self.components
    }

    pub fn to_expr(&self) -> Expr {
        Expr::array_node(self.components.to_vec())
    }
}

impl Index<usize> for Vec6 {
    type Output = Expr;

    fn index(&self, index: usize) -> &Expr {
        &self.components[index]
    }
}

/// 3×3 expression matrix stored by rows
#[derive(Debug, Clone, PartialEq)]
pub struct Mat3 {
    rows: [Vec3; 3],
}

impl Mat3 {
    pub fn new(elements: [[Expr; 3]; 3]) -> Self {
        let [r1, r2, r3] = elements.map(|[x, y, z]| Vec3::new(x, y, z));
        Self::from_rows(r1, r2, r3)
    }

    pub fn from_rows(row1: Vec3, row2: Vec3, row3: Vec3) -> Self {
        Self {
            rows: [row1, row2, row3],
        }
    }

    pub fn from_columns(column1: Vec3, column2: Vec3, column3: Vec3) -> Self {
        Self::from_rows(column1, column2, column3).transpose()
    }

    pub fn zeros() -> Self {
        Self::from_rows(Vec3::zeros(), Vec3::zeros(), Vec3::zeros())
    }

    pub fn identity() -> Self {
        Self::from_rows(Vec3::ux(), Vec3::uy(), Vec3::uz())
    }

    pub fn diagonal(d1: Expr, d2: Expr, d3: Expr) -> Self {
        Self::from_rows(
            Vec3::new(d1, Expr::zero(), Expr::zero()),
            Vec3::new(Expr::zero(), d2, Expr::zero()),
            Vec3::new(Expr::zero(), Expr::zero(), d3),
        )
    }

    /// `value` times the identity
    pub fn scalar(value: Expr) -> Self {
        Self::diagonal(value.clone(), value.clone(), value)
    }

    pub fn row(&self, index: usize) -> &Vec3 {
        &self.rows[index]
    }

    pub fn column(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.rows[0][index].clone(),
            self.rows[1][index].clone(),
            self.rows[2][index].clone(),
        )
    }

    pub fn transpose(&self) -> Mat3 {
        Self::from_rows(self.column(0), self.column(1), self.column(2))
    }

    /// `row1 · (row2 × row3)`
    pub fn determinant(&self) -> Expr {
        self.rows[0].dot(&self.rows[1].cross(&self.rows[2]))
    }

    pub fn product_vec(&self, v: &Vec3) -> Vec3 {
        Vec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }

    pub fn product(&self, other: &Mat3) -> Mat3 {
        let columns = [other.column(0), other.column(1), other.column(2)];
        let row = |r: &Vec3| Vec3::new(r.dot(&columns[0]), r.dot(&columns[1]), r.dot(&columns[2]));
        Self::from_rows(row(&self.rows[0]), row(&self.rows[1]), row(&self.rows[2]))
    }

    /// Adjugate over determinant. A singular matrix yields non-finite
    /// entries once evaluated.
    pub fn inverse(&self) -> Mat3 {
        let [r1, r2, r3] = &self.rows;
        // columns of the adjugate are the pairwise cross products of the rows
        let adjugate = Mat3::from_columns(r2.cross(r3), r3.cross(r1), r1.cross(r2));
        let det = self.determinant();
        let divide = |v: &Vec3| v.map(|c| Expr::div_expr(c.clone(), det.clone()));
        Self::from_rows(
            divide(&adjugate.rows[0]),
            divide(&adjugate.rows[1]),
            divide(&adjugate.rows[2]),
        )
    }

    pub fn solve(&self, b: &Vec3) -> Vec3 {
        self.inverse().product_vec(b)
    }

    /// Factor into `(L, D, U)` with `self = L·D·U`, `L` unit lower
    /// triangular, `D` diagonal and `U` unit upper triangular. Needs
    /// non-zero leading pivots.
    pub fn decompose(&self) -> (Mat3, Mat3, Mat3) {
        let a = |i: usize, j: usize| self.rows[i][j].clone();
        let div = Expr::div_expr;
        let mul = Expr::mul_expr;
        let sub = Expr::sub_expr;

        let d11 = a(0, 0);
        let u12 = div(a(0, 1), d11.clone());
        let u13 = div(a(0, 2), d11.clone());
        let l21 = div(a(1, 0), d11.clone());
        let l31 = div(a(2, 0), d11.clone());
        let d22 = sub(a(1, 1), mul(mul(l21.clone(), d11.clone()), u12.clone()));
        let u23 = div(
            sub(a(1, 2), mul(mul(l21.clone(), d11.clone()), u13.clone())),
            d22.clone(),
        );
        let l32 = div(
            sub(a(2, 1), mul(mul(l31.clone(), d11.clone()), u12.clone())),
            d22.clone(),
        );
        let d33 = sub(
            sub(a(2, 2), mul(mul(l32.clone(), d22.clone()), u23.clone())),
            mul(mul(l31.clone(), d11.clone()), u13.clone()),
        );

        let (zero, one) = (Expr::zero(), Expr::one());
        let lower = Mat3::new([
            [one.clone(), zero.clone(), zero.clone()],
            [l21, one.clone(), zero.clone()],
            [l31, l32, one.clone()],
        ]);
        let upper = Mat3::new([
            [one.clone(), u12, u13],
            [zero.clone(), one.clone(), u23],
            [zero.clone(), zero, one],
        ]);
        (lower, Mat3::diagonal(d11, d22, d33), upper)
    }

    pub fn to_expr(&self) -> Expr {
        Expr::matrix_unchecked(
            self.rows
                .iter()
                .map(|r| vec![r.x.clone(), r.y.clone(), r.z.clone()])
                .collect(),
        )
    }

    /// Read back a 3×3 matrix expression
    pub fn from_expr(expr: &Expr) -> Result<Self, ExprError> {
        let not_3x3 = || ExprError::dimension(format!("'{expr}' is not a 3x3 matrix"));
        let rows = expr.matrix_rows().ok_or_else(not_3x3)?;
        let [r1, r2, r3] = rows.as_slice() else {
            return Err(not_3x3());
        };
        let row = |r: &[Expr]| match r {
            [x, y, z] => Ok(Vec3::new(x.clone(), y.clone(), z.clone())),
            _ => Err(not_3x3()),
        };
        Ok(Self::from_rows(row(r1)?, row(r2)?, row(r3)?))
    }
}

impl Index<(usize, usize)> for Mat3 {
    type Output = Expr;

    fn index(&self, (i, j): (usize, usize)) -> &Expr {
        &self.rows[i][j]
    }
}

impl fmt::Display for Mat3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_expr())
    }
}
