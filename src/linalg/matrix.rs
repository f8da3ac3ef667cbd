//! Row-major numeric matrix with possibly ragged rows

use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use super::Vector;
use crate::display::{format_g, format_table, show_as_table};
use crate::error::ExprError;
use crate::traits::MathScalar;

/// Numeric matrix stored as rows; the value of a rank-2 expression.
///
/// Rows are allowed to differ in length. Shape-sensitive operations
/// (`product`, `solve`, `transpose`) check their inputs and return
/// [`ExprError::DimensionMismatch`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JaggedMatrix<T = f64> {
    rows: Vec<Vec<T>>,
}

impl<T: MathScalar> JaggedMatrix<T> {
    pub fn new(rows: Vec<Vec<T>>) -> Self {
        JaggedMatrix { rows }
    }

    pub fn zeros(rows: usize, columns: usize) -> Self {
        JaggedMatrix::new(vec![vec![T::zero(); columns]; rows])
    }

    pub fn identity(size: usize) -> Self {
        JaggedMatrix::diagonal(size, T::one())
    }

    pub fn diagonal(size: usize, value: T) -> Self {
        JaggedMatrix::from_fn(size, size, |i, j| if i == j { value } else { T::zero() })
    }

    pub fn from_fn(rows: usize, columns: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        JaggedMatrix::new(
            (0..rows)
                .map(|i| (0..columns).map(|j| f(i, j)).collect())
                .collect(),
        )
    }

    /// `[[a, b], [cᵀ, d]]`
    pub fn block(a: &JaggedMatrix<T>, b: &Vector<T>, c: &Vector<T>, d: T) -> Self {
        let mut rows: Vec<Vec<T>> = a
            .rows
            .iter()
            .zip(b.iter())
            .map(|(row, &last)| {
                let mut row = row.clone();
                row.push(last);
                row
            })
            .collect();
        let mut last = c.as_slice().to_vec();
        last.push(d);
        rows.push(last);
        JaggedMatrix::new(rows)
    }

    /// Inverse of [`block`](Self::block): leading block, last column, last
    /// row and corner. `None` unless the matrix is square and at least 2×2.
    pub fn split_last(&self) -> Option<(JaggedMatrix<T>, Vector<T>, Vector<T>, T)> {
        let n = self.row_count();
        if n < 2 || !self.is_square() {
            return None;
        }
        let last = n - 1;
        let a = JaggedMatrix::new(self.rows[..last].iter().map(|row| row[..last].to_vec()).collect());
        let b = self.rows[..last].iter().map(|row| row[last]).collect();
        let c = Vector::new(self.rows[last][..last].to_vec());
        Some((a, b, c, self.rows[last][last]))
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the first row
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_square(&self) -> bool {
        let n = self.row_count();
        self.rows.iter().all(|row| row.len() == n)
    }

    fn is_rectangular(&self) -> bool {
        let m = self.column_count();
        self.rows.iter().all(|row| row.len() == m)
    }

    pub fn row(&self, index: usize) -> Vector<T> {
        Vector::new(self.rows[index].clone())
    }

    /// Entries of column `index`; rows too short to have one contribute zero
    pub fn column(&self, index: usize) -> Vector<T> {
        self.rows
            .iter()
            .map(|row| row.get(index).copied().unwrap_or_else(T::zero))
            .collect()
    }

    pub fn transpose(&self) -> Result<JaggedMatrix<T>, ExprError> {
        if !self.is_rectangular() {
            return Err(ExprError::dimension("cannot transpose a ragged matrix"));
        }
        Ok(JaggedMatrix::from_fn(
            self.column_count(),
            self.row_count(),
            |i, j| self.rows[j][i],
        ))
    }

    pub fn scale(&self, factor: T) -> Self {
        self.map(|x| factor * x)
    }

    /// `self · other`
    pub fn product(&self, other: &JaggedMatrix<T>) -> Result<JaggedMatrix<T>, ExprError> {
        let inner = self.column_count();
        if !self.is_rectangular() || !other.is_rectangular() || inner != other.row_count() {
            return Err(ExprError::dimension(format!(
                "cannot multiply {}x{} and {}x{} matrices",
                self.row_count(),
                inner,
                other.row_count(),
                other.column_count()
            )));
        }
        Ok(JaggedMatrix::from_fn(
            self.row_count(),
            other.column_count(),
            |i, j| {
                (0..inner).fold(T::zero(), |acc, k| acc + self.rows[i][k] * other.rows[k][j])
            },
        ))
    }

    /// `self · v`
    pub fn product_vector(&self, v: &Vector<T>) -> Result<Vector<T>, ExprError> {
        if self.rows.iter().any(|row| row.len() != v.len()) {
            return Err(ExprError::dimension(format!(
                "cannot multiply a matrix with {} column(s) and a vector of length {}",
                self.column_count(),
                v.len()
            )));
        }
        Ok(self
            .rows
            .iter()
            .map(|row| row.iter().zip(v.iter()).fold(T::zero(), |acc, (&a, &b)| acc + a * b))
            .collect())
    }

    /// `vᵀ · self`
    pub fn vector_product(&self, v: &Vector<T>) -> Result<Vector<T>, ExprError> {
        self.transpose()?.product_vector(v)
    }

    /// Solve `self · x = v` by recursive block elimination.
    ///
    /// There is no pivoting and no singularity check: a zero pivot yields
    /// infinite or NaN components.
    pub fn solve(&self, v: &Vector<T>) -> Result<Vector<T>, ExprError> {
        let n = v.len();
        if self.row_count() != n || !self.is_square() {
            return Err(ExprError::dimension(format!(
                "cannot solve a {}x{} system for a right-hand side of length {n}",
                self.row_count(),
                self.column_count()
            )));
        }
        if n == 1 {
            return Ok(Vector::new(vec![v[0] / self.rows[0][0]]));
        }
        let (Some((a, b, c, d)), Some((u, y))) = (self.split_last(), v.split_last()) else {
            return Ok(Vector::new(Vec::new()));
        };
        let au = a.solve(&u)?;
        let ab = a.solve(&b)?;
        let x = (y - c.dot(&au)) / (d - c.dot(&ab));
        Ok((&au - &ab.scale(x)).append(x))
    }

    /// Solve `self · X = B` one column of `B` at a time
    pub fn solve_matrix(&self, rhs: &JaggedMatrix<T>) -> Result<JaggedMatrix<T>, ExprError> {
        if rhs.row_count() != self.row_count() || !rhs.is_rectangular() {
            return Err(ExprError::dimension(format!(
                "right-hand side has {} row(s), the system has {}",
                rhs.row_count(),
                self.row_count()
            )));
        }
        let columns = (0..rhs.column_count())
            .map(|j| self.solve(&rhs.column(j)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(JaggedMatrix::from_fn(
            self.row_count(),
            columns.len(),
            |i, j| columns[j][i],
        ))
    }

    pub fn inverse(&self) -> Result<JaggedMatrix<T>, ExprError> {
        self.solve_matrix(&JaggedMatrix::identity(self.row_count()))
    }

    pub(crate) fn map(&self, f: impl Fn(T) -> T) -> Self {
        JaggedMatrix::new(
            self.rows
                .iter()
                .map(|row| row.iter().map(|&x| f(x)).collect())
                .collect(),
        )
    }

    fn zip_with(&self, other: &JaggedMatrix<T>, f: impl Fn(T, T) -> T) -> Self {
        debug_assert_eq!(self.row_count(), other.row_count(), "matrix shapes differ");
        JaggedMatrix::new(
            self.rows
                .iter()
                .zip(&other.rows)
                .map(|(p, q)| p.iter().zip(q).map(|(&a, &b)| f(a, b)).collect())
                .collect(),
        )
    }
}

impl<T> From<Vec<Vec<T>>> for JaggedMatrix<T> {
    fn from(rows: Vec<Vec<T>>) -> Self {
        JaggedMatrix { rows }
    }
}

impl<T> Index<(usize, usize)> for JaggedMatrix<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        &self.rows[row][column]
    }
}

impl<T> IndexMut<(usize, usize)> for JaggedMatrix<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        &mut self.rows[row][column]
    }
}

impl<T: MathScalar> Add for &JaggedMatrix<T> {
    type Output = JaggedMatrix<T>;

    fn add(self, rhs: &JaggedMatrix<T>) -> JaggedMatrix<T> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: MathScalar> Sub for &JaggedMatrix<T> {
    type Output = JaggedMatrix<T>;

    fn sub(self, rhs: &JaggedMatrix<T>) -> JaggedMatrix<T> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: MathScalar> Neg for JaggedMatrix<T> {
    type Output = JaggedMatrix<T>;

    fn neg(self) -> JaggedMatrix<T> {
        self.map(|x| -x)
    }
}

impl<T: MathScalar> Mul<T> for JaggedMatrix<T> {
    type Output = JaggedMatrix<T>;

    fn mul(self, rhs: T) -> JaggedMatrix<T> {
        self.scale(rhs)
    }
}

impl Mul<JaggedMatrix<f64>> for f64 {
    type Output = JaggedMatrix<f64>;

    fn mul(self, rhs: JaggedMatrix<f64>) -> JaggedMatrix<f64> {
        rhs.scale(self)
    }
}

impl<T: MathScalar> Div<T> for JaggedMatrix<T> {
    type Output = JaggedMatrix<T>;

    fn div(self, rhs: T) -> JaggedMatrix<T> {
        self.map(|x| x / rhs)
    }
}

impl<T: MathScalar> fmt::Display for JaggedMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|x| format_g(x.to_f64().unwrap_or(f64::NAN)))
                    .collect()
            })
            .collect();
        if show_as_table() {
            return f.write_str(&format_table(&cells));
        }
        let rows: Vec<String> = cells
            .iter()
            .map(|row| format!("[{}]", row.join(",")))
            .collect();
        write!(f, "[{}]", rows.join(","))
    }
}
