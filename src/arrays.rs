//! Array construction and symbolic linear algebra.
//!
//! Vectors are arrays of scalars and matrices are arrays of rows. Rows may
//! differ in length (jagged); operations that need a rectangular shape check
//! it and report [`ExprError::DimensionMismatch`].

use crate::error::ExprError;
use crate::functions::BinaryOp;
use crate::{Expr, ExprKind};

fn mismatch(message: String) -> ExprError {
    ExprError::DimensionMismatch(message)
}

/// Σ a_k·b_k over two equally long slices
fn dot_slices(a: &[Expr], b: &[Expr]) -> Expr {
    a.iter()
        .zip(b)
        .map(|(x, y)| Expr::mul_expr(x.clone(), y.clone()))
        .reduce(Expr::add_expr)
        .unwrap_or_else(Expr::zero)
}

/// `(rows, columns)` of a matrix whose rows all have the same length
fn rectangular(rows: &[&[Expr]]) -> Result<(usize, usize), ExprError> {
    let columns = rows.first().map_or(0, |row| row.len());
    if rows.iter().any(|row| row.len() != columns) {
        return Err(mismatch("matrix rows have different lengths".into()));
    }
    Ok((rows.len(), columns))
}

impl Expr {
    /// Array from elements.
    ///
    /// Empty arrays are `0` and single elements are returned unchanged. If
    /// any element is itself an array the result is a jagged matrix: array
    /// elements become rows, and a scalar element at index `i` becomes a row
    /// as long as the first array row, holding the scalar in column `i` and
    /// zeros elsewhere.
    pub fn array(mut items: Vec<Expr>) -> Result<Expr, ExprError> {
        match items.len() {
            0 => return Ok(Expr::zero()),
            1 => return Ok(items.remove(0)),
            _ => {}
        }
        let Some(columns) = items.iter().find_map(|item| item.as_array().map(<[Expr]>::len))
        else {
            return Ok(Expr::array_node(items));
        };
        let rows = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item.as_array() {
                Some(row) => Ok(row.to_vec()),
                None if i < columns => {
                    let mut row = vec![Expr::zero(); columns];
                    row[i] = item;
                    Ok(row)
                }
                None => Err(mismatch(format!(
                    "scalar at index {i} does not fit a row of length {columns}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Expr::matrix(rows)
    }

    /// Matrix from rows: no rows is `0` and a single row is a vector.
    /// Elements must be scalars.
    pub fn matrix(rows: Vec<Vec<Expr>>) -> Result<Expr, ExprError> {
        let element_rank = rows
            .iter()
            .flatten()
            .map(Expr::rank)
            .max()
            .unwrap_or(0);
        if element_rank > 0 {
            return Err(ExprError::UnsupportedRank {
                rank: element_rank + 2,
            });
        }
        Ok(Expr::matrix_unchecked(rows))
    }

    pub(crate) fn matrix_unchecked(rows: Vec<Vec<Expr>>) -> Expr {
        Expr::array_node(rows.into_iter().map(Expr::array_node).collect())
    }

    /// `n`×`n` identity
    pub fn identity(n: usize) -> Result<Expr, ExprError> {
        Expr::diagonal(n, Expr::one())
    }

    /// `n`×`n` matrix with `value` on the diagonal
    pub fn diagonal(n: usize, value: Expr) -> Result<Expr, ExprError> {
        if n < 2 {
            return Err(mismatch(format!("cannot build a {n}x{n} matrix")));
        }
        if value.rank() > 0 {
            return Err(ExprError::UnsupportedRank {
                rank: value.rank() + 2,
            });
        }
        Ok(Expr::matrix_unchecked(
            (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| if i == j { value.clone() } else { Expr::zero() })
                        .collect()
                })
                .collect(),
        ))
    }

    /// Transposed matrix; scalars and vectors are returned unchanged
    pub fn transpose(&self) -> Result<Expr, ExprError> {
        let Some(rows) = self.matrix_rows() else {
            return Ok(self.clone());
        };
        let (n, m) = rectangular(&rows)?;
        Ok(Expr::matrix_unchecked(
            (0..m)
                .map(|j| (0..n).map(|i| rows[i][j].clone()).collect())
                .collect(),
        ))
    }

    /// `Σ transpose(a_i)·b_i` for arrays of equal length, `transpose(a)·b` otherwise
    pub fn dot(a: &Expr, b: &Expr) -> Result<Expr, ExprError> {
        match (a.as_array(), b.as_array()) {
            (Some(x), Some(y)) => {
                if x.len() != y.len() {
                    return Err(mismatch(format!(
                        "dot product of arrays of length {} and {}",
                        x.len(),
                        y.len()
                    )));
                }
                let mut sum = Expr::zero();
                for (p, q) in x.iter().zip(y) {
                    let term = Expr::binary(BinaryOp::Mul, p.transpose()?, q.clone())?;
                    sum = Expr::add_expr(sum, term);
                }
                Ok(sum)
            }
            _ => Expr::binary(BinaryOp::Mul, a.transpose()?, b.clone()),
        }
    }

    /// Cross product of 2D and 3D vectors.
    ///
    /// Two 2D vectors give the scalar `a_x b_y - a_y b_x`; a scalar (an
    /// out-of-plane component) crossed with a 2D vector gives a 2D vector.
    pub fn cross(a: &Expr, b: &Expr) -> Result<Expr, ExprError> {
        let items = |e: &Expr| e.as_array().filter(|_| e.is_vector()).map(<[Expr]>::to_vec);
        let m = |p: &Expr, q: &Expr| Expr::mul_expr(p.clone(), q.clone());
        match (items(a), items(b)) {
            (Some(u), Some(v)) if u.len() == 2 && v.len() == 2 => {
                Ok(Expr::sub_expr(m(&u[0], &v[1]), m(&u[1], &v[0])))
            }
            (Some(u), Some(v)) if u.len() == 3 && v.len() == 3 => Ok(Expr::array_node(vec![
                Expr::sub_expr(m(&u[1], &v[2]), m(&u[2], &v[1])),
                Expr::sub_expr(m(&u[2], &v[0]), m(&u[0], &v[2])),
                Expr::sub_expr(m(&u[0], &v[1]), m(&u[1], &v[0])),
            ])),
            (None, Some(v)) if a.rank() == 0 && v.len() == 2 => Ok(Expr::array_node(vec![
                Expr::negate(m(a, &v[1])),
                m(a, &v[0]),
            ])),
            (Some(u), None) if b.rank() == 0 && u.len() == 2 => Ok(Expr::array_node(vec![
                m(&u[1], b),
                Expr::negate(m(&u[0], b)),
            ])),
            _ => Err(mismatch(format!(
                "cross product needs 2D or 3D vectors, got ranks {} and {}",
                a.rank(),
                b.rank()
            ))),
        }
    }

    /// Skew-symmetric matrix `[v×]` of a 3D vector, so that `[v×]·u = v×u`
    pub fn cross_matrix(v: &Expr) -> Result<Expr, ExprError> {
        match v.as_array() {
            Some([x, y, z]) if v.is_vector() => Ok(Expr::matrix_unchecked(vec![
                vec![Expr::zero(), Expr::negate(z.clone()), y.clone()],
                vec![z.clone(), Expr::zero(), Expr::negate(x.clone())],
                vec![Expr::negate(y.clone()), x.clone(), Expr::zero()],
            ])),
            _ => Err(mismatch("cross matrix needs a 3D vector".into())),
        }
    }

    /// Outer product `a·bᵀ` of two vectors
    pub fn outer(a: &Expr, b: &Expr) -> Result<Expr, ExprError> {
        if a.is_vector() && b.is_vector() {
            let rows = a
                .to_slice()
                .iter()
                .map(|p| {
                    b.to_slice()
                        .iter()
                        .map(|q| Expr::mul_expr(p.clone(), q.clone()))
                        .collect()
                })
                .collect();
            return Ok(Expr::matrix_unchecked(rows));
        }
        if a.is_matrix() || b.is_matrix() {
            return Err(mismatch("outer product needs vectors".into()));
        }
        Ok(Expr::mul_expr(a.clone(), b.transpose()?))
    }

    /// Matrix product: matrix·matrix, matrix·vector, vector·matrix and
    /// vector·vector (the dot product). Scalars multiply element-wise.
    pub fn product(a: &Expr, b: &Expr) -> Result<Expr, ExprError> {
        match (a.matrix_rows(), b.matrix_rows()) {
            (Some(ar), Some(br)) => {
                let (n, k) = rectangular(&ar)?;
                let (k2, m) = rectangular(&br)?;
                if k != k2 {
                    return Err(mismatch(format!(
                        "cannot multiply {n}x{k} and {k2}x{m} matrices"
                    )));
                }
                let rows = (0..n)
                    .map(|i| {
                        (0..m)
                            .map(|j| {
                                let column: Vec<Expr> =
                                    (0..k).map(|p| br[p][j].clone()).collect();
                                dot_slices(ar[i], &column)
                            })
                            .collect()
                    })
                    .collect();
                Ok(Expr::matrix_unchecked(rows))
            }
            (Some(ar), None) if b.is_vector() => {
                let v = b.to_slice();
                let (n, k) = rectangular(&ar)?;
                if k != v.len() {
                    return Err(mismatch(format!(
                        "cannot multiply {n}x{k} matrix and vector of length {}",
                        v.len()
                    )));
                }
                Ok(Expr::array_node(ar.iter().map(|row| dot_slices(row, v)).collect()))
            }
            (None, Some(br)) if a.is_vector() => {
                let v = a.to_slice();
                let (k, m) = rectangular(&br)?;
                if k != v.len() {
                    return Err(mismatch(format!(
                        "cannot multiply vector of length {} and {k}x{m} matrix",
                        v.len()
                    )));
                }
                Ok(Expr::array_node(
                    (0..m)
                        .map(|j| {
                            let column: Vec<Expr> = (0..k).map(|p| br[p][j].clone()).collect();
                            dot_slices(v, &column)
                        })
                        .collect(),
                ))
            }
            _ if a.is_vector() && b.is_vector() => Expr::dot(a, b),
            _ if a.is_array() && b.is_array() => Err(mismatch(format!(
                "cannot multiply arrays of rank {} and {}",
                a.rank(),
                b.rank()
            ))),
            _ => Ok(Expr::mul_expr(a.clone(), b.clone())),
        }
    }

    /// Solve `a·x = b` for a vector or matrix right-hand side by recursive
    /// block elimination. A scalar `a` divides.
    pub fn solve(a: &Expr, b: &Expr) -> Result<Expr, ExprError> {
        let Some(rows) = a.matrix_rows() else {
            if a.rank() == 0 {
                return Ok(Expr::div_expr(b.clone(), a.clone()));
            }
            return Err(mismatch("solve needs a square matrix".into()));
        };
        let rows: Vec<Vec<Expr>> = rows.into_iter().map(<[Expr]>::to_vec).collect();
        if let Some(columns) = b.matrix_rows() {
            // one right-hand side per column
            let (n, m) = rectangular(&columns)?;
            let mut solutions = Vec::with_capacity(m);
            for j in 0..m {
                let rhs: Vec<Expr> = (0..n).map(|i| columns[i][j].clone()).collect();
                solutions.push(block_solve(&rows, &rhs)?);
            }
            let result = (0..rows.len())
                .map(|i| solutions.iter().map(|column| column[i].clone()).collect())
                .collect();
            return Ok(Expr::matrix_unchecked(result));
        }
        if b.is_vector() {
            return Ok(Expr::array_node(block_solve(&rows, b.to_slice())?));
        }
        Err(mismatch(format!(
            "right-hand side of rank {} does not fit a matrix",
            b.rank()
        )))
    }

    /// Inverse matrix, `solve(a, I)`
    pub fn inverse(a: &Expr) -> Result<Expr, ExprError> {
        let n = a
            .matrix_rows()
            .map(|rows| rows.len())
            .ok_or_else(|| mismatch("inverse needs a square matrix".into()))?;
        Expr::solve(a, &Expr::identity(n)?)
    }

    /// Euclidean norm of a vector, `abs` of a scalar
    pub fn norm(a: &Expr) -> Result<Expr, ExprError> {
        if a.is_array() {
            return Ok(Expr::dot(a, a)?.sqrt());
        }
        Ok(a.clone().abs())
    }

    /// `sqrt(Σ x_i²)` over the given scalars
    pub fn norm_of(items: Vec<Expr>) -> Expr {
        Expr::sum(
            items
                .into_iter()
                .map(|x| Expr::pow_expr(x, Expr::constant(2.0)))
                .collect(),
        )
        .sqrt()
    }

    /// `sqrt(a² + b²)`
    pub fn hypot(a: Expr, b: Expr) -> Expr {
        Expr::norm_of(vec![a, b])
    }

    /// Sum of an array's elements; a scalar is its own sum
    pub fn sum_of(a: &Expr) -> Expr {
        match &a.kind {
            ExprKind::Array(items) => Expr::sum(items.to_vec()),
            _ => a.clone(),
        }
    }
}

/// `A·x = v` for a square `A` given as rows.
///
/// Splitting `A = [[A', b], [cᵀ, d]]` and `v = [u, y]`:
/// `x_n = (y - c·A'⁻¹u) / (d - c·A'⁻¹b)` and `x' = A'⁻¹u - x_n A'⁻¹b`.
fn block_solve(rows: &[Vec<Expr>], v: &[Expr]) -> Result<Vec<Expr>, ExprError> {
    let n = v.len();
    if rows.len() != n || rows.iter().any(|row| row.len() != n) {
        return Err(mismatch(format!(
            "cannot solve a system with {} row(s) for a right-hand side of length {n}",
            rows.len()
        )));
    }
    if n == 1 {
        return Ok(vec![Expr::div_expr(v[0].clone(), rows[0][0].clone())]);
    }
    let last = n - 1;
    let a: Vec<Vec<Expr>> = rows[..last].iter().map(|row| row[..last].to_vec()).collect();
    let b: Vec<Expr> = rows[..last].iter().map(|row| row[last].clone()).collect();
    let c = &rows[last][..last];
    let d = rows[last][last].clone();
    let u = &v[..last];
    let y = v[last].clone();

    let au = block_solve(&a, u)?;
    let ab = block_solve(&a, &b)?;
    let x = Expr::div_expr(
        Expr::sub_expr(y, dot_slices(c, &au)),
        Expr::sub_expr(d, dot_slices(c, &ab)),
    );
    let mut result: Vec<Expr> = au
        .into_iter()
        .zip(ab)
        .map(|(p, q)| Expr::sub_expr(p, Expr::mul_expr(x.clone(), q)))
        .collect();
    result.push(x);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use crate::{Expr, ExprError, parse};

    fn v(items: &[f64]) -> Expr {
        Expr::array(items.iter().map(|&x| Expr::constant(x)).collect()).unwrap()
    }

    #[test]
    fn test_array_shape_invariants() {
        assert_eq!(Expr::array(vec![]).unwrap(), Expr::zero());
        let x = Expr::variable("x");
        assert_eq!(Expr::array(vec![x.clone()]).unwrap(), x);

        let pair = Expr::array(vec![x.clone(), Expr::variable("y")]).unwrap();
        assert_eq!(pair.rank(), 1);
        let nested = Expr::array(vec![pair.clone(), pair.clone()]).unwrap();
        assert_eq!(nested.rank(), 2);
    }

    #[test]
    fn test_scalar_sibling_placed_at_its_index() {
        // the scalar at index 1 lands in column 1 of its promoted row
        let m = Expr::array(vec![v(&[1.0, 2.0, 3.0]), Expr::constant(7.0)]).unwrap();
        assert_eq!(m, parse("[[1,2,3],[0,7,0]]").unwrap());

        let m = Expr::array(vec![Expr::constant(7.0), v(&[1.0, 2.0])]).unwrap();
        assert_eq!(m, parse("[[7,0],[1,2]]").unwrap());

        let err = Expr::array(vec![v(&[1.0, 2.0]), v(&[3.0, 4.0]), Expr::constant(5.0)]);
        assert!(matches!(err, Err(ExprError::DimensionMismatch(_))));
    }

    #[test]
    fn test_rank_three_rejected() {
        let m = parse("[[1,2],[3,4]]").unwrap();
        let err = Expr::array(vec![m.clone(), m]);
        assert_eq!(err, Err(ExprError::UnsupportedRank { rank: 3 }));
    }

    #[test]
    fn test_transpose() {
        let m = parse("[[1,2,3],[4,5,6]]").unwrap();
        assert_eq!(m.transpose().unwrap(), parse("[[1,4],[2,5],[3,6]]").unwrap());
        let x = Expr::variable("x");
        assert_eq!(x.transpose().unwrap(), x);
    }

    #[test]
    fn test_dot_and_cross() {
        let a = v(&[1.0, 2.0, 3.0]);
        let b = v(&[4.0, 5.0, 6.0]);
        assert_eq!(Expr::dot(&a, &b).unwrap(), Expr::constant(32.0));
        assert_eq!(Expr::cross(&a, &b).unwrap(), v(&[-3.0, 6.0, -3.0]));

        let p = v(&[1.0, 2.0]);
        let q = v(&[3.0, 4.0]);
        assert_eq!(Expr::cross(&p, &q).unwrap(), Expr::constant(-2.0));
        assert_eq!(
            Expr::cross(&Expr::constant(2.0), &p).unwrap(),
            v(&[-4.0, 2.0])
        );
        assert!(matches!(
            Expr::cross(&a, &p),
            Err(ExprError::DimensionMismatch(_))
        ));
        assert!(matches!(
            Expr::dot(&a, &p),
            Err(ExprError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_cross_matrix_matches_cross() {
        let a = parse("[x,y,z]").unwrap();
        let b = v(&[1.0, 2.0, 3.0]);
        let skew = Expr::cross_matrix(&a).unwrap();
        let via_matrix = Expr::product(&skew, &b).unwrap();
        let direct = Expr::cross(&a, &b).unwrap();
        let at = [("x", 0.3), ("y", -1.2), ("z", 2.0)];
        let lhs = via_matrix.eval(&at).unwrap().as_vector().cloned().unwrap();
        let rhs = direct.eval(&at).unwrap().as_vector().cloned().unwrap();
        for i in 0..3 {
            assert!((lhs[i] - rhs[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_product_shapes() {
        let m = parse("[[1,2],[3,4]]").unwrap();
        let x = v(&[1.0, 1.0]);
        assert_eq!(Expr::product(&m, &x).unwrap(), v(&[3.0, 7.0]));
        assert_eq!(Expr::product(&x, &m).unwrap(), v(&[4.0, 6.0]));
        assert_eq!(
            Expr::product(&m, &m).unwrap(),
            parse("[[7,10],[15,22]]").unwrap()
        );
        let wide = parse("[[1,2,3],[4,5,6]]").unwrap();
        assert!(matches!(
            Expr::product(&wide, &x),
            Err(ExprError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_outer() {
        let a = v(&[1.0, 2.0]);
        let b = v(&[3.0, 4.0, 5.0]);
        assert_eq!(
            Expr::outer(&a, &b).unwrap(),
            parse("[[3,4,5],[6,8,10]]").unwrap()
        );
    }

    #[test]
    fn test_numeric_solve() {
        let a = parse("[[4,1],[2,3]]").unwrap();
        let b = v(&[1.0, 2.0]);
        let x = Expr::solve(&a, &b).unwrap().to_vector().unwrap();
        assert!((x[0] - 0.1).abs() < 1e-12);
        assert!((x[1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_right_hand_side() {
        let a = parse("[[2,1,0],[1,3,1],[0,1,4]]").unwrap();
        let inv = Expr::inverse(&a).unwrap();
        let identity = Expr::product(&a, &inv).unwrap().to_matrix().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((identity[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_norms() {
        let a = v(&[3.0, 4.0]);
        assert_eq!(Expr::norm(&a).unwrap(), Expr::constant(5.0));
        assert_eq!(
            Expr::hypot(Expr::constant(3.0), Expr::constant(4.0)),
            Expr::constant(5.0)
        );
        assert_eq!(Expr::sum_of(&a), Expr::constant(7.0));
    }
}
