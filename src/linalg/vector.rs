//! Dense numeric vector

use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use super::JaggedMatrix;
use crate::display::{format_g, format_table, show_as_table};
use crate::traits::MathScalar;

/// Numeric vector; the value of a rank-1 expression
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector<T = f64> {
    elements: Vec<T>,
}

impl<T: MathScalar> Vector<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Vector { elements }
    }

    pub fn zeros(size: usize) -> Self {
        Vector::new(vec![T::zero(); size])
    }

    /// Unit vector along `index`
    pub fn elemental(size: usize, index: usize) -> Self {
        Vector::from_fn(size, |i| if i == index { T::one() } else { T::zero() })
    }

    pub fn from_fn(size: usize, f: impl FnMut(usize) -> T) -> Self {
        Vector::new((0..size).map(f).collect())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.elements
    }

    /// Inner product over the common length
    pub fn dot(&self, other: &Vector<T>) -> T {
        self.iter()
            .zip(other.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    /// `self·otherᵀ`
    pub fn outer(&self, other: &Vector<T>) -> JaggedMatrix<T> {
        JaggedMatrix::from_fn(self.len(), other.len(), |i, j| self[i] * other[j])
    }

    pub fn scale(&self, factor: T) -> Self {
        self.map(|x| factor * x)
    }

    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }

    /// Copy with `value` appended
    pub fn append(&self, value: T) -> Self {
        let mut elements = self.elements.clone();
        elements.push(value);
        Vector::new(elements)
    }

    pub fn concat(&self, other: &Vector<T>) -> Self {
        let mut elements = self.elements.clone();
        elements.extend_from_slice(&other.elements);
        Vector::new(elements)
    }

    /// Leading part and last element; `None` for fewer than two elements
    pub fn split_last(&self) -> Option<(Vector<T>, T)> {
        if self.len() < 2 {
            return None;
        }
        let (last, rest) = self.elements.split_last()?;
        Some((Vector::new(rest.to_vec()), *last))
    }

    pub(crate) fn map(&self, f: impl Fn(T) -> T) -> Self {
        Vector::new(self.iter().map(|&x| f(x)).collect())
    }

    fn zip_with(&self, other: &Vector<T>, f: impl Fn(T, T) -> T) -> Self {
        debug_assert_eq!(self.len(), other.len(), "vector lengths differ");
        Vector::new(
            self.iter()
                .zip(other.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        )
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(elements: Vec<T>) -> Self {
        Vector { elements }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Vector {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.elements[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.elements[index]
    }
}

impl<T: MathScalar> Add for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: &Vector<T>) -> Vector<T> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: MathScalar> Add for Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: Vector<T>) -> Vector<T> {
        &self + &rhs
    }
}

impl<T: MathScalar> Sub for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: &Vector<T>) -> Vector<T> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: MathScalar> Sub for Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: Vector<T>) -> Vector<T> {
        &self - &rhs
    }
}

impl<T: MathScalar> Neg for Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        self.map(|x| -x)
    }
}

impl<T: MathScalar> Mul<T> for Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: T) -> Vector<T> {
        self.scale(rhs)
    }
}

impl Mul<Vector<f64>> for f64 {
    type Output = Vector<f64>;

    fn mul(self, rhs: Vector<f64>) -> Vector<f64> {
        rhs.scale(self)
    }
}

impl<T: MathScalar> Div<T> for Vector<T> {
    type Output = Vector<T>;

    fn div(self, rhs: T) -> Vector<T> {
        self.map(|x| x / rhs)
    }
}

impl<T: MathScalar> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self
            .iter()
            .map(|x| format_g(x.to_f64().unwrap_or(f64::NAN)))
            .collect();
        if show_as_table() {
            let rows: Vec<Vec<String>> = cells.into_iter().map(|cell| vec![cell]).collect();
            return f.write_str(&format_table(&rows));
        }
        write!(f, "[{}]", cells.join(","))
    }
}
