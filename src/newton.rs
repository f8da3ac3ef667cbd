//! Newton–Raphson root finding on compiled functions
//!
//! # Example
//! ```
//! use expr_algebra::{parse, Function, NewtonRaphson};
//!
//! let f = Function::new("f", parse("7*sin(x) - 3*x").unwrap(), &["x"]).unwrap();
//! let report = NewtonRaphson::new().solve(&f, &[3.0]).unwrap();
//! assert!(report.converged);
//! let x = report.solution.as_scalar().unwrap();
//! assert!((7.0 * x.sin() - 3.0 * x).abs() < 1e-11);
//! ```

use log::{debug, warn};

use crate::error::ExprError;
use crate::function::Function;
use crate::linalg::{Quantity, Vector};

/// Options for [`NewtonRaphson::solve`].
///
/// Iterates until `|f(x) - target| <= tolerance` or `max_iter` steps were
/// taken. Each step is halved while it does not reduce the error, down to a
/// fraction of `1/max_iter`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRaphson {
    target: f64,
    tolerance: f64,
    max_iter: usize,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self {
            target: 0.0,
            tolerance: 1e-11,
            max_iter: 100,
        }
    }
}

/// Outcome of a solve. Running out of iterations is not an error; the
/// best iterate is returned with `converged == false`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonReport {
    /// Scalar for one argument, vector for two
    pub solution: Quantity,
    pub iterations: usize,
    /// `|f(solution) - target|`
    pub residual: f64,
    pub converged: bool,
}

impl NewtonRaphson {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value `f` should reach
    pub fn target(mut self, target: f64) -> Self {
        self.target = target;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    /// Find `x` with `f(x) = target` starting from `initial`.
    ///
    /// `f` must be scalar with one or two arguments and `initial` must hold
    /// one value per argument, otherwise [`ExprError::UnsupportedArity`].
    /// With two arguments the step is the smallest one that zeroes the
    /// linearization.
    pub fn solve(&self, f: &Function, initial: &[f64]) -> Result<NewtonReport, ExprError> {
        let arguments = f.args().len();
        if f.rank() != 0 || initial.len() != arguments {
            return Err(ExprError::UnsupportedArity {
                operation: "Newton-Raphson",
                arguments: initial.len(),
            });
        }
        match arguments {
            1 => self.solve_1d(f, initial[0]),
            2 => self.solve_2d(f, initial[0], initial[1]),
            _ => Err(ExprError::UnsupportedArity {
                operation: "Newton-Raphson",
                arguments,
            }),
        }
    }

    fn min_step(&self) -> f64 {
        1.0 / self.max_iter as f64
    }

    fn solve_1d(&self, f: &Function, mut x: f64) -> Result<NewtonReport, ExprError> {
        let fx = f.compile_arg1()?;
        let fx_x = f.partial_derivative(&f.args()[0]).compile_arg1()?;

        let mut error = (fx.call(x) - self.target).abs();
        let mut iterations = 0;
        while error > self.tolerance && iterations < self.max_iter {
            iterations += 1;
            let dx = -(fx.call(x) - self.target) / fx_x.call(x);
            let previous = error;
            let mut lambda = 1.0;
            error = (fx.call(x + dx) - self.target).abs();
            while error >= previous && lambda > self.min_step() {
                lambda /= 2.0;
                error = (fx.call(x + lambda * dx) - self.target).abs();
            }
            x += lambda * dx;
            debug!("newton iteration {iterations}: x = {x}, error = {error:e}, step = {lambda}");
        }
        Ok(self.report(Quantity::Scalar(x), iterations, error))
    }

    fn solve_2d(&self, f: &Function, mut x: f64, mut y: f64) -> Result<NewtonReport, ExprError> {
        let fxy = f.compile_arg2()?;
        let fxy_x = f.partial_derivative(&f.args()[0]).compile_arg2()?;
        let fxy_y = f.partial_derivative(&f.args()[1]).compile_arg2()?;

        let mut error = (fxy.call(x, y) - self.target).abs();
        let mut iterations = 0;
        while error > self.tolerance && iterations < self.max_iter {
            iterations += 1;
            let residual = fxy.call(x, y) - self.target;
            let (gx, gy) = (fxy_x.call(x, y), fxy_y.call(x, y));
            let scale = -residual / (gx * gx + gy * gy);
            let (dx, dy) = (scale * gx, scale * gy);
            let previous = error;
            let mut lambda = 1.0;
            error = (fxy.call(x + dx, y + dy) - self.target).abs();
            while error >= previous && lambda > self.min_step() {
                lambda /= 2.0;
                error = (fxy.call(x + lambda * dx, y + lambda * dy) - self.target).abs();
            }
            x += lambda * dx;
            y += lambda * dy;
            debug!("newton iteration {iterations}: (x, y) = ({x}, {y}), error = {error:e}, step = {lambda}");
        }
        Ok(self.report(
            Quantity::Vector(Vector::new(vec![x, y])),
            iterations,
            error,
        ))
    }

    fn report(&self, solution: Quantity, iterations: usize, residual: f64) -> NewtonReport {
        let converged = residual <= self.tolerance;
        if !converged {
            warn!(
                "Newton-Raphson stopped after {iterations} iteration(s) with error {residual:e} above tolerance {:e}",
                self.tolerance
            );
        }
        NewtonReport {
            solution,
            iterations,
            residual,
            converged,
        }
    }
}
