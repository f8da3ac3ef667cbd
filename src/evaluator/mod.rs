//! Compiled evaluation.
//!
//! ```text
//! ┌─────────────┐    ┌────────────┐    ┌──────────────────────┐
//! │    Expr     │ -> │  Compiler  │ -> │   CompiledFunction   │
//! │ (AST Tree)  │    │ (Bytecode) │    │   (Stack Machine)    │
//! └─────────────┘    └────────────┘    └──────────────────────┘
//! ```
//!
//! Compilation resolves every symbol to a parameter slot once, so calling
//! the result never walks the tree. The instructions apply the same
//! operator functions as [`Expr::eval`], which makes compiled and
//! interpreted results bit-identical.
//!
//! ```
//! use expr_algebra::{parse, CompiledFunction};
//!
//! let expr = parse("sin(x)*cos(x) + x^2").unwrap();
//! let compiled = CompiledFunction::compile(&expr, &["x"]).unwrap();
//! let value = compiled.call_scalar(&[0.5]).unwrap();
//! assert_eq!(value, expr.eval(&[("x", 0.5)]).unwrap().as_scalar().unwrap());
//! ```

mod compiler;
mod execution;
mod instruction;

pub use compiler::MAX_STACK_DEPTH;

use compiler::{Compiler, Program};
use execution::Stack;
use log::debug;

use crate::Expr;
use crate::error::ExprError;
use crate::linalg::{JaggedMatrix, Quantity, Vector};

/// Output layout of a compiled body
#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Scalar,
    Vector(usize),
    /// Row lengths of a (possibly jagged) matrix
    Matrix(Vec<usize>),
}

/// Expression compiled to bytecode for repeated numeric evaluation.
///
/// Immutable after compilation and `Send + Sync`; every call runs on its
/// own stack.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    program: Program,
    params: Box<[String]>,
    shape: Shape,
    source: String,
}

impl CompiledFunction {
    /// Compile `expr` with `params` as the argument order.
    ///
    /// Every free symbol of `expr` must be listed in `params`
    /// ([`ExprError::UnresolvedSymbol`] otherwise). Vector and matrix
    /// bodies compile each element; the result keeps their shape.
    pub fn compile(expr: &Expr, params: &[&str]) -> Result<Self, ExprError> {
        let params: Vec<String> = params.iter().map(|p| (*p).to_owned()).collect();
        let mut compiler = Compiler::new(&params);

        let shape = match expr.as_array() {
            None => {
                compiler.compile_expr(expr)?;
                Shape::Scalar
            }
            Some(items) if items.iter().all(|item| !item.is_array()) => {
                for item in items {
                    compiler.compile_expr(item)?;
                }
                Shape::Vector(items.len())
            }
            Some(rows) => {
                let mut lengths = Vec::with_capacity(rows.len());
                for row in rows {
                    let cells = row.to_slice();
                    if cells.iter().any(Expr::is_array) {
                        return Err(ExprError::UnsupportedRank { rank: 3 });
                    }
                    for cell in cells {
                        compiler.compile_expr(cell)?;
                    }
                    lengths.push(cells.len());
                }
                Shape::Matrix(lengths)
            }
        };

        let program = compiler.into_program();
        debug!(
            "compiled '{}': {} instruction(s), {} constant(s), stack depth {}, {} cache slot(s)",
            expr,
            program.instructions.len(),
            program.constants.len(),
            program.stack_size,
            program.cache_size
        );
        Ok(Self {
            program,
            params: params.into_boxed_slice(),
            shape,
            source: expr.to_string(),
        })
    }

    /// Parameter names in call order
    pub fn param_names(&self) -> &[String] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn instruction_count(&self) -> usize {
        self.program.instructions.len()
    }

    /// Stack slots a call needs
    pub fn stack_size(&self) -> usize {
        self.program.stack_size
    }

    /// 0 for a scalar result, 1 for a vector, 2 for a matrix
    pub fn rank(&self) -> usize {
        match self.shape {
            Shape::Scalar => 0,
            Shape::Vector(_) => 1,
            Shape::Matrix(_) => 2,
        }
    }

    fn check_arguments(&self, args: &[f64]) -> Result<(), ExprError> {
        if args.len() == self.params.len() {
            Ok(())
        } else {
            Err(ExprError::UnsupportedArity {
                operation: "compiled function call",
                arguments: args.len(),
            })
        }
    }

    /// Evaluate with one value per parameter
    pub fn call(&self, args: &[f64]) -> Result<Quantity, ExprError> {
        self.check_arguments(args)?;
        Ok(self.quantity_unchecked(args))
    }

    /// Evaluate a scalar body
    pub fn call_scalar(&self, args: &[f64]) -> Result<f64, ExprError> {
        self.check_arguments(args)?;
        if self.shape != Shape::Scalar {
            return Err(ExprError::NotAConstant(self.source.clone()));
        }
        Ok(self.scalar_unchecked(args))
    }

    /// Evaluate at each point in turn
    pub fn eval_batch<P: AsRef<[f64]>>(&self, points: &[P]) -> Result<Vec<Quantity>, ExprError> {
        points.iter().map(|p| self.call(p.as_ref())).collect()
    }

    fn scalar_unchecked(&self, args: &[f64]) -> f64 {
        self.program
            .execute(args)
            .last()
            .copied()
            .unwrap_or(f64::NAN)
    }

    fn quantity_unchecked(&self, args: &[f64]) -> Quantity {
        let stack = self.program.execute(args);
        to_quantity(&self.shape, stack)
    }

    /// Check a typed signature before wrapping
    fn expect_signature(&self, arity: usize, scalar: bool) -> Result<(), ExprError> {
        if self.params.len() != arity || (scalar && self.shape != Shape::Scalar) {
            return Err(ExprError::UnsupportedArity {
                operation: if scalar {
                    "scalar function"
                } else {
                    "array function"
                },
                arguments: self.params.len(),
            });
        }
        Ok(())
    }
}

fn to_quantity(shape: &Shape, stack: Stack) -> Quantity {
    match shape {
        Shape::Scalar => Quantity::Scalar(stack.last().copied().unwrap_or(f64::NAN)),
        Shape::Vector(_) => Quantity::Vector(Vector::new(stack.into_vec())),
        Shape::Matrix(lengths) => {
            let mut values = stack.into_iter();
            let rows = lengths
                .iter()
                .map(|&n| values.by_ref().take(n).collect())
                .collect();
            Quantity::Matrix(JaggedMatrix::new(rows))
        }
    }
}

macro_rules! scalar_signature {
    ($name:ident, $arity:literal $(, $arg:ident)*) => {
        #[doc = concat!("Compiled scalar function of ", stringify!($arity), " argument(s)")]
        #[derive(Debug, Clone)]
        pub struct $name(CompiledFunction);

        impl $name {
            #[inline]
            pub fn call(&self $(, $arg: f64)*) -> f64 {
                self.0.scalar_unchecked(&[$($arg),*])
            }

            pub fn compiled(&self) -> &CompiledFunction {
                &self.0
            }
        }

        impl TryFrom<CompiledFunction> for $name {
            type Error = ExprError;

            fn try_from(function: CompiledFunction) -> Result<Self, Self::Error> {
                function.expect_signature($arity, true)?;
                Ok(Self(function))
            }
        }
    };
}

macro_rules! quantity_signature {
    ($name:ident, $arity:literal $(, $arg:ident)*) => {
        #[doc = concat!("Compiled function of ", stringify!($arity), " argument(s) with a vector or matrix result")]
        #[derive(Debug, Clone)]
        pub struct $name(CompiledFunction);

        impl $name {
            pub fn call(&self $(, $arg: f64)*) -> Quantity {
                self.0.quantity_unchecked(&[$($arg),*])
            }

            pub fn compiled(&self) -> &CompiledFunction {
                &self.0
            }
        }

        impl TryFrom<CompiledFunction> for $name {
            type Error = ExprError;

            fn try_from(function: CompiledFunction) -> Result<Self, Self::Error> {
                function.expect_signature($arity, false)?;
                Ok(Self(function))
            }
        }
    };
}

scalar_signature!(FArg0, 0);
scalar_signature!(FArg1, 1, x);
scalar_signature!(FArg2, 2, x, y);
scalar_signature!(FArg3, 3, x, y, z);
scalar_signature!(FArg4, 4, x, y, z, w);
quantity_signature!(QArg0, 0);
quantity_signature!(QArg1, 1, x);
quantity_signature!(QArg2, 2, x, y);
