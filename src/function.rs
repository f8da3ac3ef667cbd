//! Named functions with an explicit argument list

use std::fmt;

use crate::error::ExprError;
use crate::evaluator::{CompiledFunction, FArg0, FArg1, FArg2, FArg3, FArg4, QArg0, QArg1, QArg2};
use crate::linalg::Quantity;
use crate::Expr;

/// A body expression bound to an ordered argument list.
///
/// Every free symbol of the body must be an argument, which is what makes
/// the function compilable.
///
/// ```
/// use expr_algebra::{parse, Function};
///
/// let f = Function::new("f", parse("x^2 + y").unwrap(), &["x", "y"]).unwrap();
/// assert_eq!(f.to_string(), "f(x,y) = x^2 + y");
///
/// let fx = f.partial_derivative("x");
/// assert_eq!(fx.name(), "f_x");
/// assert_eq!(fx.compile_arg2().unwrap().call(3.0, 1.0), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    name: String,
    body: Expr,
    args: Vec<String>,
}

impl Function {
    /// Fails with [`ExprError::MissingArgument`] when the body uses a symbol
    /// that is not in `args`.
    pub fn new(name: &str, body: Expr, args: &[&str]) -> Result<Self, ExprError> {
        Self::with_args(name, body, args.iter().map(|a| (*a).to_owned()).collect())
    }

    /// Use the body's own symbols as arguments, in order of appearance or
    /// sorted when `alphabetical`
    pub fn from_expr(name: &str, body: Expr, alphabetical: bool) -> Self {
        let args = body.symbols(alphabetical);
        Self {
            name: name.to_owned(),
            body,
            args,
        }
    }

    fn with_args(name: &str, body: Expr, args: Vec<String>) -> Result<Self, ExprError> {
        let missing: Vec<String> = body
            .symbols(true)
            .into_iter()
            .filter(|symbol| !args.contains(symbol))
            .collect();
        if !missing.is_empty() {
            return Err(ExprError::MissingArgument {
                function: name.to_owned(),
                missing,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            body,
            args,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }

    pub fn rank(&self) -> usize {
        self.body.rank()
    }

    // ===== Calculus =====

    /// Derivative in `var`, named `{name}_{var}`, with the same arguments
    pub fn partial_derivative(&self, var: &str) -> Function {
        Function {
            name: format!("{}_{}", self.name, var),
            body: self.body.partial_derivative(var),
            args: self.args.clone(),
        }
    }

    /// Chain rule over `(argument, rate)` pairs.
    ///
    /// Rates given as plain symbols are appended to the argument list.
    pub fn total_derivative(&self, name: &str, pairs: &[(&str, Expr)]) -> Result<Function, ExprError> {
        let mut args = self.args.clone();
        let body = self.body.total_derivative(pairs, &mut args);
        Self::with_args(name, body, args)
    }

    /// Time derivative with every argument `q` moving at rate `q̇`
    pub fn time_derivative(&self, name: &str) -> Function {
        let rates: Vec<String> = self.args.iter().map(|a| Expr::rate_symbol(a)).collect();
        let pairs: Vec<(&str, Expr)> = self
            .args
            .iter()
            .zip(&rates)
            .map(|(arg, rate)| (arg.as_str(), Expr::variable(rate)))
            .collect();
        let mut args = self.args.clone();
        let body = self.body.total_derivative(&pairs, &mut args);
        Function {
            name: name.to_owned(),
            body,
            args,
        }
    }

    /// Partial derivatives in each argument, see [`Expr::jacobian`]
    pub fn jacobian(&self) -> Result<Expr, ExprError> {
        self.body.jacobian(&self.arg_refs())
    }

    // ===== Algebra =====

    /// Replace argument `symbol` with `value` and drop it from the
    /// argument list. Symbols introduced by `value` must already be
    /// arguments.
    pub fn substitute(&self, symbol: &str, value: &Expr) -> Result<Function, ExprError> {
        let args = self.args.iter().filter(|a| a.as_str() != symbol).cloned().collect();
        Self::with_args(&self.name, self.body.substitute(symbol, value), args)
    }

    /// Fix some arguments to numbers
    pub fn substitute_values(&self, pairs: &[(&str, f64)]) -> Function {
        Function {
            name: self.name.clone(),
            body: self.body.substitute_values(pairs),
            args: self
                .args
                .iter()
                .filter(|a| !pairs.iter().any(|(symbol, _)| *symbol == a.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Interpret the body with one value per argument
    pub fn eval(&self, values: &[f64]) -> Result<Quantity, ExprError> {
        if values.len() != self.args.len() {
            return Err(ExprError::UnsupportedArity {
                operation: "function evaluation",
                arguments: values.len(),
            });
        }
        let bindings: Vec<(&str, f64)> = self
            .args
            .iter()
            .map(String::as_str)
            .zip(values.iter().copied())
            .collect();
        self.body.eval(&bindings)
    }

    // ===== Compiling =====

    pub fn compile(&self) -> Result<CompiledFunction, ExprError> {
        CompiledFunction::compile(&self.body, &self.arg_refs())
    }

    pub fn compile_arg0(&self) -> Result<FArg0, ExprError> {
        FArg0::try_from(self.compile()?)
    }

    pub fn compile_arg1(&self) -> Result<FArg1, ExprError> {
        FArg1::try_from(self.compile()?)
    }

    pub fn compile_arg2(&self) -> Result<FArg2, ExprError> {
        FArg2::try_from(self.compile()?)
    }

    pub fn compile_arg3(&self) -> Result<FArg3, ExprError> {
        FArg3::try_from(self.compile()?)
    }

    pub fn compile_arg4(&self) -> Result<FArg4, ExprError> {
        FArg4::try_from(self.compile()?)
    }

    pub fn compile_quantity_arg0(&self) -> Result<QArg0, ExprError> {
        QArg0::try_from(self.compile()?)
    }

    pub fn compile_quantity_arg1(&self) -> Result<QArg1, ExprError> {
        QArg1::try_from(self.compile()?)
    }

    pub fn compile_quantity_arg2(&self) -> Result<QArg2, ExprError> {
        QArg2::try_from(self.compile()?)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) = {}", self.name, self.args.join(","), self.body)
    }
}
