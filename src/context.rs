//! Named-constant table

use log::debug;
use rustc_hash::FxHashMap;

use crate::algebra::vectorizable;
use crate::error::ExprError;
use crate::linalg::Quantity;
use crate::{Expr, ExprKind};

/// Golden ratio
const PHI: f64 = 1.618_033_988_749_895;

const BUILTIN_CONSTANTS: [(&str, f64); 3] = [
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("Φ", PHI),
];

/// Named constants known while parsing and evaluating.
///
/// `pi`, `e` and `Φ` are always defined. Parsing `a = 3` through a context
/// registers `a`, and later parses in the same context read `a` as that
/// constant.
///
/// ```
/// use expr_algebra::Context;
///
/// let mut ctx = Context::new();
/// ctx.parse("g = 9.81").unwrap();
/// let drop = ctx.parse("g*t^2/2").unwrap();
/// let h = ctx.eval(&drop, &[("t", 2.0)]).unwrap().as_scalar().unwrap();
/// assert!((h - 19.62).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    constants: FxHashMap<String, f64>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every registered constant; built-ins stay
    pub fn clear(&mut self) {
        self.constants.clear();
    }

    /// Number of registered (non built-in) constants
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// The named constant `name`, if defined
    pub fn get(&self, name: &str) -> Option<Expr> {
        self.value_of(name)
            .map(|value| Expr::named_constant(name, value))
    }

    fn value_of(&self, name: &str) -> Option<f64> {
        BUILTIN_CONSTANTS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|&(_, value)| value)
            .or_else(|| self.constants.get(name).copied())
    }

    /// Register `name = value`.
    ///
    /// Defining an existing name again with the same value is accepted;
    /// a different value is an error.
    pub fn define(&mut self, name: &str, value: f64) -> Result<Expr, ExprError> {
        if let Some(existing) = self.value_of(name) {
            if existing.to_bits() != value.to_bits() {
                return Err(ExprError::ConstantRedefinition {
                    name: name.to_owned(),
                    existing,
                    requested: value,
                });
            }
        } else {
            debug!("defining constant {name} = {value}");
            self.constants.insert(name.to_owned(), value);
        }
        Ok(Expr::named_constant(name, value))
    }

    /// `target = value`; a symbol assigned a number becomes a named constant
    pub fn assign(&mut self, target: Expr, value: Expr) -> Result<Expr, ExprError> {
        if let Some(pairs) = vectorizable(&target, &value, false) {
            let items = pairs
                .into_iter()
                .map(|(t, v)| self.assign(t, v))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Expr::array_node(items));
        }
        if let (Some(name), Some(number)) = (target.as_symbol(), value.as_number(true)) {
            return self.define(name, number);
        }
        Ok(Expr::assign(target, value))
    }

    pub fn parse(&mut self, text: &str) -> Result<Expr, ExprError> {
        crate::parser::parse_in(text, self)
    }

    pub fn try_parse(&mut self, text: &str) -> Option<Expr> {
        self.parse(text).ok()
    }

    /// Replace free symbols that name constants with those constants
    pub fn substitute_constants(&self, expr: &Expr) -> Expr {
        let names: Vec<(String, Expr)> = expr
            .symbols(false)
            .into_iter()
            .filter_map(|name| self.get(&name).map(|c| (name, c)))
            .collect();
        if names.is_empty() {
            return expr.clone();
        }
        let pairs: Vec<(&str, Expr)> = names
            .iter()
            .map(|(name, c)| (name.as_str(), c.clone()))
            .collect();
        expr.substitute_all(&pairs)
    }

    /// Evaluate with this context's constants in scope
    pub fn eval(&self, expr: &Expr, bindings: &[(&str, f64)]) -> Result<Quantity, ExprError> {
        self.substitute_constants(expr).eval(bindings)
    }

    /// Whether `expr` is a constant registered in this context
    pub fn contains(&self, expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::NamedConstant { name, value } => {
                self.value_of(name).map(f64::to_bits) == Some(value.to_bits())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let ctx = Context::new();
        assert_eq!(ctx.get("pi"), Some(Expr::pi()));
        assert_eq!(ctx.get("e"), Some(Expr::e()));
        assert_eq!(ctx.get("Φ").and_then(|c| c.as_number(true)), Some(PHI));
        assert_eq!(ctx.get("x"), None);
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_define_and_redefine() {
        let mut ctx = Context::new();
        let a = ctx.define("a", 3.0).unwrap();
        assert_eq!(a, Expr::named_constant("a", 3.0));
        assert!(ctx.define("a", 3.0).is_ok());
        assert_eq!(
            ctx.define("a", 4.0),
            Err(ExprError::ConstantRedefinition {
                name: "a".into(),
                existing: 3.0,
                requested: 4.0
            })
        );
        assert!(matches!(
            ctx.define("pi", 3.0),
            Err(ExprError::ConstantRedefinition { .. })
        ));
        assert_eq!(ctx.len(), 1);
        ctx.clear();
        assert!(ctx.define("a", 4.0).is_ok());
    }

    #[test]
    fn test_assignment_registers_constants() {
        let mut ctx = Context::new();
        let a = ctx.parse("a = 2").unwrap();
        assert_eq!(a, Expr::named_constant("a", 2.0));
        assert!(ctx.contains(&a));

        let e = ctx.parse("a*x").unwrap();
        assert_eq!(e.symbols(true), vec!["x"]);
        assert_eq!(ctx.eval(&e, &[("x", 4.0)]).unwrap(), Quantity::Scalar(8.0));

        // symbolic right-hand sides stay assignments
        let eq = ctx.parse("y = 2*x").unwrap();
        assert!(eq.as_assign().is_some());
    }

    #[test]
    fn test_array_assignment() {
        let mut ctx = Context::new();
        ctx.parse("[p,q] = [1,2]").unwrap();
        assert_eq!(ctx.get("q"), Some(Expr::named_constant("q", 2.0)));
    }

    #[test]
    fn test_contexts_are_independent() {
        let mut first = Context::new();
        first.parse("k = 5").unwrap();
        let second = Context::new();
        assert_eq!(second.get("k"), None);
    }

    #[test]
    fn test_substitute_constants() {
        let mut ctx = Context::new();
        ctx.define("c", 2.0).unwrap();
        let e = Expr::mul_expr(Expr::variable("c"), Expr::variable("x"));
        let bound = ctx.substitute_constants(&e);
        assert_eq!(
            bound,
            Expr::mul_expr(Expr::named_constant("c", 2.0), Expr::variable("x"))
        );
    }
}
