//! Parser module - converts strings to expressions
mod lexer;
mod pratt;

pub use pratt::MAX_NESTING_DEPTH;

use std::str::FromStr;

use crate::context::Context;
use crate::error::ExprError;
use crate::Expr;

/// Parse a formula into a normalized expression.
///
/// Operators by increasing precedence: `=`, `+ -`, `* /`, `^`, prefix
/// `- +`. All binary operators are left-associative and prefix minus binds
/// tighter than `^`, so `-x^2` is `(-x)^2` and `2^3^2` is `64`.
///
/// Besides the unary functions (`sin`, `sqrt`, `sind`, ...) calls may use
/// `log(x, base)`, `pow(x, y)`, `sum(...)`, `norm(...)`, `dot(a, b)`,
/// `cross(a, b)`, `outer(a, b)` and `hypot(a, b)`. Brackets build vectors and
/// matrices. `pi`, `e` and `Φ` are constants; `a = 3` defines a constant in
/// a throwaway [`Context`], use [`Context::parse`] to keep it.
///
/// ```
/// use expr_algebra::parse;
///
/// let expr = parse("x^2 + sin(x)").unwrap();
/// assert_eq!(expr.to_string(), "x^2 + sin(x)");
/// assert!(parse("x +").is_err());
/// ```
pub fn parse(input: &str) -> Result<Expr, ExprError> {
    Context::new().parse(input)
}

/// [`parse`] without the error details
pub fn try_parse(input: &str) -> Option<Expr> {
    parse(input).ok()
}

pub(crate) fn parse_in(input: &str, context: &mut Context) -> Result<Expr, ExprError> {
    if input.trim().is_empty() {
        return Err(ExprError::syntax("Empty expression"));
    }
    let tokens = lexer::tokenize(input)?;
    pratt::parse_statement(&tokens, input.len(), context)
}

impl FromStr for Expr {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;

    fn x() -> Expr {
        Expr::variable("x")
    }

    #[test]
    fn test_precedence() {
        let e = parse("x + 2*3").unwrap();
        assert_eq!(e, Expr::add_expr(x(), Expr::constant(6.0)));
        let e = parse("(x + 1)*2").unwrap();
        assert_eq!(
            e,
            Expr::mul_expr(Expr::add_expr(x(), Expr::one()), Expr::constant(2.0))
        );
    }

    #[test]
    fn test_left_associative_power() {
        assert_eq!(parse("2^3^2").unwrap(), Expr::constant(64.0));
    }

    #[test]
    fn test_prefix_minus_binds_tighter_than_power() {
        let e = parse("-x^2").unwrap();
        assert_eq!(e, Expr::pow_expr(Expr::negate(x()), Expr::constant(2.0)));
        assert_eq!(parse("-2^2").unwrap(), Expr::constant(4.0));
        assert_eq!(parse("--x").unwrap(), x());
        assert_eq!(parse("+x").unwrap(), x());
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(parse("sin(x)").unwrap(), x().sin());
        assert_eq!(
            parse("log(x, 10)").unwrap(),
            Expr::log(x(), Expr::constant(10.0))
        );
        assert_eq!(parse("pow(x, 3)").unwrap(), parse("x^3").unwrap());
        assert_eq!(parse("hypot(3, 4)").unwrap(), Expr::constant(5.0));
        assert_eq!(parse("sum(1, x, 2)").unwrap(), parse("x + 3").unwrap());
        assert_eq!(parse("dot([1,2],[3,4])").unwrap(), Expr::constant(11.0));
        assert_eq!(parse("norm([3,4])").unwrap(), Expr::constant(5.0));
    }

    #[test]
    fn test_named_constants() {
        assert_eq!(parse("pi").unwrap(), Expr::pi());
        assert_eq!(parse("e").unwrap(), Expr::e());
        assert_eq!(parse("Φ").unwrap().symbols(false), Vec::<String>::new());
    }

    #[test]
    fn test_arrays() {
        let v = parse("[1, x, 3]").unwrap();
        assert_eq!(v.rank(), 1);
        let m = parse("[[1,2],[3,4]]").unwrap();
        assert_eq!(m.rank(), 2);
        assert_eq!(parse("[x]").unwrap(), x());
        assert_eq!(parse("[]").unwrap(), Expr::zero());
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse(""), Err(ExprError::Syntax { .. })));
        assert!(matches!(parse("x +"), Err(ExprError::Syntax { .. })));
        assert!(matches!(parse("(x"), Err(ExprError::Syntax { .. })));
        assert!(matches!(parse("x)"), Err(ExprError::Syntax { .. })));
        assert!(matches!(parse("foo(x)"), Err(ExprError::Syntax { .. })));
        assert!(matches!(parse("sin(x, y)"), Err(ExprError::Syntax { .. })));
        assert!(matches!(parse("v[1]"), Err(ExprError::Syntax { .. })));
        assert!(try_parse("1 +* 2").is_none());

        let err = parse("x )").unwrap_err();
        assert_eq!(
            err,
            ExprError::syntax_at("Unexpected ')' at end of expression", Span::at(2))
        );
    }

    #[test]
    fn test_shape_errors_surface() {
        assert!(matches!(
            parse("[1,2] + [1,2,3]"),
            Err(ExprError::DimensionMismatch(_))
        ));
        assert!(matches!(
            parse("[[[1,2],[3,4]],[[1,2],[3,4]]]"),
            Err(ExprError::UnsupportedRank { rank: 3 })
        ));
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let deep = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));
        match parse(&deep) {
            Err(ExprError::Syntax { message, span }) => {
                assert!(message.contains("nested"));
                assert!(span.is_some());
            }
            other => panic!("expected a syntax error, got {other:?}"),
        }
        assert!(matches!(
            parse(&format!("{}x", "-".repeat(10_000))),
            Err(ExprError::Syntax { .. })
        ));
        assert!(matches!(
            parse(&format!("{}x{}", "sin(".repeat(1_000), ")".repeat(1_000))),
            Err(ExprError::Syntax { .. })
        ));

        let moderate = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&moderate).unwrap(), x());
        let half = MAX_NESTING_DEPTH / 2;
        let nested = format!("{}x{}", "[".repeat(half), "]".repeat(half));
        assert_eq!(parse(&nested).unwrap(), x());
    }

    #[test]
    fn test_from_str() {
        let e: Expr = "2*x".parse().unwrap();
        assert_eq!(e, Expr::mul_expr(Expr::constant(2.0), x()));
    }
}
