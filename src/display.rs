//! Text formatting for expressions and numeric containers.
//!
//! Expressions print in the syntax accepted by the parser with the minimum
//! parentheses needed to read back the same tree. Numbers use six
//! significant digits.

use crate::functions::{BinaryOp, UnaryOp};
use crate::{Expr, ExprKind};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

const SIGNIFICANT_DIGITS: usize = 6;

static SHOW_AS_TABLE: AtomicBool = AtomicBool::new(false);

/// Print arrays as aligned `| a b |` rows instead of `[a,b]`.
///
/// Process-wide; affects expressions, vectors and matrices alike.
pub fn set_show_as_table(enabled: bool) {
    SHOW_AS_TABLE.store(enabled, Ordering::Relaxed);
}

pub fn show_as_table() -> bool {
    SHOW_AS_TABLE.load(Ordering::Relaxed)
}

/// Shortest of fixed or scientific notation with six significant digits
pub(crate) fn format_g(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -5 || exponent >= SIGNIFICANT_DIGITS as i32 {
        return format!("{}e{}", trim_fraction(mantissa), exponent);
    }
    let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_owned()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Right-aligned columns, one `| ... |` line per row, starting on a new line
pub(crate) fn format_table(rows: &[Vec<String>]) -> String {
    let width = rows
        .iter()
        .flatten()
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
        .max(3);
    let mut out = String::from("\n");
    for row in rows {
        out.push('|');
        for cell in row {
            out.push_str(&format!(" {cell:>width$}"));
        }
        out.push_str(" |\n");
    }
    out
}

/// Binding strength of the outermost operator; operands that bind less
/// tightly than their position requires are parenthesized
fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Assign { .. } => 1,
        ExprKind::Binary { op, .. } => match op {
            BinaryOp::Add | BinaryOp::Sub => 2,
            BinaryOp::Mul | BinaryOp::Div => 3,
            BinaryOp::Pow => 4,
            BinaryOp::Log => 6,
        },
        ExprKind::Unary {
            op: UnaryOp::Inverse,
            ..
        } => 3,
        ExprKind::Unary {
            op: UnaryOp::Negate,
            ..
        } => 5,
        ExprKind::Constant(v) if *v < 0.0 => 5,
        _ => 6,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

/// Binary operators are left-associative, so a right operand of equal
/// precedence needs parentheses
fn write_infix(
    f: &mut fmt::Formatter<'_>,
    left: &Expr,
    symbol: &str,
    right: &Expr,
    level: u8,
) -> fmt::Result {
    write_operand(f, left, precedence(left) < level)?;
    f.write_str(symbol)?;
    write_operand(f, right, precedence(right) <= level)
}

fn array_cells(items: &[Expr]) -> Vec<Vec<String>> {
    if items.iter().any(Expr::is_array) {
        items
            .iter()
            .map(|row| row.to_slice().iter().map(Expr::to_string).collect())
            .collect()
    } else {
        items.iter().map(|item| vec![item.to_string()]).collect()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Constant(v) => f.write_str(&format_g(*v)),
            ExprKind::NamedConstant { name, .. } => f.write_str(name),
            ExprKind::Variable(name) => f.write_str(name),

            ExprKind::Unary {
                op: UnaryOp::Negate,
                arg,
            } => {
                f.write_str("-")?;
                write_operand(f, arg, precedence(arg) < 5)
            }
            ExprKind::Unary {
                op: UnaryOp::Inverse,
                arg,
            } => {
                f.write_str("1/")?;
                write_operand(f, arg, precedence(arg) <= 3)
            }
            ExprKind::Unary { op, arg } => write!(f, "{}({})", op.name(), arg),

            ExprKind::Binary {
                op: BinaryOp::Log,
                left,
                right,
            } => write!(f, "log({left},{right})"),
            ExprKind::Binary { op, left, right } => {
                let symbol = match op {
                    BinaryOp::Add => " + ",
                    BinaryOp::Sub => " - ",
                    BinaryOp::Mul => "*",
                    BinaryOp::Div => "/",
                    _ => "^",
                };
                write_infix(f, left, symbol, right, precedence(self))
            }

            ExprKind::Assign { target, value } => write!(f, "{target} = {value}"),

            ExprKind::Array(items) => {
                if show_as_table() {
                    return f.write_str(&format_table(&array_cells(items)));
                }
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::variable("x")
    }

    fn y() -> Expr {
        Expr::variable("y")
    }

    #[test]
    fn test_format_g() {
        assert_eq!(format_g(1.0), "1");
        assert_eq!(format_g(-2.0), "-2");
        assert_eq!(format_g(0.5), "0.5");
        assert_eq!(format_g(1.0 / 3.0), "0.333333");
        assert_eq!(format_g(180.0), "180");
        assert_eq!(format_g(std::f64::consts::PI), "3.14159");
        assert_eq!(format_g(123456.0), "123456");
        assert_eq!(format_g(1234567.0), "1.23457e6");
        assert_eq!(format_g(0.0000001), "1e-7");
        assert_eq!(format_g(f64::NAN), "NaN");
    }

    #[test]
    fn test_infix_spacing() {
        assert_eq!(Expr::add_expr(x(), y()).to_string(), "x + y");
        assert_eq!(Expr::sub_expr(x(), y()).to_string(), "x - y");
        assert_eq!(Expr::mul_expr(Expr::constant(2.0), x()).to_string(), "2*x");
        assert_eq!(Expr::div_expr(x(), y()).to_string(), "x/y");
        assert_eq!(Expr::pow_expr(x(), Expr::constant(2.0)).to_string(), "x^2");
        assert_eq!(x().sin().to_string(), "sin(x)");
        assert_eq!(Expr::inv(x()).to_string(), "1/x");
        assert_eq!(
            Expr::assign(x(), Expr::constant(3.0)).to_string(),
            "x = 3"
        );
    }

    #[test]
    fn test_minimal_parentheses() {
        let sum = Expr::add_expr(x(), y());
        assert_eq!(
            Expr::mul_expr(sum.clone(), Expr::variable("z")).to_string(),
            "(x + y)*z"
        );
        assert_eq!(
            Expr::pow_expr(sum.clone(), Expr::constant(2.0)).to_string(),
            "(x + y)^2"
        );
        assert_eq!(Expr::negate(sum.clone()).to_string(), "-(x + y)");
        assert_eq!(
            Expr::negate(Expr::pow_expr(x(), Expr::constant(2.0))).to_string(),
            "-(x^2)"
        );
        assert_eq!(Expr::inv(Expr::mul_expr(x(), y())).to_string(), "1/(x*y)");
        let quotient = Expr::div_expr(x(), Expr::mul_expr(y(), Expr::variable("z")));
        assert_eq!(quotient.to_string(), "x/(y*z)");
    }

    #[test]
    fn test_arrays() {
        let v = Expr::array(vec![x(), Expr::constant(2.0)]).unwrap();
        assert_eq!(v.to_string(), "[x,2]");
        let m = Expr::array(vec![v.clone(), v]).unwrap();
        assert_eq!(m.to_string(), "[[x,2],[x,2]]");
    }

    #[test]
    fn test_table_layout() {
        let rows = vec![
            vec!["1".to_owned(), "22".to_owned()],
            vec!["3333".to_owned(), "4".to_owned()],
        ];
        assert_eq!(format_table(&rows), "\n|    1   22 |\n| 3333    4 |\n");
    }
}
