//! Property-based tests
//!
//! Random formulas over `x` and `z` exercise the parser, the derivative
//! rules and the two evaluation paths.

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

use crate::{CompiledFunction, Expr, parse};

#[derive(Debug, Clone)]
struct Formula(String);

impl Arbitrary for Formula {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = g.size().min(4);
        Formula(formula(g, depth))
    }
}

fn formula(g: &mut Gen, depth: usize) -> String {
    if depth == 0 {
        return match u8::arbitrary(g) % 4 {
            0 => {
                let n = f64::arbitrary(g);
                if n.is_finite() && n.abs() < 1e6 {
                    format!("{:.3}", n.abs())
                } else {
                    "2".to_owned()
                }
            }
            1 => "pi".to_owned(),
            2 => "z".to_owned(),
            _ => "x".to_owned(),
        };
    }
    match u8::arbitrary(g) % 8 {
        0..=2 => {
            let ops = ["+", "-", "*", "/", "^"];
            let op = ops[usize::arbitrary(g) % ops.len()];
            format!("({} {} {})", formula(g, depth - 1), op, formula(g, depth - 1))
        }
        3..=5 => {
            let names = ["sin", "cos", "tan", "exp", "ln", "sqrt", "abs", "atan", "sinh"];
            let name = names[usize::arbitrary(g) % names.len()];
            format!("{}({})", name, formula(g, depth - 1))
        }
        6 => format!("-{}", formula(g, depth - 1)),
        _ => formula(g, 0),
    }
}

fn same_value(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

/// Relative agreement; NaN only matches NaN, infinities match exactly
fn close(a: f64, b: f64, tolerance: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
}

const X: f64 = 0.7;
const Z: f64 = 1.3;

fn value_at(expr: &Expr, x: f64, z: f64) -> Option<f64> {
    expr.eval(&[("x", x), ("z", z)]).ok()?.as_scalar().ok()
}

#[test]
fn prop_generated_formulas_parse() {
    fn property(f: Formula) -> bool {
        parse(&f.0).is_ok()
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(property as fn(Formula) -> bool);
}

#[test]
fn prop_parser_never_panics_on_noise() {
    fn property(text: String) -> bool {
        // any outcome is fine as long as it is a value, not a panic
        match parse(&text) {
            Ok(expr) => expr.node_count() > 0,
            Err(err) => !err.to_string().is_empty(),
        }
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(property as fn(String) -> bool);
}

#[test]
fn prop_compiled_matches_interpreted() {
    fn property(f: Formula, x: f64, z: f64) -> TestResult {
        if !x.is_finite() || !z.is_finite() {
            return TestResult::discard();
        }
        let Ok(expr) = parse(&f.0) else {
            return TestResult::discard();
        };
        let compiled = match CompiledFunction::compile(&expr, &["x", "z"]) {
            Ok(compiled) => compiled,
            Err(_) => return TestResult::failed(),
        };
        let interpreted = match expr.eval(&[("x", x), ("z", z)]) {
            Ok(q) => q.as_scalar().unwrap(),
            Err(_) => return TestResult::failed(),
        };
        TestResult::from_bool(same_value(interpreted, compiled.call_scalar(&[x, z]).unwrap()))
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(property as fn(Formula, f64, f64) -> TestResult);
}

#[test]
fn prop_derivative_in_absent_symbol_is_zero() {
    fn property(f: Formula) -> TestResult {
        let Ok(expr) = parse(&f.0) else {
            return TestResult::discard();
        };
        TestResult::from_bool(expr.partial_derivative("y").is_constant_value(0.0))
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(property as fn(Formula) -> TestResult);
}

#[test]
fn prop_display_is_reparsable() {
    fn property(f: Formula) -> TestResult {
        let Ok(expr) = parse(&f.0) else {
            return TestResult::discard();
        };
        if expr.values().iter().any(|v| !v.is_finite()) {
            return TestResult::discard();
        }
        let text = expr.to_string();
        // printed numbers are rounded, so only the symbols must survive
        match parse(&text) {
            Ok(again) => TestResult::from_bool(again.symbols(true) == expr.symbols(true)),
            Err(_) => TestResult::failed(),
        }
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(property as fn(Formula) -> TestResult);
}

#[test]
fn prop_display_round_trip_evaluates_identically() {
    fn property(f: Formula) -> TestResult {
        let Ok(expr) = parse(&f.0) else {
            return TestResult::discard();
        };
        // constants must print without rounding
        let printable = expr.values().iter().all(|v| {
            v.is_finite() && Expr::constant(*v).to_string().parse::<f64>() == Ok(*v)
        });
        if !printable {
            return TestResult::discard();
        }
        let Some(expected) = value_at(&expr, X, Z) else {
            return TestResult::failed();
        };
        let Some(nearby) = value_at(&expr, X * (1.0 + 1e-9), Z * (1.0 + 1e-9)) else {
            return TestResult::failed();
        };
        if !expected.is_finite() || !close(expected, nearby, 1e-6) {
            return TestResult::discard();
        }
        let Ok(again) = parse(&expr.to_string()) else {
            return TestResult::failed();
        };
        match value_at(&again, X, Z) {
            Some(actual) => TestResult::from_bool(close(expected, actual, 1e-9)),
            None => TestResult::failed(),
        }
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(property as fn(Formula) -> TestResult);
}

#[test]
fn prop_identity_laws_hold() {
    fn property(f: Formula) -> TestResult {
        let Ok(e) = parse(&f.0) else {
            return TestResult::discard();
        };
        if e.values().iter().any(|v| !v.is_finite()) {
            return TestResult::discard();
        }
        let Some(value) = value_at(&e, X, Z) else {
            return TestResult::failed();
        };
        if !value.is_finite() {
            return TestResult::discard();
        }

        let plus_zero = Expr::add_expr(e.clone(), Expr::zero());
        if e.as_number(true).is_none() && plus_zero != e {
            return TestResult::failed();
        }
        let times_one = Expr::mul_expr(e.clone(), Expr::one());
        let same = [plus_zero, times_one]
            .iter()
            .all(|side| value_at(side, X, Z).is_some_and(|v| close(v, value, 1e-12)));

        let times_zero = Expr::mul_expr(e.clone(), Expr::zero()).as_number(true) == Some(0.0);
        let minus_self = Expr::sub_expr(e.clone(), e.clone()).as_number(true) == Some(0.0);
        // 0/0 stays undefined
        let over_self = e.as_number(true) == Some(0.0)
            || Expr::div_expr(e.clone(), e.clone()).as_number(true) == Some(1.0);

        TestResult::from_bool(same && times_zero && minus_self && over_self)
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(property as fn(Formula) -> TestResult);
}
