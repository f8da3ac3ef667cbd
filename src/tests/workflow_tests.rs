use approx::assert_relative_eq;

use crate::{
    CompiledFunction, Context, Expr, Function, JaggedMatrix, NewtonRaphson, Quantity, Vector,
    parse,
};

#[test]
fn test_interpreter_and_bytecode_agree() {
    let expr = parse("1/t^2*(1-exp(-pi*t))/(1-t^2)").unwrap();
    let compiled = CompiledFunction::compile(&expr, &["t"]).unwrap();
    for i in 1..=10 {
        let t = i as f64 / 10.0;
        let interpreted = expr.eval(&[("t", t)]).unwrap().as_scalar().unwrap();
        let bytecode = compiled.call_scalar(&[t]).unwrap();
        // t = 1 divides by zero on both paths
        assert!(
            interpreted.to_bits() == bytecode.to_bits() || (interpreted.is_nan() && bytecode.is_nan()),
            "t = {t}: {interpreted} != {bytecode}"
        );
        if i < 10 {
            let direct = (1.0 - (-std::f64::consts::PI * t).exp()) / (t * t * (1.0 - t * t));
            assert_relative_eq!(bytecode, direct, max_relative = 1e-12);
        }
    }
}

#[test]
fn test_symbolic_solve_matches_numeric_solve() {
    let a = parse("[[7,t],[-t,3]]").unwrap();
    let b = parse("[4,-1]").unwrap();
    let x = Expr::solve(&a, &b).unwrap();
    assert_eq!(x.rank(), 1);
    assert_eq!(x.symbols(false), vec!["t".to_owned()]);

    let compiled = CompiledFunction::compile(&x, &["t"]).unwrap();
    for t in [0.0, 0.3, 0.7, 1.0, -2.0] {
        let symbolic = compiled.call(&[t]).unwrap();
        let numeric = JaggedMatrix::new(vec![vec![7.0, t], vec![-t, 3.0]])
            .solve(&Vector::new(vec![4.0, -1.0]))
            .unwrap();
        let symbolic = symbolic.as_vector().unwrap();
        assert_relative_eq!(symbolic[0], numeric[0], epsilon = 1e-12);
        assert_relative_eq!(symbolic[1], numeric[1], epsilon = 1e-12);

        // substitute back: A·x = b
        let residual = Expr::product(&a, &x)
            .unwrap()
            .eval(&[("t", t)])
            .unwrap();
        let residual = residual.as_vector().unwrap();
        assert_relative_eq!(residual[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(residual[1], -1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_display_parse_round_trip() {
    for text in ["x + 2*y", "x*sin(y)", "exp(-x)", "[x,y + 1]", "x/(y*z)"] {
        let expr = parse(text).unwrap();
        assert_eq!(expr.to_string(), text);
        assert_eq!(parse(&expr.to_string()).unwrap(), expr);
    }
}

#[test]
fn test_context_session() {
    let mut ctx = Context::new();
    ctx.parse("k = 2").unwrap();
    let spring = ctx.parse("k*x^2/2").unwrap();
    assert!(ctx.get("k").is_some_and(|k| ctx.contains(&k)));
    assert_eq!(spring.symbols(false), vec!["x".to_owned()]);

    let force = Function::new("F", Expr::negate(spring.partial_derivative("x")), &["x"]).unwrap();
    assert_eq!(force.eval(&[3.0]).unwrap(), Quantity::Scalar(-6.0));
}

#[test]
fn test_linear_system_from_equations() {
    let system = parse("[2*x + y = 5, x - y = 1]").unwrap();
    let (a, b) = system.extract_linear_system(&["x", "y"]).unwrap();
    let solution = a.solve(&b).unwrap();
    assert_relative_eq!(solution[0], 2.0, epsilon = 1e-12);
    assert_relative_eq!(solution[1], 1.0, epsilon = 1e-12);

    assert!(parse("[x*y = 1, x + y = 2]").unwrap().extract_linear_system(&["x", "y"]).is_none());
}

#[test]
fn test_root_of_derivative() {
    // minimum of x^2 - 2x + cosh(x)
    let f = Function::new("f", parse("x^2 - 2*x + cosh(x)").unwrap(), &["x"]).unwrap();
    let slope = f.partial_derivative("x");
    let report = NewtonRaphson::new().solve(&slope, &[0.0]).unwrap();
    assert!(report.converged);
    let x = report.solution.as_scalar().unwrap();
    assert_relative_eq!(2.0 * x - 2.0 + x.sinh(), 0.0, epsilon = 1e-10);
}
