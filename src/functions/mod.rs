//! Operator tables shared by construction, differentiation, evaluation and
//! compilation.
//!
//! Both the interpreter ([`Expr::eval`](crate::Expr::eval)) and the bytecode
//! executor call [`UnaryOp::apply`] / [`BinaryOp::apply`], which keeps their
//! results bit-identical.

pub(crate) mod definitions;
pub(crate) mod registry;

pub(crate) use registry::Registry;

/// Unary operators, identified by the name used in formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnaryOp {
    Negate,
    Inverse,
    Abs,
    Sign,
    Ln,
    Exp,
    Sqrt,
    Square,
    Cube,
    Cbrt,
    Sin,
    Cos,
    Tan,
    Sind,
    Cosd,
    Tand,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 25] = [
        UnaryOp::Negate,
        UnaryOp::Inverse,
        UnaryOp::Abs,
        UnaryOp::Sign,
        UnaryOp::Ln,
        UnaryOp::Exp,
        UnaryOp::Sqrt,
        UnaryOp::Square,
        UnaryOp::Cube,
        UnaryOp::Cbrt,
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
        UnaryOp::Sind,
        UnaryOp::Cosd,
        UnaryOp::Tand,
        UnaryOp::Asin,
        UnaryOp::Acos,
        UnaryOp::Atan,
        UnaryOp::Sinh,
        UnaryOp::Cosh,
        UnaryOp::Tanh,
        UnaryOp::Asinh,
        UnaryOp::Acosh,
        UnaryOp::Atanh,
    ];

    /// Name used in formulas, e.g. `sqr` for [`UnaryOp::Square`]
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Negate => "neg",
            UnaryOp::Inverse => "inv",
            UnaryOp::Abs => "abs",
            UnaryOp::Sign => "sign",
            UnaryOp::Ln => "ln",
            UnaryOp::Exp => "exp",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Square => "sqr",
            UnaryOp::Cube => "cub",
            UnaryOp::Cbrt => "cbrt",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Sind => "sind",
            UnaryOp::Cosd => "cosd",
            UnaryOp::Tand => "tand",
            UnaryOp::Asin => "asin",
            UnaryOp::Acos => "acos",
            UnaryOp::Atan => "atan",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Asinh => "asinh",
            UnaryOp::Acosh => "acosh",
            UnaryOp::Atanh => "atanh",
        }
    }

    /// Look up an operator by its formula name
    pub fn from_name(name: &str) -> Option<UnaryOp> {
        Registry::get(name).map(|def| def.op)
    }

    /// The operator that undoes this one when nested directly, if any.
    ///
    /// `sqrt(sqr(x))` is `abs(x)` and is handled separately.
    pub(crate) fn inverse_pair(self) -> Option<UnaryOp> {
        Some(match self {
            UnaryOp::Negate => UnaryOp::Negate,
            UnaryOp::Inverse => UnaryOp::Inverse,
            UnaryOp::Ln => UnaryOp::Exp,
            UnaryOp::Exp => UnaryOp::Ln,
            UnaryOp::Cbrt => UnaryOp::Cube,
            UnaryOp::Cube => UnaryOp::Cbrt,
            UnaryOp::Sin => UnaryOp::Asin,
            UnaryOp::Asin => UnaryOp::Sin,
            UnaryOp::Cos => UnaryOp::Acos,
            UnaryOp::Acos => UnaryOp::Cos,
            UnaryOp::Tan => UnaryOp::Atan,
            UnaryOp::Atan => UnaryOp::Tan,
            UnaryOp::Sinh => UnaryOp::Asinh,
            UnaryOp::Asinh => UnaryOp::Sinh,
            UnaryOp::Cosh => UnaryOp::Acosh,
            UnaryOp::Acosh => UnaryOp::Cosh,
            UnaryOp::Tanh => UnaryOp::Atanh,
            UnaryOp::Atanh => UnaryOp::Tanh,
            _ => return None,
        })
    }

    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            UnaryOp::Negate => -x,
            UnaryOp::Inverse => 1.0 / x,
            UnaryOp::Abs => x.abs(),
            UnaryOp::Sign => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    -1.0
                } else {
                    x
                }
            }
            UnaryOp::Ln => x.ln(),
            UnaryOp::Exp => x.exp(),
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Square => x * x,
            UnaryOp::Cube => x * x * x,
            UnaryOp::Cbrt => x.cbrt(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Tan => x.tan(),
            UnaryOp::Sind => x.to_radians().sin(),
            UnaryOp::Cosd => x.to_radians().cos(),
            UnaryOp::Tand => x.to_radians().tan(),
            UnaryOp::Asin => x.asin(),
            UnaryOp::Acos => x.acos(),
            UnaryOp::Atan => x.atan(),
            UnaryOp::Sinh => x.sinh(),
            UnaryOp::Cosh => x.cosh(),
            UnaryOp::Tanh => x.tanh(),
            UnaryOp::Asinh => x.asinh(),
            UnaryOp::Acosh => x.acosh(),
            UnaryOp::Atanh => x.atanh(),
        }
    }
}

/// Binary operators. `Log` is the logarithm of the left operand in the base
/// given by the right operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Log,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::Log => "log",
        }
    }

    /// Resolve an operator from its symbol or function name
    pub fn from_name(name: &str) -> Option<BinaryOp> {
        match name {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Sub),
            "*" => Some(BinaryOp::Mul),
            "/" => Some(BinaryOp::Div),
            "^" | "pow" => Some(BinaryOp::Pow),
            "log" => Some(BinaryOp::Log),
            _ => None,
        }
    }

    /// Binding strength in infix notation; `Log` prints as a call.
    pub(crate) fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 2,
            BinaryOp::Mul | BinaryOp::Div => 3,
            BinaryOp::Pow => 4,
            BinaryOp::Log => 6,
        }
    }

    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
            BinaryOp::Log => a.ln() / b.ln(),
        }
    }
}
