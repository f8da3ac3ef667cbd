use thiserror::Error;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Span covering a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map(|s| s.display()).unwrap_or_default()
}

/// Errors raised while parsing, building, evaluating or compiling expressions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Malformed input text
    #[error("Syntax error: {message}{}", span_suffix(.span))]
    Syntax {
        message: String,
        span: Option<Span>,
    },

    /// Vector/matrix shapes do not fit the operation
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Rank {rank} is not supported, arrays are limited to rank 2")]
    UnsupportedRank { rank: usize },

    /// A function body references symbols absent from its argument list
    #[error("Function '{function}' is missing argument(s) {}", .missing.join(", "))]
    MissingArgument {
        function: String,
        missing: Vec<String>,
    },

    #[error("Constant '{name}' is already defined as {existing}, cannot redefine it as {requested}")]
    ConstantRedefinition {
        name: String,
        existing: f64,
        requested: f64,
    },

    #[error("{operation} does not support {arguments} argument(s) with this shape")]
    UnsupportedArity {
        operation: &'static str,
        arguments: usize,
    },

    #[error("Symbol '{0}' has no value")]
    UnresolvedSymbol(String),

    #[error("Expression '{0}' is not a constant")]
    NotAConstant(String),

    #[error("Expression '{0}' is not a constant vector")]
    NotAVector(String),

    #[error("Expression '{0}' is not a constant matrix")]
    NotAMatrix(String),

    /// Compiled program would exceed the evaluator stack limit
    #[error("Expression requires stack depth {depth}, limit is {limit}")]
    StackOverflow { depth: usize, limit: usize },
}

impl ExprError {
    pub fn syntax(message: impl Into<String>) -> Self {
        ExprError::Syntax {
            message: message.into(),
            span: None,
        }
    }

    pub fn syntax_at(message: impl Into<String>, span: Span) -> Self {
        ExprError::Syntax {
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn dimension(message: impl Into<String>) -> Self {
        ExprError::DimensionMismatch(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::at(4).display(), " at position 5");
        assert_eq!(Span::new(2, 6).display(), " at positions 3-6");
        assert_eq!(Span::default().display(), "");
    }

    #[test]
    fn test_error_messages() {
        let err = ExprError::syntax_at("Unexpected token ')'", Span::at(3));
        assert_eq!(
            err.to_string(),
            "Syntax error: Unexpected token ')' at position 4"
        );

        let err = ExprError::MissingArgument {
            function: "f".into(),
            missing: vec!["x".into(), "y".into()],
        };
        assert_eq!(err.to_string(), "Function 'f' is missing argument(s) x, y");
    }
}
