use super::lexer::{Spanned, Token};
use crate::context::Context;
use crate::error::{ExprError, Span};
use crate::functions::BinaryOp;
use crate::Expr;

/// Precedence of `+` and `-`, the lowest binary level
const ADDITIVE: u8 = 2;

/// Deepest nesting of parentheses, brackets, calls and prefix signs
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse a token stream into an expression.
///
/// ```text
/// statement := sum ( '=' sum )?
/// sum       := product ( ('+' | '-') product )*
/// product   := power ( ('*' | '/') power )*
/// power     := unary ( '^' unary )*
/// unary     := ('-' | '+') unary | primary
/// primary   := number | name | name '(' sum (',' sum)* ')' | '(' sum ')'
///            | '[' statement (',' statement)* ']'
/// ```
pub(crate) fn parse_statement(
    tokens: &[Spanned],
    input_len: usize,
    context: &mut Context,
) -> Result<Expr, ExprError> {
    if tokens.is_empty() {
        return Err(ExprError::syntax("Empty expression"));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        input_len,
        context,
    };
    let expr = parser.statement()?;
    if let Some(extra) = parser.current() {
        return Err(ExprError::syntax_at(
            format!("Unexpected {} at end of expression", extra.token.describe()),
            extra.span,
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
    input_len: usize,
    context: &'a mut Context,
}

impl Parser<'_> {
    fn current(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek(&self) -> Option<&Token> {
        self.current().map(|s| &s.token)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn end_span(&self) -> Span {
        Span::at(self.input_len)
    }

    fn unexpected(&self, expected: &str) -> ExprError {
        match self.current() {
            Some(s) => ExprError::syntax_at(
                format!("Expected {expected}, found {}", s.token.describe()),
                s.span,
            ),
            None => ExprError::syntax_at(
                format!("Expected {expected}, found end of input"),
                self.end_span(),
            ),
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<(), ExprError> {
        if self.peek() == Some(&token) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn statement(&mut self) -> Result<Expr, ExprError> {
        let target = self.binary(ADDITIVE)?;
        if self.peek() == Some(&Token::Equals) {
            self.advance();
            let value = self.binary(ADDITIVE)?;
            return self.context.assign(target, value);
        }
        Ok(target)
    }

    fn infix(&self) -> Option<BinaryOp> {
        match self.peek()? {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            Token::Caret => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr, ExprError> {
        let mut left = self.unary()?;
        while let Some(op) = self.infix() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();
            // every level is left-associative
            let right = self.binary(precedence + 1)?;
            left = Expr::binary(op, left, right)?;
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        // every nested operand passes through here
        if self.depth >= MAX_NESTING_DEPTH {
            let span = self.current().map_or_else(|| self.end_span(), |s| s.span);
            return Err(ExprError::syntax_at(
                format!("Expression nested deeper than {MAX_NESTING_DEPTH} levels"),
                span,
            ));
        }
        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.unary()
            }
            Some(Token::Minus) => {
                self.advance();
                Ok(Expr::negate(self.unary()?))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let Some(Spanned { token, span }) = self.current().cloned() else {
            return Err(self.unexpected("an expression"));
        };
        match token {
            Token::Number(value) => {
                self.advance();
                Ok(Expr::constant(value))
            }
            Token::Identifier(name) => {
                self.advance();
                match self.peek() {
                    Some(Token::LeftParen) => self.call(&name, span),
                    Some(Token::LeftBracket) => Err(ExprError::syntax_at(
                        format!("Indexing '{name}[...]' is not supported"),
                        span,
                    )),
                    _ => Ok(self
                        .context
                        .get(&name)
                        .unwrap_or_else(|| Expr::variable(&name))),
                }
            }
            Token::LeftParen => {
                self.advance();
                let inner = self.binary(ADDITIVE)?;
                self.expect(Token::RightParen, "')'")?;
                Ok(inner)
            }
            Token::LeftBracket => {
                self.advance();
                let mut items = Vec::new();
                if self.peek() != Some(&Token::RightBracket) {
                    loop {
                        items.push(self.statement()?);
                        if self.peek() == Some(&Token::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(Token::RightBracket, "',' or ']'")?;
                Expr::array(items)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn call(&mut self, name: &str, span: Span) -> Result<Expr, ExprError> {
        self.expect(Token::LeftParen, "'('")?;
        let mut args = vec![self.binary(ADDITIVE)?];
        while self.peek() == Some(&Token::Comma) {
            self.advance();
            args.push(self.binary(ADDITIVE)?);
        }
        self.expect(Token::RightParen, "',' or ')'")?;
        let count = args.len();
        apply_function(name, args).ok_or_else(|| {
            ExprError::syntax_at(
                format!("Unknown function '{name}' with {count} argument(s)"),
                span,
            )
        })?
    }
}

/// Intrinsics first, then unary and binary operators by name.
/// `None` for unknown names and wrong argument counts.
fn apply_function(name: &str, mut args: Vec<Expr>) -> Option<Result<Expr, ExprError>> {
    let pair = |args: &mut Vec<Expr>| {
        let second = args.pop()?;
        let first = args.pop()?;
        Some((first, second))
    };
    match (name, args.len()) {
        ("sum", 1) => Some(Ok(Expr::sum_of(&args[0]))),
        ("sum", _) => Some(Ok(Expr::sum(args))),
        ("norm", 1) => Some(Expr::norm(&args[0])),
        ("norm", _) => Some(Ok(Expr::norm_of(args))),
        ("dot", 2) => pair(&mut args).map(|(a, b)| Expr::dot(&a, &b)),
        ("outer", 2) => pair(&mut args).map(|(a, b)| Expr::outer(&a, &b)),
        ("cross", 2) => pair(&mut args).map(|(a, b)| Expr::cross(&a, &b)),
        ("hypot", 2) => pair(&mut args).map(|(a, b)| Ok(Expr::hypot(a, b))),
        (_, 1) => {
            let arg = args.pop()?;
            Expr::unary_by_name(name, arg).map(Ok)
        }
        (_, 2) => {
            let op = BinaryOp::from_name(name)?;
            pair(&mut args).map(|(a, b)| Expr::binary(op, a, b))
        }
        _ => None,
    }
}
