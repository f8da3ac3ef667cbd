//! Tokenizer

use crate::error::{ExprError, Span};
use log::trace;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Equals,
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Identifier(name) => format!("'{name}'"),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::Equals => "'='".into(),
            Token::Comma => "','".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::LeftBracket => "'['".into(),
            Token::RightBracket => "']'".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub span: Span,
}

/// Letters, digits, `_` and combining marks (for names like `ẋ`)
fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || ('\u{0300}'..='\u{036F}').contains(&c)
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>, ExprError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let offset = |i: usize| chars.get(i).map_or(input.len(), |&(pos, _)| pos);
    let mut tokens = Vec::with_capacity(chars.len() / 2 + 1);
    let mut i = 0;

    while let Some(&(start, c)) = chars.get(i) {
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            '=' => Some(Token::Equals),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            '[' => Some(Token::LeftBracket),
            ']' => Some(Token::RightBracket),
            _ => None,
        };
        if let Some(token) = single {
            tokens.push(Spanned {
                token,
                span: Span::new(start, start + c.len_utf8()),
            });
            i += 1;
            continue;
        }

        let digit_at = |k: usize| chars.get(k).is_some_and(|&(_, d)| d.is_ascii_digit());

        if c.is_ascii_digit() || (c == '.' && digit_at(i + 1)) {
            let mut j = i;
            while digit_at(j) {
                j += 1;
            }
            if chars.get(j).is_some_and(|&(_, d)| d == '.') {
                j += 1;
                while digit_at(j) {
                    j += 1;
                }
            }
            // exponent only when digits follow, so `2e` stays `2` and `e`
            if chars.get(j).is_some_and(|&(_, d)| d == 'e' || d == 'E') {
                let sign = chars.get(j + 1).is_some_and(|&(_, d)| d == '+' || d == '-');
                let first = if sign { j + 2 } else { j + 1 };
                if digit_at(first) {
                    j = first;
                    while digit_at(j) {
                        j += 1;
                    }
                }
            }
            let end = offset(j);
            let text = &input[start..end];
            let value: f64 = text.parse().map_err(|_| {
                ExprError::syntax_at(format!("Invalid number '{text}'"), Span::new(start, end))
            })?;
            tokens.push(Spanned {
                token: Token::Number(value),
                span: Span::new(start, end),
            });
            i = j;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut j = i + 1;
            while chars.get(j).is_some_and(|&(_, d)| is_identifier_char(d)) {
                j += 1;
            }
            let end = offset(j);
            tokens.push(Spanned {
                token: Token::Identifier(input[start..end].to_owned()),
                span: Span::new(start, end),
            });
            i = j;
            continue;
        }

        return Err(ExprError::syntax_at(
            format!("Unexpected character '{c}'"),
            Span::new(start, start + c.len_utf8()),
        ));
    }

    trace!("tokenized {} token(s) from {:?}", tokens.len(), input);
    Ok(tokens)
}
