//! Arithmetic on the input line: `3 * (4 + 1)`, `2^10`, `12.5 eur * 3`.
//!
//! Supports `+ - * / % ^`, parentheses, unary minus and decimal numbers.
//! A single currency unit (`eur` or `usd`) is carried through to the result;
//! mixing currencies is rejected since there are no exchange rates.

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

use super::render::{escape, Renderer};
use super::{Context, Handler, ParseError};
use crate::storage::Row;

static MATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]|eur|usd)").expect("valid math regex"));

pub struct MathHandler;

impl Handler for MathHandler {
    fn kind(&self) -> &'static str {
        "math"
    }

    fn usage(&self) -> &'static str {
        "<expression>, e.g. 3 * (4 + 1)"
    }

    fn can_handle(&self, input: &str) -> bool {
        MATH_RE.is_match(input)
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        let answer = evaluate(input).map_err(|reason| ParseError::Math {
            input: input.to_string(),
            reason,
        })?;
        let mut row = Row::new(self.kind(), input);
        row.tags.clear();
        row.float = Some(answer.value);
        row.content = Some(answer.to_string());
        Ok(row)
    }

    fn query(&self, _ctx: &Context<'_>, _input: &str) -> Result<Vec<Row>> {
        Ok(Vec::new())
    }

    fn render(&self, _ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        Ok(Renderer::Html(format!(
            "<pre class=\"math\">{} = {}</pre>",
            escape(row.summary.trim()),
            escape(row.content.as_deref().unwrap_or_default())
        )))
    }

    fn persistable(&self) -> bool {
        false
    }
}

/// A computed value with its optional currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub value: f64,
    pub unit: Option<&'static str>,
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.value.fract() == 0.0 && self.value.abs() < 1e15 {
            write!(f, "{}", self.value as i64)?;
        } else {
            let text = format!("{:.10}", self.value);
            write!(f, "{}", text.trim_end_matches('0').trim_end_matches('.'))?;
        }
        if let Some(unit) = self.unit {
            write!(f, " {unit}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Unit(&'static str),
    Op(char),
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &input[start..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| format!("bad number {text:?}"))?;
                tokens.push(Token::Number(value));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::Open);
                chars.next();
            }
            ')' => {
                tokens.push(Token::Close);
                chars.next();
            }
            c if c.is_alphabetic() => {
                let mut end = start;
                while let Some(&(i, l)) = chars.peek() {
                    if l.is_alphabetic() {
                        end = i + l.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                match input[start..end].to_lowercase().as_str() {
                    "eur" => tokens.push(Token::Unit("eur")),
                    "usd" => tokens.push(Token::Unit("usd")),
                    word => return Err(format!("unknown word {word:?}")),
                }
            }
            other => return Err(format!("unexpected {other:?}")),
        }
    }

    Ok(tokens)
}

/// Deepest nesting of parentheses and unary minus accepted.
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    unit: Option<&'static str>,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            self.next();
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek() {
            self.next();
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                _ if rhs == 0.0 => return Err("division by zero".into()),
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    // unary := '-' unary | power
    //
    // Every recursive path passes through here, so this is where depth is bounded.
    fn unary(&mut self) -> Result<f64, String> {
        if self.depth >= MAX_DEPTH {
            return Err("expression nested too deeply".into());
        }
        self.depth += 1;
        let value = if let Some(Token::Op('-')) = self.peek() {
            self.next();
            self.unary().map(|v| -v)
        } else {
            self.power()
        };
        self.depth -= 1;
        value
    }

    // power := atom ('^' unary)?   (right associative)
    fn power(&mut self) -> Result<f64, String> {
        let base = self.atom()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.next();
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    // atom := number unit? | '(' expr ')'
    fn atom(&mut self) -> Result<f64, String> {
        match self.next() {
            Some(Token::Number(value)) => {
                if let Some(Token::Unit(unit)) = self.peek() {
                    self.next();
                    self.note_unit(unit)?;
                }
                Ok(value)
            }
            Some(Token::Open) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::Close) => Ok(value),
                    _ => Err("missing ')'".into()),
                }
            }
            Some(Token::Unit(unit)) => Err(format!("{unit} needs a number in front")),
            Some(token) => Err(format!("unexpected {token:?}")),
            None => Err("unexpected end of input".into()),
        }
    }

    fn note_unit(&mut self, unit: &'static str) -> Result<(), String> {
        match self.unit {
            Some(seen) if seen != unit => Err(format!("can't mix {seen} and {unit}")),
            _ => {
                self.unit = Some(unit);
                Ok(())
            }
        }
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> Result<Answer, String> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err("nothing to compute".into());
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        unit: None,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(format!("unexpected {token:?}"));
    }
    if !value.is_finite() {
        return Err("result is not a finite number".into());
    }

    Ok(Answer {
        value,
        unit: parser.unit,
    })
}
