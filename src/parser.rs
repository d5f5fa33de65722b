//! Parser for rendered equation strings.
//!
//! Equations cross the serialization boundary in their display form
//! (`(x mul y) = (y mul x)`, `inv(x)`, `e`, ...). This module parses that
//! form back into [`Equation`] trees. Identifier classification needs the
//! document's operation set: a bare name is a constant iff it names a
//! nullary operation, otherwise a variable.

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use chumsky::prelude::*;
use chumsky::Stream;

use crate::ast::{Equation, Expr};
use crate::error::{format_lex_errors, format_syntax_errors};

/// Token types for the equation grammar
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Ident(String),
    LParen,
    RParen,
    Comma,
    Eq,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "{}", s),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Eq => write!(f, "="),
        }
    }
}

/// Type alias for spans
pub type Span = Range<usize>;

/// Tokenize an equation string
pub fn lexer() -> impl Parser<char, Vec<(Token, Span)>, Error = Simple<char>> {
    // Identifiers may carry the move engine's derived prefixes (e_mul,
    // inv_mul, Hom_f), so underscores and digits are allowed after the head.
    let ident = filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .chain::<char, _, _>(
            filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_').repeated(),
        )
        .collect::<String>()
        .map(Token::Ident);

    let punctuation = choice((
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just(',').to(Token::Comma),
        just('=').to(Token::Eq),
    ));

    ident
        .or(punctuation)
        .map_with_span(|tok, span| (tok, span))
        .padded()
        .repeated()
        .then_ignore(end())
}

/// Unresolved expression: names are classified against the operation set
/// only after parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
enum RawExpr {
    Name(String),
    Call(String, Vec<RawExpr>),
    Infix(Box<RawExpr>, String, Box<RawExpr>),
}

fn ident() -> impl Parser<Token, String, Error = Simple<Token>> + Clone {
    select! { Token::Ident(s) => s }
}

/// Parse a single expression in rendering form:
/// `(lhs op rhs)` | `op(a, b, ...)` | `name`
fn expr_parser() -> impl Parser<Token, RawExpr, Error = Simple<Token>> + Clone {
    recursive(|expr| {
        let call = ident()
            .then(
                expr.clone()
                    .separated_by(just(Token::Comma))
                    .at_least(1)
                    .delimited_by(just(Token::LParen), just(Token::RParen)),
            )
            .map(|(op, args)| RawExpr::Call(op, args));

        let infix = expr
            .clone()
            .then(ident())
            .then(expr)
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .map(|((lhs, op), rhs)| RawExpr::Infix(Box::new(lhs), op, Box::new(rhs)));

        choice((call, infix, ident().map(RawExpr::Name)))
    })
}

/// Parse `expr = expr`
fn equation_parser() -> impl Parser<Token, (RawExpr, RawExpr), Error = Simple<Token>> {
    expr_parser()
        .then_ignore(just(Token::Eq))
        .then(expr_parser())
        .then_ignore(end())
}

fn resolve(raw: &RawExpr, constants: &HashSet<String>, ops: &HashSet<String>) -> Result<Expr, ParseError> {
    match raw {
        RawExpr::Name(name) => {
            if constants.contains(name) {
                Ok(Expr::Const(name.clone()))
            } else {
                Ok(Expr::Var(name.clone()))
            }
        }
        RawExpr::Call(op, args) => {
            if !ops.contains(op) {
                return Err(ParseError::UnknownOperation(op.clone()));
            }
            let args = args
                .iter()
                .map(|a| resolve(a, constants, ops))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::App {
                op: op.clone(),
                args,
            })
        }
        RawExpr::Infix(lhs, op, rhs) => {
            if !ops.contains(op) {
                return Err(ParseError::UnknownOperation(op.clone()));
            }
            Ok(Expr::App {
                op: op.clone(),
                args: vec![
                    resolve(lhs, constants, ops)?,
                    resolve(rhs, constants, ops)?,
                ],
            })
        }
    }
}

/// Parse errors for equation strings
#[derive(Debug)]
pub enum ParseError {
    /// Tokenization failed; carries a formatted report.
    Lex(String),
    /// The token stream did not match the equation grammar.
    Syntax(String),
    /// An applied operation name is not declared in the document.
    UnknownOperation(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(report) | ParseError::Syntax(report) => write!(f, "{}", report),
            ParseError::UnknownOperation(op) => {
                write!(f, "equation applies undeclared operation '{}'", op)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a rendered equation string back into an [`Equation`].
///
/// `constants` is the set of nullary operation names of the enclosing
/// document; `ops` is its full operation name set.
pub fn parse_equation(
    src: &str,
    constants: &HashSet<String>,
    ops: &HashSet<String>,
) -> Result<Equation, ParseError> {
    let tokens = lexer()
        .parse(src)
        .map_err(|errs| ParseError::Lex(format_lex_errors(src, errs)))?;

    let len = src.len();
    let token_spans: Vec<(Token, Span)> = tokens.clone();
    let (lhs, rhs) = equation_parser()
        .parse(Stream::from_iter(len..len + 1, tokens.into_iter()))
        .map_err(|errs| ParseError::Syntax(format_syntax_errors(src, errs, &token_spans)))?;

    Ok(Equation::new(
        resolve(&lhs, constants, ops)?,
        resolve(&rhs, constants, ops)?,
    ))
}
