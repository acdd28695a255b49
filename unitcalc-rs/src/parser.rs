use crate::lexer::Token;
use crate::unit::Unit;
use chumsky::error::Rich;
use chumsky::prelude::{choice, end, just};
use chumsky::{IterParser, Parser, extra, select};
use std::fmt::Display;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(f64),
    UnitLiteral(Unit),
    ConstWithUnit(Box<Expression>, Box<Expression>),
    CompositeUnit(Box<Expression>, Box<Expression>),
    Negate(Box<Expression>),
    Add(Box<Expression>, Box<Expression>),
    Sub(Box<Expression>, Box<Expression>),
    Mul(Box<Expression>, Box<Expression>),
    Div(Box<Expression>, Box<Expression>),
    /// A unit expression raised to a degree expression.
    Pow(Box<Expression>, Box<Expression>),
    /// A quotient of unit expressions, as written on the right of `->`.
    DivUnit(Box<Expression>, Box<Expression>),
    Convert(Box<Expression>, Box<Expression>),
    Variable(String),
    Assign { name: String, value: Box<Expression> },
    Empty,
    Quit,
    Help,
    ShowMemory,
    ShowUnits,
    Examples,
    Invalid,
}

impl Expression {
    /// The stored form of an evaluated quantity.
    pub fn quantity(value: f64, unit: Unit) -> Self {
        if unit.is_none() {
            Expression::Constant(value)
        } else {
            Expression::ConstWithUnit(
                Box::new(Expression::Constant(value)),
                Box::new(Expression::UnitLiteral(unit)),
            )
        }
    }
}

fn write_binary(
    f: &mut std::fmt::Formatter<'_>,
    left: &Expression,
    op: &str,
    right: &Expression,
) -> std::fmt::Result {
    write!(f, "({} {} {})", left, op, right)
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::UnitLiteral(unit) => {
                let names: Vec<String> = unit
                    .powers()
                    .iter()
                    .map(|p| match p.degree {
                        1 => p.unit_type.to_string(),
                        degree => format!("{}^{}", p.unit_type, degree),
                    })
                    .collect();
                write!(f, "{}", names.join(" "))
            }
            Expression::ConstWithUnit(value, unit) => write!(f, "{} {}", value, unit),
            Expression::CompositeUnit(left, right) => write!(f, "{} {}", left, right),
            Expression::Negate(operand) => write!(f, "-({})", operand),
            Expression::Add(left, right) => write_binary(f, left, "+", right),
            Expression::Sub(left, right) => write_binary(f, left, "-", right),
            Expression::Mul(left, right) => write_binary(f, left, "*", right),
            Expression::Div(left, right) => write_binary(f, left, "/", right),
            Expression::Pow(base, degree) => write!(f, "{}^{}", base, degree),
            Expression::DivUnit(left, right) => write!(f, "{} / {}", left, right),
            Expression::Convert(value, target) => write_binary(f, value, "->", target),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Assign { name, value } => write!(f, "{} = {}", name, value),
            Expression::Empty => write!(f, "<empty>"),
            Expression::Quit => write!(f, "quit"),
            Expression::Help => write!(f, "help"),
            Expression::ShowMemory => write!(f, "memory"),
            Expression::ShowUnits => write!(f, "units"),
            Expression::Examples => write!(f, "examples"),
            Expression::Invalid => write!(f, "<invalid>"),
        }
    }
}

/// Operand grammar: leading negations, then a number with an optional unit,
/// a unit on its own, or a variable. Units chain by adjacency and take
/// `^ degree` suffixes.
fn operand<'a>() -> impl Parser<'a, &'a [Token], Expression, extra::Err<Rich<'a, Token>>> {
    let number = select! {
        Token::Number(value) => value,
    }
    .boxed();
    let degree = just(Token::Minus)
        .repeated()
        .foldr(number.clone().map(Expression::Constant), |_, degree| {
            Expression::Negate(Box::new(degree))
        });
    let unit_factor = select! {
        Token::Unit(unit_type) => Expression::UnitLiteral(Unit::single(unit_type, 1)),
    }
    .foldl(
        just(Token::Caret).ignore_then(degree).repeated(),
        |base, degree| Expression::Pow(Box::new(base), Box::new(degree)),
    )
    .boxed();
    let unit = unit_factor
        .clone()
        .foldl(unit_factor.repeated(), |left, right| {
            Expression::CompositeUnit(Box::new(left), Box::new(right))
        })
        .boxed();
    let quantity = number
        .then(unit.clone().or_not())
        .map(|(value, unit)| match unit {
            Some(unit) => Expression::ConstWithUnit(
                Box::new(Expression::Constant(value)),
                Box::new(unit),
            ),
            None => Expression::Constant(value),
        });
    let variable = select! {
        Token::Identifier(name) => Expression::Variable(name),
    };
    just(Token::Minus)
        .repeated()
        .foldr(choice((quantity, unit, variable)), |_, operand| {
            Expression::Negate(Box::new(operand))
        })
        .then_ignore(end())
}

fn parse_operand(tokens: &[Token]) -> Expression {
    operand()
        .parse(tokens)
        .into_result()
        .unwrap_or(Expression::Invalid)
}

/// Precedence of a binary operator; higher binds looser.
fn precedence(token: &Token) -> Option<u8> {
    match token {
        Token::Multiply | Token::Divide => Some(1),
        Token::Plus | Token::Minus => Some(2),
        _ => None,
    }
}

/// Index of the operator evaluated last: the loosest one, rightmost on ties.
/// A `-` that does not follow an operand is a negation and never splits.
fn split_point(tokens: &[Token]) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (i, token) in tokens.iter().enumerate() {
        let Some(level) = precedence(token) else {
            continue;
        };
        let is_binary = *token != Token::Minus || (i > 0 && tokens[i - 1].ends_operand());
        if is_binary && best.is_none_or(|(_, best_level)| level >= best_level) {
            best = Some((i, level));
        }
    }
    best.map(|(i, _)| i)
}

fn binary(
    node: fn(Box<Expression>, Box<Expression>) -> Expression,
    left: Expression,
    right: Expression,
) -> Expression {
    node(Box::new(left), Box::new(right))
}

/// Command keywords standing alone. Anywhere but the root they are left for
/// the validator to reject.
fn command(tokens: &[Token]) -> Option<Expression> {
    match tokens {
        [Token::Quit] => Some(Expression::Quit),
        [Token::Help] => Some(Expression::Help),
        [Token::Memory] => Some(Expression::ShowMemory),
        [Token::Units] => Some(Expression::ShowUnits),
        [Token::Examples] => Some(Expression::Examples),
        _ => None,
    }
}

fn parse_arithmetic(tokens: &[Token]) -> Expression {
    if tokens.is_empty() {
        return Expression::Empty;
    }
    if let Some(command) = command(tokens) {
        return command;
    }
    let last = tokens.len() - 1;
    if let Some(i) = tokens.iter().rposition(|t| *t == Token::Convert) {
        trace!(index = i, "split at conversion");
        if i == 0 || i == last {
            return Expression::Invalid;
        }
        return binary(
            Expression::Convert,
            parse_arithmetic(&tokens[..i]),
            parse_target(&tokens[i + 1..]),
        );
    }
    let Some(i) = split_point(tokens) else {
        return parse_operand(tokens);
    };
    trace!(index = i, operator = %tokens[i], "split at operator");
    if i == 0 || i == last {
        return Expression::Invalid;
    }
    let node: fn(Box<Expression>, Box<Expression>) -> Expression = match tokens[i] {
        Token::Plus => Expression::Add,
        Token::Minus => Expression::Sub,
        Token::Multiply => Expression::Mul,
        _ => Expression::Div,
    };
    binary(
        node,
        parse_arithmetic(&tokens[..i]),
        parse_arithmetic(&tokens[i + 1..]),
    )
}

/// The right side of `->`: unit expressions, optionally divided.
fn parse_target(tokens: &[Token]) -> Expression {
    match tokens.iter().rposition(|t| *t == Token::Divide) {
        Some(i) if i == 0 || i == tokens.len() - 1 => Expression::Invalid,
        Some(i) => binary(
            Expression::DivUnit,
            parse_target(&tokens[..i]),
            parse_target(&tokens[i + 1..]),
        ),
        None => parse_operand(tokens),
    }
}

/// Builds the expression tree of one line. Never fails: malformed input
/// yields [`Expression::Invalid`] nodes for the validator to report.
pub fn parse(tokens: &[Token]) -> Expression {
    let tokens = tokens.strip_suffix(&[Token::End]).unwrap_or(tokens);
    match tokens {
        [Token::Identifier(name), Token::Equals, value @ ..] => Expression::Assign {
            name: name.clone(),
            value: Box::new(parse_arithmetic(value)),
        },
        _ if tokens.contains(&Token::Equals) => Expression::Invalid,
        _ => parse_arithmetic(tokens),
    }
}
