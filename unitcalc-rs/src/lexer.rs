use logos::Logos;
use std::fmt::Display;
use tracing::trace;

use crate::error::LexingError;
use crate::unit_table::{UnitTable, UnitType};

/// Longest line the lexer accepts, in bytes.
pub const MAX_INPUT: usize = 256;

fn callback_float<'s>(lex: &mut logos::Lexer<'s, Lexeme<'s>>) -> Result<f64, LexingError> {
    let slice = lex.slice();
    slice.parse().map_err(LexingError::from)
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexingError)]
#[logos(skip r"[ \t\n]+")]
enum Lexeme<'s> {
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][0-9]+)?", callback_float)]
    Number(f64),
    // An exponent marker that is not followed by digits, e.g. `3.32e-2`.
    #[regex(r"[0-9]+(\.[0-9]*)?[eE]")]
    MalformedExponent,
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Word(&'s str),
    #[token("quit")]
    #[token("exit")]
    Quit,
    #[token("help")]
    Help,
    #[token("memory")]
    Memory,
    #[token("units")]
    Units,
    #[token("examples")]
    Examples,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("->")]
    Convert,
    #[token("*")]
    Multiply,
    #[token("/")]
    Divide,
    #[token("^")]
    Caret,
    #[token("=")]
    Equals,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Unit(UnitType),
    Identifier(String),
    Plus,
    Minus,
    Multiply,
    Divide,
    Caret,
    Convert,
    Equals,
    Quit,
    Help,
    Memory,
    Units,
    Examples,
    End,
    Invalid,
}

impl Token {
    /// Tokens after which a `-` is a binary minus rather than a negation.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Unit(_) | Token::Identifier(_)
        )
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(value) => write!(f, "Number({})", value),
            Token::Unit(unit_type) => write!(f, "Unit({})", unit_type),
            Token::Identifier(name) => write!(f, "Identifier({})", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Multiply => write!(f, "*"),
            Token::Divide => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::Convert => write!(f, "->"),
            Token::Equals => write!(f, "="),
            Token::Quit => write!(f, "quit/exit"),
            Token::Help => write!(f, "help"),
            Token::Memory => write!(f, "memory"),
            Token::Units => write!(f, "units"),
            Token::Examples => write!(f, "examples"),
            Token::End => write!(f, "end"),
            Token::Invalid => write!(f, "invalid"),
        }
    }
}

fn classify(lexeme: Lexeme<'_>, units: &UnitTable) -> Token {
    match lexeme {
        Lexeme::Number(value) => Token::Number(value),
        Lexeme::MalformedExponent => Token::Invalid,
        Lexeme::Word(word) => match units.resolve(word) {
            UnitType::Unknown => Token::Identifier(word.to_string()),
            unit_type => Token::Unit(unit_type),
        },
        Lexeme::Quit => Token::Quit,
        Lexeme::Help => Token::Help,
        Lexeme::Memory => Token::Memory,
        Lexeme::Units => Token::Units,
        Lexeme::Examples => Token::Examples,
        Lexeme::Plus => Token::Plus,
        Lexeme::Minus => Token::Minus,
        Lexeme::Convert => Token::Convert,
        Lexeme::Multiply => Token::Multiply,
        Lexeme::Divide => Token::Divide,
        Lexeme::Caret => Token::Caret,
        Lexeme::Equals => Token::Equals,
    }
}

/// Splits a line into tokens, resolving unit names against `units`.
///
/// Any unrecognised character, malformed number or overlong line turns the
/// whole result into a single [`Token::Invalid`]. The trailing
/// [`Token::End`] is not included.
pub fn tokenize(input: &str, units: &UnitTable) -> Vec<Token> {
    if input.len() > MAX_INPUT {
        return vec![Token::Invalid];
    }
    let mut tokens = Vec::new();
    for lexeme in Lexeme::lexer(input) {
        let token = match lexeme {
            Ok(lexeme) => classify(lexeme, units),
            Err(err) => {
                trace!(?err, "lexing failed");
                Token::Invalid
            }
        };
        if token == Token::Invalid {
            return vec![Token::Invalid];
        }
        trace!(%token, "token");
        tokens.push(token);
    }
    tokens
}
