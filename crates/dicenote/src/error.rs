// ABOUTME: Error types for the dicenote library.
// ABOUTME: Covers lexing, parsing, dice validation, modifiers and arithmetic.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("Number too large: {0}")]
    NumberTooLarge(String),

    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Expected {expected}, found {found}")]
    Expected { expected: String, found: String },

    #[error("Expression nested too deeply (max {0} levels)")]
    NestingLimit(usize),

    #[error("Expression too long (max {0} operators)")]
    OperatorLimit(usize),

    #[error("Invalid dice count: {0}")]
    InvalidDiceCount(u32),

    #[error("Invalid dice sides: {0}")]
    InvalidDiceSides(u32),

    #[error("Dice {what} out of range: {text}")]
    DiceOutOfRange { what: &'static str, text: String },

    #[error("Cannot keep {count} of {available} dice")]
    InvalidKeep { count: u32, available: usize },

    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow")]
    Overflow,
}

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input contains a character the lexer does not recognize.
    Lex,
    /// The tokens do not form a valid expression.
    Syntax,
    /// A die count or side count is out of range.
    InvalidDie,
    /// A modifier cannot be applied to the dice it was given.
    InvalidModifier,
    DivisionByZero,
    /// A literal or intermediate value does not fit in an `i64`.
    Overflow,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedChar(..) => ErrorKind::Lex,
            Error::UnexpectedEof
            | Error::Expected { .. }
            | Error::NestingLimit(_)
            | Error::OperatorLimit(_) => ErrorKind::Syntax,
            Error::InvalidDiceCount(_)
            | Error::InvalidDiceSides(_)
            | Error::DiceOutOfRange { .. } => ErrorKind::InvalidDie,
            Error::InvalidKeep { .. } | Error::InvalidModifier(_) => ErrorKind::InvalidModifier,
            Error::DivisionByZero => ErrorKind::DivisionByZero,
            Error::NumberTooLarge(_) | Error::Overflow => ErrorKind::Overflow,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
