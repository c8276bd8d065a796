// ABOUTME: Lexer for dice expressions.
// ABOUTME: Tokenizes strings like "4d8 k3h - 1d4 rr2" into rolls, integers and operators.

use crate::error::{Error, Result};
use log::trace;

/// A token in the dice expression language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An integer literal.
    Integer(i64),
    /// A complete dice roll with its modifiers, exactly as written.
    Roll(String),
    /// Addition operator.
    Plus,
    /// Subtraction operator.
    Minus,
    /// Multiplication operator.
    Star,
    /// Division operator.
    Slash,
    /// Left parenthesis.
    LParen,
    /// Right parenthesis.
    RParen,
    /// End of input.
    Eof,
}

/// A lexer for dice expressions.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Get the current position in the input.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Result<Token> {
        let saved_pos = self.pos;
        let token = self.next_token();
        self.pos = saved_pos;
        token
    }

    /// Get the next token from the input.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let Some(ch) = self.input[self.pos..].chars().next() else {
            return Ok(Token::Eof);
        };

        let start = self.pos;
        let token = match ch {
            '0'..='9' => match self.match_roll(start) {
                Some(end) => {
                    self.pos = end;
                    Token::Roll(self.input[start..end].to_string())
                }
                None => self.integer()?,
            },
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' => self.single(Token::Star),
            '/' => self.single(Token::Slash),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            _ => return Err(Error::UnexpectedChar(ch, start)),
        };

        trace!("token {:?} at {}", token, start);
        Ok(token)
    }

    fn single(&mut self, token: Token) -> Token {
        self.pos += 1;
        token
    }

    fn skip_whitespace(&mut self) {
        self.pos = skip_whitespace(self.input.as_bytes(), self.pos);
    }

    fn integer(&mut self) -> Result<Token> {
        let start = self.pos;
        self.pos = digits(self.input.as_bytes(), start).unwrap_or(start);
        let text = &self.input[start..self.pos];
        text.parse()
            .map(Token::Integer)
            .map_err(|_| Error::NumberTooLarge(text.to_string()))
    }

    /// Match the longest roll literal starting at `start`, returning its end.
    ///
    /// A roll is `<digits>(d|D)<digits>` followed by any number of modifiers,
    /// each optionally preceded by whitespace: `k<digits>(h|H|l|L)`,
    /// `rr<digits>` or `ru<digits>`. Whitespace after the last modifier is not
    /// part of the match.
    fn match_roll(&self, start: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();

        let pos = digits(bytes, start)?;
        if !matches!(bytes.get(pos), Some(b'd' | b'D')) {
            return None;
        }
        let mut end = digits(bytes, pos + 1)?;

        while let Some(next) = modifier(bytes, skip_whitespace(bytes, end)) {
            end = next;
        }

        Some(end)
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while matches!(bytes.get(pos), Some(b) if b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}

/// End of a non-empty run of ASCII digits at `pos`.
fn digits(bytes: &[u8], pos: usize) -> Option<usize> {
    let end = pos + bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
    (end > pos).then_some(end)
}

/// End of a single modifier suffix at `pos`.
fn modifier(bytes: &[u8], pos: usize) -> Option<usize> {
    let rest = &bytes[pos..];
    if rest.starts_with(b"rr") || rest.starts_with(b"ru") {
        return digits(bytes, pos + 2);
    }
    if rest.starts_with(b"k") {
        let end = digits(bytes, pos + 1)?;
        return matches!(bytes.get(end), Some(b'h' | b'H' | b'l' | b'L')).then_some(end + 1);
    }
    None
}

/// Tokenize the whole input, including the trailing [`Token::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token == Token::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
