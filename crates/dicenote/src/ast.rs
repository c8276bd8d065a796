// ABOUTME: Abstract Syntax Tree types for dice expressions.
// ABOUTME: Represents parsed expressions like "4d8 k3h - 1d4 rr2" and parses roll literals.

use crate::error::{Error, Result};
use std::fmt;

/// A complete dice expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal number.
    Number(i64),
    /// A dice roll with optional modifiers.
    Roll(RollSpec),
    /// A unary sign applied to a sub-expression.
    Unary { op: Sign, expr: Box<Expr> },
    /// A binary operation (e.g., addition, subtraction).
    BinOp {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// A dice roll term (e.g., "4d8 k3h").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollSpec {
    /// Number of dice to roll.
    pub count: u32,
    /// Number of sides on each die.
    pub sides: u32,
    /// Modifiers, applied in order.
    pub modifiers: Vec<Modifier>,
    /// The notation exactly as written in the input.
    pub notation: String,
}

impl RollSpec {
    /// Parse a roll literal such as `"2d6"`, `"4D8 k3h"` or `"3d6 rr2 k2l"`.
    ///
    /// ```
    /// use dicenote::{Modifier, RollSpec};
    ///
    /// let spec = RollSpec::parse("4d8 k3h").unwrap();
    /// assert_eq!(spec.count, 4);
    /// assert_eq!(spec.sides, 8);
    /// assert_eq!(spec.modifiers, vec![Modifier::KeepHighest(3)]);
    /// ```
    pub fn parse(notation: &str) -> Result<Self> {
        let mut scan = Scanner::new(notation);

        let count = scan
            .digits()
            .ok_or_else(|| expected_in(notation, "dice count"))
            .and_then(|text| dice_number("count", text))?;
        if !scan.eat_any(b"dD") {
            return Err(expected_in(notation, "'d'"));
        }
        let sides = scan
            .digits()
            .ok_or_else(|| expected_in(notation, "dice sides"))
            .and_then(|text| dice_number("sides", text))?;

        if count == 0 {
            return Err(Error::InvalidDiceCount(count));
        }
        if sides == 0 {
            return Err(Error::InvalidDiceSides(sides));
        }

        let mut modifiers = Vec::new();
        loop {
            scan.skip_whitespace();
            if scan.is_done() {
                break;
            }
            modifiers.push(scan.modifier()?);
        }

        Ok(Self {
            count,
            sides,
            modifiers,
            notation: notation.to_string(),
        })
    }
}

impl fmt::Display for RollSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation)
    }
}

fn dice_number(what: &'static str, text: &str) -> Result<u32> {
    text.parse().map_err(|_| Error::DiceOutOfRange {
        what,
        text: text.to_string(),
    })
}

fn expected_in(notation: &str, what: &str) -> Error {
    Error::Expected {
        expected: what.to_string(),
        found: format!("{:?}", notation),
    }
}

/// Byte cursor over an ASCII roll literal.
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or("")
    }

    fn eat_any(&mut self, set: &[u8]) -> bool {
        match self.peek() {
            Some(b) if set.contains(&b) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn eat_str(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// A non-empty run of ASCII digits.
    fn digits(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        (self.pos > start).then(|| &self.text[start..self.pos])
    }

    fn modifier(&mut self) -> Result<Modifier> {
        let start = self.pos;

        if self.eat_str("rr") {
            let threshold = self.modifier_number(start)?;
            return Ok(Modifier::RerollBelowOrEqual(threshold));
        }
        if self.eat_str("ru") {
            let threshold = self.modifier_number(start)?;
            return Ok(Modifier::RerollUntilAbove(threshold));
        }
        if self.eat_str("k") {
            let count = self.modifier_number(start)?;
            return match self.peek() {
                Some(b'h' | b'H') => {
                    self.pos += 1;
                    Ok(Modifier::KeepHighest(count))
                }
                Some(b'l' | b'L') => {
                    self.pos += 1;
                    Ok(Modifier::KeepLowest(count))
                }
                _ => Err(self.malformed(start)),
            };
        }

        Err(self.malformed(start))
    }

    /// The numeric argument of the modifier that began at `start`.
    fn modifier_number(&mut self, start: usize) -> Result<u32> {
        match self.digits().map(str::parse::<u32>) {
            Some(Ok(n)) => Ok(n),
            _ => Err(self.malformed(start)),
        }
    }

    /// The word starting at `start`, reported as a bad modifier.
    fn malformed(&self, start: usize) -> Error {
        let end = self.text[start..]
            .find(char::is_whitespace)
            .map_or(self.text.len(), |i| start + i);
        Error::InvalidModifier(self.text[start..end].to_string())
    }
}

/// A unary sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
        }
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Add => write!(f, "+"),
            Op::Sub => write!(f, "-"),
            Op::Mul => write!(f, "*"),
            Op::Div => write!(f, "/"),
        }
    }
}

/// A modifier applied to a dice roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Keep the highest N dice still in play (`k3h`).
    KeepHighest(u32),
    /// Keep the lowest N dice still in play (`k3l`).
    KeepLowest(u32),
    /// Reroll each die at or below the threshold exactly once (`rr2`).
    RerollBelowOrEqual(u32),
    /// Reroll each die at or below the threshold until it lands above it (`ru2`).
    RerollUntilAbove(u32),
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::KeepHighest(n) => write!(f, "k{}h", n),
            Modifier::KeepLowest(n) => write!(f, "k{}l", n),
            Modifier::RerollBelowOrEqual(t) => write!(f, "rr{}", t),
            Modifier::RerollUntilAbove(t) => write!(f, "ru{}", t),
        }
    }
}
