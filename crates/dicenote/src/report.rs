// ABOUTME: Result types produced by evaluating a dice expression.
// ABOUTME: Records every roll in textual order with kept, dropped and rerolled dice.

use serde::Serialize;
use std::fmt;

/// A single die as it stands after all modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Die {
    /// The value this die currently shows.
    pub value: u32,
    /// Every value this die showed, first roll first.
    pub rolls: Vec<u32>,
    /// Whether a keep modifier discarded this die.
    pub dropped: bool,
}

impl Die {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            rolls: vec![value],
            dropped: false,
        }
    }

    /// Whether this die was rerolled at least once.
    pub fn rerolled(&self) -> bool {
        self.rolls.len() > 1
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.rerolled() {
            self.rolls
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("->")
        } else {
            self.value.to_string()
        };

        if self.dropped {
            write!(f, "({})", shown)
        } else {
            write!(f, "{}", shown)
        }
    }
}

/// The outcome of one roll term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    /// The roll notation as written in the input.
    pub notation: String,
    /// Kept dice first, in modifier order, followed by dropped dice.
    pub dice: Vec<Die>,
    /// Sum of the kept dice.
    pub total: i64,
}

impl RollOutcome {
    /// Dice that count towards the total.
    pub fn kept(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter().filter(|d| !d.dropped)
    }

    /// Dice discarded by a keep modifier.
    pub fn dropped(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter().filter(|d| d.dropped)
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice = self
            .dice
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Rolling: {}\n\t[{}] = {}", self.notation, dice, self.total)
    }
}

/// Everything rolled while evaluating an expression, plus its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    /// One entry per roll term, in the order they appear in the input.
    pub rolls: Vec<RollOutcome>,
    /// The value of the whole expression.
    pub total: i64,
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for roll in &self.rolls {
            writeln!(f, "{}", roll)?;
        }
        write!(f, "{}", self.total)
    }
}
