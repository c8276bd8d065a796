// ABOUTME: Core library for evaluating arithmetic expressions with dice rolls.
// ABOUTME: Lexes, parses and evaluates notation like "4d8 k3h - 1d4 rr2" into a roll report.

//! # Dicenote
//!
//! Evaluates integer arithmetic mixed with tabletop dice notation and reports
//! every die that was rolled.
//!
//! ## Quick Start
//!
//! ```
//! use dicenote::roll;
//!
//! let report = roll("4d6 k3h + 2").unwrap();
//! println!("{}", report);
//! // Rolling: 4d6 k3h
//! //     [6, 5, 4, (1)] = 15
//! // 17
//! assert!(report.total >= 5 && report.total <= 20);
//! ```
//!
//! ## Supported Notation
//!
//! - Rolls: `2d6`, `1D20`
//! - Arithmetic: `+ - * /` with parentheses and unary signs; `/` rounds down
//! - Keep highest/lowest: `4d6 k3h`, `2d20 k1l`
//! - Reroll once at or below a threshold: `3d6 rr2`
//! - Reroll until above a threshold: `3d6 ru2`
//!
//! Modifiers apply left to right: `5d6 rr1 k3h` rerolls ones, then keeps three.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod limits;
pub mod parser;
pub mod report;
pub mod roller;

pub use ast::{Expr, Modifier, Op, RollSpec, Sign};
pub use error::{Error, ErrorKind, Result};
pub use limits::Limits;
pub use report::{Die, EvaluationReport, RollOutcome};
pub use roller::{FastRng, Rng};

/// Parse and roll a dice expression in one step.
///
/// # Examples
///
/// ```
/// let report = dicenote::roll("2d6 + 5").unwrap();
/// println!("Total: {}", report.total);
/// assert_eq!(report.rolls[0].notation, "2d6");
/// ```
pub fn roll(expr: &str) -> Result<EvaluationReport> {
    roll_with_rng(expr, &mut FastRng::new())
}

/// Parse and roll with a custom RNG.
///
/// Useful for testing or when you need reproducible results.
///
/// # Examples
///
/// ```
/// use dicenote::{roll_with_rng, FastRng};
///
/// let mut rng = FastRng::with_seed(42);
/// let report = roll_with_rng("2d6", &mut rng).unwrap();
/// ```
pub fn roll_with_rng(expr: &str, rng: &mut impl Rng) -> Result<EvaluationReport> {
    roll_with_limits(expr, rng, &Limits::default())
}

/// Parse and roll with a custom RNG and limits.
///
/// # Examples
///
/// ```
/// use dicenote::{roll_with_limits, ErrorKind, FastRng, Limits};
///
/// let limits = Limits { max_dice: 100, ..Limits::default() };
/// let err = roll_with_limits("1000d6", &mut FastRng::new(), &limits).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidDie);
/// ```
pub fn roll_with_limits(
    expr: &str,
    rng: &mut impl Rng,
    limits: &Limits,
) -> Result<EvaluationReport> {
    let parsed = parser::parse_with_limits(expr, limits)?;
    roller::evaluate_with_limits(&parsed, rng, limits)
}

/// Parse a dice expression without rolling.
///
/// Returns the AST representation of the expression.
///
/// # Examples
///
/// ```
/// use dicenote::{Expr, Modifier};
///
/// let expr = dicenote::parse("4d6 k3h").unwrap();
/// match expr {
///     Expr::Roll(spec) => {
///         assert_eq!(spec.count, 4);
///         assert_eq!(spec.sides, 6);
///         assert_eq!(spec.modifiers, vec![Modifier::KeepHighest(3)]);
///     }
///     _ => panic!("Expected a roll"),
/// }
/// ```
pub fn parse(input: &str) -> Result<Expr> {
    parser::parse(input)
}
