// ABOUTME: Dice rolling, modifier application and expression evaluation.
// ABOUTME: Evaluates parsed AST nodes into a total and an ordered roll report.

use crate::ast::{Expr, Modifier, Op, RollSpec, Sign};
use crate::error::{Error, Result};
use crate::limits::{Limits, MAX_REROLLS};
use crate::report::{Die, EvaluationReport, RollOutcome};
use log::{debug, trace};

/// Trait for random number generation, allowing for testing with fixed values.
pub trait Rng {
    /// Generate a random number in the range [1, max].
    fn roll(&mut self, max: u32) -> u32;
}

/// Default RNG using fastrand.
pub struct FastRng(fastrand::Rng);

impl FastRng {
    pub fn new() -> Self {
        Self(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for FastRng {
    fn default() -> Self {
        Self::new()
    }
}

impl Rng for FastRng {
    fn roll(&mut self, max: u32) -> u32 {
        self.0.u32(1..=max)
    }
}

/// Roll one die with `sides` sides.
pub fn roll_die(rng: &mut impl Rng, sides: u32) -> Result<u32> {
    if sides < 1 {
        return Err(Error::InvalidDiceSides(sides));
    }
    Ok(rng.roll(sides))
}

/// Roll `count` independent dice with `sides` sides each.
pub fn roll_set(rng: &mut impl Rng, count: u32, sides: u32) -> Result<Vec<Die>> {
    if count < 1 {
        return Err(Error::InvalidDiceCount(count));
    }
    (0..count)
        .map(|_| roll_die(rng, sides).map(Die::new))
        .collect()
}

/// Apply one modifier to the dice produced so far.
///
/// Keep modifiers sort the dice still in play and mark the rest as dropped;
/// among equal values the die listed first is kept. Dropped dice stay in the
/// list, after the kept ones, and are ignored by later modifiers.
pub fn apply_modifier(
    rng: &mut impl Rng,
    dice: Vec<Die>,
    sides: u32,
    modifier: Modifier,
) -> Result<Vec<Die>> {
    match modifier {
        Modifier::KeepHighest(n) => keep(dice, n, true),
        Modifier::KeepLowest(n) => keep(dice, n, false),
        Modifier::RerollBelowOrEqual(threshold) => reroll_once(rng, dice, sides, threshold),
        Modifier::RerollUntilAbove(threshold) => reroll_until_above(rng, dice, sides, threshold),
    }
}

fn keep(dice: Vec<Die>, n: u32, highest: bool) -> Result<Vec<Die>> {
    let (mut in_play, dropped): (Vec<Die>, Vec<Die>) = dice.into_iter().partition(|d| !d.dropped);

    let available = in_play.len();
    if n == 0 || n as usize > available {
        return Err(Error::InvalidKeep {
            count: n,
            available,
        });
    }

    // Both sorts are stable, so ties keep their roll order.
    if highest {
        in_play.sort_by(|a, b| b.value.cmp(&a.value));
    } else {
        in_play.sort_by_key(|d| d.value);
    }

    for die in &mut in_play[n as usize..] {
        die.dropped = true;
    }

    in_play.extend(dropped);
    Ok(in_play)
}

fn reroll_once(rng: &mut impl Rng, mut dice: Vec<Die>, sides: u32, threshold: u32) -> Result<Vec<Die>> {
    for die in dice.iter_mut().filter(|d| !d.dropped) {
        if die.value <= threshold {
            let value = roll_die(rng, sides)?;
            die.rolls.push(value);
            die.value = value;
        }
    }
    Ok(dice)
}

fn reroll_until_above(
    rng: &mut impl Rng,
    mut dice: Vec<Die>,
    sides: u32,
    threshold: u32,
) -> Result<Vec<Die>> {
    if threshold >= sides {
        return Err(Error::InvalidModifier(format!(
            "ru{} can never finish on a d{}",
            threshold, sides
        )));
    }

    for die in dice.iter_mut().filter(|d| !d.dropped) {
        let mut reroll_count = 0;
        while die.value <= threshold {
            // Past the cap, draw straight from the faces above the threshold.
            let value = if reroll_count < MAX_REROLLS {
                roll_die(rng, sides)?
            } else {
                trace!("ru{} on d{}: {} rerolls, drawing above threshold", threshold, sides, MAX_REROLLS);
                roll_die(rng, sides - threshold)? + threshold
            };
            die.rolls.push(value);
            die.value = value;
            reroll_count += 1;
        }
    }
    Ok(dice)
}

/// Integer division rounding toward negative infinity.
fn floor_div(left: i64, right: i64) -> Result<i64> {
    if right == 0 {
        return Err(Error::DivisionByZero);
    }
    let quotient = left.checked_div(right).ok_or(Error::Overflow)?;
    if left % right != 0 && (left < 0) != (right < 0) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

/// Evaluate a dice expression with the default RNG.
pub fn evaluate(expr: &Expr) -> Result<EvaluationReport> {
    evaluate_with_rng(expr, &mut FastRng::new())
}

/// Evaluate a dice expression with a custom RNG.
pub fn evaluate_with_rng(expr: &Expr, rng: &mut impl Rng) -> Result<EvaluationReport> {
    evaluate_with_limits(expr, rng, &Limits::default())
}

/// Evaluate a dice expression with a custom RNG and limits.
pub fn evaluate_with_limits(
    expr: &Expr,
    rng: &mut impl Rng,
    limits: &Limits,
) -> Result<EvaluationReport> {
    let mut evaluator = Evaluator {
        rng,
        limits,
        rolls: Vec::new(),
    };
    let total = evaluator.evaluate(expr)?;
    Ok(EvaluationReport {
        rolls: evaluator.rolls,
        total,
    })
}

struct Evaluator<'a, R: Rng> {
    rng: &'a mut R,
    limits: &'a Limits,
    rolls: Vec<RollOutcome>,
}

impl<R: Rng> Evaluator<'_, R> {
    fn evaluate(&mut self, expr: &Expr) -> Result<i64> {
        match expr {
            Expr::Number(n) => Ok(*n),
            Expr::Roll(spec) => self.evaluate_roll(spec),
            Expr::Unary { op, expr } => {
                let value = self.evaluate(expr)?;
                let result = match op {
                    Sign::Plus => Ok(value),
                    Sign::Minus => value.checked_neg().ok_or(Error::Overflow),
                };
                trace!("{}{} = {:?}", op, value, result);
                result
            }
            Expr::BinOp { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let result = match op {
                    Op::Add => left.checked_add(right).ok_or(Error::Overflow),
                    Op::Sub => left.checked_sub(right).ok_or(Error::Overflow),
                    Op::Mul => left.checked_mul(right).ok_or(Error::Overflow),
                    Op::Div => floor_div(left, right),
                };
                trace!("{} {} {} = {:?}", left, op, right, result);
                result
            }
        }
    }

    fn evaluate_roll(&mut self, spec: &RollSpec) -> Result<i64> {
        if spec.count > self.limits.max_dice {
            return Err(Error::InvalidDiceCount(spec.count));
        }

        let mut dice = roll_set(self.rng, spec.count, spec.sides)?;
        for modifier in &spec.modifiers {
            dice = apply_modifier(self.rng, dice, spec.sides, *modifier)?;
        }

        let total = dice
            .iter()
            .filter(|d| !d.dropped)
            .try_fold(0i64, |sum, d| sum.checked_add(i64::from(d.value)))
            .ok_or(Error::Overflow)?;

        debug!(
            "rolled {}: {:?} = {}",
            spec.notation,
            dice.iter().map(|d| d.value).collect::<Vec<_>>(),
            total
        );

        self.rolls.push(RollOutcome {
            notation: spec.notation.clone(),
            dice,
            total,
        });
        Ok(total)
    }
}
