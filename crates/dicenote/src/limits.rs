// ABOUTME: Resource limits applied while parsing and rolling.
// ABOUTME: Bounds nesting depth, expression length, dice per roll and rerolls.

/// Default maximum nesting of parentheses and unary signs.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum number of dice in a single roll term.
pub const DEFAULT_MAX_DICE: u32 = 10_000;

/// Default maximum number of binary operators in one expression.
pub const DEFAULT_MAX_OPERATORS: usize = 1_000;

/// Rerolls of a single die by `ru` before the final value is drawn
/// directly from the faces above the threshold.
pub const MAX_REROLLS: u32 = 100;

/// Limits for one evaluation.
///
/// ```
/// use dicenote::Limits;
///
/// let limits = Limits { max_depth: 8, ..Limits::default() };
/// assert_eq!(limits.max_dice, dicenote::limits::DEFAULT_MAX_DICE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest allowed nesting of `(` and unary `+`/`-`.
    pub max_depth: usize,
    /// Most dice a single roll term may ask for.
    pub max_dice: u32,
    /// Most binary operators (`+ - * /`) a whole expression may contain.
    pub max_operators: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_dice: DEFAULT_MAX_DICE,
            max_operators: DEFAULT_MAX_OPERATORS,
        }
    }
}
