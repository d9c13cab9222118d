//! Dice notation parsing and evaluation.
//!
//! Supports the notation used for ability rolls, damage and starting money:
//! `XdY` terms and flat integers joined by `+`/`-`, optionally followed by a
//! single trailing `*N` that multiplies the whole sum (`3d6*10`).
//!
//! ```text
//! expression   := term (('+' | '-') term)* ('*' INTEGER)?
//! term         := diceTerm | INTEGER
//! diceTerm     := [INTEGER] 'd' INTEGER
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of dice a single term may roll.
pub const MAX_DICE_COUNT: u32 = 100;

/// Smallest allowed die.
pub const MIN_DICE_SIDES: u32 = 1;

/// Error type for dice formulas. Always raised before any die is rolled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceFormulaError {
    #[error("Empty dice formula")]
    Empty,
    #[error("Unexpected '{found}' at position {position} in \"{formula}\"")]
    UnexpectedToken {
        formula: String,
        position: usize,
        found: String,
    },
    #[error("Dice formula \"{0}\" ends unexpectedly")]
    UnexpectedEnd(String),
    #[error("Number too large in \"{0}\"")]
    NumberTooLarge(String),
    #[error("Cannot roll {count} dice (allowed: 1 to {max})")]
    DiceCountOutOfRange { count: u32, max: u32 },
    #[error("A die needs at least {min} side(s), got {sides}")]
    DieSidesOutOfRange { sides: u32, min: u32 },
    #[error("Multiplier must come last in \"{0}\"")]
    MultiplierNotLast(String),
}

/// Source of uniformly distributed die faces.
///
/// Every `rand::Rng` is a random source, so production code can pass
/// `rand::thread_rng()` and tests can pass a seeded `StdRng` or a
/// [`ScriptedRolls`](crate::testing::ScriptedRolls).
pub trait RandomSource {
    /// Returns a value in `1..=sides`. `sides` is never zero.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides)
    }
}

/// Adapts a `() -> f64` generator producing values in `[0, 1)`.
pub struct UnitInterval<F>(pub F);

impl<F: FnMut() -> f64> RandomSource for UnitInterval<F> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let sample = (self.0)();
        let face = (sample * f64::from(sides)).floor();
        if face.is_nan() || face < 0.0 {
            1
        } else {
            // Float-to-int casts saturate; the clamp handles samples >= 1.0.
            (face as u32).saturating_add(1).clamp(1, sides)
        }
    }
}

/// Sign applied to a term's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn apply(&self, value: i64) -> i64 {
        match self {
            Sign::Plus => value,
            Sign::Minus => -value,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
        }
    }
}

/// What a term contributes before its sign is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermKind {
    Dice { count: u32, sides: u32 },
    Flat(u32),
}

/// One signed term of a dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub sign: Sign,
    pub kind: TermKind,
}

impl Term {
    pub fn dice(sign: Sign, count: u32, sides: u32) -> Self {
        Self {
            sign,
            kind: TermKind::Dice { count, sides },
        }
    }

    pub fn flat(sign: Sign, value: u32) -> Self {
        Self {
            sign,
            kind: TermKind::Flat(value),
        }
    }

    fn min_value(&self) -> i64 {
        match (self.kind, self.sign) {
            (TermKind::Dice { count, .. }, Sign::Plus) => i64::from(count),
            (TermKind::Dice { count, sides }, Sign::Minus) => {
                -i64::from(count).saturating_mul(i64::from(sides))
            }
            (TermKind::Flat(value), sign) => sign.apply(i64::from(value)),
        }
    }

    fn max_value(&self) -> i64 {
        match (self.kind, self.sign) {
            (TermKind::Dice { count, sides }, Sign::Plus) => {
                i64::from(count).saturating_mul(i64::from(sides))
            }
            (TermKind::Dice { count, .. }, Sign::Minus) => -i64::from(count),
            (TermKind::Flat(value), sign) => sign.apply(i64::from(value)),
        }
    }
}

/// A parsed dice formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub formula: String,
    pub terms: Vec<Term>,
    pub multiplier: Option<u32>,
}

impl DiceExpression {
    /// Parse a dice formula with the standard dice-count ceiling.
    pub fn parse(formula: &str) -> Result<Self, DiceFormulaError> {
        Self::parse_with_limit(formula, MAX_DICE_COUNT)
    }

    /// Parse a dice formula, rejecting terms that roll more than `max_dice` dice.
    pub fn parse_with_limit(formula: &str, max_dice: u32) -> Result<Self, DiceFormulaError> {
        let formula = formula.trim();
        if formula.is_empty() {
            return Err(DiceFormulaError::Empty);
        }

        let tokens = tokenize(formula)?;
        let mut parser = Parser {
            formula,
            tokens,
            pos: 0,
            max_dice,
        };
        let (terms, multiplier) = parser.expression()?;

        Ok(DiceExpression {
            formula: formula.to_string(),
            terms,
            multiplier,
        })
    }

    /// Total number of dice rolled by one evaluation, saturating at `u32::MAX`.
    pub fn dice_count(&self) -> u32 {
        self.terms
            .iter()
            .map(|t| match t.kind {
                TermKind::Dice { count, .. } => count,
                TermKind::Flat(_) => 0,
            })
            .fold(0, u32::saturating_add)
    }

    /// Smallest total this expression can produce.
    pub fn min_total(&self) -> i64 {
        let sum = self.terms.iter().map(Term::min_value).fold(0, i64::saturating_add);
        self.apply_multiplier(sum)
    }

    /// Largest total this expression can produce.
    pub fn max_total(&self) -> i64 {
        let sum = self.terms.iter().map(Term::max_value).fold(0, i64::saturating_add);
        self.apply_multiplier(sum)
    }

    fn apply_multiplier(&self, sum: i64) -> i64 {
        match self.multiplier {
            Some(m) => sum.saturating_mul(i64::from(m)),
            None => sum,
        }
    }

    /// Roll the expression with an injected random source.
    pub fn evaluate<R: RandomSource + ?Sized>(&self, random: &mut R) -> RollResult {
        let mut rolls = Vec::with_capacity(self.dice_count() as usize);
        let mut parts = Vec::with_capacity(self.terms.len() + 1);
        let mut sum: i64 = 0;

        for (index, term) in self.terms.iter().enumerate() {
            // The leading term only shows its sign when negative.
            let sign = match (index, term.sign) {
                (0, Sign::Plus) => String::new(),
                (_, sign) => sign.to_string(),
            };

            match term.kind {
                TermKind::Dice { count, sides } => {
                    let start = rolls.len();
                    rolls.extend((0..count).map(|_| random.roll_die(sides)));
                    let term_rolls = &rolls[start..];
                    let subtotal: i64 = term_rolls.iter().map(|&r| i64::from(r)).sum();
                    sum = sum.saturating_add(term.sign.apply(subtotal));
                    parts.push(format!(
                        "{sign}[{}]={subtotal}",
                        term_rolls
                            .iter()
                            .map(|r| r.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ));
                }
                TermKind::Flat(value) => {
                    sum = sum.saturating_add(term.sign.apply(i64::from(value)));
                    parts.push(format!("{sign}{value}"));
                }
            }
        }

        let total = self.apply_multiplier(sum);
        if let Some(m) = self.multiplier {
            parts.push(format!("*{m}={total}"));
        }

        RollResult {
            formula: self.formula.clone(),
            total,
            rolls,
            breakdown: parts.join(" "),
        }
    }

    /// Roll using the thread-local RNG.
    pub fn roll(&self) -> RollResult {
        self.evaluate(&mut rand::thread_rng())
    }
}

impl FromStr for DiceExpression {
    type Err = DiceFormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formula)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number(u32),
    Die,
    Plus,
    Minus,
    Star,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Die => write!(f, "d"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
        }
    }
}

fn tokenize(formula: &str) -> Result<Vec<(usize, Token)>, DiceFormulaError> {
    let mut tokens = Vec::new();
    let mut chars = formula.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        let token = match ch {
            c if c.is_ascii_whitespace() => continue,
            '0'..='9' => {
                let mut value = ch.to_digit(10).unwrap_or_default();
                while let Some(&(_, next)) = chars.peek() {
                    let Some(digit) = next.to_digit(10) else {
                        break;
                    };
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(digit))
                        .ok_or_else(|| DiceFormulaError::NumberTooLarge(formula.to_string()))?;
                    chars.next();
                }
                Token::Number(value)
            }
            'd' | 'D' => Token::Die,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            other => {
                return Err(DiceFormulaError::UnexpectedToken {
                    formula: formula.to_string(),
                    position,
                    found: other.to_string(),
                })
            }
        };
        tokens.push((position, token));
    }

    Ok(tokens)
}

struct Parser<'a> {
    formula: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
    max_dice: u32,
}

impl Parser<'_> {
    fn next(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|&(_, t)| t)
    }

    fn unexpected(&self, position: usize, token: Token) -> DiceFormulaError {
        DiceFormulaError::UnexpectedToken {
            formula: self.formula.to_string(),
            position,
            found: token.to_string(),
        }
    }

    fn expression(&mut self) -> Result<(Vec<Term>, Option<u32>), DiceFormulaError> {
        let mut terms = vec![self.term(Sign::Plus)?];

        loop {
            match self.next() {
                None => return Ok((terms, None)),
                Some((_, Token::Plus)) => terms.push(self.term(Sign::Plus)?),
                Some((_, Token::Minus)) => terms.push(self.term(Sign::Minus)?),
                Some((_, Token::Star)) => {
                    let multiplier = self.number()?;
                    if self.peek().is_some() {
                        return Err(DiceFormulaError::MultiplierNotLast(self.formula.to_string()));
                    }
                    return Ok((terms, Some(multiplier)));
                }
                Some((position, token)) => return Err(self.unexpected(position, token)),
            }
        }
    }

    fn term(&mut self, sign: Sign) -> Result<Term, DiceFormulaError> {
        match self.next() {
            Some((_, Token::Number(value))) => {
                if self.peek() == Some(Token::Die) {
                    self.pos += 1;
                    let sides = self.number()?;
                    self.dice(sign, value, sides)
                } else {
                    Ok(Term::flat(sign, value))
                }
            }
            Some((_, Token::Die)) => {
                let sides = self.number()?;
                self.dice(sign, 1, sides)
            }
            Some((position, token)) => Err(self.unexpected(position, token)),
            None => Err(DiceFormulaError::UnexpectedEnd(self.formula.to_string())),
        }
    }

    fn number(&mut self) -> Result<u32, DiceFormulaError> {
        match self.next() {
            Some((_, Token::Number(value))) => Ok(value),
            Some((position, token)) => Err(self.unexpected(position, token)),
            None => Err(DiceFormulaError::UnexpectedEnd(self.formula.to_string())),
        }
    }

    fn dice(&self, sign: Sign, count: u32, sides: u32) -> Result<Term, DiceFormulaError> {
        if count == 0 || count > self.max_dice {
            return Err(DiceFormulaError::DiceCountOutOfRange {
                count,
                max: self.max_dice,
            });
        }
        if sides < MIN_DICE_SIDES {
            return Err(DiceFormulaError::DieSidesOutOfRange {
                sides,
                min: MIN_DICE_SIDES,
            });
        }
        Ok(Term::dice(sign, count, sides))
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub formula: String,
    pub total: i64,
    /// Every individual die, in term order. Flat terms add nothing here.
    pub rolls: Vec<u32>,
    pub breakdown: String,
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} => {}", self.formula, self.breakdown, self.total)
    }
}

/// Parse a dice formula.
pub fn parse_dice(formula: &str) -> Result<DiceExpression, DiceFormulaError> {
    DiceExpression::parse(formula)
}

/// Evaluate a parsed expression with the given random source.
pub fn evaluate_dice<R: RandomSource + ?Sized>(
    expr: &DiceExpression,
    random: &mut R,
) -> RollResult {
    expr.evaluate(random)
}

/// Parse and roll in one step with the given random source.
pub fn roll_with<R: RandomSource + ?Sized>(
    formula: &str,
    random: &mut R,
) -> Result<RollResult, DiceFormulaError> {
    Ok(DiceExpression::parse(formula)?.evaluate(random))
}

/// Convenience function to roll dice from a notation string.
pub fn roll(formula: &str) -> Result<RollResult, DiceFormulaError> {
    let expr = DiceExpression::parse(formula)?;
    Ok(expr.roll())
}
