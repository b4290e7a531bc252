use std::fmt::{self, Display};
use std::str::FromStr;
use regex::Regex;
use crate::error::*;

/// An elementary rule in Wolfram numbering.
///
/// Bit `v` of the rule is the next state of a cell whose neighborhood
/// `left << 2 | centre << 1 | right` equals `v`. E.g. rule 30:
/// ```ignored
/// 111 110 101 100 011 010 001 000
///  0   0   0   1   1   1   1   0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rule(u8);

impl Rule {
  /// Every neighborhood dies.
  pub const DEATH: Rule = Rule(0);
  /// Every cell keeps its own state.
  pub const ECHO: Rule = Rule(0b1100_1100);
  /// Every neighborhood is born.
  pub const LIFE: Rule = Rule(0xff);

  pub fn new(value: i64) -> Result<Self> {
    if (0..=255).contains(&value) {
      Ok(Rule(value as u8))
    } else {
      Err(Invalid::RuleOutOfRange(value).into())
    }
  }

  pub fn value(self) -> u8 {
    self.0
  }

  /// Next state (0 or 1) of a cell with the given `neighborhood` in `0..8`.
  #[inline]
  pub fn evaluate(self, neighborhood: u8) -> u8 {
    debug_assert!(neighborhood < 8);
    self.0 >> (neighborhood & 0b111) & 1
  }

  /// `(neighborhood, next state)` pairs from `111` down to `000`.
  pub fn table(self) -> [(u8, u8); 8] {
    let mut table = [(0, 0); 8];
    for (i, entry) in table.iter_mut().enumerate() {
      let v = 7 - i as u8;
      *entry = (v, self.evaluate(v));
    }
    table
  }
}

/// Packs a `(left, centre, right)` window into a rule index.
#[inline]
pub fn neighborhood(left: u8, centre: u8, right: u8) -> u8 {
  left << 2 | centre << 1 | right
}

impl From<u8> for Rule {
  fn from(value: u8) -> Self {
    Rule(value)
  }
}

impl TryFrom<i64> for Rule {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> {
    Rule::new(value)
  }
}

impl FromStr for Rule {
  type Err = Error;

  /// Accepts `30`, `W30` and `rule 30`, case-insensitively.
  fn from_str(s: &str) -> Result<Self> {
    let re = Regex::new(r"(?i)^\s*(?:w|rule\s*)?(-?\d+)\s*$")
      .map_err(|_| Invalid::MalformedRule(s.to_owned()))?;
    let caps = re.captures(s)
      .ok_or_else(|| Invalid::MalformedRule(s.to_owned()))?;
    let value = caps[1].parse::<i64>()
      .map_err(|_| Invalid::MalformedRule(s.to_owned()))?;
    Rule::new(value)
  }
}

impl Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "W{}", self.0)
  }
}
