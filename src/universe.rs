use std::iter::FusedIterator;
use log::{debug, trace};
use crate::error::*;
use crate::row::*;
use crate::rule::*;

/// A ring of cells evolving under a fixed rule.
#[derive(Debug, Clone)]
pub struct Universe {
  row: Row,
  rule: Rule,
  generation: usize,
}

impl Universe {
  pub fn new(rule: Rule, initial: Row) -> Self {
    Self {
      row: initial,
      rule,
      generation: 0,
    }
  }

  /// Builds a universe of the default width.
  pub fn configure(rule: i64, initial: Option<Row>) -> Result<Self> {
    Self::configure_width(DEFAULT_WIDTH, rule, initial)
  }

  /// Builds a universe of `width` cells. The rule must lie in `0..=255` and
  /// the initial row must be present and exactly `width` cells wide.
  pub fn configure_width(
    width: u32,
    rule: i64,
    initial: Option<Row>,
  ) -> Result<Self> {
    check_width(width)?;
    let rule = Rule::new(rule)?;
    let row = initial.ok_or(Invalid::MissingRow)?;
    if row.width() != width {
      return Err(Invalid::WidthMismatch {
        expected: width,
        actual: row.width(),
      }.into());
    }

    debug!("configured {} on {} cells, initial population {}",
      rule, width, row.cells());
    Ok(Self::new(rule, row))
  }

  pub fn rule(&self) -> Rule {
    self.rule
  }

  pub fn width(&self) -> u32 {
    self.row.width()
  }

  /// Number of generations advanced so far.
  pub fn generation(&self) -> usize {
    self.generation
  }

  pub fn current_row(&self) -> Row {
    self.row
  }

  /// Advances one generation and returns the new row.
  pub fn advance(&mut self) -> Row {
    self.row = step(self.row, self.rule);
    self.generation += 1;
    trace!("generation {}: {}", self.generation, self.row);
    self.row
  }

  /// `num_gen` is number of generations.
  pub fn simulate(&mut self, num_gen: usize) {
    for _ in 0..num_gen {
      self.advance();
    }
  }

  /// The present row followed by the next `num_gen` generations.
  pub fn generations(&self, num_gen: usize) -> Generations {
    run(self.row, self.rule, num_gen)
  }
}

/// Computes the next generation of `row`.
///
/// Cell `i` reads its left neighbor at `i + 1` and its right neighbor at
/// `i - 1`, both modulo the width, so the most and least significant cells
/// are adjacent. Every cell reads from `row`; the result is assembled in a
/// separate bitfield.
pub fn step(row: Row, rule: Rule) -> Row {
  let width = row.width();
  let mut next = 0u64;
  for i in 0..width {
    let left = row.get((i + 1) % width);
    let centre = row.get(i);
    let right = row.get((i + width - 1) % width);
    let state = rule.evaluate(neighborhood(left, centre, right));
    next |= (state as u64) << i;
  }
  Row::from_raw(next, width)
}

/// `initial` followed by `num_gen` successive generations.
pub fn run(initial: Row, rule: Rule, num_gen: usize) -> Generations {
  Generations {
    next: Some(initial),
    rule,
    remaining: num_gen,
  }
}

/// Lazily computed rows of a run; each row is derived from the one before.
#[derive(Debug, Clone)]
pub struct Generations {
  next: Option<Row>,
  rule: Rule,
  remaining: usize,
}

impl Iterator for Generations {
  type Item = Row;

  fn next(&mut self) -> Option<Row> {
    let row = self.next.take()?;
    if self.remaining > 0 {
      self.remaining -= 1;
      self.next = Some(step(row, self.rule));
    }
    Some(row)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let len = if self.next.is_some() { self.remaining + 1 } else { 0 };
    (len, Some(len))
  }
}

impl ExactSizeIterator for Generations {}

impl FusedIterator for Generations {}

#[cfg(test)]
mod tests {
  use super::*;

  fn pattern(s: &str) -> Row {
    Row::from_pattern(s).unwrap()
  }

  #[test]
  fn test_step_wraps_both_ends() {
    let rule = Rule::from(0b0010_0000u8);
    assert_eq!(step(pattern("10000001"), rule), pattern("00000000"));
    assert_eq!(step(pattern("01000001"), rule), pattern("10000000"));
    assert_eq!(step(pattern("10000010"), rule), pattern("00000001"));
  }

  #[test]
  fn test_step_rule90() {
    assert_eq!(step(pattern("10000001"), Rule::from(90u8)), pattern("11000011"));
  }

  #[test]
  fn test_step_rule30() {
    let rule = Rule::from(30u8);
    let row = step(Row::from(0x8000u32), rule);
    assert_eq!(row, Row::from(0x1c000u32));
    let row = step(row, rule);
    assert_eq!(row, Row::from(0x32000u32));
  }

  #[test]
  fn test_step_single_cell() {
    // a one-cell ring is its own left and right neighbor
    let alive = Row::alive(1).unwrap();
    let dead = Row::dead(1).unwrap();
    let only_111 = Rule::from(0b1000_0000u8);
    assert_eq!(step(alive, only_111), alive);
    assert_eq!(step(dead, only_111), dead);
    assert_eq!(step(dead, Rule::from(1u8)), alive);
  }

  #[test]
  fn test_configure() {
    let uni = Universe::configure(30, Some(Row::from(1u32))).unwrap();
    assert_eq!(uni.rule(), Rule::from(30u8));
    assert_eq!(uni.width(), 32);
    assert_eq!(uni.generation(), 0);
    assert_eq!(uni.current_row(), Row::from(1u32));
  }

  #[test]
  fn test_configure_rejects() {
    let row = Some(Row::from(1u32));
    match Universe::configure(256, row) {
      Err(Error::InvalidConfiguration(Invalid::RuleOutOfRange(256))) => {}
      other => panic!("unexpected {:?}", other),
    }
    match Universe::configure(-1, row) {
      Err(Error::InvalidConfiguration(Invalid::RuleOutOfRange(-1))) => {}
      other => panic!("unexpected {:?}", other),
    }
    match Universe::configure(30, None) {
      Err(Error::InvalidConfiguration(Invalid::MissingRow)) => {}
      other => panic!("unexpected {:?}", other),
    }
    match Universe::configure_width(8, 30, row) {
      Err(Error::InvalidConfiguration(Invalid::WidthMismatch {
        expected: 8,
        actual: 32,
      })) => {}
      other => panic!("unexpected {:?}", other),
    }
    assert!(Universe::configure_width(0, 30, row).is_err());
  }

  #[test]
  fn test_advance() {
    let mut uni = Universe::configure_width(8, 90, Some(pattern("00001000")))
      .unwrap();
    assert_eq!(uni.advance(), pattern("00010100"));
    assert_eq!(uni.advance(), pattern("00100010"));
    assert_eq!(uni.current_row(), pattern("00100010"));
    assert_eq!(uni.generation(), 2);
  }

  #[test]
  fn test_simulate() {
    let mut uni = Universe::new(Rule::from(90u8), pattern("00001000"));
    uni.simulate(3);
    assert_eq!(uni.current_row(), pattern("01010101"));
    assert_eq!(uni.generation(), 3);
    uni.simulate(0);
    assert_eq!(uni.generation(), 3);
    uni.simulate(1);
    assert!(uni.current_row().is_dead());
  }

  #[test]
  fn test_run_length() {
    let rows = run(Row::from(7u32), Rule::from(30u8), 31).collect::<Vec<_>>();
    assert_eq!(rows.len(), 32);
    assert_eq!(rows[0], Row::from(7u32));

    let rows = run(Row::from(7u32), Rule::from(30u8), 0).collect::<Vec<_>>();
    assert_eq!(rows, vec![Row::from(7u32)]);
  }

  #[test]
  fn test_run_is_exact_and_fused() {
    let mut gens = run(Row::from(5u32), Rule::from(110u8), 2);
    assert_eq!(gens.len(), 3);
    gens.next();
    assert_eq!(gens.len(), 2);
    gens.next();
    gens.next();
    assert_eq!(gens.len(), 0);
    assert_eq!(gens.next(), None);
    assert_eq!(gens.next(), None);
  }

  #[test]
  fn test_run_matches_advance() {
    let mut uni = Universe::new(Rule::from(110u8), Row::from(0x1234_5678u32));
    let rows = uni.generations(10).collect::<Vec<_>>();
    for row in &rows[1..] {
      assert_eq!(uni.advance(), *row);
    }
  }
}
