use std::hash::BuildHasherDefault;
use indexmap::IndexSet;
use log::info;
use rustc_hash::FxHasher;
use crate::row::Row;
use crate::rule::Rule;
use crate::universe::step;

/// Where a run starts repeating itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orbit {
  /// Generation of the first row on the cycle.
  pub transient: usize,
  /// Number of generations after which the cycle repeats.
  pub period: usize,
}

impl Orbit {
  /// Finds the first repeated row in `rows`, generation 0 first.
  ///
  /// Returns `None` when every row is distinct, i.e. the run was too short to
  /// close its cycle. Every distinct row is kept; use [`CycleSearch`] for
  /// runs of unbounded length.
  pub fn detect(rows: impl IntoIterator<Item = Row>) -> Option<Self> {
    let mut seen: IndexSet<Row, BuildHasherDefault<FxHasher>> =
      IndexSet::default();
    for row in rows {
      let (index, new) = seen.insert_full(row);
      if !new {
        let orbit = Orbit {
          transient: index,
          period: seen.len() - index,
        };
        info!("cycle of period {} entered at generation {}",
          orbit.period, orbit.transient);
        return Some(orbit);
      }
    }
    None
  }

  pub fn is_fixed_point(&self) -> bool {
    self.period == 1
  }
}

/// Online cycle search over the generations of one run, in constant memory.
///
/// Brent's algorithm: the tortoise jumps to the latest row whenever the
/// distance to it reaches a power of two, and the period is found once a row
/// equals the tortoise. The cycle is reported at most about twice as many
/// generations after it closes as [`Orbit::detect`] would report it.
#[derive(Debug, Clone)]
pub struct CycleSearch {
  rule: Rule,
  start: Option<Row>,
  tortoise: Row,
  power: usize,
  lam: usize,
  orbit: Option<Orbit>,
}

impl CycleSearch {
  pub fn new(rule: Rule) -> Self {
    Self {
      rule,
      start: None,
      tortoise: Row::from(0u32),
      power: 1,
      lam: 0,
      orbit: None,
    }
  }

  /// Feeds the next generation, generation 0 first.
  pub fn push(&mut self, row: Row) -> Option<Orbit> {
    if self.orbit.is_some() {
      return self.orbit;
    }
    let start = match self.start {
      Some(start) => start,
      None => {
        self.start = Some(row);
        self.tortoise = row;
        return None;
      }
    };

    self.lam += 1;
    if row == self.tortoise {
      let orbit = Orbit {
        transient: transient(start, self.rule, self.lam),
        period: self.lam,
      };
      info!("cycle of period {} entered at generation {}",
        orbit.period, orbit.transient);
      self.orbit = Some(orbit);
    } else if self.lam == self.power {
      self.tortoise = row;
      self.power = self.power.saturating_mul(2);
      self.lam = 0;
    }
    self.orbit
  }

  pub fn orbit(&self) -> Option<Orbit> {
    self.orbit
  }
}

/// First generation that recurs `period` generations later.
fn transient(start: Row, rule: Rule, period: usize) -> usize {
  let mut tortoise = start;
  let mut hare = (0..period).fold(start, |row, _| step(row, rule));
  let mut mu = 0;
  while tortoise != hare {
    tortoise = step(tortoise, rule);
    hare = step(hare, rule);
    mu += 1;
  }
  mu
}
