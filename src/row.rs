use std::fmt::{self, Display};
use itertools::Itertools;
use rand::Rng;
use regex::Regex;
use crate::error::*;

/// Width of the reference engine.
pub const DEFAULT_WIDTH: u32 = 32;

/// Widest row that fits in the bitfield.
pub const MAX_WIDTH: u32 = 64;

/// A ring of `width` binary cells. Bit `i` of the bitfield holds cell `i`;
/// bits at or above `width` are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Row {
  cells: u64,
  width: u32,
}

impl Row {
  pub fn new(cells: u64, width: u32) -> Result<Self> {
    check_width(width)?;
    if cells & !mask(width) != 0 {
      return Err(Invalid::RowOverflow { cells, width }.into());
    }
    Ok(Self { cells, width })
  }

  pub fn dead(width: u32) -> Result<Self> {
    Self::new(0, width)
  }

  pub fn alive(width: u32) -> Result<Self> {
    check_width(width)?;
    Ok(Self { cells: mask(width), width })
  }

  pub fn random<R: Rng>(rng: &mut R, width: u32) -> Result<Self> {
    check_width(width)?;
    Ok(Self { cells: rng.gen::<u64>() & mask(width), width })
  }

  /// Reads a row of the given width from decimal, `0x` hex or `0b` binary.
  pub fn parse(src: &str, width: u32) -> Result<Self> {
    let re = Regex::new(r"(?i)^\s*(?:0x([0-9a-f_]+)|0b([01_]+)|(\d+))\s*$")
      .map_err(|_| Invalid::MalformedRow(src.to_owned()))?;
    let caps = re.captures(src)
      .ok_or_else(|| Invalid::MalformedRow(src.to_owned()))?;
    let (digits, radix) = if let Some(m) = caps.get(1) {
      (m.as_str(), 16)
    } else if let Some(m) = caps.get(2) {
      (m.as_str(), 2)
    } else {
      (&caps[3], 10)
    };
    let digits = digits.replace('_', "");
    let cells = u64::from_str_radix(&digits, radix)
      .map_err(|_| Invalid::MalformedRow(src.to_owned()))?;
    Self::new(cells, width)
  }

  /// Builds a row from a bit pattern such as `"10000001"`; the first
  /// character is the most significant cell and the width is its length.
  pub fn from_pattern(pattern: &str) -> Result<Self> {
    let width = pattern.len() as u32;
    check_width(width)?;
    let mut cells = 0;
    for c in pattern.chars() {
      cells = cells << 1 | match c {
        '0' => 0,
        '1' => 1,
        _ => return Err(Invalid::MalformedRow(pattern.to_owned()).into()),
      };
    }
    Ok(Self { cells, width })
  }

  /// Assembles a row from a bitfield already confined to `width` cells.
  pub(crate) fn from_raw(cells: u64, width: u32) -> Self {
    debug_assert!(width >= 1 && width <= MAX_WIDTH);
    debug_assert_eq!(cells & !mask(width), 0);
    Self { cells, width }
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn cells(&self) -> u64 {
    self.cells
  }

  /// State (0 or 1) of cell `i`.
  #[inline]
  pub fn get(&self, i: u32) -> u8 {
    debug_assert!(i < self.width);
    (self.cells >> i & 1) as u8
  }

  pub fn population(&self) -> u32 {
    self.cells.count_ones()
  }

  pub fn is_dead(&self) -> bool {
    self.cells == 0
  }

  /// Cells from the most significant to the least significant.
  pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
    (0..self.width).rev().map(move |i| self.get(i) == 1)
  }

  /// Maximal runs of equal cells, most significant first.
  pub(crate) fn runs(&self) -> Vec<(bool, u32)> {
    let groups = self.iter().group_by(|&alive| alive);
    let runs = groups.into_iter()
      .map(|(alive, run)| (alive, run.count() as u32))
      .collect_vec();
    runs
  }
}

impl From<u32> for Row {
  fn from(cells: u32) -> Self {
    Self { cells: cells as u64, width: DEFAULT_WIDTH }
  }
}

impl Display for Row {
  /// The bit pattern, most significant cell first.
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for alive in self.iter() {
      write!(f, "{}", if alive { '1' } else { '0' })?;
    }
    Ok(())
  }
}

pub(crate) fn check_width(width: u32) -> Result<()> {
  if width == 0 || width > MAX_WIDTH {
    Err(Invalid::UnsupportedWidth(width).into())
  } else {
    Ok(())
  }
}

fn mask(width: u32) -> u64 {
  if width >= 64 {
    !0
  } else {
    (1 << width) - 1
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;

  #[test]
  fn test_new_rejects_overflow() {
    assert!(Row::new(0xff, 8).is_ok());
    match Row::new(0x100, 8) {
      Err(Error::InvalidConfiguration(Invalid::RowOverflow { cells: 0x100, width: 8 })) => {}
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn test_width_bounds() {
    assert!(Row::dead(0).is_err());
    assert!(Row::dead(65).is_err());
    assert_eq!(Row::alive(64).unwrap().cells(), !0);
    assert_eq!(Row::alive(1).unwrap().cells(), 1);
  }

  #[test]
  fn test_from_u32() {
    let row = Row::from(0x8000_0001u32);
    assert_eq!(row.width(), 32);
    assert_eq!(row.get(31), 1);
    assert_eq!(row.get(0), 1);
    assert_eq!(row.get(1), 0);
    assert_eq!(row.population(), 2);
  }

  #[test]
  fn test_pattern() {
    let row = Row::from_pattern("10000001").unwrap();
    assert_eq!(row.width(), 8);
    assert_eq!(row.cells(), 0b1000_0001);
    assert_eq!(row.to_string(), "10000001");
    assert!(Row::from_pattern("10x").is_err());
    assert!(Row::from_pattern("").is_err());
  }

  #[test]
  fn test_parse() {
    assert_eq!(Row::parse("12", 32).unwrap(), Row::from(12u32));
    assert_eq!(Row::parse("0x8000", 32).unwrap(), Row::from(0x8000u32));
    assert_eq!(Row::parse("0b1000_0001", 8).unwrap().cells(), 0x81);
    assert_eq!(Row::parse("4294967295", 32).unwrap(), Row::from(!0u32));
    assert!(Row::parse("4294967296", 32).is_err());
    assert!(Row::parse("-3", 32).is_err());
    assert!(Row::parse("twelve", 32).is_err());
  }

  #[test]
  fn test_random_stays_in_width() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    for _ in 0..100 {
      let row = Row::random(&mut rng, 5).unwrap();
      assert!(row.cells() < 32);
    }
  }

  #[test]
  fn test_runs() {
    let row = Row::from_pattern("11000101").unwrap();
    assert_eq!(row.runs(), vec![
      (true, 2), (false, 3), (true, 1), (false, 1), (true, 1),
    ]);
  }
}
