use std::fs;
use std::io::Write;
use itertools::Itertools;
use log::debug;
use crate::config::*;
use crate::error::*;
use crate::export::{self, GenerationLog};
use crate::orbit::{CycleSearch, Orbit};
use crate::rle;
use crate::row::Row;
use crate::universe::Universe;

/// What a finished run looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
  pub last_row: Row,
  pub generations: usize,
  /// Only searched in verbose mode, online as the run goes.
  pub orbit: Option<Orbit>,
}

/// Drives one run from its settings to every requested output.
pub struct Session {
  settings: Settings,
}

impl Session {
  pub fn new(settings: Settings) -> Self {
    Self { settings }
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  /// Runs the automaton, rendering to `out` unless quiet.
  pub fn run<W: Write>(&self, out: &mut W) -> Result<Summary> {
    let s = &self.settings;
    let verbose = s.verbosity == Verbosity::Verbose;
    let mut universe = Universe::new(s.rule, s.population);

    let mut log = match &s.output {
      Some(path) => Some(GenerationLog::create(path)?),
      None => None,
    };
    let keep_rows = s.rle.is_some() || s.image.is_some();
    let mut rows = Vec::new();
    let mut search = if verbose { Some(CycleSearch::new(s.rule)) } else { None };

    if verbose {
      self.write_header(out)?;
    }

    let mut emit = |row: Row| -> Result<()> {
      if s.verbosity != Verbosity::Quiet {
        writeln!(out, "{}", export::render(&row))?;
      }
      if let Some(log) = log.as_mut() {
        log.record(&row)?;
      }
      if keep_rows {
        rows.push(row);
      }
      if let Some(search) = search.as_mut() {
        search.push(row);
      }
      Ok(())
    };

    emit(universe.current_row())?;
    for _ in 0..s.generations {
      let row = universe.advance();
      emit(row)?;
    }

    if let Some(log) = log {
      log.finish()?;
    }
    if let Some(path) = &s.rle {
      fs::write(path, rle::write(&rows, s.rule))?;
      debug!("saved RLE pattern to {}", path.display());
    }
    if let Some(path) = &s.image {
      export::save_image(&rows, path)?;
    }

    let orbit = if let Some(search) = search {
      let orbit = search.orbit();
      match orbit {
        Some(Orbit { transient, period }) => writeln!(out,
          "cycle: period {} from generation {}", period, transient)?,
        None => writeln!(out,
          "cycle: none within {} generations", s.generations)?,
      }
      writeln!(out, "final population: {}", universe.current_row().cells())?;
      orbit
    } else {
      None
    };

    Ok(Summary {
      last_row: universe.current_row(),
      generations: universe.generation(),
      orbit,
    })
  }

  fn write_header<W: Write>(&self, out: &mut W) -> Result<()> {
    let s = &self.settings;
    let table = s.rule.table();
    writeln!(out, "rule: {}", s.rule)?;
    writeln!(out, "  {}", table.iter()
      .map(|&(v, _)| format!("{:03b}", v))
      .join(" "))?;
    writeln!(out, "  {}", table.iter()
      .map(|&(_, next)| format!("{:^3}", next))
      .join(" "))?;
    writeln!(out, "width: {}", s.population.width())?;
    writeln!(out, "population: {}", s.population.cells())?;
    writeln!(out, "generations: {}", s.generations)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rule::Rule;

  fn settings(verbosity: Verbosity) -> Settings {
    Settings {
      rule: Rule::from(90u8),
      population: Row::from_pattern("00001000").unwrap(),
      generations: 4,
      verbosity,
      output: None,
      rle: None,
      image: None,
    }
  }

  #[test]
  fn test_quiet_prints_nothing() {
    let mut out = Vec::new();
    let summary = Session::new(settings(Verbosity::Quiet)).run(&mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(summary.generations, 4);
    assert!(summary.last_row.is_dead());
    assert_eq!(summary.orbit, None);
  }

  #[test]
  fn test_normal_prints_every_generation() {
    let mut out = Vec::new();
    Session::new(settings(Verbosity::Normal)).run(&mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.lines().count(), 5);
    assert_eq!(out.lines().next(), Some("________[]______"));
  }

  #[test]
  fn test_verbose_reports_cycle() {
    let mut out = Vec::new();
    let mut s = settings(Verbosity::Verbose);
    s.generations = 8;
    let summary = Session::new(s).run(&mut out).unwrap();
    assert_eq!(summary.orbit, Some(Orbit { transient: 4, period: 1 }));
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("rule: W90\n  111 110 101 100 011 010 001 000\n"));
    assert!(out.contains("   0   1   0   1   1   0   1   0 \n"));
    assert!(out.contains("cycle: period 1 from generation 4\n"));
    assert!(out.ends_with("final population: 0\n"));
  }

  #[test]
  fn test_verbose_long_run_finds_cycle() {
    let mut s = settings(Verbosity::Verbose);
    s.rule = Rule::from(30u8);
    s.population = Row::from_pattern("0000000000001000").unwrap();
    s.generations = 300_000;
    let summary = Session::new(s.clone()).run(&mut std::io::sink()).unwrap();
    assert_eq!(summary.generations, 300_000);

    let rows = crate::universe::run(s.population, s.rule, 1 << 16);
    assert_eq!(summary.orbit, Orbit::detect(rows));
    assert!(summary.orbit.is_some());
  }
}
