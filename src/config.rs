use std::fs;
use std::path::PathBuf;
use clap::Parser;
use log::{debug, LevelFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::error::*;
use crate::rle;
use crate::row::*;
use crate::rule::Rule;

/// Default number of generations: with 32 cells this draws a square.
pub const DEFAULT_GENERATIONS: usize = 31;

/// Produces elementary cellular automata.
///
/// Any rule or initial population that is not given is chosen at random.
#[derive(Parser, Debug, Clone)]
#[command(name = "ecell", version)]
pub struct Args {
  /// Rule to apply, 0 to 255 (`30`, `W30` or `rule 30`)
  #[arg(short, long, value_parser = parse_rule)]
  pub rule: Option<Rule>,

  /// Initial population as decimal, `0x` hex or `0b` binary
  #[arg(short, long, conflicts_with = "pattern")]
  pub population: Option<String>,

  /// Number of generations to advance
  #[arg(short = 'n', long, default_value_t = DEFAULT_GENERATIONS)]
  pub generations: usize,

  /// Number of cells in the row [default: 32]
  #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=64))]
  pub width: Option<u32>,

  /// No terminal output
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Print the rule table, the settings and the cycle reached
  #[arg(short, long)]
  pub verbose: bool,

  /// Write each generation's population to FILE, one number per line
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Write the space-time diagram to FILE as an RLE pattern
  #[arg(long, value_name = "FILE")]
  pub rle: Option<PathBuf>,

  /// Write the space-time diagram to FILE as an image
  #[arg(long, value_name = "FILE")]
  pub image: Option<PathBuf>,

  /// Read the initial population (and the rule, if not given) from an RLE
  /// pattern
  #[arg(long, value_name = "FILE")]
  pub pattern: Option<PathBuf>,

  /// Seed for the random rule and population
  #[arg(long)]
  pub seed: Option<u64>,
}

fn parse_rule(s: &str) -> std::result::Result<Rule, String> {
  s.parse::<Rule>().map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
  Quiet,
  Normal,
  Verbose,
}

impl Verbosity {
  pub fn log_level(self) -> LevelFilter {
    match self {
      Verbosity::Quiet => LevelFilter::Error,
      Verbosity::Normal => LevelFilter::Warn,
      Verbosity::Verbose => LevelFilter::Debug,
    }
  }
}

/// A fully determined run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  pub rule: Rule,
  pub population: Row,
  pub generations: usize,
  pub verbosity: Verbosity,
  pub output: Option<PathBuf>,
  pub rle: Option<PathBuf>,
  pub image: Option<PathBuf>,
}

impl Args {
  pub fn verbosity(&self) -> Verbosity {
    if self.quiet {
      Verbosity::Quiet
    } else if self.verbose {
      Verbosity::Verbose
    } else {
      Verbosity::Normal
    }
  }

  /// Fills in whatever was not given, drawing from `--seed` if present.
  pub fn resolve(self) -> Result<Settings> {
    let mut rng = match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    self.resolve_with(&mut rng)
  }

  pub fn resolve_with<R: Rng>(self, rng: &mut R) -> Result<Settings> {
    let verbosity = self.verbosity();

    let pattern = match &self.pattern {
      Some(path) => {
        debug!("reading initial population from {}", path.display());
        Some(rle::read(fs::read_to_string(path)?)?)
      }
      None => None,
    };

    let width = match (&pattern, self.width) {
      (Some(pattern), Some(width)) if pattern.width != width => {
        return Err(Invalid::WidthMismatch {
          expected: width,
          actual: pattern.width,
        }.into());
      }
      (Some(pattern), _) => pattern.width,
      (None, width) => width.unwrap_or(DEFAULT_WIDTH),
    };
    check_width(width)?;

    let rule = match (self.rule, pattern.as_ref().and_then(|p| p.rule)) {
      (Some(rule), _) | (None, Some(rule)) => rule,
      (None, None) => {
        let rule = Rule::from(rng.gen::<u8>());
        debug!("chose random rule {}", rule);
        rule
      }
    };

    let population = match (&self.population, &pattern) {
      (Some(src), _) => Row::parse(src, width)?,
      (None, Some(pattern)) => pattern.first_row(),
      (None, None) => {
        let row = Row::random(rng, width)?;
        debug!("chose random population {}", row.cells());
        row
      }
    };

    Ok(Settings {
      rule,
      population,
      generations: self.generations,
      verbosity,
      output: self.output,
      rle: self.rle,
      image: self.image,
    })
  }
}
