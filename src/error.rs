use thiserror::Error;

/// All kinds of errors in this crate.
#[derive(Error, Debug)]
pub enum Error {
  /// The rule, row or width cannot be used to build a universe.
  #[error("invalid configuration: {0}")]
  InvalidConfiguration(#[from] Invalid),

  /// An RLE pattern that cannot be decoded.
  #[error("malformed pattern at line {line}: {reason}")]
  MalformedPattern {
    line: usize,
    reason: String,
  },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("image error: {0}")]
  Image(#[from] image::ImageError),
}

/// Why a configuration was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Invalid {
  #[error("rule {0} is outside 0..=255")]
  RuleOutOfRange(i64),

  #[error("no initial row supplied")]
  MissingRow,

  #[error("row has width {actual}, universe has width {expected}")]
  WidthMismatch {
    expected: u32,
    actual: u32,
  },

  #[error("width {0} is outside 1..=64")]
  UnsupportedWidth(u32),

  #[error("{cells} does not fit in {width} cells")]
  RowOverflow {
    cells: u64,
    width: u32,
  },

  #[error("malformed rule {0:?}")]
  MalformedRule(String),

  #[error("malformed row {0:?}")]
  MalformedRow(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
  pub fn is_invalid_configuration(&self) -> bool {
    matches!(self, Error::InvalidConfiguration(_))
  }
}
