use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use image::{ImageBuffer, Luma};
use itertools::Itertools;
use log::debug;
use crate::error::*;
use crate::row::Row;

const ALIVE: &str = "[]";
const DEAD: &str = "__";

/// Renders a row as `[]` (alive) and `__` (dead), most significant cell first.
pub fn render(row: &Row) -> String {
  row.iter()
    .map(|alive| if alive { ALIVE } else { DEAD })
    .join("")
}

/// Records one generation per line as the decimal value of its bitfield.
pub struct GenerationLog<W: Write> {
  out: W,
  lines: usize,
}

impl GenerationLog<BufWriter<File>> {
  pub fn create(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let f = OpenOptions::new()
      .write(true)
      .create(true)
      .truncate(true)
      .open(path)?;
    debug!("logging generations to {}", path.display());
    Ok(Self::new(BufWriter::new(f)))
  }
}

impl<W: Write> GenerationLog<W> {
  pub fn new(out: W) -> Self {
    Self { out, lines: 0 }
  }

  pub fn record(&mut self, row: &Row) -> Result<()> {
    writeln!(self.out, "{}", row.cells())?;
    self.lines += 1;
    Ok(())
  }

  /// Number of generations recorded so far.
  pub fn len(&self) -> usize {
    self.lines
  }

  pub fn is_empty(&self) -> bool {
    self.lines == 0
  }

  /// Flushes and returns the underlying writer.
  pub fn finish(mut self) -> Result<W> {
    self.out.flush()?;
    Ok(self.out)
  }
}

/// Space-time diagram: one pixel per cell, one pixel row per generation,
/// alive cells white.
pub fn diagram(rows: &[Row]) -> ImageBuffer<Luma<u8>, Vec<u8>> {
  let width = rows.first().map_or(0, Row::width);
  let mut buffer = ImageBuffer::new(width, rows.len() as u32);
  for (y, row) in rows.iter().enumerate() {
    for (x, alive) in row.iter().enumerate() {
      if alive {
        buffer.put_pixel(x as u32, y as u32, Luma([255u8]));
      }
    }
  }
  buffer
}

/// Saves the space-time diagram of `rows`; the format follows the extension
/// of `path`.
pub fn save_image(rows: &[Row], path: impl AsRef<Path>) -> Result<()> {
  let path = path.as_ref();
  diagram(rows).save(path)?;
  debug!("saved {} generations to {}", rows.len(), path.display());
  Ok(())
}
