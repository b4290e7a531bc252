use regex::Regex;
use crate::error::*;
use crate::row::*;
use crate::rule::Rule;

const MAX_ROWS: usize = 1 << 20;

/// A space-time diagram read from an RLE file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
  pub width: u32,
  pub rule: Option<Rule>,
  /// Generation 0 first. Rows missing from the body are dead.
  pub rows: Vec<Row>,
}

impl Pattern {
  pub fn first_row(&self) -> Row {
    self.rows[0]
  }
}

/// Read a space-time diagram from a RLE string.
///
/// RLE format: <https://www.conwaylife.com/wiki/Run_Length_Encoded>. Each
/// pattern row is one generation; the rule, if present, must be a Wolfram
/// rule such as `W30`.
pub fn read(src: impl AsRef<str>) -> Result<Pattern> {
  let header_re = Regex::new(
    r"^x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)\s*(?:,\s*rule\s*=\s*(\S+))?\s*$"
  ).map_err(|e| malformed(0, e.to_string()))?;

  let mut lines = src.as_ref().lines()
    .enumerate()
    .map(|(i, line)| (i + 1, line.trim()))
    .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

  let (line_no, header) = lines.next()
    .ok_or_else(|| malformed(0, "missing header line"))?;
  let caps = header_re.captures(header)
    .ok_or_else(|| malformed(line_no, "invalid header line"))?;
  let width = caps[1].parse::<u32>()
    .map_err(|_| malformed(line_no, "invalid width"))?;
  let height = caps[2].parse::<usize>()
    .map_err(|_| malformed(line_no, "invalid height"))?;
  check_width(width)?;
  if height == 0 || height > MAX_ROWS {
    return Err(malformed(line_no, format!("height {} is outside 1..={}", height, MAX_ROWS)));
  }
  let rule = match caps.get(3) {
    Some(m) => Some(m.as_str().parse::<Rule>()?),
    None => None,
  };

  let mut rows = vec![0u64; height];
  let mut x = 0u32;
  let mut y = 0usize;
  let mut num = None::<usize>;

  'body: for (line_no, line) in lines {
    for c in line.chars() {
      match c {
        '0'..='9' => {
          let digit = c as usize - '0' as usize;
          num = Some(num.unwrap_or(0).saturating_mul(10).saturating_add(digit));
        }
        'b' | 'o' => {
          let n = num.take().unwrap_or(1);
          let end = (x as usize).checked_add(n)
            .filter(|&end| end <= width as usize)
            .ok_or_else(|| malformed(line_no, "row is wider than the header"))?;
          let end = end as u32;
          if c == 'o' {
            if y >= height {
              return Err(malformed(line_no, "more rows than the header"));
            }
            for i in x..end {
              rows[y] |= 1 << (width - 1 - i);
            }
          }
          x = end;
        }
        '$' => {
          y = y.saturating_add(num.take().unwrap_or(1));
          x = 0;
        }
        '!' => break 'body,
        c if c.is_whitespace() => {}
        c => {
          return Err(malformed(line_no, format!("invalid character {:?}", c)));
        }
      }
    }
  }

  let rows = rows.into_iter()
    .map(|cells| Row::new(cells, width))
    .collect::<Result<Vec<_>>>()?;
  Ok(Pattern { width, rule, rows })
}

/// Write a space-time diagram to a RLE string.
///
/// RLE format: <https://www.conwaylife.com/wiki/Run_Length_Encoded>.
pub fn write(rows: &[Row], rule: Rule) -> String {
  let width = rows.first().map_or(0, Row::width);
  let mut output = format!("x = {}, y = {}, rule = {}\n",
    width, rows.len(), rule);

  let mut num_next_rows = 0;
  for row in rows {
    let mut runs = row.runs();
    if let Some(&(false, _)) = runs.last() {
      runs.pop();
    }

    if runs.is_empty() {
      num_next_rows += 1;
      continue;
    }

    if num_next_rows > 0 {
      RleUnit::NextRow.write(num_next_rows, &mut output);
    }

    for (alive, num) in runs {
      let unit = if alive { RleUnit::Alive } else { RleUnit::Dead };
      unit.write(num, &mut output);
    }

    num_next_rows = 1;
  }

  push_wrapped(&mut output, "!");
  output.push('\n');
  output
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RleUnit {
  Dead,
  Alive,
  NextRow,
}

impl RleUnit {
  fn write(&self, num: u32, s: &mut String) {
    let c = match self {
      Self::Dead => 'b',
      Self::Alive => 'o',
      Self::NextRow => '$',
    };

    let buf = if num == 1 {
      c.to_string()
    } else {
      format!("{}{}", num, c)
    };

    push_wrapped(s, &buf);
  }
}

/// Appends `buf`, starting a new line if the current one would pass 70
/// columns.
fn push_wrapped(s: &mut String, buf: &str) {
  let line_start = s.rfind('\n').map_or(0, |i| i + 1);
  if s.len() - line_start + buf.len() > 70 {
    s.push('\n');
  }
  s.push_str(buf);
}

fn malformed(line: usize, reason: impl Into<String>) -> Error {
  Error::MalformedPattern {
    line,
    reason: reason.into(),
  }
}
