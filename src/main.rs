use std::io::{self, Write};
use anyhow::Result;
use clap::Parser;
use ecell::config::Args;
use ecell::session::Session;

fn main() -> Result<()> {
  let args = Args::parse();
  env_logger::Builder::new()
    .filter_level(args.verbosity().log_level())
    .parse_default_env()
    .init();

  let settings = args.resolve()?;
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  Session::new(settings).run(&mut out)?;
  out.flush()?;

  Ok(())
}
