use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use scatterswitch::{Chart, ChartConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scatterswitch")]
#[command(about = "Interactive scatter plot of a CSV dataset", long_about = None)]
struct Args {
  /// TOML chart configuration
  #[arg(long)]
  config: Option<PathBuf>,

  /// CSV dataset, overrides the configured path
  #[arg(long)]
  data: Option<PathBuf>,

  /// Render the chart to this image instead of opening a window
  #[arg(long)]
  save: Option<PathBuf>,

  /// Pixels per chart unit when saving
  #[arg(long, default_value_t = 2.0)]
  scale: f64,

  /// Log filter, e.g. `info` or `scatterswitch=debug`
  #[arg(long, default_value = "info")]
  log: String,
}

fn main() -> Result<()> {
  let args = Args::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)))
    .init();

  let mut config = match &args.config {
    Some(path) => ChartConfig::load(path)?,
    None => ChartConfig::default(),
  };
  if let Some(data) = args.data {
    config.data = data;
  }

  let mut chart = Chart::load(config);
  match &args.save {
    Some(path) => chart.save(path, args.scale)?,
    None => chart.show()?,
  }

  Ok(())
}
