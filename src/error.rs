//! Error types for the chart pipeline.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

/// Failure to fetch or parse the dataset.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to open dataset {path}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed dataset: {0}")]
  Parse(#[from] polars::error::PolarsError),

  #[error("dataset has no column `{0}`")]
  MissingField(String),

  #[error("column `{field}` is not numeric (row {row})")]
  NotNumeric { field: String, row: usize },
}

/// A field cannot produce a usable scale domain.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
  #[error("dataset is empty, `{0}` has no extent")]
  Empty(String),

  #[error("`{0}` is not a numeric field of the dataset")]
  UnknownField(String),

  #[error("domain of `{field}` is not finite: [{min}, {max}]")]
  NotFinite { field: String, min: f64, max: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("margins leave no plot area ({width}x{height})")]
  PlotArea { width: f64, height: f64 },

  #[error("no selectable x fields configured")]
  NoFields,

  #[error("default field `{0}` is not one of the selectable fields")]
  UnknownDefault(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
  #[error("no suitable GPU adapter: {0}")]
  Adapter(String),

  #[error("failed to create GPU device: {0}")]
  Device(String),

  #[error("failed to create surface: {0}")]
  Surface(String),

  #[error("vello: {0}")]
  Vello(String),

  #[error("failed to read back render target: {0}")]
  Readback(String),

  #[error("failed to write image: {0}")]
  Image(#[from] image::ImageError),

  #[error("event loop: {0}")]
  EventLoop(String),
}

#[derive(Debug, Error)]
pub enum ChartError {
  #[error(transparent)]
  Load(#[from] LoadError),

  #[error(transparent)]
  Domain(#[from] DomainError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Render(#[from] RenderError),

  #[error("`{0}` is not a selectable field")]
  UnknownSelection(String),
}
