//! Chart configuration, loadable from TOML. Every key has a default.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

use crate::{Bounds, Range, error::ConfigError, scale::Padding};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
  pub data:           PathBuf,
  pub width:          f64,
  pub height:         f64,
  pub margin:         Margin,
  pub point:          PointStyle,
  /// Milliseconds.
  pub transition:     u64,
  pub ticks:          u32,
  pub label_field:    String,
  pub x_fields:       Vec<FieldOption>,
  pub default_x:      String,
  pub x_padding:      Padding,
  pub y_field:        FieldOption,
  pub y_padding:      Padding,
  /// Tooltip anchor relative to the hovered point.
  pub tooltip_offset: (f64, f64),
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Margin {
  pub top:    f64,
  pub right:  f64,
  pub bottom: f64,
  pub left:   f64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PointStyle {
  pub radius:  f64,
  pub opacity: f32,
  pub color:   [u8; 3],
}

/// A numeric field that can drive an axis.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FieldOption {
  pub field:  String,
  /// Axis label text.
  pub label:  String,
  /// Shown before the value in tooltips.
  pub prefix: String,
}

impl FieldOption {
  pub fn new(field: &str, label: &str, prefix: &str) -> Self {
    FieldOption { field: field.to_string(), label: label.to_string(), prefix: prefix.to_string() }
  }
}

impl Default for ChartConfig {
  fn default() -> Self {
    ChartConfig {
      data:           PathBuf::from("data/data.csv"),
      width:          960.0,
      height:         500.0,
      margin:         Margin::default(),
      point:          PointStyle::default(),
      transition:     1000,
      ticks:          10,
      label_field:    "abbr".to_string(),
      x_fields:       vec![
        FieldOption::new("poverty", "% in Poverty", "% in Poverty:"),
        FieldOption::new("age", "Age", "Age:"),
      ],
      default_x:      "poverty".to_string(),
      x_padding:      Padding::new(0.5, 1.0),
      y_field:        FieldOption::new("healthcare", "% with Healthcare", "% with Healthcare:"),
      y_padding:      Padding::new(0.0, 1.0),
      tooltip_offset: (-60.0, 80.0),
    }
  }
}

impl Default for Margin {
  fn default() -> Self { Margin { top: 20.0, right: 40.0, bottom: 80.0, left: 100.0 } }
}

impl Default for PointStyle {
  fn default() -> Self { PointStyle { radius: 20.0, opacity: 0.5, color: [0, 128, 0] } }
}

impl ChartConfig {
  pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
    let config: ChartConfig = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    Self::from_toml(&source)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    let (width, height) = self.plot_size();
    if width <= 0.0 || height <= 0.0 {
      return Err(ConfigError::PlotArea { width, height });
    }
    if self.x_fields.is_empty() {
      return Err(ConfigError::NoFields);
    }
    if self.x_field(&self.default_x).is_none() {
      return Err(ConfigError::UnknownDefault(self.default_x.clone()));
    }
    Ok(())
  }

  pub fn plot_size(&self) -> (f64, f64) {
    (
      self.width - self.margin.left - self.margin.right,
      self.height - self.margin.top - self.margin.bottom,
    )
  }

  /// The plot area in surface pixels, bottom edge first on `y`.
  pub fn plot_area(&self) -> Bounds {
    Bounds::new(
      Range::new(self.margin.left, self.width - self.margin.right),
      Range::new(self.height - self.margin.bottom, self.margin.top),
    )
  }

  pub fn x_field(&self, field: &str) -> Option<&FieldOption> {
    self.x_fields.iter().find(|f| f.field == field)
  }

  /// Every field the loader must coerce to a number.
  pub fn numeric_fields(&self) -> Vec<&str> {
    let mut fields = self.x_fields.iter().map(|f| f.field.as_str()).collect::<Vec<_>>();
    if !fields.contains(&self.y_field.field.as_str()) {
      fields.push(&self.y_field.field);
    }
    fields
  }

  pub fn transition_duration(&self) -> Duration { Duration::from_millis(self.transition) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    let config = ChartConfig::default();
    config.validate().unwrap();
    assert_eq!(config.plot_size(), (820.0, 400.0));
    assert_eq!(config.numeric_fields(), vec!["poverty", "age", "healthcare"]);
  }

  #[test]
  fn partial_toml_keeps_defaults() {
    let config = ChartConfig::from_toml(
      r#"
      width = 1200.0
      default_x = "age"
      x_padding = { low = 0.9, high = 1.05 }

      [point]
      radius = 10.0
      "#,
    )
    .unwrap();

    assert_eq!(config.width, 1200.0);
    assert_eq!(config.height, 500.0);
    assert_eq!(config.default_x, "age");
    assert_eq!(config.x_padding, Padding::new(0.9, 1.05));
    assert_eq!(config.point.radius, 10.0);
    assert_eq!(config.point.opacity, 0.5);
  }

  #[test]
  fn partial_margin_keeps_other_defaults() {
    let config = ChartConfig::from_toml("[margin]\ntop = 30.0\n").unwrap();
    assert_eq!(config.margin.top, 30.0);
    assert_eq!(config.margin.right, 40.0);
    assert_eq!(config.margin.bottom, 80.0);
    assert_eq!(config.margin.left, 100.0);
    assert_eq!(config.plot_size(), (820.0, 390.0));
  }

  #[test]
  fn oversized_margins_are_rejected() {
    let err = ChartConfig::from_toml(
      "[margin]\ntop = 300.0\nbottom = 300.0\n",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::PlotArea { height, .. } if height == -100.0));
  }

  #[test]
  fn default_must_be_selectable() {
    let err = ChartConfig::from_toml("default_x = \"income\"").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownDefault(ref f) if f == "income"));
  }

  #[test]
  fn needs_at_least_one_field() {
    let err = ChartConfig::from_toml("x_fields = []").unwrap_err();
    assert!(matches!(err, ConfigError::NoFields));
  }
}
