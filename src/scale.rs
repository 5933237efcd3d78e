//! Linear scales from a dataset field onto a pixel range.

use serde::Deserialize;
use tracing::debug;

use crate::{Range, TicksIter, dataset::Dataset, error::DomainError};

/// Multipliers applied to a field's minimum and maximum to get the
/// scale's domain.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Padding {
  pub low:  f64,
  pub high: f64,
}

impl Padding {
  pub const NONE: Padding = Padding { low: 1.0, high: 1.0 };

  pub const fn new(low: f64, high: f64) -> Self { Padding { low, high } }

  pub fn apply(&self, extent: Range) -> Range {
    Range::new(extent.min * self.low, extent.max * self.high)
  }
}

/// Maps `domain` linearly onto `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
  domain: Range,
  range:  Range,
}

impl LinearScale {
  pub const fn new(domain: Range, range: Range) -> Self { LinearScale { domain, range } }

  pub fn domain(&self) -> Range { self.domain }
  pub fn range(&self) -> Range { self.range }

  /// A collapsed domain maps everything to the middle of the range.
  pub fn apply(&self, value: f64) -> f64 {
    let size = self.domain.size();
    if size == 0.0 {
      return self.range.mid();
    }
    self.range.min + (value - self.domain.min) / size * self.range.size()
  }

  pub fn ticks(&self, count: u32) -> TicksIter { self.domain.nice_ticks(count) }

  /// Interpolates both domain and range, `t` in `[0, 1]`.
  pub fn lerp(&self, other: &LinearScale, t: f64) -> LinearScale {
    LinearScale {
      domain: self.domain.lerp(other.domain, t),
      range:  self.range.lerp(other.range, t),
    }
  }
}

pub struct ScaleFactory;

impl ScaleFactory {
  pub fn make_scale(
    dataset: &Dataset,
    field: &str,
    pixel_range: Range,
    padding: Padding,
  ) -> Result<LinearScale, DomainError> {
    let domain = padding.apply(dataset.extent(field)?);
    if !domain.is_finite() {
      return Err(DomainError::NotFinite {
        field: field.to_string(),
        min:   domain.min,
        max:   domain.max,
      });
    }

    debug!(field, min = domain.min, max = domain.max, "built scale");
    Ok(LinearScale::new(domain, pixel_range))
  }
}

#[cfg(test)]
mod tests {
  use polars::df;

  use super::*;

  fn dataset() -> Dataset {
    let df = df! {
      "abbr" => &["A", "B", "C"],
      "poverty" => &[10.0, 50.0, 30.0],
    }
    .unwrap();
    Dataset::from_frame(&df, "abbr", &["poverty"]).unwrap()
  }

  #[test]
  fn padding_scales_the_extent() {
    let scale =
      ScaleFactory::make_scale(&dataset(), "poverty", Range::new(0.0, 100.0), Padding::new(0.5, 1.0))
        .unwrap();
    assert_eq!(scale.domain(), Range::new(5.0, 50.0));
    assert_eq!(scale.apply(5.0), 0.0);
    assert_eq!(scale.apply(50.0), 100.0);
  }

  #[test]
  fn scale_is_monotonic() {
    let scale =
      ScaleFactory::make_scale(&dataset(), "poverty", Range::new(100.0, 900.0), Padding::NONE)
        .unwrap();
    let mut last = f64::NEG_INFINITY;
    for i in 0..=100 {
      let y = scale.apply(f64::from(i));
      assert!(y >= last);
      last = y;
    }
  }

  #[test]
  fn inverted_range_flips_output() {
    let scale = LinearScale::new(Range::new(0.0, 10.0), Range::new(400.0, 0.0));
    assert_eq!(scale.apply(0.0), 400.0);
    assert_eq!(scale.apply(10.0), 0.0);
    assert_eq!(scale.apply(5.0), 200.0);
  }

  #[test]
  fn collapsed_domain_maps_to_midpoint() {
    let df = df! { "abbr" => &["A"], "poverty" => &[12.0] }.unwrap();
    let dataset = Dataset::from_frame(&df, "abbr", &["poverty"]).unwrap();
    let scale =
      ScaleFactory::make_scale(&dataset, "poverty", Range::new(0.0, 800.0), Padding::NONE).unwrap();
    assert_eq!(scale.apply(12.0), 400.0);
    assert_eq!(scale.apply(-3.0), 400.0);
  }

  #[test]
  fn empty_dataset_has_no_domain() {
    let df = df! {
      "abbr" => Vec::<String>::new(),
      "poverty" => Vec::<f64>::new(),
    }
    .unwrap();
    let dataset = Dataset::from_frame(&df, "abbr", &["poverty"]).unwrap();
    let err = ScaleFactory::make_scale(&dataset, "poverty", Range::new(0.0, 1.0), Padding::NONE)
      .unwrap_err();
    assert_eq!(err, DomainError::Empty("poverty".to_string()));
  }

  #[test]
  fn unknown_field_is_rejected() {
    let err = ScaleFactory::make_scale(&dataset(), "age", Range::new(0.0, 1.0), Padding::NONE)
      .unwrap_err();
    assert_eq!(err, DomainError::UnknownField("age".to_string()));
  }

  #[test]
  fn lerp_halfway() {
    let a = LinearScale::new(Range::new(0.0, 10.0), Range::new(0.0, 100.0));
    let b = LinearScale::new(Range::new(10.0, 30.0), Range::new(0.0, 100.0));
    assert_eq!(a.lerp(&b, 0.5).domain(), Range::new(5.0, 20.0));
    assert_eq!(a.lerp(&b, 1.0), b);
  }
}
