/// A pixel area. `y.min` is the bottom edge, so `y` runs against the
/// surface's downward axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub x: Range,
  pub y: Range,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
  pub min: f64,
  pub max: f64,
}

impl Bounds {
  pub const fn new(x: Range, y: Range) -> Self { Bounds { x, y } }
}

impl Default for Range {
  fn default() -> Self { Range::empty() }
}

impl Range {
  pub const fn empty() -> Self { Range { min: 0.0, max: 0.0 } }
  pub const fn new(min: f64, max: f64) -> Self { Range { min, max } }
  pub const fn size(&self) -> f64 { self.max - self.min }
  pub const fn mid(&self) -> f64 { (self.min + self.max) / 2.0 }

  pub const fn contains(&self, value: &f64) -> bool {
    (*value >= self.min && *value <= self.max) || (*value <= self.min && *value >= self.max)
  }

  pub fn is_finite(&self) -> bool { self.min.is_finite() && self.max.is_finite() }

  pub fn lerp(&self, other: Range, t: f64) -> Range {
    Range {
      min: self.min + (other.min - self.min) * t,
      max: self.max + (other.max - self.max) * t,
    }
  }

  /// Smallest range covering every value, or `None` for an empty iterator.
  pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<Range> {
    values.into_iter().fold(None, |acc, v| match acc {
      None => Some(Range::new(v, v)),
      Some(r) => Some(Range::new(r.min.min(v), r.max.max(v))),
    })
  }

  /// Ticks on 1, 2, 2.5 or 5 times a power of ten, covering the range.
  pub fn nice_ticks(&self, count: u32) -> TicksIter {
    let (lo, hi) = if self.min <= self.max { (self.min, self.max) } else { (self.max, self.min) };
    if !(hi - lo).is_normal() {
      return TicksIter::new(lo, lo, 1.0, 0, 0);
    }

    let step = (hi - lo) / f64::from(count.max(1));
    let k = step.log10().floor();
    let base = step / 10f64.powf(k);

    let nice_base = match base {
      b if b < 1.0 => 1.0,
      b if b < 2.0 => 2.0,
      b if b < 2.5 => 2.5,
      b if b < 5.0 => 5.0,
      _ => 10.0,
    };

    let step = nice_base * 10f64.powf(k);
    let lo = (lo / step).floor() * step;
    let hi = (hi / step).ceil() * step;

    let precision = (-k as i32 + 4).max(0) as usize;
    let decimals = match nice_base {
      2.5 => (-k as i32 + 1).max(0),
      10.0 => (-k as i32 - 1).max(0),
      _ => (-k as i32).max(0),
    };
    TicksIter::new(lo, hi, step, precision, decimals as usize)
  }
}

pub struct TicksIter {
  current:   f64,
  step:      f64,
  hi:        f64,
  precision: usize,
  decimals:  usize,
}

impl TicksIter {
  fn new(lo: f64, hi: f64, step: f64, precision: usize, decimals: usize) -> Self {
    TicksIter { current: lo, step, hi, precision, decimals }
  }

  /// Decimal places needed to print every tick distinctly.
  pub fn decimals(&self) -> usize { self.decimals }
}

impl Iterator for TicksIter {
  type Item = f64;
  fn next(&mut self) -> Option<Self::Item> {
    if self.current < self.hi + self.step * 0.5 {
      let p = 10f64.powi(self.precision as i32);
      let result = (self.current * p).round() / p;
      self.current += self.step;
      Some(result)
    } else {
      None
    }
  }
}
