use std::time::{Duration, Instant};

use crate::scale::LinearScale;

/// Cubic ease-in-out over `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
  let t = t.clamp(0.0, 1.0);
  if t < 0.5 { 4.0 * t * t * t } else { 1.0 - (-2.0 * t + 2.0).powi(3) / 2.0 }
}

/// An x-axis change in flight: the axis scale and every point's x
/// coordinate move from their displayed values to their targets.
#[derive(Clone, Debug)]
pub struct Transition {
  start:     Instant,
  duration:  Duration,
  from_axis: LinearScale,
  to_axis:   LinearScale,
  from_x:    Vec<f64>,
  to_x:      Vec<f64>,
}

impl Transition {
  pub fn new(
    start: Instant,
    duration: Duration,
    (from_axis, to_axis): (LinearScale, LinearScale),
    from_x: Vec<f64>,
    to_x: Vec<f64>,
  ) -> Self {
    debug_assert_eq!(from_x.len(), to_x.len());
    Transition { start, duration, from_axis, to_axis, from_x, to_x }
  }

  /// Eased progress at `now`.
  pub fn progress(&self, now: Instant) -> f64 {
    if self.duration.is_zero() {
      return 1.0;
    }
    let elapsed = now.saturating_duration_since(self.start);
    ease_cubic_in_out(elapsed.as_secs_f64() / self.duration.as_secs_f64())
  }

  pub fn is_done(&self, now: Instant) -> bool {
    now.saturating_duration_since(self.start) >= self.duration
  }

  pub fn axis_at(&self, now: Instant) -> LinearScale {
    self.from_axis.lerp(&self.to_axis, self.progress(now))
  }

  pub fn x_at(&self, now: Instant) -> Vec<f64> {
    let t = self.progress(now);
    self.from_x.iter().zip(&self.to_x).map(|(a, b)| a + (b - a) * t).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Range;

  fn transition(start: Instant) -> Transition {
    let a = LinearScale::new(Range::new(0.0, 10.0), Range::new(0.0, 100.0));
    let b = LinearScale::new(Range::new(0.0, 20.0), Range::new(0.0, 100.0));
    Transition::new(start, Duration::from_secs(1), (a, b), vec![0.0, 40.0], vec![100.0, 20.0])
  }

  #[test]
  fn easing_endpoints() {
    assert_eq!(ease_cubic_in_out(0.0), 0.0);
    assert_eq!(ease_cubic_in_out(0.5), 0.5);
    assert_eq!(ease_cubic_in_out(1.0), 1.0);
    assert_eq!(ease_cubic_in_out(2.0), 1.0);
    assert!(ease_cubic_in_out(0.25) < 0.25);
  }

  #[test]
  fn interpolates_points_over_duration() {
    let start = Instant::now();
    let t = transition(start);

    assert_eq!(t.x_at(start), vec![0.0, 40.0]);
    assert_eq!(t.x_at(start + Duration::from_millis(500)), vec![50.0, 30.0]);
    assert_eq!(t.x_at(start + Duration::from_secs(3)), vec![100.0, 20.0]);
    assert!(!t.is_done(start + Duration::from_millis(999)));
    assert!(t.is_done(start + Duration::from_secs(1)));
  }

  #[test]
  fn axis_follows_progress() {
    let start = Instant::now();
    let t = transition(start);
    assert_eq!(t.axis_at(start + Duration::from_millis(500)).domain(), Range::new(0.0, 15.0));
  }

  #[test]
  fn zero_duration_jumps() {
    let start = Instant::now();
    let a = LinearScale::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0));
    let t = Transition::new(start, Duration::ZERO, (a, a), vec![1.0], vec![2.0]);
    assert_eq!(t.x_at(start), vec![2.0]);
  }
}
