//! Selected-field state and the view updates that follow a change to it.

use std::time::Instant;

use kurbo::Point;
use tracing::debug;

use crate::{
  chart::{ChartRenderer, Frame, ViewState},
  config::{ChartConfig, FieldOption},
  dataset::Dataset,
  error::{ChartError, Result},
  scale::{LinearScale, ScaleFactory},
  transition::Transition,
};

pub struct ViewController {
  renderer:   ChartRenderer,
  dataset:    Dataset,
  selected:   usize,
  x_scale:    LinearScale,
  y_scale:    LinearScale,
  /// Resting x position of every record under `x_scale`.
  xs:         Vec<f64>,
  transition: Option<Transition>,
  hovered:    Option<usize>,
}

impl ViewController {
  pub fn new(config: ChartConfig, dataset: Dataset) -> Result<Self> {
    config.validate()?;
    let selected = config
      .x_fields
      .iter()
      .position(|f| f.field == config.default_x)
      .ok_or_else(|| ChartError::UnknownSelection(config.default_x.clone()))?;

    let plot = config.plot_area();
    let y_scale =
      ScaleFactory::make_scale(&dataset, &config.y_field.field, plot.y, config.y_padding)?;
    let x_scale =
      ScaleFactory::make_scale(&dataset, &config.default_x, plot.x, config.x_padding)?;
    let xs = positions(&dataset, &config.default_x, &x_scale);

    Ok(ViewController {
      renderer: ChartRenderer::new(config),
      dataset,
      selected,
      x_scale,
      y_scale,
      xs,
      transition: None,
      hovered: None,
    })
  }

  pub fn config(&self) -> &ChartConfig { self.renderer.config() }
  pub fn dataset(&self) -> &Dataset { &self.dataset }

  pub fn selected(&self) -> &FieldOption { &self.config().x_fields[self.selected] }

  /// Target x scale; during a transition the displayed axis lags behind it.
  pub fn x_scale(&self) -> &LinearScale { &self.x_scale }
  pub fn y_scale(&self) -> &LinearScale { &self.y_scale }

  pub fn hovered(&self) -> Option<usize> { self.hovered }

  pub fn is_animating(&self, now: Instant) -> bool {
    self.transition.as_ref().is_some_and(|t| !t.is_done(now))
  }

  /// Switches the x axis to `field`. Returns `false` without touching
  /// anything when `field` is already selected.
  pub fn select(&mut self, field: &str, now: Instant) -> Result<bool> {
    let index = self
      .config()
      .x_fields
      .iter()
      .position(|f| f.field == field)
      .ok_or_else(|| ChartError::UnknownSelection(field.to_string()))?;
    if index == self.selected {
      return Ok(false);
    }

    let config = self.config();
    let x_scale =
      ScaleFactory::make_scale(&self.dataset, field, config.plot_area().x, config.x_padding)?;
    let xs = positions(&self.dataset, field, &x_scale);

    let transition = Transition::new(
      now,
      config.transition_duration(),
      (self.displayed_axis(now), x_scale),
      self.displayed_x(now),
      xs.clone(),
    );

    debug!(
      from = %self.selected().field,
      to = field,
      min = x_scale.domain().min,
      max = x_scale.domain().max,
      "switching x axis"
    );
    self.selected = index;
    self.x_scale = x_scale;
    self.xs = xs;
    self.transition = Some(transition);
    Ok(true)
  }

  /// Handles a click at `point` in surface coordinates. Only clicks on an
  /// x-axis label do anything.
  pub fn click(&mut self, point: Point, now: Instant) -> Result<bool> {
    let hit = self
      .renderer
      .labels(self.selected)
      .into_iter()
      .find(|label| label.hitbox.contains(point))
      .map(|label| label.field);

    match hit {
      Some(field) => self.select(&field, now),
      None => Ok(false),
    }
  }

  /// Updates the hovered point for a pointer at `point`. Returns whether the
  /// tooltip changed.
  pub fn hover(&mut self, point: Point, now: Instant) -> bool {
    let radius = self.config().point.radius;
    let y_field = &self.config().y_field.field;
    let xs = self.displayed_x(now);

    // Later points are drawn on top, so they win.
    let hovered = self
      .dataset
      .records()
      .iter()
      .zip(&xs)
      .enumerate()
      .rev()
      .find(|(_, (record, x))| {
        record.get(y_field).is_some_and(|y| {
          Point::new(**x, self.y_scale.apply(y)).distance(point) <= radius
        })
      })
      .map(|(i, _)| i);

    let changed = hovered != self.hovered;
    self.hovered = hovered;
    changed
  }

  /// Pointer left the surface.
  pub fn leave(&mut self) -> bool { self.hovered.take().is_some() }

  pub fn frame(&self, now: Instant) -> Frame {
    let xs = self.displayed_x(now);
    self.renderer.layout(
      &self.dataset,
      ViewState {
        selected: self.selected,
        x_axis:   self.displayed_axis(now),
        y_scale:  &self.y_scale,
        xs:       &xs,
        hovered:  self.hovered,
      },
    )
  }

  fn displayed_axis(&self, now: Instant) -> LinearScale {
    match &self.transition {
      Some(t) if !t.is_done(now) => t.axis_at(now),
      _ => self.x_scale,
    }
  }

  fn displayed_x(&self, now: Instant) -> Vec<f64> {
    match &self.transition {
      Some(t) if !t.is_done(now) => t.x_at(now),
      _ => self.xs.clone(),
    }
  }
}

fn positions(dataset: &Dataset, field: &str, scale: &LinearScale) -> Vec<f64> {
  dataset.records().iter().map(|r| r.get(field).map_or(f64::NAN, |v| scale.apply(v))).collect()
}
