//! Layout of a chart frame: where every point, tick, label and the tooltip
//! go on the surface. Drawing happens in `render`.

use kurbo::{Line, Point, Rect, Size, Vec2};
use peniko::Color;

use crate::{
  Bounds,
  config::{ChartConfig, FieldOption},
  dataset::{Dataset, Record},
  scale::LinearScale,
};

pub const TICK_SIZE: f64 = 6.0;
pub const TICK_FONT_SIZE: f32 = 12.0;
pub const LABEL_FONT_SIZE: f32 = 16.0;
const LABEL_SPACING: f64 = 20.0;

/// Everything needed to draw one frame.
#[derive(Clone, Debug)]
pub struct Frame {
  pub size:    Size,
  pub plot:    Bounds,
  pub points:  Vec<PointMark>,
  pub x_axis:  Option<Axis>,
  pub y_axis:  Option<Axis>,
  pub labels:  Vec<AxisLabel>,
  pub y_title: Option<AxisLabel>,
  pub tooltip: Option<Tooltip>,
}

#[derive(Clone, Debug)]
pub struct PointMark {
  pub record:  usize,
  pub center:  Point,
  pub radius:  f64,
  pub color:   Color,
  pub hovered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
  Bottom,
  Left,
}

#[derive(Clone, Debug)]
pub struct Axis {
  pub orientation: Orientation,
  pub line:        Line,
  pub ticks:       Vec<Tick>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
  pub value:    f64,
  /// Where the tick meets the axis line.
  pub position: Point,
  pub text:     String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisLabel {
  pub field:    String,
  pub text:     String,
  pub position: Point,
  pub active:   bool,
  pub hitbox:   Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
  pub record: usize,
  pub anchor: Point,
  pub title:  String,
  pub body:   String,
}

/// What the controller currently shows.
pub struct ViewState<'a> {
  pub selected: usize,
  pub x_axis:   LinearScale,
  pub y_scale:  &'a LinearScale,
  pub xs:       &'a [f64],
  pub hovered:  Option<usize>,
}

impl Frame {
  /// A blank surface, drawn when there's nothing to plot.
  pub fn empty(config: &ChartConfig) -> Self {
    Frame {
      size:    Size::new(config.width, config.height),
      plot:    config.plot_area(),
      points:  vec![],
      x_axis:  None,
      y_axis:  None,
      labels:  vec![],
      y_title: None,
      tooltip: None,
    }
  }

  pub fn point(&self, record: usize) -> Option<&PointMark> {
    self.points.iter().find(|p| p.record == record)
  }

  pub fn active_label(&self) -> Option<&AxisLabel> { self.labels.iter().find(|l| l.active) }
}

pub struct ChartRenderer {
  config: ChartConfig,
}

impl ChartRenderer {
  pub fn new(config: ChartConfig) -> Self { ChartRenderer { config } }

  pub fn config(&self) -> &ChartConfig { &self.config }

  pub fn layout(&self, dataset: &Dataset, view: ViewState) -> Frame {
    let field = &self.config.x_fields[view.selected];
    let tooltip = view
      .hovered
      .and_then(|i| Some((i, dataset.get(i)?, *view.xs.get(i)?)))
      .and_then(|(i, record, x)| {
        let y = view.y_scale.apply(record.get(&self.config.y_field.field)?);
        self.tooltip(i, record, field, Point::new(x, y))
      });

    Frame {
      points: self.points(dataset, view.xs, view.y_scale, view.hovered),
      x_axis: Some(self.axis(&view.x_axis, Orientation::Bottom)),
      y_axis: Some(self.axis(view.y_scale, Orientation::Left)),
      labels: self.labels(view.selected),
      y_title: Some(self.y_title()),
      tooltip,
      ..Frame::empty(&self.config)
    }
  }

  /// One point per record, at the given x and the y field's scaled value.
  pub fn points(
    &self,
    dataset: &Dataset,
    xs: &[f64],
    y_scale: &LinearScale,
    hovered: Option<usize>,
  ) -> Vec<PointMark> {
    let [r, g, b] = self.config.point.color;
    let color = Color::from_rgb8(r, g, b).with_alpha(self.config.point.opacity);

    dataset
      .records()
      .iter()
      .zip(xs)
      .enumerate()
      .filter_map(|(i, (record, &x))| {
        let y = record.get(&self.config.y_field.field)?;
        Some(PointMark {
          record: i,
          center: Point::new(x, y_scale.apply(y)),
          radius: self.config.point.radius,
          color,
          hovered: hovered == Some(i),
        })
      })
      .collect()
  }

  pub fn axis(&self, scale: &LinearScale, orientation: Orientation) -> Axis {
    let plot = self.config.plot_area();
    let ticks = scale.ticks(self.config.ticks);
    let decimals = ticks.decimals();

    let (line, ticks) = match orientation {
      Orientation::Bottom => (
        Line::new((plot.x.min, plot.y.min), (plot.x.max, plot.y.min)),
        ticks
          .filter(|v| scale.domain().contains(v))
          .map(|v| (v, Point::new(scale.apply(v), plot.y.min)))
          .filter(|(_, p)| plot.x.contains(&p.x))
          .collect::<Vec<_>>(),
      ),
      Orientation::Left => (
        Line::new((plot.x.min, plot.y.min), (plot.x.min, plot.y.max)),
        ticks
          .filter(|v| scale.domain().contains(v))
          .map(|v| (v, Point::new(plot.x.min, scale.apply(v))))
          .filter(|(_, p)| plot.y.contains(&p.y))
          .collect::<Vec<_>>(),
      ),
    };

    Axis {
      orientation,
      line,
      ticks: ticks
        .into_iter()
        .map(|(value, position)| Tick { value, position, text: format!("{value:.decimals$}") })
        .collect(),
    }
  }

  /// The clickable labels under the x axis, one per selectable field.
  pub fn labels(&self, selected: usize) -> Vec<AxisLabel> {
    let plot = self.config.plot_area();
    self
      .config
      .x_fields
      .iter()
      .enumerate()
      .map(|(i, option)| {
        let position =
          Point::new(plot.x.mid(), plot.y.min + LABEL_SPACING * (i as f64 + 2.0));
        AxisLabel {
          field: option.field.clone(),
          text: option.label.clone(),
          position,
          active: i == selected,
          hitbox: text_bounds(&option.label, position),
        }
      })
      .collect()
  }

  fn y_title(&self) -> AxisLabel {
    let position = Point::new(f64::from(LABEL_FONT_SIZE), self.config.plot_area().y.mid());
    AxisLabel {
      field: self.config.y_field.field.clone(),
      text: self.config.y_field.label.clone(),
      position,
      active: true,
      hitbox: text_bounds(&self.config.y_field.label, position),
    }
  }

  pub fn tooltip(
    &self,
    index: usize,
    record: &Record,
    field: &FieldOption,
    center: Point,
  ) -> Option<Tooltip> {
    let value = record.get(&field.field)?;
    let (dx, dy) = self.config.tooltip_offset;
    Some(Tooltip {
      record: index,
      anchor: center + Vec2::new(dx, dy),
      title:  record.label.clone(),
      body:   format!("{} {}", field.prefix, value),
    })
  }
}

/// Approximate box of a centered label with its baseline at `position`.
fn text_bounds(text: &str, position: Point) -> Rect {
  let size = f64::from(LABEL_FONT_SIZE);
  let width = text.chars().count() as f64 * size * 0.6;
  Rect::new(
    position.x - width / 2.0,
    position.y - size,
    position.x + width / 2.0,
    position.y + size * 0.25,
  )
}
