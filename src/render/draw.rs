use kurbo::{Affine, Cap, Circle, Line, Point, Rect, RoundedRect, Stroke, Vec2};
use parley::FontWeight;
use peniko::{Brush, Color};

use crate::{
  chart::{
    Axis, AxisLabel, Frame, LABEL_FONT_SIZE, Orientation, TICK_FONT_SIZE, TICK_SIZE, Tooltip,
  },
  render::{Align, DrawText, Render},
};

const TEXT_COLOR: Brush = Brush::Solid(Color::from_rgb8(32, 32, 32));
const INACTIVE_COLOR: Brush = Brush::Solid(Color::from_rgb8(160, 160, 160));
const LINE_COLOR: Brush = Brush::Solid(Color::from_rgb8(128, 128, 128));

impl Render {
  pub(crate) fn draw_frame(&mut self, frame: &Frame) {
    for axis in [&frame.x_axis, &frame.y_axis].into_iter().flatten() {
      self.draw_axis(axis);
    }

    for point in &frame.points {
      let circle = Circle::new(point.center, point.radius);
      self.fill(&circle, Affine::IDENTITY, &Brush::Solid(point.color));
      if point.hovered {
        self.stroke(&circle, Affine::IDENTITY, &TEXT_COLOR, &Stroke::new(2.0));
      }
    }

    for label in &frame.labels {
      self.draw_label(label, Affine::IDENTITY);
    }
    if let Some(title) = &frame.y_title {
      self.draw_label(title, Affine::rotate(-std::f64::consts::FRAC_PI_2));
    }

    if let Some(tooltip) = &frame.tooltip {
      self.draw_tooltip(tooltip);
    }
  }

  fn draw_axis(&mut self, axis: &Axis) {
    let stroke = Stroke::new(1.0);
    self.stroke(&axis.line, Affine::IDENTITY, &LINE_COLOR, &stroke);

    for tick in &axis.ticks {
      let (outward, horizontal_align, vertical_align) = match axis.orientation {
        Orientation::Bottom => (Vec2::new(0.0, TICK_SIZE), Align::Center, Align::Start),
        Orientation::Left => (Vec2::new(-TICK_SIZE, 0.0), Align::End, Align::Center),
      };

      self.stroke(
        &Line::new(tick.position, tick.position + outward),
        Affine::IDENTITY,
        &LINE_COLOR,
        &stroke.clone().with_start_cap(Cap::Butt),
      );
      self.draw_text(DrawText {
        text: &tick.text,
        size: TICK_FONT_SIZE,
        brush: TEXT_COLOR,
        position: tick.position + outward * 1.5,
        horizontal_align,
        vertical_align,
        ..Default::default()
      });
    }
  }

  fn draw_label(&mut self, label: &AxisLabel, transform: Affine) {
    let (weight, brush) = if label.active {
      (FontWeight::BOLD, TEXT_COLOR)
    } else {
      (FontWeight::NORMAL, INACTIVE_COLOR)
    };

    self.draw_text(DrawText {
      text: &label.text,
      size: LABEL_FONT_SIZE,
      weight,
      brush,
      position: label.position,
      transform,
      horizontal_align: Align::Center,
      vertical_align: Align::End,
    });
  }

  fn draw_tooltip(&mut self, tooltip: &Tooltip) {
    const PADDING: f64 = 8.0;
    const FONT_SIZE: f32 = 13.0;
    const LINE_HEIGHT: f64 = 18.0;

    let white = Brush::Solid(Color::WHITE);
    let lines = [tooltip.title.as_str(), tooltip.body.as_str()];

    let mut inner_width = 0.0_f64;
    let mut layouts = vec![];
    for (i, line) in lines.into_iter().enumerate() {
      let text = DrawText {
        text: line,
        size: FONT_SIZE,
        weight: if i == 0 { FontWeight::BOLD } else { FontWeight::NORMAL },
        brush: white.clone(),
        horizontal_align: Align::Center,
        vertical_align: Align::Start,
        ..Default::default()
      };
      let layout = self.layout_text(&text);
      inner_width = inner_width.max(f64::from(layout.width()));
      layouts.push((layout, text));
    }

    let inner_height = lines.len() as f64 * LINE_HEIGHT;
    let rect = Rect::from_center_size(
      tooltip.anchor,
      (inner_width + PADDING * 2.0, inner_height + PADDING * 2.0),
    );
    let background = RoundedRect::from_rect(rect, 4.0);
    self.fill(&background, Affine::IDENTITY, &Brush::Solid(Color::from_rgba8(0, 0, 0, 200)));

    for (i, (layout, mut text)) in layouts.into_iter().enumerate() {
      text.position = Point::new(rect.center().x, rect.y0 + PADDING + i as f64 * LINE_HEIGHT);
      self.draw_text_layout(layout, text);
    }
  }
}
