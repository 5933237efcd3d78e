//! An interactive scatter plot over a CSV dataset.
//!
//! One numeric field is plotted on the y axis. The x axis shows one of a set
//! of selectable fields; clicking a field's label under the axis rescales
//! the axis and slides every point to its new position.
//!
//! ```no_run
//! use scatterswitch::{Chart, ChartConfig};
//!
//! let mut chart = Chart::load(ChartConfig::default());
//! chart.show().unwrap();
//! ```

use std::{path::Path, time::Instant};

use kurbo::{Point, Size};
use tracing::{error, info};

mod bounds;
pub mod chart;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
mod render;
pub mod scale;
pub mod transition;

pub use bounds::{Bounds, Range, TicksIter};
pub use chart::Frame;
pub use config::{ChartConfig, FieldOption};
pub use controller::ViewController;
pub use dataset::{Dataset, DatasetLoader, Record};
pub use error::{ChartError, Result};
pub use scale::{LinearScale, Padding, ScaleFactory};

/// One chart session. Holds a controller once the dataset has loaded; a
/// session whose load failed stays empty.
pub struct Chart {
  config:     ChartConfig,
  controller: Option<ViewController>,
}

impl Chart {
  /// Loads `config.data` and builds the view. Failures are logged and leave
  /// the chart empty.
  pub fn load(config: ChartConfig) -> Chart {
    let controller = Self::build(&config)
      .inspect_err(|e| error!("not drawing chart: {e}"))
      .ok();
    Chart { config, controller }
  }

  fn build(config: &ChartConfig) -> Result<ViewController> {
    config.validate()?;
    let loader = DatasetLoader::new(&config.label_field, &config.numeric_fields());
    let dataset = loader.load(&config.data)?;
    ViewController::new(config.clone(), dataset)
  }

  pub fn from_dataset(config: ChartConfig, dataset: Dataset) -> Result<Chart> {
    let controller = ViewController::new(config.clone(), dataset)?;
    Ok(Chart { config, controller: Some(controller) })
  }

  pub fn config(&self) -> &ChartConfig { &self.config }
  pub fn size(&self) -> Size { Size::new(self.config.width, self.config.height) }

  pub fn controller(&self) -> Option<&ViewController> { self.controller.as_ref() }
  pub fn controller_mut(&mut self) -> Option<&mut ViewController> { self.controller.as_mut() }

  pub fn frame(&self, now: Instant) -> Frame {
    match &self.controller {
      Some(c) => c.frame(now),
      None => Frame::empty(&self.config),
    }
  }

  pub fn is_animating(&self, now: Instant) -> bool {
    self.controller.as_ref().is_some_and(|c| c.is_animating(now))
  }

  /// Returns whether the click changed the selected field.
  pub fn click(&mut self, point: Point, now: Instant) -> bool {
    let Some(controller) = &mut self.controller else { return false };
    match controller.click(point, now) {
      Ok(changed) => {
        if changed {
          info!(field = %controller.selected().field, "selected x field");
        }
        changed
      }
      Err(e) => {
        error!("ignoring click: {e}");
        false
      }
    }
  }

  pub fn hover(&mut self, point: Point, now: Instant) -> bool {
    self.controller.as_mut().is_some_and(|c| c.hover(point, now))
  }

  pub fn leave(&mut self) -> bool { self.controller.as_mut().is_some_and(|c| c.leave()) }

  /// Opens a window and runs until it's closed.
  pub fn show(&mut self) -> std::result::Result<(), error::RenderError> {
    render::window::show(self)
  }

  /// Renders the current frame to an image at `scale` pixels per unit.
  pub fn save(
    &self,
    path: impl AsRef<Path>,
    scale: f64,
  ) -> std::result::Result<(), error::RenderError> {
    render::texture::save(&self.frame(Instant::now()), scale, path.as_ref())
  }
}
