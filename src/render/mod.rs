use parley::{Alignment, FontWeight, PositionedLayoutItem, StyleProperty};
use vello::{
  kurbo::{Affine, Point, Shape, Stroke},
  peniko::{Brush, Color, Fill},
  wgpu::{self, TextureDescriptor},
};

use crate::error::RenderError;

mod draw;
pub mod texture;
pub mod window;

pub(crate) struct Render {
  pub scene:      vello::Scene,
  pub background: Color,
  font:           parley::FontContext,
  layout:         parley::LayoutContext<Brush>,
  /// Surface units to target pixels.
  transform:      Affine,
}

pub(crate) struct GpuHandle {
  pub device:  wgpu::Device,
  pub queue:   wgpu::Queue,
  pub texture: wgpu::Texture,
  pub view:    wgpu::TextureView,
}

#[derive(Clone, Copy)]
pub(crate) struct RenderConfig {
  pub width:  u32,
  pub height: u32,
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Align {
  #[default]
  Start,
  Center,
  End,
}

pub(crate) struct DrawText<'a> {
  pub text:             &'a str,
  pub size:             f32,
  pub weight:           FontWeight,
  pub brush:            Brush,
  pub position:         Point,
  pub transform:        Affine,
  pub horizontal_align: Align,
  pub vertical_align:   Align,
}

impl Default for DrawText<'_> {
  fn default() -> Self {
    DrawText {
      text:             "",
      size:             12.0,
      weight:           FontWeight::NORMAL,
      brush:            Brush::Solid(Color::BLACK),
      position:         Point::ZERO,
      transform:        Affine::IDENTITY,
      horizontal_align: Align::Start,
      vertical_align:   Align::End,
    }
  }
}

impl Render {
  pub fn new() -> Self {
    Render {
      scene:      vello::Scene::new(),
      background: Color::WHITE,
      font:       parley::FontContext::new(),
      layout:     parley::LayoutContext::new(),
      transform:  Affine::IDENTITY,
    }
  }

  /// Clears the scene and sets the surface-to-pixel scale for the next draw.
  pub fn reset(&mut self, scale: f64) {
    self.scene.reset();
    self.transform = Affine::scale(scale);
  }

  pub fn fill(&mut self, shape: &impl Shape, transform: Affine, brush: &Brush) {
    self.scene.fill(Fill::NonZero, self.transform * transform, brush, None, shape);
  }

  pub fn stroke(&mut self, shape: &impl Shape, transform: Affine, brush: &Brush, stroke: &Stroke) {
    self.scene.stroke(stroke, self.transform * transform, brush, None, shape);
  }

  pub fn layout_text(&mut self, text: &DrawText) -> parley::Layout<Brush> {
    let mut builder = self.layout.ranged_builder(&mut self.font, text.text, 1.0, true);
    builder.push_default(StyleProperty::FontSize(text.size));
    builder.push_default(StyleProperty::Brush(text.brush.clone()));
    builder.push_default(StyleProperty::FontWeight(text.weight));

    let mut layout = builder.build(text.text);
    layout.break_all_lines(None);
    layout.align(None, Alignment::Start, Default::default());
    layout
  }

  pub fn draw_text(&mut self, text: DrawText) {
    let layout = self.layout_text(&text);
    self.draw_text_layout(layout, text);
  }

  /// Draws `layout` with `text.position` at the aligned corner, before
  /// `text.transform` is applied around it.
  pub fn draw_text_layout(&mut self, layout: parley::Layout<Brush>, text: DrawText) {
    let width = f64::from(layout.width());
    let height = f64::from(layout.height());
    let offset = |align: Align, size: f64| match align {
      Align::Start => 0.0,
      Align::Center => -size / 2.0,
      Align::End => -size,
    };

    let transform = self.transform
      * Affine::translate(text.position.to_vec2())
      * text.transform
      * Affine::translate((
        offset(text.horizontal_align, width),
        offset(text.vertical_align, height),
      ));

    for line in layout.lines() {
      for item in line.items() {
        let PositionedLayoutItem::GlyphRun(glyph_run) = item else { continue };

        let run = glyph_run.run();
        let mut x = glyph_run.offset();
        let baseline = glyph_run.baseline();

        self
          .scene
          .draw_glyphs(run.font())
          .brush(&glyph_run.style().brush)
          .hint(false)
          .transform(transform)
          .glyph_transform(
            run.synthesis().skew().map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0)),
          )
          .font_size(run.font_size())
          .normalized_coords(run.normalized_coords())
          .draw(
            Fill::NonZero,
            glyph_run.glyphs().map(|glyph| {
              let gx = x + glyph.x;
              let gy = baseline + glyph.y;
              x += glyph.advance;
              vello::Glyph { id: glyph.id.into(), x: gx, y: gy }
            }),
          );
      }
    }
  }
}

impl GpuHandle {
  pub fn new(config: &RenderConfig, adapter: Option<wgpu::Adapter>) -> Result<Self, RenderError> {
    let adapter = match adapter {
      Some(adapter) => adapter,
      None => {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
          .map_err(|e| RenderError::Adapter(e.to_string()))?
      }
    };

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
      label:             None,
      required_features: wgpu::Features::empty(),
      required_limits:   wgpu::Limits::defaults(),
      memory_hints:      wgpu::MemoryHints::MemoryUsage,
      trace:             wgpu::Trace::Off,
    }))
    .map_err(|e| RenderError::Device(e.to_string()))?;

    let texture = Self::create_texture(&device, config);
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Ok(GpuHandle { device, queue, texture, view })
  }

  pub fn resize(&mut self, config: &RenderConfig) {
    self.texture = Self::create_texture(&self.device, config);
    self.view = self.texture.create_view(&wgpu::TextureViewDescriptor::default());
  }

  pub fn render(
    &self,
    renderer: &mut vello::Renderer,
    render: &Render,
    config: &RenderConfig,
  ) -> Result<(), RenderError> {
    renderer
      .render_to_texture(
        &self.device,
        &self.queue,
        &render.scene,
        &self.view,
        &vello::RenderParams {
          base_color:          render.background,
          width:               config.width,
          height:              config.height,
          antialiasing_method: vello::AaConfig::Msaa16,
        },
      )
      .map_err(|e| RenderError::Vello(e.to_string()))
  }

  fn create_texture(device: &wgpu::Device, config: &RenderConfig) -> wgpu::Texture {
    device.create_texture(&TextureDescriptor {
      label:           Some("Render Texture"),
      size:            config.extent_3d(),
      mip_level_count: 1,
      sample_count:    1,
      dimension:       wgpu::TextureDimension::D2,
      format:          wgpu::TextureFormat::Rgba8Unorm,
      usage:           wgpu::TextureUsages::STORAGE_BINDING
        | wgpu::TextureUsages::TEXTURE_BINDING
        | wgpu::TextureUsages::COPY_SRC,
      view_formats:    &[],
    })
  }
}

impl RenderConfig {
  fn extent_3d(&self) -> wgpu::Extent3d {
    wgpu::Extent3d {
      width:                 self.width,
      height:                self.height,
      depth_or_array_layers: 1,
    }
  }
}
