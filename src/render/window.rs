use std::{sync::Arc, time::Instant};

use kurbo::Point;
use tracing::{error, warn};
use vello::wgpu;
use winit::{
  application::ApplicationHandler,
  event::{ElementState, KeyEvent, MouseButton, WindowEvent},
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  keyboard::Key,
  window::{Window, WindowId},
};

use crate::{
  Chart,
  error::RenderError,
  render::{GpuHandle, Render, RenderConfig},
};

pub fn show(chart: &mut Chart) -> Result<(), RenderError> {
  let event_loop = EventLoop::new().map_err(|e| RenderError::EventLoop(e.to_string()))?;
  event_loop.set_control_flow(ControlFlow::Wait);

  let mut app = App {
    chart,
    redraw: Redraw { stale: true, animating: false },
    render: None,
    cursor: None,
    failed: None,
    init: None,
  };
  event_loop.run_app(&mut app).map_err(|e| RenderError::EventLoop(e.to_string()))?;

  app.failed.map_or(Ok(()), Err)
}

struct App<'a> {
  chart:  &'a mut Chart,
  redraw: Redraw,
  render: Option<Render>,
  cursor: Option<Point>,
  failed: Option<RenderError>,

  /// Released in `exiting`, while the event loop still owns the display.
  init: Option<Init>,
}

/// Decides whether the scene must be rebuilt before the next present.
#[derive(Default)]
struct Redraw {
  stale:     bool,
  /// A transition was running at the last redraw.
  animating: bool,
}

impl Redraw {
  fn invalidate(&mut self) { self.stale = true; }

  /// A transition that ended since the last call still gets one final frame.
  fn take(&mut self, animating: bool) -> bool {
    let needed = self.stale || animating || self.animating;
    self.stale = false;
    self.animating = animating;
    needed
  }
}

struct Init {
  window:  Arc<Window>,
  surface: wgpu::Surface<'static>,
  config:  wgpu::SurfaceConfiguration,
  handle:  GpuHandle,

  blit:  wgpu::util::TextureBlitter,
  vello: vello::Renderer,
}

impl App<'_> {
  /// Surface units to window pixels, fitting the whole chart.
  fn scale(&self) -> f64 {
    let Some(init) = &self.init else { return 1.0 };
    let size = self.chart.size();
    (f64::from(init.config.width) / size.width).min(f64::from(init.config.height) / size.height)
  }

  fn to_surface(&self, position: winit::dpi::PhysicalPosition<f64>) -> Point {
    let scale = self.scale();
    Point::new(position.x / scale, position.y / scale)
  }

  fn request_redraw(&self) {
    if let Some(init) = &self.init {
      init.window.request_redraw();
    }
  }

  /// Rebuilds the scene on the next redraw if the chart changed.
  fn changed(&mut self, changed: bool) {
    if changed {
      self.redraw.invalidate();
      self.request_redraw();
    }
  }

  fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<Init, RenderError> {
    let window = event_loop
      .create_window(
        Window::default_attributes()
          .with_title("scatterswitch")
          .with_min_inner_size(winit::dpi::LogicalSize::new(100, 100)),
      )
      .map_err(|e| RenderError::Surface(e.to_string()))?;
    let window = Arc::new(window);
    let size = window.inner_size();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let surface = instance
      .create_surface(window.clone())
      .map_err(|e| RenderError::Surface(e.to_string()))?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
      compatible_surface: Some(&surface),
      ..Default::default()
    }))
    .map_err(|e| RenderError::Adapter(e.to_string()))?;

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
      .formats
      .iter()
      .copied()
      .find(|f| f.is_srgb())
      .or_else(|| surface_caps.formats.first().copied())
      .ok_or_else(|| RenderError::Surface("surface has no formats".to_string()))?;

    let render_config = RenderConfig { width: size.width.max(1), height: size.height.max(1) };
    let handle = GpuHandle::new(&render_config, Some(adapter))?;

    let config = wgpu::SurfaceConfiguration {
      usage:                         wgpu::TextureUsages::RENDER_ATTACHMENT
        | wgpu::TextureUsages::COPY_DST,
      format:                        surface_format,
      width:                         render_config.width,
      height:                        render_config.height,
      present_mode:                  wgpu::PresentMode::AutoVsync,
      alpha_mode:                    surface_caps.alpha_modes[0],
      view_formats:                  vec![],
      desired_maximum_frame_latency: 2,
    };
    surface.configure(&handle.device, &config);

    let vello = vello::Renderer::new(&handle.device, vello::RendererOptions::default())
      .map_err(|e| RenderError::Vello(e.to_string()))?;

    let blit = wgpu::util::TextureBlitter::new(&handle.device, config.format);

    Ok(Init { window, surface, config, handle, blit, vello })
  }

  fn redraw(&mut self) -> Result<(), RenderError> {
    let scale = self.scale();
    let now = Instant::now();
    let Some(init) = &mut self.init else { return Ok(()) };

    let needed = self.redraw.take(self.chart.is_animating(now));
    if needed || self.render.is_none() {
      let render = self.render.get_or_insert_with(Render::new);
      render.reset(scale);
      render.draw_frame(&self.chart.frame(now));

      init.handle.render(
        &mut init.vello,
        render,
        &RenderConfig { width: init.config.width, height: init.config.height },
      )?;
    }
    init.present();
    Ok(())
  }
}

impl ApplicationHandler for App<'_> {
  fn resumed(&mut self, event_loop: &ActiveEventLoop) {
    if self.init.is_some() {
      return;
    }

    match self.init(event_loop) {
      Ok(init) => {
        init.window.request_redraw();
        self.init = Some(init);
      }
      Err(e) => {
        error!("failed to open chart window: {e}");
        self.failed = Some(e);
        event_loop.exit();
      }
    }
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
    match event {
      WindowEvent::CloseRequested => {
        event_loop.exit();
      }

      WindowEvent::KeyboardInput {
        event: KeyEvent { logical_key: Key::Character(c), state: ElementState::Pressed, .. },
        ..
      } if c == "q" => {
        event_loop.exit();
      }

      WindowEvent::CursorMoved { position, .. } => {
        let point = self.to_surface(position);
        self.cursor = Some(point);
        let changed = self.chart.hover(point, Instant::now());
        self.changed(changed);
      }

      WindowEvent::CursorLeft { .. } => {
        self.cursor = None;
        let changed = self.chart.leave();
        self.changed(changed);
      }

      WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
        if let Some(point) = self.cursor {
          let changed = self.chart.click(point, Instant::now());
          self.changed(changed);
        }
      }

      WindowEvent::Resized(new_size) => {
        if let Some(init) = &mut self.init {
          if new_size.width > 0 && new_size.height > 0 {
            init.config.width = new_size.width;
            init.config.height = new_size.height;
            init
              .handle
              .resize(&RenderConfig { width: init.config.width, height: init.config.height });
            init.surface.configure(&init.handle.device, &init.config);

            self.redraw.invalidate();
            init.window.request_redraw();
          }
        }
      }

      WindowEvent::RedrawRequested => {
        if let Err(e) = self.redraw() {
          error!("failed to draw chart: {e}");
          self.failed = Some(e);
          event_loop.exit();
        }
      }

      _ => (),
    }
  }

  fn about_to_wait(&mut self, _: &ActiveEventLoop) {
    if self.chart.is_animating(Instant::now()) {
      self.request_redraw();
    }
  }

  fn exiting(&mut self, _: &ActiveEventLoop) {
    self.render = None;
    self.init = None;
  }
}

impl Init {
  fn present(&mut self) {
    let frame = match self.surface.get_current_texture() {
      Ok(frame) => frame,
      Err(wgpu::SurfaceError::Lost) => {
        self.surface.configure(&self.handle.device, &self.config);
        return;
      }
      Err(e) => {
        warn!("dropped frame: {e:?}");
        return;
      }
    };

    let surface_view = &frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = self
      .handle
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });

    self.blit.copy(&self.handle.device, &mut encoder, &self.handle.view, surface_view);

    self.handle.queue.submit(std::iter::once(encoder.finish()));

    frame.present();
  }
}
