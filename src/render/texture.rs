use std::{path::Path, sync::mpsc};

use image::{ImageBuffer, Rgba};
use tracing::info;
use vello::wgpu;

use crate::{
  chart::Frame,
  error::RenderError,
  render::{GpuHandle, Render, RenderConfig},
};

/// Renders `frame` offscreen at `scale` target pixels per surface unit and
/// writes it to `path` as an image.
pub fn save(frame: &Frame, scale: f64, path: &Path) -> Result<(), RenderError> {
  let config = RenderConfig {
    width:  (frame.size.width * scale).round().max(1.0) as u32,
    height: (frame.size.height * scale).round().max(1.0) as u32,
  };
  let handle = GpuHandle::new(&config, None)?;

  let mut render = Render::new();
  render.reset(scale);
  render.draw_frame(frame);

  let mut renderer = vello::Renderer::new(&handle.device, vello::RendererOptions::default())
    .map_err(|e| RenderError::Vello(e.to_string()))?;
  handle.render(&mut renderer, &render, &config)?;

  let pixels = read_back(&handle, &config)?;
  let image = ImageBuffer::<Rgba<u8>, _>::from_raw(config.width, config.height, pixels)
    .ok_or_else(|| RenderError::Readback("pixel buffer size mismatch".to_string()))?;
  image.save(path)?;

  info!(path = %path.display(), width = config.width, height = config.height, "saved chart");
  Ok(())
}

fn read_back(handle: &GpuHandle, config: &RenderConfig) -> Result<Vec<u8>, RenderError> {
  let row_bytes = 4 * config.width;
  let padded_row_bytes = row_bytes.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
    * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

  let buffer = handle.device.create_buffer(&wgpu::BufferDescriptor {
    label:              Some("Output Buffer"),
    size:               u64::from(padded_row_bytes) * u64::from(config.height),
    usage:              wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
    mapped_at_creation: false,
  });

  let mut encoder = handle.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
    label: Some("texture_buffer_copy_encoder"),
  });

  encoder.copy_texture_to_buffer(
    wgpu::TexelCopyTextureInfo {
      texture:   &handle.texture,
      mip_level: 0,
      origin:    wgpu::Origin3d::ZERO,
      aspect:    wgpu::TextureAspect::All,
    },
    wgpu::TexelCopyBufferInfo {
      buffer: &buffer,
      layout: wgpu::TexelCopyBufferLayout {
        offset:         0,
        bytes_per_row:  Some(padded_row_bytes),
        rows_per_image: Some(config.height),
      },
    },
    config.extent_3d(),
  );

  handle.queue.submit(std::iter::once(encoder.finish()));

  let slice = buffer.slice(..);
  let (tx, rx) = mpsc::channel();
  slice.map_async(wgpu::MapMode::Read, move |result| {
    let _ = tx.send(result);
  });
  handle.device.poll(wgpu::PollType::Wait).map_err(|e| RenderError::Readback(e.to_string()))?;
  rx.recv()
    .map_err(|e| RenderError::Readback(e.to_string()))?
    .map_err(|e| RenderError::Readback(e.to_string()))?;

  let data = slice.get_mapped_range();
  let mut pixels = Vec::with_capacity((row_bytes * config.height) as usize);
  for row in data.chunks(padded_row_bytes as usize) {
    pixels.extend_from_slice(&row[..row_bytes as usize]);
  }
  drop(data);
  buffer.unmap();

  Ok(pixels)
}
