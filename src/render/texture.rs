use std::path::Path;

use image::{ImageBuffer, Rgba};
use vello::wgpu;

use crate::{
  PlotError, Result,
  render::{GpuHandle, RenderConfig},
};

/// Copies the rendered texture back from the GPU and writes it to `path`.
pub(crate) fn save(handle: &GpuHandle, config: &RenderConfig, path: &Path) -> Result<()> {
  // Rows in a texture copy must be padded to the copy alignment.
  let unpadded_row = 4 * config.width;
  let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
    * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

  let buffer = handle.device.create_buffer(&wgpu::BufferDescriptor {
    label:              Some("Output Buffer"),
    size:               u64::from(padded_row) * u64::from(config.height),
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
        bytes_per_row:  Some(padded_row),
        rows_per_image: Some(config.height),
      },
    },
    config.extent_3d(),
  );

  handle.queue.submit(std::iter::once(encoder.finish()));

  let buffer_slice = buffer.slice(..);
  let (tx, rx) = std::sync::mpsc::channel();
  buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
    let _ = tx.send(result);
  });
  handle.device.poll(wgpu::PollType::Wait).map_err(|e| PlotError::Gpu(e.to_string()))?;
  rx.recv()
    .map_err(|e| PlotError::Gpu(format!("buffer mapping was dropped: {e}")))?
    .map_err(|e| PlotError::Gpu(format!("failed to map output buffer: {e}")))?;

  let pixels = {
    let data = buffer_slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((unpadded_row * config.height) as usize);
    for row in data.chunks(padded_row as usize) {
      pixels.extend_from_slice(&row[..unpadded_row as usize]);
    }
    pixels
  };
  buffer.unmap();

  let image = ImageBuffer::<Rgba<u8>, _>::from_raw(config.width, config.height, pixels)
    .ok_or_else(|| PlotError::Gpu("output buffer is smaller than the image".into()))?;
  image.save(path)?;

  log::debug!(
    target: "regplot",
    "saved {}x{} figure to {}",
    config.width,
    config.height,
    path.display()
  );
  Ok(())
}
