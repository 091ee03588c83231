use kurbo::{Affine, Point, Shape, Size, Stroke, Vec2};
use parley::{Alignment, FontWeight, Layout, PositionedLayoutItem, StyleProperty};
use peniko::{Brush, BrushRef, Color, Fill};
use vello::{Scene, wgpu};

use crate::{Figure, PlotError, Result};

pub(crate) mod texture;
pub(crate) mod window;

/// A scene under construction, along with the text layout state needed to
/// measure and place labels.
pub struct Render {
  pub(crate) scene:      Scene,
  pub(crate) background: Color,
  font:                  parley::FontContext,
  layout:                parley::LayoutContext<Brush>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
  #[default]
  Start,
  Center,
  End,
}

pub struct DrawText<'a> {
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
      size:             16.0,
      weight:           FontWeight::NORMAL,
      brush:            Brush::Solid(Color::BLACK),
      position:         Point::ZERO,
      transform:        Affine::IDENTITY,
      horizontal_align: Align::Start,
      vertical_align:   Align::Start,
    }
  }
}

impl Align {
  pub(crate) fn offset(self, size: f64) -> f64 {
    match self {
      Align::Start => 0.0,
      Align::Center => -size / 2.0,
      Align::End => -size,
    }
  }
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

impl Figure {
  /// Paints the figure into a fresh scene sized to the theme's canvas.
  pub fn to_scene(&self) -> Scene {
    let mut render = Render::new(self.theme.background);
    self.draw(&mut render, self.theme.pixel_size());
    render.scene
  }

  /// Rasterizes the figure on the GPU and writes it to `path`. The image
  /// format follows the file extension.
  pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
    let config = RenderConfig::from_size(self.theme.pixel_size());
    let handle = GpuHandle::new(&config, None)?;

    let mut render = Render::new(self.theme.background);
    self.draw(&mut render, config.size());

    let mut renderer = vello::Renderer::new(&handle.device, vello::RendererOptions::default())
      .map_err(|e| PlotError::Gpu(e.to_string()))?;
    render.render_to_texture(&mut renderer, &handle, &config)?;

    texture::save(&handle, &config, path.as_ref())
  }

  /// Opens a window showing the figure, and blocks until it is closed.
  pub fn show(&self) -> Result<()> { window::show(self) }
}

impl Render {
  pub fn new(background: Color) -> Self {
    Render {
      scene: Scene::new(),
      background,
      font: parley::FontContext::new(),
      layout: parley::LayoutContext::new(),
    }
  }

  pub fn scene(&self) -> &Scene { &self.scene }

  pub fn fill<'b>(
    &mut self,
    shape: &impl Shape,
    transform: Affine,
    brush: impl Into<BrushRef<'b>>,
  ) {
    self.scene.fill(Fill::NonZero, transform, brush, None, shape);
  }

  pub fn stroke<'b>(
    &mut self,
    shape: &impl Shape,
    transform: Affine,
    brush: impl Into<BrushRef<'b>>,
    stroke: &Stroke,
  ) {
    self.scene.stroke(stroke, transform, brush, None, shape);
  }

  pub fn layout_text(&mut self, text: &DrawText) -> Layout<Brush> {
    let mut builder = self.layout.ranged_builder(&mut self.font, text.text, 1.0, true);

    builder.push_default(StyleProperty::FontSize(text.size));
    builder.push_default(StyleProperty::FontWeight(text.weight));
    builder.push_default(StyleProperty::Brush(text.brush.clone()));

    let mut layout = builder.build(text.text);
    layout.break_all_lines(None);
    layout.align(None, Alignment::Start, Default::default());
    layout
  }

  /// Measures `text` without drawing it.
  pub fn text_size(&mut self, text: &DrawText) -> Size {
    let layout = self.layout_text(text);
    Size::new(f64::from(layout.width()), f64::from(layout.height()))
  }

  pub fn draw_text(&mut self, text: DrawText) {
    let layout = self.layout_text(&text);
    self.draw_text_layout(layout, text);
  }

  pub fn draw_text_layout(&mut self, layout: Layout<Brush>, text: DrawText) {
    let offset = Vec2::new(
      text.horizontal_align.offset(f64::from(layout.width())),
      text.vertical_align.offset(f64::from(layout.height())),
    );
    let transform =
      Affine::translate(text.position.to_vec2()) * text.transform * Affine::translate(offset);

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
          .hint(true)
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

  pub(crate) fn render_to_texture(
    &self,
    renderer: &mut vello::Renderer,
    handle: &GpuHandle,
    config: &RenderConfig,
  ) -> Result<()> {
    renderer
      .render_to_texture(
        &handle.device,
        &handle.queue,
        &self.scene,
        &handle.view,
        &vello::RenderParams {
          base_color:          self.background,
          width:               config.width,
          height:              config.height,
          antialiasing_method: vello::AaConfig::Msaa16,
        },
      )
      .map_err(|e| PlotError::Gpu(e.to_string()))
  }
}

impl GpuHandle {
  pub fn new(config: &RenderConfig, adapter: Option<wgpu::Adapter>) -> Result<Self> {
    let adapter = match adapter {
      Some(adapter) => adapter,
      None => {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
          .map_err(|e| PlotError::Gpu(format!("failed to create adapter: {e}")))?
      }
    };

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
      label:             None,
      required_features: wgpu::Features::empty(),
      required_limits:   wgpu::Limits::defaults(),
      memory_hints:      wgpu::MemoryHints::MemoryUsage,
      trace:             wgpu::Trace::Off,
    }))
    .map_err(|e| PlotError::Gpu(format!("failed to create device: {e}")))?;

    let (texture, view) = Self::create_texture(&device, config);
    Ok(GpuHandle { device, queue, texture, view })
  }

  pub fn resize(&mut self, config: &RenderConfig) {
    let (texture, view) = Self::create_texture(&self.device, config);
    self.texture = texture;
    self.view = view;
  }

  fn create_texture(
    device: &wgpu::Device,
    config: &RenderConfig,
  ) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
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
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
  }
}

impl RenderConfig {
  pub fn from_size(size: Size) -> Self {
    RenderConfig {
      width:  size.width.round().max(1.0) as u32,
      height: size.height.round().max(1.0) as u32,
    }
  }

  pub fn size(&self) -> Size { Size::new(f64::from(self.width), f64::from(self.height)) }

  fn extent_3d(&self) -> wgpu::Extent3d {
    wgpu::Extent3d { width: self.width, height: self.height, depth_or_array_layers: 1 }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_from_theme_size() {
    let config = RenderConfig::from_size(Size::new(1000.0, 600.0));
    assert_eq!((config.width, config.height), (1000, 600));
    assert_eq!(config.size(), Size::new(1000.0, 600.0));
  }

  #[test]
  fn align_offsets() {
    assert_eq!(Align::Start.offset(10.0), 0.0);
    assert_eq!(Align::Center.offset(10.0), -5.0);
    assert_eq!(Align::End.offset(10.0), -10.0);
  }
}
