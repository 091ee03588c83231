use vello::wgpu;
use winit::{
  application::ApplicationHandler,
  event::{KeyEvent, WindowEvent},
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  keyboard::Key,
  window::WindowId,
};

use crate::{
  Figure, PlotError, Result,
  render::{GpuHandle, Render, RenderConfig},
};

pub(crate) fn show(figure: &Figure) -> Result<()> {
  let event_loop = EventLoop::new().map_err(|e| PlotError::Window(e.to_string()))?;
  event_loop.set_control_flow(ControlFlow::Wait);

  let mut app = App { figure, stale: true, render: None, init: None, error: None };
  let result = event_loop.run_app(&mut app).map_err(|e| PlotError::Window(e.to_string()));
  let error = app.error.take();

  // FIXME: Ideally, we'd drop this. But dropping the renderer and surface
  // after the event loop exits segfaults.
  std::mem::forget(app);

  result?;
  match error {
    Some(e) => Err(e),
    None => Ok(()),
  }
}

struct App<'a> {
  figure: &'a Figure,
  stale:  bool,
  render: Option<Render>,

  init:  Option<Init>,
  error: Option<PlotError>,
}

struct Init {
  surface: wgpu::Surface<'static>,
  config:  wgpu::SurfaceConfiguration,
  handle:  GpuHandle,

  blit:  wgpu::util::TextureBlitter,
  vello: vello::Renderer,
}

impl ApplicationHandler for App<'_> {
  fn resumed(&mut self, event_loop: &ActiveEventLoop) {
    if self.init.is_some() {
      return;
    }

    match Init::new(event_loop, self.figure) {
      Ok(init) => self.init = Some(init),
      Err(e) => {
        log::error!(target: "regplot", "failed to open figure window: {e}");
        self.error = Some(e);
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
        event: KeyEvent { logical_key: Key::Character(c), .. }, ..
      } if c == "q" => {
        event_loop.exit();
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

            self.stale = true;
          }
        }
      }

      WindowEvent::RedrawRequested => {
        let Some(init) = &mut self.init else { return };

        if self.render.is_none() || self.stale {
          self.stale = false;
          let render = self.render.get_or_insert_with(|| Render::new(self.figure.theme.background));
          render.scene.reset();

          let config = RenderConfig { width: init.config.width, height: init.config.height };
          self.figure.draw(render, config.size());

          if let Err(e) = render.render_to_texture(&mut init.vello, &init.handle, &config) {
            log::error!(target: "regplot", "dropped frame: {e}");
            return;
          }
        }
        init.redraw();
      }

      _ => (),
    }
  }
}

impl Init {
  fn new(event_loop: &ActiveEventLoop, figure: &Figure) -> Result<Self> {
    let size = figure.theme.pixel_size();
    let window = event_loop
      .create_window(
        winit::window::Window::default_attributes()
          .with_title(figure.get_title().unwrap_or("regplot"))
          .with_inner_size(winit::dpi::PhysicalSize::new(size.width, size.height))
          .with_min_inner_size(winit::dpi::LogicalSize::new(100, 100)),
      )
      .map_err(|e| PlotError::Window(e.to_string()))?;
    let size = window.inner_size();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let surface = instance.create_surface(window).map_err(|e| PlotError::Gpu(e.to_string()))?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
      compatible_surface: Some(&surface),
      ..Default::default()
    }))
    .map_err(|e| PlotError::Gpu(format!("failed to create adapter: {e}")))?;

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
      .formats
      .iter()
      .copied()
      .find(|f| f.is_srgb())
      .or_else(|| surface_caps.formats.first().copied())
      .ok_or_else(|| PlotError::Gpu("surface has no supported formats".into()))?;

    let render_config = RenderConfig { width: size.width.max(1), height: size.height.max(1) };
    let handle = GpuHandle::new(&render_config, Some(adapter))?;

    let config = wgpu::SurfaceConfiguration {
      usage:                         wgpu::TextureUsages::RENDER_ATTACHMENT
        | wgpu::TextureUsages::COPY_DST,
      format:                        surface_format,
      width:                         render_config.width,
      height:                        render_config.height,
      present_mode:                  wgpu::PresentMode::AutoNoVsync,
      alpha_mode:                    surface_caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto),
      view_formats:                  vec![],
      desired_maximum_frame_latency: 2,
    };
    surface.configure(&handle.device, &config);

    let vello = vello::Renderer::new(&handle.device, vello::RendererOptions::default())
      .map_err(|e| PlotError::Gpu(e.to_string()))?;

    let blit = wgpu::util::TextureBlitter::new(&handle.device, config.format);

    Ok(Init { surface, config, handle, blit, vello })
  }

  fn redraw(&mut self) {
    let frame = match self.surface.get_current_texture() {
      Ok(frame) => frame,
      Err(wgpu::SurfaceError::Lost) => {
        self.surface.configure(&self.handle.device, &self.config);
        return;
      }
      Err(e) => {
        log::warn!(target: "regplot", "dropped frame: {e:?}");
        return;
      }
    };

    let surface_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = self
      .handle
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });

    self.blit.copy(&self.handle.device, &mut encoder, &self.handle.view, &surface_view);

    self.handle.queue.submit(std::iter::once(encoder.finish()));

    frame.present();
  }
}
