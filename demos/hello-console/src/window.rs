use std::num::NonZeroU32;

use cellcon_core::Error;
use color_eyre::{
    Report,
    eyre::{Context, OptionExt, eyre},
};
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::{
    dpi::PhysicalSize,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes},
};

/// A window with a current OpenGL 3.3 core context.
pub struct GlWindow {
    pub window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    pub gl: glow::Context,
}

impl GlWindow {
    pub fn new(
        event_loop: &ActiveEventLoop,
        title: &str,
        size: (u32, u32),
    ) -> Result<Self, Report> {
        let window_attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(size.0, size.1));

        let config_template = ConfigTemplateBuilder::new().with_alpha_size(8);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attrs))
            .build(event_loop, config_template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() { config } else { accum }
                    })
                    .expect("glutin offers at least one config")
            })
            .map_err(|e| eyre!("failed to build display: {e}"))?;

        let window = window.ok_or_eyre("failed to create window")?;
        let gl_display = gl_config.display();
        let window_handle = window
            .window_handle()
            .wrap_err("failed to get window handle")?;

        // Request OpenGL 3.3 Core
        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(window_handle.into()));

        let not_current_context = unsafe { gl_display.create_context(&gl_config, &context_attrs) }
            .wrap_err("failed to create GL context")?;

        let inner = window.inner_size();
        let surface_attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window_handle.into(),
            non_zero(inner.width)?,
            non_zero(inner.height)?,
        );

        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attrs) }
            .wrap_err("failed to create GL surface")?;

        let gl_context = not_current_context
            .make_current(&gl_surface)
            .wrap_err("failed to make GL context current")?;

        // vsync paces the animation; not fatal when unsupported
        let vsync = SwapInterval::Wait(NonZeroU32::MIN);
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, vsync) {
            tracing::warn!("vsync unavailable: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| gl_display.get_proc_address(name))
        };

        Ok(Self { window, gl_context, gl_surface, gl })
    }

    pub fn physical_size(&self) -> (u32, u32) {
        let s = self.window.inner_size();
        (s.width, s.height)
    }

    /// Resizes the GL surface; zero-sized (minimized) windows are ignored.
    pub fn resize_surface(&self, new_size: PhysicalSize<u32>) -> bool {
        let (Some(width), Some(height)) =
            (NonZeroU32::new(new_size.width), NonZeroU32::new(new_size.height))
        else {
            return false;
        };

        self.gl_surface.resize(&self.gl_context, width, height);
        true
    }

    pub fn swap_buffers(&self) -> Result<(), Error> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(Error::present_failed)
    }
}

fn non_zero(value: u32) -> Result<NonZeroU32, Report> {
    NonZeroU32::new(value).ok_or_eyre("window has a zero-sized dimension")
}
