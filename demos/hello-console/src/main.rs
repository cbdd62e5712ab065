//! Bitmap-font console demo.
//!
//! Writes "Hello World !" into the text grid, adds the font atlas (or the
//! `--sprite` image) as a 256x256 sprite, then animates both: the text scrolls
//! down one row per frame and the sprite slides right, wrapping at the edges.
//!
//! Run with:
//! ```sh
//! cargo run -p hello-console -- --font path/to/font.png
//! ```

mod cli;
mod logging;
mod window;

use std::fs;

use cellcon_core::{
    CellPos, Color, Console, ConsoleConfig, Error, GlRenderer, GlState, GlslVersion, PixelImage,
    RenderContext, SpriteId, TextureLoader,
};
use clap::Parser;
use color_eyre::{
    Report,
    eyre::{Context, Result},
};
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowId,
};

use crate::{
    cli::Cli,
    logging::{LoggingConfig, init_logging},
    window::GlWindow,
};

const GREETING: &str = "Hello World !";
const GREETING_AT: CellPos = CellPos { row: 20, col: 20 };
const SPRITE_SIZE: i32 = 256;
const SPRITE_Y: i32 = 100;

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    init_logging(&LoggingConfig::from_env()).wrap_err("Failed to initialize logging")?;

    let cli = Cli::parse();
    cli.validate()?;

    let font = load_png(&cli.font)?;
    let sprite = cli.sprite.as_deref().map(load_png).transpose()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        font = %cli.font.display(),
        "hello-console starting up"
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, font, sprite);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn load_png(path: &std::path::Path) -> Result<PixelImage> {
    let bytes = fs::read(path).wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    PixelImage::from_png(&bytes).wrap_err_with(|| format!("Failed to decode {}", path.display()))
}

struct App {
    cli: Cli,
    font: PixelImage,
    sprite: Option<PixelImage>,
    state: Option<AppState>,
    /// First fatal error; the event loop exits once it is set
    error: Option<Report>,
}

struct AppState {
    win: GlWindow,
    gl_state: GlState,
    renderer: GlRenderer,
    console: Console,
    sprite: SpriteId,
    text_row: i32,
}

impl App {
    fn new(cli: Cli, font: PixelImage, sprite: Option<PixelImage>) -> Self {
        Self { cli, font, sprite, state: None, error: None }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Report) {
        error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> Result<AppState> {
        let win = GlWindow::new(event_loop, "cellcon - hello console", self.cli.window_size())?;
        let gl_state = GlState::new();
        let mut renderer = GlRenderer::new(&win.gl, &GlslVersion::Gl330)?;

        let config = ConsoleConfig::default()
            .with_cell_size(self.cli.cell_width, self.cli.cell_height)
            .with_clear_color(Color::BLACK);

        let mut loader = renderer.loader(&win.gl);
        let mut console = Console::load(config, &mut loader, &self.font, win.physical_size())?;
        let sprite_texture = match &self.sprite {
            Some(image) => loader.load_texture(image)?.handle,
            None => console.atlas().texture(),
        };

        console.write(GREETING_AT.row, GREETING_AT.col, GREETING);
        let sprite = console.add_sprite(sprite_texture, SPRITE_SIZE, SPRITE_SIZE, 0, SPRITE_Y);

        let grid = console.grid();
        info!(cols = grid.cols, rows = grid.rows, "console ready");

        Ok(AppState {
            win,
            gl_state,
            renderer,
            console,
            sprite,
            text_row: GREETING_AT.row,
        })
    }
}

impl AppState {
    /// Advances the animation by one frame.
    fn step(&mut self) {
        let rows = self.console.grid().rows.max(1);
        let next = (self.text_row + 1) % rows;
        let from = (self.text_row, GREETING_AT.col);
        if self.console.move_text(from, (next, GREETING_AT.col)) {
            self.text_row = next;
        }

        let (width, _) = self.win.physical_size();
        if let Some(sprite) = self.console.sprite_mut(self.sprite) {
            let (x, y) = sprite.position();
            sprite.set_position((x + 1) % width.max(1) as i32, y);
        }
    }

    fn render(&mut self) -> Result<(), Error> {
        let Self { win, gl_state, renderer, console, .. } = self;

        let mut swap = || win.swap_buffers();
        let ctx = RenderContext { gl: &win.gl, state: gl_state };
        let mut backend = renderer.backend(ctx, &mut swap);

        console.render_frame(&mut backend)?;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.init(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let result = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            },
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed()
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                event_loop.exit();
                Ok(())
            },
            WindowEvent::Resized(new_size) => {
                if state.win.resize_surface(new_size) {
                    state.win.window.request_redraw();
                    state.console.on_resize(new_size.width, new_size.height)
                } else {
                    Ok(())
                }
            },
            WindowEvent::RedrawRequested => {
                let result = state.render();
                state.step();
                result
            },
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.fail(event_loop, e.into());
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_ref() {
            state.win.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            state.renderer.delete(&state.win.gl);
        }
    }
}
