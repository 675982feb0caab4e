#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Desktop host for [`life_engine::Life`]: a winit window, a pixels frame
//! buffer, and an input helper sampled once per frame.

mod assets;
mod draw;
mod input;

pub use assets::{AssetError, AssetKind, Assets, Sprites};
pub use draw::{alpha_blend_with_background, draw, Frame, BACKGROUND_RGBA};
pub use input::{frame_input, key_code};

use error_iter::ErrorIter as _;
use life_engine::{LayoutError, Life, LifeConfig};
use log::{debug, error, info};
use pixels::wgpu::Color;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Cursor, CursorIcon, Window, WindowId};
use winit_input_helper::WinitInputHelper;

const CLEAR_COLOR: Color = Color {
    r: 0.125,
    g: 0.125,
    b: 0.125,
    a: 1.0,
};

#[derive(Clone, Debug)]
pub struct HostConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub frame_interval: Duration,
    pub asset_dir: PathBuf,
    pub life: LifeConfig,
}

#[derive(Debug)]
pub enum StartupError {
    Assets(AssetError),
    EventLoop(EventLoopError),
    Window(OsError),
    Layout(LayoutError),
    Pixels(pixels::Error),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Assets(_) => f.write_str("loading images failed"),
            StartupError::EventLoop(_) => f.write_str("event loop failed"),
            StartupError::Window(_) => f.write_str("creating the window failed"),
            StartupError::Layout(_) => f.write_str("window is too small for the board"),
            StartupError::Pixels(_) => f.write_str("creating the frame buffer failed"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StartupError::Assets(err) => Some(err),
            StartupError::EventLoop(err) => Some(err),
            StartupError::Window(err) => Some(err),
            StartupError::Layout(err) => Some(err),
            StartupError::Pixels(err) => Some(err),
        }
    }
}

impl From<AssetError> for StartupError {
    fn from(err: AssetError) -> Self {
        StartupError::Assets(err)
    }
}

impl From<EventLoopError> for StartupError {
    fn from(err: EventLoopError) -> Self {
        StartupError::EventLoop(err)
    }
}

impl From<OsError> for StartupError {
    fn from(err: OsError) -> Self {
        StartupError::Window(err)
    }
}

impl From<LayoutError> for StartupError {
    fn from(err: LayoutError) -> Self {
        StartupError::Layout(err)
    }
}

impl From<pixels::Error> for StartupError {
    fn from(err: pixels::Error) -> Self {
        StartupError::Pixels(err)
    }
}

/// Logs `err` followed by every error in its source chain.
pub fn log_error<E: Error + 'static>(method_name: &str, err: &E) {
    error!("{method_name}() failed: {err}");
    for source in err.sources().skip(1) {
        error!("  Caused by: {source}");
    }
}

/// Opens the window and runs until it is closed. Startup failures are logged
/// before being returned.
pub fn run(config: HostConfig) -> Result<(), StartupError> {
    let result = run_event_loop(config);
    if let Err(err) = &result {
        log_error("run", err);
    }
    result
}

fn run_event_loop(config: HostConfig) -> Result<(), StartupError> {
    let assets = Assets::load(&config.asset_dir)?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut handler = AppEventHandler::new(config, assets);
    event_loop.run_app(&mut handler)?;
    handler.startup_error.map_or(Ok(()), Err)
}

struct App {
    life: Life,
    sprites: Sprites,
    window: Arc<Window>,
    pixels: Pixels<'static>,
    frame_width: u32,
    title: String,
    status: String,
}

impl App {
    fn new(event_loop: &ActiveEventLoop, config: &HostConfig, assets: &Assets) -> Result<Self, StartupError> {
        let window = Arc::new(Self::build_window(event_loop, config)?);
        let size = window.inner_size();
        let life = Life::new(size.width, size.height, config.life)?;
        let sprites = Sprites::prepare(
            assets,
            config.life.cell_size,
            config.life.button_width,
            life.panel().area().height,
        );
        let pixels = Self::build_pixels(&window, size)?;
        Ok(Self {
            life,
            sprites,
            window,
            pixels,
            frame_width: size.width,
            title: config.title.clone(),
            status: String::new(),
        })
    }

    fn build_window(event_loop: &ActiveEventLoop, config: &HostConfig) -> Result<Window, OsError> {
        let window_attributes = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(false)
            .with_cursor(Cursor::Icon(CursorIcon::Crosshair))
            .with_visible(false);
        event_loop.create_window(window_attributes)
    }

    fn build_pixels(window: &Arc<Window>, size: PhysicalSize<u32>) -> Result<Pixels<'static>, pixels::Error> {
        let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
        PixelsBuilder::new(size.width, size.height, surface_texture)
            .clear_color(CLEAR_COLOR)
            .build()
    }

    fn on_create(&mut self) {
        self.update_title();
        self.window.request_redraw();
        self.window.set_visible(true);
    }

    fn on_frame(&mut self, input: &WinitInputHelper, now: Instant) {
        let frame_input = frame_input(input, &self.pixels);
        if self.life.on_frame(&frame_input, now) {
            debug!("Generation {}", self.life.grid().generation());
        }
        self.update_title();
        self.window.request_redraw();
    }

    /// The next frame, or the next generation if that comes sooner.
    fn next_wakeup(&self, now: Instant, frame_interval: Duration) -> Instant {
        let wait = match self.life.scheduler().time_until_tick(now) {
            Some(until_tick) => until_tick.min(frame_interval),
            None => frame_interval,
        };
        now + wait
    }

    fn update_title(&mut self) {
        let status = self.life.status_line();
        if status != self.status {
            self.window.set_title(&format!("{} - {status}", self.title));
            self.status = status;
        }
    }

    fn on_redraw(&mut self) -> Result<(), pixels::Error> {
        let mut frame = Frame::new(self.pixels.frame_mut(), self.frame_width);
        draw(&self.life, &self.sprites, &mut frame);
        self.pixels.render()
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        if let Err(err) = self.pixels.resize_surface(size.width, size.height) {
            log_error("resize_surface", &err);
        }
    }
}

struct AppEventHandler {
    config: HostConfig,
    assets: Assets,
    input: WinitInputHelper,
    app: Option<App>,
    startup_error: Option<StartupError>,
}

impl AppEventHandler {
    fn new(config: HostConfig, assets: Assets) -> Self {
        Self {
            config,
            assets,
            input: WinitInputHelper::new(),
            app: None,
            startup_error: None,
        }
    }
}

impl ApplicationHandler for AppEventHandler {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        self.input.step();
        if let StartCause::Init = cause {
            info!("Starting {}", self.config.title);
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        match App::new(event_loop, &self.config, &self.assets) {
            Ok(mut app) => {
                app.on_create();
                self.app = Some(app);
            }
            Err(err) => {
                self.startup_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_window_event(&event);
        let Some(app) = self.app.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.on_resize(size);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = app.on_redraw() {
                    log_error("render", &err);
                    event_loop.exit();
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.input.end_step();
        let Some(app) = self.app.as_mut() else {
            return;
        };
        if self.input.key_released(KeyCode::Escape) {
            event_loop.exit();
            return;
        }
        let now = Instant::now();
        app.on_frame(&self.input, now);
        let wakeup_time = app.next_wakeup(now, self.config.frame_interval);
        event_loop.set_control_flow(ControlFlow::WaitUntil(wakeup_time));
    }
}
