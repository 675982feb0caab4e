#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Interactive Game of Life engine: the grid, a tick scheduler, and the
//! controller that turns per-frame input into edits and commands.
//!
//! A host calls [`Life::on_frame`] once per rendered frame and then reads the
//! query methods to draw. Everything runs synchronously inside that call.

mod controller;
mod panel;
mod scheduler;

pub use controller::{Commands, Controller, FrameInput, KeysHeld, MAX_COMMANDS, TrackedKey};
pub use life_grid::{Cell, GridSize, IndexOutOfRange, LifeGrid, Loc, PixelPos};
pub use panel::{Command, Panel, PanelButton, PixelRect};
pub use scheduler::{PeriodBounds, TickScheduler};

use log::{info, trace, warn};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

/// Blinker and glider placed on every new board.
const STARTING_PATTERN: [(u32, u32); 8] = [
    (10, 10),
    (11, 10),
    (12, 10),
    (2, 2),
    (4, 2),
    (3, 3),
    (4, 3),
    (3, 4),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifeConfig {
    /// Edge length of a square cell, in pixels.
    pub cell_size: u32,
    /// Pixel rows reserved for the control panel; the grid's leftover rows
    /// are added to it.
    pub panel_height: u32,
    pub button_width: u32,
    pub default_period: Duration,
    pub period_bounds: PeriodBounds,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            cell_size: 20,
            panel_height: 60,
            button_width: 64,
            default_period: Duration::from_millis(500),
            period_bounds: PeriodBounds::default(),
        }
    }
}

/// The drawing area cannot hold the panel and at least one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutError {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub config: LifeConfig,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a {}x{} pixel area cannot fit a {} pixel panel and {}x{} pixel cells",
            self.pixel_width,
            self.pixel_height,
            self.config.panel_height,
            self.config.cell_size,
            self.config.cell_size
        )
    }
}

impl Error for LayoutError {}

/// One simulation instance: grid, scheduler, controller and panel.
#[derive(Clone, Debug)]
pub struct Life {
    grid: LifeGrid,
    scheduler: TickScheduler,
    controller: Controller,
    panel: Panel,
}

impl Life {
    /// Sizes the grid to the area above the panel, lays out the panel, and
    /// seeds the starting pattern. The simulation starts paused.
    pub fn new(pixel_width: u32, pixel_height: u32, config: LifeConfig) -> Result<Self, LayoutError> {
        let layout_error = LayoutError {
            pixel_width,
            pixel_height,
            config,
        };
        if config.cell_size == 0 {
            return Err(layout_error);
        }
        let grid_height = pixel_height
            .checked_sub(config.panel_height)
            .ok_or(layout_error)?;
        let (size, _) = GridSize::fit(pixel_width, grid_height, config.cell_size);
        if size.is_empty() {
            return Err(layout_error);
        }

        let (mut grid, remainder) = LifeGrid::initialize(pixel_width, grid_height, config.cell_size);
        let panel = Panel::layout(
            pixel_width,
            grid.pixel_height(),
            config.panel_height + remainder,
            config.button_width,
        );
        Self::seed(&mut grid);
        info!(
            "{}x{} grid of {} pixel cells, {} pixel panel",
            size.width,
            size.height,
            config.cell_size,
            config.panel_height + remainder
        );

        Ok(Self {
            grid,
            scheduler: TickScheduler::new(config.default_period, config.period_bounds),
            controller: Controller::new(),
            panel,
        })
    }

    fn seed(grid: &mut LifeGrid) {
        for (col, row) in STARTING_PATTERN {
            if let Err(err) = grid.set_alive(Loc::new(col, row), true) {
                warn!("Skipping starting cell: {err}");
            }
        }
    }

    /// Runs one frame: input, then commands, then at most one generation.
    /// Returns whether a generation was computed.
    pub fn on_frame(&mut self, input: &FrameInput, now: Instant) -> bool {
        let commands = self
            .controller
            .process(input, &mut self.grid, &self.panel);
        for command in commands {
            self.apply(command, now);
        }

        if self.scheduler.poll(now) {
            self.grid.advance();
            trace!(
                "Generation {}: {} alive",
                self.grid.generation(),
                self.grid.live_count()
            );
            true
        } else {
            false
        }
    }

    pub fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::TogglePause => self.scheduler.toggle_pause(now),
            Command::Slower => {
                self.scheduler.slower();
            }
            Command::Faster => {
                self.scheduler.faster();
            }
        }
    }

    pub fn grid(&self) -> &LifeGrid {
        &self.grid
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn highlighted(&self) -> Option<Loc> {
        self.controller.highlighted()
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    pub fn period(&self) -> Duration {
        self.scheduler.period()
    }

    pub fn pending_period(&self) -> Duration {
        self.scheduler.pending_period()
    }

    /// One-line summary for on-screen status text.
    pub fn status_line(&self) -> String {
        let state = if self.is_paused() { "paused" } else { "running" };
        let mut line = format!(
            "Generation {} | {} alive | {} | {} ms",
            self.grid.generation(),
            self.grid.live_count(),
            state,
            self.period().as_millis()
        );
        if self.pending_period() != self.period() {
            line.push_str(&format!(" -> {} ms", self.pending_period().as_millis()));
        }
        line
    }
}
