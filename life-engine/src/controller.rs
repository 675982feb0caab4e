use crate::panel::{Command, Panel};
use arrayvec::ArrayVec;
use life_grid::{LifeGrid, Loc, PixelPos};
use log::debug;
use std::mem;

/// Keys the controller watches. Each one triggers its command when released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackedKey {
    Space,
    Left,
    Right,
}

impl TrackedKey {
    pub const ALL: [TrackedKey; 3] = [TrackedKey::Space, TrackedKey::Left, TrackedKey::Right];

    pub fn command(self) -> Command {
        match self {
            TrackedKey::Space => Command::TogglePause,
            TrackedKey::Left => Command::Slower,
            TrackedKey::Right => Command::Faster,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Held/not-held flag for every tracked key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeysHeld {
    held: [bool; TrackedKey::ALL.len()],
}

impl KeysHeld {
    pub fn is_held(&self, key: TrackedKey) -> bool {
        self.held[key.index()]
    }

    pub fn set(&mut self, key: TrackedKey, held: bool) {
        self.held[key.index()] = held;
    }

    pub fn with(mut self, key: TrackedKey) -> Self {
        self.set(key, true);
        self
    }
}

/// Input state sampled by the host once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Pointer position in window pixels, `None` when the host lost track of
    /// it (e.g. the cursor left the window).
    pub pointer: Option<PixelPos>,
    pub primary_held: bool,
    pub keys: KeysHeld,
}

/// Upper bound on commands from one frame: every key released plus one
/// panel button.
pub const MAX_COMMANDS: usize = TrackedKey::ALL.len() + 1;

pub type Commands = ArrayVec<Command, MAX_COMMANDS>;

#[derive(Clone, Debug, Default)]
struct PointerState {
    pixel: Option<PixelPos>,
    hovered: Option<Loc>,
    last_painted: Option<Loc>,
    painted_this_press: bool,
    button_down: bool,
}

/// Turns per-frame input snapshots into cell edits and control commands.
///
/// Actions are edge-triggered: keys fire on release, a press-and-release on
/// one cell toggles it once, and a held drag turns dead cells alive without
/// revisiting cells it already painted.
#[derive(Clone, Debug, Default)]
pub struct Controller {
    keys: KeysHeld,
    pointer: PointerState,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell under the pointer, if the pointer is over the grid.
    pub fn highlighted(&self) -> Option<Loc> {
        self.pointer.hovered
    }

    /// Applies cell edits to `grid` and returns the commands triggered this
    /// frame, keys first.
    pub fn process(&mut self, input: &FrameInput, grid: &mut LifeGrid, panel: &Panel) -> Commands {
        let mut commands = Commands::new();
        self.process_keys(input.keys, &mut commands);
        self.process_pointer(input, grid, panel, &mut commands);
        commands
    }

    fn process_keys(&mut self, keys: KeysHeld, commands: &mut Commands) {
        for key in TrackedKey::ALL {
            if self.keys.is_held(key) && !keys.is_held(key) {
                debug!("{key:?} released");
                commands.push(key.command());
            }
        }
        self.keys = keys;
    }

    fn process_pointer(
        &mut self,
        input: &FrameInput,
        grid: &mut LifeGrid,
        panel: &Panel,
        commands: &mut Commands,
    ) {
        if input.pointer.is_some() {
            self.pointer.pixel = input.pointer;
        }
        let was_down = mem::replace(&mut self.pointer.button_down, input.primary_held);
        let Some(pixel) = self.pointer.pixel else {
            return;
        };

        let loc = grid.resolve_coordinate(pixel);
        self.pointer.hovered = grid.covers_pixel(pixel).then_some(loc);
        let button = panel.hit(pixel).map(|button| button.command);

        if input.primary_held {
            if button.is_none() {
                self.drag_paint(loc, grid);
            }
        } else if was_down {
            self.release(loc, button, grid, commands);
        }
    }

    fn drag_paint(&mut self, loc: Loc, grid: &mut LifeGrid) {
        if self.pointer.last_painted != Some(loc) && !grid.is_alive(loc) {
            grid.toggle(loc);
            self.pointer.last_painted = Some(loc);
            self.pointer.painted_this_press = true;
        }
    }

    fn release(
        &mut self,
        loc: Loc,
        button: Option<Command>,
        grid: &mut LifeGrid,
        commands: &mut Commands,
    ) {
        match button {
            Some(command) => {
                debug!("{command} button released");
                commands.push(command);
            }
            None if !self.pointer.painted_this_press => grid.toggle(loc),
            None => (),
        }
        self.pointer.last_painted = None;
        self.pointer.painted_this_press = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{PanelButton, PixelRect};
    use life_grid::GridSize;

    const CELL: i32 = 20;

    fn setup() -> (Controller, LifeGrid, Panel) {
        let grid = LifeGrid::new(GridSize::new(8, 4), CELL as u32);
        let panel = Panel::layout(160, 80, 40, 32);
        (Controller::new(), grid, panel)
    }

    fn at_cell(col: i32, row: i32) -> Option<PixelPos> {
        Some(PixelPos::new(col * CELL + CELL / 2, row * CELL + CELL / 2))
    }

    fn pointer(pointer: Option<PixelPos>, primary_held: bool) -> FrameInput {
        FrameInput {
            pointer,
            primary_held,
            keys: KeysHeld::default(),
        }
    }

    fn keys(keys: KeysHeld) -> FrameInput {
        FrameInput {
            keys,
            ..FrameInput::default()
        }
    }

    #[test]
    fn key_fires_once_on_release() {
        let (mut controller, mut grid, panel) = setup();
        let space = KeysHeld::default().with(TrackedKey::Space);
        for _ in 0..5 {
            let commands = controller.process(&keys(space), &mut grid, &panel);
            assert!(commands.is_empty());
        }
        let commands = controller.process(&keys(KeysHeld::default()), &mut grid, &panel);
        assert_eq!(commands.as_slice(), &[Command::TogglePause]);
        let commands = controller.process(&keys(KeysHeld::default()), &mut grid, &panel);
        assert!(commands.is_empty());
    }

    #[test]
    fn arrow_keys_map_to_speed() {
        let (mut controller, mut grid, panel) = setup();
        let both = KeysHeld::default()
            .with(TrackedKey::Left)
            .with(TrackedKey::Right);
        controller.process(&keys(both), &mut grid, &panel);
        let commands = controller.process(&keys(KeysHeld::default()), &mut grid, &panel);
        assert_eq!(commands.as_slice(), &[Command::Slower, Command::Faster]);
    }

    #[test]
    fn click_toggles_one_cell_once() {
        let (mut controller, mut grid, panel) = setup();
        controller.process(&pointer(at_cell(3, 2), false), &mut grid, &panel);
        controller.process(&pointer(at_cell(3, 2), true), &mut grid, &panel);
        controller.process(&pointer(at_cell(3, 2), true), &mut grid, &panel);
        controller.process(&pointer(at_cell(3, 2), false), &mut grid, &panel);
        assert!(grid.is_alive(Loc::new(3, 2)));
        assert_eq!(grid.live_count(), 1);
    }

    #[test]
    fn click_on_live_cell_kills_it() {
        let (mut controller, mut grid, panel) = setup();
        grid.set_alive(Loc::new(1, 1), true).unwrap();
        controller.process(&pointer(at_cell(1, 1), true), &mut grid, &panel);
        assert!(grid.is_alive(Loc::new(1, 1)));
        controller.process(&pointer(at_cell(1, 1), false), &mut grid, &panel);
        assert!(!grid.is_alive(Loc::new(1, 1)));
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn drag_paints_each_dead_cell_once() {
        let (mut controller, mut grid, panel) = setup();
        let path = [(0, 0), (0, 0), (1, 0), (1, 0), (2, 0), (1, 0), (2, 0)];
        for (col, row) in path {
            controller.process(&pointer(at_cell(col, row), true), &mut grid, &panel);
        }
        controller.process(&pointer(at_cell(2, 0), false), &mut grid, &panel);
        for col in 0..3 {
            assert!(grid.is_alive(Loc::new(col, 0)), "cell {col} not painted");
        }
        assert_eq!(grid.live_count(), 3);
    }

    #[test]
    fn drag_leaves_live_cells_alone() {
        let (mut controller, mut grid, panel) = setup();
        grid.set_alive(Loc::new(1, 0), true).unwrap();
        for col in 0..3 {
            controller.process(&pointer(at_cell(col, 0), true), &mut grid, &panel);
        }
        controller.process(&pointer(at_cell(2, 0), false), &mut grid, &panel);
        assert_eq!(grid.live_count(), 3);
    }

    #[test]
    fn drag_off_grid_paints_edge_cell() {
        let (mut controller, mut grid, panel) = setup();
        controller.process(&pointer(Some(PixelPos::new(-50, 30)), true), &mut grid, &panel);
        assert!(grid.is_alive(Loc::new(0, 1)));
        assert_eq!(controller.highlighted(), None);
    }

    #[test]
    fn panel_release_emits_command_without_toggling() {
        let (mut controller, mut grid, panel) = setup();
        let faster = Some(PixelPos::new(4 * 32 + 5, 90));
        controller.process(&pointer(faster, true), &mut grid, &panel);
        let commands = controller.process(&pointer(faster, false), &mut grid, &panel);
        assert_eq!(commands.as_slice(), &[Command::Faster]);
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn press_over_status_area_paints_clamped_cell() {
        let (mut controller, mut grid, panel) = setup();
        let status = Some(PixelPos::new(2 * 32 + 5, 90));
        controller.process(&pointer(status, true), &mut grid, &panel);
        let commands = controller.process(&pointer(status, false), &mut grid, &panel);
        assert!(commands.is_empty());
        // Not a button, so the press paints the bottom-row cell above it.
        assert!(grid.is_alive(Loc::new(3, 3)));
        assert_eq!(grid.live_count(), 1);
    }

    #[test]
    fn first_declared_button_wins() {
        let mut grid = LifeGrid::new(GridSize::new(4, 4), CELL as u32);
        let rect = PixelRect::new(0, 80, 40, 20);
        let panel = Panel::with_buttons(
            PixelRect::new(0, 80, 80, 20),
            vec![
                PanelButton {
                    command: Command::Slower,
                    rect,
                },
                PanelButton {
                    command: Command::Faster,
                    rect,
                },
            ],
        );
        let mut controller = Controller::new();
        let pos = Some(PixelPos::new(10, 85));
        controller.process(&pointer(pos, true), &mut grid, &panel);
        let commands = controller.process(&pointer(pos, false), &mut grid, &panel);
        assert_eq!(commands.as_slice(), &[Command::Slower]);
    }

    #[test]
    fn highlight_follows_pointer_and_survives_lost_cursor() {
        let (mut controller, mut grid, panel) = setup();
        assert_eq!(controller.highlighted(), None);
        controller.process(&pointer(at_cell(5, 1), false), &mut grid, &panel);
        assert_eq!(controller.highlighted(), Some(Loc::new(5, 1)));
        controller.process(&pointer(None, false), &mut grid, &panel);
        assert_eq!(controller.highlighted(), Some(Loc::new(5, 1)));
        controller.process(&pointer(Some(PixelPos::new(10, 95)), false), &mut grid, &panel);
        assert_eq!(controller.highlighted(), None);
    }

    #[test]
    fn no_pointer_yet_means_no_edits() {
        let (mut controller, mut grid, panel) = setup();
        controller.process(&pointer(None, true), &mut grid, &panel);
        controller.process(&pointer(None, false), &mut grid, &panel);
        assert_eq!(grid.live_count(), 0);
    }
}
