use life_grid::PixelPos;
use std::fmt;

/// A control the user can trigger, from the keyboard or the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Slower,
    Faster,
}

impl Command {
    pub fn label(self) -> &'static str {
        match self {
            Command::TogglePause => "PLAY",
            Command::Slower => "SLOWER",
            Command::Faster => "FASTER",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Axis-aligned pixel rectangle. Contains its top/left edges but not its
/// bottom/right ones, so rectangles placed side by side never overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, pos: PixelPos) -> bool {
        let (x, y) = (i64::from(pos.x), i64::from(pos.y));
        let (left, top) = (i64::from(self.x), i64::from(self.y));
        x >= left
            && y >= top
            && x < left + i64::from(self.width)
            && y < top + i64::from(self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelButton {
    pub command: Command,
    pub rect: PixelRect,
}

/// The strip of controls below the grid.
#[derive(Clone, Debug)]
pub struct Panel {
    area: PixelRect,
    status_area: PixelRect,
    buttons: Vec<PanelButton>,
}

impl Panel {
    /// Lays out the panel under the grid. `top` is the first pixel row below
    /// the last row of cells and `height` everything from there to the bottom
    /// of the window. Buttons are one `button_width` wide: play/pause, slower,
    /// two widths of status area, then faster.
    pub fn layout(width: u32, top: u32, height: u32, button_width: u32) -> Self {
        let top = top as i32;
        let column = |index: u32| (index * button_width) as i32;
        let button = |command, index| PanelButton {
            command,
            rect: PixelRect::new(column(index), top, button_width, height),
        };
        Self {
            area: PixelRect::new(0, top, width, height),
            status_area: PixelRect::new(column(2), top, 2 * button_width, height),
            buttons: vec![
                button(Command::TogglePause, 0),
                button(Command::Slower, 1),
                button(Command::Faster, 4),
            ],
        }
    }

    pub fn area(&self) -> PixelRect {
        self.area
    }

    pub fn status_area(&self) -> PixelRect {
        self.status_area
    }

    /// Buttons in declaration order.
    pub fn buttons(&self) -> &[PanelButton] {
        &self.buttons
    }

    /// The first button, in declaration order, that contains `pos`.
    pub fn hit(&self, pos: PixelPos) -> Option<&PanelButton> {
        self.buttons.iter().find(|button| button.rect.contains(pos))
    }

    #[cfg(test)]
    pub(crate) fn with_buttons(area: PixelRect, buttons: Vec<PanelButton>) -> Self {
        Self {
            area,
            status_area: area,
            buttons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_half_open() {
        let rect = PixelRect::new(10, 20, 5, 5);
        assert!(rect.contains(PixelPos::new(10, 20)));
        assert!(rect.contains(PixelPos::new(14, 24)));
        assert!(!rect.contains(PixelPos::new(15, 24)));
        assert!(!rect.contains(PixelPos::new(14, 25)));
        assert!(!rect.contains(PixelPos::new(9, 22)));
    }

    #[test]
    fn layout_places_buttons_below_grid() {
        let panel = Panel::layout(640, 400, 80, 64);
        let rects: Vec<_> = panel
            .buttons()
            .iter()
            .map(|button| (button.command, button.rect.x))
            .collect();
        assert_eq!(
            rects,
            vec![
                (Command::TogglePause, 0),
                (Command::Slower, 64),
                (Command::Faster, 256)
            ]
        );
        assert!(panel.buttons().iter().all(|b| b.rect.y == 400 && b.rect.height == 80));
        assert_eq!(panel.status_area(), PixelRect::new(128, 400, 128, 80));
        assert_eq!(panel.area(), PixelRect::new(0, 400, 640, 80));
    }

    #[test]
    fn adjacent_buttons_do_not_share_edge() {
        let panel = Panel::layout(640, 400, 80, 64);
        let hit = panel.hit(PixelPos::new(64, 410)).map(|b| b.command);
        assert_eq!(hit, Some(Command::Slower));
        let hit = panel.hit(PixelPos::new(63, 410)).map(|b| b.command);
        assert_eq!(hit, Some(Command::TogglePause));
    }

    #[test]
    fn misses_outside_buttons() {
        let panel = Panel::layout(640, 400, 80, 64);
        assert!(panel.hit(PixelPos::new(150, 410)).is_none());
        assert!(panel.hit(PixelPos::new(10, 399)).is_none());
        assert!(panel.hit(PixelPos::new(10, 480)).is_none());
    }

    #[test]
    fn overlapping_buttons_resolve_in_declaration_order() {
        let area = PixelRect::new(0, 0, 100, 100);
        let panel = Panel::with_buttons(
            area,
            vec![
                PanelButton {
                    command: Command::Faster,
                    rect: PixelRect::new(0, 0, 50, 50),
                },
                PanelButton {
                    command: Command::Slower,
                    rect: PixelRect::new(25, 25, 50, 50),
                },
            ],
        );
        let hit = panel.hit(PixelPos::new(30, 30)).map(|b| b.command);
        assert_eq!(hit, Some(Command::Faster));
        let hit = panel.hit(PixelPos::new(60, 60)).map(|b| b.command);
        assert_eq!(hit, Some(Command::Slower));
    }
}
