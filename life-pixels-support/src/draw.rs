use crate::assets::Sprites;
use image::RgbaImage;
use life_engine::{Command, Life, Loc, PixelPos};

pub const BACKGROUND_RGBA: [u8; 4] = [0x20, 0x20, 0x20, 0xff];

/// RGBA frame buffer borrowed from the pixels surface.
pub struct Frame<'a> {
    pixels: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(pixels: &'a mut [u8], width: u32) -> Self {
        let height = if width == 0 {
            0
        } else {
            (pixels.len() / 4 / width as usize) as u32
        };
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Blends `image` onto the frame with its top-left corner at `at`,
    /// clipping whatever falls outside.
    pub fn blit(&mut self, image: &RgbaImage, at: PixelPos) {
        for (x, y, pixel) in image.enumerate_pixels() {
            let Some(index) = self.pixel_index(at.x + x as i32, at.y + y as i32) else {
                continue;
            };
            let target = &mut self.pixels[index..index + 4];
            let below = [target[0], target[1], target[2], target[3]];
            target.copy_from_slice(&alpha_blend_with_background(pixel.0, below));
        }
    }

    /// Blits `image` centered within a `width`x`height` box at `at`.
    pub fn blit_centered(&mut self, image: &RgbaImage, at: PixelPos, width: u32, height: u32) {
        let x = at.x + (width as i32 - image.width() as i32) / 2;
        let y = at.y + (height as i32 - image.height() as i32) / 2;
        self.blit(image, PixelPos::new(x, y));
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.pixel_index(x, y).map(|index| {
            let p = &self.pixels[index..index + 4];
            [p[0], p[1], p[2], p[3]]
        })
    }

    fn pixel_index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(4 * (y as usize * self.width as usize + x as usize))
    }
}

/// Renders the board, the highlighted cell and the panel buttons.
pub fn draw(life: &Life, sprites: &Sprites, frame: &mut Frame) {
    frame.fill(BACKGROUND_RGBA);
    draw_grid(life, sprites, frame);
    draw_panel(life, sprites, frame);
}

fn draw_grid(life: &Life, sprites: &Sprites, frame: &mut Frame) {
    let grid = life.grid();
    let size = grid.size();
    let highlighted = life.highlighted();
    for row in 0..size.height {
        for col in 0..size.width {
            let loc = Loc::new(col, row);
            let tile = if highlighted == Some(loc) {
                &sprites.highlighted
            } else if grid.is_alive(loc) {
                &sprites.alive
            } else {
                &sprites.dead
            };
            frame.blit(tile, grid.pixel_origin(loc));
        }
    }
}

fn draw_panel(life: &Life, sprites: &Sprites, frame: &mut Frame) {
    for button in life.panel().buttons() {
        let rect = button.rect;
        let origin = PixelPos::new(rect.x, rect.y);
        frame.blit(&sprites.frame, origin);
        let icon = match button.command {
            Command::TogglePause if life.is_paused() => &sprites.play,
            Command::TogglePause => &sprites.pause,
            Command::Slower => &sprites.slower,
            Command::Faster => &sprites.faster,
        };
        frame.blit_centered(icon, origin, rect.width, rect.height);
    }
}

/// Blends a possibly translucent color over an opaque one.
pub fn alpha_blend_with_background(above: [u8; 4], below: [u8; 4]) -> [u8; 4] {
    match above[3] {
        0xff => above,
        0x00 => below,
        alpha => {
            let alpha = u32::from(alpha);
            let mix = |a: u8, b: u8| {
                ((u32::from(a) * alpha + u32::from(b) * (0xff - alpha) + 0x7f) / 0xff) as u8
            };
            [
                mix(above[0], below[0]),
                mix(above[1], below[1]),
                mix(above[2], below[2]),
                0xff,
            ]
        }
    }
}
