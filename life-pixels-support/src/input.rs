use life_engine::{FrameInput, KeysHeld, PixelPos, TrackedKey};
use pixels::Pixels;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;
use winit_input_helper::WinitInputHelper;

pub fn key_code(key: TrackedKey) -> KeyCode {
    match key {
        TrackedKey::Space => KeyCode::Space,
        TrackedKey::Left => KeyCode::ArrowLeft,
        TrackedKey::Right => KeyCode::ArrowRight,
    }
}

/// Samples the input helper after `end_step`. A key or button released
/// during this step still reads as held, so the engine sees the release on
/// the following frame even for a tap shorter than one step.
pub fn frame_input(input: &WinitInputHelper, pixels: &Pixels) -> FrameInput {
    let mut keys = KeysHeld::default();
    for key in TrackedKey::ALL {
        let code = key_code(key);
        keys.set(key, input.key_held(code) || input.key_released(code));
    }
    FrameInput {
        pointer: input
            .cursor()
            .map(|position| window_to_frame(pixels, position)),
        primary_held: input.mouse_held(MouseButton::Left)
            || input.mouse_released(MouseButton::Left),
        keys,
    }
}

/// Maps a window position to frame pixels. Positions outside the frame keep
/// their out-of-range coordinates so the grid can clamp them.
fn window_to_frame(pixels: &Pixels, position: (f32, f32)) -> PixelPos {
    let (x, y) = match pixels.window_pos_to_pixel(position) {
        Ok((x, y)) => (x as isize, y as isize),
        Err(outside) => outside,
    };
    PixelPos::new(saturate(x), saturate(y))
}

fn saturate(value: isize) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
