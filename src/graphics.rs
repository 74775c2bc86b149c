//! A wrapper around the 64x32 monochrome screen. It keeps the on/off state of every pixel
//! alongside an RGB buffer mirroring it, ready to be handed to whatever renders the screen.
pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// bytes per pixel in the RGB buffer
pub const BYTES_PER_PIXEL: usize = 3;

/// "On" pixels are amber
pub const ON_COLOR: [u8; 3] = [0xFF, 0xBB, 0x00];
/// "Off" pixels are black
pub const OFF_COLOR: [u8; 3] = [0x00, 0x00, 0x00];

pub struct Graphics {
    buffer: Box<[bool]>,
    rgb: Box<[u8]>,
}

impl Graphics {
    pub fn new() -> Self {
        Graphics {
            buffer: vec![false; WIDTH * HEIGHT].into_boxed_slice(),
            rgb: vec![0; WIDTH * HEIGHT * BYTES_PER_PIXEL].into_boxed_slice(),
        }
    }

    /// Given x and y coordinate for a pixel, return the corresponding index of that pixel in
    /// the buffer. Coordinates wrap around the edges of the screen, they never clip.
    pub fn get_graphics_idx(x: usize, y: usize) -> usize {
        let column = x % WIDTH;
        let row = (y % HEIGHT) * WIDTH;

        column + row
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        for pixel in self.buffer.iter_mut() {
            *pixel = false;
        }
        for byte in self.rgb.iter_mut() {
            *byte = 0;
        }
    }

    /// Flip the pixel at (x, y) and update its color. Returns true if the pixel was on before
    /// the flip, which is what a sprite draw counts as a collision.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let idx = Self::get_graphics_idx(x, y);
        let was_on = self.buffer[idx];
        self.buffer[idx] = !was_on;

        let color = if was_on { OFF_COLOR } else { ON_COLOR };
        let start = idx * BYTES_PER_PIXEL;
        self.rgb[start..start + BYTES_PER_PIXEL].copy_from_slice(&color);

        was_on
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.buffer[Self::get_graphics_idx(x, y)]
    }

    /// The screen as rows of RGB triples, top row first
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }
}

impl Default for Graphics {
    fn default() -> Self {
        Self::new()
    }
}
