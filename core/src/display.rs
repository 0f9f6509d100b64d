use std::fmt;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

const PIXELS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// # Frame buffer
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// Each pixel is stored as its own byte, 1 for on and 0 for off, in row-major order.
///
/// Sprites are drawn by XOR so drawing the same sprite twice erases it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [u8; PIXELS],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer { pixels: [0; PIXELS] }
    }

    pub fn clear(&mut self) {
        self.pixels = [0; PIXELS];
    }

    /// XORs a sprite onto the buffer with its top left corner at (x, y).
    ///
    /// Positions are computed as `x + col + (y + row) * 64` with no wrapping, so a sprite
    /// hanging off the right edge continues on the next line. Pixels past the end of the
    /// buffer are dropped.
    ///
    /// Returns whether any pixel was switched off.
    ///
    /// # Arguments
    /// * `x` horizontal position of the sprite
    /// * `y` vertical position of the sprite
    /// * `sprite` one byte per row, most significant bit leftmost
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            for col in 0..8 {
                if byte & (0x80 >> col) == 0 {
                    continue;
                }
                let index = x as usize + col + (y as usize + row) * DISPLAY_WIDTH;
                if let Some(pixel) = self.pixels.get_mut(index) {
                    collision |= *pixel == 1;
                    *pixel ^= 1;
                }
            }
        }
        collision
    }

    /// The pixel at (x, y), or 0 when outside of the display
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return 0;
        }
        self.pixels[y * DISPLAY_WIDTH + x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks(DISPLAY_WIDTH)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lit = self.pixels.iter().filter(|&&p| p == 1).count();
        f.debug_struct("FrameBuffer").field("lit", &lit).finish()
    }
}

/// Renders lit pixels as full blocks, one line per row
impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row
                .iter()
                .map(|&p| if p == 1 { '█' } else { ' ' })
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
