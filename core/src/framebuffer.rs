use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// One row of pixels, leftmost first.
pub type Row = [bool; DISPLAY_WIDTH];

/// # FrameBuffer
/// The display is composed of 64x32 monochrome pixels, indexed as `[y][x]`.
///
/// Pixels only change through `clear` and `draw_sprite_row`, and either of them marks the
/// buffer dirty so that a presentation layer knows to redraw.
#[derive(Copy, Clone)]
pub struct FrameBuffer {
    pixels: [Row; DISPLAY_HEIGHT],
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            dirty: false,
        }
    }

    /// Unlights every pixel.
    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.dirty = true;
    }

    /// XORs one 8 pixel sprite row onto the display with wrapping.
    ///
    /// Both coordinates are wrapped before drawing and each of the 8 columns wraps again
    /// as it is written, so a row that runs off the right edge continues on the left.
    /// Returns true if any lit pixel was turned off.
    ///
    /// # Arguments
    /// * `x` the column of the leftmost pixel
    /// * `y` the row to draw on
    /// * `bits` the sprite row; the most significant bit is the leftmost pixel
    pub fn draw_sprite_row(&mut self, x: usize, y: usize, bits: u8) -> bool {
        let x = x % DISPLAY_WIDTH;
        let row = &mut self.pixels[y % DISPLAY_HEIGHT];
        let mut collision = false;

        for bit in 0..8 {
            if bits & (0x80 >> bit) == 0 {
                continue;
            }
            let pixel = &mut row[(x + bit) % DISPLAY_WIDTH];
            collision |= *pixel;
            *pixel = !*pixel;
        }

        self.dirty = true;
        collision
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.pixels.iter()
    }

    pub fn lit_count(&self) -> usize {
        self.rows().flatten().filter(|&&p| p).count()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the display changed since the last call and resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
