/// Addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Highest valid address.
pub const MAX_ADDRESS: u16 = (MEMORY_SIZE - 1) as u16;

/// Programs are loaded here; everything below is reserved for the interpreter.
pub const PROGRAM_START: u16 = 0x200;

/// Largest program image that fits between `PROGRAM_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Maximum depth of nested subroutine calls.
pub const STACK_DEPTH: usize = 16;

pub const REGISTER_COUNT: usize = 16;

/// The carry/borrow/collision flag register.
pub const VF: usize = 0xF;

/// Number of keys on the hexadecimal keypad.
pub const KEY_COUNT: u8 = 16;

/// Default instruction rate in Hz.
pub const CLOCK_SPEED_HZ: u32 = 500;

/// Rate at which the delay and sound timers count down, in Hz.
pub const TIMER_HZ: u32 = 60;

/// Where the font sprites live.
pub const FONT_ADDRESS: u16 = 0x000;

/// Each glyph is 4 pixels wide and 5 rows tall.
pub const FONT_GLYPH_BYTES: u16 = 5;

/// # Font
/// Sprites for the hexadecimal digits 0..F, one byte per row with the leftmost pixel in
/// the most significant bit.
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
