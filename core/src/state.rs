use crate::constants::{PROGRAM_START, REGISTER_COUNT, VF};
use crate::framebuffer::FrameBuffer;
use crate::memory::Memory;
use crate::stack::Stack;

/// All of the machine's state in one owned aggregate.
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - all 16 are general purpose
///     - VF doubles as the carry/borrow/collision flag and is always written last
/// - (i) a 16-bit memory address register; not bounds checked until it is used
///
/// Counter
/// - (pc) a 16-bit program counter pointing at the next instruction to fetch
///
/// Timers
/// - 2 8-bit timers (delay & sound) that count down to zero at 60Hz
/// - a tone should sound while the sound timer is above zero
///
/// ## Memory
/// - 16 entry call stack of return addresses
/// - 4096 bytes of addressable memory
/// - 64x32 frame buffer
#[derive(Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: Stack,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            delay_timer: 0,
            sound_timer: 0,
            stack: Stack::new(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
        }
    }

    pub fn vx(&self, x: u8) -> u8 {
        self.v[x as usize]
    }

    pub fn set_vx(&mut self, x: u8, value: u8) {
        self.v[x as usize] = value;
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.v[VF] = u8::from(flag);
    }

    /// Skips over the next instruction.
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
