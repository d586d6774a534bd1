use std::io::Read;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::framebuffer::FrameBuffer;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations::{Context, Flow};
use crate::state::State;

/// What a single `step` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Executed(Instruction),
    /// Waiting for a key press; the same instruction runs again next step.
    AwaitingKey,
    /// The opcode isn't in the instruction table and was skipped.
    Unrecognized(Opcode),
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `config` it was built with, quirks included
///  - a random number generator for `CXNN`
///
/// Supplies interfaces for:
/// - loading roms
/// - advancing the CPU one instruction at a time
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
/// - whether a tone should be playing
pub struct Chip8 {
    state: State,
    config: Config,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!("new machine with {:?}", config.quirks);
        Chip8 {
            state: State::new(),
            config,
            rng,
        }
    }

    /// Copies a program image into memory at 0x200.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.state.memory.load_program(program)?;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<usize> {
        let size = self.state.memory.load_rom(reader)?;
        debug!("loaded {} byte rom", size);
        Ok(size)
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at the pc and moves the pc past it
    /// - decodes and executes it
    ///
    /// Unrecognized opcodes are skipped unless the config is strict.
    /// Any other error leaves the machine in a state that shouldn't be run further.
    pub fn step(&mut self, keypad: &dyn Keypad) -> Result<Step> {
        let pc = self.state.pc;
        let op = self.state.memory.read_instruction(pc)?;
        self.state.pc = pc.wrapping_add(2);
        trace!(
            "{:03X}: {} v{:02X?} i{:04X}",
            pc,
            op,
            self.state.v,
            self.state.i
        );

        let instruction = match Instruction::decode(op) {
            Ok(instruction) => instruction,
            Err(err) => return self.skip_unrecognized(pc, err),
        };

        let mut ctx = Context {
            quirks: self.config.quirks,
            keypad,
            rng: &mut self.rng,
        };
        match instruction.execute(&mut self.state, &mut ctx) {
            Ok(Flow::Next) => Ok(Step::Executed(instruction)),
            Ok(Flow::AwaitKey) => Ok(Step::AwaitingKey),
            Err(err) => self.skip_unrecognized(pc, err),
        }
    }

    fn skip_unrecognized(&self, pc: u16, err: Error) -> Result<Step> {
        match err {
            Error::UnrecognizedOpcode { opcode } if !self.config.strict => {
                warn!("skipping unrecognized opcode {} at {:03X}", opcode, pc);
                Ok(Step::Unrecognized(opcode))
            }
            err => Err(err),
        }
    }

    /// Counts both timers down by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Runs one timer period worth of instructions and then ticks the timers once.
    /// Stops at the first error without ticking.
    pub fn run_frame(&mut self, keypad: &dyn Keypad) -> Result<()> {
        for _ in 0..self.config.cycles_per_frame() {
            self.step(keypad)?;
        }
        self.tick_timers();
        Ok(())
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.frame_buffer.take_dirty() {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Whether a tone should be playing.
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn registers(&self) -> &[u8] {
        &self.state.v
    }

    pub fn index(&self) -> u16 {
        self.state.i
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
