pub use chip8::{Chip8, Step};
pub use config::Config;
pub use disasm::{disassemble, Disassembler, Line};
pub use error::{Error, Result};
pub use framebuffer::FrameBuffer;
pub use instruction::Instruction;
pub use keypad::{Keypad, Keys};
pub use opcode::Opcode;
pub use quirks::{QuirkPreset, Quirks};

mod chip8;
mod config;
pub mod constants;
mod disasm;
mod error;
pub mod framebuffer;
mod instruction;
mod keypad;
pub mod memory;
mod opcode;
pub mod operations;
mod quirks;
pub mod stack;
pub mod state;
