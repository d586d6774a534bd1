use crate::opcode::Opcode;

/// Everything that can go wrong while loading or running a program.
///
/// Only `UnrecognizedOpcode` is soft: a malformed or non-conforming program image may
/// legitimately contain words outside the instruction table. The rest mean the machine
/// state can no longer be trusted and the driver should stop the current run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("stack overflow: no room to push return address {address:#05X}")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("unrecognized opcode {opcode}")]
    UnrecognizedOpcode { opcode: Opcode },

    #[error("program is too large ({size} bytes), at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether continuing to step the machine after this error is unsafe.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::UnrecognizedOpcode { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
