use std::io::Read;

use crate::constants::{FONT, FONT_ADDRESS, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Error, Result};
use crate::opcode::Opcode;

/// # Memory
/// 4096 bytes of flat addressable memory.
///
/// - `0x000..0x200` is reserved for the interpreter and holds the font
/// - `0x200..0x1000` is where programs are loaded
///
/// Every access is bounds checked. Unlike the display, memory does not wrap.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the font installed.
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = FONT_ADDRESS as usize;
        bytes[font..font + FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Error::OutOfBounds {
                address: addr as usize,
            })
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        let byte = self.bytes.get_mut(addr as usize).ok_or(Error::OutOfBounds {
            address: addr as usize,
        })?;
        *byte = value;
        Ok(())
    }

    /// Reads the opcode at `addr`; the byte at `addr` is the high byte.
    pub fn read_instruction(&self, addr: u16) -> Result<Opcode> {
        let word = self.read_slice(addr, 2)?;
        Ok(Opcode::from_bytes(word[0], word[1]))
    }

    /// Borrows `len` bytes starting at `addr`, failing if any of them are out of bounds.
    pub fn read_slice(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let start = addr as usize;
        self.check_range(start, len)?;
        Ok(&self.bytes[start..start + len])
    }

    /// Writes all of `data` starting at `addr`, or nothing if it doesn't fit.
    pub fn write_slice(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        let start = addr as usize;
        self.check_range(start, data.len())?;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Copies a program image to `PROGRAM_START`.
    /// The reserved area below it, font included, is left untouched.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.write_slice(PROGRAM_START, program)
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a reader that yields the raw program image
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<usize> {
        let mut program = Vec::with_capacity(MAX_PROGRAM_SIZE);
        reader.read_to_end(&mut program)?;
        self.load_program(&program)?;
        Ok(program.len())
    }

    fn check_range(&self, start: usize, len: usize) -> Result<()> {
        if start + len > MEMORY_SIZE {
            // report the first address that doesn't exist
            let address = start.max(MEMORY_SIZE);
            return Err(Error::OutOfBounds { address });
        }
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
