use std::fmt;

use crate::constants::PROGRAM_START;
use crate::instruction::Instruction;
use crate::opcode::Opcode;

/// One decoded word of a program image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub address: u16,
    pub opcode: Opcode,
    /// `None` when the word isn't an instruction (usually sprite or other data).
    pub instruction: Option<Instruction>,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:03X}: {}  ", self.address, self.opcode)?;
        match self.instruction {
            Some(instruction) => write!(f, "{}", instruction),
            None => write!(f, "???"),
        }
    }
}

/// # Disassembler
/// Walks a program image two bytes at a time as if it were loaded at 0x200, without
/// executing anything. Stops at the first `0000` word or at the end of the image.
///
/// A trailing odd byte is read with a zero low byte, the same as it would be from memory.
pub struct Disassembler<'a> {
    program: &'a [u8],
    offset: usize,
}

impl<'a> Disassembler<'a> {
    pub fn new(program: &'a [u8]) -> Self {
        Disassembler { program, offset: 0 }
    }
}

impl<'a> Iterator for Disassembler<'a> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let high = *self.program.get(self.offset)?;
        let low = self.program.get(self.offset + 1).copied().unwrap_or(0);
        let opcode = Opcode::from_bytes(high, low);
        if opcode.raw() == 0x0000 {
            // park at the end so the halt word is never read past
            self.offset = self.program.len();
            return None;
        }

        let address = PROGRAM_START.wrapping_add(self.offset as u16);
        self.offset += 2;
        Some(Line {
            address,
            opcode,
            instruction: Instruction::decode(opcode).ok(),
        })
    }
}

/// Decodes every word of `program` up to the halt word.
pub fn disassemble(program: &[u8]) -> Vec<Line> {
    Disassembler::new(program).collect()
}
