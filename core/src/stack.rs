use crate::constants::STACK_DEPTH;
use crate::error::{Error, Result};

/// # Stack
/// Return addresses for subroutine calls, at most `STACK_DEPTH` deep.
/// Overflow and underflow are reported and leave the stack as it was.
#[derive(Copy, Clone, Debug)]
pub struct Stack {
    addresses: [u16; STACK_DEPTH],
    // index of the first free slot
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            addresses: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        let slot = self
            .addresses
            .get_mut(self.sp)
            .ok_or(Error::StackOverflow { address })?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }

    pub fn peek(&self) -> Option<u16> {
        self.as_slice().last().copied()
    }

    pub fn len(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    pub fn capacity(&self) -> usize {
        STACK_DEPTH
    }

    /// The live entries, oldest first.
    pub fn as_slice(&self) -> &[u16] {
        &self.addresses[..self.sp]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
