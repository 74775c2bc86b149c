use crate::error::{Error, Result};

/// CHIP 8 can hold up to 16 return addresses
pub const STACK_DEPTH: usize = 16;

/// Holds return addresses for subroutine calls. Popping an empty stack or nesting calls past
/// STACK_DEPTH is an error, the stack never silently drops or invents an address.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallStack {
    addrs: Vec<u16>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            addrs: Vec::with_capacity(STACK_DEPTH),
        }
    }

    /// `pc` is only used to report where a failing call happened
    pub fn push(&mut self, addr: u16, pc: u16) -> Result<()> {
        if self.addrs.len() == STACK_DEPTH {
            return Err(Error::StackOverflow { address: pc });
        }
        self.addrs.push(addr);
        Ok(())
    }

    pub fn pop(&mut self, pc: u16) -> Result<u16> {
        self.addrs.pop().ok_or(Error::StackUnderflow { address: pc })
    }

    /// how many calls are currently nested
    pub fn depth(&self) -> usize {
        self.addrs.len()
    }
}
