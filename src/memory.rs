use crate::error::{Error, Result};

/// how much RAM we have
pub const MEMORY_SIZE: usize = 4096;

/// where programs get loaded, everything below is reserved for the interpreter
pub const STARTING_MEMORY_BYTE: usize = 0x200;

/// the largest program that fits between STARTING_MEMORY_BYTE and the top of RAM
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - STARTING_MEMORY_BYTE;

pub const NUM_BYTES_IN_FONT_CHAR: u8 = 5;

/// 16 hex digit sprites, 0 through F. Sprite for digit `d` starts at address
/// `d * NUM_BYTES_IN_FONT_CHAR`
#[rustfmt::skip]
pub const FONT_SET: [u8; 80] = [
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

/// 4k of RAM with the font baked into the bottom of the interpreter area.
/// Every access is bounds-checked; addresses past the top of RAM are an error,
/// they never wrap.
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = Box::new([0u8; MEMORY_SIZE]);
        bytes[..FONT_SET.len()].copy_from_slice(&FONT_SET);
        Memory { bytes }
    }

    /// Copy a program into RAM at STARTING_MEMORY_BYTE. Nothing is written if the
    /// program doesn't fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }

        let end = STARTING_MEMORY_BYTE + program.len();
        self.bytes[STARTING_MEMORY_BYTE..end].copy_from_slice(program);
        Ok(())
    }

    pub fn read(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or_else(|| out_of_range(addr))
    }

    /// get a big-endian two-byte word, used to fetch opcodes
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let hi = self.read(addr)?;
        let lo = self.read(addr + 1)?;
        Ok(u16::from(hi) << 8 | u16::from(lo))
    }

    /// get a r/o slice of `len` bytes starting at `addr`
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        let end = addr + len;
        if end > MEMORY_SIZE {
            return Err(out_of_range(end - 1));
        }
        Ok(&self.bytes[addr..end])
    }

    /// get a r/w slice of `len` bytes starting at `addr`
    pub fn slice_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8]> {
        let end = addr + len;
        if end > MEMORY_SIZE {
            return Err(out_of_range(end - 1));
        }
        Ok(&mut self.bytes[addr..end])
    }
}

fn out_of_range(index: usize) -> Error {
    Error::OutOfRange {
        region: "memory",
        index,
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
