use crate::memory::STARTING_MEMORY_BYTE;

pub const NUM_REGISTERS: usize = 16;

/// Index of VF, the register several ops overwrite with a carry, borrow or collision flag
pub const FLAG_REGISTER: usize = 0xF;

/// The CHIP-8 register file.
///
/// * 16 8-bit registers: V0 - VF. VF doubles as the carry flag in addition, the "no borrow"
///   flag in subtraction and the collision flag when drawing
/// * the address register I is 16 bits wide and never masked
/// * the program counter starts at the first byte of the loaded program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub pc: u16,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: STARTING_MEMORY_BYTE as u16,
        }
    }

    /// Register indices come out of a 4-bit opcode field so only the low nibble is used
    pub fn get(&self, idx: u8) -> u8 {
        self.v[usize::from(idx & 0xF)]
    }

    pub fn set(&mut self, idx: u8, value: u8) {
        self.v[usize::from(idx & 0xF)] = value;
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[FLAG_REGISTER] = set as u8;
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed_at_program_start() {
        let r = Registers::new();
        assert_eq!(r.v, [0; 16]);
        assert_eq!(r.i, 0);
        assert_eq!(r.pc, 0x200);
    }

    #[test]
    fn get_and_set() {
        let mut r = Registers::new();
        r.set(0xA, 42);
        assert_eq!(r.get(0xA), 42);
        assert_eq!(r.v[0xA], 42);

        r.set_flag(true);
        assert_eq!(r.v[FLAG_REGISTER], 1);
        r.set_flag(false);
        assert_eq!(r.get(0xF), 0);
    }
}
