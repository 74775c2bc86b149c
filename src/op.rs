use crate::error::{Error, Result};
use std::convert::TryFrom;

/// The 35 CHIP-8 op codes. Register indices (`x`, `y`) are guaranteed to be between 0x0 and
/// 0xF, addresses (`nnn`) fit in 12 bits and `n` heights fit in 4 bits.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Op {
    // 0XXX
    // 0NNN 	Call 		Calls RCA 1802 program at address NNN. Ignored.
    CallRca(u16),
    // 00E0 	Display 	disp_clear() 	Clears the screen.
    DispClear,
    // 00EE 	Flow 	return; 	Returns from a subroutine.
    Return,

    // 1NNN 	Flow 	goto NNN;
    Goto(u16),
    // 2NNN 	Flow 	*(0xNNN)()
    GotoSubRtn(u16),

    // 3XNN 	Cond 	if(Vx==NN)
    CondVxEq(u8, u8),
    // 4XNN 	Cond 	if(Vx!=NN)
    CondVxNe(u8, u8),
    // 5XY0 	Cond 	if(Vx==Vy)
    CondVxVyEq(u8, u8),

    // 6XNN 	Const 	Vx = NN
    ConstSetVx(u8, u8),
    // 7XNN 	Const 	Vx += NN, carry flag untouched
    ConstAddVx(u8, u8),

    // 8XY_
    AssignVyToVx(u8, u8),
    BitOpOr(u8, u8),
    BitOpAnd(u8, u8),
    BitOpXor(u8, u8),
    MathVxAddVy(u8, u8),
    MathVxMinusVy(u8, u8),
    BitOpRtShift(u8),
    MathVyMinusVx(u8, u8),
    BitOpLftShift(u8),

    // 9XY0 	Cond 	if(Vx!=Vy)
    CondVxVyNe(u8, u8),

    // ANNN 	MEM 	I = NNN
    MemSetI(u16),
    // BNNN 	Flow 	PC = V0 + NNN
    GotoPlusV0(u16),
    // CXNN 	Rand 	Vx = rand() & NN
    Rand(u8, u8),
    // DXYN 	Disp 	draw(Vx, Vy, N)
    DispDraw(u8, u8, u8),

    // EX9E / EXA1
    KeyOpEqVx(u8),
    KeyOpNeVx(u8),

    // FX__
    DelayGet(u8),
    KeyOpGet(u8),
    DelaySet(u8),
    SoundSet(u8),
    MemIPlusEqVx(u8),
    MemISetSprite(u8),
    Bcd(u8),
    RegDump(u8),
    RegLoad(u8),
}

impl Op {
    /// Returns true if executing this op can change what is on the display
    pub fn is_display_op(&self) -> bool {
        matches!(self, Op::DispClear | Op::DispDraw(..))
    }
}

/// Combine three nibbles (most significant first) into a 12-bit address
pub fn three_nibbles_to_address(n1: u8, n2: u8, n3: u8) -> u16 {
    (u16::from(n1) << 8) | (u16::from(n2) << 4) | u16::from(n3)
}

fn two_nibbles_to_u8(n1: u8, n2: u8) -> u8 {
    (n1 << 4) | n2
}

impl TryFrom<u16> for Op {
    type Error = Error;

    /// Decode a raw opcode. `Error::InvalidOpcode` carries the opcode but not its address;
    /// the emulator fills that in since only it knows where the opcode was fetched from.
    fn try_from(item: u16) -> Result<Self> {
        let mask = 0xF;

        // these are the 4 nibbles of item, where nibb_1 is the MSB and nibb_4 is the LSB
        let nibb_1 = ((item >> 12) & mask) as u8;
        let nibb_2 = ((item >> 8) & mask) as u8;
        let nibb_3 = ((item >> 4) & mask) as u8;
        let nibb_4 = (item & mask) as u8;
        let nibbles = [nibb_1, nibb_2, nibb_3, nibb_4];

        let invalid = Error::InvalidOpcode {
            opcode: item,
            address: 0,
        };

        let op = match nibbles {
            [0x0, 0x0, 0xE, 0x0] => Op::DispClear,
            [0x0, 0x0, 0xE, 0xE] => Op::Return,
            [0x0, n2, n3, n4] => Op::CallRca(three_nibbles_to_address(n2, n3, n4)),
            [0x1, n2, n3, n4] => Op::Goto(three_nibbles_to_address(n2, n3, n4)),
            [0x2, n2, n3, n4] => Op::GotoSubRtn(three_nibbles_to_address(n2, n3, n4)),
            [0x3, x, n3, n4] => Op::CondVxEq(x, two_nibbles_to_u8(n3, n4)),
            [0x4, x, n3, n4] => Op::CondVxNe(x, two_nibbles_to_u8(n3, n4)),
            [0x5, x, y, _] => Op::CondVxVyEq(x, y),
            [0x6, x, n3, n4] => Op::ConstSetVx(x, two_nibbles_to_u8(n3, n4)),
            [0x7, x, n3, n4] => Op::ConstAddVx(x, two_nibbles_to_u8(n3, n4)),
            [0x8, x, y, n4] => match n4 {
                0x0 => Op::AssignVyToVx(x, y),
                0x1 => Op::BitOpOr(x, y),
                0x2 => Op::BitOpAnd(x, y),
                0x3 => Op::BitOpXor(x, y),
                0x4 => Op::MathVxAddVy(x, y),
                0x5 => Op::MathVxMinusVy(x, y),
                0x6 => Op::BitOpRtShift(x),
                0x7 => Op::MathVyMinusVx(x, y),
                0xE => Op::BitOpLftShift(x),
                _ => return Err(invalid),
            },
            [0x9, x, y, _] => Op::CondVxVyNe(x, y),
            [0xA, n2, n3, n4] => Op::MemSetI(three_nibbles_to_address(n2, n3, n4)),
            [0xB, n2, n3, n4] => Op::GotoPlusV0(three_nibbles_to_address(n2, n3, n4)),
            [0xC, x, n3, n4] => Op::Rand(x, two_nibbles_to_u8(n3, n4)),
            [0xD, x, y, n] => Op::DispDraw(x, y, n),
            [0xE, x, n3, n4] => match [n3, n4] {
                [0x9, 0xE] => Op::KeyOpEqVx(x),
                [0xA, 0x1] => Op::KeyOpNeVx(x),
                _ => return Err(invalid),
            },
            [0xF, x, n3, n4] => match [n3, n4] {
                [0x0, 0x7] => Op::DelayGet(x),
                [0x0, 0xA] => Op::KeyOpGet(x),
                [0x1, 0x5] => Op::DelaySet(x),
                [0x1, 0x8] => Op::SoundSet(x),
                [0x1, 0xE] => Op::MemIPlusEqVx(x),
                [0x2, 0x9] => Op::MemISetSprite(x),
                [0x3, 0x3] => Op::Bcd(x),
                [0x5, 0x5] => Op::RegDump(x),
                [0x6, 0x5] => Op::RegLoad(x),
                _ => return Err(invalid),
            },
            _ => return Err(invalid),
        };

        Ok(op)
    }
}
