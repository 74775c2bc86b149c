//! An implementation of the CHIP 8 interpreter in Rust.
//!
//! The crate is only the virtual machine: memory, registers, call stack, timers, keypad state and
//! the display buffer, plus the fetch-decode-execute cycle and a scheduler that runs it at a
//! fixed rate. Windows, input polling and drawing the screen are left to the host, which talks to
//! the [`Emulator`] between calls to [`Emulator::tick`].
//!
//! # Interpreter
//! * 4096 (0x1000) bytes of memory
//! * the interpreter area is the first 512 (0x200) bytes, the hex font lives at its bottom
//! * programs are loaded at 0x200
//! * 16 8-bit registers: V0 - VF
//! * VF if used is the carry flag in addition operations, "no borrow" flag in subtraction, in draw
//!   operation the VF flag is set to denote pixel collision
//! * the address register I is 16 bits wide
//! * the stack is only used to store return addresses when subroutines are called, 16 deep
//!
//! # Timers
//! * two timers running at 60 hertz, no matter how fast instructions run
//!  - delay timer is used for events, it can be set and read
//!  - sound timer beeps when its value is nonzero (no audio is produced, it is only tracked)
//!
//! # Input
//! there is a 16 symbol hex keyboard with values 0 - F. There are 3 opcode that deal with handling input
//!  - one skips an instruction if a specific key is pressed
//!  - one skips an instruction if a specific key is NOT pressed
//!  - waits for a key press and stores it in a register once it detects it
//!
//! # Graphics
//! 64x32 pixels, exposed as RGB triples: amber for on, black for off
//!
//! ```no_run
//! use chipotle8::Emulator;
//! use std::time::Duration;
//!
//! let mut emulator = Emulator::new(None);
//! emulator.load_program(&[0x6A, 0x02, 0x12, 0x02])?;
//! emulator.tick(Duration::from_millis(16))?;
//! let rgb: &[u8] = emulator.get_pixels();
//! # Ok::<(), chipotle8::Error>(())
//! ```
#[macro_use]
extern crate slog;

pub mod config;
pub mod error;
pub mod graphics;
pub mod keyboard;
pub mod memory;
pub mod op;
pub mod registers;
pub mod stack;
pub mod timer;


pub use config::Config;
pub use error::{Error, Result};
pub use graphics::{HEIGHT, WIDTH};
pub use keyboard::{AsKeyboard, Key, NUM_KEYS};
pub use op::Op;

use graphics::Graphics;
use keyboard::Keyboard;
use memory::{Memory, NUM_BYTES_IN_FONT_CHAR};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use registers::Registers;
use slog::Logger;
use stack::CallStack;
use std::convert::TryFrom;
use std::path::Path;
use std::time::Duration;
use timer::{Scheduler, Timers};

/// What the next call to [`Emulator::cycle`] will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// fetch and execute the instruction at PC
    Running,
    /// an FX0A is waiting for a key press, which will be stored in the given register
    AwaitingKey(u8),
}

/// The CHIP-8 virtual machine. Generic over its source of randomness so tests can plug in a
/// seeded or scripted generator.
pub struct Emulator<R = StdRng> {
    memory: Memory,
    registers: Registers,
    stack: CallStack,
    timers: Timers,
    keyboard: Keyboard,
    graphics: Graphics,
    scheduler: Scheduler,
    state: RunState,
    rng: R,
    logger: Logger,
}

impl Emulator<StdRng> {
    /// Create an emulator seeded from system entropy, running at the default instruction rate.
    /// Without a logger nothing is logged.
    pub fn new(logger: Option<Logger>) -> Self {
        Self::with_rng(StdRng::from_entropy(), logger)
    }

    pub fn from_config(config: &Config, logger: Option<Logger>) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut emulator = Self::with_rng(rng, logger);
        emulator.scheduler = Scheduler::new(config.instruction_rate)?;
        Ok(emulator)
    }

    /// Create an emulator and load the program file at `path` into it
    pub fn with_game_file<P: AsRef<Path>>(path: P, logger: Option<Logger>) -> Result<Self> {
        let mut emulator = Self::new(logger);
        emulator.load_program_file(path)?;
        Ok(emulator)
    }
}

impl<R: RngCore> Emulator<R> {
    pub fn with_rng(rng: R, logger: Option<Logger>) -> Self {
        let logger = logger.unwrap_or_else(|| Logger::root(slog::Discard, o!()));

        Emulator {
            memory: Memory::new(),
            registers: Registers::new(),
            stack: CallStack::new(),
            timers: Timers::new(),
            keyboard: Keyboard::new(),
            graphics: Graphics::new(),
            scheduler: Scheduler::default(),
            state: RunState::Running,
            rng,
            logger,
        }
    }

    /// Copy a program into memory at 0x200. Fails without touching memory if it doesn't fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.memory.load_program(program)?;
        info!(self.logger, "loaded program"; "size" => program.len());
        Ok(())
    }

    /// Read a program file and load it
    pub fn load_program_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let program = std::fs::read(path).map_err(|source| Error::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_program(&program)
    }

    /// Replace the state of all 16 keys. The host calls this once per tick, before `tick`.
    pub fn set_keys(&mut self, keys: [bool; NUM_KEYS]) {
        self.keyboard.set_keys(keys);
    }

    /// Replace the key state with whichever keys the host reports as held down
    pub fn handle_key_input(&mut self, keyboard: &impl AsKeyboard) {
        self.keyboard.update_keyboard(&keyboard.keys_down());
    }

    pub fn instruction_rate(&self) -> u16 {
        self.scheduler.instruction_rate()
    }

    /// Change how many instructions run per second, anything in 1..=65535
    pub fn set_instruction_rate(&mut self, rate: u32) -> Result<()> {
        self.scheduler.set_instruction_rate(rate)?;
        info!(self.logger, "instruction rate changed"; "rate" => rate);
        Ok(())
    }

    /// Advance the machine by `dt` of wall-clock time: count the timers down at 60 Hz, then run
    /// as many instructions as the instruction rate allows. Returns true if the display changed.
    ///
    /// The first error stops the tick and is returned, any instructions still owed are dropped.
    pub fn tick(&mut self, dt: Duration) -> Result<bool> {
        let ticks = self.scheduler.advance(dt);
        self.timers.decrement(ticks.timer);

        let mut display_changed = false;
        for _ in 0..ticks.instructions {
            match self.cycle() {
                Ok(Some(op)) => display_changed |= op.is_display_op(),
                Ok(None) => {}
                Err(e) => {
                    error!(self.logger, "emulation stopped"; "error" => %e, "pc" => self.registers.pc);
                    return Err(e);
                }
            }
        }

        Ok(display_changed)
    }

    /// Run one instruction slot. While an FX0A is waiting for a key this only checks the
    /// keyboard and returns None; otherwise it executes the op at PC and returns it.
    pub fn cycle(&mut self) -> Result<Option<Op>> {
        if let RunState::AwaitingKey(x) = self.state {
            if let Some(key) = self.keyboard.first_key_down() {
                self.registers.set(x, key);
                self.registers.pc = self.registers.pc.wrapping_add(2);
                self.state = RunState::Running;
                debug!(self.logger, "key pressed, resuming"; "key" => key, "register" => x);
            }
            return Ok(None);
        }

        let addr = self.registers.pc;
        let opcode = self.memory.read_word(usize::from(addr))?;
        self.registers.pc = addr.wrapping_add(2);

        let op = Op::try_from(opcode).map_err(|e| match e {
            Error::InvalidOpcode { opcode, .. } => Error::InvalidOpcode {
                opcode,
                address: addr,
            },
            other => other,
        })?;

        trace!(self.logger, "cycle"; "pc" => addr, "opcode" => opcode, "op" => ?op);
        self.execute(op)?;
        Ok(Some(op))
    }

    /// Execute a single decoded op. PC is expected to already point past the op.
    pub fn execute(&mut self, op: Op) -> Result<()> {
        // address the op was fetched from, for error reports
        let op_addr = self.registers.pc.wrapping_sub(2);

        match op {
            Op::CallRca(_) => {}
            Op::DispClear => self.graphics.clear(),
            Op::Return => {
                self.registers.pc = self.stack.pop(op_addr)?;
                debug!(self.logger, "return"; "to" => self.registers.pc);
            }
            Op::Goto(addr) => self.registers.pc = addr,
            Op::GotoSubRtn(addr) => {
                self.stack.push(self.registers.pc, op_addr)?;
                debug!(self.logger, "call"; "to" => addr, "depth" => self.stack.depth());
                self.registers.pc = addr;
            }
            Op::CondVxEq(x, nn) => self.skip_if(self.registers.get(x) == nn),
            Op::CondVxNe(x, nn) => self.skip_if(self.registers.get(x) != nn),
            Op::CondVxVyEq(x, y) => self.skip_if(self.registers.get(x) == self.registers.get(y)),
            Op::ConstSetVx(x, nn) => self.registers.set(x, nn),
            Op::ConstAddVx(x, nn) => {
                let sum = self.registers.get(x).wrapping_add(nn);
                self.registers.set(x, sum);
            }
            Op::AssignVyToVx(x, y) => self.registers.set(x, self.registers.get(y)),
            Op::BitOpOr(x, y) => {
                self.registers
                    .set(x, self.registers.get(x) | self.registers.get(y));
            }
            Op::BitOpAnd(x, y) => {
                self.registers
                    .set(x, self.registers.get(x) & self.registers.get(y));
            }
            Op::BitOpXor(x, y) => {
                self.registers
                    .set(x, self.registers.get(x) ^ self.registers.get(y));
            }
            // the flag is always written last, so it wins when x is VF
            Op::MathVxAddVy(x, y) => {
                let (sum, carry) = self.registers.get(x).overflowing_add(self.registers.get(y));
                self.registers.set(x, sum);
                self.registers.set_flag(carry);
            }
            Op::MathVxMinusVy(x, y) => {
                let (diff, borrow) = self.registers.get(x).overflowing_sub(self.registers.get(y));
                self.registers.set(x, diff);
                self.registers.set_flag(!borrow);
            }
            Op::BitOpRtShift(x) => {
                let vx = self.registers.get(x);
                self.registers.set(x, vx >> 1);
                self.registers.set_flag(vx & 0x01 == 1);
            }
            Op::MathVyMinusVx(x, y) => {
                let (diff, borrow) = self.registers.get(y).overflowing_sub(self.registers.get(x));
                self.registers.set(x, diff);
                self.registers.set_flag(!borrow);
            }
            Op::BitOpLftShift(x) => {
                let vx = self.registers.get(x);
                self.registers.set(x, vx << 1);
                self.registers.set_flag(vx >> 7 == 1);
            }
            Op::CondVxVyNe(x, y) => self.skip_if(self.registers.get(x) != self.registers.get(y)),
            Op::MemSetI(addr) => self.registers.i = addr,
            Op::GotoPlusV0(addr) => {
                self.registers.pc = addr + u16::from(self.registers.get(0));
            }
            Op::Rand(x, nn) => {
                let byte: u8 = self.rng.gen();
                self.registers.set(x, byte & nn);
            }
            Op::DispDraw(x, y, n) => self.draw_sprite(x, y, n)?,
            Op::KeyOpEqVx(x) => {
                let down = self.keyboard.get_key_state(self.registers.get(x))?;
                self.skip_if(down);
            }
            Op::KeyOpNeVx(x) => {
                let down = self.keyboard.get_key_state(self.registers.get(x))?;
                self.skip_if(!down);
            }
            Op::DelayGet(x) => self.registers.set(x, self.timers.delay),
            Op::KeyOpGet(x) => match self.keyboard.first_key_down() {
                Some(key) => self.registers.set(x, key),
                None => {
                    // leave PC on this op until a key shows up
                    self.registers.pc = op_addr;
                    self.state = RunState::AwaitingKey(x);
                    debug!(self.logger, "waiting for key press"; "register" => x);
                }
            },
            Op::DelaySet(x) => self.timers.delay = self.registers.get(x),
            Op::SoundSet(x) => self.timers.sound = self.registers.get(x),
            Op::MemIPlusEqVx(x) => {
                self.registers.i = self
                    .registers
                    .i
                    .wrapping_add(u16::from(self.registers.get(x)));
            }
            Op::MemISetSprite(x) => {
                self.registers.i =
                    u16::from(self.registers.get(x)) * u16::from(NUM_BYTES_IN_FONT_CHAR);
            }
            Op::Bcd(x) => {
                let vx = self.registers.get(x);
                let digits = [vx / 100, (vx / 10) % 10, vx % 10];
                self.memory
                    .slice_mut(usize::from(self.registers.i), digits.len())?
                    .copy_from_slice(&digits);
            }
            Op::RegDump(x) => {
                let count = usize::from(x) + 1;
                self.memory
                    .slice_mut(usize::from(self.registers.i), count)?
                    .copy_from_slice(&self.registers.v[..count]);
            }
            Op::RegLoad(x) => {
                let count = usize::from(x) + 1;
                let bytes = self.memory.slice(usize::from(self.registers.i), count)?;
                self.registers.v[..count].copy_from_slice(bytes);
            }
        }

        Ok(())
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.registers.pc = self.registers.pc.wrapping_add(2);
        }
    }

    /// XOR an 8 pixel wide, `n` row tall sprite read from I onto the screen at (Vx, Vy).
    /// VF ends up 1 if any pixel that was on got turned off, 0 otherwise.
    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) -> Result<()> {
        let x_start = usize::from(self.registers.get(x));
        let y_start = usize::from(self.registers.get(y));
        let sprite = self
            .memory
            .slice(usize::from(self.registers.i), usize::from(n))?;

        let mut collision = false;
        for (y_offset, row) in sprite.iter().enumerate() {
            for x_offset in 0..8 {
                if row & (0x80 >> x_offset) != 0 {
                    collision |= self.graphics.toggle(x_start + x_offset, y_start + y_offset);
                }
            }
        }

        self.registers.set_flag(collision);
        Ok(())
    }

    /// The screen as 64x32 RGB triples, row by row from the top left
    pub fn get_pixels(&self) -> &[u8] {
        self.graphics.rgb()
    }

    /// Whether the pixel at (x, y) is on. Coordinates wrap around the screen edges.
    pub fn is_pixel_on(&self, x: usize, y: usize) -> bool {
        self.graphics.is_on(x, y)
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    /// True while the sound timer is nonzero, when real hardware would be beeping
    pub fn is_sounding(&self) -> bool {
        self.timers.is_sounding()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn read_memory(&self, addr: usize) -> Result<u8> {
        self.memory.read(addr)
    }
}
