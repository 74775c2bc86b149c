//! The delay and sound timers, and the scheduler that turns host-supplied elapsed time into
//! timer decrements and instruction steps.
//!
//! The timers always count down at 60 Hz, independent of how fast instructions are executed or
//! how often the host calls in. Both rates are tracked with integer accumulators scaled by their
//! frequency, so no rounding error builds up between calls.
use crate::error::{Error, Result};
use std::convert::TryFrom;
use std::time::Duration;

/// both timers count down at this rate
pub const TIMER_HZ: u32 = 60;

pub const DEFAULT_INSTRUCTION_RATE: u16 = 500;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Two 60 Hz countdown timers
/// - delay timer is used for events, it can be set and read
/// - sound timer would beep whenever it is nonzero; here it is only tracked as a value
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count both timers down by `ticks`, stopping at zero
    pub fn decrement(&mut self, ticks: u64) {
        let ticks = u8::try_from(ticks).unwrap_or(u8::MAX);
        self.delay = self.delay.saturating_sub(ticks);
        self.sound = self.sound.saturating_sub(ticks);
    }

    pub fn is_sounding(&self) -> bool {
        self.sound > 0
    }
}

/// How much work a span of elapsed time is worth
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Ticks {
    pub timer: u64,
    pub instructions: u64,
}

/// Accumulates elapsed time and hands out whole timer ticks and instruction steps.
///
/// Each accumulator holds nanoseconds multiplied by its rate, so one step is worth exactly
/// one second's worth of nanoseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    instruction_rate: u16,
    timer_acc: u128,
    instruction_acc: u128,
}

impl Scheduler {
    pub fn new(instruction_rate: u16) -> Result<Self> {
        validate_rate(u32::from(instruction_rate))?;
        Ok(Scheduler {
            instruction_rate,
            timer_acc: 0,
            instruction_acc: 0,
        })
    }

    pub fn instruction_rate(&self) -> u16 {
        self.instruction_rate
    }

    /// Change how many instructions run per second. Time already accumulated towards the next
    /// instruction is kept and measured against the new step size.
    pub fn set_instruction_rate(&mut self, rate: u32) -> Result<()> {
        let rate = validate_rate(rate)?;
        self.instruction_acc =
            self.instruction_acc * u128::from(rate) / u128::from(self.instruction_rate);
        self.instruction_rate = rate;
        Ok(())
    }

    /// Drain both accumulators after adding `dt` to each
    pub fn advance(&mut self, dt: Duration) -> Ticks {
        let nanos = dt.as_nanos();

        self.timer_acc += nanos * u128::from(TIMER_HZ);
        let timer = self.timer_acc / NANOS_PER_SEC;
        self.timer_acc %= NANOS_PER_SEC;

        self.instruction_acc += nanos * u128::from(self.instruction_rate);
        let instructions = self.instruction_acc / NANOS_PER_SEC;
        self.instruction_acc %= NANOS_PER_SEC;

        Ticks {
            timer: u64::try_from(timer).unwrap_or(u64::MAX),
            instructions: u64::try_from(instructions).unwrap_or(u64::MAX),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler {
            instruction_rate: DEFAULT_INSTRUCTION_RATE,
            timer_acc: 0,
            instruction_acc: 0,
        }
    }
}

fn validate_rate(rate: u32) -> Result<u16> {
    match u16::try_from(rate) {
        Ok(r) if r > 0 => Ok(r),
        _ => Err(Error::InvalidInstructionRate(rate)),
    }
}
