use crate::error::{Error, Result};
use crate::timer::DEFAULT_INSTRUCTION_RATE;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Emulator settings. Every field has a default, so a config file only needs to name what it
/// changes:
///
/// ```json
/// { "instruction_rate": 700, "seed": 42 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// instructions executed per second, 1 through 65535
    pub instruction_rate: u16,
    /// seed for the random number generator behind CXNN, fresh entropy when None
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instruction_rate: DEFAULT_INSTRUCTION_RATE,
            seed: None,
        }
    }
}

impl Config {
    /// Parse a JSON config and check it
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let config: Config = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.instruction_rate == 0 {
            return Err(Error::InvalidInstructionRate(0));
        }
        Ok(())
    }
}
