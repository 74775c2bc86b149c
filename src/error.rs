//! Every way a program load or an emulation run can fail. All of these are fatal:
//! the emulator never skips an instruction or patches up its own state after one
//! of them.
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("program is too large ({size} bytes), at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("could not read program file {}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid opcode {opcode:#06X} at address {address:#05X}")]
    InvalidOpcode { opcode: u16, address: u16 },

    #[error("return with an empty call stack at address {address:#05X}")]
    StackUnderflow { address: u16 },

    #[error("call stack exceeded 16 levels at address {address:#05X}")]
    StackOverflow { address: u16 },

    #[error("{region} access out of range at {index:#06X}")]
    OutOfRange { region: &'static str, index: usize },

    #[error("instruction rate must be within 1..=65535, got {0}")]
    InvalidInstructionRate(u32),

    #[error("malformed configuration")]
    Config(#[from] serde_json::Error),
}
