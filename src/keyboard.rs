use crate::error::{Error, Result};

pub const NUM_KEYS: usize = 16;

/// Key's variants are the 16 keys from the CHIP-8's hexadecimal keyboard, declared in key
/// index order so `Key::A as usize == 0xA`.
///
/// Keypad layout:
///
/// +-+-+-+-+
/// |1|2|3|C|
/// +-+-+-+-+
/// |4|5|6|D|
/// +-+-+-+-+
/// |7|8|9|E|
/// +-+-+-+-+
/// |A|0|B|F|
/// +-+-+-+-+
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum Key {
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Key {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Implemented by whatever reads the host's keyboard, so the emulator doesn't need to know
/// where key presses come from
pub trait AsKeyboard {
    /// every CHIP-8 key that is currently held down
    fn keys_down(&self) -> Vec<Key>;
}

/// The up or down state of the CHIP-8's 16 keys. The host replaces the whole snapshot once
/// per tick; there is no debouncing or edge detection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Keyboard {
    key_input: [bool; NUM_KEYS],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the state of all 16 keys at once
    pub fn set_keys(&mut self, keys: [bool; NUM_KEYS]) {
        self.key_input = keys;
    }

    /// Given the keys held down on the host, mark exactly those as down
    pub fn update_keyboard(&mut self, keys_down: &[Key]) {
        let mut keys = [false; NUM_KEYS];
        for key in keys_down {
            keys[key.index()] = true;
        }
        self.set_keys(keys);
    }

    /// Return the state of the key at the given index. The index comes out of a register, so
    /// anything past 0xF is an error rather than a key.
    pub fn get_key_state(&self, idx: u8) -> Result<bool> {
        self.key_input
            .get(usize::from(idx))
            .copied()
            .ok_or(Error::OutOfRange {
                region: "key",
                index: usize::from(idx),
            })
    }

    /// The lowest numbered key that is down, if any
    pub fn first_key_down(&self) -> Option<u8> {
        self.key_input.iter().position(|down| *down).map(|idx| idx as u8)
    }
}
