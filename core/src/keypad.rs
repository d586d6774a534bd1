use crate::constants::KEY_COUNT;

/// # Keypad
/// Input is generated with a 16 key hexadecimal keypad.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
/// The machine never polls a physical device; whoever drives it answers these queries.
pub trait Keypad {
    /// Whether `key` (0x0..=0xF) is currently held down.
    fn is_key_pressed(&self, key: u8) -> bool;

    /// The lowest numbered key currently held down, if any.
    fn first_pressed(&self) -> Option<u8> {
        (0..KEY_COUNT).find(|&key| self.is_key_pressed(key))
    }
}

/// Pressed status of each key, set by the driver from its input events.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    pressed: [bool; KEY_COUNT as usize],
}

impl Keys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn press(&mut self, key: u8) {
        if let Some(k) = self.pressed.get_mut(key as usize) {
            *k = true;
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn release(&mut self, key: u8) {
        if let Some(k) = self.pressed.get_mut(key as usize) {
            *k = false;
        }
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; KEY_COUNT as usize];
    }
}

impl Keypad for Keys {
    fn is_key_pressed(&self, key: u8) -> bool {
        self.pressed.get(key as usize).copied().unwrap_or(false)
    }
}
