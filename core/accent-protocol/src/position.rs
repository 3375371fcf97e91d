use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use core::fmt;

/// Zero-based index of the stressed vowel among the vowels of a word form.
///
/// This is not a character offset: in `стоит` position 1 is the `и`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(transparent)]
pub struct StressPosition(pub u8);

impl StressPosition {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for StressPosition {
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl From<StressPosition> for u8 {
    fn from(position: StressPosition) -> u8 {
        position.0
    }
}

impl fmt::Display for StressPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
