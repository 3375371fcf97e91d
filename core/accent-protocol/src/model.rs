use rkyv::{Archive, Deserialize, Serialize};
use crate::key::GrammaticalKey;
use crate::position::StressPosition;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Bumped whenever a record layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// A word form with a single stress position.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct AccentRecord {
    pub word: String,
    pub position: StressPosition,
}

/// One grammatical reading of a homograph. `key: None` is the reading carried over
/// from a key-less observation.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct ReadingRecord {
    pub key: Option<GrammaticalKey>,
    pub position: StressPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct HomographRecord {
    pub word: String,
    pub positions: Vec<StressPosition>,
    pub readings: Vec<ReadingRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct AmbiguousReadingRecord {
    pub key: Option<GrammaticalKey>,
    pub positions: Vec<StressPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct UnresolvableRecord {
    pub word: String,
    pub positions: Vec<StressPosition>,
    pub readings: Vec<AmbiguousReadingRecord>,
}

macro_rules! define_partition {
    ($name:ident, $record:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
        #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
        #[archive(check_bytes)]
        pub struct $name {
            pub version: u32,
            pub records: Vec<$record>,
        }

        impl $name {
            pub fn new(records: Vec<$record>) -> Self {
                Self { version: FORMAT_VERSION, records }
            }
        }
    };
}

define_partition!(AccentPartition, AccentRecord, "Archived `accents` partition.");
define_partition!(HomographPartition, HomographRecord, "Archived `homographs` partition.");
define_partition!(
    UnresolvablePartition,
    UnresolvableRecord,
    "Archived `homographs_unresolvable` partition."
);
