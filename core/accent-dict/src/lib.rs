//! Conflict-aware construction of a Russian stress dictionary.
//!
//! Observations arrive as `(word form, optional grammatical key, stress position)` and
//! each word form settles into one of three partitions: resolved, homograph or
//! unresolvable. [`DictionaryStore`] persists the partitions between sessions.

pub mod dictionary;
pub mod entry;
pub mod error;
pub mod outcome;
pub mod store;

pub use dictionary::{AccentDictionary, MergePolicy, PartitionSizes, Partitions, SizeDelta};
pub use entry::{Entry, EntryState, Homograph, Reading, Unresolvable};
pub use error::{Result, StoreError};
pub use outcome::{MergeReport, PlainOutcome, TaggedOutcome};
pub use store::{accent_partition, homograph_partition, unresolvable_partition, DictionaryStore};
