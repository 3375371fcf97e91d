use accent_protocol::StressPosition;

use crate::entry::EntryState;

/// Result of a key-less observation.
///
/// `Conflict` and `Stale` are signals for the caller; the dictionary is left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlainOutcome {
    /// Fewer than two vowels, nothing recorded.
    Trivial,
    Inserted,
    Confirmed,
    Conflict {
        existing: StressPosition,
        observed: StressPosition,
    },
    /// The word is already a homograph or unresolvable; plain evidence cannot refine it.
    Stale { state: EntryState },
}

impl PlainOutcome {
    pub fn is_change(&self) -> bool {
        matches!(self, PlainOutcome::Inserted)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, PlainOutcome::Conflict { .. } | PlainOutcome::Stale { .. })
    }
}

/// Result of an observation carrying a grammatical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggedOutcome {
    /// Fewer than two vowels, nothing recorded.
    Trivial,
    /// New homograph entry for a word that was absent.
    Created,
    /// Nothing new: the reading (or the resolved position) was already known.
    Confirmed,
    /// A new reading joined an existing homograph.
    Added,
    /// A resolved word became a homograph.
    Promoted,
    /// A homograph became unresolvable.
    Escalated,
    /// An unresolvable entry gained a position.
    Grown,
}

impl TaggedOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, TaggedOutcome::Trivial | TaggedOutcome::Confirmed)
    }
}

/// Counters returned by [`AccentDictionary::merge`](crate::AccentDictionary::merge).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub changes: usize,
    pub conflicts: usize,
}
