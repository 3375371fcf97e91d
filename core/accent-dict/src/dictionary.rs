use accent_protocol::text::is_trivial;
use accent_protocol::{GrammaticalKey, StressPosition};
use bitflags::bitflags;
use std::collections::HashMap;

use crate::entry::{Entry, EntryState, Homograph, Reading, Unresolvable};
use crate::outcome::{MergeReport, PlainOutcome, TaggedOutcome};

/// What a tagged observation does to a `Resolved` word when it agrees with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// The entry stays `Resolved`.
    #[default]
    Conservative,
    /// The entry becomes a `Homograph` holding the plain position and the new reading,
    /// so later divergent readings are attributed correctly. `compact` undoes this
    /// when nothing diverges.
    EagerSeeding,
}

bitflags! {
    /// Partitions modified since the last load or save.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Partitions: u8 {
        const ACCENTS = 1;
        const HOMOGRAPHS = 2;
        const UNRESOLVABLE = 4;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionSizes {
    pub accents: usize,
    pub homographs: usize,
    pub unresolvable: usize,
}

/// Signed change in entry count per partition, ordered accents/homographs/unresolvable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeDelta {
    pub accents: i64,
    pub homographs: i64,
    pub unresolvable: i64,
}

impl SizeDelta {
    fn between(before: PartitionSizes, after: PartitionSizes) -> Self {
        let diff = |a: usize, b: usize| b as i64 - a as i64;
        Self {
            accents: diff(before.accents, after.accents),
            homographs: diff(before.homographs, after.homographs),
            unresolvable: diff(before.unresolvable, after.unresolvable),
        }
    }
}

/// Word form to stress position dictionary, built incrementally from observations.
///
/// Every word form lives in at most one of three partitions: `accents` (one position),
/// `homographs` (one position per grammatical reading) and `unresolvable` (several
/// positions even for one reading). Observations only move a word up that order;
/// [`compact`](Self::compact) is the only way down.
#[derive(Debug, Clone, Default)]
pub struct AccentDictionary {
    pub(crate) accents: HashMap<String, StressPosition>,
    pub(crate) homographs: HashMap<String, Homograph>,
    pub(crate) unresolvable: HashMap<String, Unresolvable>,
    policy: MergePolicy,
    touched: Partitions,
    baseline: PartitionSizes,
}

impl AccentDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MergePolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /// Records an observation that carries no grammatical key.
    pub fn record_plain(&mut self, word: &str, position: StressPosition) -> PlainOutcome {
        if is_trivial(word) {
            return PlainOutcome::Trivial;
        }

        if self.unresolvable.contains_key(word) {
            tracing::warn!(word, %position, "plain observation for unresolvable word");
            return PlainOutcome::Stale { state: EntryState::Unresolvable };
        }

        if self.homographs.contains_key(word) {
            tracing::warn!(word, %position, "plain observation for homograph");
            return PlainOutcome::Stale { state: EntryState::Homograph };
        }

        if let Some(&existing) = self.accents.get(word) {
            if existing == position {
                return PlainOutcome::Confirmed;
            }
            tracing::warn!(word, %existing, observed = %position, "conflicting plain observation");
            return PlainOutcome::Conflict { existing, observed: position };
        }

        self.accents.insert(word.to_owned(), position);
        self.touch(Partitions::ACCENTS);
        tracing::debug!(word, %position, "new accent");
        PlainOutcome::Inserted
    }

    /// Records an observation made under a specific grammatical reading.
    pub fn record_tagged(
        &mut self,
        word: &str,
        key: GrammaticalKey,
        position: StressPosition,
    ) -> TaggedOutcome {
        if is_trivial(word) {
            return TaggedOutcome::Trivial;
        }
        let reading = Reading::Tagged(key);

        if let Some(entry) = self.unresolvable.get_mut(word) {
            if !entry.grow(reading, position) {
                return TaggedOutcome::Confirmed;
            }
            self.touch(Partitions::UNRESOLVABLE);
            tracing::debug!(word, %position, "new unresolvable position");
            return TaggedOutcome::Grown;
        }

        if let Some(homograph) = self.homographs.get_mut(word) {
            return match homograph.by_reading.get(&reading).copied() {
                None => {
                    tracing::debug!(word, %position, %reading, "new homograph reading");
                    homograph.positions.insert(position);
                    homograph.by_reading.insert(reading, position);
                    self.touch(Partitions::HOMOGRAPHS);
                    TaggedOutcome::Added
                }
                Some(existing) if existing == position => TaggedOutcome::Confirmed,
                Some(existing) => {
                    self.escalate(word, reading, existing, position);
                    TaggedOutcome::Escalated
                }
            };
        }

        if let Some(&existing) = self.accents.get(word) {
            if existing == position && self.policy == MergePolicy::Conservative {
                return TaggedOutcome::Confirmed;
            }
            self.accents.remove(word);
            tracing::info!(word, %existing, %position, %reading, "promoting to homograph");
            let homograph = Homograph::seeded([(Reading::Unkeyed, existing), (reading, position)]);
            self.homographs.insert(word.to_owned(), homograph);
            self.touch(Partitions::ACCENTS | Partitions::HOMOGRAPHS);
            return TaggedOutcome::Promoted;
        }

        tracing::debug!(word, %position, %reading, "new homograph");
        self.homographs.insert(word.to_owned(), Homograph::seeded([(reading, position)]));
        self.touch(Partitions::HOMOGRAPHS);
        TaggedOutcome::Created
    }

    fn escalate(
        &mut self,
        word: &str,
        reading: Reading,
        existing: StressPosition,
        position: StressPosition,
    ) {
        let Some(homograph) = self.homographs.remove(word) else {
            return;
        };
        tracing::info!(word, %reading, %existing, %position, "escalating to unresolvable");
        let mut unresolvable = Unresolvable::from(homograph);
        unresolvable.grow(reading, position);
        self.unresolvable.insert(word.to_owned(), unresolvable);
        self.touch(Partitions::HOMOGRAPHS | Partitions::UNRESOLVABLE);
    }

    /// Demotes every homograph whose readings all agree on one position.
    /// Returns the number of demoted entries.
    pub fn compact(&mut self) -> usize {
        let degenerate: Vec<String> = self
            .homographs
            .iter()
            .filter(|(_, homograph)| homograph.is_degenerate())
            .map(|(word, _)| word.clone())
            .collect();

        for word in &degenerate {
            if let Some(homograph) = self.homographs.remove(word) {
                if let Some(&position) = homograph.positions.iter().next() {
                    self.accents.insert(word.clone(), position);
                }
            }
        }

        if !degenerate.is_empty() {
            self.touch(Partitions::ACCENTS | Partitions::HOMOGRAPHS);
            tracing::info!(demoted = degenerate.len(), "compacted homographs");
        }
        degenerate.len()
    }

    /// Folds `other` into this dictionary by replaying its evidence through the
    /// regular ingestion rules. Key-less positions are replayed before tagged ones.
    pub fn merge(&mut self, other: AccentDictionary) -> MergeReport {
        let mut report = MergeReport::default();
        let mut plain = |dict: &mut Self, word: &str, position: StressPosition| {
            let outcome = dict.record_plain(word, position);
            report.changes += usize::from(outcome.is_change());
            report.conflicts += usize::from(outcome.is_conflict());
        };

        for (word, position) in &other.accents {
            plain(self, word.as_str(), *position);
        }

        let mut tagged: Vec<(String, GrammaticalKey, StressPosition)> = Vec::new();
        for (word, homograph) in other.homographs {
            for (reading, position) in homograph.by_reading {
                match reading {
                    Reading::Unkeyed => plain(self, word.as_str(), position),
                    Reading::Tagged(key) => tagged.push((word.clone(), key, position)),
                }
            }
        }
        for (word, unresolvable) in other.unresolvable {
            for (reading, positions) in unresolvable.by_reading {
                for position in positions {
                    match &reading {
                        Reading::Unkeyed => plain(self, word.as_str(), position),
                        Reading::Tagged(key) => tagged.push((word.clone(), key.clone(), position)),
                    }
                }
            }
        }

        for (word, key, position) in tagged {
            if self.record_tagged(&word, key, position).is_change() {
                report.changes += 1;
            }
        }
        report
    }

    pub fn entry(&self, word: &str) -> Option<Entry<'_>> {
        if let Some(&position) = self.accents.get(word) {
            return Some(Entry::Resolved(position));
        }
        if let Some(homograph) = self.homographs.get(word) {
            return Some(Entry::Homograph(homograph));
        }
        self.unresolvable.get(word).map(Entry::Unresolvable)
    }

    /// The stress position of `word`, only when it is unambiguous for the given reading.
    pub fn stress(&self, word: &str, key: Option<&GrammaticalKey>) -> Option<StressPosition> {
        match self.entry(word)? {
            Entry::Resolved(position) => Some(position),
            Entry::Homograph(homograph) => {
                if homograph.is_degenerate() {
                    return homograph.positions.iter().next().copied();
                }
                key.and_then(|key| homograph.position_for(key))
            }
            Entry::Unresolvable(unresolvable) => {
                let positions = unresolvable.positions_for(key?)?;
                match positions.len() {
                    1 => positions.iter().next().copied(),
                    _ => None,
                }
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entry(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.accents.len() + self.homographs.len() + self.unresolvable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sizes(&self) -> PartitionSizes {
        PartitionSizes {
            accents: self.accents.len(),
            homographs: self.homographs.len(),
            unresolvable: self.unresolvable.len(),
        }
    }

    /// Net change per partition since the dictionary was loaded.
    pub fn delta(&self) -> SizeDelta {
        SizeDelta::between(self.baseline, self.sizes())
    }

    pub fn is_dirty(&self) -> bool {
        !self.touched.is_empty()
    }

    pub fn touched(&self) -> Partitions {
        self.touched
    }

    pub fn accents(&self) -> impl Iterator<Item = (&str, StressPosition)> {
        self.accents.iter().map(|(word, position)| (word.as_str(), *position))
    }

    pub fn homographs(&self) -> impl Iterator<Item = (&str, &Homograph)> {
        self.homographs.iter().map(|(word, homograph)| (word.as_str(), homograph))
    }

    pub fn unresolvable(&self) -> impl Iterator<Item = (&str, &Unresolvable)> {
        self.unresolvable.iter().map(|(word, entry)| (word.as_str(), entry))
    }

    fn touch(&mut self, partitions: Partitions) {
        self.touched |= partitions;
    }

    /// Called by the store once partitions are loaded.
    pub(crate) fn mark_loaded(&mut self) {
        self.touched = Partitions::empty();
        self.baseline = self.sizes();
    }

    pub(crate) fn mark_saved(&mut self) {
        self.touched = Partitions::empty();
    }
}
