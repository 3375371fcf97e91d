use accent_protocol::{GrammaticalKey, StressPosition};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// The grammatical reading a recorded position belongs to.
///
/// `Unkeyed` only appears after a key-less `Resolved` entry was promoted by a
/// tagged observation; it holds the position the plain evidence committed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reading {
    Unkeyed,
    Tagged(GrammaticalKey),
}

impl Reading {
    pub fn key(&self) -> Option<&GrammaticalKey> {
        match self {
            Reading::Unkeyed => None,
            Reading::Tagged(key) => Some(key),
        }
    }
}

impl From<Option<GrammaticalKey>> for Reading {
    fn from(key: Option<GrammaticalKey>) -> Self {
        key.map_or(Reading::Unkeyed, Reading::Tagged)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Unkeyed => f.write_str("<unkeyed>"),
            Reading::Tagged(key) => write!(f, "{}", key),
        }
    }
}

/// A word form whose stress is fixed once the grammatical reading is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homograph {
    pub(crate) positions: BTreeSet<StressPosition>,
    pub(crate) by_reading: HashMap<Reading, StressPosition>,
}

impl Homograph {
    pub(crate) fn seeded(readings: impl IntoIterator<Item = (Reading, StressPosition)>) -> Self {
        let mut homograph = Self { positions: BTreeSet::new(), by_reading: HashMap::new() };
        for (reading, position) in readings {
            homograph.positions.insert(position);
            homograph.by_reading.insert(reading, position);
        }
        homograph
    }

    /// Union of every reading's position.
    pub fn positions(&self) -> &BTreeSet<StressPosition> {
        &self.positions
    }

    pub fn readings(&self) -> impl Iterator<Item = (&Reading, StressPosition)> {
        self.by_reading.iter().map(|(reading, position)| (reading, *position))
    }

    pub fn position_for(&self, key: &GrammaticalKey) -> Option<StressPosition> {
        self.by_reading.get(&Reading::Tagged(key.clone())).copied()
    }

    /// A homograph whose readings all agree is a candidate for compaction.
    pub fn is_degenerate(&self) -> bool {
        self.positions.len() == 1
    }
}

/// A word form that stays ambiguous even when the grammatical reading is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolvable {
    pub(crate) positions: BTreeSet<StressPosition>,
    pub(crate) by_reading: HashMap<Reading, BTreeSet<StressPosition>>,
}

impl Unresolvable {
    pub fn positions(&self) -> &BTreeSet<StressPosition> {
        &self.positions
    }

    pub fn readings(&self) -> impl Iterator<Item = (&Reading, &BTreeSet<StressPosition>)> {
        self.by_reading.iter()
    }

    pub fn positions_for(&self, key: &GrammaticalKey) -> Option<&BTreeSet<StressPosition>> {
        self.by_reading.get(&Reading::Tagged(key.clone()))
    }

    /// Adds `position` under `reading`. Returns `false` if it was already known.
    pub(crate) fn grow(&mut self, reading: Reading, position: StressPosition) -> bool {
        let set = self.by_reading.entry(reading).or_default();
        if !set.insert(position) {
            return false;
        }
        self.positions.insert(position);
        true
    }
}

impl From<Homograph> for Unresolvable {
    /// Every single position becomes a singleton set; nothing is dropped.
    fn from(homograph: Homograph) -> Self {
        Self {
            positions: homograph.positions,
            by_reading: homograph
                .by_reading
                .into_iter()
                .map(|(reading, position)| (reading, BTreeSet::from([position])))
                .collect(),
        }
    }
}

/// Borrowed view of a word form's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Resolved(StressPosition),
    Homograph(&'a Homograph),
    Unresolvable(&'a Unresolvable),
}

impl Entry<'_> {
    pub fn state(&self) -> EntryState {
        match self {
            Entry::Resolved(_) => EntryState::Resolved,
            Entry::Homograph(_) => EntryState::Homograph,
            Entry::Unresolvable(_) => EntryState::Unresolvable,
        }
    }

    /// All stress positions known for the word form.
    pub fn positions(&self) -> BTreeSet<StressPosition> {
        match self {
            Entry::Resolved(position) => BTreeSet::from([*position]),
            Entry::Homograph(homograph) => homograph.positions.clone(),
            Entry::Unresolvable(unresolvable) => unresolvable.positions.clone(),
        }
    }
}

/// Level in the ambiguity lattice. Ordered `Resolved < Homograph < Unresolvable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryState {
    Resolved,
    Homograph,
    Unresolvable,
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryState::Resolved => "resolved",
            EntryState::Homograph => "homograph",
            EntryState::Unresolvable => "unresolvable",
        };
        f.write_str(name)
    }
}
