use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use alloc::string::String;
use core::fmt;

use crate::morphology::{MorphFlags, PartOfSpeech};

/// Identity of the grammatical reading that produced an observation.
///
/// Equality and hashing cover the lemma, the part of speech and every tag, so two
/// readings that differ in a single grammeme are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct GrammaticalKey {
    lemma: String,
    pos: PartOfSpeech,
    flags: MorphFlags,
}

impl GrammaticalKey {
    /// Returns `None` for an empty lemma.
    pub fn new(lemma: impl Into<String>, pos: PartOfSpeech, flags: MorphFlags) -> Option<Self> {
        let lemma = lemma.into();
        if lemma.is_empty() {
            return None;
        }
        Some(Self { lemma, pos, flags })
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn pos(&self) -> PartOfSpeech {
        self.pos
    }

    pub fn flags(&self) -> MorphFlags {
        self.flags
    }
}

impl fmt::Display for GrammaticalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lemma, self.pos)?;
        if !self.flags.is_empty() {
            write!(f, " {}", self.flags)?;
        }
        Ok(())
    }
}
