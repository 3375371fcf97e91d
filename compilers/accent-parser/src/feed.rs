use accent_dict::{AccentDictionary, PlainOutcome, TaggedOutcome};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::key::parse_key;
use crate::stress::parse_stressed;

/// One line of an observation feed.
///
/// ```json
/// {"form": "сто́ит", "key": "стоить VERB Number=Sing|Person=3"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Word form with its stress marked.
    pub form: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Plain(PlainOutcome),
    Tagged(TaggedOutcome),
}

impl IngestOutcome {
    pub fn is_change(&self) -> bool {
        match self {
            IngestOutcome::Plain(outcome) => outcome.is_change(),
            IngestOutcome::Tagged(outcome) => outcome.is_change(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, IngestOutcome::Plain(outcome) if outcome.is_conflict())
    }

    pub fn is_trivial(&self) -> bool {
        matches!(
            self,
            IngestOutcome::Plain(PlainOutcome::Trivial)
                | IngestOutcome::Tagged(TaggedOutcome::Trivial)
        )
    }
}

/// Routes an observation to `record_tagged` when it has a key, else to `record_plain`.
pub fn ingest(
    dict: &mut AccentDictionary,
    observation: &Observation,
) -> Result<IngestOutcome, ParseError> {
    let stressed = parse_stressed(&observation.form)?;
    let outcome = match &observation.key {
        Some(key) => {
            let key = parse_key(key)?;
            IngestOutcome::Tagged(dict.record_tagged(&stressed.word, key, stressed.position))
        }
        None => IngestOutcome::Plain(dict.record_plain(&stressed.word, stressed.position)),
    };
    tracing::trace!(word = %stressed.word, position = %stressed.position, ?outcome, "ingested");
    Ok(outcome)
}

/// Running totals over a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub observations: usize,
    pub changes: usize,
    pub conflicts: usize,
    pub trivial: usize,
    pub rejected: usize,
}

impl FeedStats {
    pub fn record(&mut self, result: &Result<IngestOutcome, ParseError>) {
        self.observations += 1;
        match result {
            Ok(outcome) => {
                self.changes += usize::from(outcome.is_change());
                self.conflicts += usize::from(outcome.is_conflict());
                self.trivial += usize::from(outcome.is_trivial());
            }
            Err(_) => self.rejected += 1,
        }
    }
}
