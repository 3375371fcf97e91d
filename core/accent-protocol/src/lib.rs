#![no_std] // The engine and producers share these types; keep them alloc-only.

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod key;
pub mod morphology;
pub mod position;
pub mod text;

// Re-export core types for convenience
pub use key::GrammaticalKey;
pub use morphology::*;
pub use position::StressPosition;

pub mod model;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use rkyv::{to_bytes, from_bytes};

    #[test]
    fn test_key_serialization() {
        let original = GrammaticalKey::new(
            "стоить",
            PartOfSpeech::Verb,
            MorphFlags::SINGULAR | MorphFlags::THIRD_PERSON | MorphFlags::PRESENT,
        )
        .expect("non-empty lemma");

        let bytes = to_bytes::<_, 256>(&original).expect("Failed to serialize GrammaticalKey");
        let deserialized: GrammaticalKey =
            from_bytes(&bytes).expect("Failed to deserialize GrammaticalKey");

        assert_eq!(original, deserialized);
        assert_eq!(deserialized.flags(), original.flags());
    }

    #[test]
    fn test_partition_keeps_keyless_reading() {
        let key = GrammaticalKey::new("замок", PartOfSpeech::Noun, MorphFlags::NOMINATIVE).unwrap();
        let partition = HomographPartition::new(alloc::vec![HomographRecord {
            word: "замок".into(),
            positions: alloc::vec![StressPosition(0), StressPosition(1)],
            readings: alloc::vec![
                ReadingRecord { key: None, position: StressPosition(0) },
                ReadingRecord { key: Some(key), position: StressPosition(1) },
            ],
        }]);

        let bytes = to_bytes::<_, 1024>(&partition).expect("Failed to serialize partition");
        let restored: HomographPartition =
            from_bytes(&bytes).expect("Failed to deserialize partition");

        assert_eq!(restored.version, FORMAT_VERSION);
        assert_eq!(restored, partition);
    }

    #[test]
    fn test_position_layout() {
        assert_eq!(core::mem::size_of::<StressPosition>(), 1);
    }

    #[test]
    fn test_keys_differ_by_single_tag() {
        let third = MorphFlags::THIRD_PERSON;
        let a = GrammaticalKey::new("стоить", PartOfSpeech::Verb, third).unwrap();
        let b = GrammaticalKey::new("стоить", PartOfSpeech::Verb, third | MorphFlags::SINGULAR)
            .unwrap();
        assert_ne!(a, b);
        assert!(GrammaticalKey::new("", PartOfSpeech::Noun, MorphFlags::empty()).is_none());
    }

    #[test]
    fn test_key_display() {
        let key = GrammaticalKey::new(
            "стоить",
            PartOfSpeech::Verb,
            MorphFlags::THIRD_PERSON | MorphFlags::SINGULAR,
        )
        .unwrap();
        assert_eq!(alloc::format!("{}", key), "стоить VERB Number=Sing|Person=3");
    }

    #[test]
    fn test_feature_tables() {
        assert_eq!(MorphFlags::from_ud_feature("Case", "Gen"), Some(MorphFlags::GENITIVE));
        assert_eq!(MorphFlags::from_ud_feature("Case", "Xyz"), None);
        assert_eq!(MorphFlags::from_opencorpora("loc2"), Some(MorphFlags::LOCATIVE2));
        assert_eq!(
            PartOfSpeech::from_opencorpora("ADJS"),
            Some((PartOfSpeech::Adjective, MorphFlags::SHORT))
        );
        assert_eq!(PartOfSpeech::from_ud("SCONJ"), Some(PartOfSpeech::Conjunction));
    }

    #[test]
    fn test_vowel_indexing() {
        use text::*;
        assert_eq!(count_vowels("стоит"), 2);
        assert!(is_trivial("дом"));
        assert!(!is_trivial("замок"));
        assert_eq!(vowel_char_index("стоит", StressPosition(1)), Some(3));
        assert_eq!(vowel_index_of_char("стоит", 3), Some(StressPosition(1)));
        assert_eq!(vowel_index_of_char("стоит", 1), None);
        assert_eq!(mark_stress("замок", StressPosition(0)).as_deref(), Some("за\u{301}мок"));
        assert_eq!(mark_stress("замок", StressPosition(5)), None);
        assert_eq!(strip_stress("за\u{301}мок"), "замок");
    }
}
