use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum PartOfSpeech {
    Noun = 0,
    ProperNoun = 1,
    Adjective = 2,
    Verb = 3,
    Auxiliary = 4,
    Adverb = 5,
    Pronoun = 6,
    Determiner = 7,
    Numeral = 8,
    Particle = 9,
    Adposition = 10,
    Conjunction = 11,
    Interjection = 12,
    Predicative = 13,
}

impl PartOfSpeech {
    /// Universal Dependencies label (`NOUN`, `ADJ`, ...).
    pub const fn ud_label(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::ProperNoun => "PROPN",
            PartOfSpeech::Adjective => "ADJ",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Auxiliary => "AUX",
            PartOfSpeech::Adverb => "ADV",
            PartOfSpeech::Pronoun => "PRON",
            PartOfSpeech::Determiner => "DET",
            PartOfSpeech::Numeral => "NUM",
            PartOfSpeech::Particle => "PART",
            PartOfSpeech::Adposition => "ADP",
            PartOfSpeech::Conjunction => "CCONJ",
            PartOfSpeech::Interjection => "INTJ",
            PartOfSpeech::Predicative => "PRED",
        }
    }

    pub fn from_ud(label: &str) -> Option<Self> {
        let pos = match label {
            "NOUN" => PartOfSpeech::Noun,
            "PROPN" => PartOfSpeech::ProperNoun,
            "ADJ" => PartOfSpeech::Adjective,
            "VERB" => PartOfSpeech::Verb,
            "AUX" => PartOfSpeech::Auxiliary,
            "ADV" => PartOfSpeech::Adverb,
            "PRON" => PartOfSpeech::Pronoun,
            "DET" => PartOfSpeech::Determiner,
            "NUM" => PartOfSpeech::Numeral,
            "PART" => PartOfSpeech::Particle,
            "ADP" => PartOfSpeech::Adposition,
            "CCONJ" | "SCONJ" => PartOfSpeech::Conjunction,
            "INTJ" => PartOfSpeech::Interjection,
            "PRED" => PartOfSpeech::Predicative,
            _ => return None,
        };
        Some(pos)
    }

    /// OpenCorpora label. Some labels fold a grammeme into the part of speech
    /// (`ADJS` is a short adjective, `GRND` a converb), which is returned as flags.
    pub fn from_opencorpora(label: &str) -> Option<(Self, MorphFlags)> {
        let parsed = match label {
            "NOUN" => (PartOfSpeech::Noun, MorphFlags::empty()),
            "ADJF" => (PartOfSpeech::Adjective, MorphFlags::empty()),
            "ADJS" => (PartOfSpeech::Adjective, MorphFlags::SHORT),
            "COMP" => (PartOfSpeech::Adjective, MorphFlags::COMPARATIVE),
            "VERB" => (PartOfSpeech::Verb, MorphFlags::empty()),
            "INFN" => (PartOfSpeech::Verb, MorphFlags::INFINITIVE),
            "PRTF" => (PartOfSpeech::Verb, MorphFlags::PARTICIPLE),
            "PRTS" => (PartOfSpeech::Verb, MorphFlags::PARTICIPLE | MorphFlags::SHORT),
            "GRND" => (PartOfSpeech::Verb, MorphFlags::CONVERB),
            "NUMR" => (PartOfSpeech::Numeral, MorphFlags::empty()),
            "ADVB" => (PartOfSpeech::Adverb, MorphFlags::empty()),
            "NPRO" => (PartOfSpeech::Pronoun, MorphFlags::empty()),
            "PRED" => (PartOfSpeech::Predicative, MorphFlags::empty()),
            "PREP" => (PartOfSpeech::Adposition, MorphFlags::empty()),
            "CONJ" => (PartOfSpeech::Conjunction, MorphFlags::empty()),
            "PRCL" => (PartOfSpeech::Particle, MorphFlags::empty()),
            "INTJ" => (PartOfSpeech::Interjection, MorphFlags::empty()),
            _ => return None,
        };
        Some(parsed)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ud_label())
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct MorphFlags: u32 {
        // Case (Bits 0-7)
        const NOMINATIVE = 1;
        const GENITIVE = 1 << 1;
        const DATIVE = 1 << 2;
        const ACCUSATIVE = 1 << 3;
        const INSTRUMENTAL = 1 << 4;
        const LOCATIVE = 1 << 5;
        const PARTITIVE = 1 << 6;
        const LOCATIVE2 = 1 << 7;

        // Gender (Bits 8-10)
        const MASCULINE = 1 << 8;
        const FEMININE = 1 << 9;
        const NEUTER = 1 << 10;

        // Animacy (Bits 11-12)
        const ANIMATE = 1 << 11;
        const INANIMATE = 1 << 12;

        // Number (Bits 13-14)
        const SINGULAR = 1 << 13;
        const PLURAL = 1 << 14;

        // Degree (Bits 15-17)
        const POSITIVE = 1 << 15;
        const COMPARATIVE = 1 << 16;
        const SUPERLATIVE = 1 << 17;

        // Tense (Bits 18-20)
        const PAST = 1 << 18;
        const PRESENT = 1 << 19;
        const FUTURE = 1 << 20;

        // Person (Bits 21-23)
        const FIRST_PERSON = 1 << 21;
        const SECOND_PERSON = 1 << 22;
        const THIRD_PERSON = 1 << 23;

        // Aspect (Bits 24-25)
        const PERFECTIVE = 1 << 24;
        const IMPERFECTIVE = 1 << 25;

        // Variant / VerbForm (Bits 26-29)
        const SHORT = 1 << 26;
        const INFINITIVE = 1 << 27;
        const PARTICIPLE = 1 << 28;
        const CONVERB = 1 << 29;

        // Voice (Bits 30-31)
        const ACTIVE = 1 << 30;
        const PASSIVE = 1 << 31;
    }
}

/// UD feature table: `(feature name, value, flag)`.
const UD_FEATURES: &[(&str, &str, MorphFlags)] = &[
    ("Case", "Nom", MorphFlags::NOMINATIVE),
    ("Case", "Gen", MorphFlags::GENITIVE),
    ("Case", "Dat", MorphFlags::DATIVE),
    ("Case", "Acc", MorphFlags::ACCUSATIVE),
    ("Case", "Ins", MorphFlags::INSTRUMENTAL),
    ("Case", "Loc", MorphFlags::LOCATIVE),
    ("Case", "Par", MorphFlags::PARTITIVE),
    ("Case", "Loc2", MorphFlags::LOCATIVE2),
    ("Gender", "Masc", MorphFlags::MASCULINE),
    ("Gender", "Fem", MorphFlags::FEMININE),
    ("Gender", "Neut", MorphFlags::NEUTER),
    ("Animacy", "Anim", MorphFlags::ANIMATE),
    ("Animacy", "Inan", MorphFlags::INANIMATE),
    ("Number", "Sing", MorphFlags::SINGULAR),
    ("Number", "Plur", MorphFlags::PLURAL),
    ("Degree", "Pos", MorphFlags::POSITIVE),
    ("Degree", "Cmp", MorphFlags::COMPARATIVE),
    ("Degree", "Sup", MorphFlags::SUPERLATIVE),
    ("Tense", "Past", MorphFlags::PAST),
    ("Tense", "Pres", MorphFlags::PRESENT),
    ("Tense", "Fut", MorphFlags::FUTURE),
    ("Person", "1", MorphFlags::FIRST_PERSON),
    ("Person", "2", MorphFlags::SECOND_PERSON),
    ("Person", "3", MorphFlags::THIRD_PERSON),
    ("Aspect", "Perf", MorphFlags::PERFECTIVE),
    ("Aspect", "Imp", MorphFlags::IMPERFECTIVE),
    ("Variant", "Short", MorphFlags::SHORT),
    ("VerbForm", "Inf", MorphFlags::INFINITIVE),
    ("VerbForm", "Part", MorphFlags::PARTICIPLE),
    ("VerbForm", "Conv", MorphFlags::CONVERB),
    ("Voice", "Act", MorphFlags::ACTIVE),
    ("Voice", "Pass", MorphFlags::PASSIVE),
];

/// OpenCorpora grammemes that carry an inflectional tag.
const OPENCORPORA_GRAMMEMES: &[(&str, MorphFlags)] = &[
    ("nomn", MorphFlags::NOMINATIVE),
    ("gent", MorphFlags::GENITIVE),
    ("datv", MorphFlags::DATIVE),
    ("accs", MorphFlags::ACCUSATIVE),
    ("ablt", MorphFlags::INSTRUMENTAL),
    ("loct", MorphFlags::LOCATIVE),
    ("gen2", MorphFlags::PARTITIVE),
    ("loc2", MorphFlags::LOCATIVE2),
    ("masc", MorphFlags::MASCULINE),
    ("femn", MorphFlags::FEMININE),
    ("neut", MorphFlags::NEUTER),
    ("anim", MorphFlags::ANIMATE),
    ("inan", MorphFlags::INANIMATE),
    ("sing", MorphFlags::SINGULAR),
    ("plur", MorphFlags::PLURAL),
    ("Supr", MorphFlags::SUPERLATIVE),
    ("past", MorphFlags::PAST),
    ("pres", MorphFlags::PRESENT),
    ("futr", MorphFlags::FUTURE),
    ("1per", MorphFlags::FIRST_PERSON),
    ("2per", MorphFlags::SECOND_PERSON),
    ("3per", MorphFlags::THIRD_PERSON),
    ("perf", MorphFlags::PERFECTIVE),
    ("impf", MorphFlags::IMPERFECTIVE),
    ("actv", MorphFlags::ACTIVE),
    ("pssv", MorphFlags::PASSIVE),
];

impl MorphFlags {
    /// Looks up a single UD feature such as `Case=Gen`.
    pub fn from_ud_feature(name: &str, value: &str) -> Option<MorphFlags> {
        UD_FEATURES
            .iter()
            .find(|(n, v, _)| *n == name && *v == value)
            .map(|(_, _, flag)| *flag)
    }

    pub fn from_opencorpora(grammeme: &str) -> Option<MorphFlags> {
        OPENCORPORA_GRAMMEMES
            .iter()
            .find(|(g, _)| *g == grammeme)
            .map(|(_, flag)| *flag)
    }

    /// Iterates the set flags as UD `(name, value)` pairs, in table order.
    pub fn ud_features(self) -> impl Iterator<Item = (&'static str, &'static str)> {
        UD_FEATURES
            .iter()
            .filter(move |(_, _, flag)| self.contains(*flag))
            .map(|(name, value, _)| (*name, *value))
    }
}

impl fmt::Display for MorphFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.ud_features().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

// rkyv support for MorphFlags
impl Archive for MorphFlags {
    type Archived = u32;
    type Resolver = ();

    unsafe fn resolve(&self, _pos: usize, _resolver: Self::Resolver, out: *mut Self::Archived) {
        out.write(self.bits());
    }
}

impl<S: rkyv::Fallible + ?Sized> Serialize<S> for MorphFlags {
    fn serialize(&self, _serializer: &mut S) -> Result<Self::Resolver, S::Error> {
        Ok(())
    }
}

impl<D: rkyv::Fallible + ?Sized> Deserialize<MorphFlags, D> for u32 {
    fn deserialize(&self, _deserializer: &mut D) -> Result<MorphFlags, D::Error> {
        Ok(MorphFlags::from_bits_retain(*self))
    }
}
