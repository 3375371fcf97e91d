pub mod error;
pub mod feed;
pub mod key;
pub mod parser;
pub mod stress;
pub mod token;

pub use error::ParseError;
pub use feed::{ingest, FeedStats, IngestOutcome, Observation};
pub use key::parse_key;
pub use stress::{parse_stressed, StressedWord};

use accent_dict::AccentDictionary;
use accent_protocol::text::{count_vowels, first_vowel, has_stress_mark, mark_stress};
use accent_protocol::StressPosition;
use crate::token::{Token, TokenKind};
use crate::parser::{parse_with_spans, RawToken};

/// Places stress marks on running text using the dictionary.
pub struct Accentizer<'a> {
    dict: &'a AccentDictionary,
    single_vowel: bool,
}

impl<'a> Accentizer<'a> {
    pub fn new(dict: &'a AccentDictionary) -> Self {
        Self { dict, single_vowel: false }
    }

    /// Also mark words with a single vowel (off by default: their stress is obvious).
    pub fn with_single_vowel(mut self, single_vowel: bool) -> Self {
        self.single_vowel = single_vowel;
        self
    }

    /// The stress to mark on `word`, if any.
    ///
    /// Words that already carry a mark or `ё` are left alone. Homographs get no mark
    /// because running text carries no grammatical key.
    pub fn stress_of(&self, word: &str) -> Option<StressPosition> {
        if has_stress_mark(word) {
            return None;
        }

        match count_vowels(word) {
            0 => None,
            1 if self.single_vowel => first_vowel(word),
            1 => None,
            _ => self.dict.stress(word, None).or_else(|| {
                // Capitalised sentence starts are stored in lowercase.
                let lower = word.to_lowercase();
                if lower == word {
                    return None;
                }
                self.dict.stress(&lower, None)
            }),
        }
    }

    /// Primary entry point: Text -> Classified Tokens
    pub fn tokenize<'t>(&self, input: &'t str) -> Vec<Token<'t>> {
        parse_with_spans(input)
            .into_iter()
            .map(|(span, raw)| {
                let text = &input[span.start..span.end];

                let kind = match raw {
                    RawToken::Other(_) => TokenKind::Other,
                    RawToken::Word(word) if has_stress_mark(word) => TokenKind::Marked,
                    RawToken::Word(word) => match self.stress_of(word) {
                        Some(position) => TokenKind::Stressed(position),
                        None => TokenKind::Unknown,
                    },
                };

                Token { span, text, kind }
            })
            .collect()
    }

    /// Returns `input` with a combining acute after every stressed vowel it can resolve.
    pub fn accentize(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len() + input.len() / 4);
        for (span, raw) in parse_with_spans(input) {
            let text = &input[span.start..span.end];
            let marked = match raw {
                RawToken::Word(word) => self
                    .stress_of(word)
                    .and_then(|position| mark_stress(word, position)),
                RawToken::Other(_) => None,
            };
            output.push_str(marked.as_deref().unwrap_or(text));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accent_protocol::{GrammaticalKey, MorphFlags, PartOfSpeech};

    fn dictionary() -> AccentDictionary {
        let verb = |lemma: &str| {
            GrammaticalKey::new(lemma, PartOfSpeech::Verb, MorphFlags::THIRD_PERSON).unwrap()
        };
        let mut dict = AccentDictionary::new();
        dict.record_plain("замок", StressPosition(0));
        dict.record_plain("окно", StressPosition(1));
        dict.record_tagged("стоит", verb("стоять"), StressPosition(1));
        dict.record_tagged("стоит", verb("стоить"), StressPosition(0));
        dict
    }

    #[test]
    fn test_accentizer_integration() {
        let dict = dictionary();
        let accentizer = Accentizer::new(&dict);
        let input = "Замок стоит у окна, окно ждёт.";
        assert_eq!(
            accentizer.accentize(input),
            "За\u{301}мок стоит у окна, окно\u{301} ждёт."
        );
    }

    #[test]
    fn test_tokenizer_integration() {
        let dict = dictionary();
        let accentizer = Accentizer::new(&dict);
        let tokens = accentizer.tokenize("замок стоит ёж");

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].text, "замок");
        assert_eq!(tokens[0].kind, TokenKind::Stressed(StressPosition(0)));
        assert_eq!(tokens[1].kind, TokenKind::Other);
        // Homograph without a key stays unmarked
        assert_eq!(tokens[2].kind, TokenKind::Unknown);
        assert_eq!(tokens[4].kind, TokenKind::Marked);
    }

    #[test]
    fn test_single_vowel_option() {
        let dict = AccentDictionary::new();
        assert_eq!(Accentizer::new(&dict).stress_of("дом"), None);
        let accentizer = Accentizer::new(&dict).with_single_vowel(true);
        assert_eq!(accentizer.stress_of("дом"), Some(StressPosition(0)));
        assert_eq!(accentizer.accentize("в дом"), "в до\u{301}м");
    }
}
