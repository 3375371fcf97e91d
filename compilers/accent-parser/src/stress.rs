use accent_protocol::text::{is_cyrillic, is_vowel, COMBINING_ACUTE};
use accent_protocol::StressPosition;

use crate::error::ParseError;

/// A word form split into its unmarked spelling and stress position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressedWord {
    pub word: String,
    pub position: StressPosition,
}

/// Parses a word written with a combining acute after its stressed vowel, such as
/// `сто́ит`. A word with `ё` and no acute is stressed on the `ё`; a word with a single
/// vowel needs no mark at all.
pub fn parse_stressed(form: &str) -> Result<StressedWord, ParseError> {
    let form = form.trim();
    let mut word = String::with_capacity(form.len());
    let mut vowels: u8 = 0;
    let mut previous_vowel: Option<u8> = None;
    let mut acute: Option<u8> = None;
    let mut yo: Option<u8> = None;

    for c in form.chars() {
        if c == COMBINING_ACUTE {
            let Some(index) = previous_vowel.take() else {
                return Err(ParseError::MisplacedMark(form.to_owned()));
            };
            if acute.replace(index).is_some() {
                return Err(ParseError::MultipleMarks(form.to_owned()));
            }
            continue;
        }

        if !(is_cyrillic(c) || c == '-') {
            return Err(ParseError::InvalidCharacter { form: form.to_owned(), found: c });
        }

        if is_vowel(c) {
            if matches!(c, 'ё' | 'Ё') && yo.is_none() {
                yo = Some(vowels);
            }
            previous_vowel = Some(vowels);
            vowels = vowels
                .checked_add(1)
                .ok_or_else(|| ParseError::InvalidCharacter { form: form.to_owned(), found: c })?;
        } else {
            previous_vowel = None;
        }
        word.push(c);
    }

    if word.is_empty() {
        return Err(ParseError::EmptyWord);
    }

    let position = acute
        .or(yo)
        .or((vowels == 1).then_some(0))
        .ok_or_else(|| ParseError::Unstressed(form.to_owned()))?;

    Ok(StressedWord { word, position: StressPosition(position) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(form: &str) -> (String, u8) {
        let stressed = parse_stressed(form).unwrap();
        (stressed.word, stressed.position.0)
    }

    #[test]
    fn test_acute_marks_vowel_index() {
        assert_eq!(parsed("сто\u{301}ит"), ("стоит".to_string(), 0));
        assert_eq!(parsed("стои\u{301}т"), ("стоит".to_string(), 1));
        assert_eq!(parsed(" за\u{301}мок "), ("замок".to_string(), 0));
    }

    #[test]
    fn test_yo_is_stressed() {
        assert_eq!(parsed("ежёвый"), ("ежёвый".to_string(), 1));
        // An explicit acute wins over a secondary ё.
        assert_eq!(parsed("трёхэта\u{301}жный"), ("трёхэтажный".to_string(), 2));
    }

    #[test]
    fn test_single_vowel_needs_no_mark() {
        assert_eq!(parsed("дом"), ("дом".to_string(), 0));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(parse_stressed(""), Err(ParseError::EmptyWord));
        assert_eq!(parse_stressed("замок"), Err(ParseError::Unstressed("замок".into())));
        assert_eq!(
            parse_stressed("\u{301}замок"),
            Err(ParseError::MisplacedMark("\u{301}замок".into()))
        );
        assert_eq!(
            parse_stressed("зам\u{301}ок"),
            Err(ParseError::MisplacedMark("зам\u{301}ок".into()))
        );
        assert_eq!(
            parse_stressed("за\u{301}мо\u{301}к"),
            Err(ParseError::MultipleMarks("за\u{301}мо\u{301}к".into()))
        );
        assert!(matches!(
            parse_stressed("castle"),
            Err(ParseError::InvalidCharacter { found: 'c', .. })
        ));
    }
}
