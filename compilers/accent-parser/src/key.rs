use accent_protocol::{GrammaticalKey, MorphFlags, PartOfSpeech};
use nom::{
    bytes::complete::{take_till1, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

use crate::error::ParseError;

fn field(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric())(input)
}

/// `lemma POS [TAGS]`, surrounding whitespace allowed.
fn key_fields(input: &str) -> IResult<&str, (&str, &str, Option<&str>)> {
    all_consuming(delimited(
        multispace0,
        tuple((field, preceded(multispace1, field), opt(preceded(multispace1, field)))),
        multispace0,
    ))(input)
}

/// `Case=Gen|Number=Sing`
fn ud_features(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    all_consuming(separated_list1(char('|'), separated_pair(name, char('='), name)))(input)
}

/// `gent,sing`
fn grammemes(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char(','), name))(input)
}

fn opencorpora_flags(list: &str) -> Result<MorphFlags, ParseError> {
    let (_, grammemes) = grammemes(list).map_err(|_| ParseError::UnknownTag(list.to_owned()))?;
    grammemes.into_iter().try_fold(MorphFlags::empty(), |flags, grammeme| {
        MorphFlags::from_opencorpora(grammeme)
            .map(|flag| flags | flag)
            .ok_or_else(|| ParseError::UnknownTag(grammeme.to_owned()))
    })
}

/// The part-of-speech field, optionally followed by OpenCorpora grammemes
/// (`NOUN,inan,masc`).
fn part_of_speech(field: &str) -> Result<(PartOfSpeech, MorphFlags), ParseError> {
    let (label, rest) = match field.split_once(',') {
        Some((label, rest)) => (label, Some(rest)),
        None => (field, None),
    };
    let (pos, mut flags) = match PartOfSpeech::from_ud(label) {
        Some(pos) => (pos, MorphFlags::empty()),
        None => PartOfSpeech::from_opencorpora(label)
            .ok_or_else(|| ParseError::UnknownPos(label.to_owned()))?,
    };
    if let Some(rest) = rest {
        flags |= opencorpora_flags(rest)?;
    }
    Ok((pos, flags))
}

fn tag_flags(tags: &str) -> Result<MorphFlags, ParseError> {
    if !tags.contains('=') {
        return opencorpora_flags(tags);
    }
    let (_, features) = ud_features(tags).map_err(|_| ParseError::UnknownTag(tags.to_owned()))?;
    features.into_iter().try_fold(MorphFlags::empty(), |flags, (name, value)| {
        MorphFlags::from_ud_feature(name, value)
            .map(|flag| flags | flag)
            .ok_or_else(|| ParseError::UnknownTag(format!("{}={}", name, value)))
    })
}

/// Parses a grammatical key written as `LEMMA POS [TAGS]`.
///
/// `POS` is a Universal Dependencies or OpenCorpora label; `TAGS` is either UD
/// features (`Number=Sing|Person=3`) or OpenCorpora grammemes (`sing,3per`).
pub fn parse_key(text: &str) -> Result<GrammaticalKey, ParseError> {
    let (_, (lemma, pos_field, tags)) =
        key_fields(text).map_err(|_| ParseError::MalformedKey(text.to_owned()))?;

    let (pos, mut flags) = part_of_speech(pos_field)?;
    if let Some(tags) = tags {
        flags |= tag_flags(tags)?;
    }

    GrammaticalKey::new(lemma, pos, flags).ok_or_else(|| ParseError::MalformedKey(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ud_key() {
        let key = parse_key("стоить VERB Aspect=Imp|Number=Sing|Person=3").unwrap();
        assert_eq!(key.lemma(), "стоить");
        assert_eq!(key.pos(), PartOfSpeech::Verb);
        assert_eq!(
            key.flags(),
            MorphFlags::IMPERFECTIVE | MorphFlags::SINGULAR | MorphFlags::THIRD_PERSON
        );
    }

    #[test]
    fn test_opencorpora_key() {
        let key = parse_key("  замок NOUN,inan,masc sing,gent ").unwrap();
        assert_eq!(key.pos(), PartOfSpeech::Noun);
        assert_eq!(
            key.flags(),
            MorphFlags::INANIMATE
                | MorphFlags::MASCULINE
                | MorphFlags::SINGULAR
                | MorphFlags::GENITIVE
        );

        let short = parse_key("хороший ADJS sing,femn").unwrap();
        assert_eq!(short.pos(), PartOfSpeech::Adjective);
        assert!(short.flags().contains(MorphFlags::SHORT));
    }

    #[test]
    fn test_lemma_and_pos_only() {
        let key = parse_key("мука NOUN").unwrap();
        assert!(key.flags().is_empty());
    }

    #[test]
    fn test_same_text_same_key() {
        assert_eq!(
            parse_key("мука NOUN Case=Nom").unwrap(),
            parse_key("мука NOUN nomn").unwrap()
        );
        assert_ne!(
            parse_key("мука NOUN Case=Nom").unwrap(),
            parse_key("мука NOUN Case=Gen").unwrap()
        );
    }

    #[test]
    fn test_rejections() {
        assert_eq!(parse_key("мука"), Err(ParseError::MalformedKey("мука".into())));
        assert_eq!(
            parse_key("мука NOUN a b"),
            Err(ParseError::MalformedKey("мука NOUN a b".into()))
        );
        assert_eq!(parse_key("мука THING"), Err(ParseError::UnknownPos("THING".into())));
        assert_eq!(parse_key("мука NOUN Case=Xyz"), Err(ParseError::UnknownTag("Case=Xyz".into())));
        assert_eq!(parse_key("мука NOUN Sgtm"), Err(ParseError::UnknownTag("Sgtm".into())));
        assert_eq!(parse_key("мука NOUN Case="), Err(ParseError::UnknownTag("Case=".into())));
    }
}
