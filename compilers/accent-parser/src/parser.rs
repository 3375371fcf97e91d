use accent_protocol::text::{is_cyrillic, COMBINING_ACUTE};
use nom::{
    branch::alt,
    bytes::complete::{take_till1, take_while1},
    character::complete::char,
    combinator::{map, recognize},
    multi::separated_list1,
    IResult,
};
use crate::token::Span;

/// Predicate to define what constitutes a Russian word character.
/// The combining acute stays inside the word it marks.
fn is_word_char(c: char) -> bool {
    is_cyrillic(c) || c == COMBINING_ACUTE
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken<'a> {
    Word(&'a str),
    Other(&'a str),
}

/// Word runs, hyphenated compounds included (`кто-то`).
fn word(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(char('-'), take_while1(is_word_char)))(input)
}

/// Splits `original_input` into words and the text between them. Concatenating the
/// token texts reproduces the input exactly.
pub fn parse_with_spans(original_input: &str) -> Vec<(Span, RawToken<'_>)> {
    let mut input = original_input;
    let mut result = Vec::new();

    while !input.is_empty() {
        let parse_res: IResult<&str, RawToken> = alt((
            map(word, RawToken::Word),
            map(take_till1(is_word_char), RawToken::Other),
        ))(input);

        match parse_res {
            Ok((next_input, token)) => {
                let len = input.len() - next_input.len();
                let start = original_input.len() - input.len();

                result.push((Span::new(start, start + len), token));
                input = next_input;
            }
            Err(_) => {
                // Skip one char to recover (resilient parsing)
                let Some(c) = input.chars().next() else {
                    break;
                };
                let start = original_input.len() - input.len();
                let len = c.len_utf8();
                result.push((Span::new(start, start + len), RawToken::Other(&input[..len])));
                input = &input[len..];
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<RawToken<'_>> {
        parse_with_spans(input).into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            texts("Замок стоит, кто-то ждёт."),
            vec![
                RawToken::Word("Замок"),
                RawToken::Other(" "),
                RawToken::Word("стоит"),
                RawToken::Other(", "),
                RawToken::Word("кто-то"),
                RawToken::Other(" "),
                RawToken::Word("ждёт"),
                RawToken::Other("."),
            ]
        );
    }

    #[test]
    fn test_stress_mark_stays_in_word() {
        assert_eq!(texts("за\u{301}мок"), vec![RawToken::Word("за\u{301}мок")]);
    }

    #[test]
    fn test_spans_cover_input() {
        let input = "Hello, мир - 42 раза!";
        let tokens = parse_with_spans(input);
        let rebuilt: String = tokens.iter().map(|(span, _)| &input[span.start..span.end]).collect();
        assert_eq!(rebuilt, input);
        assert!(tokens.contains(&(Span::new(7, 13), RawToken::Word("мир"))));
        assert!(tokens.iter().any(|(_, t)| *t == RawToken::Other(" - 42 ")));
    }
}
