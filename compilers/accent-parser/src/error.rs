/// Rejections at the producer boundary. A rejected observation never reaches the
/// dictionary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty word form")]
    EmptyWord,

    #[error("unexpected character {found:?} in '{form}'")]
    InvalidCharacter { form: String, found: char },

    #[error("stress mark not after a vowel in '{0}'")]
    MisplacedMark(String),

    #[error("more than one stress mark in '{0}'")]
    MultipleMarks(String),

    #[error("no stress mark in '{0}'")]
    Unstressed(String),

    #[error("malformed grammatical key '{0}'")]
    MalformedKey(String),

    #[error("unknown part of speech '{0}'")]
    UnknownPos(String),

    #[error("unknown tag '{0}'")]
    UnknownTag(String),
}
