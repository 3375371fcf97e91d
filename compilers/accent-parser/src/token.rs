use accent_protocol::StressPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A word whose stress the dictionary knows unambiguously
    Stressed(StressPosition),
    /// Already carries a stress mark or `ё`
    Marked,
    /// A word that is missing from the dictionary or ambiguous without grammar
    Unknown,
    /// Whitespace, punctuation, digits, Latin text
    Other,
}

#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub span: Span,
    pub text: &'a str,
    pub kind: TokenKind,
}
