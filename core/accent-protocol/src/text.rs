//! Russian orthography helpers shared by the engine and the producers.

use alloc::string::String;

use crate::position::StressPosition;

/// Combining acute accent placed after a stressed vowel.
pub const COMBINING_ACUTE: char = '\u{0301}';

pub const RUSSIAN_VOWELS: [char; 20] = [
    'а', 'о', 'у', 'э', 'ы', 'и', 'я', 'ё', 'ю', 'е',
    'А', 'О', 'У', 'Э', 'Ы', 'И', 'Я', 'Ё', 'Ю', 'Е',
];

pub fn is_vowel(c: char) -> bool {
    RUSSIAN_VOWELS.contains(&c)
}

pub fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}')
}

pub fn count_vowels(word: &str) -> usize {
    word.chars().filter(|&c| is_vowel(c)).count()
}

/// A word with fewer than two vowels carries no stress information worth storing.
pub fn is_trivial(word: &str) -> bool {
    count_vowels(word) < 2
}

/// Character index of the vowel at `position`.
pub fn vowel_char_index(word: &str, position: StressPosition) -> Option<usize> {
    word.chars()
        .enumerate()
        .filter(|(_, c)| is_vowel(*c))
        .nth(position.index())
        .map(|(i, _)| i)
}

/// Inverse of [`vowel_char_index`]: `None` when `char_index` is not a vowel.
pub fn vowel_index_of_char(word: &str, char_index: usize) -> Option<StressPosition> {
    let mut vowels = 0u8;
    for (i, c) in word.chars().enumerate() {
        if !is_vowel(c) {
            continue;
        }
        if i == char_index {
            return Some(StressPosition(vowels));
        }
        vowels = vowels.checked_add(1)?;
    }
    None
}

pub fn first_vowel(word: &str) -> Option<StressPosition> {
    word.chars().any(is_vowel).then_some(StressPosition(0))
}

pub fn strip_stress(word: &str) -> String {
    word.chars().filter(|&c| c != COMBINING_ACUTE).collect()
}

pub fn has_stress_mark(word: &str) -> bool {
    word.contains(COMBINING_ACUTE) || word.contains('ё') || word.contains('Ё')
}

/// Inserts the combining acute after the vowel at `position`.
pub fn mark_stress(word: &str, position: StressPosition) -> Option<String> {
    let target = vowel_char_index(word, position)?;
    let mut marked = String::with_capacity(word.len() + COMBINING_ACUTE.len_utf8());
    for (i, c) in word.chars().enumerate() {
        marked.push(c);
        if i == target {
            marked.push(COMBINING_ACUTE);
        }
    }
    Some(marked)
}
