//! Combining a node's ancestor descriptions into one readable label.

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "into", "nor", "of", "on",
    "or", "the", "to", "with", "not", "elsewhere", "specified", "included", "other", "than",
];

const ROMAN_NUMERALS: &[&str] =
    &["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII"];

/// Joins ancestor descriptions (root first) with the node's own description.
///
/// Blank entries are dropped, leading runs of whitespace, hyphens and colons
/// are stripped, and the result is title-cased by [`normalize_capitalization`].
#[must_use]
pub fn combine_nested_descriptions<S: AsRef<str>>(ancestors: &[S], current: &str) -> String {
    let cleaned: Vec<&str> = ancestors
        .iter()
        .map(AsRef::<str>::as_ref)
        .chain(std::iter::once(current))
        .map(|desc| desc.trim_start_matches(|c: char| c.is_whitespace() || c == '-' || c == ':'))
        .map(str::trim)
        .filter(|desc| !desc.is_empty())
        .collect();

    if cleaned.is_empty() {
        return String::new();
    }
    normalize_capitalization(&cleaned.join(" "))
}

/// Title-cases `text` while keeping stop words lowercase and Roman numerals uppercase.
///
/// Stop words are only lowercased mid-sentence: the first word and the word
/// after a colon or semicolon are always capitalized.
#[must_use]
pub fn normalize_capitalization(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut capitalize_next = true;

    for token in tokenize(text) {
        match token {
            Token::Space(s) => out.push_str(s),
            Token::Punct(s) => {
                out.push_str(s);
                if s.contains([':', ';']) {
                    capitalize_next = true;
                }
            }
            Token::Word(word) => {
                let upper = word.to_uppercase();
                if ROMAN_NUMERALS.contains(&upper.as_str()) {
                    out.push_str(&upper);
                    capitalize_next = false;
                    continue;
                }

                let lower = word.to_lowercase();
                if !capitalize_next && STOP_WORDS.contains(&lower.as_str()) {
                    out.push_str(&lower);
                    continue;
                }

                out.push_str(&capitalize(word));
                capitalize_next = false;
            }
        }
    }
    out
}

/// Uppercases the first letter and lowercases the rest.
///
/// Only one character of a multi-character uppercase mapping (`ﬁ` to `FI`)
/// stays uppercase, so capitalizing an already capitalized word is a no-op.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    let mut out: String = upper.next().into_iter().collect();
    let tail: String = upper.chain(chars).collect();
    out.push_str(&tail.to_lowercase());
    out
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Space(&'a str),
    Punct(&'a str),
    Word(&'a str),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Space,
    Punct,
    Word,
}

impl Class {
    fn of(c: char) -> Self {
        if c.is_whitespace() {
            Self::Space
        } else if matches!(c, '-' | '.' | ',' | ':' | ';' | '!' | '?') {
            Self::Punct
        } else {
            Self::Word
        }
    }

    fn token(self, s: &str) -> Token<'_> {
        match self {
            Self::Space => Token::Space(s),
            Self::Punct => Token::Punct(s),
            Self::Word => Token::Word(s),
        }
    }
}

/// Splits into maximal runs of whitespace, punctuation and everything else.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<Class> = None;

    for (idx, c) in text.char_indices() {
        let class = Class::of(c);
        if let Some(prev) = current {
            if prev != class {
                tokens.push(prev.token(&text[start..idx]));
                start = idx;
            }
        }
        current = Some(class);
    }
    if let Some(prev) = current {
        tokens.push(prev.token(&text[start..]));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_and_strips_leading_dashes() {
        let ancestors = ["LIVE ANIMALS", "- - Horses:"];
        let combined = combine_nested_descriptions(&ancestors, ": - Purebred breeding animals");
        assert_eq!(combined, "Live Animals Horses: Purebred Breeding Animals");
    }

    #[test]
    fn stop_words_lowercase_mid_sentence() {
        assert_eq!(
            normalize_capitalization("ARTICLES OF IRON OR STEEL, NOT ELSEWHERE SPECIFIED"),
            "Articles of Iron or Steel, not elsewhere specified"
        );
    }

    #[test]
    fn stop_word_is_capitalized_first_and_after_colon() {
        assert_eq!(normalize_capitalization("other fish: of the family"), "Other Fish: Of the Family");
        assert_eq!(normalize_capitalization("x; and more"), "X; And More");
    }

    #[test]
    fn roman_numerals_stay_uppercase() {
        assert_eq!(normalize_capitalization("section xii vehicles"), "Section XII Vehicles");
        assert_eq!(normalize_capitalization("part iv and v"), "Part IV and V");
    }

    #[test]
    fn hyphenated_words_are_each_capitalized() {
        assert_eq!(normalize_capitalization("self-propelled"), "Self-Propelled");
    }

    #[test]
    fn blank_input_yields_empty_string() {
        let ancestors: [&str; 2] = ["   ", ""];
        assert_eq!(combine_nested_descriptions(&ancestors, "- - :"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let ancestors = ["COFFEE, TEA, MATE AND SPICES", "- Coffee, not roasted:"];
        let once = combine_nested_descriptions(&ancestors, "-- decaffeinated");
        let twice = combine_nested_descriptions::<&str>(&[], &once);
        assert_eq!(once, "Coffee, Tea, Mate and Spices Coffee, not Roasted: Decaffeinated");
        assert_eq!(once, twice);
    }

    #[test]
    fn ligatures_capitalize_to_a_stable_form() {
        let once = combine_nested_descriptions::<&str>(&[], "\u{fb01}sh fillets");
        assert_eq!(once, "Fish Fillets");
        assert_eq!(combine_nested_descriptions::<&str>(&[], &once), once);
        assert_eq!(normalize_capitalization("\u{df}trasse"), "Sstrasse");
    }

    #[test]
    fn tokens_preserve_every_character() {
        let text = "a - b,, c";
        let rebuilt: String = tokenize(text)
            .into_iter()
            .map(|t| match t {
                Token::Space(s) | Token::Punct(s) | Token::Word(s) => s,
            })
            .collect();
        assert_eq!(rebuilt, text);
    }
}
