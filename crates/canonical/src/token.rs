use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Generic taxonomic filler words that carry no identity on their own.
pub const FILLER_TOKENS: [&str; 3] = ["species", "variety", "subspecies"];

/// A token with its UTF-8 byte offsets in the normalized name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// The token text content.
    pub text: String,
    /// Byte offset (inclusive) in the normalized name.
    pub start: usize,
    /// Byte offset (exclusive) in the normalized name.
    pub end: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Normalizes `name` and splits it into meaningful words.
///
/// Filler tokens (`species`, `variety`, `subspecies`) are dropped, so the
/// result may be empty. Offsets refer to `normalize(name)`.
///
/// ```rust
/// use canonical::tokenize;
///
/// let words: Vec<String> = tokenize("Rosa var. alba").into_iter().map(|t| t.text).collect();
/// assert_eq!(words, vec!["rosa", "alba"]);
/// ```
pub fn tokenize(name: &str) -> Vec<Token> {
    tokenize_normalized(&normalize(name))
}

/// Splits an already normalized name. Callers holding the normalized form
/// use this to avoid normalizing twice.
pub fn tokenize_normalized(normalized: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    for word in normalized.split(' ') {
        let start = offset;
        let end = start + word.len();
        offset = end + 1;

        if word.is_empty() || FILLER_TOKENS.contains(&word) {
            continue;
        }
        tokens.push(Token {
            text: word.to_string(),
            start,
            end,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn drops_filler_tokens() {
        let tokens = tokenize("Rosa var. alba");
        assert_eq!(texts(&tokens), vec!["rosa", "alba"]);
        assert!(!tokens.iter().any(|t| t.text == "variety"));
    }

    #[test]
    fn offsets_point_into_normalized_text() {
        let normalized = normalize("Brassica  oleracea subsp. Capitata");
        let tokens = tokenize_normalized(&normalized);
        assert_eq!(texts(&tokens), vec!["brassica", "oleracea", "capitata"]);
        for token in &tokens {
            assert_eq!(&normalized[token.start..token.end], token.text);
        }
    }

    #[test]
    fn filler_only_name_yields_no_tokens() {
        assert!(tokenize("spp.").is_empty());
        assert!(tokenize("species variety").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let tokens = tokenize("alba rosa alba");
        assert_eq!(texts(&tokens), vec!["alba", "rosa", "alba"]);
    }

    #[test]
    fn filler_words_only_match_whole_tokens() {
        let tokens = tokenize("speciesalba");
        assert_eq!(texts(&tokens), vec!["speciesalba"]);
    }
}
