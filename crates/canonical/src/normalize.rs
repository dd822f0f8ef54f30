//! Scientific-name normalization.
//!
//! [`normalize`] turns a raw name, as typed by a catalog editor or produced by
//! a vision model, into the comparable form every other stage works on.
//!
//! # Steps
//!
//! 1. Unicode compatibility decomposition (NFKD), so `"é"` becomes `"e"` plus
//!    a combining accent and ligatures split into their letters
//! 2. Locale-free lowercasing
//! 3. Every character that is not a letter, digit, whitespace or `.` is
//!    dropped (this removes the combining accents from step 1); whitespace of
//!    any kind becomes an ASCII space
//! 4. Domain abbreviations are expanded: `spp.` → `species`,
//!    `var.` → `variety`, `subsp.` → `subspecies`
//! 5. Whitespace runs collapse to a single space, edges are trimmed
//!
//! Step 4 repeats until no abbreviation is left. Each expansion consumes a
//! period, so the loop terminates, and the output can never contain an
//! abbreviation again. That is what makes `normalize` idempotent.
//!
//! # Examples
//!
//! ```rust
//! use canonical::normalize;
//!
//! assert_eq!(normalize("Diplocarpon ROSAE "), "diplocarpon rosae");
//! assert_eq!(normalize("Rosa  var. alba"), "rosa variety alba");
//! assert_eq!(normalize("Fusarium spp."), "fusarium species");
//! assert_eq!(normalize(""), "");
//! ```

use unicode_normalization::UnicodeNormalization;

/// Abbreviations expanded literally, in application order.
pub const ABBREVIATIONS: [(&str, &str); 3] = [
    ("spp.", "species"),
    ("var.", "variety"),
    ("subsp.", "subspecies"),
];

/// Canonicalizes a raw scientific-name string.
///
/// Never fails: empty or punctuation-only input yields the empty string.
/// Pure and deterministic.
pub fn normalize(text: &str) -> String {
    let mut filtered = String::with_capacity(text.len());
    for ch in text.nfkd().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            filtered.push(' ');
        } else if ch.is_alphanumeric() || ch == '.' {
            filtered.push(ch);
        }
    }

    let expanded = expand_abbreviations(filtered);
    collapse_whitespace(&expanded)
}

/// Convenience for optional fields: `None` normalizes to the empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

fn expand_abbreviations(mut text: String) -> String {
    loop {
        let mut changed = false;
        for (abbr, full) in ABBREVIATIONS {
            if text.contains(abbr) {
                text = text.replace(abbr, full);
                changed = true;
            }
        }
        if !changed {
            return text;
        }
    }
}

/// Collapses whitespace runs into single ASCII spaces and trims both edges.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  rosa \t\n alba "), "rosa alba");
/// assert_eq!(collapse_whitespace("   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
