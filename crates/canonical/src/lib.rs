//! Phytomatch canonical name layer.
//!
//! Catalog rows and detected names rarely agree on spelling, casing or
//! punctuation. This crate reduces both sides to one comparable form before
//! any scoring happens.
//!
//! ## What we do
//!
//! - [`normalize`]: lowercase, fold diacritics, drop symbols, expand the
//!   `spp.`/`var.`/`subsp.` abbreviations, collapse whitespace
//! - [`tokenize`]: split a normalized name into words, dropping the generic
//!   filler words `species`, `variety`, `subspecies`
//! - [`CanonicalName`]: normalized text plus its token set, ready for the
//!   similarity scorer
//!
//! ## Pure function guarantee
//!
//! Nothing here fails, allocates global state, reads the clock or depends on
//! the locale. Any string in, a well-defined value out, and
//! `normalize(normalize(x)) == normalize(x)` for every `x`.

mod name;
mod normalize;
mod token;

pub use crate::name::CanonicalName;
pub use crate::normalize::{collapse_whitespace, normalize, normalize_opt, ABBREVIATIONS};
pub use crate::token::{tokenize, tokenize_normalized, Token, FILLER_TOKENS};
