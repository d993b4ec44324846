//! Free-text payload sanitization.
//!
//! Angle brackets are stripped from every free-text field before the
//! payload reaches the validation layer, so downstream consumers can
//! embed stored text without markup injection. Structural fields (ids,
//! numbers, enums) never pass through here.

/// Strip `<` and `>` from a free-text field.
pub fn clean(text: &str) -> String {
    text.chars().filter(|c| *c != '<' && *c != '>').collect()
}

pub fn clean_opt(text: Option<String>) -> Option<String> {
    text.map(|t| clean(&t))
}

pub fn clean_all(texts: Vec<String>) -> Vec<String> {
    texts.iter().map(|t| clean(t)).collect()
}
