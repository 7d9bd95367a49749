//! Slug derivation from post titles.
//!
//! The rule, applied to the lower-cased title:
//!
//! 1. drop every character that is not an ASCII letter, digit, `_`, `-` or whitespace
//! 2. collapse each whitespace run into one separator
//! 3. trim separators and hyphens from both ends
//!
//! | Title                | `strict`        | `ascii`          |
//! |----------------------|-----------------|------------------|
//! | `Hello World`        | `hello-world`   | `hello-world`    |
//! | `Café du Sport!`     | `caf-du-sport`  | `cafe-du-sport`  |
//! | `  --Rust 2024-- `   | `rust-2024`     | `rust-2024`      |
//! | `!!!`                | ``              | ``               |

use std::borrow::Cow;

use crate::config::{SlugConfig, SlugMode};

/// Slugify with the default (strict, dash) settings.
#[inline]
pub fn slugify(title: &str) -> String {
    slugify_with(title, &SlugConfig::default())
}

/// Slugify a title according to `config`.
///
/// Pure and total: every input maps to a (possibly empty) slug, and
/// feeding a slug back in returns it unchanged.
pub fn slugify_with(title: &str, config: &SlugConfig) -> String {
    let source: Cow<'_, str> = match config.mode {
        SlugMode::Strict => Cow::Borrowed(title),
        SlugMode::Ascii => Cow::Owned(deunicode::deunicode(title)),
    };
    let separator = config.separator.as_char();

    let mut slug = String::with_capacity(source.len());
    let mut pending_separator = false;

    for c in source.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if !is_slug_char(c) {
            continue;
        }
        if pending_separator {
            slug.push(separator);
            pending_separator = false;
        }
        slug.push(c);
    }

    let trimmed = slug.trim_matches(|c| c == '-' || c == separator);
    if trimmed.len() == slug.len() {
        slug
    } else {
        trimmed.to_string()
    }
}

#[inline]
const fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
