//! Document error types.
//!
//! None of these are fatal: the session prints them as notices and the
//! document is left as it was.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// `add` was refused because the post already holds the maximum.
    #[error("a post holds at most {limit} sections")]
    SectionLimitExceeded { limit: usize },

    /// A section edit aimed past the highest section a post may address.
    #[error("section {number} is out of range (at most {max})")]
    SectionOutOfRange { number: usize, max: usize },

    #[error("unknown metadata field `{0}`")]
    UnknownField(String),

    #[error("unknown category `{0}` (expected Events, Application, Divers, Playgrounds or Streetball)")]
    UnknownCategory(String),
}
