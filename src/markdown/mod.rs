//! The article's markdown format.
//!
//! - [`render`] - document → markdown (front-matter + body)
//! - [`parse`] - markdown → document, for resuming an exported article

mod parse;
mod render;

pub use parse::{ParseError, parse};
pub use render::{image_path, render};
