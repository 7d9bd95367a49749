//! Document → markdown.
//!
//! # Output shape (rich variant)
//!
//! ```text
//! ---
//! title: "Hello World"
//! author: "A"
//! date: "2024-01-01"
//! category: "Events"
//! slug: "hello-world"
//! image: ""
//! cardImage: ""
//! imageTitre: ""
//! cardImageTitre: ""
//! resume: "Intro"
//! sections:
//!   - text: "Hi"
//!     image: ""
//!     imageHeight: 300
//!     imageWidth: 300
//!     imagePosition: "top"
//! ---
//!
//! Intro
//!
//! ### Section 1
//!
//! ![Image de la section]()
//!
//! Hi
//! ```
//!
//! The basic variant stops the front-matter after `cardImage`.
//! String values are JSON-quoted so quotes and newlines survive.

use std::borrow::Cow;
use std::fmt::Write as _;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::Value;

use crate::config::{RenderConfig, RenderVariant};
use crate::document::{Document, Section};

/// Alt text of every section image line.
pub const IMAGE_ALT: &str = "Image de la section";

/// Heading prefix of a section block; followed by the 1-based number.
pub const SECTION_HEADING: &str = "### Section ";

/// Characters escaped in the asset folder name (markdown link destination).
const FOLDER: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'(')
    .add(b')')
    .add(b'`');

/// Render the document. Pure: same document and config, same bytes.
pub fn render(doc: &Document, config: &RenderConfig) -> String {
    let mut out = String::with_capacity(512);
    write_front_matter(&mut out, doc, config.variant);

    let mut blocks: Vec<String> = Vec::with_capacity(doc.sections().len() + 1);
    let resume = doc.metadata.resume.trim_end();
    if !resume.is_empty() {
        blocks.push(resume.to_string());
    }
    for (i, section) in doc.sections().iter().enumerate() {
        blocks.push(section_block(i, section, &doc.metadata.title, config));
    }

    if !blocks.is_empty() {
        out.push('\n');
        out.push_str(&blocks.join("\n\n"));
        out.push('\n');
    }
    out
}

/// Path written in a section's image line.
///
/// With `asset_folder` a non-empty reference becomes `<title>/<name>`, where
/// `<name>` is the uploaded file name if known.
pub fn image_path<'a>(section: &'a Section, title: &str, config: &RenderConfig) -> Cow<'a, str> {
    if !config.asset_folder || section.image.is_empty() {
        return Cow::Borrowed(&section.image);
    }
    let name = section
        .file
        .as_ref()
        .map_or(section.image.as_str(), |f| f.file_name.as_str());
    Cow::Owned(format!("{}/{}", utf8_percent_encode(title, FOLDER), name))
}

fn section_block(index: usize, section: &Section, title: &str, config: &RenderConfig) -> String {
    let mut block = format!(
        "{SECTION_HEADING}{}\n\n![{IMAGE_ALT}]({})",
        index + 1,
        image_path(section, title, config)
    );
    let text = section.text.trim_end();
    if !text.is_empty() {
        block.push_str("\n\n");
        block.push_str(text);
    }
    block
}

fn write_front_matter(out: &mut String, doc: &Document, variant: RenderVariant) {
    let meta = &doc.metadata;
    out.push_str("---\n");
    push_field(out, "", "title", &meta.title);
    push_field(out, "", "author", &meta.author);
    push_field(out, "", "date", &meta.date);
    push_field(out, "", "category", meta.category.as_str());
    push_field(out, "", "slug", &meta.slug);
    push_field(out, "", "image", &meta.image);
    push_field(out, "", "cardImage", &meta.card_image);

    if variant == RenderVariant::Rich {
        push_field(out, "", "imageTitre", &meta.image_titre);
        push_field(out, "", "cardImageTitre", &meta.card_image_titre);
        push_field(out, "", "resume", &meta.resume);

        let entries = doc.sections_projection();
        if entries.is_empty() {
            out.push_str("sections: []\n");
        } else {
            out.push_str("sections:\n");
            for entry in entries {
                push_field(out, "  - ", "text", entry.text);
                push_field(out, "    ", "image", entry.image);
                push_raw(out, "    ", "imageHeight", Value::from(entry.image_height));
                push_raw(out, "    ", "imageWidth", Value::from(entry.image_width));
                push_field(out, "    ", "imagePosition", entry.image_position.as_str());
            }
        }
    }
    out.push_str("---\n");
}

#[inline]
fn push_field(out: &mut String, indent: &str, key: &str, value: &str) {
    push_raw(out, indent, key, Value::from(value));
}

#[inline]
fn push_raw(out: &mut String, indent: &str, key: &str, value: Value) {
    let _ = writeln!(out, "{indent}{key}: {value}");
}
