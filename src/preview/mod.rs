//! HTML preview of the article.
//!
//! The serialized markdown goes through `pulldown-cmark`; every image token is
//! swapped for an `<img>` carrying the matching section's geometry and
//! position. A token matches the first section whose emitted image path is
//! exactly the token's destination. Tokens with no match, including the empty
//! path written for sections without an image, become a placeholder.

pub mod serve;
mod style;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::config::RenderConfig;
use crate::document::{Document, Section};
use crate::embed::preview::{PageVars, page_html};
use crate::markdown::{image_path, render};

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Render the article body (front-matter hidden) to HTML.
pub fn render_html(doc: &Document, config: &RenderConfig) -> String {
    render_markdown_html(&render(doc, config), doc, config)
}

fn render_markdown_html(markdown: &str, doc: &Document, config: &RenderConfig) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let events = SectionImages {
        inner: parser,
        doc,
        config,
    };

    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, events);
    out
}

/// Full standalone page: rendered article plus its markdown source.
pub fn render_page(doc: &Document, config: &RenderConfig) -> String {
    let markdown = render(doc, config);
    let body = render_markdown_html(&markdown, doc, config);
    let title = if doc.metadata.title.is_empty() {
        "Preview"
    } else {
        doc.metadata.title.as_str()
    };

    page_html().render(&PageVars {
        title,
        body: &body,
        source: &markdown,
    })
}

/// Write the preview page to `path`, creating parent directories.
pub fn write_page(doc: &Document, config: &RenderConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, render_page(doc, config))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// First section whose emitted image path equals `dest`.
fn find_section<'d>(doc: &'d Document, config: &RenderConfig, dest: &str) -> Option<&'d Section> {
    doc.sections().iter().find(|section| {
        !section.image.is_empty() && image_path(section, &doc.metadata.title, config) == dest
    })
}

/// Event adapter replacing each image run with section-aware HTML.
struct SectionImages<'d, I> {
    inner: I,
    doc: &'d Document,
    config: &'d RenderConfig,
}

impl<'a, I> Iterator for SectionImages<'_, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let dest_url = match self.inner.next()? {
            Event::Start(Tag::Image { dest_url, .. }) => dest_url,
            event => return Some(event),
        };

        // alt text is every text event up to the matching end tag
        let mut alt = String::new();
        let mut depth = 1usize;
        for event in self.inner.by_ref() {
            match event {
                Event::Start(Tag::Image { .. }) => depth += 1,
                Event::End(TagEnd::Image) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                _ => {}
            }
        }

        let html = match find_section(self.doc, self.config, &dest_url) {
            Some(section) => style::image_html(section, &alt),
            None => style::missing_html(),
        };
        Some(Event::InlineHtml(CowStr::from(html)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Dimension, ImageFile, SectionImage};

    fn doc_with_images() -> Document {
        let mut doc = Document::default();
        doc.set_metadata_field("title", "Post").unwrap();
        doc.set_section_image_reference(0, "https://cdn.example/a.png");
        doc.set_section_position(0, "top-left");
        doc.set_section_text(0, "first");
        doc.set_section_image_reference(1, "https://cdn.example/a.png?v=2");
        doc.set_section_dimension(1, Dimension::Width, "640");
        doc
    }

    #[test]
    fn test_front_matter_hidden() {
        let html = render_html(&doc_with_images(), &RenderConfig::default());
        assert!(!html.contains("cardImage"));
        assert!(html.contains("<h3>Section 1</h3>"));
    }

    #[test]
    fn test_images_match_exactly() {
        let html = render_html(&doc_with_images(), &RenderConfig::default());

        let first = html.find(r#"src="https://cdn.example/a.png""#).unwrap();
        let second = html.find(r#"src="https://cdn.example/a.png?v=2""#).unwrap();
        assert!(first < second);
        assert!(html.contains("float:left"));
        assert!(html.contains("width:640px;height:300px;display:block"));
        assert!(html.contains(r#"alt="Image de la section""#));
    }

    #[test]
    fn test_first_match_wins() {
        let mut doc = Document::default();
        doc.set_section_image_reference(0, "same.png");
        doc.set_section_image_reference(1, "same.png");
        doc.set_section_position(1, "top-right");
        let html = render_html(&doc, &RenderConfig::default());
        assert!(!html.contains("float:right"));
        assert_eq!(html.matches("display:block;margin:0 auto").count(), 2);
    }

    #[test]
    fn test_empty_image_is_placeholder() {
        let mut doc = Document::default();
        doc.set_section_text(0, "Hi");
        let html = render_html(&doc, &RenderConfig::default());
        assert!(html.contains(style::MISSING_IMAGE));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_foreign_image_is_placeholder() {
        let mut doc = Document::default();
        doc.set_metadata_field("resume", "![logo](https://elsewhere/logo.png)").unwrap();
        let html = render_html(&doc, &RenderConfig::default());
        assert!(html.contains(style::MISSING_IMAGE));
    }

    #[test]
    fn test_asset_folder_paths_still_match() {
        let mut doc = Document::default();
        doc.set_metadata_field("title", "Mon Article").unwrap();
        doc.set_section_image(
            0,
            Some(SectionImage {
                reference: "data:image/png;base64,AAAA".to_string(),
                file: ImageFile {
                    file_name: "b.png".to_string(),
                    ..Default::default()
                },
                width: 40,
                height: 20,
            }),
        );
        let config = RenderConfig {
            asset_folder: true,
            ..Default::default()
        };
        let html = render_html(&doc, &config);
        assert!(html.contains(r#"src="data:image/png;base64,AAAA""#));
        assert!(html.contains("width:40px;height:20px"));
    }

    #[test]
    fn test_page_wraps_body_and_source() {
        let page = render_page(&doc_with_images(), &RenderConfig::default());
        assert!(page.contains("<title>Post</title>"));
        assert!(page.contains("<h3>Section 2</h3>"));
        assert!(page.contains("slug: &quot;post&quot;"));
    }

    #[test]
    fn test_page_markers_in_content_stay_literal() {
        let mut doc = Document::default();
        doc.set_metadata_field("title", "__BODY__").unwrap();
        doc.set_metadata_field("resume", "see __SOURCE__ and __TITLE__").unwrap();

        let page = render_page(&doc, &RenderConfig::default());
        assert!(page.contains("<title>__BODY__</title>"));
        assert!(page.contains("see __SOURCE__ and __TITLE__"));
        assert_eq!(page.matches("<!DOCTYPE html>").count(), 1);
    }

    #[test]
    fn test_write_page_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/preview.html");
        write_page(&doc_with_images(), &RenderConfig::default(), &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
