//! Markdown → document, for `import`.
//!
//! Reads what [`render`](super::render) writes, and tolerates hand edits:
//! values may be JSON-quoted or bare, unknown keys are skipped. Geometry
//! comes from the front-matter `sections:` list when present; otherwise
//! sections are rebuilt from the `### Section n` blocks with default
//! geometry.

use thiserror::Error;

use super::render::{IMAGE_ALT, SECTION_HEADING};
use crate::config::SlugConfig;
use crate::document::{Document, ImagePosition, Metadata, Section, parse_dimension};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no front-matter found (expected a `---` block at the top)")]
    MissingFrontMatter,

    #[error("front-matter line {line}: invalid value for `{key}`")]
    Value {
        line: usize,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("front-matter line {line}: `{key}` outside a `sections:` entry")]
    OrphanSectionField { line: usize, key: String },
}

/// Parse a rendered article.
pub fn parse(content: &str, slug: SlugConfig) -> Result<Document, ParseError> {
    let (front_matter, body) = detect_front_matter(content).ok_or(ParseError::MissingFrontMatter)?;
    let front = parse_front_matter(front_matter)?;
    let body = parse_body(body);

    let mut metadata = front.metadata;
    if !front.has_resume {
        metadata.resume = body.resume;
    }

    let sections = match front.sections {
        Some(sections) => sections,
        None => body.sections,
    };

    Ok(Document::from_parts(metadata, sections, slug))
}

/// Split `---` front-matter from the body.
fn detect_front_matter(content: &str) -> Option<(&str, &str)> {
    let trimmed = content.trim_start();
    let rest = trimmed.strip_prefix("---")?;
    let rest = rest.trim_start_matches([' ', '\t', '\r']).strip_prefix('\n')?;

    // closing delimiter: a line that is exactly `---`
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let fm = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\r', '\n']);
            return Some((fm, body));
        }
        offset += line.len();
    }
    None
}

// ============================================================================
// front-matter
// ============================================================================

struct FrontMatter {
    metadata: Metadata,
    has_resume: bool,
    sections: Option<Vec<Section>>,
}

fn parse_front_matter(content: &str) -> Result<FrontMatter, ParseError> {
    let mut front = FrontMatter {
        metadata: Metadata::default(),
        has_resume: false,
        sections: None,
    };
    let mut in_sections = false;

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 2; // after the opening `---`
        if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
            continue;
        }

        let indented = raw.starts_with([' ', '\t', '-']);
        if in_sections && indented {
            let line = raw.trim_start();
            let (starts_entry, line) = match line.strip_prefix('-') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, line),
            };
            let sections = front.sections.get_or_insert_with(Vec::new);
            if starts_entry {
                sections.push(Section::default());
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let Some(section) = sections.last_mut() else {
                return Err(ParseError::OrphanSectionField {
                    line: line_no,
                    key: key.to_string(),
                });
            };
            apply_section_field(section, key, value.trim(), line_no)?;
            continue;
        }
        in_sections = false;

        let Some((key, value)) = raw.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key == "sections" {
            front.sections = Some(Vec::new());
            in_sections = value != "[]";
            continue;
        }

        let meta = &mut front.metadata;
        match key {
            "title" => meta.title = string_value(key, value, line_no)?,
            "author" => meta.author = string_value(key, value, line_no)?,
            "date" => meta.date = string_value(key, value, line_no)?,
            "category" => {
                // an unrecognised category is dropped, like any unknown value
                meta.category = string_value(key, value, line_no)?.parse().unwrap_or_default();
            }
            "slug" => meta.slug = string_value(key, value, line_no)?,
            "image" => meta.image = string_value(key, value, line_no)?,
            "cardImage" => meta.card_image = string_value(key, value, line_no)?,
            "imageTitre" => meta.image_titre = string_value(key, value, line_no)?,
            "cardImageTitre" => meta.card_image_titre = string_value(key, value, line_no)?,
            "resume" => {
                meta.resume = string_value(key, value, line_no)?;
                front.has_resume = true;
            }
            _ => {}
        }
    }

    for section in front.sections.iter_mut().flatten() {
        section.aspect_ratio = match (section.image_width, section.image_height) {
            (Some(w), Some(h)) => Some(f64::from(w) / f64::from(h)),
            _ => None,
        };
    }

    Ok(front)
}

fn apply_section_field(
    section: &mut Section,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match key {
        "text" => section.text = string_value(key, value, line)?,
        "image" => section.image = string_value(key, value, line)?,
        "imageHeight" => section.image_height = parse_dimension(value),
        "imageWidth" => section.image_width = parse_dimension(value),
        "imagePosition" => {
            if let Ok(position) = string_value(key, value, line)?.parse::<ImagePosition>() {
                section.image_position = position;
            }
        }
        _ => {}
    }
    Ok(())
}

/// JSON string if quoted, bare text otherwise. `null` is empty.
fn string_value(key: &str, value: &str, line: usize) -> Result<String, ParseError> {
    if value.starts_with('"') {
        return serde_json::from_str(value).map_err(|source| ParseError::Value {
            line,
            key: key.to_string(),
            source,
        });
    }
    if value == "null" || value == "~" {
        return Ok(String::new());
    }
    Ok(value.to_string())
}

// ============================================================================
// body
// ============================================================================

struct Body {
    resume: String,
    sections: Vec<Section>,
}

fn parse_body(body: &str) -> Body {
    let mut resume_lines: Vec<&str> = Vec::new();
    let mut blocks: Vec<Vec<&str>> = Vec::new();

    for line in body.lines() {
        if is_section_heading(line) {
            blocks.push(Vec::new());
        } else if let Some(block) = blocks.last_mut() {
            block.push(line);
        } else {
            resume_lines.push(line);
        }
    }

    Body {
        resume: resume_lines.join("\n").trim().to_string(),
        sections: blocks.iter().map(|lines| parse_block(lines)).collect(),
    }
}

fn is_section_heading(line: &str) -> bool {
    line.trim_end()
        .strip_prefix(SECTION_HEADING)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_block(lines: &[&str]) -> Section {
    let mut section = Section::default();
    let mut rest = lines;

    if let Some(pos) = lines.iter().position(|l| !l.trim().is_empty())
        && let Some(path) = image_line_path(lines[pos])
    {
        section.image = path.to_string();
        rest = &lines[pos + 1..];
    }

    section.text = rest.join("\n").trim().to_string();
    section
}

/// `![Image de la section](path)` → `path`.
fn image_line_path(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("![")?
        .strip_prefix(IMAGE_ALT)?
        .strip_prefix("](")?
        .strip_suffix(')')
}
