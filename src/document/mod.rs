//! The post being authored.
//!
//! A [`Document`] owns the metadata, the section arena, the current-section
//! cursor and the aspect-lock flag. Every change goes through
//! [`Document::apply`], which also recomputes derived fields (the slug, the
//! locked partner dimension) in the same step.
//!
//! ```text
//! session input ──► Action ──► Document::apply ──► Outcome
//!                                    │
//!                                    └──► markdown::render (on demand)
//! ```

mod action;
mod error;
mod meta;
mod section;
mod store;

pub use action::Action;
pub use error::DocumentError;
pub use meta::{Category, Metadata, MetadataField};
pub use section::{
    DEFAULT_DIMENSION, Dimension, ImageFile, ImagePosition, Section, SectionImage,
    parse_dimension,
};
pub use store::{Generation, MAX_SECTION_INDEX, MAX_SECTIONS, SectionStore};

use serde::Serialize;

use crate::config::SlugConfig;
use crate::utils::slug::slugify_with;

/// What [`Document::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Accepted but nothing changed (no file, invalid position tag).
    Ignored,
    /// A slot generation was handed out for a background decode.
    Claimed(Generation),
    /// A decode result arrived for a superseded or reset slot.
    Stale,
}

/// One entry of the front-matter `sections:` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionEntry<'a> {
    pub text: &'a str,
    pub image: &'a str,
    pub image_height: Option<u32>,
    pub image_width: Option<u32>,
    pub image_position: ImagePosition,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub metadata: Metadata,
    sections: SectionStore,
    cursor: usize,
    aspect_lock: bool,
    slug: SlugConfig,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(SlugConfig::default())
    }
}

impl Document {
    /// Empty document with the aspect lock on.
    pub fn new(slug: SlugConfig) -> Self {
        Self {
            metadata: Metadata::default(),
            sections: SectionStore::new(),
            cursor: 0,
            aspect_lock: true,
            slug,
        }
    }

    /// Rebuild a document from parsed parts, re-deriving nothing.
    pub fn from_parts(
        metadata: Metadata,
        sections: impl IntoIterator<Item = Section>,
        slug: SlugConfig,
    ) -> Self {
        let mut doc = Self::new(slug);
        doc.metadata = metadata;
        doc.sections.replace(sections);
        doc
    }

    pub fn sections(&self) -> &SectionStore {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Index of the section the session is editing.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn aspect_lock(&self) -> bool {
        self.aspect_lock
    }

    /// Replace metadata and sections, keeping cursor bounds and settings.
    pub fn replace_with(&mut self, other: Document) {
        self.metadata = other.metadata;
        self.sections = other.sections;
        self.cursor = self.cursor.min(self.sections.len().saturating_sub(1));
    }

    /// Read-only mirror of the sections for the front-matter.
    pub fn sections_projection(&self) -> Vec<SectionEntry<'_>> {
        self.sections
            .iter()
            .map(|s| SectionEntry {
                text: &s.text,
                image: &s.image,
                image_height: s.image_height,
                image_width: s.image_width,
                image_position: s.image_position,
            })
            .collect()
    }

    // ========================================================================
    // reducer
    // ========================================================================

    /// Apply one mutation.
    ///
    /// Errors are user-level refusals; the document is unchanged when one
    /// is returned.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, DocumentError> {
        if let Some(index) = action.section_index()
            && !SectionStore::in_range(index)
        {
            return Err(DocumentError::SectionOutOfRange {
                number: index.saturating_add(1),
                max: MAX_SECTION_INDEX + 1,
            });
        }

        match action {
            Action::SetMetadata { field, value } => self.reduce_metadata(field, value),
            Action::SetSectionText { index, text } => {
                self.sections.ensure_section(index).text = text;
                Ok(Outcome::Applied)
            }
            Action::SetSectionImage {
                index,
                image,
                generation,
            } => {
                let Some(image) = image else {
                    return Ok(Outcome::Ignored);
                };
                if let Some(generation) = generation
                    && self.sections.generation(index) != Some(generation)
                {
                    return Ok(Outcome::Stale);
                }
                self.sections.ensure_section(index).attach(image);
                Ok(Outcome::Applied)
            }
            Action::SetSectionImageReference { index, reference } => {
                self.sections.ensure_section(index).set_reference(reference);
                Ok(Outcome::Applied)
            }
            Action::SetSectionDimension {
                index,
                dimension,
                value,
            } => {
                let locked = self.aspect_lock;
                self.sections
                    .ensure_section_with(index, Section::with_unit_ratio)
                    .set_dimension(dimension, parse_dimension(&value), locked);
                Ok(Outcome::Applied)
            }
            Action::SetSectionPosition { index, position } => {
                let section = self.sections.ensure_section(index);
                match position.parse::<ImagePosition>() {
                    Ok(position) => {
                        section.image_position = position;
                        Ok(Outcome::Applied)
                    }
                    Err(()) => Ok(Outcome::Ignored),
                }
            }
            Action::ClaimSectionImage { index } => {
                Ok(Outcome::Claimed(self.sections.claim(index)))
            }
            Action::ResetSection { index } => {
                self.sections.reset(index);
                Ok(Outcome::Applied)
            }
            Action::AddSection => match self.sections.push() {
                Some(index) => {
                    self.cursor = index;
                    Ok(Outcome::Applied)
                }
                None => Err(DocumentError::SectionLimitExceeded {
                    limit: MAX_SECTIONS,
                }),
            },
            Action::PreviousSection => {
                self.cursor = self.cursor.saturating_sub(1);
                Ok(Outcome::Applied)
            }
            Action::GoToSection { index } => {
                self.cursor = index;
                Ok(Outcome::Applied)
            }
            Action::SetAspectLock(on) => {
                self.aspect_lock = on;
                Ok(Outcome::Applied)
            }
        }
    }

    fn reduce_metadata(
        &mut self,
        field: MetadataField,
        value: String,
    ) -> Result<Outcome, DocumentError> {
        if field == MetadataField::Category {
            self.metadata.category = value.parse()?;
            return Ok(Outcome::Applied);
        }

        if let Some(slot) = self.metadata.text_field_mut(field) {
            *slot = value;
        }
        if field == MetadataField::Title {
            self.metadata.slug = slugify_with(&self.metadata.title, &self.slug);
        }
        Ok(Outcome::Applied)
    }

    // ========================================================================
    // named operations
    // ========================================================================

    /// Set a metadata field by name (`title`, `cardImage`, ...).
    pub fn set_metadata_field(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Outcome, DocumentError> {
        let field = name.parse()?;
        self.apply(Action::SetMetadata {
            field,
            value: value.into(),
        })
    }

    pub fn set_section_text(&mut self, index: usize, text: impl Into<String>) {
        self.apply_infallible(Action::SetSectionText {
            index,
            text: text.into(),
        });
    }

    pub fn set_section_image(&mut self, index: usize, image: Option<SectionImage>) -> Outcome {
        self.apply_infallible(Action::SetSectionImage {
            index,
            image,
            generation: None,
        })
    }

    pub fn set_section_image_reference(&mut self, index: usize, reference: impl Into<String>) {
        self.apply_infallible(Action::SetSectionImageReference {
            index,
            reference: reference.into(),
        });
    }

    pub fn set_section_dimension(&mut self, index: usize, dimension: Dimension, value: &str) {
        self.apply_infallible(Action::SetSectionDimension {
            index,
            dimension,
            value: value.to_string(),
        });
    }

    pub fn set_section_position(&mut self, index: usize, position: &str) -> Outcome {
        self.apply_infallible(Action::SetSectionPosition {
            index,
            position: position.to_string(),
        })
    }

    pub fn reset_section(&mut self, index: usize) {
        self.apply_infallible(Action::ResetSection { index });
    }

    pub fn add_section(&mut self) -> Result<(), DocumentError> {
        self.apply(Action::AddSection).map(drop)
    }

    pub fn go_to_previous_section(&mut self) {
        self.apply_infallible(Action::PreviousSection);
    }

    pub fn go_to_section(&mut self, index: usize) {
        self.apply_infallible(Action::GoToSection { index });
    }

    pub fn set_aspect_lock(&mut self, on: bool) {
        self.apply_infallible(Action::SetAspectLock(on));
    }

    /// Refusals (out-of-range index, bad category) become `Ignored`.
    fn apply_infallible(&mut self, action: Action) -> Outcome {
        self.apply(action).unwrap_or(Outcome::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::slug::slugify;

    fn decoded(width: u32, height: u32, name: &str) -> SectionImage {
        SectionImage {
            reference: format!("data:image/png;base64,{name}"),
            file: ImageFile {
                file_name: name.to_string(),
                file_type: "image/png".to_string(),
                file_size: 10,
                last_modified: Some(0),
            },
            width,
            height,
        }
    }

    #[test]
    fn test_title_derives_slug() {
        let mut doc = Document::default();
        for title in ["Hello World", "Café du Sport!", "", "  a  b  ", "!!!"] {
            doc.set_metadata_field("title", title).unwrap();
            assert_eq!(doc.metadata.slug, slugify(title));
        }
    }

    #[test]
    fn test_title_overwrites_manual_slug() {
        let mut doc = Document::default();
        doc.set_metadata_field("slug", "custom").unwrap();
        assert_eq!(doc.metadata.slug, "custom");
        doc.set_metadata_field("title", "New Title").unwrap();
        assert_eq!(doc.metadata.slug, "new-title");
    }

    #[test]
    fn test_slug_config_applies() {
        let mut doc = Document::new(SlugConfig {
            mode: crate::config::SlugMode::Ascii,
            ..Default::default()
        });
        doc.set_metadata_field("title", "Café du Sport!").unwrap();
        assert_eq!(doc.metadata.slug, "cafe-du-sport");
    }

    #[test]
    fn test_unknown_field_and_category_rejected() {
        let mut doc = Document::default();
        assert!(matches!(
            doc.set_metadata_field("subtitle", "x"),
            Err(DocumentError::UnknownField(_))
        ));

        doc.set_metadata_field("category", "Events").unwrap();
        assert!(doc.set_metadata_field("category", "Sports").is_err());
        assert_eq!(doc.metadata.category, Category::Events);
    }

    #[test]
    fn test_add_section_limit() {
        let mut doc = Document::default();
        for _ in 0..MAX_SECTIONS {
            doc.add_section().unwrap();
        }
        assert_eq!(
            doc.add_section(),
            Err(DocumentError::SectionLimitExceeded { limit: 4 })
        );
        assert_eq!(doc.sections().len(), 4);
        assert_eq!(doc.cursor(), 3);
    }

    #[test]
    fn test_add_advances_cursor() {
        let mut doc = Document::default();
        doc.set_section_text(0, "first");
        doc.add_section().unwrap();
        assert_eq!(doc.cursor(), 1);
        assert_eq!(doc.sections().len(), 2);
    }

    #[test]
    fn test_previous_section_floors_at_zero() {
        let mut doc = Document::default();
        doc.go_to_previous_section();
        assert_eq!(doc.cursor(), 0);

        doc.go_to_section(2);
        doc.go_to_previous_section();
        assert_eq!(doc.cursor(), 1);
    }

    #[test]
    fn test_dimension_far_index_materializes() {
        let mut doc = Document::default();
        doc.set_section_dimension(7, Dimension::Height, "100");

        assert_eq!(doc.sections().len(), 8);
        let section = doc.section(7).unwrap();
        assert_eq!(section.image_height, Some(100));
        // unit ratio: the lock keeps the box square
        assert_eq!(section.image_width, Some(100));
        assert_eq!(doc.section(0).unwrap().text, "");
    }

    #[test]
    fn test_dimension_on_existing_section_without_ratio() {
        let mut doc = Document::default();
        doc.set_section_text(0, "hi");
        doc.set_section_dimension(0, Dimension::Width, "120");
        let section = doc.section(0).unwrap();
        assert_eq!(section.image_width, Some(120));
        assert_eq!(section.image_height, Some(300));
    }

    #[test]
    fn test_out_of_range_index_refused() {
        let mut doc = Document::default();
        let err = doc
            .apply(Action::SetSectionText {
                index: usize::MAX,
                text: "x".to_string(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::SectionOutOfRange {
                number: usize::MAX,
                max: MAX_SECTION_INDEX + 1,
            }
        );

        doc.set_section_dimension(1_000_000_000, Dimension::Height, "10");
        doc.go_to_section(MAX_SECTION_INDEX + 1);
        assert!(doc.sections().is_empty());
        assert_eq!(doc.cursor(), 0);

        doc.set_section_text(MAX_SECTION_INDEX, "last");
        assert_eq!(doc.sections().len(), MAX_SECTION_INDEX + 1);
    }

    #[test]
    fn test_dimension_edit_leaves_holes_unlocked() {
        let mut doc = Document::default();
        doc.set_section_dimension(2, Dimension::Width, "200");
        // hole created by the dimension edit behaves like one created by text
        doc.set_section_dimension(0, Dimension::Height, "50");
        let hole = doc.section(0).unwrap();
        assert_eq!(hole.image_height, Some(50));
        assert_eq!(hole.image_width, Some(DEFAULT_DIMENSION));
        assert_eq!(doc.section(2).unwrap().image_height, Some(200));
    }

    #[test]
    fn test_non_numeric_dimension_is_absent() {
        let mut doc = Document::default();
        doc.set_section_dimension(0, Dimension::Width, "wide");
        let section = doc.section(0).unwrap();
        assert_eq!(section.image_width, None);
        assert_eq!(section.image_height, None);
    }

    #[test]
    fn test_aspect_lock_toggle() {
        let mut doc = Document::default();
        doc.set_section_image(0, Some(decoded(400, 200, "a.png")));

        doc.set_aspect_lock(false);
        doc.set_section_dimension(0, Dimension::Height, "50");
        assert_eq!(doc.section(0).unwrap().image_width, Some(400));

        doc.set_aspect_lock(true);
        doc.set_section_dimension(0, Dimension::Height, "50");
        assert_eq!(doc.section(0).unwrap().image_width, Some(100));
    }

    #[test]
    fn test_no_file_is_noop() {
        let mut doc = Document::default();
        assert_eq!(doc.set_section_image(2, None), Outcome::Ignored);
        assert!(doc.sections().is_empty());
    }

    #[test]
    fn test_invalid_position_keeps_prior() {
        let mut doc = Document::default();
        assert_eq!(doc.set_section_position(0, "top-right"), Outcome::Applied);
        assert_eq!(doc.set_section_position(0, "bottom"), Outcome::Ignored);
        assert_eq!(doc.section(0).unwrap().image_position, ImagePosition::TopRight);
    }

    #[test]
    fn test_stale_decode_dropped() {
        let mut doc = Document::default();
        let Ok(Outcome::Claimed(first)) = doc.apply(Action::ClaimSectionImage { index: 1 }) else {
            panic!("expected a claim");
        };
        let Ok(Outcome::Claimed(second)) = doc.apply(Action::ClaimSectionImage { index: 1 }) else {
            panic!("expected a claim");
        };

        let stale = doc.apply(Action::SetSectionImage {
            index: 1,
            image: Some(decoded(10, 10, "old.png")),
            generation: Some(first),
        });
        assert_eq!(stale, Ok(Outcome::Stale));

        let fresh = doc.apply(Action::SetSectionImage {
            index: 1,
            image: Some(decoded(20, 10, "new.png")),
            generation: Some(second),
        });
        assert_eq!(fresh, Ok(Outcome::Applied));
        assert_eq!(doc.section(1).unwrap().image_width, Some(20));
    }

    #[test]
    fn test_reset_invalidates_pending_decode() {
        let mut doc = Document::default();
        let Ok(Outcome::Claimed(generation)) = doc.apply(Action::ClaimSectionImage { index: 0 })
        else {
            panic!("expected a claim");
        };
        doc.set_section_text(0, "draft");
        doc.reset_section(0);

        let outcome = doc.apply(Action::SetSectionImage {
            index: 0,
            image: Some(decoded(10, 10, "late.png")),
            generation: Some(generation),
        });
        assert_eq!(outcome, Ok(Outcome::Stale));
        assert_eq!(doc.section(0), Some(&Section::default()));
    }

    #[test]
    fn test_projection_mirrors_sections() {
        let mut doc = Document::default();
        doc.set_section_text(1, "second");
        let projection = doc.sections_projection();
        assert_eq!(projection.len(), 2);
        assert_eq!(projection[1].text, "second");
        assert_eq!(projection[0].image_height, Some(DEFAULT_DIMENSION));

        let json = serde_json::to_value(&projection[1]).unwrap();
        assert_eq!(json["imagePosition"], "top");
        assert_eq!(json["imageWidth"], 300);
    }
}
