//! Mutations accepted by [`Document::apply`](super::Document::apply).

use super::meta::MetadataField;
use super::section::{Dimension, SectionImage};
use super::store::Generation;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Overwrite one metadata field. `title` also re-derives `slug`.
    SetMetadata { field: MetadataField, value: String },
    SetSectionText { index: usize, text: String },
    /// Attach a decoded image. `None` (no file chosen) is a no-op.
    ///
    /// With `generation` set, the image is applied only if the slot has not
    /// been reclaimed or reset since that generation was handed out.
    SetSectionImage {
        index: usize,
        image: Option<SectionImage>,
        generation: Option<Generation>,
    },
    /// Set the image from a typed URL or path.
    SetSectionImageReference { index: usize, reference: String },
    /// Raw user input; parsed as a positive integer.
    SetSectionDimension {
        index: usize,
        dimension: Dimension,
        value: String,
    },
    /// Raw tag; anything but `top`, `top-left`, `top-right` is ignored.
    SetSectionPosition { index: usize, position: String },
    /// Start a new image generation for a slot (before a background decode).
    ClaimSectionImage { index: usize },
    ResetSection { index: usize },
    AddSection,
    PreviousSection,
    GoToSection { index: usize },
    SetAspectLock(bool),
}

impl Action {
    /// Section index this action touches, if any.
    pub fn section_index(&self) -> Option<usize> {
        match self {
            Self::SetSectionText { index, .. }
            | Self::SetSectionImage { index, .. }
            | Self::SetSectionImageReference { index, .. }
            | Self::SetSectionDimension { index, .. }
            | Self::SetSectionPosition { index, .. }
            | Self::ClaimSectionImage { index }
            | Self::ResetSection { index }
            | Self::GoToSection { index } => Some(*index),
            Self::SetMetadata { .. }
            | Self::AddSection
            | Self::PreviousSection
            | Self::SetAspectLock(_) => None,
        }
    }
}
