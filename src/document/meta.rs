//! Post metadata written to the front-matter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DocumentError;

/// Post category, chosen from a closed list.
///
/// `Unset` is the empty choice and renders as `""`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "")]
    Unset,
    Events,
    Application,
    Divers,
    Playgrounds,
    Streetball,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Events,
        Self::Application,
        Self::Divers,
        Self::Playgrounds,
        Self::Streetball,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Events => "Events",
            Self::Application => "Application",
            Self::Divers => "Divers",
            Self::Playgrounds => "Playgrounds",
            Self::Streetball => "Streetball",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DocumentError;

    /// Case-insensitive; the empty string clears the category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::Unset);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DocumentError::UnknownCategory(s.to_string()))
    }
}

/// Post metadata.
///
/// | Field            | Front-matter key  | Notes                          |
/// |------------------|-------------------|--------------------------------|
/// | `title`          | `title`           | drives `slug`                  |
/// | `author`         | `author`          |                                |
/// | `date`           | `date`            | ISO `YYYY-MM-DD`, not enforced |
/// | `category`       | `category`        | closed list                    |
/// | `slug`           | `slug`            | derived from `title`           |
/// | `image`          | `image`           | opaque reference               |
/// | `card_image`     | `cardImage`       | opaque reference               |
/// | `image_titre`    | `imageTitre`      | rich variant only              |
/// | `card_image_titre` | `cardImageTitre` | rich variant only             |
/// | `resume`         | `resume`          | body summary, opaque text      |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub date: String,
    pub category: Category,
    pub slug: String,
    pub image: String,
    pub card_image: String,
    pub image_titre: String,
    pub card_image_titre: String,
    pub resume: String,
}

/// Names accepted by `set_metadata_field`.
///
/// `category` is not a plain string field and is handled by the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    Title,
    Author,
    Date,
    Category,
    Slug,
    Image,
    CardImage,
    ImageTitre,
    CardImageTitre,
    Resume,
}

impl MetadataField {
    pub const ALL: [Self; 10] = [
        Self::Title,
        Self::Author,
        Self::Date,
        Self::Category,
        Self::Slug,
        Self::Image,
        Self::CardImage,
        Self::ImageTitre,
        Self::CardImageTitre,
        Self::Resume,
    ];

    /// Front-matter key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Date => "date",
            Self::Category => "category",
            Self::Slug => "slug",
            Self::Image => "image",
            Self::CardImage => "cardImage",
            Self::ImageTitre => "imageTitre",
            Self::CardImageTitre => "cardImageTitre",
            Self::Resume => "resume",
        }
    }
}

impl FromStr for MetadataField {
    type Err = DocumentError;

    /// Accepts the front-matter key or its kebab-case spelling
    /// (`cardImage`, `card-image`, `card_image`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| DocumentError::UnknownField(s.to_string()))
    }
}

impl Metadata {
    /// Mutable access to a string-valued field. `None` for `category`.
    pub fn text_field_mut(&mut self, field: MetadataField) -> Option<&mut String> {
        Some(match field {
            MetadataField::Title => &mut self.title,
            MetadataField::Author => &mut self.author,
            MetadataField::Date => &mut self.date,
            MetadataField::Slug => &mut self.slug,
            MetadataField::Image => &mut self.image,
            MetadataField::CardImage => &mut self.card_image,
            MetadataField::ImageTitre => &mut self.image_titre,
            MetadataField::CardImageTitre => &mut self.card_image_titre,
            MetadataField::Resume => &mut self.resume,
            MetadataField::Category => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("Events".parse::<Category>(), Ok(Category::Events));
        assert_eq!("streetball".parse::<Category>(), Ok(Category::Streetball));
        assert_eq!("".parse::<Category>(), Ok(Category::Unset));
        assert!(matches!(
            "Sports".parse::<Category>(),
            Err(DocumentError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_category_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Category::Divers).unwrap(), "\"Divers\"");
        assert_eq!(serde_json::to_string(&Category::Unset).unwrap(), "\"\"");
    }

    #[test]
    fn test_field_names() {
        assert_eq!("title".parse::<MetadataField>(), Ok(MetadataField::Title));
        assert_eq!("cardImage".parse::<MetadataField>(), Ok(MetadataField::CardImage));
        assert_eq!("card-image".parse::<MetadataField>(), Ok(MetadataField::CardImage));
        assert_eq!(
            "card_image_titre".parse::<MetadataField>(),
            Ok(MetadataField::CardImageTitre)
        );
        assert!(matches!(
            "subtitle".parse::<MetadataField>(),
            Err(DocumentError::UnknownField(_))
        ));
    }

    #[test]
    fn test_metadata_json_keys() {
        let meta = Metadata {
            card_image: "c.png".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["cardImage"], "c.png");
        assert_eq!(json["category"], "");
    }
}
