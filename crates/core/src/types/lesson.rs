//! Lesson catalog documents.

use serde::{Deserialize, Serialize};

use super::{LessonId, Price};

/// A purchasable lesson with bounded availability.
///
/// `spaces` is unsigned, so the store of record can never hold a negative
/// availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub subject: String,
    pub location: String,
    pub price: Price,
    pub spaces: u32,
    /// Image file name, resolved against the storefront's image directory.
    pub image: String,
}

impl Lesson {
    /// Returns true if the subject or location contains `needle`,
    /// ignoring case.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.subject.to_lowercase().contains(&needle)
            || self.location.to_lowercase().contains(&needle)
    }
}

/// A lesson that has not been stored yet (used when seeding the catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLesson {
    pub subject: String,
    pub location: String,
    pub price: Price,
    pub spaces: u32,
    pub image: String,
}

impl NewLesson {
    /// Attach an identifier, producing a full lesson document.
    #[must_use]
    pub fn with_id(self, id: LessonId) -> Lesson {
        Lesson {
            id,
            subject: self.subject,
            location: self.location,
            price: self.price,
            spaces: self.spaces,
            image: self.image,
        }
    }
}

/// Partial update of a lesson; absent fields are left untouched.
///
/// The checkout flow only ever sends `spaces`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LessonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spaces: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LessonPatch {
    /// A patch that only sets the available spaces.
    #[must_use]
    pub fn spaces(spaces: u32) -> Self {
        Self {
            spaces: Some(spaces),
            ..Self::default()
        }
    }

    /// Returns true if the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.location.is_none()
            && self.price.is_none()
            && self.spaces.is_none()
            && self.image.is_none()
    }

    /// Merge the patch's fields into `lesson`.
    pub fn apply(&self, lesson: &mut Lesson) {
        if let Some(subject) = &self.subject {
            lesson.subject.clone_from(subject);
        }
        if let Some(location) = &self.location {
            lesson.location.clone_from(location);
        }
        if let Some(price) = self.price {
            lesson.price = price;
        }
        if let Some(spaces) = self.spaces {
            lesson.spaces = spaces;
        }
        if let Some(image) = &self.image {
            lesson.image.clone_from(image);
        }
    }
}
