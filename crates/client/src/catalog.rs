//! Catalog sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lesson_shop_core::Lesson;

/// Attribute the catalog is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Subject,
    Location,
    Price,
    Spaces,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::Subject, Self::Location, Self::Price, Self::Spaces];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Location => "location",
            Self::Price => "price",
            Self::Spaces => "spaces",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort key '{s}' (expected subject, location, price or spaces)"))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// A sort key and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl CatalogSort {
    #[must_use]
    pub const fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Compare two lessons. Text keys compare case-insensitively.
    #[must_use]
    pub fn compare(&self, a: &Lesson, b: &Lesson) -> Ordering {
        let ordering = match self.key {
            SortKey::Subject => a.subject.to_lowercase().cmp(&b.subject.to_lowercase()),
            SortKey::Location => a.location.to_lowercase().cmp(&b.location.to_lowercase()),
            SortKey::Price => a.price.cmp(&b.price),
            SortKey::Spaces => a.spaces.cmp(&b.spaces),
        };
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    /// Sort `lessons` in place. Stable, so ties keep their incoming order.
    pub fn sort(&self, lessons: &mut [Lesson]) {
        lessons.sort_by(|a, b| self.compare(a, b));
    }

    /// Sorted copy of `lessons`.
    #[must_use]
    pub fn sorted<'a, I>(&self, lessons: I) -> Vec<Lesson>
    where
        I: IntoIterator<Item = &'a Lesson>,
    {
        let mut out: Vec<Lesson> = lessons.into_iter().cloned().collect();
        self.sort(&mut out);
        out
    }
}
