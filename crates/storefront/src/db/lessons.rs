//! `PostgreSQL` lesson store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use lesson_shop_core::{Lesson, LessonId, LessonPatch, NewLesson, Price};

use super::{LessonStore, RepositoryError};

/// Row shape of `storefront.lesson`.
#[derive(Debug, sqlx::FromRow)]
struct LessonRow {
    id: LessonId,
    subject: String,
    location: String,
    price: Price,
    spaces: i32,
    image: String,
}

impl TryFrom<LessonRow> for Lesson {
    type Error = RepositoryError;

    fn try_from(row: LessonRow) -> Result<Self, Self::Error> {
        let spaces = u32::try_from(row.spaces).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "lesson {} has negative spaces ({})",
                row.id, row.spaces
            ))
        })?;

        Ok(Self {
            id: row.id,
            subject: row.subject,
            location: row.location,
            price: row.price,
            spaces,
            image: row.image,
        })
    }
}

/// Convert spaces to the column type.
fn spaces_column(spaces: u32) -> Result<i32, RepositoryError> {
    i32::try_from(spaces)
        .map_err(|_| RepositoryError::DataCorruption(format!("spaces out of range: {spaces}")))
}

/// Build an `ILIKE` pattern matching `text` anywhere, with LIKE wildcards
/// in `text` taken literally.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Lesson store backed by the `storefront.lesson` table.
#[derive(Clone)]
pub struct PgLessonStore {
    pool: PgPool,
}

impl PgLessonStore {
    /// Create a new lesson store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete every lesson. Used by the seeder's `--clear` flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.lesson")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl LessonStore for PgLessonStore {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Lesson>, RepositoryError> {
        let rows = sqlx::query_as::<_, LessonRow>(
            r"
            SELECT id, subject, location, price, spaces, image
            FROM storefront.lesson
            ORDER BY subject, location, id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Lesson::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn search(&self, text: &str) -> Result<Vec<Lesson>, RepositoryError> {
        let rows = sqlx::query_as::<_, LessonRow>(
            r"
            SELECT id, subject, location, price, spaces, image
            FROM storefront.lesson
            WHERE subject ILIKE $1 OR location ILIKE $1
            ORDER BY subject, location, id
            ",
        )
        .bind(contains_pattern(text))
        .fetch_all(&self.pool)
        .await?;

        debug!(matches = rows.len(), "Lesson search complete");
        rows.into_iter().map(Lesson::try_from).collect()
    }

    #[instrument(skip(self, patch), fields(lesson_id = %id))]
    async fn update(&self, id: LessonId, patch: &LessonPatch) -> Result<Lesson, RepositoryError> {
        let spaces = patch.spaces.map(spaces_column).transpose()?;

        let row = sqlx::query_as::<_, LessonRow>(
            r"
            UPDATE storefront.lesson
            SET subject = COALESCE($2, subject),
                location = COALESCE($3, location),
                price = COALESCE($4, price),
                spaces = COALESCE($5, spaces),
                image = COALESCE($6, image)
            WHERE id = $1
            RETURNING id, subject, location, price, spaces, image
            ",
        )
        .bind(id)
        .bind(patch.subject.as_deref())
        .bind(patch.location.as_deref())
        .bind(patch.price)
        .bind(spaces)
        .bind(patch.image.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        debug!(spaces = row.spaces, "Lesson updated");
        row.try_into()
    }

    #[instrument(skip(self, lesson), fields(subject = %lesson.subject))]
    async fn insert(&self, lesson: NewLesson) -> Result<Lesson, RepositoryError> {
        let row = sqlx::query_as::<_, LessonRow>(
            r"
            INSERT INTO storefront.lesson (id, subject, location, price, spaces, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, subject, location, price, spaces, image
            ",
        )
        .bind(LessonId::generate())
        .bind(&lesson.subject)
        .bind(&lesson.location)
        .bind(lesson.price)
        .bind(spaces_column(lesson.spaces)?)
        .bind(&lesson.image)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_text() {
        assert_eq!(contains_pattern("math"), "%math%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern(r"c:\"), r"%c:\\%");
    }

    #[test]
    fn test_row_with_negative_spaces_is_corrupt() {
        let row = LessonRow {
            id: LessonId::generate(),
            subject: "Art".to_owned(),
            location: "Barnet".to_owned(),
            price: Price::from_units(80),
            spaces: -1,
            image: "art.svg".to_owned(),
        };
        assert!(matches!(
            Lesson::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
