//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! lessons:
//!   - subject: Mathematics
//!     location: Hendon
//!     price: 100
//!     spaces: 5
//!     image: math.svg
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use lesson_shop_core::NewLesson;
use lesson_shop_storefront::config::database_url_from_env;
use lesson_shop_storefront::db::{self, LessonStore, PgLessonStore};

/// Top-level shape of a seed file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    pub lessons: Vec<NewLesson>,
}

/// Check a seed file for lessons the catalog could not display.
///
/// Returns one message per problem.
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, lesson) in seed.lessons.iter().enumerate() {
        let position = index + 1;
        if lesson.subject.trim().is_empty() {
            errors.push(format!("lesson {position}: subject is empty"));
        }
        if lesson.location.trim().is_empty() {
            errors.push(format!("lesson {position}: location is empty"));
        }
        if !lesson.price.fits_numeric(db::PRICE_PRECISION, db::PRICE_SCALE) {
            errors.push(format!(
                "lesson {position}: price {} does not fit the catalog (at most {} decimal places)",
                lesson.price.amount(),
                db::PRICE_SCALE
            ));
        }
        if lesson.image.trim().is_empty() {
            errors.push(format!("lesson {position}: image is empty"));
        } else if Path::new(&lesson.image).file_name() != Some(std::ffi::OsStr::new(&lesson.image)) {
            errors.push(format!(
                "lesson {position}: image must be a plain file name, got '{}'",
                lesson.image
            ));
        }
    }
    errors
}

/// Parse and validate a seed file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML or fails
/// validation.
pub async fn load(path: &Path) -> Result<SeedFile, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;
    info!(lessons = seed.lessons.len(), "Parsed seed file");

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    Ok(seed)
}

/// Insert lessons from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML seed file
/// * `clear_existing` - If true, delete every existing lesson first
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file is invalid or
/// database operations fail.
pub async fn lessons(file_path: &str, clear_existing: bool) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url_from_env()?;

    // Read and validate before connecting to the database
    info!(path = %file_path, "Loading lessons from file");
    let seed = load(Path::new(file_path)).await?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");
    let store = PgLessonStore::new(pool);

    if clear_existing {
        let removed = store.clear().await?;
        info!(removed, "Cleared existing lessons");
    }

    let mut inserted = 0usize;
    for lesson in seed.lessons {
        let stored = store.insert(lesson).await?;
        info!(id = %stored.id, subject = %stored.subject, location = %stored.location, "Inserted lesson");
        inserted += 1;
    }

    info!(inserted, "Seeding complete!");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SEED: &str = r"
lessons:
  - subject: Mathematics
    location: Hendon
    price: 100
    spaces: 5
    image: math.svg
  - subject: Art
    location: Colindale
    price: 70.5
    spaces: 0
    image: art.svg
";

    #[tokio::test]
    async fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lessons.yaml");
        std::fs::write(&path, SEED).unwrap();

        let seed = load(&path).await.unwrap();
        assert_eq!(seed.lessons.len(), 2);
        assert_eq!(seed.lessons[1].spaces, 0);
        assert_eq!(seed.lessons[1].price.to_string(), "70.50");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("nope.yaml")).await.is_err());
    }

    #[test]
    fn test_negative_values_rejected_by_parser() {
        let yaml = "lessons:\n  - {subject: A, location: B, price: -1, spaces: 1, image: a.svg}\n";
        assert!(serde_yaml::from_str::<SeedFile>(yaml).is_err());

        let yaml = "lessons:\n  - {subject: A, location: B, price: 1, spaces: -1, image: a.svg}\n";
        assert!(serde_yaml::from_str::<SeedFile>(yaml).is_err());
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let yaml = r"
lessons:
  - {subject: '', location: Hendon, price: 1, spaces: 1, image: a.svg}
  - {subject: Art, location: ' ', price: 1, spaces: 1, image: ../a.svg}
";
        let seed: SeedFile = serde_yaml::from_str(yaml).unwrap();
        let errors = validate(&seed);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors[0].contains("lesson 1: subject"));
        assert!(errors[2].contains("plain file name"));
    }

    #[test]
    fn test_validate_rejects_unstorable_prices() {
        let yaml = r"
lessons:
  - {subject: Art, location: Hendon, price: 12.345, spaces: 1, image: a.svg}
  - {subject: Art, location: Hendon, price: 100000000, spaces: 1, image: a.svg}
  - {subject: Art, location: Hendon, price: 12.5, spaces: 1, image: a.svg}
";
        let seed: SeedFile = serde_yaml::from_str(yaml).unwrap();
        let errors = validate(&seed);
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors[0].starts_with("lesson 1: price"));
        assert!(errors[1].starts_with("lesson 2: price"));
    }

    #[test]
    fn test_bundled_seed_file_is_valid() {
        let content = include_str!("../../seed/lessons.yaml");
        let seed: SeedFile = serde_yaml::from_str(content).unwrap();
        assert!(!seed.lessons.is_empty());
        assert!(validate(&seed).is_empty());
    }
}
