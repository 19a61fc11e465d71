//! Catalog queries against a running storefront.
//!
//! # Environment Variables
//!
//! - `LESSON_SHOP_API_URL` - storefront base URL (default `http://127.0.0.1:3000`)

use lesson_shop_client::{CatalogSort, ClientConfig, HttpShopClient, ShopApi, SortKey, SortOrder};
use lesson_shop_core::Lesson;

fn client() -> Result<HttpShopClient, Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "Using storefront");
    Ok(HttpShopClient::new(&config))
}

/// Render lessons as a fixed-width table.
pub fn render(lessons: &[Lesson]) -> String {
    use std::fmt::Write as _;

    let mut out = format!(
        "{:<16} {:<16} {:>8} {:>6}  {}\n",
        "SUBJECT", "LOCATION", "PRICE", "SPACES", "ID"
    );
    for lesson in lessons {
        let _ = writeln!(
            out,
            "{:<16} {:<16} {:>8} {:>6}  {}",
            lesson.subject,
            lesson.location,
            lesson.price.to_string(),
            lesson.spaces,
            lesson.id
        );
    }
    out
}

/// Print every lesson in the given order.
///
/// # Errors
///
/// Returns an error if the storefront cannot be reached.
pub async fn list(key: SortKey, descending: bool) -> Result<(), Box<dyn std::error::Error>> {
    let order = if descending {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };

    let lessons = client()?.list_lessons().await?;
    let sorted = CatalogSort::new(key, order).sorted(&lessons);

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&sorted));
    }
    Ok(())
}

/// Print lessons whose subject or location contains `text`.
///
/// # Errors
///
/// Returns an error if the text is blank or the storefront cannot be reached.
pub async fn search(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let text = text.trim();
    if text.is_empty() {
        return Err("search text cannot be empty".into());
    }

    let lessons = client()?.search_lessons(text).await?;
    let sorted = CatalogSort::default().sorted(&lessons);

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&sorted));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use lesson_shop_core::{LessonId, Price};

    use super::*;

    #[test]
    fn test_render_table() {
        let lesson = Lesson {
            id: LessonId::generate(),
            subject: "Mathematics".to_owned(),
            location: "Hendon".to_owned(),
            price: Price::from_units(100),
            spaces: 5,
            image: "math.svg".to_owned(),
        };
        let table = render(&[lesson.clone()]);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("SUBJECT"));
        assert!(lines[1].starts_with("Mathematics"));
        assert!(lines[1].contains("100.00"));
        assert!(lines[1].ends_with(&lesson.id.to_string()));
    }
}
