//! In-memory document store.
//!
//! Implements both [`LessonStore`] and [`OrderStore`] over `RwLock`-guarded
//! maps. Like the Postgres store, each call is atomic on its own and nothing
//! spans calls, so concurrent checkouts race exactly as they do in production.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::instrument;

use lesson_shop_core::{Lesson, LessonId, LessonPatch, NewLesson, NewOrder, Order, OrderId};

use super::{LessonStore, OrderStore, RepositoryError};

/// Process-local lesson and order collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    // Insertion order is kept so listings are stable.
    lessons: RwLock<Vec<Lesson>>,
    orders: RwLock<BTreeMap<OrderId, Order>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `lessons`.
    pub async fn with_lessons(lessons: impl IntoIterator<Item = NewLesson>) -> Self {
        let store = Self::new();
        {
            let mut stored = store.inner.lessons.write().await;
            stored.extend(
                lessons
                    .into_iter()
                    .map(|lesson| lesson.with_id(LessonId::generate())),
            );
        }
        store
    }

    /// Every stored order, oldest first.
    pub async fn orders(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.inner.orders.read().await.values().cloned().collect();
        orders.sort_by_key(|order| order.created_at);
        orders
    }
}

#[async_trait]
impl LessonStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Lesson>, RepositoryError> {
        Ok(self.inner.lessons.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn search(&self, text: &str) -> Result<Vec<Lesson>, RepositoryError> {
        Ok(self
            .inner
            .lessons
            .read()
            .await
            .iter()
            .filter(|lesson| lesson.matches(text))
            .cloned()
            .collect())
    }

    #[instrument(skip(self, patch), fields(lesson_id = %id))]
    async fn update(&self, id: LessonId, patch: &LessonPatch) -> Result<Lesson, RepositoryError> {
        let mut lessons = self.inner.lessons.write().await;
        let lesson = lessons
            .iter_mut()
            .find(|lesson| lesson.id == id)
            .ok_or(RepositoryError::NotFound)?;

        patch.apply(lesson);
        Ok(lesson.clone())
    }

    async fn insert(&self, lesson: NewLesson) -> Result<Lesson, RepositoryError> {
        let lesson = lesson.with_id(LessonId::generate());
        self.inner.lessons.write().await.push(lesson.clone());
        Ok(lesson)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    #[instrument(skip(self, order), fields(units = order.lesson_ids.len()))]
    async fn insert(&self, order: NewOrder) -> Result<OrderId, RepositoryError> {
        let id = OrderId::generate();
        let order = Order::from_new(id, order, Utc::now());
        self.inner.orders.write().await.insert(id, order);
        Ok(id)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.inner.orders.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lesson_shop_core::{CustomerName, PhoneNumber, Price};

    use super::*;

    fn new_lesson(subject: &str, location: &str, spaces: u32) -> NewLesson {
        NewLesson {
            subject: subject.to_owned(),
            location: location.to_owned(),
            price: Price::from_units(100),
            spaces,
            image: format!("{}.svg", subject.to_lowercase()),
        }
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_over_subject_and_location() {
        let store = MemoryStore::with_lessons([
            new_lesson("Mathematics", "Hendon", 5),
            new_lesson("English", "Colindale", 5),
            new_lesson("Music", "Mathstown", 5),
        ])
        .await;

        let found = store.search("math").await.unwrap();
        let subjects: Vec<_> = found.iter().map(|l| l.subject.as_str()).collect();
        assert_eq!(subjects, ["Mathematics", "Music"]);
    }

    #[tokio::test]
    async fn test_update_unknown_lesson_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(LessonId::generate(), &LessonPatch::spaces(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let store = MemoryStore::with_lessons([new_lesson("Art", "Barnet", 5)]).await;
        let id = store.find_all().await.unwrap()[0].id;

        let updated = store.update(id, &LessonPatch::spaces(3)).await.unwrap();
        assert_eq!(updated.spaces, 3);
        assert_eq!(updated.subject, "Art");
        assert_eq!(store.find_all().await.unwrap()[0].spaces, 3);
    }

    #[tokio::test]
    async fn test_insert_and_get_order() {
        let store = MemoryStore::new();
        let lesson_id = LessonId::generate();
        let id = OrderStore::insert(
            &store,
            NewOrder {
                name: CustomerName::parse("Ada").unwrap(),
                phone: PhoneNumber::parse("123").unwrap(),
                lesson_ids: vec![lesson_id, lesson_id],
            },
        )
        .await
        .unwrap();

        let order = store.get(id).await.unwrap().unwrap();
        assert_eq!(order.lesson_ids.len(), 2);
        assert_eq!(store.orders().await.len(), 1);
    }
}
