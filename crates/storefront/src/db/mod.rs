//! Document store access for lessons and orders.
//!
//! The catalog and order services only need a handful of document operations
//! (find all, find by text filter, partial update, insert), so the stores are
//! traits with two implementations:
//!
//! - [`PgLessonStore`] / [`PgOrderStore`] - `PostgreSQL` (`lessons`, `orders` tables)
//! - [`MemoryStore`] - process-local maps for development and tests
//!
//! Every call is a single-document operation. There are no multi-document
//! transactions: an order insert and the space updates that follow it are
//! independent writes.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p lesson-shop-cli -- migrate
//! ```

pub mod lessons;
pub mod memory;
pub mod orders;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use lesson_shop_core::{Lesson, LessonId, LessonPatch, NewLesson, NewOrder, Order, OrderId};

pub use lessons::PgLessonStore;
pub use memory::MemoryStore;
pub use orders::PgOrderStore;

/// Precision of the `lesson.price` column, `NUMERIC(10, 2)`.
pub const PRICE_PRECISION: u32 = 10;
/// Decimal places of the `lesson.price` column.
pub const PRICE_SCALE: u32 = 2;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Lesson document collection.
#[async_trait]
pub trait LessonStore: Send + Sync {
    /// Every lesson, in a stable order.
    async fn find_all(&self) -> Result<Vec<Lesson>, RepositoryError>;

    /// Lessons whose subject or location contains `text`, ignoring case.
    async fn search(&self, text: &str) -> Result<Vec<Lesson>, RepositoryError>;

    /// Merge `patch` into the lesson and return the updated document.
    ///
    /// Returns [`RepositoryError::NotFound`] if no lesson has this id.
    async fn update(&self, id: LessonId, patch: &LessonPatch) -> Result<Lesson, RepositoryError>;

    /// Store a new lesson.
    async fn insert(&self, lesson: NewLesson) -> Result<Lesson, RepositoryError>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Order document collection.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist the order and return its generated id.
    async fn insert(&self, order: NewOrder) -> Result<OrderId, RepositoryError>;

    /// Look up a stored order.
    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
