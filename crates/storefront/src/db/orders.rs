//! `PostgreSQL` order store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use lesson_shop_core::{CustomerName, LessonId, NewOrder, Order, OrderId, PhoneNumber};

use super::{OrderStore, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    name: String,
    phone: String,
    lesson_ids: Vec<LessonId>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let name = CustomerName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid name in database: {e}"))
        })?;
        let phone = PhoneNumber::parse(&row.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name,
            phone,
            lesson_ids: row.lesson_ids,
            created_at: row.created_at,
        })
    }
}

/// Order store backed by the `storefront.order` table.
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new order store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    #[instrument(skip(self, order), fields(units = order.lesson_ids.len()))]
    async fn insert(&self, order: NewOrder) -> Result<OrderId, RepositoryError> {
        let id = OrderId::generate();

        sqlx::query(
            r#"
            INSERT INTO storefront."order" (id, name, phone, lesson_ids)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(order.name.as_str())
        .bind(order.phone.as_str())
        .bind(&order.lesson_ids)
        .execute(&self.pool)
        .await?;

        debug!(order_id = %id, "Order inserted");
        Ok(id)
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, name, phone, lesson_ids, created_at
            FROM storefront."order"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }
}
