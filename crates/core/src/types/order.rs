//! Orders created at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CustomerName, LessonId, OrderId, PhoneNumber};

/// Order payload sent by the checkout flow.
///
/// `lesson_ids` holds one entry per purchased unit, so buying two places on
/// the same lesson repeats its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub name: CustomerName,
    pub phone: PhoneNumber,
    pub lesson_ids: Vec<LessonId>,
}

/// A stored order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub name: CustomerName,
    pub phone: PhoneNumber,
    pub lesson_ids: Vec<LessonId>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build the stored form of `order`.
    #[must_use]
    pub fn from_new(id: OrderId, order: NewOrder, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: order.name,
            phone: order.phone,
            lesson_ids: order.lesson_ids,
            created_at,
        }
    }
}

/// Response body of `POST /orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub id: OrderId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_rejects_invalid_customer() {
        let id = LessonId::generate();
        let body = format!(r#"{{"name":"Ada 2","phone":"123","lesson_ids":["{id}"]}}"#);
        assert!(serde_json::from_str::<NewOrder>(&body).is_err());

        let body = format!(r#"{{"name":"Ada","phone":"12a","lesson_ids":["{id}"]}}"#);
        assert!(serde_json::from_str::<NewOrder>(&body).is_err());
    }

    #[test]
    fn test_payload_keeps_duplicate_units() {
        let id = LessonId::generate();
        let body = format!(r#"{{"name":"Ada","phone":"123","lesson_ids":["{id}","{id}"]}}"#);
        let order: NewOrder = serde_json::from_str(&body).unwrap();
        assert_eq!(order.lesson_ids, vec![id, id]);
    }
}
