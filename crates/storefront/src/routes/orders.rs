//! Order service route handlers.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::instrument;

use lesson_shop_core::{NewOrder, OrderCreated};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Persist an order and return its generated id.
///
/// Name and phone are validated while the body is decoded. The order is
/// stored as given: no space accounting happens here, the client follows up
/// with one lesson update per purchased lesson.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderCreated>)> {
    let Json(order) = payload?;
    if order.lesson_ids.is_empty() {
        return Err(AppError::BadRequest(
            "order must contain at least one lesson".to_string(),
        ));
    }

    let units = order.lesson_ids.len();
    let id = state.orders().insert(order).await?;
    tracing::info!(order_id = %id, units, "Order created");

    Ok((StatusCode::CREATED, Json(OrderCreated { id })))
}
