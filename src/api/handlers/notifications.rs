// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::api::auth::AuthUser;
use crate::api::AppState;
use crate::error::ApiError;
use crate::models::notification::Notification;
use crate::notifications::store;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Newest-first notification list for the caller, default 20.
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(store::DEFAULT_LIST_LIMIT)
        .clamp(1, 100);

    let mut conn = state.pool.get().await?;
    let rows = store::list_for_recipient(&mut conn, caller, limit).await?;
    Ok(Json(rows))
}

pub async fn unread_count(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get().await?;
    let count = store::unread_count(&mut conn, caller).await?;
    Ok(Json(json!({ "unread_count": count })))
}

/// Bulk-stamp the caller's unseen notifications. Safe to retry.
pub async fn mark_seen(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get().await?;
    let updated = store::mark_seen(&mut conn, caller).await?;
    debug!("marked {} notifications seen for user {}", updated, caller);
    Ok(Json(json!({ "message": "Notifications marked as seen" })))
}

/// Acknowledge one notification, scoped to the caller.
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(notification_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get().await?;
    store::mark_read(&mut conn, caller, notification_id).await?;
    Ok(Json(json!({ "message": "Notification marked as read" })))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get().await?;
    let updated = store::mark_all_read(&mut conn, caller).await?;
    debug!("marked {} notifications read for user {}", updated, caller);
    Ok(Json(json!({ "message": "All notifications marked as read" })))
}
