// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::error::ApiError;
use crate::metrics;
use crate::models::notification::{NewNotification, Notification};
use crate::schema::notifications;

pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Durably append a notification draft. The row id and creation timestamp
/// are assigned by the database on insert. Takes the caller's connection
/// so the append joins whatever transaction is already open.
pub async fn append(
    conn: &mut AsyncPgConnection,
    draft: &NewNotification,
) -> Result<Notification, ApiError> {
    let row: Notification = diesel::insert_into(notifications::table)
        .values(draft)
        .get_result(conn)
        .await?;

    metrics::NOTIFICATIONS_CREATED
        .with_label_values(&[row.notification_type.as_str()])
        .inc();

    Ok(row)
}

/// Newest-first page of a recipient's notifications. Restartable read,
/// not a live stream.
pub async fn list_for_recipient(
    conn: &mut AsyncPgConnection,
    recipient_id: i32,
    limit: i64,
) -> Result<Vec<Notification>, ApiError> {
    let rows = notifications::table
        .filter(notifications::recipient_id.eq(recipient_id))
        .order((notifications::created_at.desc(), notifications::id.desc()))
        .limit(limit)
        .load(conn)
        .await?;
    Ok(rows)
}

/// Count of unseen rows. "Unread" is keyed on `seen_at` only; the
/// separate `is_read` flag does not participate.
pub async fn unread_count(
    conn: &mut AsyncPgConnection,
    recipient_id: i32,
) -> Result<i64, ApiError> {
    let count = notifications::table
        .filter(notifications::recipient_id.eq(recipient_id))
        .filter(notifications::seen_at.is_null())
        .count()
        .get_result(conn)
        .await?;
    Ok(count)
}

/// Stamp `seen_at` on every currently-unseen row of the recipient.
/// Leaves `is_read` untouched. Idempotent: already-seen rows keep their
/// original timestamp.
pub async fn mark_seen(
    conn: &mut AsyncPgConnection,
    recipient_id: i32,
) -> Result<usize, ApiError> {
    let updated = diesel::update(
        notifications::table
            .filter(notifications::recipient_id.eq(recipient_id))
            .filter(notifications::seen_at.is_null()),
    )
    .set(notifications::seen_at.eq(Utc::now().naive_utc()))
    .execute(conn)
    .await?;
    Ok(updated)
}

/// Acknowledge a single notification. Scoped to the recipient: a row that
/// does not exist or belongs to another user is NotFound either way, so
/// callers cannot probe or flip other users' rows.
pub async fn mark_read(
    conn: &mut AsyncPgConnection,
    recipient_id: i32,
    notification_id: i32,
) -> Result<(), ApiError> {
    let updated = diesel::update(
        notifications::table
            .filter(notifications::id.eq(notification_id))
            .filter(notifications::recipient_id.eq(recipient_id)),
    )
    .set(notifications::is_read.eq(true))
    .execute(conn)
    .await?;

    if updated == 0 {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }
    Ok(())
}

/// Acknowledge everything unread for the recipient. Idempotent.
pub async fn mark_all_read(
    conn: &mut AsyncPgConnection,
    recipient_id: i32,
) -> Result<usize, ApiError> {
    let updated = diesel::update(
        notifications::table
            .filter(notifications::recipient_id.eq(recipient_id))
            .filter(notifications::is_read.eq(false)),
    )
    .set(notifications::is_read.eq(true))
    .execute(conn)
    .await?;
    Ok(updated)
}
