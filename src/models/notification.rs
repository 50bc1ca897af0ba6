// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::notifications;

/// The event types a notification can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Follow,
    Like,
    Comment,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Follow => "follow",
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
        }
    }
}

/// One row in the per-recipient notification log.
///
/// Immutable after insert except for the two display axes: `seen_at`
/// ("appeared in the feed") and `is_read` ("explicitly acknowledged").
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: i32,
    pub recipient_id: i32,
    pub sender_id: Option<i32>,
    pub notification_type: String,
    pub post_id: Option<i32>,
    pub message: String,
    pub is_read: bool,
    pub seen_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Draft produced by the notification builder. Row id and creation
/// timestamp are assigned by the store on append.
#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub recipient_id: i32,
    pub sender_id: Option<i32>,
    pub notification_type: String,
    pub post_id: Option<i32>,
    pub message: String,
}
