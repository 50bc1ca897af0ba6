// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

pub mod builder;
pub mod relay;
pub mod store;

use diesel_async::AsyncPgConnection;
use tracing::debug;

use crate::error::ApiError;
use crate::events::SocialEvent;
use crate::metrics;
use crate::models::notification::Notification;

/// Build and durably append the notification for an event, if the event
/// produces one. Must run inside the caller's transaction so the
/// notification commits (or rolls back) together with the triggering row
/// and its counter update.
pub async fn record_event(
    conn: &mut AsyncPgConnection,
    event: &SocialEvent,
) -> Result<Option<Notification>, ApiError> {
    match builder::build(event) {
        Some(draft) => {
            let notification = store::append(conn, &draft).await?;
            Ok(Some(notification))
        }
        None => {
            metrics::NOTIFICATIONS_SUPPRESSED.inc();
            debug!("suppressed {} notification for self-action", event.kind());
            Ok(None)
        }
    }
}
