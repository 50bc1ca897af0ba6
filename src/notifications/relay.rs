// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::metrics;
use crate::models::notification::Notification;

/// Wire payload pushed to the realtime channel after a notification has
/// committed to the primary store.
#[derive(Debug, Serialize)]
pub struct RelayPayload {
    pub recipient_id: i32,
    pub sender_id: Option<i32>,
    pub notification_type: String,
    pub post_id: Option<i32>,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

impl RelayPayload {
    pub fn from_notification(notification: &Notification) -> Self {
        Self {
            recipient_id: notification.recipient_id,
            sender_id: notification.sender_id,
            notification_type: notification.notification_type.clone(),
            post_id: notification.post_id,
            message: notification.message.clone(),
            is_read: notification.is_read,
            created_at: Utc
                .from_utc_datetime(&notification.created_at)
                .to_rfc3339(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay endpoint returned {0}")]
    Status(reqwest::StatusCode),
}

/// Best-effort forwarder to the external realtime channel.
///
/// At-most-once: one attempt per notification, short timeout, no retry
/// queue. Missing credentials disable the relay at construction; nothing
/// checks them again per call.
pub struct DeliveryRelay {
    target: Option<RelayTarget>,
}

struct RelayTarget {
    client: reqwest::Client,
    endpoint: String,
    service_key: String,
}

impl DeliveryRelay {
    pub fn from_config(config: &RelayConfig) -> Self {
        let (endpoint, service_key) = match (&config.endpoint, &config.service_key) {
            (Some(endpoint), Some(key)) => (endpoint.clone(), key.clone()),
            _ => {
                info!("realtime relay not configured, notifications stay store-only");
                return Self::disabled();
            }
        };

        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!("failed to build relay HTTP client, disabling relay: {}", e);
                return Self::disabled();
            }
        };

        Self {
            target: Some(RelayTarget {
                client,
                endpoint,
                service_key,
            }),
        }
    }

    pub fn disabled() -> Self {
        Self { target: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Push one notification to the realtime channel. A no-op when the
    /// relay is disabled. Runs strictly after the store transaction has
    /// committed, so no locks are held across the network call.
    pub async fn deliver(&self, notification: &Notification) -> Result<(), RelayError> {
        let Some(target) = &self.target else {
            return Ok(());
        };

        let payload = RelayPayload::from_notification(notification);
        let response = target
            .client
            .post(&target.endpoint)
            .header("apikey", &target.service_key)
            .header("Authorization", format!("Bearer {}", target.service_key))
            .header("Prefer", "return=minimal")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RelayError::Status(response.status()));
        }

        debug!(
            "relayed {} notification for user {}",
            payload.notification_type, payload.recipient_id
        );
        Ok(())
    }
}

/// Fire-and-forget dispatch, spawned off the request path. Every failure
/// is counted and logged, never surfaced to the triggering action.
pub fn dispatch(relay: Arc<DeliveryRelay>, notification: Notification) {
    if !relay.is_enabled() {
        return;
    }
    tokio::spawn(async move {
        match relay.deliver(&notification).await {
            Ok(()) => metrics::RELAY_DELIVERIES.inc(),
            Err(e) => {
                metrics::RELAY_FAILURES.inc();
                warn!("notification relay failed, dropping: {}", e);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_notification() -> Notification {
        Notification {
            id: 42,
            recipient_id: 2,
            sender_id: Some(1),
            notification_type: "like".to_string(),
            post_id: Some(10),
            message: "alice liked your post".to_string(),
            is_read: false,
            seen_at: None,
            created_at: NaiveDate::from_ymd_opt(2024, 11, 2)
                .and_then(|d| d.and_hms_opt(12, 30, 0))
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn payload_shape_matches_the_channel_contract() {
        let payload = RelayPayload::from_notification(&sample_notification());
        let json = serde_json::to_value(&payload).expect("serializes");

        assert_eq!(json["recipient_id"], 2);
        assert_eq!(json["sender_id"], 1);
        assert_eq!(json["notification_type"], "like");
        assert_eq!(json["post_id"], 10);
        assert_eq!(json["message"], "alice liked your post");
        assert_eq!(json["is_read"], false);
        assert_eq!(json["created_at"], "2024-11-02T12:30:00+00:00");
    }

    #[test]
    fn system_notifications_carry_null_sender() {
        let mut notification = sample_notification();
        notification.sender_id = None;
        notification.post_id = None;
        let json = serde_json::to_value(RelayPayload::from_notification(&notification))
            .expect("serializes");
        assert!(json["sender_id"].is_null());
        assert!(json["post_id"].is_null());
    }

    #[test]
    fn missing_credentials_disable_the_relay() {
        let relay = DeliveryRelay::from_config(&RelayConfig {
            endpoint: Some("https://realtime.example.com".to_string()),
            service_key: None,
            timeout_secs: 10,
        });
        assert!(!relay.is_enabled());
    }

    #[tokio::test]
    async fn disabled_relay_delivery_is_a_noop() {
        let relay = DeliveryRelay::disabled();
        relay
            .deliver(&sample_notification())
            .await
            .expect("disabled relay never fails");
    }
}
