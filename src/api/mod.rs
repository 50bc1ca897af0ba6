pub mod auth;
mod handlers;

use crate::config::Config;
use crate::db::{Database, DbPool};
use crate::notifications::relay::DeliveryRelay;
use anyhow::Result;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub relay: Arc<DeliveryRelay>,
}

/// Offset/limit query parameters for plain list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Start the API server
pub async fn start_api_server(db: Arc<Database>, relay: Arc<DeliveryRelay>) -> Result<()> {
    let config = Config::get();

    let cors = if config.server.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    };

    let state = AppState {
        pool: db.pool(),
        relay,
    };

    let app = Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))
        // Users and the follow graph
        .route(
            "/api/users",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route("/api/users/me", patch(handlers::users::update_profile))
        .route("/api/users/:id", get(handlers::users::get_user))
        .route(
            "/api/users/:id/follow",
            post(handlers::follows::follow_user).delete(handlers::follows::unfollow_user),
        )
        .route(
            "/api/users/:id/followers",
            get(handlers::follows::get_followers),
        )
        .route(
            "/api/users/:id/following",
            get(handlers::follows::get_following),
        )
        // Posts, likes, comments
        .route(
            "/api/posts",
            get(handlers::posts::list_posts).post(handlers::posts::create_post),
        )
        .route(
            "/api/posts/:id",
            get(handlers::posts::get_post)
                .patch(handlers::posts::update_post)
                .delete(handlers::posts::delete_post),
        )
        .route(
            "/api/posts/:id/like",
            post(handlers::likes::like_post).delete(handlers::likes::unlike_post),
        )
        .route(
            "/api/posts/:id/like-status",
            get(handlers::likes::like_status),
        )
        .route(
            "/api/posts/:id/comments",
            get(handlers::comments::list_comments).post(handlers::comments::create_comment),
        )
        .route(
            "/api/comments/:id",
            delete(handlers::comments::delete_comment),
        )
        // Activity feed
        .route("/api/feed", get(handlers::feed::get_feed))
        // Notification query surface
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/api/notifications/unread-count",
            get(handlers::notifications::unread_count),
        )
        .route(
            "/api/notifications/mark-seen",
            patch(handlers::notifications::mark_seen),
        )
        .route(
            "/api/notifications/mark-all-read",
            post(handlers::notifications::mark_all_read),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_read),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = format!("{}:{}", config.server.host, config.server.port).parse::<SocketAddr>()?;

    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            limit: Some(500),
            offset: Some(-3),
        };
        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 0);
    }
}
