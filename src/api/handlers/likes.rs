// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::auth::AuthUser;
use crate::api::AppState;
use crate::counters;
use crate::error::ApiError;
use crate::events::{PostRef, SocialEvent, UserRef};
use crate::models::notification::Notification;
use crate::models::post::NewLike;
use crate::notifications::{self, relay};
use crate::schema::{likes, posts, users};

enum LikeOutcome {
    Liked(Option<Notification>),
    AlreadyLiked,
}

async fn active_post(
    conn: &mut AsyncPgConnection,
    post_id: i32,
) -> Result<(i32, i32), ApiError> {
    let post: Option<(i32, i32)> = posts::table
        .filter(posts::id.eq(post_id))
        .filter(posts::is_active.eq(true))
        .select((posts::id, posts::author_id))
        .first(conn)
        .await
        .optional()?;
    post.ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

/// Like a post. Idempotent under races: the unique (user, post)
/// constraint resolves concurrent duplicates to one row, one counter
/// increment and one notification, all committed atomically.
pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(post_id): Path<i32>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut pooled = state.pool.get().await?;
    let conn = &mut *pooled;

    let (post_id, author_id) = active_post(conn, post_id).await?;

    let outcome = conn
        .transaction::<LikeOutcome, ApiError, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(likes::table)
                    .values(&NewLike {
                        user_id: caller,
                        post_id,
                    })
                    .on_conflict((likes::user_id, likes::post_id))
                    .do_nothing()
                    .execute(conn)
                    .await?;

                if inserted == 0 {
                    return Ok(LikeOutcome::AlreadyLiked);
                }

                counters::bump_like_count(conn, post_id).await?;

                let handle: String = users::table
                    .filter(users::id.eq(caller))
                    .select(users::handle)
                    .first(conn)
                    .await?;

                let event = SocialEvent::LikeCreated {
                    liker: UserRef { id: caller, handle },
                    post: PostRef {
                        id: post_id,
                        author_id,
                    },
                };
                let notification = notifications::record_event(conn, &event).await?;
                Ok(LikeOutcome::Liked(notification))
            }
            .scope_boxed()
        })
        .await?;

    match outcome {
        LikeOutcome::Liked(notification) => {
            info!("user {} liked post {}", caller, post_id);
            if let Some(n) = notification {
                relay::dispatch(state.relay.clone(), n);
            }
            Ok((StatusCode::CREATED, Json(json!({ "message": "Post liked" }))))
        }
        LikeOutcome::AlreadyLiked => {
            debug!("user {} already liked post {}", caller, post_id);
            Ok((StatusCode::OK, Json(json!({ "message": "Already liked" }))))
        }
    }
}

/// Remove a like. The counter decrement is floored at zero so a
/// double-delete race can never drive it negative.
pub async fn unlike_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(post_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut pooled = state.pool.get().await?;
    let conn = &mut *pooled;

    let (post_id, _author_id) = active_post(conn, post_id).await?;

    conn.transaction::<(), ApiError, _>(|conn| {
        async move {
            let deleted = diesel::delete(
                likes::table
                    .filter(likes::user_id.eq(caller))
                    .filter(likes::post_id.eq(post_id)),
            )
            .execute(conn)
            .await?;

            if deleted == 0 {
                return Err(ApiError::Validation("Not liked".to_string()));
            }

            counters::drop_like_count(conn, post_id).await?;

            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    info!("user {} unliked post {}", caller, post_id);
    Ok(Json(json!({ "message": "Post unliked" })))
}

pub async fn like_status(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(post_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut pooled = state.pool.get().await?;
    let conn = &mut *pooled;

    let (post_id, _author_id) = active_post(conn, post_id).await?;

    let count: i64 = likes::table
        .filter(likes::user_id.eq(caller))
        .filter(likes::post_id.eq(post_id))
        .count()
        .get_result(conn)
        .await?;

    Ok(Json(json!({ "is_liked": count > 0 })))
}
