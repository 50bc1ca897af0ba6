// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::auth::AuthUser;
use crate::api::AppState;
use crate::counters;
use crate::error::ApiError;
use crate::events::{PostRef, SocialEvent, UserRef};
use crate::models::notification::Notification;
use crate::models::post::{Comment, NewComment, MAX_COMMENT_LEN};
use crate::models::within_limit;
use crate::models::user::may_moderate;
use crate::notifications::{self, relay};
use crate::schema::{comments, posts, users};

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub content: String,
}

/// Comments on a post, oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(post_id): Path<i32>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let mut conn = state.pool.get().await?;

    let post_exists: i64 = posts::table
        .filter(posts::id.eq(post_id))
        .filter(posts::is_active.eq(true))
        .count()
        .get_result(&mut *conn)
        .await?;
    if post_exists == 0 {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    let rows: Vec<Comment> = comments::table
        .filter(comments::post_id.eq(post_id))
        .filter(comments::is_active.eq(true))
        .order(comments::created_at.asc())
        .load(&mut *conn)
        .await?;

    Ok(Json(rows))
}

/// Add a comment. The comment row, the post's comment_count bump and the
/// author's notification commit as one transaction.
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(post_id): Path<i32>,
    Json(body): Json<CreateComment>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let content = body.content.trim().to_string();
    if !within_limit(&content, MAX_COMMENT_LEN) {
        return Err(ApiError::Validation(format!(
            "comment must be 1-{} characters",
            MAX_COMMENT_LEN
        )));
    }

    let mut pooled = state.pool.get().await?;
    let conn = &mut *pooled;

    let post: Option<(i32, i32)> = posts::table
        .filter(posts::id.eq(post_id))
        .filter(posts::is_active.eq(true))
        .select((posts::id, posts::author_id))
        .first(conn)
        .await
        .optional()?;
    let Some((post_id, author_id)) = post else {
        return Err(ApiError::NotFound("Post not found".to_string()));
    };

    let (comment, notification) = conn
        .transaction::<(Comment, Option<Notification>), ApiError, _>(|conn| {
            async move {
                let comment: Comment = diesel::insert_into(comments::table)
                    .values(&NewComment {
                        author_id: caller,
                        post_id,
                        content,
                    })
                    .get_result(conn)
                    .await?;

                counters::bump_comment_count(conn, post_id).await?;

                let handle: String = users::table
                    .filter(users::id.eq(caller))
                    .select(users::handle)
                    .first(conn)
                    .await?;

                let event = SocialEvent::CommentCreated {
                    author: UserRef { id: caller, handle },
                    post: PostRef {
                        id: post_id,
                        author_id,
                    },
                };
                let notification = notifications::record_event(conn, &event).await?;
                Ok((comment, notification))
            }
            .scope_boxed()
        })
        .await?;

    info!("user {} commented on post {}", caller, post_id);
    if let Some(n) = notification {
        relay::dispatch(state.relay.clone(), n);
    }

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Soft-delete a comment. Allowed for the comment author or an admin;
/// anyone else sees NotFound rather than a permissions hint.
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(comment_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut pooled = state.pool.get().await?;
    let conn = &mut *pooled;

    let comment: Option<(i32, i32, i32)> = comments::table
        .filter(comments::id.eq(comment_id))
        .filter(comments::is_active.eq(true))
        .select((comments::id, comments::author_id, comments::post_id))
        .first(conn)
        .await
        .optional()?;
    let Some((comment_id, author_id, post_id)) = comment else {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    };

    if author_id != caller {
        let role: String = users::table
            .filter(users::id.eq(caller))
            .select(users::role)
            .first(conn)
            .await?;
        if !may_moderate(caller, author_id, &role) {
            debug!(
                "user {} may not delete comment {} owned by {}",
                caller, comment_id, author_id
            );
            return Err(ApiError::NotFound("Comment not found".to_string()));
        }
    }

    conn.transaction::<(), ApiError, _>(|conn| {
        async move {
            diesel::update(comments::table.filter(comments::id.eq(comment_id)))
                .set(comments::is_active.eq(false))
                .execute(conn)
                .await?;

            counters::drop_comment_count(conn, post_id).await?;

            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    info!("comment {} deleted by user {}", comment_id, caller);
    Ok(Json(json!({ "message": "Comment deleted" })))
}
