// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::auth::AuthUser;
use crate::api::AppState;
use crate::error::ApiError;
use crate::events::{SocialEvent, UserRef};
use crate::models::notification::Notification;
use crate::models::user::{FollowDetail, NewFollow};
use crate::notifications::{self, relay};
use crate::schema::{follows, users};

enum FollowOutcome {
    Created(Option<Notification>),
    AlreadyFollowing,
}

/// Follow another user. Duplicate follows are benign no-ops; the follow
/// edge and its notification commit in one transaction, and the realtime
/// relay push happens strictly after that commit.
pub async fn follow_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<i32>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if user_id == caller {
        return Err(ApiError::Validation("Cannot follow yourself".to_string()));
    }

    let mut pooled = state.pool.get().await?;
    let conn = &mut *pooled;

    // Target must exist and be active before we touch the graph.
    let target_exists: i64 = users::table
        .filter(users::id.eq(user_id))
        .filter(users::is_active.eq(true))
        .count()
        .get_result(conn)
        .await?;
    if target_exists == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let outcome = conn
        .transaction::<FollowOutcome, ApiError, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(follows::table)
                    .values(&NewFollow {
                        follower_id: caller,
                        following_id: user_id,
                    })
                    .on_conflict((follows::follower_id, follows::following_id))
                    .do_nothing()
                    .execute(conn)
                    .await?;

                if inserted == 0 {
                    return Ok(FollowOutcome::AlreadyFollowing);
                }

                let handle: String = users::table
                    .filter(users::id.eq(caller))
                    .select(users::handle)
                    .first(conn)
                    .await?;

                let event = SocialEvent::FollowCreated {
                    follower: UserRef { id: caller, handle },
                    following_id: user_id,
                };
                let notification = notifications::record_event(conn, &event).await?;
                Ok(FollowOutcome::Created(notification))
            }
            .scope_boxed()
        })
        .await?;

    match outcome {
        FollowOutcome::Created(notification) => {
            info!("user {} followed user {}", caller, user_id);
            if let Some(n) = notification {
                relay::dispatch(state.relay.clone(), n);
            }
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Successfully followed user" })),
            ))
        }
        FollowOutcome::AlreadyFollowing => {
            debug!("user {} already follows user {}", caller, user_id);
            Ok((
                StatusCode::OK,
                Json(json!({ "message": "Already following this user" })),
            ))
        }
    }
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get().await?;

    let deleted = diesel::delete(
        follows::table
            .filter(follows::follower_id.eq(caller))
            .filter(follows::following_id.eq(user_id)),
    )
    .execute(&mut *conn)
    .await?;

    if deleted == 0 {
        return Err(ApiError::Validation(
            "Not following this user".to_string(),
        ));
    }

    info!("user {} unfollowed user {}", caller, user_id);
    Ok(Json(json!({ "message": "Successfully unfollowed user" })))
}

/// List the accounts following a user, most recent first.
pub async fn get_followers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<FollowDetail>>, ApiError> {
    let mut conn = state.pool.get().await?;

    let rows: Vec<(i32, String, String, NaiveDateTime)> = follows::table
        .inner_join(users::table.on(users::id.eq(follows::follower_id)))
        .filter(follows::following_id.eq(user_id))
        .select((
            users::id,
            users::handle,
            users::display_name,
            follows::created_at,
        ))
        .order(follows::created_at.desc())
        .load(&mut *conn)
        .await?;

    Ok(Json(into_details(rows)))
}

/// List the accounts a user follows, most recent first.
pub async fn get_following(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<FollowDetail>>, ApiError> {
    let mut conn = state.pool.get().await?;

    let rows: Vec<(i32, String, String, NaiveDateTime)> = follows::table
        .inner_join(users::table.on(users::id.eq(follows::following_id)))
        .filter(follows::follower_id.eq(user_id))
        .select((
            users::id,
            users::handle,
            users::display_name,
            follows::created_at,
        ))
        .order(follows::created_at.desc())
        .load(&mut *conn)
        .await?;

    Ok(Json(into_details(rows)))
}

fn into_details(rows: Vec<(i32, String, String, NaiveDateTime)>) -> Vec<FollowDetail> {
    rows.into_iter()
        .map(|(id, handle, display_name, followed_at)| FollowDetail {
            id,
            handle,
            display_name,
            followed_at,
        })
        .collect()
}
