// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::auth::AuthUser;
use crate::api::{AppState, PaginationParams};
use crate::error::ApiError;
use crate::models::post::{NewPost, Post, CATEGORIES, MAX_POST_LEN};
use crate::models::user::may_moderate;
use crate::models::within_limit;
use crate::schema::{posts, users};

#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "general".to_string()
}

/// Global timeline of active posts, newest first.
pub async fn list_posts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let mut conn = state.pool.get().await?;

    let rows: Vec<Post> = posts::table
        .filter(posts::is_active.eq(true))
        .order((posts::created_at.desc(), posts::id.desc()))
        .limit(pagination.limit())
        .offset(pagination.offset())
        .load(&mut *conn)
        .await?;

    Ok(Json(rows))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(body): Json<CreatePost>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let content = body.content.trim().to_string();
    if !within_limit(&content, MAX_POST_LEN) {
        return Err(ApiError::Validation(format!(
            "post content must be 1-{} characters",
            MAX_POST_LEN
        )));
    }
    if !CATEGORIES.contains(&body.category.as_str()) {
        return Err(ApiError::Validation(format!(
            "unknown category '{}'",
            body.category
        )));
    }

    let mut conn = state.pool.get().await?;

    let post: Post = diesel::insert_into(posts::table)
        .values(&NewPost {
            author_id: caller,
            content,
            image_url: body.image_url,
            category: body.category,
        })
        .get_result(&mut *conn)
        .await?;

    info!("user {} created post {}", caller, post.id);
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(post_id): Path<i32>,
) -> Result<Json<Post>, ApiError> {
    let mut conn = state.pool.get().await?;

    let post: Option<Post> = posts::table
        .filter(posts::id.eq(post_id))
        .filter(posts::is_active.eq(true))
        .first(&mut *conn)
        .await
        .optional()?;

    post.map(Json)
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

#[derive(Debug, Deserialize, AsChangeset)]
#[diesel(table_name = posts)]
pub struct UpdatePost {
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// A non-author non-admin caller gets NotFound, the same answer as for a
/// post that does not exist.
async fn moderation_gate(
    conn: &mut AsyncPgConnection,
    caller: i32,
    post_id: i32,
) -> Result<i32, ApiError> {
    let author: Option<i32> = posts::table
        .filter(posts::id.eq(post_id))
        .filter(posts::is_active.eq(true))
        .select(posts::author_id)
        .first(conn)
        .await
        .optional()?;
    let Some(author_id) = author else {
        return Err(ApiError::NotFound("Post not found".to_string()));
    };

    if author_id != caller {
        let role: String = users::table
            .filter(users::id.eq(caller))
            .select(users::role)
            .first(conn)
            .await?;
        if !may_moderate(caller, author_id, &role) {
            debug!(
                "user {} may not modify post {} owned by {}",
                caller, post_id, author_id
            );
            return Err(ApiError::NotFound("Post not found".to_string()));
        }
    }

    Ok(post_id)
}

/// Edit a post. Only the author or an admin may edit; `updated_at` is
/// stamped on every successful edit.
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(post_id): Path<i32>,
    Json(mut body): Json<UpdatePost>,
) -> Result<Json<Post>, ApiError> {
    if let Some(content) = body.content.as_mut() {
        *content = content.trim().to_string();
        if !within_limit(content, MAX_POST_LEN) {
            return Err(ApiError::Validation(format!(
                "post content must be 1-{} characters",
                MAX_POST_LEN
            )));
        }
    }
    if let Some(category) = body.category.as_deref() {
        if !CATEGORIES.contains(&category) {
            return Err(ApiError::Validation(format!(
                "unknown category '{}'",
                category
            )));
        }
    }
    if body.content.is_none() && body.image_url.is_none() && body.category.is_none() {
        return Err(ApiError::Validation("nothing to update".to_string()));
    }

    let mut pooled = state.pool.get().await?;
    let conn = &mut *pooled;

    let post_id = moderation_gate(conn, caller, post_id).await?;

    let post: Post = diesel::update(posts::table.filter(posts::id.eq(post_id)))
        .set((&body, posts::updated_at.eq(diesel::dsl::now)))
        .get_result(conn)
        .await?;

    info!("user {} edited post {}", caller, post_id);
    Ok(Json(post))
}

/// Soft-delete a post. The row stays for audit; it simply stops matching
/// the `is_active` filters every read path applies.
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(post_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut pooled = state.pool.get().await?;
    let conn = &mut *pooled;

    let post_id = moderation_gate(conn, caller, post_id).await?;

    diesel::update(posts::table.filter(posts::id.eq(post_id)))
        .set(posts::is_active.eq(false))
        .execute(conn)
        .await?;

    info!("post {} deleted by user {}", post_id, caller);
    Ok(Json(json!({ "message": "Post deleted" })))
}
