// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use tracing::{debug, info};

use crate::api::auth::AuthUser;
use crate::api::{AppState, PaginationParams};
use crate::error::ApiError;
use crate::models::user::{NewUser, User, PRIVACY_LEVELS, ROLE_ADMIN};
use crate::models::within_limit;
use crate::schema::users;

const MAX_HANDLE_LEN: usize = 30;
const SEARCH_RESULT_LIMIT: i64 = 10;

/// Register a new account. Credentials and token issuance live in the
/// upstream auth service; this only creates the social profile row.
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    new_user.handle = new_user.handle.trim().to_string();
    if !within_limit(&new_user.handle, MAX_HANDLE_LEN) {
        return Err(ApiError::Validation(format!(
            "handle must be 1-{} characters",
            MAX_HANDLE_LEN
        )));
    }

    let mut conn = state.pool.get().await?;

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result(&mut *conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => ApiError::Validation("Handle already taken".to_string()),
            other => ApiError::from(other),
        })?;

    info!("registered user {} ({})", user.id, user.handle);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    debug!("fetching user {}", user_id);
    let mut conn = state.pool.get().await?;

    let user: Option<User> = users::table
        .filter(users::id.eq(user_id))
        .filter(users::is_active.eq(true))
        .first(&mut *conn)
        .await
        .optional()?;

    user.map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

#[derive(Debug, Deserialize, AsChangeset)]
#[diesel(table_name = users)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub privacy: Option<String>,
}

/// Update the caller's own profile. `updated_at` is stamped on every
/// successful update.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(body): Json<UpdateProfile>,
) -> Result<Json<User>, ApiError> {
    if let Some(privacy) = body.privacy.as_deref() {
        if !PRIVACY_LEVELS.contains(&privacy) {
            return Err(ApiError::Validation(format!(
                "unknown privacy level '{}'",
                privacy
            )));
        }
    }
    if body.display_name.is_none() && body.privacy.is_none() {
        return Err(ApiError::Validation("nothing to update".to_string()));
    }

    let mut conn = state.pool.get().await?;

    let user: Option<User> = diesel::update(
        users::table
            .filter(users::id.eq(caller))
            .filter(users::is_active.eq(true)),
    )
    .set((&body, users::updated_at.eq(diesel::dsl::now)))
    .get_result(&mut *conn)
    .await
    .optional()?;

    info!("user {} updated their profile", caller);
    user.map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Directory lookup. Admins with no search term get the full paginated
/// roster; everyone else searches by handle and gets at most
/// `SEARCH_RESULT_LIMIT` matches. An empty search yields nothing.
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<Vec<User>>, ApiError> {
    let mut conn = state.pool.get().await?;

    let term = params.search.as_deref().unwrap_or("").trim().to_string();
    if term.is_empty() {
        let role: String = users::table
            .filter(users::id.eq(caller))
            .select(users::role)
            .first(&mut *conn)
            .await?;
        if role != ROLE_ADMIN {
            return Ok(Json(Vec::new()));
        }

        let pagination = PaginationParams {
            limit: params.limit,
            offset: params.offset,
        };
        let rows: Vec<User> = users::table
            .filter(users::is_active.eq(true))
            .order(users::id.asc())
            .limit(pagination.limit())
            .offset(pagination.offset())
            .load(&mut *conn)
            .await?;
        return Ok(Json(rows));
    }

    // Escape LIKE metacharacters so the term matches literally.
    let pattern = format!(
        "%{}%",
        term.replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    );
    let rows: Vec<User> = users::table
        .filter(users::is_active.eq(true))
        .filter(users::handle.ilike(pattern))
        .order(users::handle.asc())
        .limit(SEARCH_RESULT_LIMIT)
        .load(&mut *conn)
        .await?;

    Ok(Json(rows))
}
