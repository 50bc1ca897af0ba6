// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::auth::AuthUser;
use crate::api::AppState;
use crate::error::ApiError;
use crate::feed::{self, FeedPage};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<i64>,
}

/// Personal activity feed: own posts plus posts from followed users,
/// newest first, 20 per page.
pub async fn get_feed(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedPage>, ApiError> {
    let page = query.page.unwrap_or(1);
    let mut conn = state.pool.get().await?;

    let feed = feed::compose_feed(&mut conn, caller, page, feed::DEFAULT_PAGE_SIZE).await?;
    Ok(Json(feed))
}
