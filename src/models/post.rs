// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{comments, likes, posts};

pub const MAX_POST_LEN: usize = 280;
pub const MAX_COMMENT_LEN: usize = 200;
pub const CATEGORIES: [&str; 3] = ["general", "announcement", "question"];

/// A short text/image post. `like_count` and `comment_count` are
/// denormalized caches maintained by the like/comment mutations, never
/// recomputed on read.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub content: String,
    pub image_url: Option<String>,
    pub category: String,
    pub is_active: bool,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub author_id: i32,
    pub content: String,
    pub image_url: Option<String>,
    pub category: String,
}

/// Binary like marker, unique per (user, post). Presence implies exactly
/// one increment of the post's like_count.
#[derive(Debug, Insertable)]
#[diesel(table_name = likes)]
pub struct NewLike {
    pub user_id: i32,
    pub post_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub id: i32,
    pub author_id: i32,
    pub post_id: i32,
    pub content: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub author_id: i32,
    pub post_id: i32,
    pub content: String,
}
