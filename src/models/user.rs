// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{follows, users};

/// A registered account. Accounts are soft-deactivated via `is_active`,
/// never hard-deleted.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub handle: String,
    pub display_name: String,
    pub role: String,
    pub privacy: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub const ROLE_ADMIN: &str = "admin";
pub const PRIVACY_LEVELS: [&str; 2] = ["public", "private"];

/// Whether `caller` may edit or delete content owned by `author_id`:
/// the author themselves, or an admin account.
pub fn may_moderate(caller_id: i32, author_id: i32, caller_role: &str) -> bool {
    caller_id == author_id || caller_role == ROLE_ADMIN
}

/// DTO for registering a new account.
#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub handle: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_privacy")]
    pub privacy: String,
}

fn default_privacy() -> String {
    "public".to_string()
}

/// Directed follow edge, unique per ordered pair.
#[derive(Debug, Insertable)]
#[diesel(table_name = follows)]
pub struct NewFollow {
    pub follower_id: i32,
    pub following_id: i32,
}

/// Follower/following list entry joined with account details.
#[derive(Debug, Serialize)]
pub struct FollowDetail {
    pub id: i32,
    pub handle: String,
    pub display_name: String,
    pub followed_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authors_moderate_their_own_content() {
        assert!(may_moderate(7, 7, "user"));
    }

    #[test]
    fn admins_moderate_anything() {
        assert!(may_moderate(1, 7, ROLE_ADMIN));
    }

    #[test]
    fn strangers_moderate_nothing() {
        assert!(!may_moderate(2, 7, "user"));
    }
}
