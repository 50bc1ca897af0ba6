// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Snapshot of the acting user carried inside an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i32,
    pub handle: String,
}

/// Snapshot of the post an event acts on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRef {
    pub id: i32,
    pub author_id: i32,
}

/// Social actions that fan out into notifications.
///
/// Mutation handlers emit these explicitly, inside the same transaction
/// that writes the triggering row. There are no implicit save hooks; this
/// is the single notification creation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocialEvent {
    FollowCreated { follower: UserRef, following_id: i32 },
    LikeCreated { liker: UserRef, post: PostRef },
    CommentCreated { author: UserRef, post: PostRef },
}

impl SocialEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SocialEvent::FollowCreated { .. } => "follow",
            SocialEvent::LikeCreated { .. } => "like",
            SocialEvent::CommentCreated { .. } => "comment",
        }
    }
}
