// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

use crate::events::SocialEvent;
use crate::models::notification::{NewNotification, NotificationKind};

/// Turn a social event into a notification draft, or suppress it.
///
/// Self-actions never notify: liking or commenting on your own post, or
/// (defensively) a follow edge pointing back at its own follower, all
/// yield `None`. Suppression is not an error; the caller simply writes
/// no row.
pub fn build(event: &SocialEvent) -> Option<NewNotification> {
    match event {
        SocialEvent::FollowCreated {
            follower,
            following_id,
        } => {
            // Self-follows are rejected upstream; re-check anyway.
            if follower.id == *following_id {
                return None;
            }
            Some(NewNotification {
                recipient_id: *following_id,
                sender_id: Some(follower.id),
                notification_type: NotificationKind::Follow.as_str().to_string(),
                post_id: None,
                message: format!("{} started following you", follower.handle),
            })
        }
        SocialEvent::LikeCreated { liker, post } => {
            if post.author_id == liker.id {
                return None;
            }
            Some(NewNotification {
                recipient_id: post.author_id,
                sender_id: Some(liker.id),
                notification_type: NotificationKind::Like.as_str().to_string(),
                post_id: Some(post.id),
                message: format!("{} liked your post", liker.handle),
            })
        }
        SocialEvent::CommentCreated { author, post } => {
            if post.author_id == author.id {
                return None;
            }
            Some(NewNotification {
                recipient_id: post.author_id,
                sender_id: Some(author.id),
                notification_type: NotificationKind::Comment.as_str().to_string(),
                post_id: Some(post.id),
                message: format!("{} commented on your post", author.handle),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PostRef, UserRef};

    fn actor(id: i32, handle: &str) -> UserRef {
        UserRef {
            id,
            handle: handle.to_string(),
        }
    }

    #[test]
    fn follow_notifies_the_followed_user() {
        let event = SocialEvent::FollowCreated {
            follower: actor(1, "alice"),
            following_id: 2,
        };
        let draft = build(&event).expect("follow should notify");
        assert_eq!(draft.recipient_id, 2);
        assert_eq!(draft.sender_id, Some(1));
        assert_eq!(draft.notification_type, "follow");
        assert_eq!(draft.post_id, None);
        assert_eq!(draft.message, "alice started following you");
    }

    #[test]
    fn self_follow_is_suppressed_defensively() {
        let event = SocialEvent::FollowCreated {
            follower: actor(7, "bob"),
            following_id: 7,
        };
        assert!(build(&event).is_none());
    }

    #[test]
    fn like_notifies_the_post_author() {
        let event = SocialEvent::LikeCreated {
            liker: actor(3, "carol"),
            post: PostRef { id: 10, author_id: 4 },
        };
        let draft = build(&event).expect("like should notify");
        assert_eq!(draft.recipient_id, 4);
        assert_eq!(draft.sender_id, Some(3));
        assert_eq!(draft.notification_type, "like");
        assert_eq!(draft.post_id, Some(10));
        assert_eq!(draft.message, "carol liked your post");
    }

    #[test]
    fn self_like_is_suppressed() {
        let event = SocialEvent::LikeCreated {
            liker: actor(4, "dave"),
            post: PostRef { id: 10, author_id: 4 },
        };
        assert!(build(&event).is_none());
    }

    #[test]
    fn comment_notifies_the_post_author() {
        let event = SocialEvent::CommentCreated {
            author: actor(5, "erin"),
            post: PostRef { id: 11, author_id: 6 },
        };
        let draft = build(&event).expect("comment should notify");
        assert_eq!(draft.recipient_id, 6);
        assert_eq!(draft.notification_type, "comment");
        assert_eq!(draft.message, "erin commented on your post");
    }

    #[test]
    fn self_comment_is_suppressed() {
        let event = SocialEvent::CommentCreated {
            author: actor(6, "frank"),
            post: PostRef { id: 11, author_id: 6 },
        };
        assert!(build(&event).is_none());
    }
}
