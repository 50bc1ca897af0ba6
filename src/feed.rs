use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::models::post::Post;
use crate::schema::{follows, posts};

pub const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Serialize)]
pub struct FeedPage {
    pub results: Vec<Post>,
    pub has_next: bool,
    pub page: i64,
}

fn offset_for(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size
}

fn has_next(total: i64, offset: i64, page_size: i64) -> bool {
    total > offset + page_size
}

/// Reverse-chronological union of the user's own posts and posts by
/// everyone they follow, with offset pagination.
///
/// Offset pagination is not cursor-stable: a post landing between two page
/// loads shifts items. Accepted tradeoff for this feed, not a bug.
pub async fn compose_feed(
    conn: &mut AsyncPgConnection,
    user_id: i32,
    page: i64,
    page_size: i64,
) -> Result<FeedPage, ApiError> {
    let page = page.max(1);
    let offset = offset_for(page, page_size);

    // F = followees plus the user themselves
    let mut author_ids: Vec<i32> = follows::table
        .filter(follows::follower_id.eq(user_id))
        .select(follows::following_id)
        .load(conn)
        .await?;
    author_ids.push(user_id);

    debug!(
        "composing feed for user {}: {} authors, page {}",
        user_id,
        author_ids.len(),
        page
    );

    let total: i64 = posts::table
        .filter(posts::is_active.eq(true))
        .filter(posts::author_id.eq_any(&author_ids))
        .count()
        .get_result(conn)
        .await?;

    let results = posts::table
        .filter(posts::is_active.eq(true))
        .filter(posts::author_id.eq_any(&author_ids))
        .order((posts::created_at.desc(), posts::id.desc()))
        .offset(offset)
        .limit(page_size)
        .load::<Post>(conn)
        .await?;

    Ok(FeedPage {
        results,
        has_next: has_next(total, offset, page_size),
        page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_one_based_pages() {
        assert_eq!(offset_for(1, 20), 0);
        assert_eq!(offset_for(2, 20), 20);
        assert_eq!(offset_for(3, 10), 20);
    }

    #[test]
    fn page_below_one_clamps_to_first() {
        assert_eq!(offset_for(0, 20), 0);
        assert_eq!(offset_for(-5, 20), 0);
    }

    #[test]
    fn has_next_is_strict() {
        // 4 posts on a 20-wide first page: nothing further
        assert!(!has_next(4, 0, 20));
        // exactly one full page
        assert!(!has_next(20, 0, 20));
        // one more than a page
        assert!(has_next(21, 0, 20));
        // second page of 45 items
        assert!(has_next(45, 20, 20));
        assert!(!has_next(45, 40, 20));
    }
}
