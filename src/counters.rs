// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

//! Denormalized counter maintenance for posts.
//!
//! `like_count` and `comment_count` are caches kept in step by the like
//! and comment mutations, inside the same transaction as the row they
//! summarize. Decrements are floored at zero in SQL so a double-delete
//! race can never drive a counter negative.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::error::ApiError;
use crate::schema::posts;

fn floored_decrement_sql(column: &str) -> String {
    format!("UPDATE posts SET {column} = GREATEST({column} - 1, 0) WHERE id = $1")
}

pub async fn bump_like_count(conn: &mut AsyncPgConnection, post_id: i32) -> Result<(), ApiError> {
    diesel::update(posts::table.filter(posts::id.eq(post_id)))
        .set(posts::like_count.eq(posts::like_count + 1))
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn drop_like_count(conn: &mut AsyncPgConnection, post_id: i32) -> Result<(), ApiError> {
    diesel::sql_query(floored_decrement_sql("like_count"))
        .bind::<diesel::sql_types::Integer, _>(post_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn bump_comment_count(
    conn: &mut AsyncPgConnection,
    post_id: i32,
) -> Result<(), ApiError> {
    diesel::update(posts::table.filter(posts::id.eq(post_id)))
        .set(posts::comment_count.eq(posts::comment_count + 1))
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn drop_comment_count(
    conn: &mut AsyncPgConnection,
    post_id: i32,
) -> Result<(), ApiError> {
    diesel::sql_query(floored_decrement_sql("comment_count"))
        .bind::<diesel::sql_types::Integer, _>(post_id)
        .execute(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_decrement_floors_at_zero_in_the_statement() {
        assert_eq!(
            floored_decrement_sql("like_count"),
            "UPDATE posts SET like_count = GREATEST(like_count - 1, 0) WHERE id = $1"
        );
    }

    #[test]
    fn comment_decrement_floors_at_zero_in_the_statement() {
        assert_eq!(
            floored_decrement_sql("comment_count"),
            "UPDATE posts SET comment_count = GREATEST(comment_count - 1, 0) WHERE id = $1"
        );
    }
}
