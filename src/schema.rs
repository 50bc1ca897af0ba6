// Copyright (c) Social Engine Team
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::allow_tables_to_appear_in_same_query;
use diesel::table;

table! {
    users (id) {
        id -> Integer,
        handle -> Varchar,
        display_name -> Varchar,
        role -> Varchar,
        privacy -> Varchar,
        is_active -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    follows (id) {
        id -> Integer,
        follower_id -> Integer,
        following_id -> Integer,
        created_at -> Timestamp,
    }
}

table! {
    posts (id) {
        id -> Integer,
        author_id -> Integer,
        content -> Text,
        image_url -> Nullable<Varchar>,
        category -> Varchar,
        is_active -> Bool,
        like_count -> Integer,
        comment_count -> Integer,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    likes (id) {
        id -> Integer,
        user_id -> Integer,
        post_id -> Integer,
        created_at -> Timestamp,
    }
}

table! {
    comments (id) {
        id -> Integer,
        author_id -> Integer,
        post_id -> Integer,
        content -> Text,
        is_active -> Bool,
        created_at -> Timestamp,
    }
}

table! {
    notifications (id) {
        id -> Integer,
        recipient_id -> Integer,
        sender_id -> Nullable<Integer>,
        notification_type -> Varchar,
        post_id -> Nullable<Integer>,
        message -> Varchar,
        is_read -> Bool,
        seen_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
    }
}

allow_tables_to_appear_in_same_query!(users, follows, posts, likes, comments, notifications);
