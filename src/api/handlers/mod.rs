pub mod comments;
pub mod feed;
pub mod follows;
pub mod health;
pub mod likes;
pub mod metrics;
pub mod notifications;
pub mod posts;
pub mod users;
