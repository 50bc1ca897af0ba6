pub mod api;
pub mod config;
pub mod counters;
pub mod db;
pub mod error;
pub mod events;
pub mod feed;
pub mod metrics;
pub mod models;
pub mod notifications;
pub mod schema;
