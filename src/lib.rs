pub mod backup;
pub mod catalog;
pub mod config;
pub mod db;
pub mod draft;
pub mod recency;
pub mod records;
pub mod search;
pub mod share;
pub mod state;
pub mod stats;
pub mod unplayed;

/// Application name for XDG paths
pub const APP_NAME: &str = "servicebook";
