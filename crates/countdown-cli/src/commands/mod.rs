pub mod auth;
pub mod config;
pub mod event;
pub mod export;
pub mod watch;
