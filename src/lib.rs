pub mod actions;
pub mod bot;
pub mod config;
pub mod handlers;
pub mod health;
pub mod localization;
pub mod migrations;
pub mod storage;
pub mod transport;
pub mod user_session;
pub mod utils;
