pub mod auth;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod polling;
pub mod types;
