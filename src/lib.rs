pub mod apis;
pub mod app;
pub mod common;
pub mod config;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod parser;
pub mod pipeline;
pub mod server;
