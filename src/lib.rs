pub mod config;
pub mod datasets;
pub mod demo;
pub mod error;
pub mod filter;
pub mod http_client;
pub mod logging;
pub mod provider;
pub mod render;
pub mod router;
pub mod scoreboard;
pub mod session;
pub mod state;
pub mod storage;
