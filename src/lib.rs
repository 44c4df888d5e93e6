#![cfg_attr(not(test), deny(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::todo, clippy::unimplemented))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod middleware;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod ws;

pub use error::AppError;
pub use errors::ErrorCode;
pub use state::AppState;
