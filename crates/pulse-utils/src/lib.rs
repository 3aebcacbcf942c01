//! Shared utilities for market-pulse
//!
//! This crate provides common functionality used across the market-pulse workspace:
//! tracing setup and `.env` loading for local runs.

pub mod env;
pub mod logging;

pub use env::{load_dotenv, load_dotenv_from, require_var};
pub use logging::init_tracing_with_default;
