//! HTTP networking module
//!
//! Provides the HTTP client and per-attempt sessions used to reach search
//! engines.

mod client;
mod session;
mod user_agent;

pub use client::HttpClient;
pub use session::SearchSession;
pub use user_agent::{accept_language, generate_user_agent};
