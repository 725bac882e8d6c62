//! HTTP backend for the Stockroom dashboard.
//!
//! Speaks the hosted service's REST dialect (`/rest/v1/<table>`) for data
//! and its auth endpoints (`/auth/v1/...`) for sessions. Requests carry the
//! public API key plus the caller's session token; row-level authorization
//! is enforced by the service.

mod auth;
mod store;
mod wire;

pub mod config;
pub mod error;

pub use config::RemoteConfig;
pub use error::{ConfigError, Result};
pub use store::RemoteStore;
