//! Core types and trait definitions for the Stockroom inventory dashboard.
//!
//! This crate is deliberately free of HTTP dependencies. The remote client
//! and the terminal UI both depend on it.

pub mod activity;
pub mod audit;
pub mod error;
pub mod item;
pub mod profile;
pub mod session;
pub mod store;
pub mod summary;

pub use error::{AuthError, FormError, RemoteError, Result};
