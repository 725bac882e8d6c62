//! Error type for `stockroom-remote`, plus the mapping from HTTP failures
//! onto the core error taxonomy.

use reqwest::StatusCode;
use stockroom_core::RemoteError;
use thiserror::Error;

/// Startup failure: bad settings or an HTTP client that cannot be built.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("missing required setting `{0}`")]
  Missing(&'static str),

  #[error("invalid service url {url:?}: {reason}")]
  InvalidUrl { url: String, reason: String },

  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// A transport-level failure: connect, timeout, body read.
pub(crate) fn transport(e: reqwest::Error) -> RemoteError {
  RemoteError::Transport(e.to_string())
}

/// Map a non-success status and its body onto a [`RemoteError`].
pub(crate) fn from_status(status: StatusCode, message: String) -> RemoteError {
  match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized(message),
    StatusCode::NOT_FOUND => RemoteError::NotFound(message),
    _ => RemoteError::Service {
      status: status.as_u16(),
      message,
    },
  }
}
