//! Error types for `stockroom-core`.

use thiserror::Error;

/// A failed data operation against the remote service.
///
/// Views recover from these locally: log, show a status line, keep the data
/// empty. They are never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
  #[error("transport error: {0}")]
  Transport(String),

  /// 401/403 from the service, or a row-level policy denial.
  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("service error ({status}): {message}")]
  Service { status: u16, message: String },

  #[error("could not decode response: {0}")]
  Decode(String),
}

/// A failed sign-in, sign-up or sign-out.
///
/// The `Display` output is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
  #[error("{0}")]
  InvalidCredentials(String),

  /// Registration conflict, e.g. the email is already registered.
  #[error("{0}")]
  Conflict(String),

  #[error("Check your email to confirm your account, then log in.")]
  ConfirmationRequired,

  #[error("{0}")]
  Rejected(String),

  #[error("{0}")]
  Remote(#[from] RemoteError),
}

/// Validation failure for an item form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
  #[error("{0} is required")]
  Required(&'static str),

  #[error("{field} must be a whole number of zero or more, got {value:?}")]
  InvalidQuantity { field: &'static str, value: String },

  #[error("unit price must be a non-negative amount, got {0:?}")]
  InvalidPrice(String),
}

pub type Result<T, E = RemoteError> = std::result::Result<T, E>;
