//! Sessions and the inputs to the auth boundary.
//!
//! A [`Session`] is the explicit context for every data call; nothing in this
//! workspace keeps an ambient "current user".

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::Role;

/// An authenticated session issued by the auth service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub access_token:  String,
  pub refresh_token: Option<String>,
  pub expires_at:    Option<DateTime<Utc>>,
  pub user_id:       Uuid,
  pub email:         String,
}

impl Session {
  /// Whether the access token has passed its expiry as of `now`.
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.expires_at.is_some_and(|at| at <= now)
  }
}

impl fmt::Debug for Session {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Session")
      .field("access_token", &"<redacted>")
      .field("expires_at", &self.expires_at)
      .field("user_id", &self.user_id)
      .field("email", &self.email)
      .finish()
  }
}

/// Email and password for sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

/// Everything needed to register a new account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUp {
  pub email:     String,
  pub password:  String,
  pub full_name: String,
  pub role:      Role,
}
