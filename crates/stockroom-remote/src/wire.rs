//! Wire shapes of the REST and auth endpoints that have no domain
//! counterpart.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use stockroom_core::{profile::Role, session::Session};
use uuid::Uuid;

// ─── Write bodies ─────────────────────────────────────────────────────────────

/// A write body stamped with the user making the change.
#[derive(Serialize)]
pub struct Stamped<'a, T> {
  #[serde(flatten)]
  pub body:            &'a T,
  pub last_updated_by: Uuid,
}

#[derive(Serialize)]
pub struct SignUpBody<'a> {
  pub email:    &'a str,
  pub password: &'a str,
  pub data:     SignUpMetadata<'a>,
}

#[derive(Serialize)]
pub struct SignUpMetadata<'a> {
  pub full_name: &'a str,
  pub role:      Role,
}

// ─── Auth responses ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AuthUser {
  pub id:    Uuid,
  #[serde(default)]
  pub email: Option<String>,
}

/// Token response from `/token` and, when no confirmation is pending, from
/// `/signup`.
#[derive(Debug, Deserialize)]
pub struct AuthSession {
  pub access_token:  String,
  #[serde(default)]
  pub refresh_token: Option<String>,
  /// Seconds until expiry.
  #[serde(default)]
  pub expires_in:    Option<i64>,
  /// Unix timestamp of expiry.
  #[serde(default)]
  pub expires_at:    Option<i64>,
  pub user:          AuthUser,
}

impl AuthSession {
  pub fn into_session(self, fallback_email: &str, now: DateTime<Utc>) -> Session {
    let expires_at = self
      .expires_at
      .and_then(|ts| DateTime::from_timestamp(ts, 0))
      .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
    Session {
      access_token: self.access_token,
      refresh_token: self.refresh_token,
      expires_at,
      user_id: self.user.id,
      email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
    }
  }
}

// ─── Error bodies ─────────────────────────────────────────────────────────────

/// Union of the error fields used by the REST and auth services.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
  msg:               Option<String>,
  message:           Option<String>,
  error_description: Option<String>,
  error:             Option<String>,
  details:           Option<String>,
}

/// The human-readable message from an error body, or `fallback` if the body
/// carries none.
pub fn error_message(body: &str, fallback: &str) -> String {
  let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
  parsed
    .msg
    .or(parsed.message)
    .or(parsed.error_description)
    .or(parsed.error)
    .or(parsed.details)
    .filter(|m| !m.trim().is_empty())
    .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn picks_first_present_message_field() {
    let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
    assert_eq!(error_message(body, "400"), "Invalid login credentials");
    assert_eq!(
      error_message(r#"{"code":"42501","message":"permission denied"}"#, "403"),
      "permission denied"
    );
    assert_eq!(error_message(r#"{"msg":"User already registered"}"#, "422"), "User already registered");
  }

  #[test]
  fn falls_back_on_opaque_body() {
    assert_eq!(error_message("<html>bad gateway</html>", "502 Bad Gateway"), "502 Bad Gateway");
    assert_eq!(error_message("", "500"), "500");
  }

  #[test]
  fn session_expiry_from_expires_in() {
    let now = Utc::now();
    let raw = AuthSession {
      access_token:  "t".into(),
      refresh_token: Some("r".into()),
      expires_in:    Some(3600),
      expires_at:    None,
      user:          AuthUser { id: Uuid::new_v4(), email: None },
    };
    let session = raw.into_session("me@example.com", now);
    assert_eq!(session.expires_at, Some(now + Duration::seconds(3600)));
    assert_eq!(session.email, "me@example.com");
  }
}
