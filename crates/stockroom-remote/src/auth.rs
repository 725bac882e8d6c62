//! [`AuthProvider`] impl for [`RemoteStore`] against the hosted auth service.

use chrono::Utc;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use stockroom_core::{
  AuthError, RemoteError,
  profile::NewProfile,
  session::{Credentials, Session, SignUp},
  store::AuthProvider,
};

use crate::{
  error::transport,
  store::{PROFILES, RemoteStore},
  wire::{AuthSession, SignUpBody, SignUpMetadata, error_message},
};

impl RemoteStore {
  fn auth_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
    self
      .client
      .request(method, self.auth_url(path))
      .header("apikey", &self.config.anon_key)
  }

  /// Read an auth response: `Ok(body)` on success, the mapped error otherwise.
  async fn auth_body(
    &self,
    resp: reqwest::Response,
    classify: fn(StatusCode, String) -> AuthError,
  ) -> Result<String, AuthError> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport)?;
    if status.is_success() {
      return Ok(body);
    }
    let message = error_message(&body, status.canonical_reason().unwrap_or("request failed"));
    tracing::debug!(%status, "auth request rejected: {message}");
    Err(classify(status, message))
  }
}

fn classify_sign_in(status: StatusCode, message: String) -> AuthError {
  match status {
    StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => AuthError::InvalidCredentials(message),
    _ => AuthError::Rejected(message),
  }
}

fn classify_sign_up(status: StatusCode, message: String) -> AuthError {
  let conflict = matches!(status, StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY)
    || message.to_ascii_lowercase().contains("already registered");
  if conflict {
    AuthError::Conflict(message)
  } else {
    AuthError::Rejected(message)
  }
}

fn classify_sign_out(_: StatusCode, message: String) -> AuthError { AuthError::Rejected(message) }

fn decode_session(body: &str) -> Result<AuthSession, AuthError> {
  serde_json::from_str(body)
    .map_err(|e| AuthError::Remote(RemoteError::Decode(format!("auth session: {e}"))))
}

impl AuthProvider for RemoteStore {
  async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
    let resp = self
      .auth_request(Method::POST, "/token")
      .query(&[("grant_type", "password")])
      .json(credentials)
      .send()
      .await
      .map_err(transport)?;
    let body = self.auth_body(resp, classify_sign_in).await?;
    let session = decode_session(&body)?.into_session(&credentials.email, Utc::now());
    tracing::info!(user = %session.user_id, "signed in");
    Ok(session)
  }

  async fn sign_up(&self, request: &SignUp) -> Result<Session, AuthError> {
    let payload = SignUpBody {
      email:    &request.email,
      password: &request.password,
      data:     SignUpMetadata { full_name: &request.full_name, role: request.role },
    };
    let resp = self
      .auth_request(Method::POST, "/signup")
      .json(&payload)
      .send()
      .await
      .map_err(transport)?;
    let body = self.auth_body(resp, classify_sign_up).await?;

    // With email confirmation on, the service returns the bare user and no
    // token.
    let raw: Value = serde_json::from_str(&body)
      .map_err(|e| AuthError::Remote(RemoteError::Decode(format!("sign-up: {e}"))))?;
    if raw.get("access_token").and_then(Value::as_str).is_none() {
      return Err(AuthError::ConfirmationRequired);
    }
    let session = decode_session(&body)?.into_session(&request.email, Utc::now());

    let profile = NewProfile {
      id:        session.user_id,
      email:     session.email.clone(),
      full_name: request.full_name.trim().to_string(),
      role:      request.role,
    };
    let req = self.rest(Method::POST, PROFILES, &session).json(&profile);
    self.send(req, "POST profiles").await?;

    tracing::info!(user = %session.user_id, role = %request.role, "registered");
    Ok(session)
  }

  async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
    let resp = self
      .auth_request(Method::POST, "/logout")
      .bearer_auth(&session.access_token)
      .send()
      .await
      .map_err(transport)?;
    self.auth_body(resp, classify_sign_out).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sign_up_conflicts() {
    assert!(matches!(
      classify_sign_up(StatusCode::UNPROCESSABLE_ENTITY, "User already registered".into()),
      AuthError::Conflict(_)
    ));
    assert!(matches!(
      classify_sign_up(StatusCode::BAD_REQUEST, "User already registered".into()),
      AuthError::Conflict(_)
    ));
    assert!(matches!(
      classify_sign_up(StatusCode::BAD_REQUEST, "Password should be at least 6 characters".into()),
      AuthError::Rejected(_)
    ));
  }

  #[test]
  fn sign_in_bad_request_is_invalid_credentials() {
    let err = classify_sign_in(StatusCode::BAD_REQUEST, "Invalid login credentials".into());
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(matches!(
      classify_sign_in(StatusCode::TOO_MANY_REQUESTS, "slow down".into()),
      AuthError::Rejected(_)
    ));
  }
}
