//! Connection settings for the remote service.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// The two settings the client cannot start without.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteConfig {
  /// Base URL of the hosted project, e.g. `https://abc.example.co`.
  #[serde(default)]
  pub url:      String,
  /// Public (anonymous) API key sent as the `apikey` header.
  #[serde(default)]
  pub anon_key: String,
}

impl RemoteConfig {
  /// Reject blank settings and URLs that are not http(s).
  pub fn validate(&self) -> Result<()> {
    if self.url.trim().is_empty() {
      return Err(ConfigError::Missing("url"));
    }
    if self.anon_key.trim().is_empty() {
      return Err(ConfigError::Missing("anon_key"));
    }
    let parsed = reqwest::Url::parse(self.url.trim()).map_err(|e| ConfigError::InvalidUrl {
      url:    self.url.clone(),
      reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
      return Err(ConfigError::InvalidUrl {
        url:    self.url.clone(),
        reason: format!("unsupported scheme {:?}", parsed.scheme()),
      });
    }
    Ok(())
  }

  /// The URL without a trailing slash.
  pub(crate) fn base(&self) -> &str { self.url.trim().trim_end_matches('/') }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cfg(url: &str, anon_key: &str) -> RemoteConfig {
    RemoteConfig { url: url.into(), anon_key: anon_key.into() }
  }

  #[test]
  fn accepts_complete_config() {
    assert!(cfg("https://demo.example.co/", "anon").validate().is_ok());
    assert_eq!(cfg("https://demo.example.co/", "anon").base(), "https://demo.example.co");
  }

  #[test]
  fn blank_settings_are_missing() {
    assert!(matches!(cfg("", "anon").validate(), Err(ConfigError::Missing("url"))));
    assert!(matches!(
      cfg("https://demo.example.co", "  ").validate(),
      Err(ConfigError::Missing("anon_key"))
    ));
  }

  #[test]
  fn rejects_non_http_urls() {
    assert!(matches!(
      cfg("not a url", "anon").validate(),
      Err(ConfigError::InvalidUrl { .. })
    ));
    assert!(matches!(
      cfg("ftp://demo.example.co", "anon").validate(),
      Err(ConfigError::InvalidUrl { .. })
    ));
  }
}
