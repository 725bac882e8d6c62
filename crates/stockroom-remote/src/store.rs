//! [`RemoteStore`], the HTTP implementation of [`InventoryStore`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use stockroom_core::{
  RemoteError,
  activity::{ActivityEntry, ActivityLog, NewActivity},
  item::{InventoryItem, ItemChanges, NewItem},
  profile::{self, Profile},
  session::Session,
  store::InventoryStore,
};

use crate::{
  config::RemoteConfig,
  error::{self, Result, transport},
  wire::{Stamped, error_message},
};

const ITEMS: &str = "inventory_items";
const ACTIVITY: &str = "activity_logs";
pub(crate) const PROFILES: &str = "profiles";

// ─── Store ───────────────────────────────────────────────────────────────────

/// Typed client for the hosted REST and auth endpoints.
///
/// Clones share one [`reqwest::Client`] connection pool. Holds no
/// session; every call takes one explicitly.
#[derive(Clone)]
pub struct RemoteStore {
  pub(crate) client: Client,
  pub(crate) config: RemoteConfig,
}

impl RemoteStore {
  /// Validate `config` and build the HTTP client.
  pub fn new(config: RemoteConfig) -> Result<Self> {
    config.validate()?;
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &RemoteConfig { &self.config }

  pub(crate) fn rest_url(&self, table: &str) -> String {
    format!("{}/rest/v1/{table}", self.config.base())
  }

  pub(crate) fn auth_url(&self, path: &str) -> String {
    format!("{}/auth/v1{path}", self.config.base())
  }

  /// A request against a collection, authorised as the session user.
  pub(crate) fn rest(&self, method: Method, table: &str, session: &Session) -> RequestBuilder {
    self
      .client
      .request(method, self.rest_url(table))
      .header("apikey", &self.config.anon_key)
      .bearer_auth(&session.access_token)
  }

  /// Send `req` and return the response if the status is a success.
  pub(crate) async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response, RemoteError> {
    let resp = req.send().await.map_err(transport)?;
    let status = resp.status();
    tracing::debug!(%status, "{what}");
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body, &format!("{what} → {status}"));
    Err(error::from_status(status, message))
  }

  /// Send `req` and decode the JSON array it returns.
  async fn fetch_rows<T: DeserializeOwned>(
    &self,
    req: RequestBuilder,
    what: &str,
  ) -> Result<Vec<T>, RemoteError> {
    let resp = self.send(req, what).await?;
    let body = resp.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|e| RemoteError::Decode(format!("{what}: {e}")))
  }

  /// Send a write that asks for the affected rows back and return the first.
  async fn fetch_one<T: DeserializeOwned>(
    &self,
    req: RequestBuilder,
    what: &str,
  ) -> Result<Option<T>, RemoteError> {
    let req = req.header("Prefer", "return=representation");
    Ok(self.fetch_rows(req, what).await?.into_iter().next())
  }
}

fn eq(id: Uuid) -> String { format!("eq.{id}") }

// ─── InventoryStore impl ─────────────────────────────────────────────────────

impl InventoryStore for RemoteStore {
  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_items(&self, session: &Session) -> Result<Vec<InventoryItem>, RemoteError> {
    let req = self.rest(Method::GET, ITEMS, session).query(&[("select", "*")]);
    self.fetch_rows(req, "GET inventory_items").await
  }

  async fn list_activity(
    &self,
    session: &Session,
    limit: usize,
  ) -> Result<Vec<ActivityEntry>, RemoteError> {
    let req = self.rest(Method::GET, ACTIVITY, session).query(&[
      ("select", "*,profiles(full_name,role)".to_string()),
      ("order", "created_at.desc".to_string()),
      ("limit", limit.to_string()),
    ]);
    self.fetch_rows(req, "GET activity_logs").await
  }

  async fn list_profiles(&self, session: &Session) -> Result<Vec<Profile>, RemoteError> {
    let req = self
      .rest(Method::GET, PROFILES, session)
      .query(&[("select", "*"), ("order", "created_at.desc")]);
    let mut profiles: Vec<Profile> = self.fetch_rows(req, "GET profiles").await?;
    profile::sort_newest_first(&mut profiles);
    Ok(profiles)
  }

  async fn get_profile(
    &self,
    session: &Session,
    user_id: Uuid,
  ) -> Result<Option<Profile>, RemoteError> {
    let req = self
      .rest(Method::GET, PROFILES, session)
      .query(&[("select", "*".to_string()), ("id", eq(user_id))]);
    let rows: Vec<Profile> = self.fetch_rows(req, "GET profiles?id").await?;
    Ok(rows.into_iter().next())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_item(
    &self,
    session: &Session,
    item: &NewItem,
  ) -> Result<InventoryItem, RemoteError> {
    let body = Stamped { body: item, last_updated_by: session.user_id };
    let req = self.rest(Method::POST, ITEMS, session).json(&body);
    self
      .fetch_one(req, "POST inventory_items")
      .await?
      .ok_or_else(|| RemoteError::Decode("POST inventory_items returned no row".into()))
  }

  async fn update_item(
    &self,
    session: &Session,
    id: Uuid,
    changes: &ItemChanges,
  ) -> Result<InventoryItem, RemoteError> {
    let body = Stamped { body: changes, last_updated_by: session.user_id };
    let req = self
      .rest(Method::PATCH, ITEMS, session)
      .query(&[("id", eq(id))])
      .json(&body);
    self
      .fetch_one(req, "PATCH inventory_items")
      .await?
      .ok_or_else(|| RemoteError::NotFound(format!("inventory item {id}")))
  }

  async fn delete_item(&self, session: &Session, id: Uuid) -> Result<(), RemoteError> {
    let req = self.rest(Method::DELETE, ITEMS, session).query(&[("id", eq(id))]);
    self.send(req, "DELETE inventory_items").await?;
    Ok(())
  }

  async fn record_activity(
    &self,
    session: &Session,
    activity: &NewActivity,
  ) -> Result<ActivityLog, RemoteError> {
    let req = self.rest(Method::POST, ACTIVITY, session).json(activity);
    self
      .fetch_one(req, "POST activity_logs")
      .await?
      .ok_or_else(|| RemoteError::Decode("POST activity_logs returned no row".into()))
  }
}
