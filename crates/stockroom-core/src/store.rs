//! The `InventoryStore` and `AuthProvider` traits.
//!
//! Both are implemented by `stockroom-remote`. The dashboard depends on these
//! abstractions, not on the HTTP client.

use std::future::Future;

use uuid::Uuid;

use crate::{
  activity::{ActivityEntry, ActivityLog, NewActivity},
  error::{AuthError, RemoteError},
  item::{InventoryItem, ItemChanges, NewItem},
  profile::Profile,
  session::{Credentials, Session, SignUp},
};

/// Row cap used by the activity view.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 100;

// ─── Data access ─────────────────────────────────────────────────────────────

/// Typed access to the remote collections.
///
/// Every call re-fetches; implementations must not cache. An empty result set
/// is `Ok(vec![])`, never an error.
pub trait InventoryStore: Send + Sync {
  // ── Reads ─────────────────────────────────────────────────────────────

  /// All inventory items, unfiltered.
  fn list_items<'a>(
    &'a self,
    session: &'a Session,
  ) -> impl Future<Output = Result<Vec<InventoryItem>, RemoteError>> + Send + 'a;

  /// The newest `limit` activity rows with their joined author, newest
  /// first.
  fn list_activity<'a>(
    &'a self,
    session: &'a Session,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ActivityEntry>, RemoteError>> + Send + 'a;

  /// All profiles, newest first.
  fn list_profiles<'a>(
    &'a self,
    session: &'a Session,
  ) -> impl Future<Output = Result<Vec<Profile>, RemoteError>> + Send + 'a;

  /// A single profile. Returns `None` if it does not resolve.
  fn get_profile<'a>(
    &'a self,
    session: &'a Session,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, RemoteError>> + Send + 'a;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert an item, stamped with the session user.
  fn create_item<'a>(
    &'a self,
    session: &'a Session,
    item: &'a NewItem,
  ) -> impl Future<Output = Result<InventoryItem, RemoteError>> + Send + 'a;

  /// Apply `changes` to item `id`, stamped with the session user.
  fn update_item<'a>(
    &'a self,
    session: &'a Session,
    id: Uuid,
    changes: &'a ItemChanges,
  ) -> impl Future<Output = Result<InventoryItem, RemoteError>> + Send + 'a;

  fn delete_item<'a>(
    &'a self,
    session: &'a Session,
    id: Uuid,
  ) -> impl Future<Output = Result<(), RemoteError>> + Send + 'a;

  /// Append an activity row.
  fn record_activity<'a>(
    &'a self,
    session: &'a Session,
    activity: &'a NewActivity,
  ) -> impl Future<Output = Result<ActivityLog, RemoteError>> + Send + 'a;
}

// ─── Auth ────────────────────────────────────────────────────────────────────

/// The auth boundary. Implementations never retry.
pub trait AuthProvider: Send + Sync {
  fn sign_in<'a>(
    &'a self,
    credentials: &'a Credentials,
  ) -> impl Future<Output = Result<Session, AuthError>> + Send + 'a;

  /// Register an account and create its profile row.
  fn sign_up<'a>(
    &'a self,
    request: &'a SignUp,
  ) -> impl Future<Output = Result<Session, AuthError>> + Send + 'a;

  fn sign_out<'a>(
    &'a self,
    session: &'a Session,
  ) -> impl Future<Output = Result<(), AuthError>> + Send + 'a;
}
