//! Activity log rows and their joined author.
//!
//! Activity rows are immutable and append-only. The joined read embeds a
//! snapshot of the author's profile, which is absent when the profile no
//! longer resolves.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::Author;

// ─── Action ──────────────────────────────────────────────────────────────────

/// The verb recorded on an activity row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
  Create,
  Update,
  Delete,
  /// Any verb this client does not know about.
  Other(String),
}

impl Action {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Create => "create",
      Self::Update => "update",
      Self::Delete => "delete",
      Self::Other(s) => s,
    }
  }
}

impl From<String> for Action {
  fn from(s: String) -> Self {
    match s.as_str() {
      "create" => Self::Create,
      "update" => Self::Update,
      "delete" => Self::Delete,
      _ => Self::Other(s),
    }
  }
}

impl From<Action> for String {
  fn from(a: Action) -> Self {
    match a {
      Action::Other(s) => s,
      known => known.as_str().to_string(),
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A row of the `activity_logs` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
  pub id:          Uuid,
  pub user_id:     Uuid,
  pub action:      Action,
  pub item_id:     Option<Uuid>,
  pub item_name:   String,
  #[serde(default)]
  pub description: String,
  pub created_at:  DateTime<Utc>,
}

/// An activity row together with the author's profile snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
  #[serde(flatten)]
  pub log:    ActivityLog,
  /// Embedded under `profiles` by the joined read.
  #[serde(rename = "profiles", default)]
  pub author: Option<Author>,
}

impl ActivityEntry {
  /// `"<full name> (<role>)"`, falling back to `Unknown` and `N/A`.
  pub fn attribution(&self) -> String {
    let name = self
      .author
      .as_ref()
      .and_then(|a| a.full_name.as_deref())
      .filter(|n| !n.is_empty())
      .unwrap_or("Unknown");
    let role = self
      .author
      .as_ref()
      .and_then(|a| a.role)
      .map(|r| r.as_str())
      .unwrap_or("N/A");
    format!("{name} ({role})")
  }
}

/// Input for appending an activity row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewActivity {
  pub user_id:     Uuid,
  pub action:      Action,
  pub item_id:     Option<Uuid>,
  pub item_name:   String,
  pub description: String,
}
