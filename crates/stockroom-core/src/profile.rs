//! Profiles: the application-level identity of a signed-in user.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two roles a profile can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  #[default]
  Staff,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Admin => "admin",
      Self::Staff => "staff",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A row of the `profiles` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub id:         Uuid,
  pub email:      String,
  pub full_name:  String,
  pub role:       Role,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// The profile columns embedded into an activity row by the joined read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  #[serde(default)]
  pub full_name: Option<String>,
  #[serde(default)]
  pub role:      Option<Role>,
}

/// Input for inserting the profile row that accompanies a new account.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
  pub id:        Uuid,
  pub email:     String,
  pub full_name: String,
  pub role:      Role,
}

/// Sort profiles newest first.
pub fn sort_newest_first(profiles: &mut [Profile]) {
  profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
