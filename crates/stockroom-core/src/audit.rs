//! Item mutations that append an activity row.
//!
//! The activity row is written only after the item change succeeds. A failed
//! audit write is logged and does not undo the change.

use uuid::Uuid;

use crate::{
  activity::{Action, NewActivity},
  error::RemoteError,
  item::{InventoryItem, ItemChanges, NewItem},
  session::Session,
  store::InventoryStore,
};

/// Create `item` and record a `create` activity.
pub async fn add_item<S: InventoryStore>(
  store: &S,
  session: &Session,
  item: &NewItem,
) -> Result<InventoryItem, RemoteError> {
  let created = store.create_item(session, item).await?;
  let description = format!(
    "Added {} units of {} (SKU {})",
    created.quantity, created.name, created.sku
  );
  record(store, session, Action::Create, Some(created.id), &created.name, description).await;
  Ok(created)
}

/// Apply `changes` to `current` and record an `update` activity.
///
/// An empty change set is a no-op: nothing is sent and `current` is returned.
pub async fn edit_item<S: InventoryStore>(
  store: &S,
  session: &Session,
  current: &InventoryItem,
  changes: &ItemChanges,
) -> Result<InventoryItem, RemoteError> {
  if changes.is_empty() {
    return Ok(current.clone());
  }
  let updated = store.update_item(session, current.id, changes).await?;
  let description = format!(
    "Updated {}: {}",
    updated.name,
    changes.changed_fields().join(", ")
  );
  record(store, session, Action::Update, Some(updated.id), &updated.name, description).await;
  Ok(updated)
}

/// Delete `item` and record a `delete` activity.
pub async fn remove_item<S: InventoryStore>(
  store: &S,
  session: &Session,
  item: &InventoryItem,
) -> Result<(), RemoteError> {
  store.delete_item(session, item.id).await?;
  let description = format!("Deleted {} (SKU {})", item.name, item.sku);
  record(store, session, Action::Delete, Some(item.id), &item.name, description).await;
  Ok(())
}

async fn record<S: InventoryStore>(
  store: &S,
  session: &Session,
  action: Action,
  item_id: Option<Uuid>,
  item_name: &str,
  description: String,
) {
  let activity = NewActivity {
    user_id: session.user_id,
    action,
    item_id,
    item_name: item_name.to_string(),
    description,
  };
  if let Err(e) = store.record_activity(session, &activity).await {
    tracing::warn!(
      action = %activity.action,
      item = %activity.item_name,
      "failed to record activity: {e}"
    );
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::Utc;
  use rust_decimal_macros::dec;

  use super::*;
  use crate::{
    activity::{ActivityEntry, ActivityLog},
    profile::Profile,
  };

  /// In-memory store that records every write.
  #[derive(Default)]
  struct MemoryStore {
    items:         Mutex<Vec<InventoryItem>>,
    activity:      Mutex<Vec<NewActivity>>,
    fail_items:    bool,
    fail_activity: bool,
  }

  fn denied() -> RemoteError { RemoteError::Unauthorized("policy".into()) }

  impl InventoryStore for MemoryStore {
    async fn list_items(&self, _: &Session) -> Result<Vec<InventoryItem>, RemoteError> {
      Ok(self.items.lock().unwrap().clone())
    }

    async fn list_activity(&self, _: &Session, _: usize) -> Result<Vec<ActivityEntry>, RemoteError> {
      Ok(Vec::new())
    }

    async fn list_profiles(&self, _: &Session) -> Result<Vec<Profile>, RemoteError> {
      Ok(Vec::new())
    }

    async fn get_profile(&self, _: &Session, _: Uuid) -> Result<Option<Profile>, RemoteError> {
      Ok(None)
    }

    async fn create_item(&self, session: &Session, item: &NewItem) -> Result<InventoryItem, RemoteError> {
      if self.fail_items {
        return Err(denied());
      }
      let now = Utc::now();
      let created = InventoryItem {
        id: Uuid::new_v4(),
        name: item.name.clone(),
        sku: item.sku.clone(),
        category: item.category.clone(),
        quantity: item.quantity,
        min_quantity: item.min_quantity,
        unit_price: item.unit_price,
        supplier: item.supplier.clone(),
        last_updated_by: Some(session.user_id),
        created_at: now,
        updated_at: now,
      };
      self.items.lock().unwrap().push(created.clone());
      Ok(created)
    }

    async fn update_item(
      &self,
      _: &Session,
      id: Uuid,
      changes: &ItemChanges,
    ) -> Result<InventoryItem, RemoteError> {
      if self.fail_items {
        return Err(denied());
      }
      let mut items = self.items.lock().unwrap();
      let item = items
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
      if let Some(q) = changes.quantity {
        item.quantity = q;
      }
      if let Some(name) = &changes.name {
        item.name = name.clone();
      }
      Ok(item.clone())
    }

    async fn delete_item(&self, _: &Session, id: Uuid) -> Result<(), RemoteError> {
      if self.fail_items {
        return Err(denied());
      }
      self.items.lock().unwrap().retain(|i| i.id != id);
      Ok(())
    }

    async fn record_activity(
      &self,
      _: &Session,
      activity: &NewActivity,
    ) -> Result<ActivityLog, RemoteError> {
      if self.fail_activity {
        return Err(denied());
      }
      self.activity.lock().unwrap().push(activity.clone());
      Ok(ActivityLog {
        id:          Uuid::new_v4(),
        user_id:     activity.user_id,
        action:      activity.action.clone(),
        item_id:     activity.item_id,
        item_name:   activity.item_name.clone(),
        description: activity.description.clone(),
        created_at:  Utc::now(),
      })
    }
  }

  fn session() -> Session {
    Session {
      access_token:  "token".into(),
      refresh_token: None,
      expires_at:    None,
      user_id:       Uuid::new_v4(),
      email:         "staff@example.com".into(),
    }
  }

  fn widget() -> NewItem {
    NewItem {
      name:         "Widget".into(),
      sku:          "W-1".into(),
      category:     "Parts".into(),
      quantity:     12,
      min_quantity: 4,
      unit_price:   dec!(3.25),
      supplier:     "Acme".into(),
    }
  }

  #[tokio::test]
  async fn add_records_one_create() {
    let store = MemoryStore::default();
    let s = session();
    let created = add_item(&store, &s, &widget()).await.unwrap();

    let activity = store.activity.lock().unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].action, Action::Create);
    assert_eq!(activity[0].item_id, Some(created.id));
    assert_eq!(activity[0].user_id, s.user_id);
    assert_eq!(activity[0].description, "Added 12 units of Widget (SKU W-1)");
  }

  #[tokio::test]
  async fn edit_records_changed_fields() {
    let store = MemoryStore::default();
    let s = session();
    let created = add_item(&store, &s, &widget()).await.unwrap();

    let changes = ItemChanges { quantity: Some(3), ..Default::default() };
    let updated = edit_item(&store, &s, &created, &changes).await.unwrap();
    assert_eq!(updated.quantity, 3);

    let activity = store.activity.lock().unwrap();
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[1].action, Action::Update);
    assert_eq!(activity[1].description, "Updated Widget: quantity");
  }

  #[tokio::test]
  async fn empty_edit_sends_nothing() {
    let store = MemoryStore::default();
    let s = session();
    let created = add_item(&store, &s, &widget()).await.unwrap();

    let same = edit_item(&store, &s, &created, &ItemChanges::default()).await.unwrap();
    assert_eq!(same, created);
    assert_eq!(store.activity.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn remove_records_one_delete() {
    let store = MemoryStore::default();
    let s = session();
    let created = add_item(&store, &s, &widget()).await.unwrap();
    remove_item(&store, &s, &created).await.unwrap();

    assert!(store.items.lock().unwrap().is_empty());
    let activity = store.activity.lock().unwrap();
    assert_eq!(activity.last().unwrap().action, Action::Delete);
    assert_eq!(activity.last().unwrap().description, "Deleted Widget (SKU W-1)");
  }

  #[tokio::test]
  async fn failed_mutation_records_nothing() {
    let store = MemoryStore { fail_items: true, ..Default::default() };
    let result = add_item(&store, &session(), &widget()).await;
    assert!(matches!(result, Err(RemoteError::Unauthorized(_))));
    assert!(store.activity.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn failed_audit_keeps_mutation() {
    let store = MemoryStore { fail_activity: true, ..Default::default() };
    let created = add_item(&store, &session(), &widget()).await.unwrap();
    assert_eq!(store.items.lock().unwrap()[0].id, created.id);
  }
}
