//! Application state machine and event dispatcher.
//!
//! Key handling is synchronous. Anything that needs the network is queued as
//! a [`Pending`] action; the event loop draws one frame with the loading
//! indicator and then awaits [`App::run`].

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use stockroom_core::{
  RemoteError,
  activity::ActivityEntry,
  audit,
  item::{InventoryItem, ItemChanges, ItemForm, NewItem},
  profile::{Profile, Role},
  session::{Credentials, Session, SignUp},
  store::{AuthProvider, DEFAULT_ACTIVITY_LIMIT, InventoryStore},
  summary::{self, Summary},
};

// ─── Screens and tabs ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Login,
  Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Dashboard,
  Inventory,
  Reports,
  Settings,
}

impl Tab {
  pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Inventory, Tab::Reports, Tab::Settings];

  pub fn title(self) -> &'static str {
    match self {
      Tab::Dashboard => "Dashboard",
      Tab::Inventory => "Inventory",
      Tab::Reports => "Reports",
      Tab::Settings => "Settings",
    }
  }

  pub fn index(self) -> usize { Self::ALL.iter().position(|t| *t == self).unwrap_or(0) }

  fn next(self) -> Self { Self::ALL[(self.index() + 1) % Self::ALL.len()] }

  fn prev(self) -> Self { Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()] }
}

// ─── Login form ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
  SignIn,
  Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
  FullName,
  Role,
  Email,
  Password,
}

impl LoginField {
  pub fn label(self) -> &'static str {
    match self {
      LoginField::FullName => "Full Name",
      LoginField::Role => "Role",
      LoginField::Email => "Email",
      LoginField::Password => "Password",
    }
  }
}

/// State of the login/register form. Survives failed attempts so the user
/// can correct and retry.
#[derive(Debug, Clone)]
pub struct LoginForm {
  pub mode:      AuthMode,
  pub email:     String,
  pub password:  String,
  pub full_name: String,
  pub role:      Role,
  pub focus:     usize,
  pub error:     Option<String>,
}

impl Default for LoginForm {
  fn default() -> Self {
    Self {
      mode:      AuthMode::SignIn,
      email:     String::new(),
      password:  String::new(),
      full_name: String::new(),
      role:      Role::Staff,
      focus:     0,
      error:     None,
    }
  }
}

impl LoginForm {
  pub fn fields(&self) -> &'static [LoginField] {
    match self.mode {
      AuthMode::SignIn => &[LoginField::Email, LoginField::Password],
      AuthMode::Register => &[
        LoginField::FullName,
        LoginField::Role,
        LoginField::Email,
        LoginField::Password,
      ],
    }
  }

  pub fn focused(&self) -> LoginField {
    let fields = self.fields();
    fields[self.focus.min(fields.len() - 1)]
  }

  fn text_mut(&mut self, field: LoginField) -> Option<&mut String> {
    match field {
      LoginField::FullName => Some(&mut self.full_name),
      LoginField::Email => Some(&mut self.email),
      LoginField::Password => Some(&mut self.password),
      LoginField::Role => None,
    }
  }

  fn toggle_mode(&mut self) {
    self.mode = match self.mode {
      AuthMode::SignIn => AuthMode::Register,
      AuthMode::Register => AuthMode::SignIn,
    };
    self.focus = 0;
    self.error = None;
  }

  fn toggle_role(&mut self) {
    self.role = match self.role {
      Role::Admin => Role::Staff,
      Role::Staff => Role::Admin,
    };
  }

  fn validate(&self) -> Result<(), String> {
    if self.mode == AuthMode::Register && self.full_name.trim().is_empty() {
      return Err("Full name is required".into());
    }
    if self.email.trim().is_empty() {
      return Err("Email is required".into());
    }
    if self.password.is_empty() {
      return Err("Password is required".into());
    }
    Ok(())
  }
}

// ─── Item editor ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
  Name,
  Sku,
  Category,
  Quantity,
  MinQuantity,
  UnitPrice,
  Supplier,
}

impl ItemField {
  pub const ALL: [ItemField; 7] = [
    ItemField::Name,
    ItemField::Sku,
    ItemField::Category,
    ItemField::Quantity,
    ItemField::MinQuantity,
    ItemField::UnitPrice,
    ItemField::Supplier,
  ];

  pub fn label(self) -> &'static str {
    match self {
      ItemField::Name => "Name",
      ItemField::Sku => "SKU",
      ItemField::Category => "Category",
      ItemField::Quantity => "Quantity",
      ItemField::MinQuantity => "Min Quantity",
      ItemField::UnitPrice => "Unit Price",
      ItemField::Supplier => "Supplier",
    }
  }

  pub fn value(self, form: &ItemForm) -> &str {
    match self {
      ItemField::Name => &form.name,
      ItemField::Sku => &form.sku,
      ItemField::Category => &form.category,
      ItemField::Quantity => &form.quantity,
      ItemField::MinQuantity => &form.min_quantity,
      ItemField::UnitPrice => &form.unit_price,
      ItemField::Supplier => &form.supplier,
    }
  }

  fn value_mut(self, form: &mut ItemForm) -> &mut String {
    match self {
      ItemField::Name => &mut form.name,
      ItemField::Sku => &mut form.sku,
      ItemField::Category => &mut form.category,
      ItemField::Quantity => &mut form.quantity,
      ItemField::MinQuantity => &mut form.min_quantity,
      ItemField::UnitPrice => &mut form.unit_price,
      ItemField::Supplier => &mut form.supplier,
    }
  }
}

/// The add/edit item popup. `target` is `None` when adding.
#[derive(Debug, Clone)]
pub struct Editor {
  pub target: Option<InventoryItem>,
  pub form:   ItemForm,
  pub focus:  usize,
  pub error:  Option<String>,
}

impl Editor {
  pub fn focused(&self) -> ItemField { ItemField::ALL[self.focus % ItemField::ALL.len()] }
}

// ─── Pending work ─────────────────────────────────────────────────────────────

/// A network action queued by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
  Load(Tab),
  Authenticate,
  SaveItem(NewItem),
  DeleteItem,
  SignOut,
}

impl Pending {
  /// Text for the loading indicator while this action is queued or running.
  pub fn label(&self) -> &'static str {
    match self {
      Pending::Load(Tab::Dashboard) => "Loading dashboard…",
      Pending::Load(Tab::Inventory) => "Loading inventory…",
      Pending::Load(Tab::Reports) => "Loading reports…",
      Pending::Load(Tab::Settings) => "Loading settings…",
      Pending::Authenticate => "Please wait…",
      Pending::SaveItem(_) => "Saving…",
      Pending::DeleteItem => "Deleting…",
      Pending::SignOut => "Signing out…",
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  pub screen: Screen,
  pub tab:    Tab,
  pub login:  LoginForm,

  /// The signed-in session, passed explicitly to every store call.
  pub session: Option<Session>,
  /// The signed-in user's own profile, if it resolved.
  pub profile: Option<Profile>,

  // ── Per-view data; replaced wholesale by each load ───────────────────────
  pub summary:   Summary,
  pub low_stock: Vec<InventoryItem>,
  pub items:     Vec<InventoryItem>,
  pub activity:  Vec<ActivityEntry>,
  pub users:     Vec<Profile>,

  // ── Inventory tab ─────────────────────────────────────────────────────────
  pub filter:         String,
  pub filter_active:  bool,
  pub list_cursor:    usize,
  pub editor:         Option<Editor>,
  pub confirm_delete: Option<InventoryItem>,

  /// Scroll offset for the Reports and Settings lists.
  pub scroll: usize,

  pub pending: Option<Pending>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
  /// Message to show once the next load finishes.
  flash: Option<String>,

  pub store: Arc<S>,
}

impl<S> App<S> {
  // ── Filtered inventory ───────────────────────────────────────────────────

  /// Items matching the current filter query on name, SKU or category.
  pub fn filtered_items(&self) -> Vec<&InventoryItem> {
    if self.filter.is_empty() {
      return self.items.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .items
      .iter()
      .filter(|i| {
        [&i.name, &i.sku, &i.category]
          .into_iter()
          .any(|field| matcher.fuzzy_match(field, &self.filter).is_some())
      })
      .collect()
  }

  /// The item under the cursor in the filtered view, if any.
  pub fn cursor_item(&self) -> Option<&InventoryItem> {
    self.filtered_items().get(self.list_cursor).copied()
  }
}

impl<S> App<S>
where
  S: InventoryStore + AuthProvider,
{
  /// Create an [`App`] on the login screen.
  pub fn new(store: S) -> Self {
    Self {
      screen: Screen::Login,
      tab: Tab::Dashboard,
      login: LoginForm::default(),
      session: None,
      profile: None,
      summary: Summary::default(),
      low_stock: Vec::new(),
      items: Vec::new(),
      activity: Vec::new(),
      users: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      editor: None,
      confirm_delete: None,
      scroll: 0,
      pending: None,
      status_msg: String::new(),
      flash: None,
      store: Arc::new(store),
    }
  }

  pub fn take_pending(&mut self) -> Option<Pending> { self.pending.take() }

  // ── Network actions ───────────────────────────────────────────────────────

  /// Perform one queued action. Never fails: errors end up in the status
  /// bar or the relevant form.
  pub async fn run(&mut self, pending: Pending) {
    match pending {
      Pending::Load(tab) => self.load(tab).await,
      Pending::Authenticate => self.authenticate().await,
      Pending::SaveItem(item) => self.save_item(item).await,
      Pending::DeleteItem => self.delete_item().await,
      Pending::SignOut => self.sign_out().await,
    }
  }

  fn report(&mut self, what: &str, err: &RemoteError) {
    tracing::warn!("error {what}: {err}");
    self.status_msg = format!("Error {what}: {err}");
  }

  fn loaded(&mut self) { self.status_msg = self.flash.take().unwrap_or_default(); }

  async fn load(&mut self, tab: Tab) {
    let Some(session) = self.session.clone() else {
      return;
    };
    match tab {
      Tab::Dashboard => match self.store.list_items(&session).await {
        Ok(items) => {
          self.summary = summary::summarize(&items);
          self.low_stock = summary::low_stock_items(&items).into_iter().cloned().collect();
          self.loaded();
        }
        Err(e) => {
          self.summary = Summary::default();
          self.low_stock.clear();
          self.report("loading stats", &e);
        }
      },
      Tab::Inventory => match self.store.list_items(&session).await {
        Ok(items) => {
          self.items = items;
          let len = self.filtered_items().len();
          self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
          self.loaded();
        }
        Err(e) => {
          self.items.clear();
          self.list_cursor = 0;
          self.report("loading inventory", &e);
        }
      },
      Tab::Reports => match self.store.list_activity(&session, DEFAULT_ACTIVITY_LIMIT).await {
        Ok(entries) => {
          self.activity = entries;
          self.loaded();
        }
        Err(e) => {
          self.activity.clear();
          self.report("loading activity logs", &e);
        }
      },
      Tab::Settings => {
        match self.store.get_profile(&session, session.user_id).await {
          Ok(profile) => self.profile = profile,
          Err(e) => tracing::warn!("error refreshing own profile: {e}"),
        }
        match self.store.list_profiles(&session).await {
          Ok(users) => {
            self.users = users;
            self.loaded();
          }
          Err(e) => {
            self.users.clear();
            self.report("loading users", &e);
          }
        }
      }
    }
  }

  async fn authenticate(&mut self) {
    let form = &self.login;
    let result = match form.mode {
      AuthMode::SignIn => {
        let credentials = Credentials {
          email:    form.email.trim().to_string(),
          password: form.password.clone(),
        };
        self.store.sign_in(&credentials).await
      }
      AuthMode::Register => {
        let request = SignUp {
          email:     form.email.trim().to_string(),
          password:  form.password.clone(),
          full_name: form.full_name.trim().to_string(),
          role:      form.role,
        };
        self.store.sign_up(&request).await
      }
    };

    match result {
      Ok(session) => self.start_session(session).await,
      Err(e) => {
        tracing::info!("authentication failed: {e}");
        self.login.error = Some(e.to_string());
      }
    }
  }

  async fn start_session(&mut self, session: Session) {
    self.profile = match self.store.get_profile(&session, session.user_id).await {
      Ok(profile) => profile,
      Err(e) => {
        tracing::warn!("error loading own profile: {e}");
        None
      }
    };
    self.session = Some(session);
    self.login.password.clear();
    self.login.error = None;
    self.screen = Screen::Main;
    self.switch_tab(Tab::Dashboard);
  }

  async fn save_item(&mut self, item: NewItem) {
    let Some(session) = self.session.clone() else {
      return;
    };
    let target = self.editor.as_ref().and_then(|e| e.target.clone());
    let result = match &target {
      Some(current) => {
        let changes = ItemChanges::between(current, &item);
        audit::edit_item(&*self.store, &session, current, &changes).await
      }
      None => audit::add_item(&*self.store, &session, &item).await,
    };

    match result {
      Ok(saved) => {
        self.editor = None;
        self.flash = Some(format!("Saved {}", saved.name));
        self.pending = Some(Pending::Load(Tab::Inventory));
      }
      Err(e) => {
        tracing::warn!("error saving item: {e}");
        if let Some(editor) = self.editor.as_mut() {
          editor.error = Some(e.to_string());
        }
      }
    }
  }

  async fn delete_item(&mut self) {
    let (Some(session), Some(item)) = (self.session.clone(), self.confirm_delete.take()) else {
      return;
    };
    match audit::remove_item(&*self.store, &session, &item).await {
      Ok(()) => {
        self.flash = Some(format!("Deleted {}", item.name));
        self.pending = Some(Pending::Load(Tab::Inventory));
      }
      Err(e) => self.report("deleting item", &e),
    }
  }

  async fn sign_out(&mut self) {
    if let Some(session) = self.session.take() {
      if let Err(e) = self.store.sign_out(&session).await {
        tracing::warn!("error signing out: {e}");
      }
    }
    let email = std::mem::take(&mut self.login.email);
    self.login = LoginForm { email, ..LoginForm::default() };
    self.profile = None;
    self.summary = Summary::default();
    self.low_stock.clear();
    self.items.clear();
    self.activity.clear();
    self.users.clear();
    self.filter.clear();
    self.filter_active = false;
    self.list_cursor = 0;
    self.editor = None;
    self.confirm_delete = None;
    self.status_msg.clear();
    self.screen = Screen::Login;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }
    match self.screen {
      Screen::Login => self.handle_login_key(key),
      Screen::Main => self.handle_main_key(key),
    }
  }

  fn handle_login_key(&mut self, key: KeyEvent) -> bool {
    let form = &mut self.login;
    let len = form.fields().len();
    match key.code {
      KeyCode::Esc => return false,
      KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => form.toggle_mode(),
      KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % len,
      KeyCode::BackTab | KeyCode::Up => form.focus = (form.focus + len - 1) % len,
      KeyCode::Enter => match form.validate() {
        Ok(()) => {
          form.error = None;
          self.pending = Some(Pending::Authenticate);
        }
        Err(msg) => form.error = Some(msg),
      },
      KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
        if form.focused() == LoginField::Role =>
      {
        form.toggle_role()
      }
      KeyCode::Backspace => {
        if let Some(text) = form.text_mut(form.focused()) {
          text.pop();
        }
      }
      KeyCode::Char(c) => {
        if let Some(text) = form.text_mut(form.focused()) {
          text.push(c);
        }
      }
      _ => {}
    }
    true
  }

  fn handle_main_key(&mut self, key: KeyEvent) -> bool {
    if self.editor.is_some() {
      self.handle_editor_key(key);
      return true;
    }
    if self.confirm_delete.is_some() {
      self.handle_confirm_key(key);
      return true;
    }
    if self.filter_active {
      self.handle_filter_key(key);
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Tab => self.switch_tab(self.tab.next()),
      KeyCode::BackTab => self.switch_tab(self.tab.prev()),
      KeyCode::Char(c @ '1'..='4') => {
        let idx = c as usize - '1' as usize;
        self.switch_tab(Tab::ALL[idx]);
      }
      KeyCode::Char('r') => self.switch_tab(self.tab),
      KeyCode::Char('o') => self.pending = Some(Pending::SignOut),
      _ => match self.tab {
        Tab::Inventory => self.handle_inventory_key(key),
        Tab::Reports | Tab::Settings => self.handle_scroll_key(key),
        Tab::Dashboard => {}
      },
    }
    true
  }

  fn switch_tab(&mut self, tab: Tab) {
    self.tab = tab;
    self.scroll = 0;
    self.status_msg.clear();
    self.pending = Some(Pending::Load(tab));
  }

  fn handle_inventory_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_items().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Char('a') => {
        self.editor = Some(Editor {
          target: None,
          form:   ItemForm::default(),
          focus:  0,
          error:  None,
        });
      }
      KeyCode::Char('e') | KeyCode::Enter => {
        if let Some(item) = self.cursor_item().cloned() {
          self.editor = Some(Editor {
            form:   ItemForm::from_item(&item),
            target: Some(item),
            focus:  0,
            error:  None,
          });
        }
      }
      KeyCode::Char('d') | KeyCode::Delete => {
        self.confirm_delete = self.cursor_item().cloned();
      }
      _ => {}
    }
  }

  fn handle_scroll_key(&mut self, key: KeyEvent) {
    let len = match self.tab {
      Tab::Reports => self.activity.len(),
      _ => self.users.len(),
    };
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        if self.scroll + 1 < len {
          self.scroll += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
      _ => {}
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  fn handle_editor_key(&mut self, key: KeyEvent) {
    let Some(editor) = self.editor.as_mut() else {
      return;
    };
    let len = ItemField::ALL.len();
    match key.code {
      KeyCode::Esc => self.editor = None,
      KeyCode::Tab | KeyCode::Down => editor.focus = (editor.focus + 1) % len,
      KeyCode::BackTab | KeyCode::Up => editor.focus = (editor.focus + len - 1) % len,
      KeyCode::Enter => match editor.form.parse() {
        Ok(item) => {
          editor.error = None;
          self.pending = Some(Pending::SaveItem(item));
        }
        Err(e) => editor.error = Some(e.to_string()),
      },
      KeyCode::Backspace => {
        editor.focused().value_mut(&mut editor.form).pop();
      }
      KeyCode::Char(c) => editor.focused().value_mut(&mut editor.form).push(c),
      _ => {}
    }
  }

  fn handle_confirm_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => self.pending = Some(Pending::DeleteItem),
      KeyCode::Char('n') | KeyCode::Esc => self.confirm_delete = None,
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::Utc;
  use rust_decimal_macros::dec;
  use stockroom_core::{
    AuthError,
    activity::{Action, ActivityLog, NewActivity},
    profile::Author,
  };
  use uuid::Uuid;

  use super::*;

  /// Scripted store: canned rows, optional failures, recorded writes.
  #[derive(Default)]
  struct StubStore {
    items:      Vec<InventoryItem>,
    activity:   Vec<ActivityEntry>,
    fail_reads: bool,
    created:    Mutex<Vec<NewItem>>,
    recorded:   Mutex<Vec<NewActivity>>,
  }

  fn outage() -> RemoteError { RemoteError::Transport("connection refused".into()) }

  impl InventoryStore for StubStore {
    async fn list_items(&self, _: &Session) -> Result<Vec<InventoryItem>, RemoteError> {
      if self.fail_reads {
        return Err(outage());
      }
      Ok(self.items.clone())
    }

    async fn list_activity(&self, _: &Session, limit: usize) -> Result<Vec<ActivityEntry>, RemoteError> {
      if self.fail_reads {
        return Err(outage());
      }
      Ok(self.activity.iter().take(limit).cloned().collect())
    }

    async fn list_profiles(&self, _: &Session) -> Result<Vec<Profile>, RemoteError> {
      if self.fail_reads {
        return Err(outage());
      }
      Ok(Vec::new())
    }

    async fn get_profile(&self, session: &Session, id: Uuid) -> Result<Option<Profile>, RemoteError> {
      let now = Utc::now();
      Ok(Some(Profile {
        id,
        email: session.email.clone(),
        full_name: "Test User".into(),
        role: Role::Admin,
        created_at: now,
        updated_at: now,
      }))
    }

    async fn create_item(&self, session: &Session, item: &NewItem) -> Result<InventoryItem, RemoteError> {
      self.created.lock().unwrap().push(item.clone());
      Ok(stock_item(&item.name, item.quantity, item.min_quantity, Some(session.user_id)))
    }

    async fn update_item(&self, _: &Session, id: Uuid, _: &ItemChanges) -> Result<InventoryItem, RemoteError> {
      Err(RemoteError::NotFound(id.to_string()))
    }

    async fn delete_item(&self, _: &Session, _: Uuid) -> Result<(), RemoteError> { Ok(()) }

    async fn record_activity(&self, _: &Session, activity: &NewActivity) -> Result<ActivityLog, RemoteError> {
      self.recorded.lock().unwrap().push(activity.clone());
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

  impl AuthProvider for StubStore {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
      if credentials.password != "right" {
        return Err(AuthError::InvalidCredentials("Invalid login credentials".into()));
      }
      Ok(session(&credentials.email))
    }

    async fn sign_up(&self, request: &SignUp) -> Result<Session, AuthError> {
      Err(AuthError::Conflict(format!("{} is already registered", request.email)))
    }

    async fn sign_out(&self, _: &Session) -> Result<(), AuthError> { Ok(()) }
  }

  fn session(email: &str) -> Session {
    Session {
      access_token:  "token".into(),
      refresh_token: None,
      expires_at:    None,
      user_id:       Uuid::new_v4(),
      email:         email.into(),
    }
  }

  fn stock_item(name: &str, quantity: u32, min_quantity: u32, by: Option<Uuid>) -> InventoryItem {
    let now = Utc::now();
    InventoryItem {
      id: Uuid::new_v4(),
      name: name.into(),
      sku: format!("SKU-{name}"),
      category: "General".into(),
      quantity,
      min_quantity,
      unit_price: dec!(2.50),
      supplier: String::new(),
      last_updated_by: by,
      created_at: now,
      updated_at: now,
    }
  }

  fn signed_in(store: StubStore) -> App<StubStore> {
    let mut app = App::new(store);
    app.session = Some(session("staff@example.com"));
    app.screen = Screen::Main;
    app
  }

  fn press(app: &mut App<StubStore>, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
  }

  fn type_text(app: &mut App<StubStore>, text: &str) {
    for c in text.chars() {
      press(app, KeyCode::Char(c));
    }
  }

  async fn drain(app: &mut App<StubStore>) {
    while let Some(p) = app.take_pending() {
      app.run(p).await;
    }
  }

  // ─── Dashboard ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn failed_items_load_leaves_default_summary() {
    let mut app = signed_in(StubStore { fail_reads: true, ..Default::default() });
    app.summary = Summary { total_items: 3, low_stock: 1, total_value: dec!(9) };

    app.run(Pending::Load(Tab::Dashboard)).await;

    assert_eq!(app.summary, Summary::default());
    assert!(app.low_stock.is_empty());
    assert!(app.status_msg.starts_with("Error loading stats"));
    assert_eq!(app.screen, Screen::Main);
  }

  #[tokio::test]
  async fn dashboard_load_summarizes_items() {
    let store = StubStore {
      items: vec![stock_item("bolts", 5, 10, None), stock_item("nuts", 20, 5, None)],
      ..Default::default()
    };
    let mut app = signed_in(store);
    app.run(Pending::Load(Tab::Dashboard)).await;

    assert_eq!(app.summary.total_items, 2);
    assert_eq!(app.summary.low_stock, 1);
    assert_eq!(app.summary.display_value(), "62.50");
    assert_eq!(app.low_stock[0].name, "bolts");
  }

  // ─── Login ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn failed_sign_in_keeps_form() {
    let mut app = App::new(StubStore::default());
    type_text(&mut app, "staff@example.com");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "wrong");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.pending, Some(Pending::Authenticate));

    drain(&mut app).await;

    assert_eq!(app.screen, Screen::Login);
    assert_eq!(app.login.error.as_deref(), Some("Invalid login credentials"));
    assert_eq!(app.login.email, "staff@example.com");
    assert_eq!(app.login.password, "wrong");
  }

  #[tokio::test]
  async fn blank_login_is_rejected_locally() {
    let mut app = App::new(StubStore::default());
    press(&mut app, KeyCode::Enter);
    assert!(app.pending.is_none());
    assert_eq!(app.login.error.as_deref(), Some("Email is required"));
  }

  #[tokio::test]
  async fn sign_in_opens_dashboard() {
    let mut app = App::new(StubStore::default());
    type_text(&mut app, "staff@example.com");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "right");
    press(&mut app, KeyCode::Enter);

    let auth = app.take_pending().unwrap();
    app.run(auth).await;

    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.tab, Tab::Dashboard);
    assert_eq!(app.pending, Some(Pending::Load(Tab::Dashboard)));
    assert!(app.login.password.is_empty());
    assert_eq!(app.profile.as_ref().map(|p| p.role), Some(Role::Admin));
  }

  #[tokio::test]
  async fn register_conflict_is_shown_verbatim() {
    let mut app = App::new(StubStore::default());
    app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
    assert_eq!(app.login.mode, AuthMode::Register);

    type_text(&mut app, "Grace");
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.login.role, Role::Admin);
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "g@example.com");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "pw");
    press(&mut app, KeyCode::Enter);
    drain(&mut app).await;

    assert_eq!(app.login.error.as_deref(), Some("g@example.com is already registered"));
    assert_eq!(app.login.full_name, "Grace");
  }

  // ─── Tabs ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn reports_tab_loads_activity() {
    let entry = ActivityEntry {
      log:    ActivityLog {
        id:          Uuid::new_v4(),
        user_id:     Uuid::new_v4(),
        action:      Action::Delete,
        item_id:     None,
        item_name:   "washers".into(),
        description: "Deleted washers (SKU W)".into(),
        created_at:  Utc::now(),
      },
      author: None::<Author>,
    };
    let mut app = signed_in(StubStore { activity: vec![entry], ..Default::default() });

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.pending, Some(Pending::Load(Tab::Reports)));
    drain(&mut app).await;

    assert_eq!(app.tab, Tab::Reports);
    assert_eq!(app.activity.len(), 1);
    assert_eq!(app.activity[0].attribution(), "Unknown (N/A)");
  }

  #[tokio::test]
  async fn q_quits_and_tab_cycles() {
    let mut app = signed_in(StubStore::default());
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.tab, Tab::Settings);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.tab, Tab::Dashboard);
    assert!(!press(&mut app, KeyCode::Char('q')));
  }

  // ─── Inventory ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn filter_matches_name_sku_and_category() {
    let mut app = signed_in(StubStore::default());
    app.items = vec![stock_item("hex bolt", 1, 1, None), stock_item("wing nut", 1, 1, None)];
    app.tab = Tab::Inventory;

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "hex");
    assert_eq!(app.filtered_items().len(), 1);
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.filtered_items().len(), 2);
  }

  #[tokio::test]
  async fn add_item_validates_then_saves_and_audits() {
    let mut app = signed_in(StubStore::default());
    app.tab = Tab::Inventory;

    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Enter);
    assert!(app.pending.is_none());
    assert_eq!(app.editor.as_ref().and_then(|e| e.error.as_deref()), Some("name is required"));

    for value in ["Widget", "W-1", "Parts", "12", "4", "$3.25", "Acme"] {
      type_text(&mut app, value);
      press(&mut app, KeyCode::Tab);
    }
    press(&mut app, KeyCode::Enter);
    assert!(matches!(app.pending, Some(Pending::SaveItem(_))));

    let save = app.take_pending().unwrap();
    app.run(save).await;

    assert!(app.editor.is_none());
    assert_eq!(app.pending, Some(Pending::Load(Tab::Inventory)));
    assert_eq!(app.store.created.lock().unwrap()[0].unit_price, dec!(3.25));
    let recorded = app.store.recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].action, Action::Create);
  }

  #[tokio::test]
  async fn failed_edit_stays_in_editor() {
    let mut app = signed_in(StubStore::default());
    app.items = vec![stock_item("bolts", 5, 1, None)];
    app.tab = Tab::Inventory;

    press(&mut app, KeyCode::Char('e'));
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Backspace);
    type_text(&mut app, "9");
    press(&mut app, KeyCode::Enter);
    drain(&mut app).await;

    let editor = app.editor.as_ref().expect("editor stays open");
    assert!(editor.error.as_deref().unwrap().starts_with("not found"));
    assert!(app.store.recorded.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn delete_asks_for_confirmation() {
    let mut app = signed_in(StubStore::default());
    app.items = vec![stock_item("bolts", 5, 1, None)];
    app.tab = Tab::Inventory;

    press(&mut app, KeyCode::Char('d'));
    assert!(app.confirm_delete.is_some());
    press(&mut app, KeyCode::Char('n'));
    assert!(app.confirm_delete.is_none());

    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('y'));
    let delete = app.take_pending().unwrap();
    app.run(delete).await;

    assert_eq!(app.pending, Some(Pending::Load(Tab::Inventory)));
    assert_eq!(app.store.recorded.lock().unwrap()[0].action, Action::Delete);
  }

  #[tokio::test]
  async fn sign_out_returns_to_login_and_clears_data() {
    let mut app = signed_in(StubStore::default());
    app.login.email = "staff@example.com".into();
    app.items = vec![stock_item("bolts", 5, 1, None)];

    press(&mut app, KeyCode::Char('o'));
    drain(&mut app).await;

    assert_eq!(app.screen, Screen::Login);
    assert!(app.session.is_none());
    assert!(app.items.is_empty());
    assert_eq!(app.login.email, "staff@example.com");
  }
}
