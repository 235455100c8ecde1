//! Application state machine and event dispatcher.

use courtbook_core::{
  booking::Booking,
  derive::{BookingView, FetchTicket, LoadOutcome, Phase},
  facet::Category,
  member::{Member, MemberCategory},
  settings::{TeamNameChange, TeamNameForm},
  source::{BookingSource, StaticSource},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::client::ApiClient;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Bookings,
  Members,
  Settings,
}

impl Screen {
  pub const ALL: [Screen; 3] = [Self::Bookings, Self::Members, Self::Settings];

  pub fn title(self) -> &'static str {
    match self {
      Self::Bookings => "場次管理",
      Self::Members => "會員管理",
      Self::Settings => "球隊設定",
    }
  }

  fn next(self) -> Self {
    match self {
      Self::Bookings => Self::Members,
      Self::Members => Self::Settings,
      Self::Settings => Self::Bookings,
    }
  }
}

/// Which text field, if any, is capturing keystrokes on the booking screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
  Normal,
  Search,
  DateRange,
}

// ─── Notices ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
  Info,
  Success,
  Error,
}

/// A one-shot message shown in the status bar until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level:   NoticeLevel,
  pub title:   &'static str,
  pub message: String,
}

impl Notice {
  fn info(message: impl Into<String>) -> Self {
    Self {
      level:   NoticeLevel::Info,
      title:   "提示",
      message: message.into(),
    }
  }

  fn success(message: impl Into<String>) -> Self {
    Self {
      level:   NoticeLevel::Success,
      title:   "提示",
      message: message.into(),
    }
  }

  fn error(message: impl Into<String>) -> Self {
    Self {
      level:   NoticeLevel::Error,
      title:   "錯誤",
      message: message.into(),
    }
  }
}

// ─── Background results ───────────────────────────────────────────────────────

/// Where bookings are loaded from.
#[derive(Clone)]
pub enum DataSource {
  Static(StaticSource),
  Remote(ApiClient),
}

/// Completion of a spawned request, delivered back to the event loop.
#[derive(Debug)]
pub enum Fetched {
  Bookings(FetchTicket, Result<Vec<Booking>, String>),
  Members(Result<Vec<Member>, String>),
  TeamName(Result<String, String>),
  TeamNameSaved(Result<String, String>),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// Text field capturing keys on the booking screen.
  pub mode: InputMode,

  /// Facet state, dataset and visible list for the booking screen.
  pub bookings: BookingView,

  /// Draft of the date range being typed (`START..END`).
  pub date_input: String,

  /// Cursor position within the visible booking list.
  pub booking_cursor: usize,

  /// All members, `None` until loaded.
  pub members: Option<Vec<Member>>,

  pub member_category: MemberCategory,

  /// Cursor position within the current member tab.
  pub member_cursor: usize,

  /// Team-name form, `None` until the saved name is loaded.
  pub team_name: Option<TeamNameForm>,

  /// Whether the team-name field shows its validation error.
  pub team_name_invalid: bool,

  /// Requests in flight; the UI shows a spinner while non-zero.
  pub pending: usize,

  pub notice: Option<Notice>,

  source: DataSource,
  tx:     UnboundedSender<Fetched>,
  rx:     UnboundedReceiver<Fetched>,
}

impl App {
  pub fn new(source: DataSource) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      screen: Screen::Bookings,
      mode: InputMode::Normal,
      bookings: BookingView::new(),
      date_input: String::new(),
      booking_cursor: 0,
      members: None,
      member_category: MemberCategory::default(),
      member_cursor: 0,
      team_name: None,
      team_name_invalid: false,
      pending: 0,
      notice: None,
      source,
      tx,
      rx,
    }
  }

  pub fn loading(&self) -> bool { self.pending > 0 }

  pub fn api(&self) -> Option<&ApiClient> {
    match &self.source {
      DataSource::Remote(client) => Some(client),
      DataSource::Static(_) => None,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Start (or restart) the booking fetch. A response to an earlier request
  /// that arrives afterwards is dropped.
  pub fn reload_bookings(&mut self) {
    let ticket = self.bookings.begin_load();
    match self.source.clone() {
      DataSource::Static(source) => self.spawn_booking_fetch(ticket, source),
      DataSource::Remote(client) => self.spawn_booking_fetch(ticket, client),
    }
  }

  fn spawn_booking_fetch<S>(&mut self, ticket: FetchTicket, source: S)
  where
    S: BookingSource + 'static,
  {
    self.pending += 1;
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = source.fetch().await.map_err(|e| e.to_string());
      let _ = tx.send(Fetched::Bookings(ticket, result));
    });
  }

  pub fn reload_members(&mut self) {
    let Some(client) = self.api().cloned() else {
      self.notice = Some(Notice::info("Members need an API connection"));
      return;
    };
    self.pending += 1;
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = client.list_members().await.map_err(|e| e.to_string());
      let _ = tx.send(Fetched::Members(result));
    });
  }

  pub fn reload_team_name(&mut self) {
    let Some(client) = self.api().cloned() else {
      self.notice = Some(Notice::info("Team settings need an API connection"));
      return;
    };
    self.pending += 1;
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = client
        .team_defaults()
        .await
        .map(|d| d.team_name)
        .map_err(|e| e.to_string());
      let _ = tx.send(Fetched::TeamName(result));
    });
  }

  fn save_team_name(&mut self, value: String) {
    let Some(client) = self.api().cloned() else {
      return;
    };
    self.pending += 1;
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = client
        .update_team_name(&value)
        .await
        .map(|()| value)
        .map_err(|e| e.to_string());
      let _ = tx.send(Fetched::TeamNameSaved(result));
    });
  }

  /// Apply every completed request. Called once per frame.
  pub fn drain_fetched(&mut self) {
    while let Ok(fetched) = self.rx.try_recv() {
      self.apply(fetched);
    }
  }

  /// Apply one completed request.
  pub fn apply(&mut self, fetched: Fetched) {
    self.pending = self.pending.saturating_sub(1);
    match fetched {
      Fetched::Bookings(ticket, result) => {
        match self.bookings.finish_load(ticket, result) {
          LoadOutcome::Ready => self.clamp_booking_cursor(),
          LoadOutcome::Failed => {
            if let Phase::Failed { message } = self.bookings.phase() {
              self.notice = Some(Notice::error(format!("Could not load bookings: {message}")));
            }
          }
          LoadOutcome::Stale => {}
        }
      }
      Fetched::Members(Ok(members)) => {
        tracing::info!(members = members.len(), "members loaded");
        self.members = Some(members);
        self.clamp_member_cursor();
      }
      Fetched::Members(Err(e)) => {
        tracing::error!(error = %e, "member fetch failed");
        self.notice = Some(Notice::error(format!("Could not load members: {e}")));
      }
      Fetched::TeamName(Ok(name)) => {
        self.team_name = Some(TeamNameForm::new(name));
        self.team_name_invalid = false;
      }
      Fetched::TeamName(Err(e)) => {
        tracing::error!(error = %e, "team defaults fetch failed");
        self.notice = Some(Notice::error(format!("Could not load team name: {e}")));
      }
      Fetched::TeamNameSaved(Ok(value)) => {
        if let Some(form) = self.team_name.as_mut() {
          form.commit(value);
        }
        self.notice = Some(Notice::success("名稱設定成功"));
      }
      Fetched::TeamNameSaved(Err(e)) => {
        tracing::warn!(error = %e, "team name rejected");
        self.notice = Some(Notice::error("名稱已被使用"));
      }
    }
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  /// Members in the selected tab, `None` until loaded.
  pub fn visible_members(&self) -> Option<Vec<&Member>> {
    self
      .members
      .as_deref()
      .map(|members| self.member_category.filter(members))
  }

  fn visible_booking_count(&self) -> usize { self.bookings.visible().map_or(0, |v| v.len()) }

  fn clamp_booking_cursor(&mut self) {
    let len = self.visible_booking_count();
    self.booking_cursor = self.booking_cursor.min(len.saturating_sub(1));
  }

  fn clamp_member_cursor(&mut self) {
    let len = self.visible_members().map_or(0, |m| m.len());
    self.member_cursor = self.member_cursor.min(len.saturating_sub(1));
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    self.notice = None;

    match self.screen {
      Screen::Bookings => match self.mode {
        InputMode::Search => self.handle_search_key(key),
        InputMode::DateRange => self.handle_date_key(key),
        InputMode::Normal => self.handle_booking_key(key),
      },
      Screen::Members => self.handle_member_key(key),
      Screen::Settings => self.handle_settings_key(key),
    }
  }

  fn switch_screen(&mut self, screen: Screen) {
    self.screen = screen;
    match screen {
      Screen::Members if self.members.is_none() => self.reload_members(),
      Screen::Settings if self.team_name.is_none() => self.reload_team_name(),
      _ => {}
    }
  }

  fn select_category(&mut self, category: Category) {
    self.bookings.select_category(category);
    self.booking_cursor = 0;
  }

  fn handle_booking_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Tab => self.switch_screen(self.screen.next()),

      // Category tabs
      KeyCode::Char(c @ '1'..='4') => {
        let n = c as usize - '1' as usize;
        self.select_category(Category::tabs()[n]);
      }
      KeyCode::Right | KeyCode::Char('l') => {
        let tabs = Category::tabs();
        let next = (self.bookings.facets().category.index() + 1) % tabs.len();
        self.select_category(tabs[next]);
      }
      KeyCode::Left | KeyCode::Char('h') => {
        let tabs = Category::tabs();
        let current = self.bookings.facets().category.index();
        self.select_category(tabs[(current + tabs.len() - 1) % tabs.len()]);
      }

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.booking_cursor + 1 < self.visible_booking_count() {
          self.booking_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.booking_cursor = self.booking_cursor.saturating_sub(1);
      }

      // Facet editors
      KeyCode::Char('/') => self.mode = InputMode::Search,
      KeyCode::Char('d') => {
        self.date_input = self
          .bookings
          .facets()
          .date_range
          .map(|r| r.to_string())
          .unwrap_or_default();
        self.mode = InputMode::DateRange;
      }
      KeyCode::Char('c') => {
        self.bookings.clear_facets();
        self.date_input.clear();
        self.booking_cursor = 0;
      }

      KeyCode::Char('r') => self.reload_bookings(),
      _ => {}
    }
    true
  }

  fn handle_search_key(&mut self, key: KeyEvent) -> bool {
    let mut text = self.bookings.facets().search_text.clone();
    match key.code {
      KeyCode::Esc => {
        self.mode = InputMode::Normal;
        text.clear();
      }
      KeyCode::Enter => {
        self.mode = InputMode::Normal;
        return true;
      }
      KeyCode::Backspace => {
        text.pop();
      }
      KeyCode::Char(c) => text.push(c),
      _ => return true,
    }
    self.bookings.set_search_text(text);
    self.booking_cursor = 0;
    true
  }

  fn handle_date_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Esc => {
        self.mode = InputMode::Normal;
        self.date_input.clear();
      }
      KeyCode::Enter if self.date_input.trim().is_empty() => {
        self.mode = InputMode::Normal;
        self.bookings.clear_date_range();
        self.booking_cursor = 0;
      }
      KeyCode::Enter => {
        self.mode = InputMode::Normal;
        match self.bookings.submit_date_range_text(&self.date_input) {
          Ok(()) => self.booking_cursor = 0,
          Err(e) => {
            tracing::debug!(input = %self.date_input, error = %e, "date range rejected");
            self.notice = Some(Notice::error(e.to_string()));
          }
        }
      }
      KeyCode::Backspace => {
        self.date_input.pop();
      }
      KeyCode::Char(c) => self.date_input.push(c),
      _ => {}
    }
    true
  }

  fn handle_member_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Tab => self.switch_screen(self.screen.next()),
      KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
        self.member_category = self.member_category.toggled();
        self.member_cursor = 0;
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_members().map_or(0, |m| m.len());
        if self.member_cursor + 1 < len {
          self.member_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.member_cursor = self.member_cursor.saturating_sub(1);
      }
      KeyCode::Char('r') => self.reload_members(),
      _ => {}
    }
    true
  }

  fn handle_settings_key(&mut self, key: KeyEvent) -> bool {
    if key.code == KeyCode::Tab {
      self.switch_screen(self.screen.next());
      return true;
    }
    let Some(form) = self.team_name.as_mut() else {
      if key.code == KeyCode::Char('r') {
        self.reload_team_name();
      }
      return key.code != KeyCode::Char('q');
    };

    match key.code {
      KeyCode::Esc => {
        form.revert();
        self.team_name_invalid = false;
      }
      KeyCode::Backspace => form.pop(),
      KeyCode::Char(c) => {
        form.push(c);
        self.team_name_invalid = false;
      }
      KeyCode::Enter => match form.submit() {
        Ok(TeamNameChange::Unchanged) => {
          self.notice = Some(Notice::info("名稱未改變"));
        }
        Ok(TeamNameChange::Changed(value)) => self.save_team_name(value),
        Err(e) => {
          tracing::debug!(error = %e, "team name rejected locally");
          self.team_name_invalid = true;
        }
      },
      _ => {}
    }
    true
  }
}
