//! TUI rendering: header, active screen, status bar.

pub mod booking_list;
pub mod member_list;
pub mod team_settings;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, InputMode, NoticeLevel, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Bookings => booking_list::draw(f, rows[1], app),
    Screen::Members => member_list::draw(f, rows[1], app),
    Screen::Settings => team_settings::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let mut spans = vec![Span::styled(
    " courtbook ",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];
  for screen in Screen::ALL {
    let style = if screen == app.screen {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!(" {} ", screen.title()), style));
  }

  let right = match app.api() {
    Some(client) => format!("{}  {date} ", client.config().base_url),
    None => format!("offline  {date} "),
  };
  let right = Span::styled(right, Style::default().fg(Color::Gray));

  // Simple left-right header: pad the middle.
  let left_width: usize = spans.iter().map(Span::width).sum();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.width());
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match (app.screen, app.mode) {
    (Screen::Bookings, InputMode::Search) => (
      "SEARCH",
      "Type to filter  Enter keep  Esc clear",
    ),
    (Screen::Bookings, InputMode::DateRange) => (
      "DATES",
      "START..END  Enter apply  empty clears  Esc cancel",
    ),
    (Screen::Bookings, InputMode::Normal) => (
      "NORMAL",
      "1-4/←→ category  / search  d dates  c clear  r reload  Tab screen  q quit",
    ),
    (Screen::Members, _) => (
      "MEMBERS",
      "←→ tab  ↑↓/jk navigate  r reload  Tab screen  q quit",
    ),
    (Screen::Settings, _) => (
      "EDIT",
      "Type name  Enter save  Esc revert  Tab screen  Ctrl-C quit",
    ),
  };

  let (mode_bg, status, status_style) = match &app.notice {
    Some(notice) => {
      let color = match notice.level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
      };
      (
        color,
        format!("{}：{}", notice.title, notice.message),
        Style::default().fg(color),
      )
    }
    None if app.loading() => (
      Color::Yellow,
      "Loading…".to_string(),
      Style::default().fg(Color::Yellow),
    ),
    None => (
      Color::Cyan,
      hints.to_string(),
      Style::default().fg(Color::DarkGray),
    ),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(mode_bg)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), status_style);

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
