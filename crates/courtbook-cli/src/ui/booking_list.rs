//! Booking list screen: category tabs, facet bar, and the visible bookings.

use courtbook_core::{
  booking::{Booking, BookingState},
  derive::Phase,
  facet::Category,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, InputMode};

/// Render the booking screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // category tabs
      Constraint::Length(1), // facet bar
      Constraint::Min(0),    // list
    ])
    .split(area);

  draw_tabs(f, rows[0], app);
  draw_facets(f, rows[1], app);
  draw_list(f, rows[2], app);
}

fn state_colors(state: BookingState) -> (Color, Color) {
  match state {
    BookingState::Open => (Color::Blue, Color::LightBlue),
    BookingState::InProgress => (Color::Green, Color::LightGreen),
    BookingState::Ended => (Color::Gray, Color::DarkGray),
  }
}

// ─── Tabs ─────────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
  let current = app.bookings.facets().category;
  let counts = app.bookings.category_counts();

  let mut spans = Vec::new();
  for (n, category) in Category::tabs().into_iter().enumerate() {
    let count = counts
      .map(|c| format!(" {}", c[n].1))
      .unwrap_or_default();
    let style = if category == current {
      Style::default()
        .fg(Color::Black)
        .bg(Color::LightBlue)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
      format!(" {} {}{count} ", n + 1, category.label()),
      style,
    ));
  }
  f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ─── Facet bar ────────────────────────────────────────────────────────────────

fn draw_facets(f: &mut Frame, area: Rect, app: &App) {
  let facets = app.bookings.facets();
  let active = Style::default().fg(Color::Yellow);
  let idle = Style::default().fg(Color::DarkGray);

  let search = match app.mode {
    InputMode::Search => Span::styled(format!(" /{}_", facets.search_text), active),
    _ if facets.search_text.is_empty() => Span::styled(" /搜尋場次...", idle),
    _ => Span::styled(format!(" /{}", facets.search_text), active),
  };

  let dates = match (app.mode, facets.date_range) {
    (InputMode::DateRange, _) => Span::styled(format!("   日期 {}_", app.date_input), active),
    (_, Some(range)) => Span::styled(format!("   日期 {range}"), active),
    (_, None) => Span::styled("   日期 (any)", idle),
  };

  f.render_widget(Paragraph::new(Line::from(vec![search, dates])), area);
}

// ─── List ─────────────────────────────────────────────────────────────────────

fn booking_item(booking: &Booking, selected: bool) -> ListItem<'static> {
  let (fg, bg) = state_colors(booking.state);
  let base = if selected {
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default()
  };
  let dim = if selected { base } else { base.fg(Color::DarkGray) };

  let title = Line::from(vec![
    Span::styled(
      format!("{}（{}）", booking.place_name, booking.short_id()),
      base.add_modifier(Modifier::BOLD),
    ),
    Span::raw("  "),
    Span::styled(
      format!(" {} ", booking.state),
      Style::default().fg(fg).bg(bg),
    ),
  ]);
  let detail = Line::from(vec![
    Span::styled(format!("  {}", booking.team_name), base),
    Span::styled(
      format!(
        "   {}  {}  {}/{}  剩餘 {}",
        booking.date,
        booking.time,
        booking.occupancy,
        booking.capacity,
        booking.vacancies()
      ),
      dim,
    ),
  ]);

  ListItem::new(vec![title, detail])
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
  let total = app.bookings.store().dataset().map_or(0, |d| d.len());

  let Some(visible) = app.bookings.visible() else {
    // No dataset yet: either still loading or the first fetch failed.
    let message = match app.bookings.phase() {
      Phase::Failed { message } => format!("Could not load bookings: {message}"),
      _ => "Loading…".to_string(),
    };
    let block = Block::default()
      .title(" Bookings ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(
      Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .block(block),
      area,
    );
    return;
  };

  let title = if app.bookings.facets().is_neutral() {
    format!(" Bookings ({total}) ")
  } else {
    format!(" Bookings ({}/{total}) ", visible.len())
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if visible.is_empty() {
    f.render_widget(
      Paragraph::new("No bookings match the current filters.")
        .style(Style::default().fg(Color::DarkGray))
        .block(block),
      area,
    );
    return;
  }

  let items: Vec<ListItem> = visible
    .iter()
    .enumerate()
    .map(|(i, booking)| booking_item(booking, i == app.booking_cursor))
    .collect();

  // Scrollable list with cursor tracking.
  let mut state = ListState::default();
  state.select(Some(app.booking_cursor));

  f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}
