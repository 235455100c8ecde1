//! Member list screen.

use courtbook_core::member::MemberCategory;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

/// Render the member screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);

  let tabs: Vec<Span> = MemberCategory::ALL
    .into_iter()
    .flat_map(|category| {
      let style = if category == app.member_category {
        Style::default()
          .fg(Color::LightBlue)
          .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
      } else {
        Style::default().fg(Color::Gray)
      };
      [Span::raw("  "), Span::styled(category.label(), style)]
    })
    .collect();
  f.render_widget(Paragraph::new(Line::from(tabs)), rows[0]);

  let block = Block::default()
    .title(format!(" {} ", app.member_category))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let Some(members) = app.visible_members() else {
    let hint = if app.api().is_some() { "Loading…" } else { "Members need an API connection." };
    f.render_widget(
      Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .block(block),
      rows[1],
    );
    return;
  };

  let items: Vec<ListItem> = members
    .iter()
    .enumerate()
    .map(|(i, member)| {
      let style = if i == app.member_cursor {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      ListItem::new(Line::from(vec![
        Span::styled(format!("{:<20}", member.user_name), style),
        Span::styled(
          format!(
            "  bookings {:>3}  no-shows {:>3} ({:>3.0}%)  joined {}",
            member.amount_of_book,
            member.amount_of_no_show,
            member.no_show_rate() * 100.0,
            member.add_time
          ),
          Style::default().fg(Color::DarkGray),
        ),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!members.is_empty()).then_some(app.member_cursor));

  f.render_stateful_widget(List::new(items).block(block), rows[1], &mut state);
}
