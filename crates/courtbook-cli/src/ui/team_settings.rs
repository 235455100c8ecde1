//! Team settings screen: the team-name form.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Render the settings screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let outer = Block::default()
    .title(" 球隊名稱 ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = outer.inner(area);
  f.render_widget(outer, area);

  let Some(form) = app.team_name.as_ref() else {
    let hint = if app.api().is_some() {
      "Loading…"
    } else {
      "Team settings need an API connection."
    };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // input
      Constraint::Length(1), // validation
      Constraint::Length(1), // saved value
      Constraint::Min(0),
    ])
    .split(inner);

  let border = if app.team_name_invalid { Color::Red } else { Color::Cyan };
  f.render_widget(
    Paragraph::new(format!("{}_", form.draft())).block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border)),
    ),
    rows[0],
  );

  if app.team_name_invalid {
    f.render_widget(
      Paragraph::new("請正確填寫球隊名稱").style(Style::default().fg(Color::Red)),
      rows[1],
    );
  }

  f.render_widget(
    Paragraph::new(format!("Saved: {}", form.saved())).style(Style::default().fg(Color::DarkGray)),
    rows[2],
  );
}
