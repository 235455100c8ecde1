//! Team members and the blocked/normal split of the member screen.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A member as returned by `GET /members/getMembers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
  pub user_id:           String,
  #[serde(default)]
  pub profile_picture:   Option<String>,
  pub user_name:         String,
  #[serde(default)]
  pub amount_of_no_show: u32,
  #[serde(default)]
  pub amount_of_book:    u32,
  #[serde(default)]
  pub is_blocked:        bool,
  /// When the member joined, as sent by the server.
  #[serde(default)]
  pub add_time:          String,
}

impl Member {
  /// No-shows as a share of bookings, `0.0` for a member with no bookings.
  pub fn no_show_rate(&self) -> f64 {
    if self.amount_of_book == 0 {
      0.0
    } else {
      f64::from(self.amount_of_no_show) / f64::from(self.amount_of_book)
    }
  }
}

/// The two tabs of the member screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemberCategory {
  #[default]
  Normal,
  Blocked,
}

impl MemberCategory {
  pub const ALL: [MemberCategory; 2] = [Self::Normal, Self::Blocked];

  pub fn label(self) -> &'static str {
    match self {
      Self::Normal => "正常會員",
      Self::Blocked => "已封鎖",
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      Self::Normal => Self::Blocked,
      Self::Blocked => Self::Normal,
    }
  }

  pub fn matches(self, member: &Member) -> bool {
    member.is_blocked == (self == Self::Blocked)
  }

  /// Members in this category, in list order.
  pub fn filter(self, members: &[Member]) -> Vec<&Member> {
    members.iter().filter(|m| self.matches(m)).collect()
  }
}

impl fmt::Display for MemberCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn member(id: &str, blocked: bool) -> Member {
    Member {
      user_id:           id.into(),
      profile_picture:   None,
      user_name:         format!("user {id}"),
      amount_of_no_show: 1,
      amount_of_book:    4,
      is_blocked:        blocked,
      add_time:          "2024-01-01".into(),
    }
  }

  #[test]
  fn filter_splits_blocked_and_keeps_order() {
    let members = vec![
      member("u1", false),
      member("u2", true),
      member("u3", false),
    ];
    let normal: Vec<_> = MemberCategory::Normal
      .filter(&members)
      .iter()
      .map(|m| m.user_id.as_str())
      .collect();
    assert_eq!(normal, ["u1", "u3"]);

    let blocked = MemberCategory::Blocked.filter(&members);
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].user_id, "u2");
  }

  #[test]
  fn toggled_flips_tab() {
    assert_eq!(MemberCategory::Normal.toggled(), MemberCategory::Blocked);
    assert_eq!(MemberCategory::Blocked.toggled(), MemberCategory::Normal);
  }

  #[test]
  fn missing_optional_fields_default() {
    let m: Member =
      serde_json::from_str(r#"{"user_id":"u9","user_name":"Kai"}"#).unwrap();
    assert!(!m.is_blocked);
    assert_eq!(m.no_show_rate(), 0.0);
    assert_eq!(member("u1", false).no_show_rate(), 0.25);
  }
}
