//! Team-name settings form.

use crate::{Error, Result};

/// Result of submitting the team-name form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamNameChange {
  /// The draft equals the saved name; nothing to send.
  Unchanged,
  /// Send this value to the server.
  Changed(String),
}

/// Draft and saved value of the team name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamNameForm {
  saved: String,
  draft: String,
}

impl TeamNameForm {
  /// Start editing from the name currently stored on the server.
  pub fn new(saved: impl Into<String>) -> Self {
    let saved = saved.into();
    Self {
      draft: saved.clone(),
      saved,
    }
  }

  pub fn saved(&self) -> &str { &self.saved }

  pub fn draft(&self) -> &str { &self.draft }

  pub fn push(&mut self, c: char) { self.draft.push(c); }

  pub fn pop(&mut self) { self.draft.pop(); }

  /// Discard the draft and go back to the saved name.
  pub fn revert(&mut self) { self.draft.clone_from(&self.saved); }

  /// Validate the draft.
  pub fn submit(&self) -> Result<TeamNameChange> {
    if self.draft.trim().is_empty() {
      return Err(Error::EmptyTeamName);
    }
    if self.draft == self.saved {
      return Ok(TeamNameChange::Unchanged);
    }
    Ok(TeamNameChange::Changed(self.draft.clone()))
  }

  /// Record that the server accepted `value`.
  pub fn commit(&mut self, value: impl Into<String>) {
    self.saved = value.into();
    self.draft.clone_from(&self.saved);
  }
}
