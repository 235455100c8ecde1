//! Error types for `courtbook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date range: {0}")]
  InvalidRange(String),

  #[error("invalid date: {0:?}")]
  InvalidDate(String),

  #[error("unknown booking state: {0:?}")]
  UnknownState(String),

  #[error("duplicate booking id: {0}")]
  DuplicateBooking(String),

  #[error("booking {book_id} has {occupancy} members but only {capacity} slots")]
  OverCapacity {
    book_id:   String,
    occupancy: u32,
    capacity:  u32,
  },

  #[error("team name must not be empty")]
  EmptyTeamName,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
