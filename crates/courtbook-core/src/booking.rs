//! Booking records and the immutable dataset they are delivered in.
//!
//! A booking is one scheduled session at a venue. Bookings arrive from the
//! server (or the bundled sample) as a JSON array whose field names are kept
//! as-is on the wire.

use std::{collections::HashSet, fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Lifecycle state ─────────────────────────────────────────────────────────

/// Where a booking is in its lifecycle. The closed set of wire labels is
/// fixed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingState {
  /// Accepting sign-ups.
  #[serde(rename = "報名中")]
  Open,
  #[serde(rename = "進行中")]
  InProgress,
  #[serde(rename = "已結束")]
  Ended,
}

impl BookingState {
  /// Every state, in display order.
  pub const ALL: [BookingState; 3] = [Self::Open, Self::InProgress, Self::Ended];

  /// The wire and display label.
  pub fn label(self) -> &'static str {
    match self {
      Self::Open => "報名中",
      Self::InProgress => "進行中",
      Self::Ended => "已結束",
    }
  }
}

impl fmt::Display for BookingState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl FromStr for BookingState {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|state| state.label() == s)
      .ok_or_else(|| Error::UnknownState(s.to_owned()))
  }
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a booking date into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 timestamps, and naive
/// `YYYY-MM-DD[T ]HH:MM[:SS]` timestamps. Any time-of-day component is
/// dropped and the date is kept as written (no timezone shift), so a session
/// at 23:30 never lands on the next day's range boundary.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
  let s = raw.trim();

  for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
    if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
      return Ok(date);
    }
  }

  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.date_naive());
  }

  for fmt in [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
  ] {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Ok(dt.date());
    }
  }

  Err(Error::InvalidDate(raw.to_owned()))
}

/// Serde adapter: lenient on the way in, `YYYY-MM-DD` on the way out.
mod wire_date {
  use chrono::NaiveDate;
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(
    date: &NaiveDate,
    serializer: S,
  ) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%Y-%m-%d"))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> std::result::Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    super::parse_date(&raw).map_err(serde::de::Error::custom)
  }
}

// ─── Booking ─────────────────────────────────────────────────────────────────

/// One bookable session. Records are never modified after they are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
  pub book_id:    String,
  /// Venue name.
  pub place_name: String,
  pub team_name:  String,
  #[serde(with = "wire_date")]
  pub date:       NaiveDate,
  /// Free-form time label, e.g. `"19:00-21:00"`.
  pub time:       String,
  pub state:      BookingState,
  #[serde(rename = "total_of_member")]
  pub capacity:   u32,
  #[serde(rename = "amount_of_member")]
  pub occupancy:  u32,
}

impl Booking {
  /// The short code shown next to the venue name: the id without its
  /// five-character prefix, or the whole id when it is shorter than that.
  pub fn short_id(&self) -> &str {
    match self.book_id.char_indices().nth(5) {
      Some((at, _)) => &self.book_id[at..],
      None => &self.book_id,
    }
  }

  /// Remaining free slots.
  pub fn vacancies(&self) -> u32 { self.capacity.saturating_sub(self.occupancy) }
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// The full, ordered booking collection from one successful fetch.
///
/// Cheap to clone; the records are shared and immutable. A reload produces a
/// new `Dataset` rather than editing this one.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
  records: Arc<[Booking]>,
}

impl Dataset {
  /// Validate and wrap `records`, keeping their order.
  ///
  /// Fails on duplicate `book_id`s and on bookings whose occupancy exceeds
  /// their capacity.
  pub fn new(records: Vec<Booking>) -> Result<Self> {
    let mut seen = HashSet::with_capacity(records.len());
    for booking in &records {
      if !seen.insert(booking.book_id.as_str()) {
        return Err(Error::DuplicateBooking(booking.book_id.clone()));
      }
      if booking.occupancy > booking.capacity {
        return Err(Error::OverCapacity {
          book_id:   booking.book_id.clone(),
          occupancy: booking.occupancy,
          capacity:  booking.capacity,
        });
      }
    }
    Ok(Self { records: records.into() })
  }

  /// Parse a JSON array of bookings and validate it.
  pub fn from_json(raw: &str) -> Result<Self> {
    let records: Vec<Booking> = serde_json::from_str(raw)?;
    Self::new(records)
  }

  pub fn as_slice(&self) -> &[Booking] { &self.records }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn iter(&self) -> std::slice::Iter<'_, Booking> { self.records.iter() }
}
