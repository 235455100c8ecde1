//! The facet store: current filter inputs plus the source dataset.
//!
//! Setters here are plain assignments. Nothing in this module filters; see
//! [`crate::derive`] for the single recomputation path.

use std::fmt;

use chrono::NaiveDate;

use crate::{
  Error, Result,
  booking::{BookingState, Dataset, parse_date},
};

// ─── Category ────────────────────────────────────────────────────────────────

/// The mutually exclusive category selector above the booking list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
  #[default]
  All,
  State(BookingState),
}

impl Category {
  /// Label of the catch-all tab.
  pub const ALL_LABEL: &'static str = "全部場次";

  /// Every category in tab order: `All` first, then each state.
  pub fn tabs() -> [Category; 4] {
    [
      Self::All,
      Self::State(BookingState::Open),
      Self::State(BookingState::InProgress),
      Self::State(BookingState::Ended),
    ]
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::All => Self::ALL_LABEL,
      Self::State(state) => state.label(),
    }
  }

  /// Position of this category in [`Category::tabs`].
  pub fn index(self) -> usize {
    Self::tabs()
      .iter()
      .position(|c| *c == self)
      .unwrap_or_default()
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

// ─── Date range ──────────────────────────────────────────────────────────────

/// An inclusive calendar-date range. Both bounds are always present and
/// `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
  start: NaiveDate,
  end:   NaiveDate,
}

impl DateRange {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if start > end {
      return Err(Error::InvalidRange(format!("{start} is after {end}")));
    }
    Ok(Self { start, end })
  }

  /// Build a range from two optional bounds, as a date-picker delivers them.
  ///
  /// Both present gives a range, both absent gives `None`. A single bound is
  /// rejected rather than widened.
  pub fn from_bounds(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
  ) -> Result<Option<Self>> {
    match (start, end) {
      (Some(start), Some(end)) => Self::new(start, end).map(Some),
      (None, None) => Ok(None),
      (Some(_), None) => Err(Error::InvalidRange("missing end date".into())),
      (None, Some(_)) => Err(Error::InvalidRange("missing start date".into())),
    }
  }

  /// Parse `START..END`, `START~END` or `START END`. Blank input means
  /// "no range".
  pub fn parse(input: &str) -> Result<Option<Self>> {
    let input = input.trim();
    if input.is_empty() {
      return Ok(None);
    }

    let (start, end) = input
      .split_once("..")
      .or_else(|| input.split_once('~'))
      .or_else(|| input.split_once(char::is_whitespace))
      .ok_or_else(|| Error::InvalidRange(format!("expected START..END, got {input:?}")))?;

    let bound = |raw: &str| -> Result<Option<NaiveDate>> {
      let raw = raw.trim();
      if raw.is_empty() {
        return Ok(None);
      }
      parse_date(raw)
        .map(Some)
        .map_err(|_| Error::InvalidRange(format!("unreadable date {raw:?}")))
    };

    Self::from_bounds(bound(start)?, bound(end)?)
  }

  pub fn start(&self) -> NaiveDate { self.start }

  pub fn end(&self) -> NaiveDate { self.end }

  pub fn contains(&self, date: NaiveDate) -> bool { self.start <= date && date <= self.end }
}

impl fmt::Display for DateRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}", self.start, self.end)
  }
}

// ─── FacetState ──────────────────────────────────────────────────────────────

/// The current combination of filter inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacetState {
  pub category:    Category,
  /// Case-sensitive substring; empty means "no constraint".
  pub search_text: String,
  pub date_range:  Option<DateRange>,
}

impl FacetState {
  /// True when no facet constrains the list.
  pub fn is_neutral(&self) -> bool {
    self.category == Category::All
      && self.search_text.is_empty()
      && self.date_range.is_none()
  }
}

// ─── FacetStore ──────────────────────────────────────────────────────────────

/// Holds the source dataset and the current facet values for one screen.
#[derive(Debug, Clone, Default)]
pub struct FacetStore {
  dataset: Option<Dataset>,
  facets:  FacetState,
}

impl FacetStore {
  pub fn new() -> Self { Self::default() }

  /// `None` until the first successful load.
  pub fn dataset(&self) -> Option<&Dataset> { self.dataset.as_ref() }

  pub fn set_dataset(&mut self, dataset: Dataset) { self.dataset = Some(dataset); }

  pub fn facets(&self) -> &FacetState { &self.facets }

  pub fn set_facets(&mut self, facets: FacetState) { self.facets = facets; }

  pub fn category(&self) -> Category { self.facets.category }

  pub fn set_category(&mut self, category: Category) { self.facets.category = category; }

  pub fn search_text(&self) -> &str { &self.facets.search_text }

  pub fn set_search_text(&mut self, text: impl Into<String>) {
    self.facets.search_text = text.into();
  }

  pub fn date_range(&self) -> Option<DateRange> { self.facets.date_range }

  pub fn set_date_range(&mut self, range: Option<DateRange>) { self.facets.date_range = range; }

  /// Set the range from raw picker bounds. A partial or inverted range is
  /// rejected and the stored range is left as it was.
  pub fn set_date_bounds(
    &mut self,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
  ) -> Result<()> {
    let range = DateRange::from_bounds(start, end)?;
    self.facets.date_range = range;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn category_labels_follow_states() {
    assert_eq!(Category::All.label(), "全部場次");
    assert_eq!(
      Category::State(BookingState::Ended).label(),
      BookingState::Ended.label()
    );
  }

  #[test]
  fn category_tab_indices_match_tab_order() {
    for (i, tab) in Category::tabs().into_iter().enumerate() {
      assert_eq!(tab.index(), i);
    }
  }

  #[test]
  fn range_rejects_inverted_bounds() {
    assert!(matches!(
      DateRange::new(day(2024, 2, 2), day(2024, 2, 1)),
      Err(Error::InvalidRange(_))
    ));
    assert!(DateRange::new(day(2024, 2, 1), day(2024, 2, 1)).is_ok());
  }

  #[test]
  fn range_from_bounds_rejects_partial() {
    assert!(matches!(
      DateRange::from_bounds(Some(day(2024, 1, 1)), None),
      Err(Error::InvalidRange(_))
    ));
    assert!(matches!(
      DateRange::from_bounds(None, Some(day(2024, 1, 1))),
      Err(Error::InvalidRange(_))
    ));
    assert_eq!(DateRange::from_bounds(None, None).unwrap(), None);
  }

  #[test]
  fn range_parse_accepts_separators() {
    let expected = DateRange::new(day(2024, 1, 1), day(2024, 2, 28)).unwrap();
    for input in [
      "2024-01-01..2024-02-28",
      "2024-01-01~2024-02-28",
      "2024-01-01 2024-02-28",
      " 2024/01/01 .. 2024/02/28 ",
    ] {
      assert_eq!(DateRange::parse(input).unwrap(), Some(expected), "{input}");
    }
    assert_eq!(DateRange::parse("   ").unwrap(), None);
  }

  #[test]
  fn range_parse_rejects_partial_and_garbage() {
    for input in ["2024-01-01..", "..2024-01-01", "2024-01-01", "soon..later"] {
      assert!(
        matches!(DateRange::parse(input), Err(Error::InvalidRange(_))),
        "{input}"
      );
    }
  }

  #[test]
  fn range_contains_is_inclusive() {
    let r = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
    assert!(r.contains(day(2024, 1, 1)));
    assert!(r.contains(day(2024, 1, 31)));
    assert!(!r.contains(day(2023, 12, 31)));
    assert!(!r.contains(day(2024, 2, 1)));
  }

  #[test]
  fn partial_bounds_leave_store_untouched() {
    let mut store = FacetStore::new();
    let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
    store.set_date_range(Some(range));

    assert!(store.set_date_bounds(Some(day(2024, 3, 1)), None).is_err());
    assert_eq!(store.date_range(), Some(range));

    store.set_date_bounds(None, None).unwrap();
    assert_eq!(store.date_range(), None);
  }

  #[test]
  fn store_setters_are_plain_assignments() {
    let mut store = FacetStore::new();
    assert!(store.facets().is_neutral());
    assert!(store.dataset().is_none());

    store.set_category(Category::State(BookingState::Open));
    store.set_search_text("B0");
    assert_eq!(store.category(), Category::State(BookingState::Open));
    assert_eq!(store.search_text(), "B0");
    assert!(!store.facets().is_neutral());

    store.set_dataset(Dataset::default());
    assert!(store.dataset().is_some_and(Dataset::is_empty));
  }
}
