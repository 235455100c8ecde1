//! Combined predicate over a booking.
//!
//! All three facets are folded into one value that is built once per
//! recomputation from a full [`FacetState`]. There is no per-facet filtering
//! pass, so no facet can be evaluated against a stale copy of another.

use chrono::NaiveDate;

use crate::{
  booking::Booking,
  facet::{Category, DateRange, FacetState},
};

/// A snapshot of every facet constraint, ANDed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
  category: Category,
  range:    Option<DateRange>,
  needle:   Option<String>,
}

/// Build the combined predicate for `facets`.
pub fn build_predicate(facets: &FacetState) -> Predicate {
  Predicate {
    category: facets.category,
    range:    facets.date_range,
    needle:   (!facets.search_text.is_empty()).then(|| facets.search_text.clone()),
  }
}

impl Predicate {
  pub fn matches(&self, booking: &Booking) -> bool {
    self.matches_category(booking)
      && self.matches_date(booking.date)
      && self.matches_search(booking)
  }

  /// Same predicate with the category constraint replaced. Used to count
  /// what each category tab would show under the other facets.
  pub fn with_category(&self, category: Category) -> Self {
    Self {
      category,
      ..self.clone()
    }
  }

  fn matches_category(&self, booking: &Booking) -> bool {
    match self.category {
      Category::All => true,
      Category::State(state) => booking.state == state,
    }
  }

  fn matches_date(&self, date: NaiveDate) -> bool {
    self.range.is_none_or(|range| range.contains(date))
  }

  // Case-sensitive, any one field suffices.
  fn matches_search(&self, booking: &Booking) -> bool {
    let Some(needle) = self.needle.as_deref() else {
      return true;
    };
    booking.book_id.contains(needle)
      || booking.place_name.contains(needle)
      || booking.team_name.contains(needle)
  }
}
