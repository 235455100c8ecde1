//! Derivation engine: the visible booking list as a pure function of the
//! dataset and the facet state.
//!
//! [`derive`] is the only producer of a [`VisibleSubset`]. [`BookingView`]
//! wraps it with the per-screen state: the facet store, the load lifecycle,
//! and the fetch ticket that keeps an older response from replacing a newer
//! one.

use std::fmt;

use crate::{
  Result,
  booking::{Booking, Dataset},
  facet::{Category, DateRange, FacetState, FacetStore},
  predicate::build_predicate,
};

// ─── VisibleSubset ───────────────────────────────────────────────────────────

/// The ordered bookings that satisfy a [`FacetState`].
///
/// Stored as positions into the dataset it was derived from, so it can only
/// ever contain records of that dataset, in that dataset's order.
#[derive(Debug, Clone)]
pub struct VisibleSubset {
  dataset: Dataset,
  indices: Vec<usize>,
}

impl VisibleSubset {
  pub fn len(&self) -> usize { self.indices.len() }

  pub fn is_empty(&self) -> bool { self.indices.is_empty() }

  pub fn get(&self, n: usize) -> Option<&Booking> {
    self
      .indices
      .get(n)
      .and_then(|&i| self.dataset.as_slice().get(i))
  }

  pub fn iter(&self) -> impl Iterator<Item = &Booking> + '_ {
    let records = self.dataset.as_slice();
    self.indices.iter().map(move |&i| &records[i])
  }

  /// Positions of the visible records within the dataset they came from.
  pub fn positions(&self) -> &[usize] { &self.indices }

  pub fn ids(&self) -> Vec<&str> { self.iter().map(|b| b.book_id.as_str()).collect() }
}

impl PartialEq for VisibleSubset {
  fn eq(&self, other: &Self) -> bool { self.iter().eq(other.iter()) }
}

impl Eq for VisibleSubset {}

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Filter the full `dataset` by the combined predicate for `facets`,
/// preserving dataset order.
pub fn derive(dataset: &Dataset, facets: &FacetState) -> VisibleSubset {
  let predicate = build_predicate(facets);
  let indices = dataset
    .iter()
    .enumerate()
    .filter(|(_, booking)| predicate.matches(booking))
    .map(|(i, _)| i)
    .collect();
  VisibleSubset {
    dataset: dataset.clone(),
    indices,
  }
}

/// How many bookings each category tab would show with the current search
/// text and date range.
pub fn category_counts(dataset: &Dataset, facets: &FacetState) -> [(Category, usize); 4] {
  let predicate = build_predicate(facets);
  Category::tabs().map(|category| {
    let p = predicate.with_category(category);
    (category, dataset.iter().filter(|b| p.matches(b)).count())
  })
}

// ─── Load lifecycle ──────────────────────────────────────────────────────────

/// Identifies one dataset fetch. Only the most recently issued ticket is
/// allowed to complete a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl fmt::Display for FetchTicket {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
  #[default]
  Uninitialized,
  Loading,
  Ready,
  /// The latest fetch failed. Any previously loaded dataset is still shown.
  Failed { message: String },
}

/// What [`BookingView::finish_load`] did with a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
  Ready,
  Failed,
  /// A newer fetch was started after this one; the result was dropped.
  Stale,
}

// ─── BookingView ─────────────────────────────────────────────────────────────

/// Per-screen derivation engine for the booking list.
///
/// Every facet mutation and every dataset replacement ends in the same
/// `recompute`, which reads all current facet values and filters the full
/// dataset. The visible subset is never patched in place.
#[derive(Debug, Default)]
pub struct BookingView {
  store:   FacetStore,
  visible: Option<VisibleSubset>,
  phase:   Phase,
  issued:  u64,
}

impl BookingView {
  pub fn new() -> Self { Self::default() }

  pub fn phase(&self) -> &Phase { &self.phase }

  pub fn store(&self) -> &FacetStore { &self.store }

  pub fn facets(&self) -> &FacetState { self.store.facets() }

  /// The current visible subset, or `None` while no dataset has been loaded.
  /// An empty subset is a valid, loaded state.
  pub fn visible(&self) -> Option<&VisibleSubset> { self.visible.as_ref() }

  // ── Dataset ───────────────────────────────────────────────────────────

  /// Start a fetch. Any fetch still in flight becomes stale.
  pub fn begin_load(&mut self) -> FetchTicket {
    self.issued += 1;
    self.phase = Phase::Loading;
    tracing::debug!(ticket = self.issued, "booking fetch started");
    FetchTicket(self.issued)
  }

  /// Apply the result of the fetch identified by `ticket`.
  pub fn finish_load<E: fmt::Display>(
    &mut self,
    ticket: FetchTicket,
    result: std::result::Result<Vec<Booking>, E>,
  ) -> LoadOutcome {
    if ticket.0 != self.issued || self.phase != Phase::Loading {
      tracing::warn!(%ticket, latest = self.issued, "discarding stale booking fetch");
      return LoadOutcome::Stale;
    }

    match result.map_err(|e| e.to_string()).and_then(|records| {
      Dataset::new(records).map_err(|e| e.to_string())
    }) {
      Ok(dataset) => {
        tracing::info!(%ticket, bookings = dataset.len(), "booking dataset loaded");
        self.replace_dataset(dataset);
        LoadOutcome::Ready
      }
      Err(message) => {
        tracing::error!(%ticket, %message, "booking fetch failed");
        self.phase = Phase::Failed { message };
        LoadOutcome::Failed
      }
    }
  }

  /// Install an already-validated dataset directly (e.g. a bundled sample).
  /// Cancels any fetch in flight.
  pub fn load_dataset(&mut self, dataset: Dataset) {
    self.issued += 1;
    self.replace_dataset(dataset);
  }

  fn replace_dataset(&mut self, dataset: Dataset) {
    self.store.set_dataset(dataset);
    self.phase = Phase::Ready;
    self.recompute();
  }

  // ── Facets ────────────────────────────────────────────────────────────

  /// Replace the whole facet state and return the new visible subset.
  ///
  /// The setters below all build a full [`FacetState`] and land here.
  pub fn on_facet_change(&mut self, facets: FacetState) -> Option<&VisibleSubset> {
    self.store.set_facets(facets);
    self.recompute();
    self.visible()
  }

  pub fn select_category(&mut self, category: Category) {
    let facets = FacetState {
      category,
      ..self.facets().clone()
    };
    self.on_facet_change(facets);
  }

  pub fn set_search_text(&mut self, text: impl Into<String>) {
    let facets = FacetState {
      search_text: text.into(),
      ..self.facets().clone()
    };
    self.on_facet_change(facets);
  }

  /// Commit a date range from picker bounds. A partial or inverted range is
  /// rejected and nothing changes.
  pub fn submit_date_range(
    &mut self,
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
  ) -> Result<()> {
    let date_range = DateRange::from_bounds(start, end)?;
    self.set_date_range(date_range);
    Ok(())
  }

  /// Commit a typed range (see [`DateRange::parse`]). Blank input clears it.
  pub fn submit_date_range_text(&mut self, input: &str) -> Result<()> {
    let date_range = DateRange::parse(input)?;
    self.set_date_range(date_range);
    Ok(())
  }

  pub fn clear_date_range(&mut self) { self.set_date_range(None); }

  fn set_date_range(&mut self, date_range: Option<DateRange>) {
    let facets = FacetState {
      date_range,
      ..self.facets().clone()
    };
    self.on_facet_change(facets);
  }

  /// Reset every facet to its neutral value.
  pub fn clear_facets(&mut self) { self.on_facet_change(FacetState::default()); }

  /// Per-tab counts for the current search text and date range.
  pub fn category_counts(&self) -> Option<[(Category, usize); 4]> {
    self
      .store
      .dataset()
      .map(|dataset| category_counts(dataset, self.store.facets()))
  }

  fn recompute(&mut self) {
    let Some(dataset) = self.store.dataset() else {
      return;
    };
    let subset = derive(dataset, self.store.facets());
    tracing::debug!(
      category = %self.store.category(),
      search = self.store.search_text(),
      range = ?self.store.date_range(),
      visible = subset.len(),
      total = dataset.len(),
      "booking list recomputed"
    );
    self.visible = Some(subset);
  }
}
