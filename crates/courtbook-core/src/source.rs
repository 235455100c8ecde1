//! The `BookingSource` trait and the static JSON source.
//!
//! The trait is implemented by anything that can deliver the full booking
//! collection: the bundled sample here, or the authenticated HTTP client in
//! `courtbook-cli`. The filter engine only ever sees "a list of bookings, or
//! an error".

use std::{future::Future, path::Path};

use crate::{
  Result,
  booking::{Booking, Dataset},
  derive::{BookingView, LoadOutcome},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over wherever the booking list comes from.
///
/// Returns a `Send` future so fetches can be spawned onto a multi-threaded
/// runtime.
pub trait BookingSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the complete booking collection, in display order.
  fn fetch(&self) -> impl Future<Output = Result<Vec<Booking>, Self::Error>> + Send + '_;
}

/// Run one full fetch against `source` and apply it to `view`.
///
/// Convenience for callers that await the fetch inline. Callers that spawn
/// fetches should use [`BookingView::begin_load`] and
/// [`BookingView::finish_load`] directly so overlapping requests resolve to
/// the latest one.
pub async fn refresh<S: BookingSource>(view: &mut BookingView, source: &S) -> LoadOutcome {
  let ticket = view.begin_load();
  let result = source.fetch().await;
  view.finish_load(ticket, result)
}

// ─── StaticSource ────────────────────────────────────────────────────────────

/// Bookings parsed once from JSON text: a bundled sample or a local file.
#[derive(Debug, Clone)]
pub struct StaticSource {
  dataset: Dataset,
}

impl StaticSource {
  pub fn from_json(raw: &str) -> Result<Self> {
    Ok(Self {
      dataset: Dataset::from_json(raw)?,
    })
  }

  /// Read and parse a JSON file of bookings.
  pub fn from_path(path: &Path) -> std::io::Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json(&raw).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
  }

  pub fn dataset(&self) -> &Dataset { &self.dataset }
}

impl BookingSource for StaticSource {
  type Error = std::convert::Infallible;

  fn fetch(&self) -> impl Future<Output = Result<Vec<Booking>, Self::Error>> + Send + '_ {
    std::future::ready(Ok(self.dataset.as_slice().to_vec()))
  }
}
