//! Behavioural tests for the booking filter engine.

use chrono::NaiveDate;

use crate::{
  Error,
  booking::{Booking, BookingState, Dataset},
  derive::{BookingView, LoadOutcome, Phase, derive},
  facet::{Category, DateRange, FacetState},
  source::{StaticSource, refresh},
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn booking(id: &str, state: BookingState, date: NaiveDate) -> Booking {
  Booking {
    book_id:    id.into(),
    place_name: "Riverside Court".into(),
    team_name:  "Night Owls".into(),
    date,
    time:       "19:00-21:00".into(),
    state,
    capacity:   12,
    occupancy:  6,
  }
}

/// The two-record dataset used by the reference scenarios.
fn scenario_dataset() -> Dataset {
  Dataset::new(vec![
    booking("B001", BookingState::Open, day(2024, 1, 10)),
    booking("B002", BookingState::Ended, day(2024, 2, 1)),
  ])
  .unwrap()
}

fn ids(dataset: &Dataset, facets: &FacetState) -> Vec<String> {
  derive(dataset, facets)
    .ids()
    .into_iter()
    .map(str::to_owned)
    .collect()
}

// ─── Reference scenarios ─────────────────────────────────────────────────────

#[test]
fn neutral_facets_show_everything_in_order() {
  assert_eq!(ids(&scenario_dataset(), &FacetState::default()), ["B001", "B002"]);
}

#[test]
fn category_selects_matching_state() {
  let f = FacetState {
    category: Category::State(BookingState::Open),
    ..FacetState::default()
  };
  assert_eq!(ids(&scenario_dataset(), &f), ["B001"]);
}

#[test]
fn single_day_range_includes_its_boundary() {
  let f = FacetState {
    date_range: Some(DateRange::new(day(2024, 2, 1), day(2024, 2, 1)).unwrap()),
    ..FacetState::default()
  };
  assert_eq!(ids(&scenario_dataset(), &f), ["B002"]);
}

#[test]
fn search_prefix_matches_both() {
  let f = FacetState {
    search_text: "B00".into(),
    ..FacetState::default()
  };
  assert_eq!(ids(&scenario_dataset(), &f), ["B001", "B002"]);
}

#[test]
fn combined_facets_narrow_to_one() {
  let f = FacetState {
    category:    Category::State(BookingState::Ended),
    search_text: "B0".into(),
    date_range:  Some(DateRange::new(day(2024, 1, 1), day(2024, 2, 28)).unwrap()),
  };
  assert_eq!(ids(&scenario_dataset(), &f), ["B002"]);
}

#[test]
fn empty_dataset_yields_empty_subset() {
  let empty = Dataset::new(Vec::new()).unwrap();
  let f = FacetState {
    category:    Category::State(BookingState::InProgress),
    search_text: "x".into(),
    date_range:  Some(DateRange::new(day(2024, 1, 1), day(2024, 1, 2)).unwrap()),
  };
  assert!(derive(&empty, &FacetState::default()).is_empty());
  assert!(derive(&empty, &f).is_empty());
}

// ─── Engine behaviour ────────────────────────────────────────────────────────

#[test]
fn no_dataset_is_distinct_from_empty_dataset() {
  let mut view = BookingView::new();
  assert_eq!(view.phase(), &Phase::Uninitialized);
  assert!(view.visible().is_none());

  view.set_search_text("B0");
  assert!(view.visible().is_none());

  view.load_dataset(Dataset::default());
  assert_eq!(view.phase(), &Phase::Ready);
  assert!(view.visible().is_some_and(|v| v.is_empty()));
}

#[test]
fn facet_order_does_not_change_the_result() {
  let ds = scenario_dataset();
  let range = DateRange::new(day(2024, 1, 1), day(2024, 2, 28)).unwrap();

  let mut a = BookingView::new();
  a.load_dataset(ds.clone());
  a.select_category(Category::State(BookingState::Ended));
  a.set_search_text("B0");
  a.submit_date_range(Some(range.start()), Some(range.end())).unwrap();

  let mut b = BookingView::new();
  b.load_dataset(ds.clone());
  b.submit_date_range(Some(range.start()), Some(range.end())).unwrap();
  b.select_category(Category::State(BookingState::Ended));
  b.set_search_text("B0");

  assert_eq!(a.facets(), b.facets());
  assert_eq!(a.visible(), b.visible());
  assert_eq!(a.visible().unwrap().ids(), ["B002"]);
}

#[test]
fn rapid_changes_reflect_the_last_value_of_every_facet() {
  let mut view = BookingView::new();
  view.load_dataset(scenario_dataset());

  view.select_category(Category::State(BookingState::Open));
  view.set_search_text("B");
  view.set_search_text("B00");
  view.select_category(Category::State(BookingState::Ended));
  view.set_search_text("B002");

  assert_eq!(view.visible().unwrap().ids(), ["B002"]);

  // Clearing search keeps the category constraint.
  view.set_search_text("");
  assert_eq!(view.visible().unwrap().ids(), ["B002"]);
  view.select_category(Category::All);
  assert_eq!(view.visible().unwrap().ids(), ["B001", "B002"]);
}

#[test]
fn date_submit_keeps_category_and_search() {
  let mut view = BookingView::new();
  view.load_dataset(scenario_dataset());
  view.select_category(Category::State(BookingState::Open));
  view.set_search_text("B00");

  view.submit_date_range_text("2024-01-01..2024-12-31").unwrap();
  assert_eq!(view.visible().unwrap().ids(), ["B001"]);

  // And a later search change keeps the date range.
  view.select_category(Category::All);
  view.submit_date_range_text("2024-02-01..2024-02-29").unwrap();
  view.set_search_text("B0");
  assert_eq!(view.visible().unwrap().ids(), ["B002"]);
}

#[test]
fn rejected_range_leaves_facets_and_subset_untouched() {
  let mut view = BookingView::new();
  view.load_dataset(scenario_dataset());
  view.submit_date_range_text("2024-02-01..2024-02-01").unwrap();
  let before = view.visible().cloned();
  let facets = view.facets().clone();

  assert!(matches!(
    view.submit_date_range(Some(day(2024, 1, 1)), None),
    Err(Error::InvalidRange(_))
  ));
  assert!(matches!(
    view.submit_date_range_text("2024-03-01.."),
    Err(Error::InvalidRange(_))
  ));
  assert!(matches!(
    view.submit_date_range_text("2024-03-01..2024-01-01"),
    Err(Error::InvalidRange(_))
  ));

  assert_eq!(view.facets(), &facets);
  assert_eq!(view.visible().cloned(), before);
}

#[test]
fn on_facet_change_replaces_all_facets() {
  let mut view = BookingView::new();
  view.load_dataset(scenario_dataset());
  view.set_search_text("nothing");
  assert!(view.visible().unwrap().is_empty());

  let visible = view
    .on_facet_change(FacetState {
      category: Category::State(BookingState::Open),
      ..FacetState::default()
    })
    .unwrap();
  assert_eq!(visible.ids(), ["B001"]);
  assert_eq!(view.facets().search_text, "");
}

#[test]
fn setters_match_a_whole_state_change() {
  let mut by_setters = BookingView::new();
  by_setters.load_dataset(scenario_dataset());
  by_setters.select_category(Category::State(BookingState::Open));
  by_setters.set_search_text("B00");
  by_setters
    .submit_date_range(Some(day(2024, 1, 10)), Some(day(2024, 1, 10)))
    .unwrap();

  let mut by_state = BookingView::new();
  by_state.load_dataset(scenario_dataset());
  by_state.on_facet_change(FacetState {
    category:    Category::State(BookingState::Open),
    search_text: "B00".into(),
    date_range:  Some(DateRange::new(day(2024, 1, 10), day(2024, 1, 10)).unwrap()),
  });

  assert_eq!(by_setters.facets(), by_state.facets());
  assert_eq!(by_setters.visible(), by_state.visible());
  assert_eq!(by_setters.visible().unwrap().ids(), ["B001"]);
}

#[test]
fn clear_date_range_keeps_other_facets() {
  let mut view = BookingView::new();
  view.load_dataset(scenario_dataset());
  view.set_search_text("B00");
  view.submit_date_range_text("2024-02-01..2024-02-01").unwrap();
  assert_eq!(view.visible().unwrap().ids(), ["B002"]);

  view.clear_date_range();
  assert_eq!(view.facets().date_range, None);
  assert_eq!(view.facets().search_text, "B00");
  assert_eq!(view.visible().unwrap().ids(), ["B001", "B002"]);
}

#[test]
fn clear_facets_restores_full_list() {
  let mut view = BookingView::new();
  view.load_dataset(scenario_dataset());
  view.select_category(Category::State(BookingState::InProgress));
  view.submit_date_range_text("2024-01-01..2024-01-02").unwrap();
  assert!(view.visible().unwrap().is_empty());

  view.clear_facets();
  assert!(view.facets().is_neutral());
  assert_eq!(view.visible().unwrap().len(), 2);
}

#[test]
fn facets_survive_a_reload() {
  let mut view = BookingView::new();
  view.load_dataset(scenario_dataset());
  view.select_category(Category::State(BookingState::Ended));

  let ticket = view.begin_load();
  let reloaded = vec![
    booking("B003", BookingState::Ended, day(2024, 3, 1)),
    booking("B004", BookingState::Open, day(2024, 3, 2)),
  ];
  assert_eq!(view.finish_load::<Error>(ticket, Ok(reloaded)), LoadOutcome::Ready);
  assert_eq!(view.visible().unwrap().ids(), ["B003"]);
}

#[test]
fn category_counts_respect_other_facets() {
  let mut view = BookingView::new();
  assert!(view.category_counts().is_none());

  view.load_dataset(scenario_dataset());
  view.select_category(Category::State(BookingState::Open));
  let counts = view.category_counts().unwrap();
  assert_eq!(counts[0], (Category::All, 2));
  assert_eq!(counts[1], (Category::State(BookingState::Open), 1));
  assert_eq!(counts[2], (Category::State(BookingState::InProgress), 0));
  assert_eq!(counts[3], (Category::State(BookingState::Ended), 1));

  view.submit_date_range_text("2024-01-01..2024-01-31").unwrap();
  let counts = view.category_counts().unwrap();
  assert_eq!(counts[0].1, 1);
  assert_eq!(counts[3].1, 0);
}

// ─── Load lifecycle ──────────────────────────────────────────────────────────

#[test]
fn stale_fetch_is_discarded() {
  let mut view = BookingView::new();
  let first = view.begin_load();
  let second = view.begin_load();

  let newer = vec![booking("NEW1", BookingState::Open, day(2024, 5, 1))];
  let older = vec![booking("OLD1", BookingState::Open, day(2024, 4, 1))];

  assert_eq!(view.finish_load::<Error>(second, Ok(newer)), LoadOutcome::Ready);
  assert_eq!(view.finish_load::<Error>(first, Ok(older)), LoadOutcome::Stale);
  assert_eq!(view.visible().unwrap().ids(), ["NEW1"]);
}

#[test]
fn older_fetch_resolving_first_is_still_discarded() {
  let mut view = BookingView::new();
  let first = view.begin_load();
  let second = view.begin_load();

  let older = vec![booking("OLD1", BookingState::Open, day(2024, 4, 1))];
  assert_eq!(view.finish_load::<Error>(first, Ok(older)), LoadOutcome::Stale);
  assert_eq!(view.phase(), &Phase::Loading);
  assert!(view.visible().is_none());

  let newer = vec![booking("NEW1", BookingState::Open, day(2024, 5, 1))];
  assert_eq!(view.finish_load::<Error>(second, Ok(newer)), LoadOutcome::Ready);
  assert_eq!(view.visible().unwrap().ids(), ["NEW1"]);
}

#[test]
fn failed_fetch_keeps_previous_subset() {
  let mut view = BookingView::new();
  view.load_dataset(scenario_dataset());
  view.select_category(Category::State(BookingState::Open));

  let ticket = view.begin_load();
  let outcome = view.finish_load(ticket, Err::<Vec<Booking>, _>("connection refused"));
  assert_eq!(outcome, LoadOutcome::Failed);
  assert!(matches!(view.phase(), Phase::Failed { message } if message.contains("refused")));
  assert_eq!(view.visible().unwrap().ids(), ["B001"]);
}

#[test]
fn invalid_payload_fails_the_load() {
  let mut view = BookingView::new();
  let ticket = view.begin_load();
  let dupes = vec![
    booking("B001", BookingState::Open, day(2024, 1, 1)),
    booking("B001", BookingState::Ended, day(2024, 1, 2)),
  ];
  assert_eq!(view.finish_load::<Error>(ticket, Ok(dupes)), LoadOutcome::Failed);
  assert!(view.visible().is_none());
}

#[test]
fn late_result_after_direct_load_is_stale() {
  let mut view = BookingView::new();
  let ticket = view.begin_load();
  view.load_dataset(scenario_dataset());
  assert_eq!(
    view.finish_load::<Error>(ticket, Ok(Vec::new())),
    LoadOutcome::Stale
  );
  assert_eq!(view.visible().unwrap().len(), 2);
}

#[tokio::test]
async fn refresh_from_static_source() {
  let raw = r#"[
    {"book_id":"B001","place_name":"Riverside Court","team_name":"Night Owls",
     "date":"2024-01-10","time":"19:00","state":"報名中",
     "total_of_member":12,"amount_of_member":3},
    {"book_id":"B002","place_name":"Harbour Gym","team_name":"Night Owls",
     "date":"2024-02-01T20:00:00","time":"20:00","state":"已結束",
     "total_of_member":8,"amount_of_member":8}
  ]"#;
  let source = StaticSource::from_json(raw).unwrap();
  let mut view = BookingView::new();

  assert_eq!(refresh(&mut view, &source).await, LoadOutcome::Ready);
  view.submit_date_range_text("2024-02-01..2024-02-01").unwrap();
  assert_eq!(view.visible().unwrap().ids(), ["B002"]);
}

#[test]
fn static_source_rejects_invalid_json() {
  assert!(matches!(
    StaticSource::from_json("{not json"),
    Err(Error::Serialization(_))
  ));
}
