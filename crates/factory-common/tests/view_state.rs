//! Integration tests for the shared domain model.

use factory_common::test_utils::record_fixtures::*;
use factory_common::{Granularity, Record, RejectCount, Theme, ViewState};

#[test]
fn test_view_state_round_trips_through_json() {
    let view = ViewState::new(Granularity::Monthly, Theme::Dark);
    let json = serde_json::to_string(&view).unwrap();
    assert_eq!(json, r#"{"granularity":"monthly","theme":"dark"}"#);

    let parsed: ViewState = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, view);
}

#[test]
fn test_cycling_granularities_never_touches_theme() {
    let start = ViewState::default().toggle_theme();
    for granularity in Granularity::ALL {
        let next = start.with_granularity(granularity);
        assert_eq!(next.theme, Theme::Dark);
        assert_eq!(next.granularity, granularity);
    }
}

#[test]
fn test_records_expose_sentinel_free_rejections() {
    let records = days_with_accident(5, 2);
    let rejected: Vec<Option<f64>> = records.iter().map(Record::rejected).collect();

    assert_eq!(rejected.iter().filter(|r| r.is_none()).count(), 1);
    assert_eq!(records[1].total_rejected, RejectCount::Accident);
}
