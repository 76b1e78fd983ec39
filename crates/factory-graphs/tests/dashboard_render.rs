//! End-to-end rendering of the dashboard into a temporary directory.

use factory_common::test_utils::record_fixtures::{days_with_accident, sample_days};
use factory_common::test_utils::{create_temp_dir, init_test_logging};
use factory_common::{Granularity, Record, Theme, ViewState};
use factory_config::{AggregationSettings, GraphConfig};
use factory_graphs::{CachedAggregator, ChartId, DashboardModel, DashboardRenderer};
use std::fs;

fn renderer() -> DashboardRenderer {
    DashboardRenderer::new("Factory Production Dashboard", GraphConfig::default())
}

#[tokio::test]
async fn renders_every_chart_and_the_index() {
    init_test_logging();
    let dir = create_temp_dir();
    let records = days_with_accident(90, 40);
    let model = DashboardModel::build(
        &records,
        ViewState::new(Granularity::Weekly, Theme::Light),
        &AggregationSettings::default(),
    )
    .unwrap();

    let output = renderer().render(&model, dir.path()).await.unwrap();

    assert_eq!(output.charts.len(), ChartId::ALL.len());
    assert!(output.skipped.is_empty());
    for id in ChartId::ALL {
        let svg = fs::read_to_string(dir.path().join(id.file_name())).unwrap();
        assert!(svg.contains("<svg"), "{id} is not an SVG document");
    }

    let html = fs::read_to_string(&output.index).unwrap();
    assert!(html.contains("Weekly view, 90 days"));
    assert!(html.contains(r#"<img src="completed_vs_rejected.svg""#));
}

#[tokio::test]
async fn dark_theme_changes_the_background() {
    let dir = create_temp_dir();
    let records = sample_days(20);
    let cache = CachedAggregator::new(records.into());
    let settings = AggregationSettings::default();

    let light = ViewState::default();
    let dark = light.toggle_theme();
    for view in [light, dark] {
        let model = DashboardModel::from_cache(&cache, view, &settings).unwrap();
        renderer()
            .render(&model, &dir.path().join(view.to_string()))
            .await
            .unwrap();
    }

    let light_svg = fs::read_to_string(dir.path().join("daily-light/production.svg")).unwrap();
    let dark_svg = fs::read_to_string(dir.path().join("daily-dark/production.svg")).unwrap();
    assert!(dark_svg.contains("#343A40") || dark_svg.contains("#343a40"));
    assert_ne!(light_svg, dark_svg);
    assert_eq!(cache.computations(), 1);
}

#[tokio::test]
async fn rejects_chart_skipped_when_every_day_is_an_accident() {
    let dir = create_temp_dir();
    let records: Vec<Record> = (1..=10)
        .map(|run| {
            let mut record = Record::accident(run);
            record.occupancy = [Some(50.0); 6];
            record
        })
        .collect();
    let model =
        DashboardModel::build(&records, ViewState::default(), &AggregationSettings::default())
            .unwrap();

    let output = renderer().render(&model, dir.path()).await.unwrap();

    assert_eq!(output.skipped, vec![ChartId::Rejects]);
    assert!(!dir.path().join("rejects.svg").exists());
    let html = fs::read_to_string(&output.index).unwrap();
    assert!(!html.contains("rejects.svg"));
    assert!(html.contains("Accident days"));
}
