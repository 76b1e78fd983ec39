//! Chart specifications built from aggregated data

use crate::aggregator::Bucket;
use crate::intervals::RejectionInterval;
use crate::scale::{zero_based_domain, AXIS_TICKS};
use crate::theme::Palette;
use crate::types::{ChartId, ChartSpec, DataPoint, DataSet};
use crate::workstation::WorkstationStats;
use factory_common::{format_percent, Granularity};

/// Axis label of one bucket at `granularity`
pub fn period_label(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Daily => "Day",
        Granularity::Weekly => "Week",
        Granularity::Monthly => "Month",
    }
}

fn run_domain(buckets: &[Bucket]) -> (f64, f64) {
    let first = buckets.first().map_or(1.0, |b| f64::from(b.run));
    let last = buckets.last().map_or(1.0, |b| f64::from(b.run));
    if first < last {
        (first, last)
    } else {
        (first - 0.5, last + 0.5)
    }
}

fn bucket_series(
    name: &str,
    buckets: &[Bucket],
    color: &str,
    value: impl Fn(&Bucket) -> Option<f64>,
) -> DataSet {
    DataSet {
        name: name.to_string(),
        data: buckets
            .iter()
            .map(|b| DataPoint::new(f64::from(b.run), value(b)))
            .collect(),
        color: color.to_string(),
    }
}

fn line_chart(
    id: ChartId,
    title: &str,
    granularity: Granularity,
    y_label: &str,
    buckets: &[Bucket],
    datasets: Vec<DataSet>,
) -> ChartSpec {
    let y_domain = zero_based_domain(datasets.iter().flat_map(DataSet::values), AXIS_TICKS);
    ChartSpec {
        id,
        title: format!("{title} ({})", granularity.label()),
        x_label: period_label(granularity).to_string(),
        y_label: y_label.to_string(),
        datasets,
        categories: Vec::new(),
        x_domain: run_domain(buckets),
        y_domain,
    }
}

/// Completed units per bucket
pub fn production_chart(
    buckets: &[Bucket],
    granularity: Granularity,
    palette: &Palette,
) -> ChartSpec {
    let completed = bucket_series("Completed", buckets, &palette.line, |b| b.total_completed);
    line_chart(
        ChartId::Production,
        "Completed Products Over Time",
        granularity,
        "Total products",
        buckets,
        vec![completed],
    )
}

/// Completed and rejected units per bucket
pub fn completed_vs_rejected_chart(
    buckets: &[Bucket],
    granularity: Granularity,
    palette: &Palette,
) -> ChartSpec {
    let datasets = vec![
        bucket_series("Completed", buckets, &palette.line, |b| b.total_completed),
        bucket_series("Rejected", buckets, &palette.secondary, Bucket::rejected),
    ];
    line_chart(
        ChartId::CompletedVsRejected,
        "Completed vs Rejected",
        granularity,
        "Units",
        buckets,
        datasets,
    )
}

fn workstation_bar_chart(
    id: ChartId,
    title: &str,
    y_label: &str,
    stats: &[WorkstationStats],
    color: &str,
    value: impl Fn(&WorkstationStats) -> Option<f64>,
    label: impl Fn(f64) -> String,
) -> ChartSpec {
    let data: Vec<DataPoint> = stats
        .iter()
        .zip(0u32..)
        .map(|(s, i)| {
            let y = value(s);
            let point = DataPoint::new(f64::from(i), y);
            match y {
                Some(v) => point.with_label(label(v)),
                None => point,
            }
        })
        .collect();
    let dataset = DataSet {
        name: title.to_string(),
        data,
        color: color.to_string(),
    };

    ChartSpec {
        id,
        title: title.to_string(),
        x_label: "Workstations".to_string(),
        y_label: y_label.to_string(),
        y_domain: zero_based_domain(dataset.values(), AXIS_TICKS),
        x_domain: (0.0, stats.len() as f64),
        categories: stats.iter().map(|s| s.id.to_string()).collect(),
        datasets: vec![dataset],
    }
}

/// Mean occupancy per workstation
pub fn occupancy_chart(stats: &[WorkstationStats], palette: &Palette) -> ChartSpec {
    workstation_bar_chart(
        ChartId::Occupancy,
        "Occupancy per Workstation",
        "Occupancy (%)",
        stats,
        &palette.bar,
        |s| s.mean_occupancy,
        format_percent,
    )
}

/// Mean downtime per workstation
pub fn downtime_chart(stats: &[WorkstationStats], palette: &Palette) -> ChartSpec {
    workstation_bar_chart(
        ChartId::Downtime,
        "Downtime per Workstation",
        "Downtime per day",
        stats,
        &palette.bar,
        |s| s.mean_downtime,
        |v| format!("{v:.1}"),
    )
}

/// Busy share of busy plus down time per workstation
pub fn efficiency_chart(stats: &[WorkstationStats], palette: &Palette) -> ChartSpec {
    workstation_bar_chart(
        ChartId::Efficiency,
        "Workstation Efficiency",
        "Efficiency (%)",
        stats,
        &palette.bar,
        |s| Some(s.efficiency * 100.0),
        format_percent,
    )
}

/// Busy time per completed unit per workstation
pub fn production_time_chart(stats: &[WorkstationStats], palette: &Palette) -> ChartSpec {
    workstation_bar_chart(
        ChartId::ProductionTime,
        "Average Production Time per Workstation",
        "Time per Product (minutes)",
        stats,
        &palette.production_time,
        |s| Some(s.production_time_per_unit),
        |v| format!("{v:.2}"),
    )
}

/// Rejects per run interval, labelled with the mean faulty rate
pub fn rejects_chart(intervals: &[RejectionInterval], width: u32, palette: &Palette) -> ChartSpec {
    let data: Vec<DataPoint> = intervals
        .iter()
        .zip(0u32..)
        .map(|(interval, i)| {
            let point = DataPoint::new(f64::from(i), Some(interval.total_rejected));
            match interval.mean_faulty_rate {
                Some(rate) => point.with_label(format_percent(rate)),
                None => point,
            }
        })
        .collect();
    let dataset = DataSet {
        name: "Rejects".to_string(),
        data,
        color: palette.reject.clone(),
    };

    // Headroom above the tallest bar for its label
    let y_domain = zero_based_domain(dataset.values().map(|v| v * 1.1), AXIS_TICKS);

    ChartSpec {
        id: ChartId::Rejects,
        title: "Production Rejects".to_string(),
        x_label: format!("Production Run Interval ({width} units)"),
        y_label: "Number of Rejects".to_string(),
        x_domain: (0.0, intervals.len() as f64),
        y_domain,
        categories: intervals.iter().map(RejectionInterval::label).collect(),
        datasets: vec![dataset],
    }
}
