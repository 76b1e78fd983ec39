//! Headline report printed by `summary`.

use factory_common::{format_optional, format_percent, Result};
use factory_config::AggregationSettings;
use factory_data::{Dataset, LoadReport};
use factory_graphs::{
    DataAggregator, KpiCalculator, KpiSummary, WorkstationAnalyzer, WorkstationStats,
};
use serde::Serialize;
use std::fmt::Write;

/// KPIs and workstation figures of one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// Where the dataset was read from
    pub source: String,
    /// First and last run of the dataset
    pub runs: (u32, u32),
    /// Rows skipped while loading
    pub skipped_rows: usize,
    /// Optional columns absent from the file
    pub missing_columns: Vec<String>,
    /// Headline figures
    pub kpis: KpiSummary,
    /// Per-workstation figures
    pub workstations: Vec<WorkstationStats>,
}

impl SummaryReport {
    /// Compute the report of `dataset`
    pub fn build(
        source: impl Into<String>,
        dataset: &Dataset,
        report: &LoadReport,
        settings: &AggregationSettings,
    ) -> Result<Self> {
        let records = dataset.records();
        Ok(Self {
            source: source.into(),
            runs: dataset.run_range(),
            skipped_rows: report.row_issues.len(),
            missing_columns: report.missing_optional.clone(),
            kpis: KpiCalculator::new(settings.theoretical_daily_capacity).aggregate(records)?,
            workstations: WorkstationAnalyzer::new(settings.shift_capacity).aggregate(records)?,
        })
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human readable lines
    pub fn to_text(&self) -> String {
        let kpis = &self.kpis;
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "Dataset: {} (runs {}-{})", self.source, self.runs.0, self.runs.1);
        if self.skipped_rows > 0 {
            let _ = writeln!(out, "Skipped rows: {}", self.skipped_rows);
        }
        let _ = writeln!(
            out,
            "Days: {} ({} operational, {} accidents)",
            kpis.days, kpis.operational_days, kpis.accident_days
        );
        let _ = writeln!(out, "Total completed: {:.0}", kpis.total_completed);
        let _ = writeln!(out, "Total rejected: {:.0}", kpis.total_rejected);
        let _ = writeln!(out, "Average daily output: {:.2}", kpis.average_daily_output);
        let _ = writeln!(out, "Rejection rate: {}", format_percent(kpis.rejection_rate));
        let _ = writeln!(out, "Overall efficiency: {}", format_percent(kpis.overall_efficiency));
        match kpis.top_downtime {
            Some(top) => {
                let _ = writeln!(
                    out,
                    "Top downtime: {} ({:.2} per day)",
                    top.workstation, top.mean_downtime
                );
            }
            None => {
                let _ = writeln!(out, "Top downtime: n/a");
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<6}{:>12}{:>12}{:>12}{:>14}",
            "WS", "Occupancy", "Downtime", "Efficiency", "Time/unit"
        );
        for stats in &self.workstations {
            let _ = writeln!(
                out,
                "{:<6}{:>12}{:>12}{:>12}{:>14.2}",
                stats.id.to_string(),
                format_optional(stats.mean_occupancy, 2),
                format_optional(stats.mean_downtime, 2),
                format_percent(stats.efficiency * 100.0),
                stats.production_time_per_unit
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_common::test_utils::record_fixtures::{days_with_accident, sample_week};

    fn report_for(records: Vec<factory_common::Record>) -> SummaryReport {
        let dataset = Dataset::new(records).unwrap();
        SummaryReport::build(
            "fixture.csv",
            &dataset,
            &LoadReport::default(),
            &AggregationSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_week_summary() {
        let report = report_for(sample_week());

        assert_eq!(report.runs, (1, 7));
        assert_eq!(report.kpis.total_completed, 8066.0);
        assert_eq!(report.kpis.total_rejected, 363.0);
        assert_eq!(report.workstations.len(), 6);

        let text = report.to_text();
        assert!(text.starts_with("Dataset: fixture.csv (runs 1-7)"));
        assert!(text.contains("Total completed: 8066"));
        assert!(text.contains("Top downtime: WS5"));
        assert!(!text.contains("Skipped rows"));
    }

    #[test]
    fn test_json_summary() {
        let report = report_for(days_with_accident(10, 4));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["kpis"]["accident_days"], 1);
        assert_eq!(json["kpis"]["days"], 10);
        assert_eq!(json["runs"][1], 10);
        assert_eq!(json["workstations"].as_array().unwrap().len(), 6);
    }
}
