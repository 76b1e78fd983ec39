//! CSV ingest of the production dataset.
//!
//! Columns are located by header name, so their order does not matter.
//! Required columns must exist; optional ones are read when present. Field
//! values that are blank or not numeric become absent, and the accident
//! marker in `TotalRejected` becomes the accident sentinel.

use crate::columns;
use crate::dataset::Dataset;
use csv::StringRecord;
use factory_common::{parse_metric, DashError, Record, RejectCount, Result, WORKSTATION_COUNT};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A row that could not be placed in the day sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    /// 1-based line number in the file, header included.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

/// What happened while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows seen, skipped ones included.
    pub rows_read: usize,
    /// Rows that were skipped.
    pub row_issues: Vec<RowIssue>,
    /// Optional columns that were absent from the header.
    pub missing_optional: Vec<String>,
}

impl LoadReport {
    /// Rows that made it into the dataset.
    pub fn rows_used(&self) -> usize {
        self.rows_read - self.row_issues.len()
    }
}

/// Resolved column positions.
#[derive(Debug, Clone)]
struct ColumnIndex {
    run: usize,
    total_completed: usize,
    total_rejected: usize,
    faulty_rate: usize,
    total_products: Option<usize>,
    avg_waiting_time: Option<usize>,
    supplier_occupancy: Option<usize>,
    occupancy: [usize; WORKSTATION_COUNT],
    downtime: [usize; WORKSTATION_COUNT],
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<(Self, Vec<String>)> {
        let header_map = build_header_map(headers)?;
        let required = |name: &str| {
            header_map
                .get(&normalize_header_name(name))
                .copied()
                .ok_or_else(|| {
                    DashError::dataset_column(format!("Missing required column '{name}'"), name)
                })
        };
        let optional = |name: &str| header_map.get(&normalize_header_name(name)).copied();

        let run = required(columns::RUN)?;
        let total_completed = required(columns::TOTAL_COMPLETED)?;
        let total_rejected = required(columns::TOTAL_REJECTED)?;
        let faulty_rate = required(columns::FAULTY_RATE)?;

        let mut occupancy = [0; WORKSTATION_COUNT];
        let mut downtime = [0; WORKSTATION_COUNT];
        for i in 0..WORKSTATION_COUNT {
            occupancy[i] = required(columns::occupancy(i).as_str())?;
            downtime[i] = required(columns::downtime(i).as_str())?;
        }

        let index = Self {
            run,
            total_completed,
            total_rejected,
            faulty_rate,
            total_products: optional(columns::TOTAL_PRODUCTS),
            avg_waiting_time: optional(columns::AVG_WAITING_TIME),
            supplier_occupancy: optional(columns::SUPPLIER_OCCUPANCY),
            occupancy,
            downtime,
        };

        let missing_optional = columns::OPTIONAL
            .into_iter()
            .filter(|&name| optional(name).is_none())
            .map(String::from)
            .collect();

        Ok((index, missing_optional))
    }
}

/// Loads the production CSV into a [`Dataset`].
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load and validate the dataset stored at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<(Dataset, LoadReport)> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            DashError::with_source(format!("Failed to open CSV '{}'", path.display()), e)
        })?;
        let (dataset, report) = Self::from_reader(file)?;
        info!(
            days = dataset.len(),
            skipped = report.row_issues.len(),
            "Loaded production dataset"
        );
        Ok((dataset, report))
    }

    /// Load and validate a dataset from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<(Dataset, LoadReport)> {
        let (records, report) = Self::parse_records(reader)?;
        let dataset = Dataset::new(records)?;
        Ok((dataset, report))
    }

    /// Parse the rows without checking the day sequence.
    pub fn parse_records<R: Read>(reader: R) -> Result<(Vec<Record>, LoadReport)> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let (index, missing_optional) = ColumnIndex::resolve(&headers)?;
        if !missing_optional.is_empty() {
            debug!(columns = ?missing_optional, "Optional columns absent");
        }

        let mut records = Vec::new();
        let mut report = LoadReport {
            missing_optional,
            ..LoadReport::default()
        };

        for (idx, result) in reader.records().enumerate() {
            // records() starts after the header, lines are 1-based
            let line = idx + 2;
            report.rows_read += 1;

            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!(line, error = %e, "Skipping unreadable CSV row");
                    report.row_issues.push(RowIssue {
                        line,
                        message: format!("CSV parse error: {e}"),
                    });
                    continue;
                }
            };

            match parse_row(&row, &index) {
                Ok(record) => records.push(record),
                Err(message) => {
                    warn!(line, %message, "Skipping CSV row");
                    report.row_issues.push(RowIssue { line, message });
                }
            }
        }

        debug!(
            rows_read = report.rows_read,
            rows_used = report.rows_used(),
            "Parsed CSV rows"
        );
        Ok((records, report))
    }
}

fn build_header_map(headers: &StringRecord) -> Result<HashMap<String, usize>> {
    let mut map = HashMap::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        let key = normalize_header_name(name);
        if key.is_empty() {
            continue;
        }
        if map.insert(key, idx).is_some() {
            let name = name.trim().trim_start_matches('\u{feff}');
            return Err(DashError::dataset_column(
                format!("Column '{name}' appears more than once"),
                name,
            ));
        }
    }
    Ok(map)
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM
    name.trim()
        .trim_start_matches('\u{feff}')
        .trim()
        .to_ascii_lowercase()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_run(raw: &str) -> std::result::Result<u32, String> {
    let raw = raw.trim();
    if let Ok(run) = raw.parse::<u32>() {
        return Ok(run);
    }
    // Some exports write integral columns as floats ("12.0")
    match parse_metric(raw) {
        Some(value) if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) => {
            Ok(value as u32)
        }
        _ => Err(format!("Invalid Run value '{raw}'")),
    }
}

fn parse_row(row: &StringRecord, index: &ColumnIndex) -> std::result::Result<Record, String> {
    let field = |i: usize| row.get(i).unwrap_or("");
    let metric = |i: usize| parse_metric(field(i));
    let optional_metric = |i: Option<usize>| i.and_then(metric);

    let run = parse_run(field(index.run))?;

    Ok(Record {
        run,
        total_completed: metric(index.total_completed),
        total_rejected: RejectCount::parse(field(index.total_rejected)),
        total_products: optional_metric(index.total_products),
        avg_waiting_time: optional_metric(index.avg_waiting_time),
        faulty_rate: metric(index.faulty_rate),
        supplier_occupancy: optional_metric(index.supplier_occupancy),
        occupancy: index.occupancy.map(metric),
        downtime: index.downtime.map(metric),
    })
}
