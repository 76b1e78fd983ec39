//! CSV output of daily records.

use crate::columns;
use factory_common::{Record, Result, ACCIDENT_MARKER};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, instrument};

/// Writes records in the production CSV layout.
///
/// Absent metrics are written as empty fields, except on accident days where
/// they carry the accident marker so that the whole row reads `accident`.
pub struct DatasetWriter;

impl DatasetWriter {
    /// Write `records` to `path`, creating the parent directory if needed.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), rows = records.len()))]
    pub fn write_path<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        Self::write(file, records)?;
        debug!("Wrote production CSV");
        Ok(())
    }

    /// Write `records` with a header line to `writer`.
    pub fn write<W: Write>(writer: W, records: &[Record]) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(columns::output_order())?;

        for record in records {
            csv.write_record(Self::row(record))?;
        }
        csv.flush()?;
        Ok(())
    }

    fn row(record: &Record) -> Vec<String> {
        let absent = if record.is_accident() {
            ACCIDENT_MARKER
        } else {
            ""
        };
        let metric = |value: Option<f64>| value.map_or_else(|| absent.to_string(), |v| v.to_string());

        let mut row = vec![
            record.run.to_string(),
            metric(record.total_completed),
            record.total_rejected.to_string(),
            metric(record.total_products),
            metric(record.avg_waiting_time),
            metric(record.faulty_rate),
            metric(record.supplier_occupancy),
        ];
        for (occupancy, downtime) in record.occupancy.iter().zip(&record.downtime) {
            row.push(metric(*occupancy));
            row.push(metric(*downtime));
        }
        row
    }
}
