//! Column names of the production CSV.

use factory_common::WORKSTATION_COUNT;

/// Day index.
pub const RUN: &str = "Run";
/// Completed units.
pub const TOTAL_COMPLETED: &str = "TotalCompleted";
/// Rejected units or the accident marker.
pub const TOTAL_REJECTED: &str = "TotalRejected";
/// Products that entered the line.
pub const TOTAL_PRODUCTS: &str = "TotalProducts";
/// Mean waiting time per product.
pub const AVG_WAITING_TIME: &str = "AvgWaitingTime";
/// Rejected share in percent.
pub const FAULTY_RATE: &str = "FaultyRate";
/// Supplier occupancy in percent.
pub const SUPPLIER_OCCUPANCY: &str = "SupplierOccupancy";

/// Occupancy column of workstation `index`.
pub fn occupancy(index: usize) -> String {
    format!("WS{index}_Occupancy")
}

/// Downtime column of workstation `index`.
pub fn downtime(index: usize) -> String {
    format!("WS{index}_Downtime")
}

/// Columns every input file must have.
pub fn required() -> Vec<String> {
    let mut columns = vec![
        RUN.to_string(),
        TOTAL_COMPLETED.to_string(),
        TOTAL_REJECTED.to_string(),
        FAULTY_RATE.to_string(),
    ];
    columns.extend((0..WORKSTATION_COUNT).map(occupancy));
    columns.extend((0..WORKSTATION_COUNT).map(downtime));
    columns
}

/// Columns read when present.
pub const OPTIONAL: [&str; 3] = [TOTAL_PRODUCTS, AVG_WAITING_TIME, SUPPLIER_OCCUPANCY];

/// Column order of written files: the global figures, then occupancy and
/// downtime interleaved per workstation.
pub fn output_order() -> Vec<String> {
    let mut columns = vec![
        RUN.to_string(),
        TOTAL_COMPLETED.to_string(),
        TOTAL_REJECTED.to_string(),
        TOTAL_PRODUCTS.to_string(),
        AVG_WAITING_TIME.to_string(),
        FAULTY_RATE.to_string(),
        SUPPLIER_OCCUPANCY.to_string(),
    ];
    for i in 0..WORKSTATION_COUNT {
        columns.push(occupancy(i));
        columns.push(downtime(i));
    }
    columns
}
