//! Report export: the download CSV and the JSON document.

use std::io::Write;

use crate::error::ReconError;
use crate::model::StatusReport;

pub const CSV_HEADERS: [&str; 4] = ["Staff ID", "Name", "Last Deployed Date", "Status"];

/// Default file name offered for the CSV download.
pub const DEFAULT_CSV_NAME: &str = "flagged_officers_summary.csv";

/// Write the flagged rows as UTF-8 CSV with a header row and no index column.
pub fn write_csv<W: Write>(report: &StatusReport, out: W) -> Result<(), ReconError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| ReconError::Io(e.to_string()))?;

    for row in &report.rows {
        let last_deployed = row.last_deployed_date.to_string();
        writer
            .write_record([
                row.staff_id.as_str(),
                row.name.as_str(),
                last_deployed.as_str(),
                row.status.label(),
            ])
            .map_err(|e| ReconError::Io(e.to_string()))?;
    }

    writer.flush().map_err(|e| ReconError::Io(e.to_string()))?;
    Ok(())
}

pub fn to_csv_string(report: &StatusReport) -> Result<String, ReconError> {
    let mut buf = Vec::new();
    write_csv(report, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ReconError::Io(e.to_string()))
}

pub fn to_json(report: &StatusReport) -> Result<String, ReconError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| ReconError::Io(format!("JSON serialization error: {e}")))
}
