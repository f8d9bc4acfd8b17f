//! Column contracts for the two uploads and their mapping onto records.

use crate::error::ReconError;
use crate::model::{EmploymentRecord, RosterRecord, Table, TableRow};

pub const EMPLOYMENT_STAFF_ID: &str = "Pers.no.";
pub const EMPLOYMENT_NAME: &str = "Last name First name";
pub const EMPLOYMENT_START_DATE: &str = "Start Date";
pub const EMPLOYMENT_GROUP: &str = "Employee Group";

pub const ROSTER_STAFF_ID: &str = "Personnel no.";
pub const ROSTER_FIRST_NAME: &str = "Person First Name";
pub const ROSTER_LAST_NAME: &str = "Person Last Name";
pub const ROSTER_DEPLOYMENT_DATE: &str = "Deployment Date";

pub const EMPLOYMENT_COLUMNS: [&str; 4] = [
    EMPLOYMENT_STAFF_ID,
    EMPLOYMENT_NAME,
    EMPLOYMENT_START_DATE,
    EMPLOYMENT_GROUP,
];

pub const ROSTER_COLUMNS: [&str; 4] = [
    ROSTER_STAFF_ID,
    ROSTER_FIRST_NAME,
    ROSTER_LAST_NAME,
    ROSTER_DEPLOYMENT_DATE,
];

/// Resolve every required column up front so a schema error names the first
/// missing one before any row is looked at.
fn resolve<const N: usize>(table: &Table, columns: [&str; N]) -> Result<[usize; N], ReconError> {
    let mut idx = [0usize; N];
    for (slot, name) in idx.iter_mut().zip(columns) {
        *slot = table.column(name).ok_or_else(|| ReconError::MissingColumn {
            table: table.source.clone(),
            column: name.into(),
        })?;
    }
    Ok(idx)
}

fn staff_id(table: &Table, row: &TableRow, idx: usize, column: &str) -> Result<String, ReconError> {
    let id = row.get(idx).trim();
    if id.is_empty() {
        return Err(ReconError::MissingStaffId {
            table: table.source.clone(),
            row: row.line,
            column: column.into(),
        });
    }
    Ok(id.to_string())
}

/// Map the master employment table. Blank rows are skipped; any other row
/// without a staff id aborts.
pub fn employment_records(table: &Table) -> Result<Vec<EmploymentRecord>, ReconError> {
    let [id, name, start, group] = resolve(table, EMPLOYMENT_COLUMNS)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in table.rows.iter().filter(|r| !r.is_blank()) {
        records.push(EmploymentRecord {
            line: row.line,
            staff_id: staff_id(table, row, id, EMPLOYMENT_STAFF_ID)?,
            full_name: row.get(name).to_string(),
            start_date: row.get(start).to_string(),
            employee_category: row.get(group).to_string(),
        });
    }

    log::debug!("{}: mapped {} employment rows", table.source, records.len());
    Ok(records)
}

/// Map the roster table.
pub fn roster_records(table: &Table) -> Result<Vec<RosterRecord>, ReconError> {
    let [id, first, last, deployed] = resolve(table, ROSTER_COLUMNS)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in table.rows.iter().filter(|r| !r.is_blank()) {
        records.push(RosterRecord {
            line: row.line,
            staff_id: staff_id(table, row, id, ROSTER_STAFF_ID)?,
            first_name: row.get(first).to_string(),
            last_name: row.get(last).to_string(),
            deployment_date: row.get(deployed).to_string(),
        });
    }

    log::debug!("{}: mapped {} roster rows", table.source, records.len());
    Ok(records)
}

/// Read comma-separated text (header on the first line) into a [`Table`].
pub fn table_from_csv(source: &str, csv_data: &str) -> Result<Table, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(format!("{source}: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(source, headers);
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(format!("{source}: {e}")))?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        table.rows.push(TableRow {
            line,
            cells: record.iter().map(|c| c.to_string()).collect(),
        });
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAP: &str = "\
Pers.no.,Last name First name,Start Date,Employee Group,Org Unit
10001,Lim Ah Kow,2024-01-15,Casual Labour,North
 10002 ,Tan Mei,2024-02-01,Permanent,South
";

    const ROSTER: &str = "\
Personnel no.,Person First Name,Person Last Name,Deployment Date
10001,Ah Kow,Lim,2024-06-01
20001,Siti,Rahman,2024-06-02
";

    #[test]
    fn maps_employment_columns() {
        let table = table_from_csv("sap.csv", SAP).unwrap();
        let rows = employment_records(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].staff_id, "10001");
        assert_eq!(rows[0].full_name, "Lim Ah Kow");
        assert_eq!(rows[0].start_date, "2024-01-15");
        assert_eq!(rows[0].employee_category, "Casual Labour");
        assert_eq!(rows[0].line, 2);
        // ids are trimmed
        assert_eq!(rows[1].staff_id, "10002");
    }

    #[test]
    fn maps_roster_columns() {
        let table = table_from_csv("roster.csv", ROSTER).unwrap();
        let rows = roster_records(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].staff_id, "20001");
        assert_eq!(rows[1].first_name, "Siti");
        assert_eq!(rows[1].last_name, "Rahman");
        assert_eq!(rows[1].deployment_date, "2024-06-02");
    }

    #[test]
    fn columns_may_appear_in_any_order() {
        let csv = "\
Employee Group,Start Date,Pers.no.,Last name First name
Casual Labour,2024-01-15,7,Ong Bee
";
        let table = table_from_csv("sap.csv", csv).unwrap();
        let rows = employment_records(&table).unwrap();
        assert_eq!(rows[0].staff_id, "7");
        assert_eq!(rows[0].full_name, "Ong Bee");
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let csv = "Pers.no.,Last name First name,Employee Group\n1,A,Casual Labour\n";
        let table = table_from_csv("sap.csv", csv).unwrap();
        let err = employment_records(&table).unwrap_err();
        assert_eq!(
            err,
            ReconError::MissingColumn {
                table: "sap.csv".into(),
                column: "Start Date".into(),
            }
        );
    }

    #[test]
    fn roster_missing_deployment_date_column() {
        let csv = "Personnel no.,Person First Name,Person Last Name\n1,A,B\n";
        let table = table_from_csv("roster.csv", csv).unwrap();
        let err = roster_records(&table).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("Deployment Date"));
    }

    #[test]
    fn empty_staff_id_aborts_with_row() {
        let csv = "\
Personnel no.,Person First Name,Person Last Name,Deployment Date
1,A,B,2024-01-01
,C,D,2024-01-02
";
        let table = table_from_csv("roster.csv", csv).unwrap();
        let err = roster_records(&table).unwrap_err();
        assert_eq!(
            err,
            ReconError::MissingStaffId {
                table: "roster.csv".into(),
                row: 3,
                column: "Personnel no.".into(),
            }
        );
    }

    #[test]
    fn blank_rows_are_skipped() {
        let mut table = Table::new("roster", ROSTER_COLUMNS.iter().map(|c| c.to_string()).collect());
        table.push_row(vec!["1".into(), "A".into(), "B".into(), "".into()]);
        table.push_row(vec!["".into(), " ".into(), "".into(), "".into()]);
        let rows = roster_records(&table).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn header_only_table_yields_no_records() {
        let table = table_from_csv("sap.csv", "Pers.no.,Last name First name,Start Date,Employee Group\n").unwrap();
        assert!(employment_records(&table).unwrap().is_empty());
    }
}
