use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input tables
// ---------------------------------------------------------------------------

/// One data row of an uploaded table, tagged with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn get(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// A parsed upload: header row plus string cells. `source` labels errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(source: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            source: source.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a data row. Line numbers continue from the header (line 1).
    pub fn push_row(&mut self, cells: Vec<String>) {
        let line = self.rows.last().map(|r| r.line + 1).unwrap_or(2);
        self.rows.push(TableRow { line, cells });
    }

    /// Position of a header, ignoring surrounding whitespace and a leading BOM.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One historical employment event from the master (SAP) table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmploymentRecord {
    pub line: usize,
    pub staff_id: String,
    pub full_name: String,
    /// Unparsed; the engine parses it so a bad value aborts the whole run.
    pub start_date: String,
    pub employee_category: String,
}

/// One scheduled work assignment from the roster table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRecord {
    pub line: usize,
    pub staff_id: String,
    pub first_name: String,
    pub last_name: String,
    pub deployment_date: String,
}

/// Employment record after date parsing, remembering its input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedEmployment<'a> {
    pub index: usize,
    pub record: &'a EmploymentRecord,
    pub start_date: NaiveDate,
}

/// Everything one reconciliation pass needs. `now` is always injected.
#[derive(Debug, Clone)]
pub struct ReconInput {
    pub employment: Vec<EmploymentRecord>,
    pub roster: Vec<RosterRecord>,
    pub now: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffStatus {
    NotWorked,
    NoRecord,
}

impl StaffStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotWorked => "Not Worked",
            Self::NoRecord => "No Record",
        }
    }
}

impl std::fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for StaffStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Last deployed date column: a date, or "N/A" when no employment record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastDeployed {
    Date(NaiveDate),
    NotAvailable,
}

impl std::fmt::Display for LastDeployed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for LastDeployed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub staff_id: String,
    pub name: String,
    pub last_deployed_date: LastDeployed,
    pub status: StaffStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconWarning {
    /// A table had no data rows. Not fatal: the report just flags fewer rows.
    EmptyInput { table: String },
}

impl std::fmt::Display for ReconWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput { table } => write!(f, "{table} table has no data rows"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub employment_rows: usize,
    pub employment_staff: usize,
    pub roster_rows: usize,
    pub roster_staff: usize,
    pub flexi_officers: usize,
    pub not_worked: usize,
    pub no_record: usize,
    pub total_flagged: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub now: NaiveDateTime,
    pub cutoff: NaiveDateTime,
    pub recency_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub warnings: Vec<ReconWarning>,
    pub rows: Vec<StatusRow>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.rows.is_empty()
    }
}
