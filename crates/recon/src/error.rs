use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty input path, bad date format, etc.).
    ConfigValidation(String),
    /// Required column absent from an input table.
    MissingColumn { table: String, column: String },
    /// A non-blank row with an empty staff identifier.
    MissingStaffId { table: String, row: usize, column: String },
    /// Date value that none of the accepted formats can read.
    MalformedDate {
        table: String,
        row: usize,
        column: String,
        staff_id: String,
        value: String,
    },
    /// Report export or in-memory CSV read failure.
    Io(String),
}

impl ReconError {
    /// Schema errors are the ones a user fixes by correcting column headers.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::MissingColumn { .. })
    }

    /// Row-level input errors (bad date, missing id).
    pub fn is_malformed_row(&self) -> bool {
        matches!(self, Self::MalformedDate { .. } | Self::MissingStaffId { .. })
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "{table}: missing required column '{column}'")
            }
            Self::MissingStaffId { table, row, column } => {
                write!(f, "{table}, row {row}: empty '{column}'")
            }
            Self::MalformedDate { table, row, column, staff_id, value } => {
                write!(
                    f,
                    "{table}, row {row} (staff '{staff_id}'): cannot parse '{column}' value '{value}' as a date"
                )
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
