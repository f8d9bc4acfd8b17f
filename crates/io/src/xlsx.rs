// Spreadsheet import (xlsx, xlsm, xls, xlsb, ods) into a header + rows table
//
// One sheet per table. Every cell becomes a string the schema mapper can
// read: whole numbers lose their ".0", date serials become ISO dates.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use flexitrack_recon::model::{Table, TableRow};

use crate::IoError;

/// Import one sheet; the first sheet when `sheet` is `None`.
pub fn import(path: &Path, sheet: Option<&str>, source: &str) -> Result<Table, IoError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| IoError::new(path, format!("failed to open workbook: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = pick_sheet(&sheet_names, sheet).map_err(|e| IoError::new(path, e))?;
    log::debug!("{source}: reading sheet '{sheet_name}'");

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::new(path, format!("failed to read sheet '{sheet_name}': {e}")))?;

    // Range start offset (data may not begin at A1)
    let (data_start_row, data_start_col) = range.start().unwrap_or((0, 0));
    let lead = vec![String::new(); data_start_col as usize];

    let mut rows = range.rows().enumerate().map(|(idx, row)| {
        let mut cells = lead.clone();
        cells.extend(row.iter().map(cell_to_string));
        (data_start_row as usize + idx + 1, cells)
    });

    // Skip blank rows above the header.
    let headers = loop {
        match rows.next() {
            Some((_, cells)) if cells.iter().all(|c| c.trim().is_empty()) => continue,
            Some((_, cells)) => break cells,
            None => {
                return Err(IoError::new(path, format!("sheet '{sheet_name}' is empty")));
            }
        }
    };

    let mut table = Table::new(source, headers);
    for (line, cells) in rows {
        let row = TableRow { line, cells };
        if !row.is_blank() {
            table.rows.push(row);
        }
    }

    Ok(table)
}

fn pick_sheet(names: &[String], wanted: Option<&str>) -> Result<String, String> {
    match wanted {
        Some(name) => names
            .iter()
            .find(|n| n.as_str() == name)
            .cloned()
            .ok_or_else(|| format!("no sheet named '{name}' (available: {})", names.join(", "))),
        None => names
            .first()
            .cloned()
            .ok_or_else(|| "workbook contains no sheets".to_string()),
    }
}

pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => format_number(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(_) => "#ERR".to_string(),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            match serial_to_datetime(serial) {
                Some(value) if value.time() == NaiveTime::MIN => {
                    value.date().format("%Y-%m-%d").to_string()
                }
                Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => format_number(serial),
            }
        }
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Integers without decimals, so ids like 10001.0 read back as "10001".
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Excel 1900-system serial to a timestamp. Serials below 61 sit before
/// Excel's phantom 1900-02-29 and are shifted by one day.
pub(crate) fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = serial.floor() as i64;
    let base = if days < 61 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let date = base.checked_add_signed(Duration::days(days))?;
    let secs = ((serial - serial.floor()) * 86_400.0).round() as i64;
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::seconds(secs))
}
