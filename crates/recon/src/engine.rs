use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};

use crate::classify::{flexi_officers, no_record, not_worked};
use crate::config::ReconOptions;
use crate::dates::DateParser;
use crate::dedup::latest_per_staff;
use crate::error::ReconError;
use crate::model::{
    DatedEmployment, EmploymentRecord, ReconInput, ReconWarning, ReportMeta, RosterRecord,
    StatusReport,
};
use crate::schema::{
    EMPLOYMENT_STAFF_ID, EMPLOYMENT_START_DATE, ROSTER_DEPLOYMENT_DATE, ROSTER_STAFF_ID,
};
use crate::summary::{compute_summary, InputCounts};

/// A casual-labour record this many days old (or older) counts as not worked.
pub const RECENCY_DAYS: i64 = 90;

pub const EMPLOYMENT_TABLE: &str = "employment";
pub const ROSTER_TABLE: &str = "roster";

pub fn cutoff_for(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::days(RECENCY_DAYS)
}

/// Reconcile with default options.
pub fn reconcile(
    employment: &[EmploymentRecord],
    roster: &[RosterRecord],
    now: NaiveDateTime,
) -> Result<StatusReport, ReconError> {
    reconcile_with(employment, roster, now, &ReconOptions::default())
}

/// Run reconciliation on a prepared input.
pub fn run(input: &ReconInput, options: &ReconOptions) -> Result<StatusReport, ReconError> {
    reconcile_with(&input.employment, &input.roster, input.now, options)
}

/// The full pipeline: parse dates, dedup, classify, merge. Inputs are only read.
pub fn reconcile_with(
    employment: &[EmploymentRecord],
    roster: &[RosterRecord],
    now: NaiveDateTime,
    options: &ReconOptions,
) -> Result<StatusReport, ReconError> {
    let mut warnings = Vec::new();
    if employment.is_empty() {
        warnings.push(ReconWarning::EmptyInput { table: EMPLOYMENT_TABLE.into() });
    }
    if roster.is_empty() {
        warnings.push(ReconWarning::EmptyInput { table: ROSTER_TABLE.into() });
    }
    for w in &warnings {
        log::warn!("{w}");
    }

    // Ids are compared trimmed; an empty one aborts.
    let employment = trimmed_employment(employment)?;
    let roster = trimmed_roster(roster)?;
    let (employment, roster) = (employment.as_ref(), roster.as_ref());

    // 1. Parse every date before doing anything else.
    let parser = DateParser::new(options.date_formats.clone());
    let dated = parse_start_dates(employment, &parser)?;
    check_deployment_dates(roster, &parser)?;

    // 2. One record per staff member, latest start date wins.
    let latest = latest_per_staff(&dated);

    // 3-4. Flexi officers past the cutoff.
    let cutoff = cutoff_for(now);
    let officers = flexi_officers(&latest, cutoff);

    // 5. Roster membership.
    let roster_ids: HashSet<&str> = roster.iter().map(|r| r.staff_id.as_str()).collect();

    // 6. Not Worked.
    let mut rows = not_worked(&officers, &roster_ids);

    // 7. No Record: any employment row at all counts as having a record.
    let employment_ids: HashSet<&str> = employment.iter().map(|r| r.staff_id.as_str()).collect();
    let missing = no_record(roster, &roster_ids, &employment_ids, options.roster_tie_break);

    log::debug!(
        "cutoff {cutoff}: {} staff, {} flexi officers, {} not worked, {} no record",
        latest.len(),
        officers.len(),
        rows.len(),
        missing.len(),
    );

    // 8. Merge.
    rows.extend(missing);

    let counts = InputCounts {
        employment_rows: employment.len(),
        employment_staff: latest.len(),
        roster_rows: roster.len(),
        roster_staff: roster_ids.len(),
        flexi_officers: officers.len(),
    };

    Ok(StatusReport {
        meta: ReportMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            now,
            cutoff,
            recency_days: RECENCY_DAYS,
        },
        summary: compute_summary(counts, &rows),
        warnings,
        rows,
    })
}

fn require_staff_id(id: &str, table: &str, row: usize, column: &str) -> Result<(), ReconError> {
    if id.trim().is_empty() {
        return Err(ReconError::MissingStaffId {
            table: table.into(),
            row,
            column: column.into(),
        });
    }
    Ok(())
}

/// Borrowed as-is unless some id carries surrounding whitespace.
fn trimmed_employment(
    records: &[EmploymentRecord],
) -> Result<Cow<'_, [EmploymentRecord]>, ReconError> {
    for r in records {
        require_staff_id(&r.staff_id, EMPLOYMENT_TABLE, r.line, EMPLOYMENT_STAFF_ID)?;
    }
    if records.iter().all(|r| r.staff_id.trim() == r.staff_id) {
        return Ok(Cow::Borrowed(records));
    }
    Ok(Cow::Owned(
        records
            .iter()
            .map(|r| EmploymentRecord {
                staff_id: r.staff_id.trim().to_string(),
                ..r.clone()
            })
            .collect(),
    ))
}

fn trimmed_roster(records: &[RosterRecord]) -> Result<Cow<'_, [RosterRecord]>, ReconError> {
    for r in records {
        require_staff_id(&r.staff_id, ROSTER_TABLE, r.line, ROSTER_STAFF_ID)?;
    }
    if records.iter().all(|r| r.staff_id.trim() == r.staff_id) {
        return Ok(Cow::Borrowed(records));
    }
    Ok(Cow::Owned(
        records
            .iter()
            .map(|r| RosterRecord {
                staff_id: r.staff_id.trim().to_string(),
                ..r.clone()
            })
            .collect(),
    ))
}

/// Deployment dates play no part in classification, but a value that is
/// present must still read as a date. Blank cells are allowed.
fn check_deployment_dates(roster: &[RosterRecord], parser: &DateParser) -> Result<(), ReconError> {
    for r in roster {
        if !r.deployment_date.trim().is_empty() && parser.parse(&r.deployment_date).is_none() {
            return Err(ReconError::MalformedDate {
                table: ROSTER_TABLE.into(),
                row: r.line,
                column: ROSTER_DEPLOYMENT_DATE.into(),
                staff_id: r.staff_id.clone(),
                value: r.deployment_date.clone(),
            });
        }
    }
    Ok(())
}

fn parse_start_dates<'a>(
    employment: &'a [EmploymentRecord],
    parser: &DateParser,
) -> Result<Vec<DatedEmployment<'a>>, ReconError> {
    employment
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let start_date = parser.parse(&record.start_date).ok_or_else(|| {
                ReconError::MalformedDate {
                    table: EMPLOYMENT_TABLE.into(),
                    row: record.line,
                    column: EMPLOYMENT_START_DATE.into(),
                    staff_id: record.staff_id.clone(),
                    value: record.start_date.clone(),
                }
            })?;
            Ok(DatedEmployment { index, record, start_date })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterTieBreak;
    use crate::model::{LastDeployed, StaffStatus};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn ago(days: i64) -> String {
        (now().date() - Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    fn emp(id: &str, category: &str, start: &str) -> EmploymentRecord {
        EmploymentRecord {
            line: 0,
            staff_id: id.into(),
            full_name: format!("Officer {id}"),
            start_date: start.into(),
            employee_category: category.into(),
        }
    }

    fn rost(id: &str, first: &str, last: &str) -> RosterRecord {
        RosterRecord {
            line: 0,
            staff_id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            deployment_date: "2024-06-29".into(),
        }
    }

    #[test]
    fn casual_labour_on_roster_is_not_worked() {
        let employment = vec![emp("1", "Casual Labour", &ago(120))];
        let roster = vec![rost("1", "A", "B")];
        let report = reconcile(&employment, &roster, now()).unwrap();
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.staff_id, "1");
        assert_eq!(row.name, "Officer 1");
        assert_eq!(row.status, StaffStatus::NotWorked);
        assert_eq!(row.last_deployed_date.to_string(), ago(120));
    }

    #[test]
    fn empty_employment_flags_whole_roster_as_no_record() {
        let roster = vec![rost("2", "A", "B")];
        let report = reconcile(&[], &roster, now()).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].name, "A B");
        assert_eq!(report.rows[0].last_deployed_date, LastDeployed::NotAvailable);
        assert_eq!(report.rows[0].status, StaffStatus::NoRecord);
        assert_eq!(
            report.warnings,
            vec![ReconWarning::EmptyInput { table: EMPLOYMENT_TABLE.into() }]
        );
    }

    #[test]
    fn wrong_category_is_neither_flag() {
        let employment = vec![emp("3", "Permanent", &ago(120))];
        let roster = vec![rost("3", "A", "B")];
        let report = reconcile(&employment, &roster, now()).unwrap();
        assert!(report.rows.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn empty_inputs_give_empty_report_with_warnings() {
        let report = reconcile(&[], &[], now()).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.summary.total_flagged, 0);
    }

    #[test]
    fn latest_record_decides_recency() {
        // Old casual record superseded by a recent one: not flagged.
        let employment = vec![
            emp("1", "Casual Labour", &ago(400)),
            emp("1", "Casual Labour", &ago(10)),
        ];
        let roster = vec![rost("1", "A", "B")];
        let report = reconcile(&employment, &roster, now()).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.summary.employment_staff, 1);
    }

    #[test]
    fn category_of_latest_record_decides() {
        // Latest record is permanent; the older casual one does not count.
        let employment = vec![
            emp("1", "Casual Labour", &ago(400)),
            emp("1", "Permanent", &ago(200)),
        ];
        let roster = vec![rost("1", "A", "B")];
        let report = reconcile(&employment, &roster, now()).unwrap();
        assert!(report.rows.is_empty());
    }

    #[test]
    fn officers_off_roster_are_not_flagged() {
        let employment = vec![emp("1", "Casual Labour", &ago(120))];
        let roster = vec![rost("2", "C", "D")];
        let report = reconcile(&employment, &roster, now()).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].staff_id, "2");
        assert_eq!(report.rows[0].status, StaffStatus::NoRecord);
    }

    #[test]
    fn not_worked_rows_precede_no_record_rows() {
        let employment = vec![
            emp("1", "Casual Labour", &ago(100)),
            emp("2", "Casual Labour", &ago(300)),
        ];
        let roster = vec![
            rost("9", "N", "R"),
            rost("1", "A", "B"),
            rost("2", "C", "D"),
        ];
        let report = reconcile(&employment, &roster, now()).unwrap();
        let ids: Vec<_> = report.rows.iter().map(|r| r.staff_id.as_str()).collect();
        // Not Worked ordered by ascending start date, then No Record.
        assert_eq!(ids, vec!["2", "1", "9"]);
        assert_eq!(report.summary.not_worked, 2);
        assert_eq!(report.summary.no_record, 1);
    }

    #[test]
    fn malformed_date_aborts_with_context() {
        let mut bad = emp("7", "Permanent", "not-a-date");
        bad.line = 5;
        let employment = vec![emp("1", "Casual Labour", &ago(120)), bad];
        let err = reconcile(&employment, &[], now()).unwrap_err();
        assert_eq!(
            err,
            ReconError::MalformedDate {
                table: EMPLOYMENT_TABLE.into(),
                row: 5,
                column: EMPLOYMENT_START_DATE.into(),
                staff_id: "7".into(),
                value: "not-a-date".into(),
            }
        );
    }

    #[test]
    fn roster_tie_break_is_configurable() {
        let roster = vec![rost("5", "First", "Entry"), rost("5", "Second", "Entry")];

        let report = reconcile(&[], &roster, now()).unwrap();
        assert_eq!(report.rows[0].name, "Second Entry");

        let options = ReconOptions {
            roster_tie_break: RosterTieBreak::First,
            ..ReconOptions::default()
        };
        let report = reconcile_with(&[], &roster, now(), &options).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].name, "First Entry");
    }

    #[test]
    fn extra_date_formats_are_used() {
        let employment = vec![emp("1", "Casual Labour", "01|02|2024")];
        let roster = vec![rost("1", "A", "B")];
        assert!(reconcile(&employment, &roster, now()).is_err());

        let options = ReconOptions {
            date_formats: vec!["%d|%m|%Y".into()],
            ..ReconOptions::default()
        };
        let report = reconcile_with(&employment, &roster, now(), &options).unwrap();
        assert_eq!(report.rows[0].last_deployed_date.to_string(), "2024-02-01");
    }

    #[test]
    fn inputs_are_left_untouched() {
        let employment = vec![
            emp("1", "Casual Labour", &ago(120)),
            emp("1", "Casual Labour", &ago(150)),
        ];
        let roster = vec![rost("1", "A", "B"), rost("1", "A", "B")];
        let before = (employment.clone(), roster.clone());
        let _ = reconcile(&employment, &roster, now()).unwrap();
        assert_eq!((employment, roster), before);
    }

    #[test]
    fn meta_records_injected_now_and_cutoff() {
        let report = reconcile(&[], &[], now()).unwrap();
        assert_eq!(report.meta.now, now());
        assert_eq!(report.meta.cutoff, now() - Duration::days(90));
        assert_eq!(report.meta.recency_days, 90);
    }

    #[test]
    fn empty_roster_id_aborts() {
        let mut blank = rost("", "A", "B");
        blank.line = 4;
        let err = reconcile(&[], &[rost("1", "C", "D"), blank], now()).unwrap_err();
        assert_eq!(
            err,
            ReconError::MissingStaffId {
                table: ROSTER_TABLE.into(),
                row: 4,
                column: ROSTER_STAFF_ID.into(),
            }
        );
    }

    #[test]
    fn whitespace_employment_id_aborts() {
        let mut blank = emp("  ", "Casual Labour", &ago(120));
        blank.line = 7;
        let err = reconcile(&[blank], &[], now()).unwrap_err();
        assert!(err.is_malformed_row());
        assert!(err.to_string().contains("row 7"));
    }

    #[test]
    fn ids_are_compared_trimmed() {
        let employment = vec![emp(" 1", "Casual Labour", &ago(120))];
        let roster = vec![rost("1 ", "A", "B")];
        let report = reconcile(&employment, &roster, now()).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].staff_id, "1");
        assert_eq!(report.rows[0].status, StaffStatus::NotWorked);
        assert_eq!(report.summary.roster_staff, 1);
    }

    #[test]
    fn malformed_deployment_date_aborts() {
        let mut bad = rost("1", "A", "B");
        bad.line = 3;
        bad.deployment_date = "not a date".into();
        let err = reconcile(&[], &[bad], now()).unwrap_err();
        assert_eq!(
            err,
            ReconError::MalformedDate {
                table: ROSTER_TABLE.into(),
                row: 3,
                column: ROSTER_DEPLOYMENT_DATE.into(),
                staff_id: "1".into(),
                value: "not a date".into(),
            }
        );
    }

    #[test]
    fn blank_deployment_date_is_allowed() {
        let mut blank = rost("1", "A", "B");
        blank.deployment_date = "  ".into();
        let report = reconcile(&[], &[blank], now()).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].status, StaffStatus::NoRecord);
    }

    #[test]
    fn run_uses_input_now() {
        let input = ReconInput {
            employment: vec![emp("1", "Casual Labour", &ago(95))],
            roster: vec![rost("1", "A", "B")],
            now: now(),
        };
        let report = run(&input, &ReconOptions::default()).unwrap();
        assert_eq!(report.summary.not_worked, 1);
    }
}
