use crate::model::{ReportSummary, StaffStatus, StatusRow};

/// Input-side counts gathered while the pipeline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputCounts {
    pub employment_rows: usize,
    pub employment_staff: usize,
    pub roster_rows: usize,
    pub roster_staff: usize,
    pub flexi_officers: usize,
}

/// Compute summary statistics for a finished report.
pub fn compute_summary(counts: InputCounts, rows: &[StatusRow]) -> ReportSummary {
    let mut not_worked = 0;
    let mut no_record = 0;

    for r in rows {
        match r.status {
            StaffStatus::NotWorked => not_worked += 1,
            StaffStatus::NoRecord => no_record += 1,
        }
    }

    ReportSummary {
        employment_rows: counts.employment_rows,
        employment_staff: counts.employment_staff,
        roster_rows: counts.roster_rows,
        roster_staff: counts.roster_staff,
        flexi_officers: counts.flexi_officers,
        not_worked,
        no_record,
        total_flagged: rows.len(),
    }
}
