use std::collections::HashSet;

use chrono::{NaiveDateTime, NaiveTime};

use crate::config::RosterTieBreak;
use crate::dedup::roster_representatives;
use crate::model::{DatedEmployment, LastDeployed, RosterRecord, StaffStatus, StatusRow};

/// Employee group that makes a staff member a flexi officer.
pub const CASUAL_LABOUR: &str = "Casual Labour";

/// Casual-labour records whose start date (at midnight) is on or before the cutoff.
pub fn flexi_officers<'a, 'b>(
    latest: &'b [DatedEmployment<'a>],
    cutoff: NaiveDateTime,
) -> Vec<&'b DatedEmployment<'a>> {
    latest
        .iter()
        .filter(|r| r.record.employee_category == CASUAL_LABOUR)
        .filter(|r| r.start_date.and_time(NaiveTime::MIN) <= cutoff)
        .collect()
}

/// Flexi officers who still appear on the roster.
pub fn not_worked(officers: &[&DatedEmployment<'_>], roster_ids: &HashSet<&str>) -> Vec<StatusRow> {
    officers
        .iter()
        .filter(|r| roster_ids.contains(r.record.staff_id.as_str()))
        .map(|r| StatusRow {
            staff_id: r.record.staff_id.clone(),
            name: r.record.full_name.clone(),
            last_deployed_date: LastDeployed::Date(r.start_date),
            status: StaffStatus::NotWorked,
        })
        .collect()
}

/// Roster staff with no employment row at all, one row each.
pub fn no_record(
    roster: &[RosterRecord],
    roster_ids: &HashSet<&str>,
    employment_ids: &HashSet<&str>,
    tie_break: RosterTieBreak,
) -> Vec<StatusRow> {
    let missing: HashSet<&str> = roster_ids.difference(employment_ids).copied().collect();

    roster_representatives(roster, &missing, tie_break)
        .into_iter()
        .map(|r| StatusRow {
            staff_id: r.staff_id.clone(),
            name: format!("{} {}", r.first_name, r.last_name),
            last_deployed_date: LastDeployed::NotAvailable,
            status: StaffStatus::NoRecord,
        })
        .collect()
}
