use std::collections::{HashMap, HashSet};

use crate::config::RosterTieBreak;
use crate::model::{DatedEmployment, RosterRecord};

/// Keep one employment record per staff id: the one with the greatest
/// `(start_date, index)`, so equal dates resolve to the later input row.
///
/// The result is ordered by ascending `(start_date, index)`.
pub fn latest_per_staff<'a>(rows: &[DatedEmployment<'a>]) -> Vec<DatedEmployment<'a>> {
    let mut best: HashMap<&str, &DatedEmployment<'a>> = HashMap::new();

    for row in rows {
        best.entry(row.record.staff_id.as_str())
            .and_modify(|kept| {
                if (row.start_date, row.index) > (kept.start_date, kept.index) {
                    *kept = row;
                }
            })
            .or_insert(row);
    }

    let mut latest: Vec<DatedEmployment<'a>> = best.into_values().cloned().collect();
    latest.sort_by_key(|r| (r.start_date, r.index));
    latest
}

/// One roster row per staff id in `wanted`, chosen by `tie_break`, returned
/// in the input order of the chosen rows.
pub fn roster_representatives<'a>(
    roster: &'a [RosterRecord],
    wanted: &HashSet<&str>,
    tie_break: RosterTieBreak,
) -> Vec<&'a RosterRecord> {
    let mut chosen: HashMap<&str, usize> = HashMap::new();

    for (idx, row) in roster.iter().enumerate() {
        let id = row.staff_id.as_str();
        if !wanted.contains(id) {
            continue;
        }
        match tie_break {
            RosterTieBreak::Last => {
                chosen.insert(id, idx);
            }
            RosterTieBreak::First => {
                chosen.entry(id).or_insert(idx);
            }
        }
    }

    let mut positions: Vec<usize> = chosen.into_values().collect();
    positions.sort_unstable();
    positions.into_iter().map(|idx| &roster[idx]).collect()
}
