use super::domain::{CourseRow, CourseStatus};
use super::term::{infer_status, term_key_of, Clock, TermKey};
use std::collections::HashSet;
use tracing::debug;

/// Repairs planned/done markers across the whole row set in place.
///
/// After this runs, no row is done at or after the earliest planned term,
/// every row of a term containing a planned row is planned, planned rows
/// carry no grade, and transfer-credited rows are done. Rows without a
/// derivable term take no part in the chronological passes.
pub fn enforce_status_consistency(rows: &mut [CourseRow]) -> bool {
    let mut changed = false;

    for row in rows.iter_mut() {
        if row.is_transfer && row.status != CourseStatus::Done {
            row.status = CourseStatus::Done;
            changed = true;
        }
        if row.status.is_planned() && !row.grade.is_empty() {
            row.grade.clear();
            changed = true;
        }
    }

    let earliest_planned = rows
        .iter()
        .filter(|row| row.status.is_planned())
        .filter_map(term_key_of)
        .map(TermKey::order)
        .min();

    if let Some(earliest) = earliest_planned {
        for row in rows.iter_mut().filter(|row| !row.is_transfer) {
            let Some(key) = term_key_of(row) else {
                continue;
            };
            if key.order() >= earliest && mark_planned(row) {
                debug!(row = %row.id, term = %key, "propagated planned status forward");
                changed = true;
            }
        }
    }

    let planned_terms: HashSet<TermKey> = rows
        .iter()
        .filter(|row| row.status.is_planned())
        .filter_map(term_key_of)
        .collect();

    if !planned_terms.is_empty() {
        for row in rows.iter_mut().filter(|row| !row.is_transfer) {
            let Some(key) = term_key_of(row) else {
                continue;
            };
            if planned_terms.contains(&key) && mark_planned(row) {
                debug!(row = %row.id, term = %key, "aligned row with planned term");
                changed = true;
            }
        }
    }

    changed
}

/// Recomputes every row's status from the calendar. Transfer credit is
/// always done; rows without a derivable term are left untouched.
pub fn auto_infer_status_for_all<C: Clock + ?Sized>(rows: &mut [CourseRow], clock: &C) -> bool {
    let mut changed = false;

    for row in rows.iter_mut() {
        if row.is_transfer {
            if row.status != CourseStatus::Done {
                row.status = CourseStatus::Done;
                changed = true;
            }
            continue;
        }

        let Some(key) = term_key_of(row) else {
            continue;
        };
        let next = infer_status(key, clock);
        if row.status != next {
            row.status = next;
            changed = true;
        }
        if next.is_planned() && !row.grade.is_empty() {
            row.grade.clear();
            changed = true;
        }
    }

    if changed {
        debug!(rows = rows.len(), "clock-driven status inference updated rows");
    }

    changed
}

fn mark_planned(row: &mut CourseRow) -> bool {
    let mut changed = false;
    if row.status != CourseStatus::Planned {
        row.status = CourseStatus::Planned;
        changed = true;
    }
    if !row.grade.is_empty() {
        row.grade.clear();
        changed = true;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::checklist::domain::Track;
    use crate::workflows::checklist::term::{row_order, FixedClock};
    use chrono::NaiveDate;

    fn row(name: &str, term: &str, status: CourseStatus, grade: &str) -> CourseRow {
        CourseRow::new(name, Track::Adv, 2.0)
            .with_term(term)
            .with_status(status)
            .with_grade(grade)
    }

    #[test]
    fn planned_rows_lose_their_grade() {
        let mut rows = vec![row("Torts", "1141", CourseStatus::Planned, "88")];
        assert!(enforce_status_consistency(&mut rows));
        assert_eq!(rows[0].grade, "");
    }

    #[test]
    fn later_terms_follow_the_earliest_planned_term() {
        let mut rows = vec![
            row("Constitutional Law", "1131", CourseStatus::Done, "90"),
            row("Torts", "1132", CourseStatus::Planned, ""),
            row("Evidence", "1141", CourseStatus::Done, "75"),
            row("Tax Law", "", CourseStatus::Done, "80"),
        ];

        assert!(enforce_status_consistency(&mut rows));

        assert_eq!(rows[0].status, CourseStatus::Done);
        assert_eq!(rows[0].grade, "90");
        assert_eq!(rows[2].status, CourseStatus::Planned);
        assert_eq!(rows[2].grade, "");
        assert_eq!(rows[3].status, CourseStatus::Done, "unordered rows are left alone");
    }

    #[test]
    fn same_term_rows_become_planned_together() {
        let mut rows = vec![
            row("Company Law", "1142", CourseStatus::Done, "81"),
            row("Insurance Law", "1142", CourseStatus::Planned, ""),
        ];

        assert!(enforce_status_consistency(&mut rows));
        assert!(rows.iter().all(|row| row.status == CourseStatus::Planned));
        assert!(rows.iter().all(|row| row.grade.is_empty()));
    }

    #[test]
    fn enforcement_is_idempotent() {
        let mut rows = vec![
            row("A", "114S", CourseStatus::Done, "70"),
            row("B", "1141", CourseStatus::Planned, "60"),
            row("C", "1142", CourseStatus::Done, "65"),
            row("D", "1131", CourseStatus::Done, "99"),
        ];

        assert!(enforce_status_consistency(&mut rows));
        let snapshot = rows.clone();
        assert!(!enforce_status_consistency(&mut rows));
        assert_eq!(rows, snapshot);
    }

    #[test]
    fn forward_propagation_holds_across_all_rows() {
        let mut rows = vec![
            row("A", "1122", CourseStatus::Done, ""),
            row("B", "113S", CourseStatus::Done, ""),
            row("C", "1131", CourseStatus::Planned, ""),
            row("D", "1132", CourseStatus::Done, ""),
            row("E", "114S", CourseStatus::Done, ""),
            row("F", "1122", CourseStatus::Done, ""),
        ];

        enforce_status_consistency(&mut rows);

        let earliest = rows
            .iter()
            .filter(|row| row.status.is_planned())
            .map(row_order)
            .min()
            .expect("a planned row remains");
        for row in &rows {
            if row_order(row) >= earliest {
                assert_eq!(row.status, CourseStatus::Planned, "{}", row.name);
            } else {
                assert_eq!(row.status, CourseStatus::Done, "{}", row.name);
            }
        }
    }

    #[test]
    fn transfer_rows_stay_done() {
        let mut rows = vec![
            row("Legal English", "1141", CourseStatus::Planned, "").transfer(),
            row("Torts", "1131", CourseStatus::Planned, ""),
        ];
        rows[0].status = CourseStatus::Planned;

        enforce_status_consistency(&mut rows);

        assert_eq!(rows[0].status, CourseStatus::Done);
        assert_eq!(rows[1].status, CourseStatus::Planned);
    }

    #[test]
    fn clock_inference_uses_the_term_cutoff() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date"));
        let mut rows = vec![
            row("Torts", "1141", CourseStatus::Planned, ""),
            row("Evidence", "1142", CourseStatus::Done, "77"),
            row("Ethics", "", CourseStatus::Planned, ""),
            row("Legal English", "1142", CourseStatus::Done, "").transfer(),
        ];

        assert!(auto_infer_status_for_all(&mut rows, &clock));

        assert_eq!(rows[0].status, CourseStatus::Done);
        assert_eq!(rows[1].status, CourseStatus::Planned);
        assert_eq!(rows[1].grade, "");
        assert_eq!(rows[2].status, CourseStatus::Planned, "no term, untouched");
        assert_eq!(rows[3].status, CourseStatus::Done);
        assert!(!auto_infer_status_for_all(&mut rows, &clock));
    }
}
