use super::credits::{check_cross_caps, CapCheck};
use super::domain::{
    clamp_grade, ChecklistError, CourseRow, CourseStatus, ExternalCredit, RowId, Track,
};
use super::exam::{EligibilityEngine, ExamCourse};
use super::policy::CreditPolicy;
use super::report::{ChecklistReport, ReportOptions};
use super::status::{auto_infer_status_for_all, enforce_status_consistency};
use super::term::{is_term_input, split_prefixed_name, Clock, TermKey};
use serde::Serialize;
use tracing::debug;

/// One student's course list. Every mutation leaves the rows in the
/// manual-plus-propagation canonical state: planned markers flow forward in
/// time and across a term, transfer credit stays completed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Checklist {
    rows: Vec<CourseRow>,
    external_credits: Vec<ExternalCredit>,
    policy: CreditPolicy,
}

impl Checklist {
    pub fn new(policy: CreditPolicy) -> Self {
        Self {
            rows: Vec::new(),
            external_credits: Vec::new(),
            policy,
        }
    }

    /// Adopts rows produced elsewhere (a roster import, a stored session),
    /// repairing legacy titles, ids and status on the way in. Terms are
    /// validated the same way `add` validates them.
    pub fn from_rows(
        rows: Vec<CourseRow>,
        external_credits: Vec<ExternalCredit>,
        policy: CreditPolicy,
    ) -> Result<Self, ChecklistError> {
        let mut checklist = Self {
            rows: admit_rows(rows)?,
            external_credits,
            policy,
        };
        enforce_status_consistency(&mut checklist.rows);
        Ok(checklist)
    }

    pub fn policy(&self) -> &CreditPolicy {
        &self.policy
    }

    pub fn rows(&self) -> &[CourseRow] {
        &self.rows
    }

    pub fn track(&self, track: Track) -> impl Iterator<Item = &CourseRow> + Clone {
        self.rows.iter().filter(move |row| row.track == track)
    }

    pub fn external_credits(&self) -> &[ExternalCredit] {
        &self.external_credits
    }

    pub fn get(&self, id: &RowId) -> Option<&CourseRow> {
        self.rows.iter().find(|row| &row.id == id)
    }

    /// Swaps in a new row set. On an invalid term the current rows are kept.
    pub fn replace_rows(&mut self, rows: Vec<CourseRow>) -> Result<(), ChecklistError> {
        self.rows = admit_rows(rows)?;
        enforce_status_consistency(&mut self.rows);
        Ok(())
    }

    pub fn set_external_credits(&mut self, credits: Vec<ExternalCredit>) {
        self.external_credits = credits;
    }

    /// Inserts a row and reports the cap accounting with the row included.
    /// Caps are advisory: the row is stored whatever the check says.
    pub fn add(&mut self, row: CourseRow) -> Result<(RowId, CapCheck), ChecklistError> {
        if !is_term_input(&row.term) {
            return Err(ChecklistError::InvalidTerm(row.term));
        }
        let row = prepare_row(row);

        let caps = if row.track == Track::Adv {
            check_cross_caps(self.track(Track::Adv), Some(&row), &self.policy)
        } else {
            CapCheck::default()
        };

        let id = row.id.clone();
        debug!(row = %id, track = row.track.label(), "course row added");
        self.rows.push(row);
        enforce_status_consistency(&mut self.rows);
        Ok((id, caps))
    }

    pub fn add_external_credit(&mut self, credit: ExternalCredit) {
        self.external_credits.push(credit);
    }

    pub fn remove(&mut self, id: &RowId) -> Result<CourseRow, ChecklistError> {
        let index = self
            .rows
            .iter()
            .position(|row| &row.id == id)
            .ok_or_else(|| ChecklistError::RowNotFound(id.clone()))?;
        let removed = self.rows.remove(index);
        enforce_status_consistency(&mut self.rows);
        Ok(removed)
    }

    pub fn clear_track(&mut self, track: Track) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.track != track);
        enforce_status_consistency(&mut self.rows);
        before - self.rows.len()
    }

    /// Sets a row's status, then re-applies propagation. A row marked done
    /// may therefore come back planned when an earlier term is still planned.
    pub fn set_status(&mut self, id: &RowId, status: CourseStatus) -> Result<CourseStatus, ChecklistError> {
        let row = self.row_mut(id)?;
        if row.is_transfer && status.is_planned() {
            return Err(ChecklistError::TransferLocked(id.clone()));
        }
        row.status = status;
        enforce_status_consistency(&mut self.rows);
        Ok(self.row_status(id))
    }

    /// Stores a clamped grade and returns the stored value.
    pub fn set_grade(&mut self, id: &RowId, grade: &str) -> Result<String, ChecklistError> {
        let row = self.row_mut(id)?;
        let grade = clamp_grade(grade);
        if row.status.is_planned() && !grade.is_empty() {
            return Err(ChecklistError::InvalidGrade {
                row: id.clone(),
                reason: "planned courses carry no grade",
            });
        }
        row.grade = grade.clone();
        Ok(grade)
    }

    /// Opt-in calendar pass: recompute every status from the clock, then
    /// restore the canonical invariants.
    pub fn auto_infer_status<C: Clock + ?Sized>(&mut self, clock: &C) -> bool {
        let inferred = auto_infer_status_for_all(&mut self.rows, clock);
        let repaired = enforce_status_consistency(&mut self.rows);
        inferred || repaired
    }

    /// Current cap accounting without a pending insertion.
    pub fn cap_check(&self) -> CapCheck {
        check_cross_caps(self.track(Track::Adv), None, &self.policy)
    }

    /// Completed or transfer-credited rows plus external credit records,
    /// prepared for subject matching.
    pub fn exam_courses(&self) -> Vec<ExamCourse> {
        let internal = self
            .rows
            .iter()
            .filter(|row| row.is_transfer || row.status == CourseStatus::Done)
            .map(ExamCourse::from_row);
        let external = self.external_credits.iter().map(ExamCourse::from_external);

        internal
            .chain(external)
            .filter(|course| !course.name.is_empty() && course.credit > 0.0)
            .collect()
    }

    pub fn eligibility_engine(&self) -> EligibilityEngine {
        EligibilityEngine::new(&self.policy)
    }

    pub fn report(&self, options: &ReportOptions) -> ChecklistReport {
        ChecklistReport::build(self, options)
    }

    fn row_mut(&mut self, id: &RowId) -> Result<&mut CourseRow, ChecklistError> {
        self.rows
            .iter_mut()
            .find(|row| &row.id == id)
            .ok_or_else(|| ChecklistError::RowNotFound(id.clone()))
    }

    fn row_status(&self, id: &RowId) -> CourseStatus {
        self.get(id).map(|row| row.status).unwrap_or_default()
    }
}

fn admit_rows(rows: Vec<CourseRow>) -> Result<Vec<CourseRow>, ChecklistError> {
    rows.into_iter()
        .map(|row| {
            if is_term_input(&row.term) {
                Ok(prepare_row(row))
            } else {
                Err(ChecklistError::InvalidTerm(row.term))
            }
        })
        .collect()
}

/// Brings a single incoming row into shape before it joins the list.
fn prepare_row(mut row: CourseRow) -> CourseRow {
    if row.id.is_empty() {
        row.id = RowId::generate();
    }

    row.name = row.name.trim().to_string();
    row.term = row.term.trim().to_string();

    if row.term.is_empty() {
        if let Some((term, name)) = split_prefixed_name(&row.name) {
            if TermKey::parse(&term).is_some() {
                row.term = term;
                row.name = name;
            }
        }
    }

    if let Some(year) = row.term.strip_suffix('S') {
        row.is_smr = true;
        row.term = year.to_string();
    }

    if !row.grade.is_empty() {
        row.grade = clamp_grade(&row.grade);
    }
    if row.is_transfer {
        row.status = CourseStatus::Done;
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::checklist::credits::CapKind;
    use crate::workflows::checklist::domain::Program;
    use crate::workflows::checklist::term::FixedClock;
    use chrono::NaiveDate;

    fn checklist() -> Checklist {
        Checklist::new(CreditPolicy::default())
    }

    #[test]
    fn legacy_titles_are_split_on_import() {
        let rows = vec![
            CourseRow::new("113-2 Constitutional Law", Track::Base, 3.0),
            CourseRow::new("113-3 Oddity", Track::Base, 1.0),
        ];

        let checklist =
            Checklist::from_rows(rows, Vec::new(), CreditPolicy::default()).expect("valid rows");

        assert_eq!(checklist.rows()[0].term, "1132");
        assert_eq!(checklist.rows()[0].name, "Constitutional Law");
        assert_eq!(checklist.rows()[1].term, "");
        assert_eq!(checklist.rows()[1].name, "113-3 Oddity");
    }

    #[test]
    fn missing_ids_are_generated() {
        let mut row = CourseRow::new("Torts", Track::Adv, 2.0);
        row.id = RowId::default();

        let checklist =
            Checklist::from_rows(vec![row], Vec::new(), CreditPolicy::default()).expect("valid rows");

        assert!(!checklist.rows()[0].id.is_empty());
    }

    #[test]
    fn bulk_rows_reject_out_of_range_terms() {
        let rows = vec![CourseRow::new("Torts", Track::Adv, 2.0).with_term("1143")];
        let err = Checklist::from_rows(rows, Vec::new(), CreditPolicy::default())
            .expect_err("term 1143 rejected");
        assert!(matches!(err, ChecklistError::InvalidTerm(term) if term == "1143"));

        let mut checklist = checklist();
        checklist
            .add(CourseRow::new("Evidence", Track::Adv, 2.0).with_term("1141"))
            .expect("row added");
        let err = checklist
            .replace_rows(vec![
                CourseRow::new("Torts", Track::Adv, 2.0).with_term("1142"),
                CourseRow::new("Tax Law", Track::Adv, 2.0).with_term("1143"),
            ])
            .expect_err("term 1143 rejected");
        assert!(matches!(err, ChecklistError::InvalidTerm(_)));
        assert_eq!(checklist.rows().len(), 1);
        assert_eq!(checklist.rows()[0].name, "Evidence");
    }

    #[test]
    fn adding_a_planned_row_propagates_forward() {
        let mut checklist = checklist();
        let (later, _) = checklist
            .add(CourseRow::new("Evidence", Track::Adv, 2.0).with_term("1142").with_grade("80"))
            .expect("row added");
        checklist
            .add(
                CourseRow::new("Torts", Track::Adv, 2.0)
                    .with_term("1141")
                    .with_status(CourseStatus::Planned),
            )
            .expect("row added");

        let evidence = checklist.get(&later).expect("row kept");
        assert_eq!(evidence.status, CourseStatus::Planned);
        assert_eq!(evidence.grade, "");
    }

    #[test]
    fn summer_term_codes_become_summer_rows() {
        let mut checklist = checklist();
        let (id, _) = checklist
            .add(CourseRow::new("Legal Writing", Track::Adv, 2.0).with_term("114S"))
            .expect("row added");

        let row = checklist.get(&id).expect("row kept");
        assert!(row.is_smr);
        assert_eq!(row.term, "114");
    }

    #[test]
    fn invalid_terms_are_rejected() {
        let err = checklist()
            .add(CourseRow::new("Torts", Track::Adv, 2.0).with_term("fall"))
            .expect_err("term rejected");
        assert!(matches!(err, ChecklistError::InvalidTerm(term) if term == "fall"));
    }

    #[test]
    fn cap_warning_is_returned_but_row_is_kept() {
        let mut checklist = Checklist::new(CreditPolicy {
            cap_external: 3.0,
            ..CreditPolicy::default()
        });
        checklist
            .add(CourseRow::new("Finance", Track::Adv, 2.0).with_program(Program::ExternalCollege))
            .expect("row added");

        let (id, caps) = checklist
            .add(CourseRow::new("Accounting", Track::Adv, 2.0).with_program(Program::ExternalCollege))
            .expect("row added");

        assert_eq!(caps.warnings.len(), 1);
        assert_eq!(caps.warnings[0].cap, CapKind::External);
        assert!(checklist.get(&id).is_some());
        assert_eq!(checklist.cap_check().external, 4.0);
    }

    #[test]
    fn transfer_rows_cannot_be_planned() {
        let mut checklist = checklist();
        let (id, _) = checklist
            .add(CourseRow::new("Legal English", Track::Adv, 2.0).transfer())
            .expect("row added");

        let err = checklist
            .set_status(&id, CourseStatus::Planned)
            .expect_err("transfer locked");
        assert!(matches!(err, ChecklistError::TransferLocked(_)));
    }

    #[test]
    fn done_status_is_overridden_by_an_earlier_planned_term() {
        let mut checklist = checklist();
        checklist
            .add(
                CourseRow::new("Torts", Track::Adv, 2.0)
                    .with_term("1141")
                    .with_status(CourseStatus::Planned),
            )
            .expect("row added");
        let (id, _) = checklist
            .add(CourseRow::new("Evidence", Track::Adv, 2.0).with_term("1142"))
            .expect("row added");

        let status = checklist.set_status(&id, CourseStatus::Done).expect("row exists");

        assert_eq!(status, CourseStatus::Planned);
    }

    #[test]
    fn grades_are_clamped_and_refused_on_planned_rows() {
        let mut checklist = checklist();
        let (done, _) = checklist
            .add(CourseRow::new("Torts", Track::Adv, 2.0).with_term("1131"))
            .expect("row added");
        let (planned, _) = checklist
            .add(
                CourseRow::new("Evidence", Track::Adv, 2.0)
                    .with_term("1141")
                    .with_status(CourseStatus::Planned),
            )
            .expect("row added");

        assert_eq!(checklist.set_grade(&done, "104").expect("stored"), "100");
        assert!(matches!(
            checklist.set_grade(&planned, "80"),
            Err(ChecklistError::InvalidGrade { .. })
        ));
        assert!(matches!(
            checklist.set_grade(&RowId("missing".into()), "80"),
            Err(ChecklistError::RowNotFound(_))
        ));
    }

    #[test]
    fn remove_and_clear_track() {
        let mut checklist = checklist();
        let (id, _) = checklist
            .add(CourseRow::new("Torts", Track::Adv, 2.0))
            .expect("row added");
        checklist
            .add(CourseRow::new("Constitutional Law", Track::Base, 3.0))
            .expect("row added");

        assert_eq!(checklist.remove(&id).expect("removed").name, "Torts");
        assert!(checklist.remove(&id).is_err());
        assert_eq!(checklist.clear_track(Track::Base), 1);
        assert!(checklist.rows().is_empty());
    }

    #[test]
    fn clock_pass_is_followed_by_propagation() {
        let mut checklist = checklist();
        checklist
            .add(CourseRow::new("Torts", Track::Adv, 2.0).with_term("1141"))
            .expect("row added");
        checklist
            .add(CourseRow::new("Evidence", Track::Adv, 2.0).with_term("1142"))
            .expect("row added");

        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date"));
        assert!(checklist.auto_infer_status(&clock));

        assert!(checklist.rows().iter().all(|row| row.status.is_planned()));
    }

    #[test]
    fn exam_courses_include_done_rows_and_external_records() {
        let mut checklist = checklist();
        checklist
            .add(CourseRow::new("114-1 Company Law", Track::Adv, 3.0))
            .expect("row added");
        checklist
            .add(
                CourseRow::new("Tax Law", Track::Adv, 2.0)
                    .with_term("1142")
                    .with_status(CourseStatus::Planned),
            )
            .expect("row added");
        checklist
            .add(CourseRow::new("", Track::Adv, 2.0))
            .expect("row added");
        checklist.add_external_credit(ExternalCredit {
            source: "creditClass".to_string().into(),
            school: "Night School".to_string(),
            name: "Insurance Law".to_string(),
            credit: 2.0,
            grade: String::new(),
        });

        let courses = checklist.exam_courses();

        let names: Vec<&str> = courses.iter().map(|course| course.name.as_str()).collect();
        assert_eq!(names, vec!["Company Law", "Insurance Law"]);
        assert_eq!(courses[1].origin, "credit class - Night School");
    }
}
