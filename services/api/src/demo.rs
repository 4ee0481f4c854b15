use crate::infra::{clock_for, parse_date, parse_term};
use chrono::NaiveDate;
use clap::Args;
use lawcheck::config::AppConfig;
use lawcheck::error::AppError;
use lawcheck::workflows::checklist::{
    Checklist, ChecklistReport, CourseRow, CourseRowView, CreditPolicy, EligibilityVerdict,
    Program, ReportOptions, TermKey, Track,
};
use lawcheck::workflows::roster::RosterImporter;
use std::io::Cursor;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ChecklistReportArgs {
    /// Course roster CSV (name,term,credit,status,grade,track,program,source,...)
    #[arg(long)]
    pub(crate) courses: PathBuf,
    /// Optional external credit CSV (source,school,name,credit,grade)
    #[arg(long)]
    pub(crate) external: Option<PathBuf>,
    /// Evaluation date used by --auto-status (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Term whose planned courses are projected, e.g. 1142
    #[arg(long, value_parser = parse_term)]
    pub(crate) focus_term: Option<TermKey>,
    /// Recompute planned/done from the calendar before reporting
    #[arg(long)]
    pub(crate) auto_status: bool,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date for the clock-driven status pass (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Term whose planned courses are projected (defaults to 1142)
    #[arg(long, value_parser = parse_term)]
    pub(crate) focus_term: Option<TermKey>,
}

const DEMO_ROSTER: &str = "name,term,credit,status,grade,track,program,source,is_transfer,is_lang,is_smr\n\
Constitutional Law,1131,3,done,88,base,,,,,\n\
Civil Code - General Principles,1131,2,done,81,base,,,,,\n\
Civil Code - Obligations General,1132,2,done,77,base,,,,,\n\
Civil Code - Property,1132,2,done,84,base,,,,,\n\
Criminal Law,1132,3,done,79,base,,,,,\n\
Legal English,,2,,,adv,,,yes,yes,\n\
Company Law,1141,3,done,86,adv,法碩專班,,,,\n\
Civil Procedure,1141,3,done,80,adv,,,,,\n\
Labor Law,1141,2,done,83,adv,,,,,\n\
Bioethics and Law,1141,2,done,90,adv,科際整合法律學研究所,,,,\n\
Legal Writing,114,2,done,85,adv,,,,,yes\n\
Tax Law,1142,3,planned,,adv,,,,,\n\
Finance,1142,3,planned,,adv,跨院選修,external,,,\n";

const DEMO_EXTERNAL: &str = "source,school,name,credit,grade\n\
creditClass,Taipei Bar Association,Patent Law,3,A\n\
schoolCredit,Sister University,Copyright Law,3,B+\n";

pub(crate) fn run_checklist_report(args: ChecklistReportArgs) -> Result<(), AppError> {
    let ChecklistReportArgs {
        courses,
        external,
        today,
        focus_term,
        auto_status,
        json,
    } = args;

    let policy = AppConfig::load()?.policy;
    let mut checklist = RosterImporter::from_path(courses, policy)?;
    if let Some(path) = external {
        for credit in RosterImporter::external_from_path(path)? {
            checklist.add_external_credit(credit);
        }
    }
    if auto_status {
        checklist.auto_infer_status(clock_for(today).as_ref());
    }

    let report = checklist.report(&ReportOptions { focus_term });
    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_report(&report);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, focus_term } = args;
    let focus_term = focus_term.or_else(|| TermKey::parse("1142"));

    println!("Credit checklist demo");
    let mut checklist = demo_checklist(CreditPolicy::default())?;
    if today.is_some() {
        let changed = checklist.auto_infer_status(clock_for(today).as_ref());
        println!("Clock pass applied (rows changed: {})", yes_no(changed));
    }

    let (_, caps) = checklist.add(
        CourseRow::new("Accounting for Lawyers", Track::Adv, 3.0)
            .with_term("1142")
            .with_program(Program::ExternalCollege),
    )?;
    println!(
        "Added 'Accounting for Lawyers': {}",
        if caps.is_clear() {
            "within every cap".to_string()
        } else {
            caps.message()
        }
    );

    render_report(&checklist.report(&ReportOptions { focus_term }));
    Ok(())
}

fn demo_checklist(policy: CreditPolicy) -> Result<Checklist, AppError> {
    let mut checklist = RosterImporter::from_reader(Cursor::new(DEMO_ROSTER), policy)?;
    for credit in RosterImporter::external_from_reader(Cursor::new(DEMO_EXTERNAL))? {
        checklist.add_external_credit(credit);
    }
    Ok(checklist)
}

fn render_report(report: &ChecklistReport) {
    println!("\nFoundational courses");
    render_rows(&report.base_rows);
    println!("\nAdvanced courses");
    render_rows(&report.advanced_rows);

    println!("\nCredits");
    println!(
        "- Foundational: {} (internal {}, transfer {})",
        report.base_credits.total, report.base_credits.internal, report.base_credits.transfer
    );
    println!("- Advanced: {}", report.advanced_credits.grand_total);
    for bucket in &report.advanced_buckets {
        println!("    {}: {}", bucket.label, bucket.credits);
    }
    if let Some(message) = &report.cap_message {
        println!("- Cap warning: {message}");
    }

    println!("\nGrades");
    println!("- Overall average: {}", average(report.overall_average.average));
    if let Some(term) = &report.term_average {
        println!("- Focus term average: {}", average(term.average));
    }

    let graduation = &report.graduation;
    println!("\nGraduation ({} credits required)", graduation.graduation_credits);
    println!(
        "- Earned: {} (remaining {})",
        graduation.earned.total, graduation.earned_remaining
    );
    if let Some(term) = graduation.focus_term {
        println!(
            "- Planned in {}: {} (projected {}, remaining {})",
            term.label(),
            graduation.planned.total,
            graduation.projected_total,
            graduation.projected_remaining
        );
    }
    println!(
        "- External credit counted: {} earned, {} planned{}",
        graduation.external_counted_earned,
        graduation.external_counted_planned,
        if graduation.external_cap_reached {
            " (cap reached)"
        } else {
            ""
        }
    );

    render_verdict(&report.judge);
    render_verdict(&report.lawyer);
}

fn render_rows(rows: &[CourseRowView]) {
    if rows.is_empty() {
        println!("- none");
        return;
    }
    for row in rows {
        println!("- {} [{} cr] {}", row.display_name, row.credit, row.grade_cell);
    }
}

fn render_verdict(verdict: &EligibilityVerdict) {
    println!(
        "\n{}: {} ({} subjects, {} counted credits)",
        verdict.exam.label(),
        if verdict.pass { "eligible" } else { "not yet eligible" },
        verdict.satisfied_count,
        verdict.total_counted_credits
    );
    if let Some(must_have) = verdict.must_have {
        println!("- Civil, criminal and procedure present: {}", yes_no(must_have));
    }
    for subject in verdict
        .subjects
        .iter()
        .filter(|subject| subject.raw_sum > 0.0)
    {
        println!(
            "- {} {} ({}): {} of {} credits | {}",
            if subject.satisfied { "O" } else { "X" },
            subject.label,
            subject.native,
            subject.counted,
            subject.raw_sum,
            subject.used.join("; ")
        );
    }
}

fn average(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |average| format!("{average:.2}"))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
