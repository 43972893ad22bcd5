use std::io::Cursor;

use crate::registry::domain::WorkPreference;
use crate::registry::roster::{Roster, RosterError};

const APPLICANTS: &str = "name,skills,phone,email,preference\n\
Alice, rust, +1-515-555-0100, alice@example.com, remote\n\
Bob,go,,bob@example.com,\n";

const JOBS: &str = "title,description,salary\n\
Engineer,Backend services,120000\n\
Designer,,90000\n";

#[test]
fn parses_applicant_rows_with_trimmed_fields() {
    let applicants =
        Roster::applicants_from_reader(Cursor::new(APPLICANTS)).expect("applicants parse");

    assert_eq!(applicants.len(), 2);
    assert_eq!(applicants[0].name, "Alice");
    assert_eq!(applicants[0].skills, "rust");
    assert_eq!(applicants[0].work_preference, WorkPreference::Remote);
    assert_eq!(applicants[1].phone, "");
    assert_eq!(applicants[1].work_preference, WorkPreference::NotSpecified);
}

#[test]
fn parses_job_rows() {
    let jobs = Roster::jobs_from_reader(Cursor::new(JOBS)).expect("jobs parse");

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].title, "Engineer");
    assert_eq!(jobs[0].salary, 120_000);
    assert_eq!(jobs[1].description, "");
}

#[test]
fn unknown_preference_reports_row() {
    let csv = "name,skills,phone,email,preference\nAlice,,,,remote\nBob,,,,office\n";

    match Roster::applicants_from_reader(Cursor::new(csv)) {
        Err(RosterError::Preference { row, source }) => {
            assert_eq!(row, 2);
            assert_eq!(source.0, "office");
        }
        other => panic!("expected preference error, got {other:?}"),
    }
}

#[test]
fn non_numeric_salary_is_a_csv_error() {
    let csv = "title,description,salary\nEngineer,Backend,lots\n";

    assert!(matches!(
        Roster::jobs_from_reader(Cursor::new(csv)),
        Err(RosterError::Csv(_))
    ));
}

#[test]
fn missing_paths_yield_empty_roster() {
    let roster = Roster::from_paths(None, None).expect("nothing to load");
    assert!(roster.is_empty());
}

#[test]
fn unreadable_path_is_an_io_error() {
    let missing = std::path::Path::new("/nonexistent/hiring-ledger/applicants.csv");
    assert!(matches!(
        Roster::from_paths(Some(missing), None),
        Err(RosterError::Io(_))
    ));
}
