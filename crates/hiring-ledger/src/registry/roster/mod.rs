//! CSV roster of applicants and jobs that the registry registers on its own behalf at start-up.

mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::{ApplicantRegistration, JobPosting, UnknownWorkPreference, WorkPreference};

#[derive(Debug)]
pub enum RosterError {
    Io(std::io::Error),
    Csv(csv::Error),
    Preference {
        row: usize,
        source: UnknownWorkPreference,
    },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Io(err) => write!(f, "failed to read roster file: {}", err),
            RosterError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterError::Preference { row, source } => {
                write!(f, "applicant row {}: {}", row, source)
            }
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Io(err) => Some(err),
            RosterError::Csv(err) => Some(err),
            RosterError::Preference { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Applicants and jobs to seed, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub applicants: Vec<ApplicantRegistration>,
    pub jobs: Vec<JobPosting>,
}

impl Roster {
    /// Loads whichever roster files are given. Missing paths contribute nothing.
    pub fn from_paths(
        applicants: Option<&Path>,
        jobs: Option<&Path>,
    ) -> Result<Self, RosterError> {
        let mut roster = Roster::default();
        if let Some(path) = applicants {
            roster.applicants = Self::applicants_from_reader(std::fs::File::open(path)?)?;
        }
        if let Some(path) = jobs {
            roster.jobs = Self::jobs_from_reader(std::fs::File::open(path)?)?;
        }
        Ok(roster)
    }

    /// Columns: `name,skills,phone,email,preference`. A blank preference means not specified.
    pub fn applicants_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<ApplicantRegistration>, RosterError> {
        parser::parse_applicant_rows(reader)?
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let work_preference = match row.preference.as_deref() {
                    Some(raw) => raw
                        .parse::<WorkPreference>()
                        .map_err(|source| RosterError::Preference {
                            row: index + 1,
                            source,
                        })?,
                    None => WorkPreference::NotSpecified,
                };

                Ok(ApplicantRegistration {
                    name: row.name,
                    skills: row.skills,
                    phone: row.phone,
                    email: row.email,
                    work_preference,
                })
            })
            .collect()
    }

    /// Columns: `title,description,salary`.
    pub fn jobs_from_reader<R: Read>(reader: R) -> Result<Vec<JobPosting>, RosterError> {
        Ok(parser::parse_job_rows(reader)?
            .into_iter()
            .map(|row| JobPosting {
                title: row.title,
                description: row.description,
                salary: row.salary,
            })
            .collect())
    }

    pub fn is_empty(&self) -> bool {
        self.applicants.is_empty() && self.jobs.is_empty()
    }
}
