use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque identity of whoever invokes a registry operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential, 1-based applicant identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub u64);

/// Sequential, 1-based job identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an id inside its table, or `None` when the id was never assigned.
pub(crate) fn slot(id: u64, len: usize) -> Option<usize> {
    let index = usize::try_from(id.checked_sub(1)?).ok()?;
    (index < len).then_some(index)
}

/// Desired work arrangement recorded against an applicant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkPreference {
    #[default]
    NotSpecified,
    Remote,
    Wfh,
    Hybrid,
}

impl WorkPreference {
    pub const fn label(self) -> &'static str {
        match self {
            WorkPreference::NotSpecified => "not_specified",
            WorkPreference::Remote => "remote",
            WorkPreference::Wfh => "wfh",
            WorkPreference::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for WorkPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown work preference '{0}' (expected not_specified, remote, wfh or hybrid)")]
pub struct UnknownWorkPreference(pub String);

impl FromStr for WorkPreference {
    type Err = UnknownWorkPreference;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "" | "not_specified" | "notspecified" | "none" => Ok(Self::NotSpecified),
            "remote" => Ok(Self::Remote),
            "wfh" | "work_from_home" => Ok(Self::Wfh),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(UnknownWorkPreference(raw.to_string())),
        }
    }
}

/// Profile details supplied by the admin when registering a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRegistration {
    pub name: String,
    pub skills: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub work_preference: WorkPreference,
}

/// Opening details supplied by the admin when posting a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    pub salary: u64,
}

/// Registered candidate profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub skills: String,
    pub phone: String,
    pub email: String,
    pub rating: u64,
    pub work_preference: WorkPreference,
}

impl Applicant {
    pub(crate) fn register(id: ApplicantId, registration: ApplicantRegistration) -> Self {
        let ApplicantRegistration {
            name,
            skills,
            phone,
            email,
            work_preference: _,
        } = registration;

        Self {
            id,
            name,
            skills,
            phone,
            email,
            rating: 0,
            work_preference: WorkPreference::NotSpecified,
        }
    }
}

/// Posted opening. `filled` only ever moves from false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub salary: u64,
    pub applicant_id: Option<ApplicantId>,
    pub filled: bool,
}

impl Job {
    pub(crate) fn post(id: JobId, posting: JobPosting) -> Self {
        Self {
            id,
            title: posting.title,
            description: posting.description,
            salary: posting.salary,
            applicant_id: None,
            filled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_rejects_zero_and_out_of_range_ids() {
        assert_eq!(slot(0, 3), None);
        assert_eq!(slot(1, 3), Some(0));
        assert_eq!(slot(3, 3), Some(2));
        assert_eq!(slot(4, 3), None);
        assert_eq!(slot(1, 0), None);
    }

    #[test]
    fn work_preference_parses_loose_labels() {
        assert_eq!("Remote".parse::<WorkPreference>(), Ok(WorkPreference::Remote));
        assert_eq!(" WFH ".parse::<WorkPreference>(), Ok(WorkPreference::Wfh));
        assert_eq!("".parse::<WorkPreference>(), Ok(WorkPreference::NotSpecified));
        assert_eq!(
            "not-specified".parse::<WorkPreference>(),
            Ok(WorkPreference::NotSpecified)
        );
        assert!("office".parse::<WorkPreference>().is_err());
    }

    #[test]
    fn work_preference_serializes_snake_case() {
        let json = serde_json::to_string(&WorkPreference::NotSpecified).expect("serializes");
        assert_eq!(json, "\"not_specified\"");
        let parsed: WorkPreference = serde_json::from_str("\"hybrid\"").expect("parses");
        assert_eq!(parsed, WorkPreference::Hybrid);
    }
}
