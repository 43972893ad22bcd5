use serde::{Deserialize, Serialize};

use super::domain::{ApplicantId, Identity, JobId, WorkPreference};

/// Notification emitted once per successful registry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    ApplicantRegistered {
        applicant_id: ApplicantId,
        name: String,
        work_preference: WorkPreference,
    },
    JobPosted {
        job_id: JobId,
        title: String,
        salary: u64,
    },
    ApplicationSubmitted {
        job_id: JobId,
        applicant_id: ApplicantId,
        caller: Identity,
    },
    ApplicantHired {
        job_id: JobId,
        applicant_id: ApplicantId,
    },
    RatingRecorded {
        applicant_id: ApplicantId,
        rating: u32,
        total: u64,
    },
    WorkPreferenceChanged {
        applicant_id: ApplicantId,
        work_preference: WorkPreference,
    },
}

impl RegistryEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            RegistryEvent::ApplicantRegistered { .. } => "applicant_registered",
            RegistryEvent::JobPosted { .. } => "job_posted",
            RegistryEvent::ApplicationSubmitted { .. } => "application_submitted",
            RegistryEvent::ApplicantHired { .. } => "applicant_hired",
            RegistryEvent::RatingRecorded { .. } => "rating_recorded",
            RegistryEvent::WorkPreferenceChanged { .. } => "work_preference_changed",
        }
    }
}

/// Outbound hook for registry notifications (audit log, message bus, ...).
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: RegistryEvent) -> Result<(), EventError>;
}

/// Event dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}

/// Publisher that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardEvents;

impl EventPublisher for DiscardEvents {
    fn publish(&self, _event: RegistryEvent) -> Result<(), EventError> {
        Ok(())
    }
}
