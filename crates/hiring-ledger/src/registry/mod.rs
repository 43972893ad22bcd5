//! Admin-gated registry of job openings, applicant profiles and job applications.
//!
//! `Registry` owns the tables and enforces identity, authorization and referential integrity;
//! every accepted mutation emits one [`RegistryEvent`] through an [`EventPublisher`]. The router
//! exposes the same calls over HTTP and the roster module seeds the tables from CSV.

pub mod domain;
pub mod events;
pub mod roster;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ApplicantId, ApplicantRegistration, Identity, Job, JobId, JobPosting,
    UnknownWorkPreference, WorkPreference,
};
pub use events::{DiscardEvents, EventError, EventPublisher, RegistryEvent};
pub use roster::{Roster, RosterError};
pub use router::{
    registry_router, ApplyRequest, HireRequest, PreferenceRequest, RatingRequest, RecordId,
    CALLER_HEADER,
};
pub use service::{RecordRef, Registry, RegistryError, SeedSummary, MAX_RATING};
