use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::domain::{
    slot, Applicant, ApplicantId, ApplicantRegistration, Identity, Job, JobId, JobPosting,
    WorkPreference,
};
use super::events::{EventError, EventPublisher, RegistryEvent};
use super::roster::Roster;

/// Highest rating accepted by a single `provide_rating` call.
pub const MAX_RATING: u32 = 5;

/// Admin-gated ledger of job openings, applicant profiles and applications.
///
/// Every operation runs under one lock and follows validate, notify, commit, so a rejected
/// operation or a failed notification leaves the tables untouched.
pub struct Registry<P> {
    admin: Identity,
    tables: Mutex<Tables>,
    events: Arc<P>,
}

#[derive(Debug, Default)]
struct Tables {
    applicants: Vec<Applicant>,
    jobs: Vec<Job>,
    applications: HashSet<(Identity, JobId)>,
}

impl Tables {
    fn applicant(&self, id: ApplicantId) -> Result<&Applicant, RegistryError> {
        slot(id.0, self.applicants.len())
            .map(|index| &self.applicants[index])
            .ok_or(RegistryError::NotFound(RecordRef::Applicant(id)))
    }

    fn applicant_mut(&mut self, id: ApplicantId) -> Result<&mut Applicant, RegistryError> {
        let index = slot(id.0, self.applicants.len())
            .ok_or(RegistryError::NotFound(RecordRef::Applicant(id)))?;
        Ok(&mut self.applicants[index])
    }

    fn job(&self, id: JobId) -> Result<&Job, RegistryError> {
        slot(id.0, self.jobs.len())
            .map(|index| &self.jobs[index])
            .ok_or(RegistryError::NotFound(RecordRef::Job(id)))
    }

    fn job_mut(&mut self, id: JobId) -> Result<&mut Job, RegistryError> {
        let index =
            slot(id.0, self.jobs.len()).ok_or(RegistryError::NotFound(RecordRef::Job(id)))?;
        Ok(&mut self.jobs[index])
    }

    fn next_applicant_id(&self) -> ApplicantId {
        ApplicantId(self.applicants.len() as u64 + 1)
    }

    fn next_job_id(&self) -> JobId {
        JobId(self.jobs.len() as u64 + 1)
    }

    /// Registration without a caller check. Shared by the admin path and roster seeding.
    fn register_applicant<P: EventPublisher + ?Sized>(
        &mut self,
        events: &P,
        registration: ApplicantRegistration,
    ) -> Result<ApplicantId, RegistryError> {
        let id = self.next_applicant_id();
        let preference = registration.work_preference;

        events.publish(RegistryEvent::ApplicantRegistered {
            applicant_id: id,
            name: registration.name.clone(),
            work_preference: preference,
        })?;

        self.applicants.push(Applicant::register(id, registration));
        self.assign_work_preference(id, preference)?;
        Ok(id)
    }

    fn post_job<P: EventPublisher + ?Sized>(
        &mut self,
        events: &P,
        posting: JobPosting,
    ) -> Result<JobId, RegistryError> {
        let id = self.next_job_id();

        events.publish(RegistryEvent::JobPosted {
            job_id: id,
            title: posting.title.clone(),
            salary: posting.salary,
        })?;

        self.jobs.push(Job::post(id, posting));
        Ok(id)
    }

    fn seed_roster<P: EventPublisher + ?Sized>(
        &mut self,
        events: &P,
        roster: Roster,
    ) -> Result<SeedSummary, RegistryError> {
        let mut summary = SeedSummary::default();
        for registration in roster.applicants {
            summary
                .applicants
                .push(self.register_applicant(events, registration)?);
        }
        for posting in roster.jobs {
            summary.jobs.push(self.post_job(events, posting)?);
        }
        Ok(summary)
    }

    /// The work preference write itself. No caller check and no notification: callers on the
    /// admin path notify, registration announces the preference in `ApplicantRegistered`.
    fn assign_work_preference(
        &mut self,
        id: ApplicantId,
        preference: WorkPreference,
    ) -> Result<(), RegistryError> {
        self.applicant_mut(id)?.work_preference = preference;
        Ok(())
    }
}

impl<P> Registry<P>
where
    P: EventPublisher + 'static,
{
    /// Creates an empty registry administered by `admin` for its whole lifetime.
    pub fn new(admin: Identity, events: Arc<P>) -> Self {
        Self {
            admin,
            tables: Mutex::new(Tables::default()),
            events,
        }
    }

    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    pub fn is_admin(&self, caller: &Identity) -> bool {
        caller == &self.admin
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("registry mutex poisoned")
    }

    fn transact<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut Tables, &P) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut tables = self.tables();
        let result = apply(&mut *tables, self.events.as_ref());
        if let Err(err) = &result {
            warn!(operation, error = %err, "registry operation rejected");
        }
        result
    }

    fn require_admin(&self, caller: &Identity, action: &'static str) -> Result<(), RegistryError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                caller: caller.clone(),
                action,
            })
        }
    }

    /// Register a candidate profile. Admin only.
    pub fn add_applicant(
        &self,
        caller: &Identity,
        registration: ApplicantRegistration,
    ) -> Result<ApplicantId, RegistryError> {
        self.transact("add_applicant", |tables, events| {
            self.require_admin(caller, "register applicants")?;
            let id = tables.register_applicant(events, registration)?;
            info!(applicant_id = %id, "applicant registered");
            Ok(id)
        })
    }

    /// Post a job opening. Admin only.
    pub fn add_job(&self, caller: &Identity, posting: JobPosting) -> Result<JobId, RegistryError> {
        self.transact("add_job", |tables, events| {
            self.require_admin(caller, "post jobs")?;
            let id = tables.post_job(events, posting)?;
            info!(job_id = %id, "job posted");
            Ok(id)
        })
    }

    /// Record that `caller` applied to `job_id` as applicant `applicant_id`.
    ///
    /// The admin cannot apply. Each caller may apply to a given job once.
    pub fn apply_for_job(
        &self,
        caller: &Identity,
        job_id: JobId,
        applicant_id: ApplicantId,
    ) -> Result<(), RegistryError> {
        self.transact("apply_for_job", |tables, events| {
            if self.is_admin(caller) {
                return Err(RegistryError::Unauthorized {
                    caller: caller.clone(),
                    action: "apply for jobs",
                });
            }

            let job = tables.job(job_id)?;
            tables.applicant(applicant_id)?;
            if job.filled {
                return Err(RegistryError::AlreadyFilled(job_id));
            }

            let key = (caller.clone(), job_id);
            if tables.applications.contains(&key) {
                return Err(RegistryError::DuplicateApplication {
                    caller: caller.clone(),
                    job_id,
                });
            }

            events.publish(RegistryEvent::ApplicationSubmitted {
                job_id,
                applicant_id,
                caller: caller.clone(),
            })?;
            tables.applications.insert(key);

            info!(%caller, job_id = %job_id, applicant_id = %applicant_id, "application submitted");
            Ok(())
        })
    }

    /// Fill `job_id` with `applicant_id` and award the hire bonus. Admin only.
    pub fn hire_applicant(
        &self,
        caller: &Identity,
        job_id: JobId,
        applicant_id: ApplicantId,
    ) -> Result<(), RegistryError> {
        self.transact("hire_applicant", |tables, events| {
            self.require_admin(caller, "hire applicants")?;

            let job = tables.job(job_id)?;
            tables.applicant(applicant_id)?;
            if job.filled {
                return Err(RegistryError::AlreadyFilled(job_id));
            }

            events.publish(RegistryEvent::ApplicantHired {
                job_id,
                applicant_id,
            })?;

            let job = tables.job_mut(job_id)?;
            job.applicant_id = Some(applicant_id);
            job.filled = true;
            let applicant = tables.applicant_mut(applicant_id)?;
            applicant.rating = applicant.rating.saturating_add(1);

            info!(job_id = %job_id, applicant_id = %applicant_id, "applicant hired");
            Ok(())
        })
    }

    /// Add `rating` to the applicant's accumulated rating. Admin only.
    pub fn provide_rating(
        &self,
        caller: &Identity,
        applicant_id: ApplicantId,
        rating: u32,
    ) -> Result<(), RegistryError> {
        self.transact("provide_rating", |tables, events| {
            self.require_admin(caller, "rate applicants")?;

            let current = tables.applicant(applicant_id)?.rating;
            if rating > MAX_RATING {
                return Err(RegistryError::InvalidRating {
                    rating,
                    max: MAX_RATING,
                });
            }

            let total = current.saturating_add(u64::from(rating));
            events.publish(RegistryEvent::RatingRecorded {
                applicant_id,
                rating,
                total,
            })?;
            tables.applicant_mut(applicant_id)?.rating = total;

            info!(applicant_id = %applicant_id, rating, total, "rating recorded");
            Ok(())
        })
    }

    /// Overwrite the applicant's work preference. Admin only; the registry itself writes
    /// preferences through its internal path during registration and seeding.
    pub fn update_work_preference(
        &self,
        caller: &Identity,
        applicant_id: ApplicantId,
        preference: WorkPreference,
    ) -> Result<(), RegistryError> {
        self.transact("update_work_preference", |tables, events| {
            self.require_admin(caller, "change work preferences")?;
            tables.applicant(applicant_id)?;

            events.publish(RegistryEvent::WorkPreferenceChanged {
                applicant_id,
                work_preference: preference,
            })?;
            tables.assign_work_preference(applicant_id, preference)?;

            info!(applicant_id = %applicant_id, %preference, "work preference changed");
            Ok(())
        })
    }

    /// Register every roster entry on the registry's own behalf.
    ///
    /// Stops at the first failed notification and drops every entry the roster added.
    pub fn seed(&self, roster: Roster) -> Result<SeedSummary, RegistryError> {
        self.transact("seed", |tables, events| {
            let applicants_before = tables.applicants.len();
            let jobs_before = tables.jobs.len();

            let seeded = tables.seed_roster(events, roster);
            if seeded.is_err() {
                tables.applicants.truncate(applicants_before);
                tables.jobs.truncate(jobs_before);
            }
            let summary = seeded?;

            info!(
                applicants = summary.applicants.len(),
                jobs = summary.jobs.len(),
                "roster seeded"
            );
            Ok(summary)
        })
    }

    pub fn get_applicant(&self, applicant_id: ApplicantId) -> Result<Applicant, RegistryError> {
        self.tables().applicant(applicant_id).cloned()
    }

    pub fn get_job(&self, job_id: JobId) -> Result<Job, RegistryError> {
        self.tables().job(job_id).cloned()
    }

    pub fn get_applicant_rating(&self, applicant_id: ApplicantId) -> Result<u64, RegistryError> {
        Ok(self.tables().applicant(applicant_id)?.rating)
    }

    /// The applicant's work preference.
    pub fn get_applicant_type(
        &self,
        applicant_id: ApplicantId,
    ) -> Result<WorkPreference, RegistryError> {
        Ok(self.tables().applicant(applicant_id)?.work_preference)
    }

    pub fn list_applicants(&self) -> Vec<Applicant> {
        self.tables().applicants.clone()
    }

    pub fn list_jobs(&self) -> Vec<Job> {
        self.tables().jobs.clone()
    }

    pub fn has_applied(&self, caller: &Identity, job_id: JobId) -> Result<bool, RegistryError> {
        let tables = self.tables();
        tables.job(job_id)?;
        let applied = tables.applications.contains(&(caller.clone(), job_id));
        debug!(%caller, job_id = %job_id, applied, "application lookup");
        Ok(applied)
    }
}

/// Ids assigned while seeding a roster, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedSummary {
    pub applicants: Vec<ApplicantId>,
    pub jobs: Vec<JobId>,
}

/// Table entry referenced by a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Applicant(ApplicantId),
    Job(JobId),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Applicant(id) => write!(f, "applicant {id}"),
            RecordRef::Job(id) => write!(f, "job {id}"),
        }
    }
}

/// Error raised by registry operations. No variant leaves a partial write behind.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("caller '{caller}' is not permitted to {action}")]
    Unauthorized {
        caller: Identity,
        action: &'static str,
    },
    #[error("{0} does not exist")]
    NotFound(RecordRef),
    #[error("job {0} is already filled")]
    AlreadyFilled(JobId),
    #[error("caller '{caller}' already applied to job {job_id}")]
    DuplicateApplication { caller: Identity, job_id: JobId },
    #[error("rating {rating} exceeds the maximum of {max}")]
    InvalidRating { rating: u32, max: u32 },
    #[error(transparent)]
    Notification(#[from] EventError),
}

impl RegistryError {
    pub const fn label(&self) -> &'static str {
        match self {
            RegistryError::Unauthorized { .. } => "unauthorized",
            RegistryError::NotFound(_) => "not_found",
            RegistryError::AlreadyFilled(_) => "already_filled",
            RegistryError::DuplicateApplication { .. } => "duplicate_application",
            RegistryError::InvalidRating { .. } => "invalid_rating",
            RegistryError::Notification(_) => "notification_failed",
        }
    }
}
