use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::registry::domain::{ApplicantRegistration, Identity, JobPosting, WorkPreference};
use crate::registry::events::{EventError, EventPublisher, RegistryEvent};
use crate::registry::{registry_router, Registry};

pub(super) fn admin() -> Identity {
    Identity::new("admin")
}

pub(super) fn candidate() -> Identity {
    Identity::new("alice-wallet")
}

pub(super) fn registration(name: &str) -> ApplicantRegistration {
    ApplicantRegistration {
        name: name.to_string(),
        skills: "rust, sql".to_string(),
        phone: "+1-515-555-0100".to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase()),
        work_preference: WorkPreference::Remote,
    }
}

pub(super) fn posting(title: &str) -> JobPosting {
    JobPosting {
        title: title.to_string(),
        description: format!("{title} opening"),
        salary: 120_000,
    }
}

pub(super) fn build_registry() -> (Registry<MemoryEvents>, Arc<MemoryEvents>) {
    let events = Arc::new(MemoryEvents::default());
    let registry = Registry::new(admin(), events.clone());
    (registry, events)
}

/// Registry with applicant 1 ("Alice") and job 1 ("Engineer").
pub(super) fn seeded_registry() -> (Registry<MemoryEvents>, Arc<MemoryEvents>) {
    let (registry, events) = build_registry();
    registry
        .add_applicant(&admin(), registration("Alice"))
        .expect("admin registers applicant");
    registry
        .add_job(&admin(), posting("Engineer"))
        .expect("admin posts job");
    (registry, events)
}

#[derive(Default, Clone)]
pub(super) struct MemoryEvents {
    events: Arc<Mutex<Vec<RegistryEvent>>>,
}

impl MemoryEvents {
    pub(super) fn events(&self) -> Vec<RegistryEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }

    pub(super) fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(RegistryEvent::name).collect()
    }
}

impl EventPublisher for MemoryEvents {
    fn publish(&self, event: RegistryEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
        Ok(())
    }
}

/// Publisher whose transport is down.
pub(super) struct OfflineEvents;

impl EventPublisher for OfflineEvents {
    fn publish(&self, _event: RegistryEvent) -> Result<(), EventError> {
        Err(EventError::Transport("audit sink offline".to_string()))
    }
}

pub(super) fn router_with_registry(registry: Registry<MemoryEvents>) -> axum::Router {
    registry_router(Arc::new(registry))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Publisher whose transport drops exactly one event, the `position`-th (zero based).
pub(super) struct DropsEventAt {
    position: usize,
    seen: Mutex<usize>,
}

impl DropsEventAt {
    pub(super) fn new(position: usize) -> Self {
        Self {
            position,
            seen: Mutex::new(0),
        }
    }
}

impl EventPublisher for DropsEventAt {
    fn publish(&self, _event: RegistryEvent) -> Result<(), EventError> {
        let mut seen = self.seen.lock().expect("counter mutex poisoned");
        let current = *seen;
        *seen += 1;
        if current == self.position {
            return Err(EventError::Transport("audit sink went down".to_string()));
        }
        Ok(())
    }
}
