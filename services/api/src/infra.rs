use chrono::{DateTime, Utc};
use hiring_ledger::registry::{EventError, EventPublisher, RegistryEvent};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) audit: Arc<AuditLog>,
}

/// One registry notification as observed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AuditEntry {
    pub(crate) sequence: u64,
    pub(crate) recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) event: RegistryEvent,
}

/// Append-only in-memory audit trail that also mirrors every event into the log.
#[derive(Default)]
pub(crate) struct AuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl AuditLog {
    pub(crate) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().expect("audit mutex poisoned").len()
    }
}

impl EventPublisher for AuditLog {
    fn publish(&self, event: RegistryEvent) -> Result<(), EventError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| EventError::Transport("audit log poisoned".to_string()))?;
        let sequence = guard.len() as u64 + 1;
        info!(sequence, event = event.name(), "registry event");
        guard.push(AuditEntry {
            sequence,
            recorded_at: Utc::now(),
            event,
        });
        Ok(())
    }
}
