//! End-to-end hiring scenarios driven through the public registry facade and HTTP router.

mod common {
    use std::sync::{Arc, Mutex};

    use hiring_ledger::registry::{
        ApplicantRegistration, EventError, EventPublisher, Identity, JobPosting, Registry,
        RegistryEvent, WorkPreference,
    };

    pub(super) fn admin() -> Identity {
        Identity::new("hr-admin")
    }

    pub(super) fn alice_registration() -> ApplicantRegistration {
        ApplicantRegistration {
            name: "Alice".to_string(),
            skills: "rust, distributed systems".to_string(),
            phone: "+1-515-555-0142".to_string(),
            email: "alice@example.com".to_string(),
            work_preference: WorkPreference::Hybrid,
        }
    }

    pub(super) fn engineer_posting() -> JobPosting {
        JobPosting {
            title: "Engineer".to_string(),
            description: "Build the hiring platform".to_string(),
            salary: 135_000,
        }
    }

    #[derive(Default)]
    pub(super) struct RecordingPublisher {
        events: Mutex<Vec<RegistryEvent>>,
    }

    impl RecordingPublisher {
        pub(super) fn events(&self) -> Vec<RegistryEvent> {
            self.events.lock().expect("event mutex poisoned").clone()
        }
    }

    impl EventPublisher for RecordingPublisher {
        fn publish(&self, event: RegistryEvent) -> Result<(), EventError> {
            self.events
                .lock()
                .expect("event mutex poisoned")
                .push(event);
            Ok(())
        }
    }

    pub(super) fn registry() -> (Arc<Registry<RecordingPublisher>>, Arc<RecordingPublisher>) {
        let publisher = Arc::new(RecordingPublisher::default());
        let registry = Arc::new(Registry::new(admin(), publisher.clone()));
        (registry, publisher)
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::*;
use hiring_ledger::registry::{
    registry_router, ApplicantId, Identity, JobId, RegistryError, RegistryEvent, Roster,
    CALLER_HEADER,
};
use serde_json::{json, Value};
use std::io::Cursor;
use tower::ServiceExt;

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json payload")
    };
    (status, value)
}

fn post(uri: &str, caller: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(CALLER_HEADER, caller)
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[test]
fn alice_is_hired_for_engineer() {
    let (registry, publisher) = registry();
    let caller = Identity::new("alice-wallet");

    let alice = registry
        .add_applicant(&admin(), alice_registration())
        .expect("admin registers Alice");
    let engineer = registry
        .add_job(&admin(), engineer_posting())
        .expect("admin posts Engineer");
    assert_eq!(alice, ApplicantId(1));
    assert_eq!(engineer, JobId(1));

    registry
        .apply_for_job(&caller, engineer, alice)
        .expect("Alice applies");
    registry
        .hire_applicant(&admin(), engineer, alice)
        .expect("admin hires Alice");

    let job = registry.get_job(engineer).expect("job exists");
    assert!(job.filled);
    assert_eq!(job.applicant_id, Some(alice));
    assert_eq!(registry.get_applicant_rating(alice).expect("rating"), 1);

    let events = publisher.events();
    assert_eq!(events.len(), 4);
    assert!(matches!(
        &events[2],
        RegistryEvent::ApplicationSubmitted { caller: who, .. } if who == &caller
    ));
}

#[test]
fn rejected_operations_do_not_change_state() {
    let (registry, publisher) = registry();
    let outsider = Identity::new("outsider");

    assert!(matches!(
        registry.add_applicant(&outsider, alice_registration()),
        Err(RegistryError::Unauthorized { .. })
    ));
    assert!(matches!(
        registry.add_job(&outsider, engineer_posting()),
        Err(RegistryError::Unauthorized { .. })
    ));
    assert!(matches!(
        registry.get_applicant(ApplicantId(1)),
        Err(RegistryError::NotFound(_))
    ));
    assert!(registry.list_applicants().is_empty());
    assert!(registry.list_jobs().is_empty());
    assert!(publisher.events().is_empty());
}

#[test]
fn roster_seeding_precedes_admin_registrations() {
    let (registry, _) = registry();
    let applicants = Roster::applicants_from_reader(Cursor::new(
        "name,skills,phone,email,preference\nBob,go,,bob@example.com,wfh\n",
    ))
    .expect("applicants parse");
    let jobs = Roster::jobs_from_reader(Cursor::new(
        "title,description,salary\nDesigner,Design system,95000\n",
    ))
    .expect("jobs parse");

    let summary = registry
        .seed(Roster { applicants, jobs })
        .expect("roster seeds");
    assert_eq!(summary.applicants, vec![ApplicantId(1)]);

    let alice = registry
        .add_applicant(&admin(), alice_registration())
        .expect("admin registers Alice");
    assert_eq!(alice, ApplicantId(2));
    let engineer = registry
        .add_job(&admin(), engineer_posting())
        .expect("admin posts Engineer");
    assert_eq!(engineer, JobId(2));
}

#[tokio::test]
async fn http_surface_covers_the_hiring_flow() {
    let (registry, _) = registry();
    let app = registry_router(registry);

    let (status, body) = send(
        &app,
        post(
            "/api/v1/applicants",
            "hr-admin",
            serde_json::to_value(alice_registration()).expect("json"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "applicant_id": 1 }));

    let (status, _) = send(
        &app,
        post(
            "/api/v1/jobs",
            "hr-admin",
            serde_json::to_value(engineer_posting()).expect("json"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        post(
            "/api/v1/jobs/1/applications",
            "alice-wallet",
            json!({ "applicant_id": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        post("/api/v1/jobs/1/hire", "hr-admin", json!({ "applicant_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filled"], true);

    let (status, body) = send(&app, get("/api/v1/applicants/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 1);
    assert_eq!(body["work_preference"], "hybrid");

    let (status, _) = send(
        &app,
        post(
            "/api/v1/jobs/1/applications",
            "bob-wallet",
            json!({ "applicant_id": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
