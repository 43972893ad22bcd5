use crate::infra::AuditLog;
use clap::Args;
use hiring_ledger::config::RegistryConfig;
use hiring_ledger::error::AppError;
use hiring_ledger::registry::{
    ApplicantRegistration, EventPublisher, Identity, JobPosting, Registry, Roster,
    WorkPreference,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Identity that owns the demo registry
    #[arg(long, default_value = "admin")]
    pub(crate) admin: String,
    /// Identity the candidate applies with
    #[arg(long, default_value = "alice-wallet")]
    pub(crate) candidate: String,
    /// Rating awarded after the hire (0-5)
    #[arg(long, default_value_t = 4)]
    pub(crate) rating: u32,
    /// Print the audit trail as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterCheckArgs {
    /// Applicants CSV (name,skills,phone,email,preference)
    #[arg(long)]
    pub(crate) applicants: Option<PathBuf>,
    /// Jobs CSV (title,description,salary)
    #[arg(long)]
    pub(crate) jobs: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        admin,
        candidate,
        rating,
        json,
    } = args;

    let admin = RegistryConfig::admin_identity(&admin)?;
    let candidate = Identity::new(candidate);
    let audit = Arc::new(AuditLog::default());
    let registry = Registry::new(admin.clone(), audit.clone());

    let alice = registry.add_applicant(
        &admin,
        ApplicantRegistration {
            name: "Alice".to_string(),
            skills: "Rust, PostgreSQL".to_string(),
            phone: "+1-515-555-0100".to_string(),
            email: "alice@example.com".to_string(),
            work_preference: WorkPreference::Remote,
        },
    )?;
    let engineer = registry.add_job(
        &admin,
        JobPosting {
            title: "Engineer".to_string(),
            description: "Own the hiring ledger service".to_string(),
            salary: 125_000,
        },
    )?;

    registry.apply_for_job(&candidate, engineer, alice)?;
    let duplicate = registry.apply_for_job(&candidate, engineer, alice);
    registry.hire_applicant(&admin, engineer, alice)?;
    let late = registry.apply_for_job(&Identity::new("late-wallet"), engineer, alice);
    let rating_result = registry.provide_rating(&admin, alice, rating);

    if json {
        let trail =
            serde_json::to_string_pretty(&audit.entries()).map_err(std::io::Error::from)?;
        println!("{trail}");
        return Ok(());
    }

    println!("Hiring ledger demo");
    println!("Admin: {admin} | candidate caller: {candidate}");

    render_registry(&registry)?;

    println!("\nRejected calls");
    for (label, outcome) in [
        ("second application", duplicate),
        ("application after hire", late),
    ] {
        match outcome {
            Ok(()) => println!("- {label}: unexpectedly accepted"),
            Err(err) => println!("- {label}: {err}"),
        }
    }
    if let Err(err) = rating_result {
        println!("- rating {rating}: {err}");
    }

    println!("\nAudit trail ({} events)", audit.len());
    for entry in audit.entries() {
        println!(
            "- #{} {} {}",
            entry.sequence,
            entry.recorded_at.format("%H:%M:%S"),
            entry.event.name()
        );
    }

    Ok(())
}

fn render_registry<P>(registry: &Registry<P>) -> Result<(), AppError>
where
    P: EventPublisher + 'static,
{
    println!("\nApplicants");
    for applicant in registry.list_applicants() {
        println!(
            "- #{} {} <{}> | skills: {} | rating {} | prefers {}",
            applicant.id,
            applicant.name,
            applicant.email,
            applicant.skills,
            registry.get_applicant_rating(applicant.id)?,
            registry.get_applicant_type(applicant.id)?
        );
    }

    println!("\nJobs");
    for job in registry.list_jobs() {
        let assignment = match job.applicant_id {
            Some(applicant_id) => format!("filled by applicant #{applicant_id}"),
            None => "open".to_string(),
        };
        println!(
            "- #{} {} (${}) | {}",
            job.id, job.title, job.salary, assignment
        );
    }

    Ok(())
}

pub(crate) fn run_roster_check(args: RosterCheckArgs) -> Result<(), AppError> {
    let roster = Roster::from_paths(args.applicants.as_deref(), args.jobs.as_deref())?;

    println!("Roster check");
    println!("- {} applicants", roster.applicants.len());
    for registration in &roster.applicants {
        println!(
            "  - {} <{}> prefers {}",
            registration.name, registration.email, registration.work_preference
        );
    }
    println!("- {} jobs", roster.jobs.len());
    for posting in &roster.jobs {
        println!("  - {} (${})", posting.title, posting.salary);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_with_default_arguments() {
        let args = DemoArgs {
            admin: "admin".to_string(),
            candidate: "alice-wallet".to_string(),
            rating: 4,
            json: false,
        };
        run_demo(args).expect("demo completes");
    }

    #[test]
    fn demo_rejects_blank_admin() {
        let args = DemoArgs {
            admin: " ".to_string(),
            candidate: "alice-wallet".to_string(),
            rating: 4,
            json: true,
        };
        assert!(matches!(run_demo(args), Err(AppError::Config(_))));
    }

    #[test]
    fn demo_reports_out_of_range_rating_without_failing() {
        let args = DemoArgs {
            admin: "admin".to_string(),
            candidate: "alice-wallet".to_string(),
            rating: 9,
            json: false,
        };
        run_demo(args).expect("demo completes");
    }
}
