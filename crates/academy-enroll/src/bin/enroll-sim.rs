//! # Enrollment Simulator
//!
//! Drives one complete enrollment through the wizard against the in-memory
//! enrollment service and prints the confirmation.
//!
//! ## Usage
//! ```bash
//! # Built-in demo catalog, default config
//! cargo run -p academy-enroll --bin enroll-sim
//!
//! # Custom catalog and config
//! cargo run -p academy-enroll --bin enroll-sim -- --catalog ./sessions.json --config ./academy.toml
//! ```

use academy_core::{Gender, JerseySize, Session, Wizard, WizardError};
use academy_enroll::catalog::{demo_catalog, load_catalog};
use academy_enroll::logging::init_tracing;
use academy_enroll::{
    EnrollmentSession, InMemoryAccountDirectory, InMemoryEnrollmentService, PortalConfig, SubmitOutcome,
};
use chrono::{Local, Months};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut catalog_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" => {
                if i + 1 < args.len() {
                    catalog_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Academy Enrollment Simulator");
                println!();
                println!("Usage: enroll-sim [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --catalog <PATH>   Session catalog JSON (default: built-in demo)");
                println!("  --config <PATH>    Portal config TOML (default: platform config dir)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    init_tracing();

    let config = match config_path {
        Some(path) => PortalConfig::load(Some(path))?,
        None => PortalConfig::load_or_default(None),
    };
    let catalog: Vec<Session> = match &catalog_path {
        Some(path) => load_catalog(path)?,
        None => demo_catalog(),
    };

    let today = Local::now().date_naive();
    let service = Arc::new(InMemoryEnrollmentService::new(&catalog));
    let accounts = Arc::new(InMemoryAccountDirectory::new());
    let session = EnrollmentSession::new(catalog.into(), config.clone(), today, service, accounts.clone());

    // Ten years and three months old today.
    let dob = today.checked_sub_months(Months::new(123));

    let session_id = session
        .with_wizard_mut(|w| -> Result<Option<String>, WizardError> {
            w.set_athlete_name(0, "Mia Doe")?;
            w.set_athlete_dob(0, dob)?;
            w.set_athlete_gender(0, Gender::Female)?;
            w.set_athlete_jersey_size(0, JerseySize::YouthLarge)?;
            Ok(w.eligible_sessions(0)?.first().map(|s| s.id.clone()))
        })
        .await?;

    let Some(session_id) = session_id else {
        eprintln!("No session in the catalog accepts a 10 year old girl.");
        return Ok(());
    };

    session
        .with_wizard_mut(|w| -> Result<(), WizardError> {
            w.select_session(0, Some(session_id.as_str()))?;
            w.advance()?;

            w.set_parent_name("Jane Doe")?;
            w.set_email("jane@x.com")?;
            w.set_phone("(555) 123-4567")?;
            w.advance()?;

            w.set_waiver_agreed(true)?;
            w.set_waiver_signature("Jane Doe")?;
            w.advance()?;

            w.set_card_number("4242 4242 4242 4242")?;
            w.set_expiry("12/26")?;
            w.set_cvc("123")?;
            Ok(())
        })
        .await?;

    let pricing = session.pricing().await;
    println!("Monthly total: {}", config.format_currency(pricing.monthly_total));
    println!("Total due:     {}", config.format_currency(pricing.total_due));

    match session.submit().await? {
        SubmitOutcome::Confirmed { enrollment, response } => {
            println!(
                "Confirmed {} (step {})",
                response.confirmation_number.unwrap_or_default(),
                session.with_wizard(|w: &Wizard| w.step().number()).await
            );
            println!("{}", serde_json::to_string_pretty(&enrollment)?);
            if let Some(user) = accounts.current_user().await {
                println!("Signed in as {} <{}>", user.name, user.email);
            }
        }
        SubmitOutcome::Rejected { message } => {
            println!("Enrollment rejected: {}", message);
        }
        SubmitOutcome::Invalid { failures } => {
            println!("{} payment field(s) need attention", failures);
        }
        SubmitOutcome::Ignored => {
            println!("A submission was already in flight");
        }
    }

    Ok(())
}
