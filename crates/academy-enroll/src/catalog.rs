//! # Session Catalog
//!
//! Loads the read-only session snapshot the wizard filters and prices
//! against.
//!
//! ## File Format
//! ```json
//! [
//!   {
//!     "id": "soccer-u10-girls",
//!     "sport": "Soccer",
//!     "level": "U10 Development",
//!     "gender": "Female",
//!     "minAge": 8,
//!     "maxAge": 10,
//!     "price": 90.00,
//!     "capacity": 16,
//!     "registeredCount": 11,
//!     "status": "open"
//!   }
//! ]
//! ```

use academy_core::{Session, SessionGender, SessionStatus};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::{EnrollError, EnrollResult};

/// Reads and checks a catalog file.
pub fn load_catalog(path: &Path) -> EnrollResult<Vec<Session>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| EnrollError::CatalogLoad(format!("{}: {}", path.display(), e)))?;
    let sessions = parse_catalog(&contents)?;
    info!(?path, sessions = sessions.len(), "Loaded session catalog");
    Ok(sessions)
}

/// Parses a catalog from JSON and checks it for consistency.
pub fn parse_catalog(json: &str) -> EnrollResult<Vec<Session>> {
    let sessions: Vec<Session> = serde_json::from_str(json)?;
    check_catalog(&sessions)?;
    Ok(sessions)
}

fn check_catalog(sessions: &[Session]) -> EnrollResult<()> {
    let mut seen = HashSet::new();
    for session in sessions {
        if !seen.insert(session.id.as_str()) {
            return Err(EnrollError::CatalogParse(format!("duplicate session id {}", session.id)));
        }
        if session.min_age > session.max_age {
            return Err(EnrollError::CatalogParse(format!(
                "session {} has min age {} above max age {}",
                session.id, session.min_age, session.max_age
            )));
        }
        if session.price_cents < 0 {
            return Err(EnrollError::CatalogParse(format!(
                "session {} has a negative price",
                session.id
            )));
        }
    }
    Ok(())
}

fn demo_session(id: &str, sport: &str, level: &str, gender: SessionGender, ages: (u32, u32), price_cents: i64, seats: (u32, u32)) -> Session {
    Session {
        id: id.to_string(),
        sport: sport.to_string(),
        level: level.to_string(),
        gender,
        min_age: ages.0,
        max_age: ages.1,
        price_cents,
        capacity: seats.0,
        registered_count: seats.1,
        status: SessionStatus::Open,
    }
}

/// Built-in catalog used by the simulator when no file is given.
pub fn demo_catalog() -> Vec<Session> {
    vec![
        demo_session("soccer-u10-girls", "Soccer", "U10 Development", SessionGender::Female, (8, 10), 9000, (16, 11)),
        demo_session("soccer-u10-boys", "Soccer", "U10 Development", SessionGender::Male, (8, 10), 9000, (16, 14)),
        demo_session("basketball-u14-boys", "Basketball", "U14 Competitive", SessionGender::Male, (11, 14), 12000, (12, 5)),
        demo_session("volleyball-u14-girls", "Volleyball", "U14 Club", SessionGender::Female, (11, 14), 11000, (14, 9)),
        demo_session("swim-coed", "Swim", "Stroke Clinic", SessionGender::Coed, (6, 12), 7500, (20, 3)),
        demo_session("track-u18-girls", "Track", "U18 Sprint", SessionGender::Female, (15, 18), 10000, (24, 24)),
    ]
}
