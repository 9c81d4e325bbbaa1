//! # Eligibility Module
//!
//! Resolves which catalog sessions an athlete may select.
//!
//! ## Resolution Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  dob empty ───────────────────────────────► [] (never "all sessions")  │
//! │                                                                         │
//! │  dob set ──► age in whole years ──► keep session if                     │
//! │                                       gender == athlete gender          │
//! │                                       AND min_age <= age <= max_age     │
//! │                                                                         │
//! │  Catalog order is preserved. Status and capacity are NOT checked here; │
//! │  the enrollment service is the capacity authority at submission time.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};

use crate::types::{Gender, Session};

/// Age in whole calendar years on `today`.
///
/// One year is subtracted when this year's birthday (month/day) has not
/// been reached yet. A Feb 29 birthday counts as reached on Mar 1 in
/// non-leap years.
///
/// ## Example
/// ```rust
/// use academy_core::eligibility::age_on;
/// use chrono::NaiveDate;
///
/// let dob = NaiveDate::from_ymd_opt(2016, 10, 19).unwrap();
/// let birthday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let day_before = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
///
/// assert_eq!(age_on(dob, birthday), 10);
/// assert_eq!(age_on(dob, day_before), 9);
/// ```
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Checks a single session against an athlete's date of birth and gender.
pub fn is_eligible(session: &Session, dob: Option<NaiveDate>, gender: Gender, today: NaiveDate) -> bool {
    match dob {
        Some(dob) => session.gender.matches(gender) && session.admits_age(age_on(dob, today)),
        None => false,
    }
}

/// Filters the catalog down to the sessions an athlete can select.
///
/// Returns an empty list when `dob` is absent. Input order is kept.
pub fn eligible_sessions<'a>(
    sessions: &'a [Session],
    dob: Option<NaiveDate>,
    gender: Gender,
    today: NaiveDate,
) -> Vec<&'a Session> {
    let Some(dob) = dob else {
        return Vec::new();
    };
    let age = age_on(dob, today);

    sessions
        .iter()
        .filter(|s| s.gender.matches(gender) && s.admits_age(age))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SessionGender, SessionStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(id: &str, gender: SessionGender, min_age: u32, max_age: u32) -> Session {
        Session {
            id: id.to_string(),
            sport: "Soccer".to_string(),
            level: format!("{}-{}", min_age, max_age),
            gender,
            min_age,
            max_age,
            price_cents: 9000,
            capacity: 10,
            registered_count: 10,
            status: SessionStatus::Full,
        }
    }

    fn catalog() -> Vec<Session> {
        vec![
            session("f-8-12", SessionGender::Female, 8, 12),
            session("m-8-12", SessionGender::Male, 8, 12),
            session("f-13-15", SessionGender::Female, 13, 15),
            session("coed-5-18", SessionGender::Coed, 5, 18),
            session("f-10-10", SessionGender::Female, 10, 10),
        ]
    }

    fn ids(sessions: Vec<&Session>) -> Vec<&str> {
        sessions.into_iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_age_on_anniversary_and_day_before() {
        let today = date(2026, 10, 19);
        assert_eq!(age_on(date(2016, 10, 19), today), 10);
        assert_eq!(age_on(date(2016, 10, 20), today), 9);
        assert_eq!(age_on(date(2016, 11, 1), today), 9);
        assert_eq!(age_on(date(2016, 1, 1), today), 10);
        assert_eq!(age_on(today, today), 0);
    }

    #[test]
    fn test_age_on_leap_day_birthday() {
        let dob = date(2016, 2, 29);
        assert_eq!(age_on(dob, date(2027, 2, 28)), 10);
        assert_eq!(age_on(dob, date(2027, 3, 1)), 11);
        assert_eq!(age_on(dob, date(2028, 2, 29)), 12);
    }

    #[test]
    fn test_empty_dob_resolves_to_nothing() {
        let sessions = catalog();
        assert!(eligible_sessions(&sessions, None, Gender::Female, date(2026, 10, 19)).is_empty());
    }

    #[test]
    fn test_filters_by_gender_and_age_preserving_order() {
        let sessions = catalog();
        let today = date(2026, 10, 19);

        let age_10 = Some(date(2016, 5, 1));
        assert_eq!(
            ids(eligible_sessions(&sessions, age_10, Gender::Female, today)),
            vec!["f-8-12", "f-10-10"]
        );
        assert_eq!(
            ids(eligible_sessions(&sessions, age_10, Gender::Male, today)),
            vec!["m-8-12"]
        );

        let age_14 = Some(date(2012, 5, 1));
        assert_eq!(
            ids(eligible_sessions(&sessions, age_14, Gender::Female, today)),
            vec!["f-13-15"]
        );
    }

    #[test]
    fn test_full_sessions_are_still_offered() {
        let sessions = catalog();
        let result = eligible_sessions(&sessions, Some(date(2016, 5, 1)), Gender::Male, date(2026, 10, 19));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].spots_remaining(), 0);
    }

    #[test]
    fn test_every_result_satisfies_constraints() {
        let sessions = catalog();
        let today = date(2026, 10, 19);
        for year in 2005..=2026 {
            let dob = date(year, 6, 15);
            for gender in [Gender::Male, Gender::Female] {
                for s in eligible_sessions(&sessions, Some(dob), gender, today) {
                    assert!(s.gender.matches(gender));
                    assert!(s.admits_age(age_on(dob, today)));
                    assert!(is_eligible(s, Some(dob), gender, today));
                }
            }
        }
    }

    #[test]
    fn test_future_dob_is_never_eligible() {
        let sessions = catalog();
        let today = date(2026, 10, 19);
        assert!(eligible_sessions(&sessions, Some(date(2027, 1, 1)), Gender::Female, today).is_empty());
    }
}
