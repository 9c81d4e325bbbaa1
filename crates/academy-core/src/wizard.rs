//! # Enrollment Wizard
//!
//! The gated, strictly linear state machine that drives one enrollment.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌─────────────┐ Advance ┌────────────┐ Advance ┌────────┐ Advance      │
//! │  │ 1 Athlete   │────────►│ 2 Parent   │────────►│ 3      │────────┐     │
//! │  │   Info      │◄────────│   Info     │◄────────│ Waiver │        │     │
//! │  └─────────────┘  Back   └────────────┘  Back   └────────┘        ▼     │
//! │        ▲                                            ▲       ┌─────────┐ │
//! │        │                                            └───────│4 Payment│ │
//! │        │ Reset                                        Back  └────┬────┘ │
//! │        │                                                        │      │
//! │  ┌─────┴───────┐            SubmissionSucceeded                 │      │
//! │  │ 5 Receipt   │◄───────────────────────────────────────────────┘      │
//! │  │ (terminal)  │                                                       │
//! │  └─────────────┘                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `advance()` only succeeds when every validator of the current step
//! passes. Step 4 is never left through `advance()`: the submission
//! protocol (`begin_submission` → `complete_submission` / `fail_submission`)
//! owns that edge and may leave the wizard on step 4 after a failure.
//!
//! ## Submission Status
//! ```text
//! Idle ──begin──► Submitting ──complete──► Done
//!   ▲                 │ │
//!   └───abandon───────┘ └──fail──► Failed ──begin──► Submitting
//! ```
//! The check and the set happen in the same `&mut self` call, so two
//! callers can never both start a submission.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::draft::EnrollmentDraft;
use crate::eligibility::{self, age_on};
use crate::error::{ValidationError, ValidationResult, WizardError, WizardResult};
use crate::payload::{EnrollmentRequest, EnrollmentResponse};
use crate::pricing::{PricingConfig, PricingSnapshot};
use crate::receipt::ConfirmedEnrollment;
use crate::types::{find_session, Gender, JerseySize, Session};
use crate::validation;

// =============================================================================
// Steps and Transitions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    AthleteInfo,
    ParentInfo,
    Waiver,
    Payment,
    Receipt,
}

/// Events that move the wizard between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Advance,
    Back,
    SubmissionSucceeded,
    Reset,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::AthleteInfo,
        Step::ParentInfo,
        Step::Waiver,
        Step::Payment,
        Step::Receipt,
    ];

    /// 1-based position shown in the progress indicator.
    pub fn number(self) -> u8 {
        match self {
            Step::AthleteInfo => 1,
            Step::ParentInfo => 2,
            Step::Waiver => 3,
            Step::Payment => 4,
            Step::Receipt => 5,
        }
    }

    /// The transition table. `None` means the event is not allowed.
    pub fn transition(self, event: StepEvent) -> Option<Step> {
        use Step::*;
        use StepEvent::*;

        match (self, event) {
            (AthleteInfo, Advance) => Some(ParentInfo),
            (ParentInfo, Advance) => Some(Waiver),
            (Waiver, Advance) => Some(Payment),
            (ParentInfo, Back) => Some(AthleteInfo),
            (Waiver, Back) => Some(ParentInfo),
            (Payment, Back) => Some(Waiver),
            (Payment, SubmissionSucceeded) => Some(Receipt),
            (_, Reset) => Some(AthleteInfo),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Step> {
        self.transition(StepEvent::Advance)
    }

    pub fn previous(self) -> Option<Step> {
        self.transition(StepEvent::Back)
    }

    pub fn is_terminal(self) -> bool {
        self == Step::Receipt
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::AthleteInfo => write!(f, "Athlete Info"),
            Step::ParentInfo => write!(f, "Parent Info"),
            Step::Waiver => write!(f, "Waiver"),
            Step::Payment => write!(f, "Payment"),
            Step::Receipt => write!(f, "Receipt"),
        }
    }
}

// =============================================================================
// Fields and Validation State
// =============================================================================

/// Identifies one validated input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    AthleteName(usize),
    AthleteDob(usize),
    AthleteSession(usize),
    ParentName,
    Email,
    Phone,
    WaiverAgreed,
    WaiverSignature,
    CardNumber,
    Expiry,
    Cvc,
}

impl FieldKey {
    /// Athlete index for per-athlete fields.
    pub fn athlete_index(self) -> Option<usize> {
        match self {
            FieldKey::AthleteName(i) | FieldKey::AthleteDob(i) | FieldKey::AthleteSession(i) => Some(i),
            _ => None,
        }
    }

    fn with_athlete_index(self, index: usize) -> FieldKey {
        match self {
            FieldKey::AthleteName(_) => FieldKey::AthleteName(index),
            FieldKey::AthleteDob(_) => FieldKey::AthleteDob(index),
            FieldKey::AthleteSession(_) => FieldKey::AthleteSession(index),
            other => other,
        }
    }

    pub fn step(self) -> Step {
        match self {
            FieldKey::AthleteName(_) | FieldKey::AthleteDob(_) | FieldKey::AthleteSession(_) => {
                Step::AthleteInfo
            }
            FieldKey::ParentName | FieldKey::Email | FieldKey::Phone => Step::ParentInfo,
            FieldKey::WaiverAgreed | FieldKey::WaiverSignature => Step::Waiver,
            FieldKey::CardNumber | FieldKey::Expiry | FieldKey::Cvc => Step::Payment,
        }
    }
}

/// Per-field touched flags and current error messages.
///
/// Derived state: everything here can be recomputed from the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationState {
    touched: BTreeSet<FieldKey>,
    errors: BTreeMap<FieldKey, ValidationError>,
}

impl ValidationState {
    pub fn is_touched(&self, field: FieldKey) -> bool {
        self.touched.contains(&field)
    }

    pub fn error(&self, field: FieldKey) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    /// Error message for a field, or an empty string.
    pub fn message(&self, field: FieldKey) -> String {
        self.errors
            .get(&field)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn errors(&self) -> impl Iterator<Item = (&FieldKey, &ValidationError)> + '_ {
        self.errors.iter()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn touch(&mut self, field: FieldKey) {
        self.touched.insert(field);
    }

    fn record(&mut self, field: FieldKey, result: ValidationResult<()>) {
        match result {
            Ok(()) => {
                self.errors.remove(&field);
            }
            Err(e) => {
                self.errors.insert(field, e);
            }
        }
    }

    /// Drops the removed athlete's entries and shifts later indices down.
    fn remove_athlete(&mut self, index: usize) {
        let shift = |key: FieldKey| match key.athlete_index() {
            Some(i) if i == index => None,
            Some(i) if i > index => Some(key.with_athlete_index(i - 1)),
            _ => Some(key),
        };

        self.touched = self.touched.iter().copied().filter_map(shift).collect();
        self.errors = std::mem::take(&mut self.errors)
            .into_iter()
            .filter_map(|(k, v)| shift(k).map(|k| (k, v)))
            .collect();
    }
}

// =============================================================================
// Submission
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Done,
    Failed,
}

/// Result of asking the wizard to start a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// A submission is already in flight; nothing was done.
    AlreadySubmitting,

    /// Payment fields failed validation; errors are in the validation state
    /// and the status is unchanged.
    Invalid { failures: usize },

    /// Status is now `Submitting`; send this request exactly once.
    Ready(EnrollmentRequest),
}

// =============================================================================
// Wizard
// =============================================================================

/// One enrollment in progress.
#[derive(Debug, Clone)]
pub struct Wizard {
    sessions: Arc<[Session]>,
    pricing_config: PricingConfig,
    today: NaiveDate,
    draft: EnrollmentDraft,
    step: Step,
    validation: ValidationState,
    expanded_athlete: usize,
    submission: SubmissionStatus,
    submit_error: Option<String>,
    confirmation: Option<ConfirmedEnrollment>,
}

impl Wizard {
    /// Starts an empty enrollment against a catalog snapshot.
    ///
    /// `today` anchors age computation and the future-date check.
    pub fn new(sessions: Arc<[Session]>, pricing_config: PricingConfig, today: NaiveDate) -> Self {
        Wizard {
            sessions,
            pricing_config,
            today,
            draft: EnrollmentDraft::new(),
            step: Step::AthleteInfo,
            validation: ValidationState::default(),
            expanded_athlete: 0,
            submission: SubmissionStatus::Idle,
            submit_error: None,
            confirmation: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &EnrollmentDraft {
        &self.draft
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn pricing_config(&self) -> &PricingConfig {
        &self.pricing_config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Index of the athlete card currently expanded in the UI.
    pub fn expanded_athlete(&self) -> usize {
        self.expanded_athlete
    }

    pub fn submission_status(&self) -> SubmissionStatus {
        self.submission
    }

    pub fn is_processing(&self) -> bool {
        self.submission == SubmissionStatus::Submitting
    }

    /// Message from the last rejected submission, if any.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn confirmation(&self) -> Option<&ConfirmedEnrollment> {
        self.confirmation.as_ref()
    }

    /// Current totals, recomputed from the draft on every call.
    pub fn pricing(&self) -> PricingSnapshot {
        PricingSnapshot::compute(&self.draft.athletes, &self.sessions, &self.pricing_config)
    }

    /// Age of an athlete today, if a date of birth is set.
    pub fn athlete_age(&self, index: usize) -> WizardResult<Option<i32>> {
        let athlete = self.athlete(index)?;
        Ok(athlete.dob.map(|dob| age_on(dob, self.today)))
    }

    /// Sessions the athlete may select, in catalog order.
    pub fn eligible_sessions(&self, index: usize) -> WizardResult<Vec<&Session>> {
        let athlete = self.athlete(index)?;
        Ok(match athlete.gender {
            Some(gender) => eligibility::eligible_sessions(&self.sessions, athlete.dob, gender, self.today),
            None => Vec::new(),
        })
    }

    /// False when a dob and gender are set but nothing in the catalog fits,
    /// which the UI reports as "no programs for this age/gender".
    pub fn has_eligible_sessions(&self, index: usize) -> WizardResult<bool> {
        Ok(!self.eligible_sessions(index)?.is_empty())
    }

    // -------------------------------------------------------------------------
    // Athlete setters
    // -------------------------------------------------------------------------

    pub fn set_athlete_name(&mut self, index: usize, name: impl Into<String>) -> WizardResult<()> {
        self.ensure_editable()?;
        self.athlete_mut(index)?.name = name.into();
        self.on_change(FieldKey::AthleteName(index));
        Ok(())
    }

    /// Sets the date of birth. A changed value clears the selected session.
    pub fn set_athlete_dob(&mut self, index: usize, dob: Option<NaiveDate>) -> WizardResult<()> {
        self.ensure_editable()?;
        let athlete = self.athlete_mut(index)?;
        if athlete.dob != dob {
            athlete.dob = dob;
            athlete.selected_session_id = None;
        }
        self.on_change(FieldKey::AthleteDob(index));
        self.on_change(FieldKey::AthleteSession(index));
        Ok(())
    }

    /// Sets the gender. A changed value clears the selected session.
    pub fn set_athlete_gender(&mut self, index: usize, gender: Gender) -> WizardResult<()> {
        self.ensure_editable()?;
        let athlete = self.athlete_mut(index)?;
        if athlete.gender != Some(gender) {
            athlete.gender = Some(gender);
            athlete.selected_session_id = None;
        }
        self.on_change(FieldKey::AthleteSession(index));
        Ok(())
    }

    pub fn set_athlete_jersey_size(&mut self, index: usize, size: JerseySize) -> WizardResult<()> {
        self.ensure_editable()?;
        self.athlete_mut(index)?.jersey_size = size;
        Ok(())
    }

    /// Selects (or clears) the athlete's session.
    ///
    /// Only sessions that admit the athlete's current age and gender are
    /// accepted.
    pub fn select_session(&mut self, index: usize, session_id: Option<&str>) -> WizardResult<()> {
        self.ensure_editable()?;
        let athlete = self.athlete(index)?;

        if let Some(id) = session_id {
            let session = find_session(&self.sessions, id)
                .ok_or_else(|| WizardError::UnknownSession(id.to_string()))?;
            let eligible = athlete
                .gender
                .is_some_and(|g| eligibility::is_eligible(session, athlete.dob, g, self.today));
            if !eligible {
                return Err(WizardError::IneligibleSession {
                    session_id: id.to_string(),
                    index,
                });
            }
        }

        self.athlete_mut(index)?.selected_session_id = session_id.map(str::to_string);
        self.on_change(FieldKey::AthleteSession(index));
        Ok(())
    }

    /// Appends an empty athlete and focuses it. Returns its index.
    pub fn add_athlete(&mut self) -> WizardResult<usize> {
        self.ensure_editable()?;
        self.ensure_step("add_athlete", Step::AthleteInfo)?;
        self.draft.athletes.push(Default::default());
        self.expanded_athlete = self.draft.athletes.len() - 1;
        Ok(self.expanded_athlete)
    }

    /// Removes an athlete. The draft always keeps at least one.
    pub fn remove_athlete(&mut self, index: usize) -> WizardResult<()> {
        self.ensure_editable()?;
        self.ensure_step("remove_athlete", Step::AthleteInfo)?;
        self.athlete(index)?;
        if self.draft.athletes.len() <= 1 {
            return Err(WizardError::LastAthlete);
        }

        self.draft.athletes.remove(index);
        self.validation.remove_athlete(index);

        if self.expanded_athlete > index {
            self.expanded_athlete -= 1;
        }
        self.expanded_athlete = self.expanded_athlete.min(self.draft.athletes.len() - 1);
        Ok(())
    }

    pub fn expand_athlete(&mut self, index: usize) -> WizardResult<()> {
        self.athlete(index)?;
        self.expanded_athlete = index;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Parent, waiver and payment setters
    // -------------------------------------------------------------------------

    pub fn set_parent_name(&mut self, name: impl Into<String>) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.parent_name = name.into();
        self.on_change(FieldKey::ParentName);
        // The signature is compared against the parent name.
        self.on_change(FieldKey::WaiverSignature);
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.email = email.into();
        self.on_change(FieldKey::Email);
        Ok(())
    }

    /// Stores the phone progressively formatted as `(XXX) XXX-XXXX`.
    pub fn set_phone(&mut self, raw: &str) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.phone = validation::format_phone(raw);
        self.on_change(FieldKey::Phone);
        Ok(())
    }

    pub fn set_waiver_agreed(&mut self, agreed: bool) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.waiver_agreed = agreed;
        self.on_change(FieldKey::WaiverAgreed);
        Ok(())
    }

    pub fn set_waiver_signature(&mut self, signature: impl Into<String>) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.waiver_signature = signature.into();
        self.on_change(FieldKey::WaiverSignature);
        Ok(())
    }

    pub fn set_card_number(&mut self, raw: &str) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.card_number = validation::format_card_number(raw);
        self.on_change(FieldKey::CardNumber);
        Ok(())
    }

    pub fn set_expiry(&mut self, raw: &str) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.expiry = validation::format_expiry(raw);
        self.on_change(FieldKey::Expiry);
        Ok(())
    }

    pub fn set_cvc(&mut self, raw: &str) -> WizardResult<()> {
        self.ensure_editable()?;
        self.draft.cvc = validation::format_cvc(raw);
        self.on_change(FieldKey::Cvc);
        Ok(())
    }

    /// Marks a field touched and validates it.
    pub fn blur(&mut self, field: FieldKey) -> WizardResult<()> {
        if let Some(i) = field.athlete_index() {
            self.athlete(i)?;
        }
        self.validation.touch(field);
        let result = self.validate_field(field);
        self.validation.record(field, result);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Moves to the next step if the current step's gate holds.
    ///
    /// Every field of the step is forced touched first so the UI shows all
    /// outstanding errors.
    pub fn advance(&mut self) -> WizardResult<Step> {
        self.ensure_editable()?;
        let next = self
            .step
            .transition(StepEvent::Advance)
            .ok_or(WizardError::NoForwardTransition { step: self.step })?;

        let failures = self.check_step(self.step);
        if failures > 0 {
            debug!(step = %self.step, failures, "Step gate blocked");
            return Err(WizardError::GateBlocked {
                step: self.step,
                failures,
            });
        }

        debug!(from = %self.step, to = %next, "Wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Moves back one step. Unconditional from steps 2-4.
    pub fn back(&mut self) -> WizardResult<Step> {
        if self.is_processing() {
            return Err(WizardError::SubmissionInFlight);
        }
        let previous = self
            .step
            .transition(StepEvent::Back)
            .ok_or(WizardError::NoBackTransition { step: self.step })?;

        debug!(from = %self.step, to = %previous, "Wizard went back");
        self.step = previous;
        self.submit_error = None;
        Ok(previous)
    }

    /// Discards everything and starts a fresh enrollment.
    pub fn reset(&mut self) -> WizardResult<()> {
        if self.is_processing() {
            return Err(WizardError::SubmissionInFlight);
        }
        self.step = self.step.transition(StepEvent::Reset).unwrap_or(Step::AthleteInfo);
        self.draft = EnrollmentDraft::new();
        self.validation = ValidationState::default();
        self.expanded_athlete = 0;
        self.submission = SubmissionStatus::Idle;
        self.submit_error = None;
        self.confirmation = None;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Starts a submission from the payment step.
    ///
    /// ## Protocol
    /// 1. Already submitting → `AlreadySubmitting`, nothing changes
    /// 2. Payment fields forced touched and validated; any failure →
    ///    `Invalid`, status unchanged
    /// 3. Otherwise status becomes `Submitting` and the request is returned
    pub fn begin_submission(&mut self) -> WizardResult<SubmitAttempt> {
        match self.submission {
            SubmissionStatus::Submitting => return Ok(SubmitAttempt::AlreadySubmitting),
            SubmissionStatus::Done => return Err(WizardError::Completed),
            SubmissionStatus::Idle | SubmissionStatus::Failed => {}
        }
        self.ensure_step("submit", Step::Payment)?;

        let failures = self.check_step(Step::Payment);
        if failures > 0 {
            debug!(failures, "Payment validation failed");
            return Ok(SubmitAttempt::Invalid { failures });
        }

        let request = EnrollmentRequest::from_draft(&self.draft)?;
        self.submission = SubmissionStatus::Submitting;
        self.submit_error = None;
        Ok(SubmitAttempt::Ready(request))
    }

    /// Settles a successful submission and moves to the receipt.
    ///
    /// The draft is discarded; the confirmation is all that remains.
    pub fn complete_submission(
        &mut self,
        response: &EnrollmentResponse,
        submitted_on: NaiveDate,
    ) -> WizardResult<&ConfirmedEnrollment> {
        self.ensure_submitting()?;
        let receipt = self
            .step
            .transition(StepEvent::SubmissionSucceeded)
            .ok_or(WizardError::NoForwardTransition { step: self.step })?;

        let pricing = self.pricing();
        let confirmed = ConfirmedEnrollment::assemble(
            &self.draft,
            &self.sessions,
            &pricing,
            &self.pricing_config,
            submitted_on,
            response.is_new_account,
        );

        debug!(from = %self.step, to = %receipt, "Enrollment confirmed");
        self.step = receipt;
        self.submission = SubmissionStatus::Done;
        self.draft = EnrollmentDraft::new();
        self.validation = ValidationState::default();
        self.expanded_athlete = 0;
        let confirmed: &ConfirmedEnrollment = self.confirmation.insert(confirmed);
        Ok(confirmed)
    }

    /// Records a rejected submission. The draft stays intact on step 4.
    pub fn fail_submission(&mut self, message: impl Into<String>) -> WizardResult<()> {
        self.ensure_submitting()?;
        self.submission = SubmissionStatus::Failed;
        self.submit_error = Some(message.into());
        Ok(())
    }

    /// Returns an in-flight submission to idle without an outcome, for a
    /// request that was never handed to the service.
    pub fn abandon_submission(&mut self) -> WizardResult<()> {
        self.ensure_submitting()?;
        self.submission = SubmissionStatus::Idle;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn athlete(&self, index: usize) -> WizardResult<&crate::draft::AthleteDraft> {
        let count = self.draft.athletes.len();
        self.draft
            .athletes
            .get(index)
            .ok_or(WizardError::AthleteOutOfRange { index, count })
    }

    fn athlete_mut(&mut self, index: usize) -> WizardResult<&mut crate::draft::AthleteDraft> {
        let count = self.draft.athletes.len();
        self.draft
            .athletes
            .get_mut(index)
            .ok_or(WizardError::AthleteOutOfRange { index, count })
    }

    fn ensure_editable(&self) -> WizardResult<()> {
        match self.submission {
            SubmissionStatus::Submitting => Err(WizardError::SubmissionInFlight),
            SubmissionStatus::Done => Err(WizardError::Completed),
            SubmissionStatus::Idle | SubmissionStatus::Failed => Ok(()),
        }
    }

    fn ensure_step(&self, operation: &'static str, step: Step) -> WizardResult<()> {
        if self.step != step {
            return Err(WizardError::WrongStep {
                operation,
                step: self.step,
            });
        }
        Ok(())
    }

    fn ensure_submitting(&self) -> WizardResult<()> {
        if self.submission != SubmissionStatus::Submitting {
            return Err(WizardError::NotSubmitting);
        }
        Ok(())
    }

    /// Revalidates a field on change, but only once it has been touched.
    fn on_change(&mut self, field: FieldKey) {
        if self.validation.is_touched(field) {
            let result = self.validate_field(field);
            self.validation.record(field, result);
        }
    }

    fn fields_for_step(&self, step: Step) -> Vec<FieldKey> {
        match step {
            Step::AthleteInfo => (0..self.draft.athletes.len())
                .flat_map(|i| {
                    [
                        FieldKey::AthleteName(i),
                        FieldKey::AthleteDob(i),
                        FieldKey::AthleteSession(i),
                    ]
                })
                .collect(),
            Step::ParentInfo => vec![FieldKey::ParentName, FieldKey::Email, FieldKey::Phone],
            Step::Waiver => vec![FieldKey::WaiverAgreed, FieldKey::WaiverSignature],
            Step::Payment => vec![FieldKey::CardNumber, FieldKey::Expiry, FieldKey::Cvc],
            Step::Receipt => Vec::new(),
        }
    }

    /// Forces every field of a step touched, validates it, and returns the
    /// number of failing fields.
    fn check_step(&mut self, step: Step) -> usize {
        let mut failures = 0;
        for field in self.fields_for_step(step) {
            self.validation.touch(field);
            let result = self.validate_field(field);
            if result.is_err() {
                failures += 1;
            }
            self.validation.record(field, result);
        }
        failures
    }

    fn validate_field(&self, field: FieldKey) -> ValidationResult<()> {
        let draft = &self.draft;
        match field {
            FieldKey::AthleteName(i) => match draft.athletes.get(i) {
                Some(a) => validation::validate_athlete_name(&a.name),
                None => Ok(()),
            },
            FieldKey::AthleteDob(i) => match draft.athletes.get(i) {
                Some(a) => validation::validate_date_of_birth(a.dob, self.today),
                None => Ok(()),
            },
            FieldKey::AthleteSession(i) => match draft.athletes.get(i) {
                Some(a) if a.selected_session_id.is_none() => Err(ValidationError::Required {
                    field: "Program".to_string(),
                }),
                _ => Ok(()),
            },
            FieldKey::ParentName => validation::validate_parent_name(&draft.parent_name),
            FieldKey::Email => validation::validate_email(&draft.email),
            FieldKey::Phone => validation::validate_phone(&draft.phone),
            FieldKey::WaiverAgreed => {
                if draft.waiver_agreed {
                    Ok(())
                } else {
                    Err(ValidationError::Required {
                        field: "Waiver agreement".to_string(),
                    })
                }
            }
            FieldKey::WaiverSignature => {
                validation::validate_waiver_signature(&draft.waiver_signature, &draft.parent_name)
            }
            FieldKey::CardNumber => validation::validate_card_number(&draft.card_number),
            FieldKey::Expiry => validation::validate_expiry(&draft.expiry),
            FieldKey::Cvc => validation::validate_cvc(&draft.cvc),
        }
    }
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

    fn today() -> NaiveDate {
        date(2026, 10, 19)
    }

    fn session(id: &str, gender: SessionGender, min_age: u32, max_age: u32, price_cents: i64) -> Session {
        Session {
            id: id.to_string(),
            sport: "Soccer".to_string(),
            level: id.to_string(),
            gender,
            min_age,
            max_age,
            price_cents,
            capacity: 16,
            registered_count: 4,
            status: SessionStatus::Open,
        }
    }

    fn wizard() -> Wizard {
        let sessions: Arc<[Session]> = vec![
            session("girls-8-12", SessionGender::Female, 8, 12, 9000),
            session("boys-8-12", SessionGender::Male, 8, 12, 12000),
            session("girls-13-15", SessionGender::Female, 13, 15, 11000),
        ]
        .into();
        Wizard::new(sessions, PricingConfig::default(), today())
    }

    /// Athlete aged 10 in the girls 8-12 session.
    fn fill_athlete(w: &mut Wizard, index: usize, name: &str) {
        w.set_athlete_name(index, name).unwrap();
        w.set_athlete_dob(index, Some(date(2016, 5, 1))).unwrap();
        w.set_athlete_gender(index, Gender::Female).unwrap();
        w.select_session(index, Some("girls-8-12")).unwrap();
    }

    fn to_payment(w: &mut Wizard) {
        fill_athlete(w, 0, "Mia Doe");
        w.advance().unwrap();
        w.set_parent_name("Jane Doe").unwrap();
        w.set_email("jane@x.com").unwrap();
        w.set_phone("5551234567").unwrap();
        w.advance().unwrap();
        w.set_waiver_agreed(true).unwrap();
        w.set_waiver_signature("jane doe").unwrap();
        w.advance().unwrap();
    }

    fn fill_payment(w: &mut Wizard) {
        w.set_card_number("4242424242424242").unwrap();
        w.set_expiry("1226").unwrap();
        w.set_cvc("123").unwrap();
    }

    #[test]
    fn test_transition_table_is_exhaustive() {
        use StepEvent::*;
        let events = [Advance, Back, SubmissionSucceeded, Reset];
        let expected = |step: Step, event: StepEvent| -> Option<Step> {
            match (step.number(), event) {
                (n @ 1..=3, Advance) => Step::ALL.get(n as usize).copied(),
                (n @ 2..=4, Back) => Step::ALL.get(n as usize - 2).copied(),
                (4, SubmissionSucceeded) => Some(Step::Receipt),
                (_, Reset) => Some(Step::AthleteInfo),
                _ => None,
            }
        };
        for step in Step::ALL {
            for event in events {
                assert_eq!(step.transition(event), expected(step, event), "{step:?} {event:?}");
            }
        }
        assert!(Step::Receipt.is_terminal());
        assert_eq!(Step::Payment.next(), None);
        assert_eq!(Step::AthleteInfo.previous(), None);
    }

    #[test]
    fn test_new_wizard_starts_with_one_athlete() {
        let w = wizard();
        assert_eq!(w.step(), Step::AthleteInfo);
        assert_eq!(w.draft().athlete_count(), 1);
        assert!(!w.is_processing());
        assert_eq!(w.pricing().total_due.cents(), 3000);
    }

    #[test]
    fn test_advance_rejected_without_session() {
        let mut w = wizard();
        w.set_athlete_name(0, "Mia Doe").unwrap();
        w.set_athlete_dob(0, Some(date(2016, 5, 1))).unwrap();
        w.set_athlete_gender(0, Gender::Female).unwrap();

        let err = w.advance().unwrap_err();
        assert_eq!(
            err,
            WizardError::GateBlocked {
                step: Step::AthleteInfo,
                failures: 1
            }
        );
        assert_eq!(w.step(), Step::AthleteInfo);
        assert_eq!(
            w.validation().error(FieldKey::AthleteSession(0)).map(|e| e.code()),
            Some("REQUIRED")
        );
    }

    #[test]
    fn test_advance_checks_every_athlete() {
        let mut w = wizard();
        fill_athlete(&mut w, 0, "Mia Doe");
        let second = w.add_athlete().unwrap();
        w.set_athlete_name(second, "Ava Doe").unwrap();

        assert!(matches!(
            w.advance(),
            Err(WizardError::GateBlocked { failures: 2, .. })
        ));
        assert!(w.validation().error(FieldKey::AthleteDob(1)).is_some());
        assert!(w.validation().error(FieldKey::AthleteName(0)).is_none());
    }

    #[test]
    fn test_dob_change_clears_selection() {
        let mut w = wizard();
        fill_athlete(&mut w, 0, "Mia Doe");
        assert!(w.draft().athletes[0].selected_session_id.is_some());

        w.set_athlete_dob(0, Some(date(2016, 5, 2))).unwrap();
        assert!(w.draft().athletes[0].selected_session_id.is_none());
    }

    #[test]
    fn test_gender_change_clears_selection() {
        let mut w = wizard();
        fill_athlete(&mut w, 0, "Mia Doe");

        w.set_athlete_gender(0, Gender::Female).unwrap();
        assert!(w.draft().athletes[0].selected_session_id.is_some());

        w.set_athlete_gender(0, Gender::Male).unwrap();
        assert!(w.draft().athletes[0].selected_session_id.is_none());
    }

    #[test]
    fn test_select_session_enforces_eligibility() {
        let mut w = wizard();
        assert_eq!(
            w.select_session(0, Some("girls-8-12")),
            Err(WizardError::IneligibleSession {
                session_id: "girls-8-12".to_string(),
                index: 0
            })
        );

        w.set_athlete_dob(0, Some(date(2016, 5, 1))).unwrap();
        w.set_athlete_gender(0, Gender::Female).unwrap();
        assert!(w.select_session(0, Some("boys-8-12")).is_err());
        assert!(w.select_session(0, Some("girls-13-15")).is_err());
        assert_eq!(
            w.select_session(0, Some("nope")),
            Err(WizardError::UnknownSession("nope".to_string()))
        );
        assert!(w.select_session(0, Some("girls-8-12")).is_ok());
        assert!(w.select_session(0, None).is_ok());
        assert!(w.draft().athletes[0].selected_session_id.is_none());
    }

    #[test]
    fn test_eligible_sessions_per_athlete() {
        let mut w = wizard();
        assert!(w.eligible_sessions(0).unwrap().is_empty());

        w.set_athlete_dob(0, Some(date(2016, 5, 1))).unwrap();
        assert!(w.eligible_sessions(0).unwrap().is_empty()); // no gender yet

        w.set_athlete_gender(0, Gender::Male).unwrap();
        let ids: Vec<_> = w.eligible_sessions(0).unwrap().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec!["boys-8-12"]);
        assert_eq!(w.athlete_age(0).unwrap(), Some(10));

        w.set_athlete_dob(0, Some(date(2006, 5, 1))).unwrap();
        assert!(!w.has_eligible_sessions(0).unwrap());
    }

    #[test]
    fn test_errors_appear_on_change_only_after_touch() {
        let mut w = wizard();
        w.set_email("jane").unwrap();
        assert!(w.validation().error(FieldKey::Email).is_none());

        w.blur(FieldKey::Email).unwrap();
        assert_eq!(w.validation().message(FieldKey::Email), "Email has invalid format: expected name@domain.tld");

        w.set_email("jane@x.com").unwrap();
        assert_eq!(w.validation().message(FieldKey::Email), "");
    }

    #[test]
    fn test_parent_name_change_revalidates_touched_signature() {
        let mut w = wizard();
        w.set_parent_name("Jane Doe").unwrap();
        w.set_waiver_signature("Jane Doe").unwrap();
        w.blur(FieldKey::WaiverSignature).unwrap();
        assert!(w.validation().error(FieldKey::WaiverSignature).is_none());

        w.set_parent_name("Jane Smith").unwrap();
        assert_eq!(
            w.validation().error(FieldKey::WaiverSignature),
            Some(&ValidationError::SignatureMismatch)
        );
    }

    #[test]
    fn test_parent_step_gate() {
        let mut w = wizard();
        fill_athlete(&mut w, 0, "Mia Doe");
        w.advance().unwrap();

        w.set_parent_name("Jane Doe").unwrap();
        w.set_email("jane@x.com").unwrap();
        w.set_phone("555123456").unwrap();
        assert!(w.advance().is_err());
        assert_eq!(w.validation().error(FieldKey::Phone).map(|e| e.code()), Some("INCOMPLETE"));

        w.set_phone("5551234567").unwrap();
        assert_eq!(w.draft().phone, "(555) 123-4567");
        assert_eq!(w.advance(), Ok(Step::Waiver));
    }

    #[test]
    fn test_waiver_gate_requires_agreement_and_exact_signature() {
        let mut w = wizard();
        fill_athlete(&mut w, 0, "Mia Doe");
        w.advance().unwrap();
        w.set_parent_name("John Smith").unwrap();
        w.set_email("john@x.com").unwrap();
        w.set_phone("5551234567").unwrap();
        w.advance().unwrap();

        w.set_waiver_signature("john smith").unwrap();
        assert!(w.advance().is_err());

        w.set_waiver_agreed(true).unwrap();
        w.set_waiver_signature("John Smith ").unwrap();
        assert!(w.advance().is_err());

        w.set_waiver_signature("JOHN SMITH").unwrap();
        assert_eq!(w.advance(), Ok(Step::Payment));
    }

    #[test]
    fn test_back_is_unconditional_and_linear() {
        let mut w = wizard();
        assert_eq!(
            w.back(),
            Err(WizardError::NoBackTransition {
                step: Step::AthleteInfo
            })
        );

        to_payment(&mut w);
        w.set_card_number("1").unwrap();
        assert_eq!(w.back(), Ok(Step::Waiver));
        w.set_waiver_agreed(false).unwrap();
        assert_eq!(w.back(), Ok(Step::ParentInfo));
        assert_eq!(w.back(), Ok(Step::AthleteInfo));
        assert_eq!(w.draft().card_number, "1");
    }

    #[test]
    fn test_payment_step_has_no_plain_advance() {
        let mut w = wizard();
        to_payment(&mut w);
        fill_payment(&mut w);
        assert_eq!(
            w.advance(),
            Err(WizardError::NoForwardTransition { step: Step::Payment })
        );
    }

    #[test]
    fn test_remove_athlete_rules_and_focus_clamp() {
        let mut w = wizard();
        assert_eq!(w.remove_athlete(0), Err(WizardError::LastAthlete));

        w.add_athlete().unwrap();
        let last = w.add_athlete().unwrap();
        assert_eq!(last, 2);
        assert_eq!(w.expanded_athlete(), 2);

        w.remove_athlete(2).unwrap();
        assert_eq!(w.expanded_athlete(), 1);

        w.expand_athlete(1).unwrap();
        w.remove_athlete(0).unwrap();
        assert_eq!(w.expanded_athlete(), 0);
        assert_eq!(w.draft().athlete_count(), 1);
        assert!(w.remove_athlete(5).is_err());
        assert!(w.expand_athlete(3).is_err());
    }

    #[test]
    fn test_remove_athlete_shifts_validation_state() {
        let mut w = wizard();
        w.add_athlete().unwrap();
        w.set_athlete_name(1, "A").unwrap();
        w.blur(FieldKey::AthleteName(1)).unwrap();
        assert!(w.validation().error(FieldKey::AthleteName(1)).is_some());

        w.remove_athlete(0).unwrap();
        assert!(w.validation().is_touched(FieldKey::AthleteName(0)));
        assert_eq!(
            w.validation().error(FieldKey::AthleteName(0)).map(|e| e.code()),
            Some("TOO_SHORT")
        );
        assert!(w.validation().error(FieldKey::AthleteName(1)).is_none());
    }

    #[test]
    fn test_athletes_only_change_count_on_athlete_step() {
        let mut w = wizard();
        fill_athlete(&mut w, 0, "Mia Doe");
        w.advance().unwrap();
        assert!(matches!(w.add_athlete(), Err(WizardError::WrongStep { .. })));
        assert!(matches!(w.remove_athlete(0), Err(WizardError::WrongStep { .. })));
    }

    #[test]
    fn test_pricing_tracks_draft() {
        let mut w = wizard();
        fill_athlete(&mut w, 0, "Mia Doe");
        assert_eq!(w.pricing().monthly_total.cents(), 9000);

        let second = w.add_athlete().unwrap();
        assert_eq!(w.pricing().sibling_discount.cents(), 900);

        w.set_athlete_dob(second, Some(date(2016, 1, 1))).unwrap();
        w.set_athlete_gender(second, Gender::Male).unwrap();
        w.select_session(second, Some("boys-8-12")).unwrap();
        let snap = w.pricing();
        assert_eq!(snap.subtotal.cents(), 21000);
        assert_eq!(snap.monthly_total.cents(), 18900);
        assert_eq!(snap.registration_fees.cents(), 6000);
        assert_eq!(w.pricing(), snap);
    }

    #[test]
    fn test_invalid_payment_does_not_start_submission() {
        let mut w = wizard();
        to_payment(&mut w);
        w.set_expiry("13").unwrap();

        assert_eq!(w.begin_submission(), Ok(SubmitAttempt::Invalid { failures: 3 }));
        assert_eq!(w.submission_status(), SubmissionStatus::Idle);
        assert!(w.validation().is_touched(FieldKey::Cvc));
        assert_eq!(w.validation().error(FieldKey::Expiry).map(|e| e.code()), Some("FORMAT"));
    }

    #[test]
    fn test_submission_outside_payment_step_is_rejected() {
        let mut w = wizard();
        assert!(matches!(w.begin_submission(), Err(WizardError::WrongStep { .. })));
    }

    #[test]
    fn test_second_begin_while_submitting_is_noop() {
        let mut w = wizard();
        to_payment(&mut w);
        fill_payment(&mut w);

        assert!(matches!(w.begin_submission(), Ok(SubmitAttempt::Ready(_))));
        assert!(w.is_processing());
        assert_eq!(w.begin_submission(), Ok(SubmitAttempt::AlreadySubmitting));
        assert_eq!(w.set_cvc("999"), Err(WizardError::SubmissionInFlight));
        assert_eq!(w.back(), Err(WizardError::SubmissionInFlight));
    }

    #[test]
    fn test_failed_submission_stays_on_payment_and_allows_retry() {
        let mut w = wizard();
        to_payment(&mut w);
        fill_payment(&mut w);
        w.begin_submission().unwrap();

        w.fail_submission("Card declined").unwrap();
        assert_eq!(w.step(), Step::Payment);
        assert!(!w.is_processing());
        assert_eq!(w.submit_error(), Some("Card declined"));
        assert_eq!(w.draft().card_number, "4242 4242 4242 4242");

        assert!(matches!(w.begin_submission(), Ok(SubmitAttempt::Ready(_))));
        assert_eq!(w.submit_error(), None);
    }

    #[test]
    fn test_complete_submission_reaches_terminal_receipt() {
        let mut w = wizard();
        to_payment(&mut w);
        fill_payment(&mut w);
        w.begin_submission().unwrap();

        let response = EnrollmentResponse {
            is_new_account: true,
            account_id: None,
            confirmation_number: None,
        };
        let confirmed = w.complete_submission(&response, today()).unwrap();
        assert_eq!(confirmed.total_paid.cents(), 12000);
        assert_eq!(confirmed.athletes[0].name, "Mia Doe");

        assert_eq!(w.step(), Step::Receipt);
        assert_eq!(w.submission_status(), SubmissionStatus::Done);
        assert!(w.draft().card_number.is_empty());
        assert_eq!(w.set_parent_name("x"), Err(WizardError::Completed));
        assert_eq!(w.back(), Err(WizardError::NoBackTransition { step: Step::Receipt }));
        assert_eq!(w.begin_submission(), Err(WizardError::Completed));

        w.reset().unwrap();
        assert_eq!(w.step(), Step::AthleteInfo);
        assert!(w.confirmation().is_none());
    }

    #[test]
    fn test_settling_without_submission_is_rejected() {
        let mut w = wizard();
        assert_eq!(w.fail_submission("x"), Err(WizardError::NotSubmitting));
        assert_eq!(w.abandon_submission(), Err(WizardError::NotSubmitting));
    }

    #[test]
    fn test_abandon_returns_to_idle() {
        let mut w = wizard();
        to_payment(&mut w);
        fill_payment(&mut w);
        w.begin_submission().unwrap();
        w.abandon_submission().unwrap();
        assert_eq!(w.submission_status(), SubmissionStatus::Idle);
        assert_eq!(w.step(), Step::Payment);
    }
}
