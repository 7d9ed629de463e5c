//! Weight Form
//!
//! Draft state, client-side validation and the submission state machine for
//! a new weighing.
//!
//! ```text
//! Editing --submit--> (invalid) --> Editing + field errors
//!                     (valid)   --> Submitting --> Succeeded | Failed
//! ```
//!
//! Validation runs only on submit. Editing a field clears that field's
//! error and nothing else.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::client::{ApiResponse, CancelToken, WeightApi};
use crate::types::{Direction, WeightFormData, WeightSubmission, WeightUnit};

/// Largest weight the form accepts
pub const MAX_WEIGHT: f64 = 99_999.0;

/// Form fields that can carry a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Direction,
    Truck,
    Containers,
    Weight,
    Unit,
    Force,
    Produce,
}

impl FormField {
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Direction => "direction",
            FormField::Truck => "truck",
            FormField::Containers => "containers",
            FormField::Weight => "weight",
            FormField::Unit => "unit",
            FormField::Force => "force",
            FormField::Produce => "produce",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validation messages keyed by field
pub type FieldErrors = BTreeMap<FormField, String>;

/// Where the form is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Succeeded { session_id: String },
    Failed { message: String },
}

/// What a submit attempt led to
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Invalid(FieldErrors),
    /// The backend accepted the weighing
    Succeeded { session_id: String },
    /// The backend or the transport rejected it; the draft is kept
    Failed(String),
    /// A submit is already in flight
    Busy,
}

fn container_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+$").expect("static pattern is valid"))
}

/// Validate a draft, returning the payload to send or the field errors
pub fn validate(data: &WeightFormData) -> Result<WeightSubmission, FieldErrors> {
    let mut errors = FieldErrors::new();

    let weight = match parse_weight(&data.weight) {
        Ok(w) => Some(w),
        Err(message) => {
            errors.insert(FormField::Weight, message.to_string());
            None
        }
    };

    if data.direction.requires_cargo() {
        if data.truck.trim().is_empty() {
            errors.insert(FormField::Truck, "Please enter truck ID".to_string());
        }

        if data.produce.trim().is_empty() {
            errors.insert(FormField::Produce, "Please enter produce type".to_string());
        }

        if !data.containers.is_empty() {
            let pattern = container_id_pattern();
            let all_numeric = data
                .containers
                .split(',')
                .map(str::trim)
                .all(|id| pattern.is_match(id));
            if !all_numeric {
                errors.insert(
                    FormField::Containers,
                    "Container IDs must be numbers only".to_string(),
                );
            }
        }
    }

    match weight {
        Some(weight) if errors.is_empty() => Ok(WeightSubmission {
            direction: data.direction,
            truck: data.truck.clone(),
            containers: data.containers.clone(),
            weight,
            unit: data.unit,
            force: data.force,
            produce: data.produce.clone(),
        }),
        _ => Err(errors),
    }
}

fn parse_weight(raw: &str) -> Result<f64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Please enter weight");
    }

    let weight: f64 = raw.parse().map_err(|_| "Weight must be a number")?;
    if weight.is_nan() {
        Err("Weight must be a number")
    } else if weight <= 0.0 {
        Err("Weight must be greater than 0")
    } else if weight > MAX_WEIGHT {
        Err("Weight is too large")
    } else {
        Ok(weight)
    }
}

/// A new-transaction form: draft, inline errors, and submission phase
#[derive(Debug, Clone)]
pub struct WeightForm {
    data: WeightFormData,
    errors: FieldErrors,
    phase: FormPhase,
}

impl Default for WeightForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightForm {
    /// Fresh form as shown on mount
    pub fn new() -> Self {
        Self {
            data: WeightFormData::default(),
            errors: FieldErrors::new(),
            phase: FormPhase::Editing,
        }
    }

    pub fn data(&self) -> &WeightFormData {
        &self.data
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting)
    }

    /// Error from the last failed submission, if any
    pub fn submit_error(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Dismiss the submission error without touching the draft
    pub fn dismiss_error(&mut self) {
        if matches!(self.phase, FormPhase::Failed { .. }) {
            self.phase = FormPhase::Editing;
        }
    }

    fn touch(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.data.direction = direction;
        self.touch(FormField::Direction);
    }

    pub fn set_truck(&mut self, truck: impl Into<String>) {
        self.data.truck = truck.into();
        self.touch(FormField::Truck);
    }

    pub fn set_containers(&mut self, containers: impl Into<String>) {
        self.data.containers = containers.into();
        self.touch(FormField::Containers);
    }

    pub fn set_weight(&mut self, weight: impl Into<String>) {
        self.data.weight = weight.into();
        self.touch(FormField::Weight);
    }

    pub fn set_unit(&mut self, unit: WeightUnit) {
        self.data.unit = unit;
        self.touch(FormField::Unit);
    }

    pub fn set_force(&mut self, force: bool) {
        self.data.force = force;
        self.touch(FormField::Force);
    }

    pub fn set_produce(&mut self, produce: impl Into<String>) {
        self.data.produce = produce.into();
        self.touch(FormField::Produce);
    }

    /// Validate and, if valid, send the draft.
    ///
    /// The draft is never cleared here; on success the caller discards the
    /// form, on failure the user keeps editing it.
    pub async fn submit<A>(&mut self, api: &A, cancel: &CancelToken) -> SubmitOutcome
    where
        A: WeightApi + ?Sized,
    {
        if self.is_submitting() {
            tracing::debug!("submit ignored, already in flight");
            return SubmitOutcome::Busy;
        }

        let submission = match validate(&self.data) {
            Ok(submission) => submission,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "form validation failed");
                self.errors = errors.clone();
                self.phase = FormPhase::Editing;
                return SubmitOutcome::Invalid(errors);
            }
        };

        self.errors.clear();
        self.phase = FormPhase::Submitting;
        tracing::info!(
            direction = %submission.direction,
            weight = submission.weight,
            unit = %submission.unit,
            weight_kg = submission.weight_kg(),
            "submitting weighing"
        );

        match api.submit_weight(&submission, cancel).await {
            ApiResponse::Data(receipt) => {
                tracing::info!(session_id = %receipt.session_id, "weighing recorded");
                self.phase = FormPhase::Succeeded {
                    session_id: receipt.session_id.clone(),
                };
                SubmitOutcome::Succeeded {
                    session_id: receipt.session_id,
                }
            }
            ApiResponse::Error(message) => {
                tracing::warn!(error = %message, "weighing rejected");
                self.phase = FormPhase::Failed {
                    message: message.clone(),
                };
                SubmitOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::TimeWindow;
    use crate::types::{ItemData, SessionData, SubmitReceipt, WeightTransaction};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn valid_draft() -> WeightFormData {
        WeightFormData {
            direction: Direction::In,
            truck: "T1".to_string(),
            containers: "1,2,3".to_string(),
            weight: "500".to_string(),
            unit: WeightUnit::Kg,
            force: false,
            produce: "apples".to_string(),
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        let submission = validate(&valid_draft()).unwrap();
        assert_eq!(submission.weight, 500.0);
        assert_eq!(submission.containers, "1,2,3");
    }

    #[test]
    fn test_zero_weight_flags_weight_only() {
        let mut draft = valid_draft();
        draft.weight = "0".to_string();

        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(&FormField::Weight).map(String::as_str),
            Some("Weight must be greater than 0")
        );
    }

    #[test]
    fn test_weight_rules() {
        let cases = [
            ("", "Please enter weight"),
            ("   ", "Please enter weight"),
            ("abc", "Weight must be a number"),
            ("NaN", "Weight must be a number"),
            ("-5", "Weight must be greater than 0"),
            ("100000", "Weight is too large"),
        ];

        for (raw, expected) in cases {
            let mut draft = valid_draft();
            draft.weight = raw.to_string();
            let errors = validate(&draft).unwrap_err();
            assert_eq!(
                errors.get(&FormField::Weight).map(String::as_str),
                Some(expected),
                "weight {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_weight_upper_bound_inclusive() {
        let mut draft = valid_draft();
        draft.weight = "99999".to_string();
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_bad_container_token() {
        let mut draft = valid_draft();
        draft.containers = "12,ab,3".to_string();

        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(&FormField::Containers).map(String::as_str),
            Some("Container IDs must be numbers only")
        );
    }

    #[test]
    fn test_container_tokens_are_trimmed() {
        let mut draft = valid_draft();
        draft.containers = " 12 , 7,3 ".to_string();
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_empty_container_token_rejected() {
        let mut draft = valid_draft();
        draft.containers = "1,,2".to_string();
        assert!(validate(&draft)
            .unwrap_err()
            .contains_key(&FormField::Containers));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        let mut draft = valid_draft();
        draft.containers = "١٢".to_string();
        assert!(validate(&draft).is_err());
    }

    #[test]
    fn test_empty_containers_allowed() {
        let mut draft = valid_draft();
        draft.containers = String::new();
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_truck_and_produce_required() {
        let mut draft = valid_draft();
        draft.truck = "  ".to_string();
        draft.produce = String::new();

        let errors = validate(&draft).unwrap_err();
        assert!(errors.contains_key(&FormField::Truck));
        assert!(errors.contains_key(&FormField::Produce));
        assert!(!errors.contains_key(&FormField::Weight));
    }

    #[test]
    fn test_direction_none_skips_cargo_rules() {
        let draft = WeightFormData {
            direction: Direction::None,
            truck: String::new(),
            containers: "not,numbers".to_string(),
            weight: "1200".to_string(),
            unit: WeightUnit::Lbs,
            force: true,
            produce: String::new(),
        };

        let submission = validate(&draft).unwrap();
        assert_eq!(submission.direction, Direction::None);
        assert!(submission.force);
    }

    #[test]
    fn test_editing_clears_only_that_field() {
        let mut form = WeightForm::new();
        form.errors = validate(&form.data).unwrap_err();
        assert!(form.error(FormField::Weight).is_some());
        assert!(form.error(FormField::Truck).is_some());

        form.set_weight("10");
        assert!(form.error(FormField::Weight).is_none());
        assert!(form.error(FormField::Truck).is_some());
    }

    #[derive(Default)]
    struct RecordingApi {
        reply: Option<String>,
        submitted: Mutex<Vec<WeightSubmission>>,
    }

    #[async_trait]
    impl WeightApi for RecordingApi {
        async fn get_transactions(
            &self,
            _window: &TimeWindow,
            _cancel: &CancelToken,
        ) -> ApiResponse<Vec<WeightTransaction>> {
            ApiResponse::Data(Vec::new())
        }

        async fn submit_weight(
            &self,
            submission: &WeightSubmission,
            _cancel: &CancelToken,
        ) -> ApiResponse<SubmitReceipt> {
            self.submitted.lock().unwrap().push(submission.clone());
            match &self.reply {
                None => ApiResponse::Data(SubmitReceipt {
                    session_id: "s-1".to_string(),
                }),
                Some(message) => ApiResponse::Error(message.clone()),
            }
        }

        async fn get_item_details(&self, _id: &str, _cancel: &CancelToken) -> ApiResponse<ItemData> {
            ApiResponse::Error("unused".to_string())
        }

        async fn get_session_details(
            &self,
            _id: &str,
            _cancel: &CancelToken,
        ) -> ApiResponse<SessionData> {
            ApiResponse::Error("unused".to_string())
        }
    }

    fn filled_form() -> WeightForm {
        let mut form = WeightForm::new();
        form.set_direction(Direction::In);
        form.set_truck("T1");
        form.set_containers("1,2,3");
        form.set_weight("500");
        form.set_produce("apples");
        form
    }

    #[tokio::test]
    async fn test_invalid_submit_sends_nothing() {
        let api = RecordingApi::default();
        let mut form = filled_form();
        form.set_weight("0");

        let outcome = form.submit(&api, &CancelToken::new()).await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert!(api.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit() {
        let api = RecordingApi::default();
        let mut form = filled_form();

        let outcome = form.submit(&api, &CancelToken::new()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Succeeded {
                session_id: "s-1".to_string()
            }
        );
        let sent = api.submitted.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].weight, 500.0);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let api = RecordingApi {
            reply: Some("Truck T1 already inside".to_string()),
            ..Default::default()
        };
        let mut form = filled_form();

        let outcome = form.submit(&api, &CancelToken::new()).await;

        assert_eq!(outcome, SubmitOutcome::Failed("Truck T1 already inside".to_string()));
        assert_eq!(form.submit_error(), Some("Truck T1 already inside"));
        assert_eq!(form.data().truck, "T1");
        assert_eq!(form.data().weight, "500");

        form.dismiss_error();
        assert_eq!(form.phase(), &FormPhase::Editing);
    }

    #[tokio::test]
    async fn test_submit_while_in_flight_is_rejected() {
        let api = RecordingApi::default();
        let mut form = filled_form();
        form.phase = FormPhase::Submitting;

        let outcome = form.submit(&api, &CancelToken::new()).await;

        assert_eq!(outcome, SubmitOutcome::Busy);
        assert!(api.submitted.lock().unwrap().is_empty());
    }
}
