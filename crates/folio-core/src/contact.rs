#![forbid(unsafe_code)]

//! Contact form submission.
//!
//! The form moves through a strictly sequential lifecycle:
//!
//! ```text
//!  Idle ──submit──▶ Sending ──ok──▶ Sent ──(reset delay)──▶ Idle
//!                      │
//!                      └──err──▶ Error ──(next tick)──▶ Idle
//! ```
//!
//! The actual delivery is delegated to an external email service. The
//! controller hands out an [`EmailPayload`] on [`ContactForm::submit`] and
//! receives the outcome through [`ContactForm::finish`]; everything in
//! between is the host's single awaited call.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | [`FormError::MissingField`] | Required field blank after trim | Notice, no state change |
//! | [`FormError::Busy`] | Submit while a send is in flight | Ignored, no state change |
//! | [`DeliveryFailure`] | Email service rejected the send | Button re-enabled, classified notice |

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::{debug, warn};

/// Button label while idle.
pub const LABEL_IDLE: &str = "Send Message";
/// Button label after a successful send.
pub const LABEL_SENT: &str = "Sent ✓";
/// Notice shown when a required field is blank.
pub const NOTICE_INCOMPLETE: &str = "Please complete the form.";
/// Notice shown after a successful send.
pub const NOTICE_SENT: &str = "Message sent — thanks!";

/// Required form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        })
    }
}

/// Submission lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Sending,
    Sent,
    Error,
}

/// Why a submission was not started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A required field is empty or whitespace-only.
    MissingField(FormField),
    /// A previous submission has not settled yet.
    Busy(SubmitState),
}

impl FormError {
    /// User-facing notice for this error, if one should be shown.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(_) => Some(NOTICE_INCOMPLETE),
            Self::Busy(_) => None,
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::Busy(state) => write!(f, "submission already in progress ({state:?})"),
        }
    }
}

impl std::error::Error for FormError {}

/// Raw field values as read from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Optional free-text context (company, subject, ...).
    pub context: String,
}

impl ContactFields {
    /// Check the required fields, in page order.
    pub fn validate(&self) -> Result<(), FormError> {
        for (field, value) in [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Message, &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// Structured payload handed to the email service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPayload {
    pub from_name: String,
    pub from_email: String,
    pub context: String,
    pub message: String,
    pub to_name: String,
    pub to_email: String,
}

/// Classification of a failed send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The service rejected the payload (bad address, missing param).
    InvalidInput,
    /// The service is down or out of quota.
    ServiceUnavailable,
    /// Too many sends in a short window.
    RateLimited,
    /// Anything else, including network errors.
    Unknown,
}

impl DeliveryFailure {
    /// Classify a failure from its status code and, when no status is
    /// available, from its message text.
    #[must_use]
    pub fn classify(status: Option<u16>, text: &str) -> Self {
        match status {
            Some(400 | 422) => Self::InvalidInput,
            Some(402 | 412 | 500 | 502 | 503 | 504) => Self::ServiceUnavailable,
            Some(429) => Self::RateLimited,
            Some(_) => Self::Unknown,
            None => {
                let text = text.to_ascii_lowercase();
                if text.contains("too many") || text.contains("rate limit") {
                    Self::RateLimited
                } else if text.contains("unavailable") || text.contains("quota") {
                    Self::ServiceUnavailable
                } else if text.contains("invalid") {
                    Self::InvalidInput
                } else {
                    Self::Unknown
                }
            }
        }
    }

    /// User-facing notice for this failure.
    #[must_use]
    pub fn notice(self) -> &'static str {
        match self {
            Self::InvalidInput => {
                "Some details look invalid. Please check your email address and try again."
            }
            Self::ServiceUnavailable => {
                "The mail service is temporarily unavailable. Please try again later or email me directly."
            }
            Self::RateLimited => {
                "Too many messages in a short time. Please wait a minute and try again."
            }
            Self::Unknown => "Something went wrong sending your message. Please try again.",
        }
    }
}

/// Error reported by the email service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryError {
    /// HTTP-like status, when the service provided one.
    pub status: Option<u16>,
    /// Free-form error text.
    pub text: String,
}

impl DeliveryError {
    /// Create a delivery error.
    #[must_use]
    pub fn new(status: Option<u16>, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    /// Classified failure.
    #[must_use]
    pub fn failure(&self) -> DeliveryFailure {
        DeliveryFailure::classify(self.status, &self.text)
    }
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "email delivery failed ({status}): {}", self.text),
            None => write!(f, "email delivery failed: {}", self.text),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Contact form settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Recipient display name.
    pub recipient_name: String,
    /// Recipient address.
    pub recipient_email: String,
    /// How long "Sent ✓" stays before the button resets.
    #[serde(rename = "sent_reset_ms", with = "crate::config::millis")]
    pub sent_reset_delay: Duration,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient_name: "Portfolio Owner".to_owned(),
            recipient_email: "hello@example.com".to_owned(),
            sent_reset_delay: Duration::from_millis(2200),
        }
    }
}

/// How a settled submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Delivered; the button resets after the configured delay.
    Sent,
    /// Not delivered; the button is usable again right away.
    Failed(DeliveryFailure),
}

impl SubmitOutcome {
    /// Notice to show for this outcome.
    #[must_use]
    pub fn notice(self) -> &'static str {
        match self {
            Self::Sent => NOTICE_SENT,
            Self::Failed(failure) => failure.notice(),
        }
    }
}

/// Contact form state machine.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    config: ContactConfig,
    state: SubmitState,
    reset_at: Option<Duration>,
}

impl ContactForm {
    /// Create an idle form.
    #[must_use]
    pub fn new(config: ContactConfig) -> Self {
        Self {
            config,
            state: SubmitState::Idle,
            reset_at: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Whether the submit button should accept clicks.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, SubmitState::Idle | SubmitState::Error)
    }

    /// Label the submit button should carry.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.state {
            SubmitState::Sent => LABEL_SENT,
            _ => LABEL_IDLE,
        }
    }

    /// Next time the form needs a tick.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.reset_at
    }

    /// Validate and enter `Sending`. On success returns the payload to send.
    pub fn submit(&mut self, fields: &ContactFields) -> Result<EmailPayload, FormError> {
        if !self.is_enabled() {
            return Err(FormError::Busy(self.state));
        }
        fields.validate()?;
        self.state = SubmitState::Sending;
        debug!("contact form sending");
        Ok(EmailPayload {
            from_name: fields.name.trim().to_owned(),
            from_email: fields.email.trim().to_owned(),
            context: fields.context.trim().to_owned(),
            message: fields.message.trim().to_owned(),
            to_name: self.config.recipient_name.clone(),
            to_email: self.config.recipient_email.clone(),
        })
    }

    /// Settle the in-flight submission. Returns `None` if nothing was in
    /// flight.
    pub fn finish(
        &mut self,
        result: Result<(), DeliveryError>,
        now: Duration,
    ) -> Option<SubmitOutcome> {
        if self.state != SubmitState::Sending {
            return None;
        }
        match result {
            Ok(()) => {
                debug!("contact form sent");
                self.state = SubmitState::Sent;
                self.reset_at = Some(now + self.config.sent_reset_delay);
                Some(SubmitOutcome::Sent)
            }
            Err(err) => {
                let failure = err.failure();
                warn!(error = %err, ?failure, "contact form delivery failed");
                self.state = SubmitState::Error;
                Some(SubmitOutcome::Failed(failure))
            }
        }
    }

    /// Advance timers. Returns `true` when the form returned to `Idle`.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.state {
            SubmitState::Error => {
                self.state = SubmitState::Idle;
                true
            }
            SubmitState::Sent if self.reset_at.is_some_and(|at| at <= now) => {
                self.state = SubmitState::Idle;
                self.reset_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn fields(name: &str, email: &str, message: &str) -> ContactFields {
        ContactFields {
            name: name.to_owned(),
            email: email.to_owned(),
            message: message.to_owned(),
            context: String::new(),
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut form = ContactForm::default();
        let err = form.submit(&fields("", "a@b.com", "hi")).unwrap_err();
        assert_eq!(err, FormError::MissingField(FormField::Name));
        assert_eq!(err.notice(), Some(NOTICE_INCOMPLETE));
        assert_eq!(form.state(), SubmitState::Idle);
    }

    #[test]
    fn whitespace_only_is_rejected() {
        let mut form = ContactForm::default();
        let err = form.submit(&fields("Ann", "a@b.com", "  \n\t")).unwrap_err();
        assert_eq!(err, FormError::MissingField(FormField::Message));
        assert!(form.is_enabled());
    }

    #[test]
    fn success_path_resets_after_delay() {
        let mut form = ContactForm::default();
        let payload = form.submit(&fields(" Ann ", "a@b.com", "hi")).unwrap();
        assert_eq!(payload.from_name, "Ann");
        assert_eq!(payload.to_email, "hello@example.com");
        assert_eq!(form.state(), SubmitState::Sending);
        assert!(!form.is_enabled());

        assert_eq!(form.finish(Ok(()), ms(1000)), Some(SubmitOutcome::Sent));
        assert_eq!(form.label(), LABEL_SENT);
        assert!(!form.is_enabled());
        assert!(!form.tick(ms(3199)));
        assert!(form.tick(ms(3200)));
        assert_eq!(form.label(), LABEL_IDLE);
        assert!(form.is_enabled());
    }

    #[test]
    fn double_submit_is_busy() {
        let mut form = ContactForm::default();
        form.submit(&fields("Ann", "a@b.com", "hi")).unwrap();
        let err = form.submit(&fields("Ann", "a@b.com", "hi")).unwrap_err();
        assert_eq!(err, FormError::Busy(SubmitState::Sending));
        assert_eq!(err.notice(), None);
    }

    #[test]
    fn failure_reenables_immediately() {
        let mut form = ContactForm::default();
        form.submit(&fields("Ann", "a@b.com", "hi")).unwrap();
        let outcome = form.finish(Err(DeliveryError::new(Some(429), "Too Many Requests")), ms(0));
        assert_eq!(
            outcome,
            Some(SubmitOutcome::Failed(DeliveryFailure::RateLimited))
        );
        assert!(form.is_enabled());
        assert!(form.submit(&fields("Ann", "a@b.com", "hi")).is_ok());
    }

    #[test]
    fn error_settles_to_idle_on_tick() {
        let mut form = ContactForm::default();
        form.submit(&fields("Ann", "a@b.com", "hi")).unwrap();
        form.finish(Err(DeliveryError::new(None, "network")), ms(0));
        assert_eq!(form.state(), SubmitState::Error);
        assert!(form.tick(ms(0)));
        assert_eq!(form.state(), SubmitState::Idle);
    }

    #[test]
    fn finish_without_send_is_ignored() {
        let mut form = ContactForm::default();
        assert_eq!(form.finish(Ok(()), ms(0)), None);
    }

    #[test]
    fn failure_classification() {
        use DeliveryFailure::*;
        assert_eq!(DeliveryFailure::classify(Some(400), ""), InvalidInput);
        assert_eq!(DeliveryFailure::classify(Some(422), ""), InvalidInput);
        assert_eq!(DeliveryFailure::classify(Some(503), ""), ServiceUnavailable);
        assert_eq!(DeliveryFailure::classify(Some(412), ""), ServiceUnavailable);
        assert_eq!(DeliveryFailure::classify(Some(429), ""), RateLimited);
        assert_eq!(DeliveryFailure::classify(Some(418), ""), Unknown);
        assert_eq!(DeliveryFailure::classify(None, "Rate limit hit"), RateLimited);
        assert_eq!(DeliveryFailure::classify(None, "Quota exceeded"), ServiceUnavailable);
        assert_eq!(DeliveryFailure::classify(None, "Invalid email"), InvalidInput);
        assert_eq!(DeliveryFailure::classify(None, "boom"), Unknown);
    }

    #[test]
    fn notices_are_distinct() {
        use DeliveryFailure::*;
        let notices = [InvalidInput, ServiceUnavailable, RateLimited, Unknown].map(|f| f.notice());
        for (i, a) in notices.iter().enumerate() {
            for b in &notices[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
