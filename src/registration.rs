//! Registration form validation.
//!
//! Three independent field checks plus the terms checkbox. A form that passes
//! everything becomes a [`Player`], whose phone number supplies the game seed.

use std::sync::LazyLock;

use derive_getters::Getters;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::games::guess::Seed;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9}[2-9]$").expect("valid regex"));

/// A single field failed its check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FieldError {
    /// Name is too short or contains a digit.
    #[display("Invalid name: Should be non-numeric and longer than 1 character.")]
    Name,
    /// Email does not look like `local@domain.tld`.
    #[display("Invalid email format.")]
    Email,
    /// Phone is not 10 digits ending in 2-9.
    #[display("Phone must be 10 digits, last digit cannot be 0 or 1.")]
    Phone,
}

impl std::error::Error for FieldError {}

/// Checks a display name.
pub fn validate_name(input: &str) -> Result<(), FieldError> {
    let trimmed = input.trim();
    if trimmed.chars().count() <= 1 || trimmed.chars().any(|c| c.is_ascii_digit()) {
        Err(FieldError::Name)
    } else {
        Ok(())
    }
}

/// Checks an email address shape.
pub fn validate_email(input: &str) -> Result<(), FieldError> {
    if EMAIL_RE.is_match(input) {
        Ok(())
    } else {
        Err(FieldError::Email)
    }
}

/// Checks a phone number: exactly 10 digits, last one in `2..=9`.
pub fn validate_phone(input: &str) -> Result<(), FieldError> {
    if PHONE_RE.is_match(input) {
        Ok(())
    } else {
        Err(FieldError::Phone)
    }
}

/// Why a form could not be submitted.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RegistrationError {
    /// One or more fields failed.
    #[display("Please fix validation errors and check the box.")]
    InvalidFields(Vec<FieldError>),
    /// The terms checkbox is not checked.
    #[display("Please fix validation errors and check the box.")]
    TermsNotAccepted,
}

impl std::error::Error for RegistrationError {}

/// Raw contents of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct Registration {
    name: String,
    email: String,
    phone: String,
    terms_accepted: bool,
}

impl Registration {
    /// Creates a form with the given fields and the checkbox unchecked.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            terms_accepted: false,
        }
    }

    /// Sets the terms checkbox.
    pub fn with_terms(mut self, accepted: bool) -> Self {
        self.terms_accepted = accepted;
        self
    }

    /// Mutable access to the name field.
    pub fn name_mut(&mut self) -> &mut String {
        &mut self.name
    }

    /// Mutable access to the email field.
    pub fn email_mut(&mut self) -> &mut String {
        &mut self.email
    }

    /// Mutable access to the phone field.
    pub fn phone_mut(&mut self) -> &mut String {
        &mut self.phone
    }

    /// Flips the terms checkbox.
    pub fn toggle_terms(&mut self) {
        self.terms_accepted = !self.terms_accepted;
    }

    /// Every failing field, in form order.
    pub fn field_errors(&self) -> Vec<FieldError> {
        [
            validate_name(&self.name),
            validate_email(&self.email),
            validate_phone(&self.phone),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    /// Validates the whole form.
    ///
    /// # Errors
    ///
    /// `InvalidFields` if any field fails, else `TermsNotAccepted` if the
    /// checkbox is clear.
    #[instrument(skip(self))]
    pub fn submit(&self) -> Result<Player, RegistrationError> {
        let errors = self.field_errors();
        if !errors.is_empty() {
            debug!(?errors, "Registration has invalid fields");
            return Err(RegistrationError::InvalidFields(errors));
        }
        if !self.terms_accepted {
            debug!("Terms not accepted");
            return Err(RegistrationError::TermsNotAccepted);
        }
        // The phone pattern guarantees a trailing 2-9.
        let seed = Seed::from_phone(&self.phone).unwrap_or(Seed::clamped(Seed::MIN));
        info!(%seed, "Player registered");
        Ok(Player {
            name: self.name.trim().to_string(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            seed,
        })
    }
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct Player {
    name: String,
    email: String,
    phone: String,
    #[getter(skip)]
    seed: Seed,
}

impl Player {
    /// Game seed from the last phone digit.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Turns the player back into an editable, already-accepted form.
    pub fn into_registration(self) -> Registration {
        Registration {
            name: self.name,
            email: self.email,
            phone: self.phone,
            terms_accepted: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("Al"), Ok(()));
        assert_eq!(validate_name(" A "), Err(FieldError::Name));
        assert_eq!(validate_name(""), Err(FieldError::Name));
        assert_eq!(validate_name("R2D2"), Err(FieldError::Name));
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(validate_email("a@b.co"), Ok(()));
        assert_eq!(validate_email("a@b"), Err(FieldError::Email));
        assert_eq!(validate_email("a b@c.d"), Err(FieldError::Email));
        assert_eq!(validate_email("@b.co"), Err(FieldError::Email));
    }

    #[test]
    fn test_phone_rules() {
        assert_eq!(validate_phone("5551234567"), Ok(()));
        assert_eq!(validate_phone("5551234562"), Ok(()));
        assert_eq!(validate_phone("5551234561"), Err(FieldError::Phone));
        assert_eq!(validate_phone("5551234560"), Err(FieldError::Phone));
        assert_eq!(validate_phone("555123456"), Err(FieldError::Phone));
        assert_eq!(validate_phone("55512345678"), Err(FieldError::Phone));
        assert_eq!(validate_phone("555-123-4567"), Err(FieldError::Phone));
        assert_eq!(
            validate_phone("\u{661}\u{662}\u{663}\u{664}\u{665}\u{666}\u{667}\u{668}\u{669}3"),
            Err(FieldError::Phone)
        );
        assert_eq!(
            validate_phone("\u{ff15}\u{ff15}\u{ff15}\u{ff11}\u{ff12}\u{ff13}\u{ff14}\u{ff15}\u{ff16}7"),
            Err(FieldError::Phone)
        );
    }

    #[test]
    fn test_non_ascii_digits_cannot_register() {
        let form = Registration::new(
            "Ada",
            "ada@example.com",
            "\u{661}\u{662}\u{663}\u{664}\u{665}\u{666}\u{667}\u{668}\u{669}3",
        )
        .with_terms(true);
        assert_eq!(
            form.submit(),
            Err(RegistrationError::InvalidFields(vec![FieldError::Phone]))
        );
    }

    #[test]
    fn test_submit_requires_terms() {
        let form = Registration::new("Ada", "ada@example.com", "5551234563");
        assert_eq!(form.submit(), Err(RegistrationError::TermsNotAccepted));

        let player = form.with_terms(true).submit().expect("valid form");
        assert_eq!(player.seed().get(), 3);
        assert_eq!(player.name(), "Ada");
    }

    #[test]
    fn test_submit_reports_every_bad_field() {
        let form = Registration::new("A", "nope", "123").with_terms(true);
        assert_eq!(
            form.submit(),
            Err(RegistrationError::InvalidFields(vec![
                FieldError::Name,
                FieldError::Email,
                FieldError::Phone
            ]))
        );
    }

    #[test]
    fn test_untouched_form_does_not_submit() {
        let form = Registration::default().with_terms(true);
        assert!(matches!(
            form.submit(),
            Err(RegistrationError::InvalidFields(_))
        ));
    }

    #[test]
    fn test_player_round_trips_to_form() {
        let player = Registration::new("Ada", "ada@example.com", "5551234563")
            .with_terms(true)
            .submit()
            .expect("valid form");
        let form = player.clone().into_registration();
        assert!(*form.terms_accepted());
        assert_eq!(form.submit(), Ok(player));
    }
}
