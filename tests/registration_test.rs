//! Tests for registration validation and seed derivation.

use strictly_guess::{
    FieldError, Registration, RegistrationError, validate_email, validate_name, validate_phone,
};

#[test]
fn test_field_messages() {
    assert_eq!(
        validate_name("1").unwrap_err().to_string(),
        "Invalid name: Should be non-numeric and longer than 1 character."
    );
    assert_eq!(
        validate_email("someone").unwrap_err().to_string(),
        "Invalid email format."
    );
    assert_eq!(
        validate_phone("0000000000").unwrap_err().to_string(),
        "Phone must be 10 digits, last digit cannot be 0 or 1."
    );
}

#[test]
fn test_every_legal_last_digit_becomes_the_seed() {
    for digit in 2..=9u32 {
        let phone = format!("555123456{digit}");
        let player = Registration::new("Grace", "grace@example.org", phone)
            .with_terms(true)
            .submit()
            .unwrap();
        assert_eq!(player.seed().get(), digit);
    }
}

#[test]
fn test_submit_message() {
    let err = Registration::new("Grace", "grace@example.org", "5551234561")
        .with_terms(true)
        .submit()
        .unwrap_err();
    assert_eq!(err, RegistrationError::InvalidFields(vec![FieldError::Phone]));
    assert_eq!(
        err.to_string(),
        "Please fix validation errors and check the box."
    );
}

#[test]
fn test_name_is_trimmed_on_submit() {
    let player = Registration::new("  Grace ", "grace@example.org", "5551234569")
        .with_terms(true)
        .submit()
        .unwrap();
    assert_eq!(player.name(), "Grace");
}
