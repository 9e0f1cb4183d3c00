//! Form checks run before anything is submitted.
//!
//! Each validator collects every failing field so the caller can show the
//! messages next to the inputs; a non-empty [`ValidationErrors`] blocks the
//! submission.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::constants::forms;
use crate::models::{LibraryForm, ReportForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message reported for `field`, if any.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"))
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if !email_regex().is_match(email.trim()) {
        errors.push("email", "Invalid email address");
    }
}

fn check_min_len(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.chars().count() < min {
        errors.push(field, message);
    }
}

fn check_rating(errors: &mut ValidationErrors, rating: Option<f64>) {
    if let Some(rating) = rating {
        if !(forms::RATING_MIN..=forms::RATING_MAX).contains(&rating) {
            errors.push(
                "rating",
                format!(
                    "Rating must be between {} and {}",
                    forms::RATING_MIN,
                    forms::RATING_MAX
                ),
            );
        }
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_email(&mut errors, email);
    check_min_len(
        &mut errors,
        "password",
        password,
        forms::PASSWORD_MIN_LEN,
        "Password must be at least 6 characters",
    );
    errors.into_result()
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = validate_login(email, password).err().unwrap_or_default();
    check_min_len(
        &mut errors,
        "username",
        username,
        forms::USERNAME_MIN_LEN,
        "Username must be at least 3 characters",
    );
    errors.into_result()
}

/// Profile edits. The password is optional, but when given it must be long
/// enough and match its confirmation.
pub fn validate_profile_update(
    username: &str,
    email: &str,
    password: Option<&str>,
    confirm_password: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_email(&mut errors, email);
    check_min_len(
        &mut errors,
        "username",
        username,
        forms::USERNAME_MIN_LEN,
        "Username must be at least 3 characters",
    );

    let password = password.filter(|p| !p.is_empty());
    if let Some(password) = password {
        check_min_len(
            &mut errors,
            "password",
            password,
            forms::PASSWORD_MIN_LEN,
            "Password must be at least 6 characters",
        );
    }
    if password != confirm_password.filter(|p| !p.is_empty()) {
        errors.push("confirmPassword", "Passwords do not match");
    }

    errors.into_result()
}

pub fn validate_review(text: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_min_len(
        &mut errors,
        "review_text",
        text.trim(),
        forms::REVIEW_MIN_LEN,
        "Review must be at least 10 characters long",
    );
    errors.into_result()
}

pub fn validate_rating(rating: f64) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_rating(&mut errors, Some(rating));
    errors.into_result()
}

pub fn validate_library_entry(form: &LibraryForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if form.status.trim().is_empty() {
        errors.push("status", "Select a status");
    }
    if form.played_on.trim().is_empty() {
        errors.push("played_on", "Select the platform you played on");
    }
    check_rating(&mut errors, form.rating);
    errors.into_result()
}

pub fn validate_report(form: &ReportForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    match form.reason.as_deref() {
        None | Some("") => errors.push("reason", "Please select a reason"),
        Some(reason) if !form.report_type.reasons().contains(&reason) => {
            errors.push("reason", format!("'{reason}' is not a reason for reporting a {}", form.report_type));
        }
        Some(_) => {}
    }
    check_min_len(
        &mut errors,
        "content",
        form.content.trim(),
        forms::REPORT_MIN_LEN,
        "Report should be at least 10 characters",
    );
    errors.into_result()
}

/// Comments only need to be non-blank.
pub fn validate_comment(content: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if content.trim().is_empty() {
        errors.push("content", "Comment cannot be empty");
    }
    errors.into_result()
}
