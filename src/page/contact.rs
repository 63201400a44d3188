use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

pub const CONTACT_FORM: &str = ".contact-form";
pub const THANK_YOU: &str = "Thank you for your message! I'll get back to you soon.";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Raw field values as submitted; `None` when the field is missing from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactForm {
    pub fn new(name: &str, email: &str, subject: &str, message: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            subject: Some(subject.to_string()),
            message: Some(message.to_string()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please fill in all fields.")]
    MissingField,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn validate(form: &ContactForm) -> Result<(), ContactError> {
    let filled = |f: &Option<String>| f.as_deref().is_some_and(|v| !v.is_empty());
    if ![&form.name, &form.email, &form.subject, &form.message].into_iter().all(filled) {
        return Err(ContactError::MissingField);
    }
    match form.email.as_deref() {
        Some(email) if is_valid_email(email) => Ok(()),
        _ => Err(ContactError::InvalidEmail),
    }
}
