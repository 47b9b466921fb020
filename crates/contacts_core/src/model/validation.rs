//! Field validation for contact input.
//!
//! # Responsibility
//! - Check caller input before it reaches the store.
//!
//! # Invariants
//! - The store never calls into this module; validation is a caller concern.
//! - Rules are pure functions of the input strings.

use crate::model::contact::CreateContactDto;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MIN_NAME_CHARS: usize = 2;
const MAX_EMAIL_CHARS: usize = 254;
const MAX_EMAIL_LOCAL_CHARS: usize = 64;

// Dot-separated atoms before `@`; hostname labels (1-63 chars, no edge
// hyphen) after it. A bare host such as `ana@x` is accepted.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[a-zA-Z0-9!#$%\&'*+/=?\^_`\{\|\}\~\-]+",
        r"(?:\.[a-zA-Z0-9!#$%\&'*+/=?\^_`\{\|\}\~\-]+)*",
        r"@[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?",
        r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*$",
    ))
    .expect("valid email regex")
});
// ASCII digits only; `\d` would also accept other scripts' digits.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("valid phone regex"));

/// Field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

/// Validation failure for one contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Field is empty or whitespace only.
    Required(ContactField),
    /// Name is shorter than the minimum length.
    NameTooShort { min_chars: usize },
    /// Email is not a `local@host` address with ASCII atoms and labels.
    InvalidEmail,
    /// Phone is not an optional `+` followed by 1-16 digits.
    InvalidPhone,
}

impl ContactValidationError {
    /// Returns the field this error is about.
    pub fn field(&self) -> ContactField {
        match self {
            Self::Required(field) => *field,
            Self::NameTooShort { .. } => ContactField::Name,
            Self::InvalidEmail => ContactField::Email,
            Self::InvalidPhone => ContactField::Phone,
        }
    }
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required(field) => write!(f, "{} is required", field.as_str()),
            Self::NameTooShort { min_chars } => {
                write!(f, "name must be at least {min_chars} characters")
            }
            Self::InvalidEmail => write!(f, "email is not a valid address"),
            Self::InvalidPhone => write!(
                f,
                "phone must be digits with an optional leading `+` (max 16 digits)"
            ),
        }
    }
}

impl Error for ContactValidationError {}

impl CreateContactDto {
    /// Validates all fields, reporting the first failing one.
    ///
    /// Fields are checked in form order: name, email, phone.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        Ok(())
    }
}

pub fn validate_name(name: &str) -> Result<(), ContactValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ContactValidationError::Required(ContactField::Name));
    }
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return Err(ContactValidationError::NameTooShort {
            min_chars: MIN_NAME_CHARS,
        });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ContactValidationError> {
    if email.trim().is_empty() {
        return Err(ContactValidationError::Required(ContactField::Email));
    }
    let local_chars = email.find('@').unwrap_or(email.len());
    if email.len() > MAX_EMAIL_CHARS
        || local_chars > MAX_EMAIL_LOCAL_CHARS
        || !EMAIL_RE.is_match(email)
    {
        return Err(ContactValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ContactValidationError> {
    if phone.trim().is_empty() {
        return Err(ContactValidationError::Required(ContactField::Phone));
    }
    if !PHONE_RE.is_match(phone) {
        return Err(ContactValidationError::InvalidPhone);
    }
    Ok(())
}
