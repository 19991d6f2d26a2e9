//! Declarative payload validation.
//!
//! Each request payload exposes a `validate()` that checks field presence and
//! format and either produces the typed domain value or a structured list of
//! [`FieldError`]s. The whole list is collected before returning so a client
//! sees every problem at once, not just the first.

use serde::Serialize;

use barrel_verse_core::{Email, Price};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The offending payload field, in wire (camelCase) spelling.
    pub field: &'static str,
    /// Human-readable description of what is wrong.
    pub message: String,
}

impl FieldError {
    /// Build a field error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Collects field errors while a payload is being validated.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    /// Start a fresh validation pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Require a present, non-empty string.
    pub fn require_text(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        match value {
            Some(s) if !s.trim().is_empty() => Some(s),
            Some(_) => {
                self.fail(field, "must not be empty");
                None
            }
            None => {
                self.fail(field, "is required");
                None
            }
        }
    }

    /// Require a present password meeting the minimum length.
    pub fn require_password(
        &mut self,
        field: &'static str,
        value: Option<String>,
    ) -> Option<String> {
        let raw = self.require_text(field, value)?;
        if raw.len() < MIN_PASSWORD_LENGTH {
            self.fail(
                field,
                format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
            return None;
        }
        Some(raw)
    }

    /// Require a present, well-formed email address.
    pub fn require_email(&mut self, field: &'static str, value: Option<String>) -> Option<Email> {
        let raw = self.require_text(field, value)?;
        match Email::parse(&raw) {
            Ok(email) => Some(email),
            Err(e) => {
                self.fail(field, e.to_string());
                None
            }
        }
    }

    /// Require a present, valid price string.
    pub fn require_price(&mut self, field: &'static str, value: Option<String>) -> Option<Price> {
        let raw = self.require_text(field, value)?;
        self.parse_price(field, &raw)
    }

    /// Parse an already-present price string.
    pub fn parse_price(&mut self, field: &'static str, raw: &str) -> Option<Price> {
        match Price::parse(raw) {
            Ok(price) => Some(price),
            Err(e) => {
                self.fail(field, e.to_string());
                None
            }
        }
    }

    /// Require membership in a closed enum (category, level, item type, ...).
    pub fn require_variant<T>(&mut self, field: &'static str, value: Option<String>) -> Option<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.require_text(field, value)?;
        self.parse_variant(field, &raw)
    }

    /// Parse an already-present enum value.
    pub fn parse_variant<T>(&mut self, field: &'static str, raw: &str) -> Option<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(e) => {
                self.fail(field, e.to_string());
                None
            }
        }
    }

    /// Finish the pass: `Ok(())` when nothing failed, the error list
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns every [`FieldError`] recorded during the pass.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use barrel_verse_core::CourseCategory;

    #[test]
    fn test_require_text_missing_and_empty() {
        let mut v = Validator::new();
        assert!(v.require_text("title", None).is_none());
        assert!(v.require_text("description", Some("   ".into())).is_none());
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first().unwrap().field, "title");
        assert_eq!(errors.first().unwrap().message, "is required");
    }

    #[test]
    fn test_require_password_length() {
        let mut v = Validator::new();
        assert!(v.require_password("password", Some("short".into())).is_none());
        assert!(
            v.require_password("password", Some("longenough".into()))
                .is_some()
        );
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().unwrap().field, "password");
        assert!(errors.first().unwrap().message.contains("at least 8"));
    }

    #[test]
    fn test_require_email_shape() {
        let mut v = Validator::new();
        assert!(v.require_email("email", Some("nope".into())).is_none());
        assert!(v.finish().is_err());
    }

    #[test]
    fn test_require_price_format() {
        let mut v = Validator::new();
        assert!(v.require_price("price", Some("19.999".into())).is_none());
        assert!(
            v.require_price("amount", Some("19.99".into()))
                .is_some()
        );
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().unwrap().field, "price");
    }

    #[test]
    fn test_require_variant_membership() {
        let mut v = Validator::new();
        let cat: Option<CourseCategory> = v.require_variant("category", Some("video".into()));
        assert_eq!(cat, Some(CourseCategory::Video));
        let bad: Option<CourseCategory> = v.require_variant("category", Some("webinar".into()));
        assert!(bad.is_none());
        assert!(v.finish().is_err());
    }

    #[test]
    fn test_all_errors_collected() {
        let mut v = Validator::new();
        v.require_text("title", None);
        v.require_price("price", Some("-3".into()));
        let bad: Option<CourseCategory> = v.require_variant("category", None);
        assert!(bad.is_none());
        assert_eq!(v.finish().unwrap_err().len(), 3);
    }
}
