// Request validation

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$")
        .expect("email pattern compiles")
});

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted field path, e.g. `document.front`
    pub field: String,

    /// Error message
    pub message: String,

    /// Rule that failed
    pub constraint: &'static str,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Every failing field of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether `field` has at least one error
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Get errors for a specific field
    pub fn get_field_errors(&self, field: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "message": e.message,
                    "constraint": e.constraint,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        f.write_str(&fields.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Types that check their own fields before being sent
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Collects field errors so every failure is reported at once.
#[derive(Debug, Default)]
pub struct Rules {
    errors: Vec<ValidationError>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, constraint: &'static str, message: String) {
        self.errors.push(ValidationError::new(field, constraint, message));
    }

    /// Required non-blank string with a maximum length.
    pub fn required(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "required", format!("{} is required", field));
        } else {
            self.max_len(field, value, max);
        }
        self
    }

    /// Optional string with a maximum length.
    pub fn optional(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(value) = value {
            self.max_len(field, value, max);
        }
        self
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.fail(
                field,
                "max",
                format!("{} must not be longer than {} characters", field, max),
            );
        }
    }

    /// Required string of exactly `len` characters.
    pub fn exact(&mut self, field: &str, value: &str, len: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "required", format!("{} is required", field));
        } else if value.chars().count() != len {
            self.fail(field, "size", format!("{} must be {} characters", field, len));
        }
        self
    }

    /// Required, well-formed email address.
    pub fn email(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        self.required(field, value, max);
        if !value.trim().is_empty() && !EMAIL_REGEX.is_match(value) {
            self.fail(field, "email", format!("{} must be a valid email address", field));
        }
        self
    }

    /// Value must satisfy `allowed`.
    pub fn one_of(
        &mut self,
        field: &str,
        value: &str,
        allowed: impl Fn(&str) -> bool,
    ) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "required", format!("{} is required", field));
        } else if !allowed(value) {
            self.fail(field, "in", format!("{} '{}' is not a supported value", field, value));
        }
        self
    }

    /// Required `YYYY-MM-DD` date strictly before today.
    pub fn date_before_today(&mut self, field: &str, value: &str) -> &mut Self {
        if let Some(date) = self.date(field, value) {
            if date >= Utc::now().date_naive() {
                self.fail(field, "before", format!("{} must be a date before today", field));
            }
        }
        self
    }

    /// Required `YYYY-MM-DD` date strictly after today.
    pub fn date_after_today(&mut self, field: &str, value: &str) -> &mut Self {
        if let Some(date) = self.date(field, value) {
            if date <= Utc::now().date_naive() {
                self.fail(field, "after", format!("{} must be a date after today", field));
            }
        }
        self
    }

    fn date(&mut self, field: &str, value: &str) -> Option<NaiveDate> {
        if value.trim().is_empty() {
            self.fail(field, "required", format!("{} is required", field));
            return None;
        }
        match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.fail(field, "date", format!("{} must be a date (YYYY-MM-DD)", field));
                None
            }
        }
    }

    /// Decimal at least `min`.
    pub fn min_decimal(&mut self, field: &str, value: Decimal, min: Decimal) -> &mut Self {
        if value < min {
            self.fail(field, "min", format!("{} must be at least {}", field, min));
        }
        self
    }

    /// Record an arbitrary failure.
    pub fn custom(&mut self, field: &str, constraint: &'static str, message: impl Into<String>) -> &mut Self {
        self.fail(field, constraint, message.into());
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: std::mem::take(&mut self.errors),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_required_and_max() {
        let err = Rules::new()
            .required("user_id", "", 50)
            .required("card_id", &"x".repeat(51), 50)
            .required("request_id", "r1", 100)
            .finish()
            .unwrap_err();

        assert_eq!(err.len(), 2);
        assert_eq!(err.get_field_errors("user_id")[0].constraint, "required");
        assert_eq!(err.get_field_errors("card_id")[0].constraint, "max");
        assert!(!err.has("request_id"));
    }

    #[test]
    fn test_email() {
        assert!(Rules::new().email("email", "user+tag@example.com", 100).finish().is_ok());
        assert!(Rules::new().email("email", "invalid", 100).finish().is_err());
        assert!(Rules::new().email("email", "a@localhost", 100).finish().is_err());
    }

    #[test]
    fn test_dates() {
        let today = Utc::now().date_naive();
        let yesterday = (today - Duration::days(1)).format("%Y-%m-%d").to_string();
        let tomorrow = (today + Duration::days(1)).format("%Y-%m-%d").to_string();

        assert!(Rules::new().date_before_today("dob", &yesterday).finish().is_ok());
        assert!(Rules::new().date_before_today("dob", &tomorrow).finish().is_err());
        assert!(Rules::new().date_after_today("expiry", &tomorrow).finish().is_ok());
        assert!(Rules::new().date_after_today("expiry", &yesterday).finish().is_err());

        let err = Rules::new().date_before_today("dob", "01/02/1990").finish().unwrap_err();
        assert_eq!(err.errors[0].constraint, "date");
    }

    #[test]
    fn test_exact_and_one_of() {
        let err = Rules::new()
            .exact("country", "FRA", 2)
            .one_of("card_level", "9", |v| ["1", "2", "3", "4", "5"].contains(&v))
            .finish()
            .unwrap_err();
        assert!(err.has("country"));
        assert!(err.has("card_level"));
        assert!(err.to_string().contains("card_level"));
    }
}
