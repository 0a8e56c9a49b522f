//! Dynamic attribute checks.
//!
//! Checks run after the type check on present values. Each returns a
//! detail string on failure.

use crate::core::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

#[allow(clippy::expect_used)]
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern is valid")
});

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

#[allow(clippy::expect_used)]
static BOOLEAN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:true|false|0|1)$").expect("boolean pattern is valid"));

#[allow(clippy::expect_used)]
static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:\d+Y)?(?:\d+M)?(?:\d+W)?(?:\d+D)?(?:T(?:\d+H)?(?:\d+M)?(?:\d+(?:\.\d+)?S)?)?$")
        .expect("duration pattern is valid")
});

/// Built-in and custom string formats.
#[derive(Debug, Clone)]
pub enum Format {
    /// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
    Uuid,
    /// An email address.
    Email,
    /// 8 to 16 characters with a digit, a lowercase and an uppercase letter.
    Password,
    /// `%Y-%m-%d`.
    Date,
    /// RFC 3339, or `%Y-%m-%d %H:%M:%S`.
    DateTime,
    /// `%H:%M` or `%H:%M:%S`.
    Time,
    /// `true`, `false`, `0` or `1`.
    Boolean,
    /// ISO-8601 duration (`P1DT2H`).
    Duration,
    /// A user pattern.
    Custom {
        /// Name used in violation details.
        name: String,
        /// Pattern the whole string must match.
        pattern: Regex,
    },
}

impl Format {
    /// Creates a custom format.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn custom(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Custom {
            name: name.into(),
            pattern: Regex::new(pattern)?,
        })
    }

    /// Name of the format.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Uuid => "uuid",
            Self::Email => "email",
            Self::Password => "password",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Boolean => "boolean",
            Self::Duration => "duration",
            Self::Custom { name, .. } => name,
        }
    }

    /// Returns `true` if `text` is in this format.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Uuid => UUID_PATTERN.is_match(text),
            Self::Email => EMAIL_PATTERN.is_match(text),
            Self::Password => {
                let length = text.chars().count();
                (8..=16).contains(&length)
                    && text.chars().any(|c| c.is_ascii_digit())
                    && text.chars().any(|c| c.is_ascii_lowercase())
                    && text.chars().any(|c| c.is_ascii_uppercase())
            }
            Self::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok(),
            Self::DateTime => {
                DateTime::parse_from_rfc3339(text).is_ok()
                    || NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").is_ok()
            }
            Self::Time => {
                NaiveTime::parse_from_str(text, "%H:%M:%S").is_ok()
                    || NaiveTime::parse_from_str(text, "%H:%M").is_ok()
            }
            Self::Boolean => BOOLEAN_PATTERN.is_match(text),
            Self::Duration => text != "P" && !text.ends_with('T') && DURATION_PATTERN.is_match(text),
            Self::Custom { pattern, .. } => pattern.is_match(text),
        }
    }
}

/// A user predicate with a code and an optional message.
#[derive(Clone)]
pub struct MustCheck {
    /// Short identifier, e.g. `be_positive`.
    pub code: String,
    /// Message used instead of `must <code>`.
    pub message: Option<String>,
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl MustCheck {
    /// Creates a new predicate check.
    pub fn new<F>(code: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            code: code.into(),
            message: None,
            predicate: Arc::new(predicate),
        }
    }

    /// Sets the failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn holds(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for MustCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MustCheck")
            .field("code", &self.code)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A dynamic option evaluated against the whole value.
#[derive(Debug, Clone)]
pub enum AttributeCheck {
    /// Lower bound on numbers, string length or collection size.
    Min(i64),
    /// Upper bound on numbers, string length or collection size.
    Max(i64),
    /// The number must be a multiple of the divisor.
    MultipleOf(f64),
    /// The string must be in the given format.
    Format(Format),
    /// A user predicate.
    Must(MustCheck),
}

impl AttributeCheck {
    /// Shortcut for [`AttributeCheck::Must`].
    pub fn must<F>(code: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Must(MustCheck::new(code, predicate))
    }

    /// Name used in violation details.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::MultipleOf(_) => "multiple_of",
            Self::Format(_) => "format",
            Self::Must(check) => &check.code,
        }
    }

    /// Evaluates the check.
    ///
    /// # Errors
    ///
    /// Returns the failure detail when the value does not satisfy the check.
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluate(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::Min(min) => match measure(value) {
                Some(measured) if measured >= *min as f64 => Ok(()),
                Some(measured) => Err(format!("must be at least {min}, got {measured}")),
                None => Err(format!("{} cannot be compared with {min}", value.type_name())),
            },
            Self::Max(max) => match measure(value) {
                Some(measured) if measured <= *max as f64 => Ok(()),
                Some(measured) => Err(format!("must be at most {max}, got {measured}")),
                None => Err(format!("{} cannot be compared with {max}", value.type_name())),
            },
            Self::MultipleOf(divisor) => {
                let Some(number) = value.as_f64() else {
                    return Err(format!("{} is not a number", value.type_name()));
                };
                if *divisor == 0.0 {
                    return Err(format!("{number} cannot be divided by 0"));
                }
                let remainder = (number % divisor).abs();
                let tolerance = f64::EPSILON * number.abs().max(divisor.abs()).max(1.0);
                if remainder <= tolerance || divisor.abs() - remainder <= tolerance {
                    Ok(())
                } else {
                    Err(format!("{number} is not a multiple of {divisor}"))
                }
            }
            Self::Format(format) => match value.as_str() {
                Some(text) if format.matches(text) => Ok(()),
                Some(_) => Err(format!("does not match the `{}` format", format.name())),
                None => Err(format!(
                    "{} cannot be checked against the `{}` format",
                    value.type_name(),
                    format.name()
                )),
            },
            Self::Must(check) => {
                if check.holds(value) {
                    Ok(())
                } else {
                    Err(check
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("must {}", check.code)))
                }
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn measure(value: &Value) -> Option<f64> {
    value.as_f64().or_else(|| value.len().map(|len| len as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_on_numbers_strings_and_collections() {
        assert!(AttributeCheck::Min(3).evaluate(&Value::Integer(3)).is_ok());
        assert!(AttributeCheck::Min(3).evaluate(&Value::Float(2.5)).is_err());
        assert!(AttributeCheck::Max(3).evaluate(&Value::from("abc")).is_ok());
        assert!(AttributeCheck::Max(3).evaluate(&Value::from("abcd")).is_err());
        assert!(AttributeCheck::Min(1).evaluate(&Value::array([1])).is_ok());
        assert!(AttributeCheck::Min(1).evaluate(&Value::array(Vec::<Value>::new())).is_err());
        assert!(AttributeCheck::Min(1).evaluate(&Value::Boolean(true)).is_err());
    }

    #[test]
    fn test_min_detail() {
        let detail = AttributeCheck::Min(10).evaluate(&Value::Integer(4)).unwrap_err();
        assert_eq!(detail, "must be at least 10, got 4");
    }

    #[test]
    fn test_multiple_of() {
        assert!(AttributeCheck::MultipleOf(5.0).evaluate(&Value::Integer(25)).is_ok());
        assert!(AttributeCheck::MultipleOf(5.0).evaluate(&Value::Integer(26)).is_err());
        assert!(AttributeCheck::MultipleOf(0.5).evaluate(&Value::Float(2.5)).is_ok());
        let detail = AttributeCheck::MultipleOf(0.0).evaluate(&Value::Integer(4)).unwrap_err();
        assert!(detail.contains("divided by 0"));
        assert!(AttributeCheck::MultipleOf(2.0).evaluate(&Value::from("4")).is_err());
    }

    #[test]
    fn test_builtin_formats() {
        assert!(Format::Uuid.matches("123e4567-e89b-12d3-a456-426614174000"));
        assert!(!Format::Uuid.matches("123e4567e89b12d3a456426614174000"));
        assert!(Format::Email.matches("ada@example.com"));
        assert!(!Format::Email.matches("ada.example.com"));
        assert!(Format::Password.matches("Secret123"));
        assert!(!Format::Password.matches("secret123"));
        assert!(Format::Date.matches("2024-02-29"));
        assert!(!Format::Date.matches("2023-02-29"));
        assert!(Format::DateTime.matches("2024-01-01T10:00:00Z"));
        assert!(Format::DateTime.matches("2024-01-01 10:00:00"));
        assert!(Format::Time.matches("23:59"));
        assert!(!Format::Time.matches("24:61"));
        assert!(Format::Boolean.matches("TRUE"));
        assert!(!Format::Boolean.matches("yes"));
        assert!(Format::Duration.matches("P1DT2H"));
        assert!(!Format::Duration.matches("P"));
        assert!(!Format::Duration.matches("P1DT"));
    }

    #[test]
    fn test_custom_format() {
        let format = Format::custom("sku", r"^[A-Z]{3}-\d{4}$").unwrap();
        let check = AttributeCheck::Format(format);
        assert!(check.evaluate(&Value::from("ABC-1234")).is_ok());
        let detail = check.evaluate(&Value::from("abc")).unwrap_err();
        assert_eq!(detail, "does not match the `sku` format");
        assert!(check.evaluate(&Value::Integer(1)).is_err());
    }

    #[test]
    fn test_must() {
        let check = AttributeCheck::must("be_positive", |value| value.as_i64().is_some_and(|n| n > 0));
        assert_eq!(check.name(), "be_positive");
        assert!(check.evaluate(&Value::Integer(1)).is_ok());
        assert_eq!(check.evaluate(&Value::Integer(-1)).unwrap_err(), "must be_positive");

        let check = AttributeCheck::Must(
            MustCheck::new("be_even", |value| value.as_i64().is_some_and(|n| n % 2 == 0))
                .with_message("only even numbers are accepted"),
        );
        assert_eq!(
            check.evaluate(&Value::Integer(3)).unwrap_err(),
            "only even numbers are accepted"
        );
    }
}
