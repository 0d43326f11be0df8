//! Input validation module
//!
//! Field-level validators used by the request handlers. Each check pushes a
//! [`FieldError`] into a shared accumulator so a single 400 response can report
//! every failing field at once. Validation always runs before any store access.

use chrono::NaiveDate;

use crate::db::PageParams;
use crate::error::{ApiError, FieldError};

/// Bounds applied to signup input. The age bound is also enforced by the
/// store's CHECK constraint; both layers agree on the open interval (12, 110).
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 100;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 100;
pub const NAME_MAX: usize = 50;
pub const AGE_MIN_EXCLUSIVE: i32 = 12;
pub const AGE_MAX_EXCLUSIVE: i32 = 110;

/// Accumulates field errors and converts them into a single `ApiError`
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `Ok(())` when no checks failed, otherwise a 400 `ApiError`
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.0))
        }
    }
}

/// Check that a string's character count falls within `[min, max]`
pub fn check_length(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min {
        if min == 1 {
            errors.push(field, format!("{field} is required"));
        } else {
            errors.push(field, format!("{field} must be at least {min} characters"));
        }
    } else if len > max {
        errors.push(field, format!("{field} must be at most {max} characters"));
    }
}

/// Check that an integer falls within the inclusive range `[min, max]`
pub fn check_range(
    errors: &mut FieldErrors,
    field: &'static str,
    value: i32,
    min: i32,
    max: i32,
) {
    if value < min || value > max {
        errors.push(field, format!("{field} must be between {min} and {max}"));
    }
}

/// Check that a value is a plausibly shaped email address
pub fn check_email(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if !is_valid_email(value) {
        errors.push(field, format!("{field} must be a valid email address"));
    } else if value.chars().count() > EMAIL_MAX {
        errors.push(
            field,
            format!("{field} must be at most {EMAIL_MAX} characters"),
        );
    }
}

/// Check that a date string parses as `YYYY-MM-DD`, returning the parsed date
pub fn check_date(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, format!("{field} must be a date in YYYY-MM-DD format"));
            None
        }
    }
}

/// Validate pagination query parameters: 1-indexed positive page, limit 1..=100
pub fn validate_page_params(params: &PageParams) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    if params.page < 1 {
        errors.push("page", "page must be a positive integer");
    }
    if params.limit < 1 {
        errors.push("limit", "limit must be a positive integer");
    } else if params.limit > 100 {
        errors.push("limit", "limit must be at most 100");
    }
    errors.into_result()
}

/// Minimal email shape check: one `@`, non-empty local part, dotted domain,
/// no whitespace. Deliverability is the mail server's problem.
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => (local, domain),
        _ => return false,
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Domain needs an interior dot
    domain.split('.').count() >= 2 && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(is_valid_email("user+tag@example.co"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("two@at@signs.com"));
        assert!(!is_valid_email("spa ce@example.com"));
    }

    #[test]
    fn test_check_length_bounds() {
        let mut errors = FieldErrors::new();
        check_length(&mut errors, "username", "ab", USERNAME_MIN, USERNAME_MAX);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_length(&mut errors, "username", "abc", USERNAME_MIN, USERNAME_MAX);
        assert!(errors.is_empty());

        let mut errors = FieldErrors::new();
        check_length(
            &mut errors,
            "username",
            &"x".repeat(USERNAME_MAX + 1),
            USERNAME_MIN,
            USERNAME_MAX,
        );
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_check_range_age() {
        let mut errors = FieldErrors::new();
        check_range(&mut errors, "age", 12, AGE_MIN_EXCLUSIVE + 1, AGE_MAX_EXCLUSIVE - 1);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_range(&mut errors, "age", 13, AGE_MIN_EXCLUSIVE + 1, AGE_MAX_EXCLUSIVE - 1);
        assert!(errors.is_empty());

        let mut errors = FieldErrors::new();
        check_range(&mut errors, "age", 110, AGE_MIN_EXCLUSIVE + 1, AGE_MAX_EXCLUSIVE - 1);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_range(&mut errors, "age", 109, AGE_MIN_EXCLUSIVE + 1, AGE_MAX_EXCLUSIVE - 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_check_date() {
        let mut errors = FieldErrors::new();
        let date = check_date(&mut errors, "publicationDate", "2021-03-14");
        assert!(errors.is_empty());
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 3, 14));

        let mut errors = FieldErrors::new();
        assert!(check_date(&mut errors, "publicationDate", "14/03/2021").is_none());
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        assert!(check_date(&mut errors, "publicationDate", "2021-13-01").is_none());
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_into_result_collects_all_fields() {
        let mut errors = FieldErrors::new();
        check_length(&mut errors, "username", "", USERNAME_MIN, USERNAME_MAX);
        check_email(&mut errors, "email", "not-an-email");
        check_range(&mut errors, "age", 200, 13, 109);

        let err = errors.into_result().unwrap_err();
        match err {
            ApiError::Validation(details) => assert_eq!(details.len(), 3),
            other => panic!("Expected Validation, got: {:?}", other),
        }
    }

    #[test]
    fn test_into_result_empty_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_validate_page_params() {
        let ok = PageParams {
            page: 1,
            limit: 10,
            search: None,
        };
        assert!(validate_page_params(&ok).is_ok());

        let zero_page = PageParams {
            page: 0,
            limit: 10,
            search: None,
        };
        assert!(validate_page_params(&zero_page).is_err());

        let zero_limit = PageParams {
            page: 1,
            limit: 0,
            search: None,
        };
        assert!(validate_page_params(&zero_limit).is_err());

        let oversized_limit = PageParams {
            page: 1,
            limit: 101,
            search: None,
        };
        assert!(validate_page_params(&oversized_limit).is_err());

        let max_limit = PageParams {
            page: 1,
            limit: 100,
            search: None,
        };
        assert!(validate_page_params(&max_limit).is_ok());
    }
}
