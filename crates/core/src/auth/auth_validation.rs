//! Form checks run before anything is sent to the auth provider.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{Error, ValidationError};
use crate::styles::Tone;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"\S+@\S+\.\S+").expect("valid email pattern");
}

/// Field name -> message for every failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FormErrors> for Error {
    fn from(errors: FormErrors) -> Self {
        let message = errors.0.into_values().collect::<Vec<_>>().join("; ");
        Error::Validation(ValidationError::InvalidInput(message))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub agree_to_terms: bool,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required");
        } else if name.chars().count() < 2 {
            errors.add("name", "Name must be at least 2 characters");
        }

        validate_email(&self.email, &mut errors);

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password.chars().count() < 8 {
            errors.add("password", "Password must be at least 8 characters");
        } else if !has_mixed_case(&self.password) || !has_digit(&self.password) {
            errors.add(
                "password",
                "Password must contain uppercase, lowercase, and number",
            );
        }

        if self.confirm_password.is_empty() {
            errors.add("confirmPassword", "Please confirm your password");
        } else if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        }

        if !self.agree_to_terms {
            errors.add(
                "agreeToTerms",
                "You must agree to the terms and conditions",
            );
        }

        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        validate_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors.into_result()
    }
}

fn validate_email(email: &str, errors: &mut FormErrors) {
    let email = email.trim();
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.add("email", "Email is invalid");
    }
}

fn has_mixed_case(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase()) && password.chars().any(|c| c.is_ascii_uppercase())
}

fn has_digit(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStrength {
    pub score: u8,
    pub label: &'static str,
    pub tone: Option<Tone>,
}

/// Scores a password 0-5: length >= 8, length >= 12, mixed case, digit, symbol.
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            score: 0,
            label: "",
            tone: None,
        };
    }

    let length = password.chars().count();
    let checks = [
        length >= 8,
        length >= 12,
        has_mixed_case(password),
        has_digit(password),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = checks.iter().filter(|passed| **passed).count() as u8;

    let (label, tone) = match score {
        0 => ("", None),
        1 => ("Weak", Some(Tone::Danger)),
        2 => ("Fair", Some(Tone::Warning)),
        3 => ("Good", Some(Tone::Primary)),
        4 => ("Strong", Some(Tone::Success)),
        _ => ("Very Strong", Some(Tone::Success)),
    };
    PasswordStrength { score, label, tone }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SignUpForm {
        SignUpForm {
            name: "Alex Rivera".into(),
            email: "alex.rivera@email.com".into(),
            password: "Secret123".into(),
            confirm_password: "Secret123".into(),
            agree_to_terms: true,
        }
    }

    #[test]
    fn accepts_valid_sign_up() {
        assert_eq!(valid_form().validate(), Ok(()));
    }

    #[test]
    fn reports_every_failing_field() {
        let form = SignUpForm {
            name: "A".into(),
            email: "not-an-email".into(),
            password: "password1".into(),
            confirm_password: "password2".into(),
            agree_to_terms: false,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(
            errors.get("password"),
            Some("Password must contain uppercase, lowercase, and number")
        );
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
        assert!(errors.get("agreeToTerms").is_some());
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn short_password_message_wins_over_composition() {
        let form = SignUpForm {
            password: "Ab1".into(),
            confirm_password: "Ab1".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn sign_in_requires_both_fields() {
        let errors = SignInForm::default().validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn strength_levels() {
        assert_eq!(password_strength("").score, 0);
        assert_eq!(password_strength("abc").label, "");
        assert_eq!(password_strength("abcdefgh").label, "Weak");
        assert_eq!(password_strength("abcdefgH").label, "Fair");
        assert_eq!(password_strength("abcdefgH1").label, "Good");
        assert_eq!(password_strength("abcdefgH1!").label, "Strong");
        assert_eq!(password_strength("abcdefgH1!xyz").label, "Very Strong");
    }
}
