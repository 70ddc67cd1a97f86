//! Checks run on the sign-up and invitation forms before anything is sent.

use crate::RegisterRequest;

/// Shortest password the backend accepts
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Please enter your name")]
    EmptyName,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,
}

/// What the sign-up form holds while the user types
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationDraft {
    pub fn validate(&self) -> Result<RegisterRequest, RegistrationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        let email = normalize_email(&self.email).ok_or(RegistrationError::InvalidEmail)?;
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(RegistrationError::PasswordTooShort);
        }

        Ok(RegisterRequest {
            name: name.to_string(),
            email,
            password: self.password.clone(),
        })
    }
}

/// Trimmed email if it looks like `local@domain`. Used by sign-up, friend
/// requests and group invitations; the backend does the real check.
pub fn normalize_email(input: &str) -> Option<String> {
    let email = input.trim();
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return None;
    }
    Some(email.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, email: &str, password: &str, confirm: &str) -> RegistrationDraft {
        RegistrationDraft {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let request = draft("  Ana ", " ana@example.com ", "secret1", "secret1").validate().unwrap();
        assert_eq!(
            request,
            RegisterRequest {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                password: "secret1".to_string(),
            }
        );
    }

    #[test]
    fn test_registration_errors_in_order() {
        assert_eq!(draft(" ", "x", "a", "b").validate(), Err(RegistrationError::EmptyName));
        assert_eq!(draft("Ana", "ana.example.com", "a", "b").validate(), Err(RegistrationError::InvalidEmail));
        assert_eq!(
            draft("Ana", "ana@example.com", "secret1", "secret2").validate(),
            Err(RegistrationError::PasswordMismatch)
        );
        let err = draft("Ana", "ana@example.com", "abc", "abc").validate().unwrap_err();
        assert_eq!(err, RegistrationError::PasswordTooShort);
        assert_eq!(err.to_string(), "Password must be at least 6 characters long.");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" ben@example.com"), Some("ben@example.com".to_string()));
        assert_eq!(normalize_email("@example.com"), None);
        assert_eq!(normalize_email("ben@"), None);
        assert_eq!(normalize_email("ben@a@b"), None);
        assert_eq!(normalize_email("b en@example.com"), None);
        assert_eq!(normalize_email(""), None);
    }
}
