use std::fmt;
use std::str::FromStr;

use auth::Identity;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::FullNameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Represents a registered principal together with its credential.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub full_name: Option<FullName>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Snapshot of the fields embedded in an access token.
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.username.as_str(), self.email.as_str())
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed UserId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name, optional on every account.
///
/// Surrounding whitespace is trimmed; the rest is kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - More than 100 characters
    pub fn new(full_name: String) -> Result<Self, FullNameError> {
        let trimmed = full_name.trim();
        if trimmed.is_empty() {
            return Err(FullNameError::Empty);
        }

        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(FullNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for registration or password change.
///
/// Only checks policy; never stored or logged. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 128;

    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    /// * `TooLong` - More than 128 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Login lookup key: username or email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Username(Username),
    Email(EmailAddress),
}

impl LoginIdentifier {
    /// Parse a raw identifier; anything containing `@` is treated as an email.
    ///
    /// # Errors
    /// * `InvalidUsername` / `InvalidEmail` - Identifier fails validation
    pub fn parse(identifier: String) -> Result<Self, crate::user::errors::UserError> {
        if identifier.contains('@') {
            Ok(Self::Email(EmailAddress::new(identifier)?))
        } else {
            Ok(Self::Username(Username::new(identifier)?))
        }
    }
}

impl fmt::Display for LoginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginIdentifier::Username(username) => username.fmt(f),
            LoginIdentifier::Email(email) => email.fmt(f),
        }
    }
}

/// Command to create a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub full_name: Option<FullName>,
    pub password: Password,
}

impl CreateUserCommand {
    /// Construct a new create user command.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `full_name` - Optional display name
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(
        username: Username,
        email: EmailAddress,
        full_name: Option<FullName>,
        password: Password,
    ) -> Self {
        Self {
            username,
            email,
            full_name,
            password,
        }
    }
}

/// Command to update an existing user with optional validated fields.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub full_name: Option<FullName>,
    pub password: Option<Password>,
}

/// Page of a user listing requested by a client.
///
/// Out-of-range input falls back to defaults instead of failing:
/// a page below 1 becomes 1, a limit outside 1..=100 becomes 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .and_then(|page| u64::try_from(page).ok())
            .filter(|page| *page >= 1)
            .unwrap_or(Self::DEFAULT_PAGE);
        let limit = limit
            .and_then(|limit| u64::try_from(limit).ok())
            .filter(|limit| (1..=Self::MAX_LIMIT).contains(limit))
            .unwrap_or(Self::DEFAULT_LIMIT);

        Self { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Rows skipped before this page: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of users plus the size of the whole listing.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub request: PageRequest,
    pub total: u64,
}

impl UserPage {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.request.limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::errors::UserError;

    #[test]
    fn test_username_rules() {
        assert!(Username::new("alice_01".to_string()).is_ok());
        assert_eq!(
            Username::new("al".to_string()),
            Err(UsernameError::TooShort { min: 3, actual: 2 })
        );
        assert_eq!(
            Username::new("a".repeat(33)),
            Err(UsernameError::TooLong {
                max: 32,
                actual: 33
            })
        );
        assert_eq!(
            Username::new("alice smith".to_string()),
            Err(UsernameError::InvalidCharacters)
        );
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("Test123456!".to_string()).is_ok());
        assert_eq!(
            Password::new("short".to_string()),
            Err(PasswordPolicyError::TooShort { min: 8, actual: 5 })
        );
        assert!(Password::new("x".repeat(129)).is_err());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("Test123456!".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("Test123456!"));
    }

    #[test]
    fn test_login_identifier_parse() {
        assert_eq!(
            LoginIdentifier::parse("alice".to_string()).unwrap(),
            LoginIdentifier::Username(Username::new("alice".to_string()).unwrap())
        );
        assert_eq!(
            LoginIdentifier::parse("alice@example.com".to_string()).unwrap(),
            LoginIdentifier::Email(EmailAddress::new("alice@example.com".to_string()).unwrap())
        );
        assert!(matches!(
            LoginIdentifier::parse("not an email@".to_string()),
            Err(UserError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_user_identity_snapshot() {
        let user = User {
            id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            full_name: None,
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        };

        let identity = user.identity();
        assert_eq!(identity.subject_id, user.id.to_string());
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.email, "alice@example.com");
    }

    #[test]
    fn test_full_name_rules() {
        assert_eq!(
            FullName::new("  Ada Lovelace ".to_string()).unwrap().as_str(),
            "Ada Lovelace"
        );
        assert_eq!(FullName::new("   ".to_string()), Err(FullNameError::Empty));
        assert_eq!(
            FullName::new("x".repeat(101)),
            Err(FullNameError::TooLong {
                max: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn test_page_request_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_page_request_clamping() {
        // Page below 1 becomes 1
        assert_eq!(PageRequest::new(Some(0), None).page(), 1);
        assert_eq!(PageRequest::new(Some(-3), None).page(), 1);

        // Limit outside 1..=100 falls back to 10
        assert_eq!(PageRequest::new(None, Some(0)).limit(), 10);
        assert_eq!(PageRequest::new(None, Some(101)).limit(), 10);
        assert_eq!(PageRequest::new(None, Some(-1)).limit(), 10);
        assert_eq!(PageRequest::new(None, Some(100)).limit(), 100);
        assert_eq!(PageRequest::new(None, Some(1)).limit(), 1);
    }

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
        assert_eq!(PageRequest::new(Some(i64::MAX), Some(100)).offset(), u64::MAX);
    }

    #[test]
    fn test_total_pages() {
        let page = |total, limit| UserPage {
            users: Vec::new(),
            request: PageRequest::new(Some(1), Some(limit)),
            total,
        };

        assert_eq!(page(0, 10).total_pages(), 0);
        assert_eq!(page(10, 10).total_pages(), 1);
        assert_eq!(page(11, 10).total_pages(), 2);
        assert_eq!(page(25, 1).total_pages(), 25);
    }
}
