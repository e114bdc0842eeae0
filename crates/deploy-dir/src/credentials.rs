//! Basic-auth credential parsing

use crate::error::{BundleError, Result};

/// Username/password pair embedded into the generated auth guard
///
/// Values are kept verbatim; escaping happens when the assembler writes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parse a `user:password` string.
    ///
    /// The string is split at the first `:`; everything after it is the
    /// password, so `a:b:c` yields password `b:c`. A missing colon, an empty
    /// username or an empty password is rejected with
    /// [`BundleError::InvalidCredentialsFormat`] carrying the raw input.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || BundleError::InvalidCredentialsFormat(raw.to_string());

        let (username, password) = raw.split_once(':').ok_or_else(invalid)?;
        if username.is_empty() || password.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl std::str::FromStr for Credentials {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let creds = Credentials::parse("user:pw").unwrap();
        assert_eq!(creds.username, "user");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn test_no_colon_is_rejected() {
        let err = Credentials::parse("user-pw").unwrap_err();
        assert!(matches!(err, BundleError::InvalidCredentialsFormat(ref raw) if raw == "user-pw"));
        assert_eq!(
            err.to_string(),
            "Invalid form of basic auth credentials: user-pw"
        );
    }

    #[test]
    fn test_empty_sides_are_rejected() {
        assert!(Credentials::parse(":pw").is_err());
        assert!(Credentials::parse("user:").is_err());
        assert!(Credentials::parse(":").is_err());
        assert!(Credentials::parse("").is_err());
    }

    #[test]
    fn test_extra_colons_go_to_password() {
        let creds: Credentials = "admin:s3:cr:et".parse().unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "s3:cr:et");
    }

    #[test]
    fn test_values_are_not_escaped() {
        let creds = Credentials::parse(r#"a"b:c\d"#).unwrap();
        assert_eq!(creds.username, r#"a"b"#);
        assert_eq!(creds.password, r"c\d");
    }
}
