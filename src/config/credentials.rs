//! Portal credentials

use crate::error::PublishError;
use crate::system::System;
use anyhow::Result;
use std::fmt;

/// Environment variable holding the portal user name
pub const USER_ENV: &str = "ARCGIS_ONLINE_USER";

/// Environment variable holding the portal password
pub const PASSWORD_ENV: &str = "ARCGIS_ONLINE_PASSWORD";

/// Portal user name and password
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    #[inline]
    pub fn new<U: Into<String>, P: Into<String>>(user: U, password: P) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Read credentials from `ARCGIS_ONLINE_USER` and `ARCGIS_ONLINE_PASSWORD`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either variable is unset or empty
    #[inline]
    pub fn from_env(system: &dyn System) -> Result<Self> {
        let user = required_var(system, USER_ENV)?;
        let password = required_var(system, PASSWORD_ENV)?;
        Ok(Self { user, password })
    }

    /// Portal user name
    #[must_use]
    #[inline]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Portal password
    #[must_use]
    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Password with everything after the first character masked
    ///
    /// Passwords of zero or one character are shown as a single `*`.
    #[must_use]
    #[inline]
    pub fn masked_password(&self) -> String {
        let mut chars = self.password.chars();
        match (chars.next(), chars.clone().count()) {
            (Some(first), rest) if rest > 0 => {
                let mut masked = String::with_capacity(rest + first.len_utf8());
                masked.push(first);
                masked.push_str(&"*".repeat(rest));
                masked
            }
            _ => "*".to_owned(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.masked_password())
            .finish()
    }
}

fn required_var(system: &dyn System, key: &str) -> Result<String> {
    match system.env_var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) => Err(PublishError::configuration(format!(
            "Environment variable '{key}' is empty"
        ))
        .into()),
        Err(err) => Err(PublishError::configuration(format!(
            "Environment variable '{key}' is not set. Error: {err}"
        ))
        .into()),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    #[test]
    fn test_masked_password() {
        assert_eq!(Credentials::new("u", "hunter2").masked_password(), "h******");
        assert_eq!(Credentials::new("u", "ab").masked_password(), "a*");
        assert_eq!(Credentials::new("u", "x").masked_password(), "*");
        assert_eq!(Credentials::new("u", "").masked_password(), "*");
    }

    #[test]
    fn test_debug_hides_password() {
        let credentials = Credentials::new("gis_admin", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("gis_admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_from_env() {
        let system = MockSystem::new()
            .with_env(USER_ENV, "gis_admin")
            .unwrap()
            .with_env(PASSWORD_ENV, "hunter2")
            .unwrap();

        let credentials = Credentials::from_env(&system).unwrap();
        assert_eq!(credentials.user(), "gis_admin");
        assert_eq!(credentials.password(), "hunter2");
    }

    #[test]
    fn test_from_env_missing_password() {
        let system = MockSystem::new().with_env(USER_ENV, "gis_admin").unwrap();

        let err = Credentials::from_env(&system).unwrap_err();
        assert!(err.to_string().contains(PASSWORD_ENV));
        assert!(err.downcast_ref::<PublishError>().is_some());
    }

    #[test]
    fn test_from_env_empty_user() {
        let system = MockSystem::new()
            .with_env(USER_ENV, "")
            .unwrap()
            .with_env(PASSWORD_ENV, "hunter2")
            .unwrap();

        let err = Credentials::from_env(&system).unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }
}
