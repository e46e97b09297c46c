//! Credential resolution for account logins.
//!
//! The comparison engine never sees credentials; the CLI resolves them
//! through a [`CredentialSource`] and hands them to the fetch layer.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

/// A username/password pair for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Supplies credentials for a labeled account slot ("USER1", "USER2").
pub trait CredentialSource {
    fn credentials(&self, label: &str) -> Result<Credentials>;
}

/// Reads `<LABEL>_USERNAME` / `<LABEL>_PASSWORD` from the environment.
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn credentials(&self, label: &str) -> Result<Credentials> {
        let username = std::env::var(format!("{label}_USERNAME"))
            .with_context(|| format!("{label}_USERNAME is not set"))?;
        let password = std::env::var(format!("{label}_PASSWORD"))
            .with_context(|| format!("{label}_PASSWORD is not set"))?;
        Ok(Credentials { username, password })
    }
}

/// Environment variables first, interactive stdin prompt as fallback.
pub struct EnvOrPromptCredentials;

impl CredentialSource for EnvOrPromptCredentials {
    fn credentials(&self, label: &str) -> Result<Credentials> {
        if let Ok(credentials) = EnvCredentials.credentials(label) {
            return Ok(credentials);
        }
        prompt_credentials(label)
    }
}

fn prompt_credentials(label: &str) -> Result<Credentials> {
    let username = prompt(&format!("{label} username: "))?;
    let password = prompt(&format!("{label} password: "))?;
    if username.is_empty() || password.is_empty() {
        bail!("username and password are required");
    }
    Ok(Credentials { username, password })
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().context("failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_var(key: &str, value: &str) {
        // SAFETY: tests touching the environment run serially.
        unsafe { std::env::set_var(key, value) };
    }

    fn remove_var(key: &str) {
        // SAFETY: tests touching the environment run serially.
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn env_credentials_read_label_scoped_variables() {
        set_var("TESTUSER_USERNAME", "alice@example.com");
        set_var("TESTUSER_PASSWORD", "hunter2");

        let credentials = EnvCredentials.credentials("TESTUSER").unwrap();
        assert_eq!(credentials.username, "alice@example.com");
        assert_eq!(credentials.password, "hunter2");

        remove_var("TESTUSER_USERNAME");
        remove_var("TESTUSER_PASSWORD");
    }

    #[test]
    #[serial]
    fn missing_username_is_an_error_naming_the_variable() {
        remove_var("NOUSER_USERNAME");
        remove_var("NOUSER_PASSWORD");

        let error = EnvCredentials.credentials("NOUSER").unwrap_err();
        assert!(error.to_string().contains("NOUSER_USERNAME is not set"));
    }

    #[test]
    #[serial]
    fn missing_password_is_an_error_naming_the_variable() {
        set_var("HALFUSER_USERNAME", "bob@example.com");
        remove_var("HALFUSER_PASSWORD");

        let error = EnvCredentials.credentials("HALFUSER").unwrap_err();
        assert!(error.to_string().contains("HALFUSER_PASSWORD is not set"));

        remove_var("HALFUSER_USERNAME");
    }
}
