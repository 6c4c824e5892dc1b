//! # Credential Hasher
//!
//! Produces the `user:hash` line the Traefik basic-auth middleware expects.
//! The hashing itself is delegated to an external tool; this module only
//! runs it, checks its output, and escapes the result for docker compose,
//! which treats `$` as the start of a variable.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use async_trait::async_trait;
use proxyup_common::error::HashError;
use proxyup_common::secret::Password;
use tokio::process::Command;
use tracing::debug;

/// Produces an unescaped `username:hash` line.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, username: &str, password: &Password) -> Result<String, HashError>;
}

/// Runs `htpasswd -nb <username> <password>`.
///
/// Username and password are passed as separate arguments, no shell is
/// involved so neither value is ever interpreted.
pub struct Htpasswd {
    bin: PathBuf,
}

impl Htpasswd {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    fn command(&self, username: &str, password: &Password) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("-nb")
            .arg(username)
            .arg(password.expose())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CredentialHasher for Htpasswd {
    async fn hash(&self, username: &str, password: &Password) -> Result<String, HashError> {
        debug!("Running {} for user {username}", self.bin.display());

        let output: Output = self
            .command(username, password)
            .output()
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => HashError::NotFound {
                    bin: self.bin.clone(),
                    source,
                },
                _ => HashError::Spawn {
                    bin: self.bin.clone(),
                    source,
                },
            })?;

        if !output.status.success() {
            return Err(HashError::Failed {
                bin: self.bin.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout: String =
            String::from_utf8(output.stdout).map_err(|_| HashError::MalformedOutput {
                bin: self.bin.clone(),
                reason: "output is not valid UTF-8".to_string(),
            })?;

        parse_basic_auth_line(&stdout, username).map_err(|reason| HashError::MalformedOutput {
            bin: self.bin.clone(),
            reason,
        })
    }
}

/// Checks that the tool printed exactly one `username:hash` line and returns it trimmed.
pub fn parse_basic_auth_line(stdout: &str, username: &str) -> Result<String, String> {
    let line: &str = stdout.trim();
    if line.is_empty() {
        return Err("no output".to_string());
    }
    if line.lines().count() > 1 {
        return Err("expected a single line".to_string());
    }

    match line.split_once(':') {
        Some((user, hash)) if user == username && !hash.is_empty() => Ok(line.to_string()),
        _ => Err(format!("expected '{username}:<hash>'")),
    }
}

/// Doubles every `$`, leaving every other character as is.
pub fn escape_dollars(raw: &str) -> String {
    raw.replace('$', "$$")
}

/// A basic-auth line that is safe to paste into a compose file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashedCredential(String);

impl HashedCredential {
    pub fn from_raw(raw: &str) -> Self {
        Self(escape_dollars(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hashes the credentials with `hasher` and escapes the result.
pub async fn hashed_credential(
    hasher: &dyn CredentialHasher,
    username: &str,
    password: &Password,
) -> Result<HashedCredential, HashError> {
    let raw: String = hasher.hash(username, password).await?;
    Ok(HashedCredential::from_raw(&raw))
}
