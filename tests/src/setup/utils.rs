use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use proxyup_common::config::Config;
use proxyup_common::error::HashError;
use proxyup_common::secret::Password;
use proxyup_core::hasher::CredentialHasher;
use proxyup_core::input::Prompter;

/// The templates shipped in the repository.
pub fn bundled_assets() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("external")
}

pub fn config() -> Config {
    Config {
        assets_dir: bundled_assets(),
        ..Config::default()
    }
}

pub struct Script {
    answers: VecDeque<String>,
    pub shown: Vec<String>,
}

impl Script {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            shown: Vec::new(),
        }
    }
}

impl Prompter for Script {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        self.shown.push(message.to_string());
        Ok(self.answers.pop_front())
    }

    fn ask_secret(&mut self, message: &str) -> io::Result<Option<String>> {
        self.ask(message)
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        self.shown.push(message.to_string());
        Ok(())
    }

    fn confirm(&mut self, message: &str) -> io::Result<bool> {
        Ok(self.ask(message)?.is_some_and(|a| a == "y"))
    }
}

/// Deterministic stand-in for htpasswd, shaped like its APR1 output.
pub struct FakeHtpasswd;

pub const FAKE_DIGEST: &str = "$apr1$8Jd1b6Fq$K3l0cZq6kZr1m2n3o4p5q.";

#[async_trait]
impl CredentialHasher for FakeHtpasswd {
    async fn hash(&self, username: &str, _password: &Password) -> Result<String, HashError> {
        Ok(format!("{username}:{FAKE_DIGEST}"))
    }
}
