//! # Input Collector
//!
//! Asks for the storage directory, domain, basic-auth credentials and the
//! ACME contact email. Blank answers are rejected by asking again; only a
//! terminal failure or a closed stdin ends collection early.

use std::io;
use std::path::{self, MAIN_SEPARATOR, Path, PathBuf};

use proxyup_common::config::Answers;
use proxyup_common::error::InputError;
use proxyup_common::secret::Password;

/// Name of the directory created inside the chosen base path.
pub const DOCKER_DIR: &str = "docker";

const DIR_PROMPT: &str = "Enter full directory path to store files or leave blank to use current. \
A folder named docker will be created within that directory to store all config files.";
const DOMAIN_PROMPT: &str = "Enter domain name to use (e.g. example.com): ";
const DOMAIN_EMPTY: &str = "Domain name cannot be empty";
const CREDENTIALS_NOTICE: &str =
    "You will now be prompted to create a username and password for Traefik.";
const CONTINUE_PROMPT: &str = "Press enter to continue...";
const USERNAME_PROMPT: &str = "Enter username: ";
const PASSWORD_PROMPT: &str = "Enter password: ";
const CREDENTIALS_EMPTY: &str = "Username or password cannot be empty";
const EMAIL_PROMPT: &str = "Enter cert resolver email: ";
const EMAIL_EMPTY: &str = "Email cannot be empty";

/// Line-oriented terminal access.
///
/// `ask` and `ask_secret` return `Ok(None)` once input is exhausted.
pub trait Prompter {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>>;

    /// Same as [`Prompter::ask`] but the answer must not be echoed.
    fn ask_secret(&mut self, message: &str) -> io::Result<Option<String>>;

    fn notice(&mut self, message: &str) -> io::Result<()>;

    /// Yes/no question, `false` unless the user explicitly agrees.
    fn confirm(&mut self, message: &str) -> io::Result<bool>;
}

/// Everything one run needs from the user.
#[derive(Debug)]
pub struct SetupInputs {
    /// `<base>/docker`, absolute.
    pub root: PathBuf,
    pub domain: String,
    pub username: String,
    pub password: Password,
    pub email: String,
}

/// Resolves the answer to the directory prompt into the `docker` root.
///
/// A blank answer means `cwd`. Trailing separators are collapsed so exactly
/// one separator precedes [`DOCKER_DIR`]; relative answers are anchored at `cwd`.
pub fn docker_root(answer: &str, cwd: &Path) -> PathBuf {
    let answer: &str = answer.trim();
    if answer.is_empty() {
        return cwd.join(DOCKER_DIR);
    }

    let base: &str = answer.trim_end_matches(path::is_separator);
    let root: PathBuf = PathBuf::from(format!("{base}{MAIN_SEPARATOR}{DOCKER_DIR}"));

    if root.is_absolute() {
        root
    } else {
        cwd.join(root)
    }
}

pub struct InputCollector<'a, P: Prompter> {
    prompter: &'a mut P,
    answers: &'a Answers,
    cwd: PathBuf,
}

impl<'a, P: Prompter> InputCollector<'a, P> {
    pub fn new(prompter: &'a mut P, answers: &'a Answers, cwd: PathBuf) -> Self {
        Self {
            prompter,
            answers,
            cwd,
        }
    }

    /// Collects the inputs in the order the wizard has always asked for them.
    pub fn collect(mut self) -> Result<SetupInputs, InputError> {
        let root: PathBuf = self.root()?;
        self.prompter
            .notice(&format!("Using directory: {}", root.display()))?;

        let domain: String = self.domain()?;
        self.prompter.notice(&format!("Using domain: {domain}"))?;

        let (username, password) = self.credentials()?;
        let email: String = self.email()?;

        self.prompter.notice(&format!("Using email: {email}"))?;
        self.prompter.notice(&format!("Using username: {username}"))?;

        Ok(SetupInputs {
            root,
            domain,
            username,
            password,
            email,
        })
    }

    fn root(&mut self) -> Result<PathBuf, InputError> {
        let answer: String = match prefilled(&self.answers.dir) {
            Some(dir) => dir,
            // A blank answer is valid here, it selects the working directory.
            None => self.read("directory", DIR_PROMPT)?,
        };
        Ok(docker_root(&answer, &self.cwd))
    }

    fn domain(&mut self) -> Result<String, InputError> {
        if let Some(domain) = prefilled(&self.answers.domain) {
            return Ok(domain);
        }
        self.read_non_blank("domain", DOMAIN_PROMPT, DOMAIN_EMPTY)
    }

    fn credentials(&mut self) -> Result<(String, Password), InputError> {
        let fixed_username: Option<String> = prefilled(&self.answers.username);

        loop {
            self.prompter.notice(CREDENTIALS_NOTICE)?;
            self.read("confirmation", CONTINUE_PROMPT)?;

            let username: String = match &fixed_username {
                Some(username) => username.clone(),
                None => self.read("username", USERNAME_PROMPT)?.trim().to_string(),
            };

            let password: Password = match self.prompter.ask_secret(PASSWORD_PROMPT)? {
                Some(line) => Password::new(line),
                None => return Err(InputError::Closed { field: "password" }),
            };

            if !username.is_empty() && !password.is_blank() {
                return Ok((username, password));
            }
            self.prompter.notice(CREDENTIALS_EMPTY)?;
        }
    }

    fn email(&mut self) -> Result<String, InputError> {
        if let Some(email) = prefilled(&self.answers.email) {
            return Ok(email);
        }
        self.read_non_blank("email", EMAIL_PROMPT, EMAIL_EMPTY)
    }

    fn read(&mut self, field: &'static str, message: &str) -> Result<String, InputError> {
        self.prompter
            .ask(message)?
            .ok_or(InputError::Closed { field })
    }

    fn read_non_blank(
        &mut self,
        field: &'static str,
        message: &str,
        complaint: &str,
    ) -> Result<String, InputError> {
        loop {
            let answer: String = self.read(field, message)?;
            let answer: &str = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            self.prompter.notice(complaint)?;
        }
    }
}

fn prefilled(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
