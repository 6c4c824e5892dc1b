use std::path::PathBuf;

/// Default location of the bundled templates, relative to the working directory.
pub const DEFAULT_ASSETS_DIR: &str = "external";

/// Default name of the password hashing executable, looked up on `PATH`.
pub const DEFAULT_HASHER_BIN: &str = "htpasswd";

/// Runtime settings for one setup run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding `docker-compose.yml`, `traefik.yml` and `middlewares.yml`.
    pub assets_dir: PathBuf,
    /// Executable used to produce the basic-auth line.
    pub hasher_bin: PathBuf,
    /// Remove an existing `docker` directory without asking.
    pub force: bool,
    /// 0 prints everything, 1 hides headers, 2 only prints errors.
    pub quiet: u8,
    pub answers: Answers,
}

/// Values supplied up front on the command line.
///
/// Every field is still validated; a blank value falls back to the prompt.
#[derive(Clone, Debug, Default)]
pub struct Answers {
    pub dir: Option<String>,
    pub domain: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            hasher_bin: PathBuf::from(DEFAULT_HASHER_BIN),
            force: false,
            quiet: 0,
            answers: Answers::default(),
        }
    }
}
