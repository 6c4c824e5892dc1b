pub mod setup;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use proxyup_common::config::{Answers, Config, DEFAULT_ASSETS_DIR, DEFAULT_HASHER_BIN};

#[derive(Parser)]
#[command(name = "proxyup")]
#[command(version)]
#[command(about = "First-run setup for a Traefik + Portainer docker stack.")]
pub struct CommandLine {
    /// Base directory; a `docker` folder is created inside it
    #[arg(long, value_name = "DIR")]
    pub dir: Option<String>,

    /// Domain that replaces the template's example.com
    #[arg(long)]
    pub domain: Option<String>,

    /// Username for the Traefik dashboard
    #[arg(long = "user", value_name = "USERNAME")]
    pub username: Option<String>,

    /// Contact email for the ACME certificate resolver
    #[arg(long)]
    pub email: Option<String>,

    /// Directory holding the bundled templates
    #[arg(long, value_name = "DIR", default_value = DEFAULT_ASSETS_DIR)]
    pub assets: PathBuf,

    /// Password hashing executable
    #[arg(long, value_name = "BIN", default_value = DEFAULT_HASHER_BIN)]
    pub htpasswd: PathBuf,

    /// Delete an existing docker directory without asking
    #[arg(short, long)]
    pub force: bool,

    /// Less output, repeat to only show errors
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// More output, repeat for trace logging
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            assets_dir: self.assets.clone(),
            hasher_bin: self.htpasswd.clone(),
            force: self.force,
            quiet: self.quiet,
            answers: Answers {
                dir: self.dir.clone(),
                domain: self.domain.clone(),
                username: self.username.clone(),
                email: self.email.clone(),
            },
        }
    }
}
