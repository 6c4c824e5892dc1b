use std::env;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::*;
use proxyup_common::config::Config;
use proxyup_common::error::InputError;
use proxyup_common::info;
use proxyup_core::hasher::Htpasswd;
use proxyup_core::input::{InputCollector, Prompter, SetupInputs};
use proxyup_core::pipeline::{Completed, Setup};

use crate::terminal::prompt::TermPrompter;
use crate::terminal::{colors, print, spinner};

const SUMMARY_KEY_WIDTH: usize = 10;

pub async fn setup(cfg: &Config) -> anyhow::Result<()> {
    let cwd = env::current_dir().map_err(InputError::CurrentDir)?;
    let mut prompter = TermPrompter::new();
    run_wizard(cfg, &mut prompter, cwd).await
}

async fn run_wizard<P: Prompter>(cfg: &Config, prompter: &mut P, cwd: PathBuf) -> anyhow::Result<()> {
    info!("Starting setup...");

    let inputs: SetupInputs = InputCollector::new(prompter, &cfg.answers, cwd).collect()?;
    let reset: bool = confirm_reset(prompter, &inputs.root, cfg.force)?;

    print::header("building the stack", cfg.quiet);

    let hasher = Htpasswd::new(&cfg.hasher_bin);
    let done: Completed = {
        let _spinner = spinner::start("Setting things up...");
        Setup::new(cfg, &hasher).run(&inputs, reset).await?
    };

    print_summary(&inputs, &done, cfg.quiet);
    Ok(())
}

/// Decides whether an existing root may be wiped. Declining ends the run.
fn confirm_reset<P: Prompter>(prompter: &mut P, root: &Path, force: bool) -> anyhow::Result<bool> {
    match root.symlink_metadata() {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("failed to inspect {}", root.display())),
    }
    if force {
        return Ok(true);
    }

    let question: String = format!(
        "Docker directory found at {}. Delete it and start over?",
        root.display()
    );
    if prompter.confirm(&question).context("failed to read confirmation")? {
        return Ok(true);
    }
    anyhow::bail!("setup aborted, {} was left untouched", root.display())
}

fn print_summary(inputs: &SetupInputs, done: &Completed, q_level: u8) {
    if q_level > 1 {
        return;
    }

    print::header("summary", q_level);
    print::aligned_line("Directory", done.layout.root.display().to_string(), SUMMARY_KEY_WIDTH);
    print::aligned_line("Domain", inputs.domain.as_str(), SUMMARY_KEY_WIDTH);
    print::aligned_line("Email", inputs.email.as_str(), SUMMARY_KEY_WIDTH);
    print::aligned_line("Username", inputs.username.as_str(), SUMMARY_KEY_WIDTH);
    print::aligned_line(
        "Auth line",
        done.credential.to_string().color(colors::SECRET),
        SUMMARY_KEY_WIDTH,
    );

    print::fat_separator();
    print::centerln(&format!("{}", "Setup complete!".bold().green()));
    print::print_status(format!(
        "Start up the service with '{}' from {}",
        "docker-compose up".color(colors::ACCENT),
        done.layout.core.display()
    ));
    print::print_status(format!(
        "Once you have confirmed it is working, you can run it detached with '{}'",
        "docker-compose up -d".color(colors::ACCENT)
    ));
}
