mod commands;
mod terminal;

use commands::{CommandLine, setup};
use proxyup_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg: Config = commands.to_config();

    logging::init(cfg.quiet, commands.verbose);
    print::banner(cfg.quiet);

    print::header("starting setup", cfg.quiet);
    setup::setup(&cfg).await
}
