use anyhow::Result;
use clap::Parser;

use vgexplorer::cli::Cli;
use vgexplorer::config::Config;
use vgexplorer::handlers;
use vgexplorer::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if cli.toggle {
        return handlers::run_toggle(&cli.server_name).await;
    }

    let config = Config::load(cli.config.as_deref())?;
    handlers::run_panel(&cli.server_name, cli.flavor(), &config).await
}
