use clap::Parser;

use forum_cache::cli::{Cli, execute_command, init_logger_from_settings, load_settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(
        root = %settings.cache.root_dir,
        app = %settings.application.name,
        "Configuration loaded"
    );

    execute_command(&cli, settings).await?;
    Ok(())
}
