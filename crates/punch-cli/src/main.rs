use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use punch_cli::commands::{active, clock_in, clock_out, log, status};
use punch_cli::{Cli, Commands, Config, FilePresenceMarker};
use punch_core::UserId;
use punch_db::Ledger;

/// Resolves the acting user from the flag or the config.
fn resolve_actor(flag: Option<&str>, config: &Config) -> Result<UserId> {
    let id = flag
        .or(config.user.as_deref())
        .context("no acting user: pass --user or set `user` in the config")?;
    UserId::new(id).context("invalid acting user")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    let mut ledger = Ledger::open(&config.database_path).with_context(|| {
        format!("failed to open ledger at {}", config.database_path.display())
    })?;

    let actor = resolve_actor(cli.user.as_deref(), &config)?;
    let marker = FilePresenceMarker::new(&config.marker_dir);

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    match command {
        Commands::In => clock_in::run(&mut writer, &mut ledger, &actor, &marker)?,
        Commands::Out => clock_out::run(&mut writer, &mut ledger, &actor, &marker)?,
        Commands::Log { user } => {
            let subject = user.map(UserId::new).transpose().context("invalid user")?;
            log::run(&mut writer, &ledger, &actor, subject.as_ref(), &config)?;
        }
        Commands::Active => active::run(&mut writer, &ledger, &actor, &config, &config)?,
        Commands::Status => status::run(&mut writer, &ledger, &actor)?,
    }

    writer.flush()?;
    Ok(())
}
