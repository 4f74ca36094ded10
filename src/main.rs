mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

// Re-export from lib for internal use
use symbol_complete::{config, engine, error, indexer, languages, REGISTRY};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli::load_settings(cli.settings.as_deref())?;

    let default_filter = if cli.debug || settings.debug {
        "symbol_complete=debug"
    } else {
        "symbol_complete=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Complete {
            file,
            syntax,
            prefix,
            fuzzy,
            fuzzy_threshold,
            format,
        } => {
            cli::complete(
                settings,
                &file,
                syntax.as_deref(),
                prefix.as_deref(),
                fuzzy,
                fuzzy_threshold,
                &format,
            )?;
        }
        Commands::Symbols { file, format } => {
            cli::show_symbols(&file, &format)?;
        }
        Commands::Index { path, watch } => {
            cli::index_directory(settings, &path, watch)?;
        }
    }

    Ok(())
}
