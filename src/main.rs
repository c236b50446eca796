//! Library catalog - interactive menu over the book and member stores

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use library_catalog::{config::LoggingConfig, menu::Menu, AppConfig, Catalog};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_tracing(&config.logging)?;

    tracing::info!("Starting library catalog v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {}", config.storage.data_dir.display());

    let mut catalog = Catalog::from_config(&config)?;
    for issue in catalog.load_issues() {
        println!("{}", issue);
    }

    let stdin = io::stdin();
    let mut menu = Menu::new(stdin.lock(), io::stdout());
    menu.run(&mut catalog)?;

    tracing::info!("Library catalog stopped");
    Ok(())
}

/// Logs go to stderr, or to `logging.file` when set, so the menu owns stdout
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_catalog={}", logging.level).into());

    let (writer, guard) = match &logging.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("logging.file has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (tracing_subscriber::fmt::writer::BoxMakeWriter::new(writer), Some(guard))
        }
        None => (tracing_subscriber::fmt::writer::BoxMakeWriter::new(io::stderr), None),
    };

    let fmt_layer = if logging.format == "json" {
        tracing_subscriber::fmt::layer().json().with_writer(writer).boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(logging.file.is_none())
            .with_writer(writer)
            .boxed()
    };

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();

    Ok(guard)
}
