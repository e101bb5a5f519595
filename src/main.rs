//! asma-search: JSON search API over a pre-built archive index
//!
//! This is the main entry point for the application.

use anyhow::{bail, Context, Result};
use asma_search::{
    config::{self, Settings},
    index::TantivyIndex,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line overrides, applied on top of settings file and environment
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    index: Option<PathBuf>,
    archive: Option<PathBuf>,
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        return Ok(());
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting asma-search v{}", asma_search::VERSION);

    // Load configuration
    let settings = load_settings(args)?;

    // Open the index once; every request searches this handle
    let index = TantivyIndex::open(&settings.index.path, &settings.index.id_field)
        .with_context(|| format!("opening index {}", settings.index.path.display()))?
        .with_fragment_max_chars(settings.search.fragment_max_chars);
    info!(
        "Opened index {} ({} documents)",
        settings.index.path.display(),
        asma_search::SearchIndex::doc_count(&index)
    );

    // Bind address
    let addr = SocketAddr::new(
        settings
            .server
            .bind_address
            .parse()
            .with_context(|| format!("invalid bind address {}", settings.server.bind_address))?,
        settings.server.port,
    );

    // Create application state and router
    let state = AppState::new(settings, Arc::new(index));
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Load settings and apply command-line overrides
fn load_settings(args: Args) -> Result<Settings> {
    let mut settings = config::load(args.config)?;

    if let Some(index) = args.index {
        settings.index.path = index;
    }
    if let Some(archive) = args.archive {
        settings.static_files.dir = Some(archive);
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    settings.validate()?;
    Ok(settings)
}

/// Parse arguments; `None` means usage or version was printed
fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut args = Args::default();

    while let Some(arg) = argv.next() {
        let mut value = |flag: &str| {
            argv.next()
                .with_context(|| format!("missing value for {}", flag))
        };

        match arg.as_str() {
            "-c" | "--config" => args.config = Some(PathBuf::from(value(&arg)?)),
            "-i" | "--index" => args.index = Some(PathBuf::from(value(&arg)?)),
            "-a" | "--archive" => args.archive = Some(PathBuf::from(value(&arg)?)),
            "-p" | "--port" => {
                let raw = value(&arg)?;
                args.port = Some(raw.parse().with_context(|| format!("invalid port {}", raw))?);
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("asma-search {}", asma_search::VERSION);
                return Ok(None);
            }
            other => bail!("unknown argument {} (see --help)", other),
        }
    }

    Ok(Some(args))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
asma-search v{}
A read-only JSON search API over a pre-built archive index

USAGE:
    asma-search [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -i, --index <DIR>      Path to the index directory
    -a, --archive <DIR>    Archive directory served under /static
    -p, --port <PORT>      Port to listen on
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    ASMA_SETTINGS_PATH     Path to settings.yml
    ASMA_INDEX_PATH        Index directory
    ASMA_ARCHIVE_DIR       Archive directory
    ASMA_PORT              Server port
    ASMA_BIND_ADDRESS      Bind address
    ASMA_SEARCH_TIMEOUT    Per-request search timeout in seconds
    RUST_LOG               Log filter (default: info)
"#,
        asma_search::VERSION
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> impl Iterator<Item = String> {
        items
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_parse_args() {
        let args = parse_args(argv(&["-i", "idx", "--archive", "www", "-p", "9000"]))
            .unwrap()
            .unwrap();
        assert_eq!(args.index, Some(PathBuf::from("idx")));
        assert_eq!(args.archive, Some(PathBuf::from("www")));
        assert_eq!(args.port, Some(9000));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(argv(&["-i"])).is_err());
        assert!(parse_args(argv(&["--port", "http"])).is_err());
        assert!(parse_args(argv(&["--bogus"])).is_err());
    }

    #[test]
    fn test_help_stops() {
        assert!(parse_args(argv(&["--help"])).unwrap().is_none());
    }
}
