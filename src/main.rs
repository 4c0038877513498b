use anyhow::{Context, Result};
use book_listing::config::{find_config_file, get_config, load_config, Config};
use book_listing::loader::Loader;
use book_listing::models::SearchQuery;
use book_listing::sources::Fetcher;
use book_listing::utils::{
    Connectivity, ConsoleDisplay, DisplayFormat, EmptyState, HttpFetcher, StaticConnectivity,
    TcpConnectivity,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Book Listing - Search Google Books from the command line
#[derive(Parser, Debug)]
#[command(name = "book-listing")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search Google Books and list matching volumes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> DisplayFormat {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => DisplayFormat::Table,
            OutputFormat::Auto => DisplayFormat::Json,
            OutputFormat::Table => DisplayFormat::Table,
            OutputFormat::Json => DisplayFormat::Json,
            OutputFormat::Plain => DisplayFormat::Plain,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for books by query string
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Maximum number of results (default: from configuration, 20)
        #[arg(long, short)]
        max_results: Option<usize>,

        /// Skip the connectivity check
        #[arg(long)]
        no_check: bool,
    },

    /// Check configuration and connectivity
    #[command(alias = "diag")]
    Doctor,
}

fn resolve_config(path: Option<&PathBuf>) -> Result<Config> {
    if let Some(path) = path {
        return load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()));
    }

    if let Some(path) = find_config_file() {
        tracing::info!("Using config file: {}", path.display());
        return load_config(&path)
            .with_context(|| format!("Failed to load config file {}", path.display()));
    }

    get_config().context("Failed to read configuration from environment")
}

/// Probe for the configured endpoint
fn connectivity_for(config: &Config) -> Box<dyn Connectivity> {
    match TcpConnectivity::for_url(&config.api.base_url, config.http.connect_timeout()) {
        Some(probe) => Box::new(probe),
        // Nothing to probe; let the fetch report the bad URL.
        None => Box::new(StaticConnectivity(true)),
    }
}

async fn run_search<W: Write>(
    config: &Config,
    query: SearchQuery,
    connectivity: &dyn Connectivity,
    fetcher: Arc<dyn Fetcher>,
    mut display: ConsoleDisplay<W>,
) -> Result<()> {
    if !connectivity.is_connected().await {
        display.show_empty_state(EmptyState::NoConnection);
        return Ok(());
    }

    let mut loader = Loader::new(fetcher, display);

    loader.start(query.request_url(&config.api.base_url));

    let interrupted = tokio::select! {
        _ = loader.deliver() => false,
        Ok(()) = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        tracing::info!("Search interrupted");
        loader.reset();
    }

    Ok(())
}

async fn run_doctor(config: &Config, quiet: bool) -> Result<()> {
    let connected = connectivity_for(config).is_connected().await;

    if !quiet {
        println!("Book Listing {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Endpoint:         {}", config.api.base_url);
        println!("Max results:      {}", config.api.max_results);
        println!("Connect timeout:  {} ms", config.http.connect_timeout_ms);
        println!("Read timeout:     {} ms", config.http.read_timeout_ms);
        println!(
            "Connectivity:     {}",
            if connected { "ok" } else { EmptyState::NoConnection.message() }
        );
    }

    if !connected {
        anyhow::bail!("Search endpoint is not reachable");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("book_listing={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = resolve_config(cli.config.as_ref())?;

    match cli.command {
        Some(Commands::Search {
            query,
            max_results,
            no_check,
        }) => {
            let query =
                SearchQuery::new(query).max_results(max_results.unwrap_or(config.api.max_results));
            let connectivity: Box<dyn Connectivity> = if no_check {
                Box::new(StaticConnectivity(true))
            } else {
                connectivity_for(&config)
            };
            let fetcher = Arc::new(HttpFetcher::from_config(&config.http)?);
            let display = ConsoleDisplay::stdout(cli.output.resolve());
            run_search(&config, query, connectivity.as_ref(), fetcher, display).await?;
        }

        Some(Commands::Doctor) => {
            run_doctor(&config, cli.quiet).await?;
        }

        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
