//! filmdex - movie and series lookup CLI backed by OMDb.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use filmdex_api::cache::DetailCache;
use filmdex_api::omdb::{
    ContentKind, LocalOmdbApi, MovieDetail, OmdbClient, PageRequest, load_search_page,
    total_episodes,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search titles, optionally narrowed to a genre.
    Search(SearchArgs),
    /// Show the full record of one title.
    Detail(DetailArgs),
    /// Count the episodes of a series across all seasons.
    Episodes(EpisodesArgs),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (default: `search.default_query` from config).
    #[arg(long)]
    query: Option<String>,

    /// Page number, 1-based.
    #[arg(long)]
    page: Option<u32>,

    /// Content kind: movie, series or episode.
    #[arg(long = "type")]
    kind: Option<ContentKind>,

    /// Release year.
    #[arg(long)]
    year: Option<u32>,

    /// Keep only titles whose genre contains this text.
    #[arg(long)]
    genre: Option<String>,
}

/// Arguments for the `detail` subcommand.
#[derive(clap::Args)]
struct DetailArgs {
    /// IMDb id (e.g. tt0111161).
    #[arg(long)]
    id: String,
}

/// Arguments for the `episodes` subcommand.
#[derive(clap::Args)]
struct EpisodesArgs {
    /// IMDb id of the series.
    #[arg(long)]
    id: String,

    /// Season count, when already known. Looked up otherwise.
    #[arg(long)]
    seasons: Option<u32>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default settings.
    Init,
    /// Print the effective settings.
    Show,
}

/// Builds an `OmdbClient` from config and the `OMDB_API_KEY` environment variable.
///
/// # Errors
///
/// Returns an error if `OMDB_API_KEY` is not set, the configured base URL is
/// invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_omdb_client(config: &AppConfig) -> Result<OmdbClient> {
    let api_key =
        std::env::var("OMDB_API_KEY").context("OMDB_API_KEY environment variable is required")?;

    let cache = DetailCache::new(config.cache.capacity, config.cache.ttl());
    let mut builder = OmdbClient::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.client.timeout())
        .retry_policy(config.client.retry_policy())
        .cache(Arc::new(cache));

    if let Some(base_url) = &config.client.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid client.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build OMDb client")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
async fn run_search(args: SearchArgs, config: &AppConfig) -> Result<()> {
    let client = build_omdb_client(config)?;

    let request = PageRequest {
        query: Some(
            args.query
                .unwrap_or_else(|| config.search.default_query.clone()),
        ),
        kind: args.kind,
        year: args.year,
        page: args.page,
        genre: args.genre,
    };
    let page = load_search_page(&client, &request).await;

    if let Some(error) = &page.error {
        tracing::warn!("{error}");
        return Ok(());
    }

    tracing::info!(
        "Query: {} | Total results: {} | Page: {}",
        request.query(),
        page.total_results,
        page.current_page
    );
    if let Some(genre) = request.genre() {
        tracing::info!("Genre \"{genre}\": {} match(es) on this page", page.items.len());
    }
    tracing::info!("ID\t\tYear\tType\tTitle");
    for item in &page.items {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            item.imdb_id,
            item.year,
            item.kind,
            item.title
        );
    }

    Ok(())
}

/// Runs the `detail` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
async fn run_detail(args: &DetailArgs, config: &AppConfig) -> Result<()> {
    let client = build_omdb_client(config)?;

    let Some(detail) = client.get_detail(&args.id).await else {
        tracing::warn!("Detail not available for {}", args.id);
        return Ok(());
    };
    print_detail(&detail);

    Ok(())
}

/// Logs the fields of a detail record.
fn print_detail(detail: &MovieDetail) {
    tracing::info!("ID: {}", detail.imdb_id);
    tracing::info!("Title: {} ({})", detail.title, detail.year);
    tracing::info!(
        "Type: {}",
        detail.kind.map_or("-", ContentKind::as_str)
    );
    tracing::info!("Rated: {}", detail.rated);
    tracing::info!("Released: {}", detail.released);
    tracing::info!("Runtime: {}", detail.runtime);
    tracing::info!("Genre: {}", detail.genre);
    tracing::info!("Director: {}", detail.director);
    tracing::info!("Actors: {}", detail.actors);
    tracing::info!("Plot: {}", detail.plot);
    tracing::info!(
        "IMDb: {} ({} votes)",
        detail.imdb_rating,
        detail.imdb_votes
    );
    if let Some(seasons) = &detail.total_seasons {
        tracing::info!("Seasons: {seasons}");
    }
    if !detail.box_office.is_empty() {
        tracing::info!("Box office: {}", detail.box_office);
    }
    for rating in &detail.ratings {
        tracing::info!("  {}: {}", rating.source, rating.value);
    }
}

/// Runs the `episodes` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
async fn run_episodes(args: &EpisodesArgs, config: &AppConfig) -> Result<()> {
    let client = build_omdb_client(config)?;

    let known_seasons = args.seasons.map(|n| n.to_string());
    match total_episodes(&client, &args.id, known_seasons.as_deref()).await {
        Some(total) => tracing::info!("Total episodes for {}: {total}", args.id),
        None => tracing::warn!("Total episodes for {}: unknown", args.id),
    }

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config file already exists or cannot be written.
fn run_config_init(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() {
        bail!("config file already exists: {}", path.display());
    }
    AppConfig::default().save(&path)?;
    tracing::info!("Wrote default config to {}", path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be serialized.
fn run_config_show(config: &AppConfig, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let rendered = toml::to_string_pretty(config).context("failed to serialize config to TOML")?;
    tracing::info!("Config file: {}", path.display());
    for line in rendered.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if config loading or subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();

    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    match cli.command {
        Commands::Search(args) => run_search(args, &config).await,
        Commands::Detail(args) => run_detail(&args, &config).await,
        Commands::Episodes(args) => run_episodes(&args, &config).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init => run_config_init(dir),
            ConfigSubcommands::Show => run_config_show(&config, dir),
        },
    }
}
