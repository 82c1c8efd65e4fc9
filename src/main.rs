//! pokeglyph - Pokémon sprites as truecolor terminal icons
//!
//! ```text
//!  ▄▀▀▄▄▀▀▄
//!  █ ▀▄▄▀ █   fetch → crop → half-blocks → assets/icons
//!   ▀▄▄▄▄▀
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pokeglyph_config::Config;
use pokeglyph_core::{
    ErrorPolicy, GlyphRenderer, IconStore, IconTarget, Pipeline, PipelineOptions, Progress,
    RunSummary, Slug, SpriteUrls, Variant,
};
use pokeglyph_fetch::{ClientOptions, HttpSource};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// pokeglyph - bake Pokémon sprites into terminal icons
#[derive(Parser, Debug)]
#[command(name = "pokeglyph")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file path
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Icon store directory
    #[arg(short = 'o', long, global = true)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the catalog and generate icons (default)
    Fetch(FetchArgs),
    /// Print a stored icon
    Show(ShowArgs),
    /// Print the effective configuration
    Config,
}

impl Default for Command {
    fn default() -> Self {
        Command::Fetch(FetchArgs::default())
    }
}

#[derive(clap::Args, Debug, Default)]
struct FetchArgs {
    /// Regenerate icons that already exist
    #[arg(short = 'f', long)]
    force: bool,

    /// Stop at the first sprite that cannot be fetched
    #[arg(long)]
    fail_fast: bool,

    /// Only process the first N catalog entries
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Manifest URL
    #[arg(long)]
    manifest_url: Option<String>,

    /// Sprite base URL (holding regular/ and shiny/)
    #[arg(long)]
    sprite_base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Hide the progress bar
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[derive(clap::Args, Debug)]
struct ShowArgs {
    /// Display name or slug
    #[arg(required_unless_present = "image")]
    name: Option<String>,

    /// Show the shiny variant
    #[arg(short = 's', long)]
    shiny: bool,

    /// Render a local PNG instead of a stored icon
    #[arg(long, conflicts_with = "name")]
    image: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    pokeglyph_core::progress::start_clock();
    let args = Args::parse();

    // Set up logging on stderr; stdout carries the progress line and icons
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                format!(
                    "pokeglyph={0},pokeglyph_core={0},pokeglyph_fetch={0},pokeglyph_config={0}",
                    log_level
                )
            }),
        ))
        .init();

    tracing::debug!("Starting pokeglyph v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(output) = args.output {
        config.output.dir = output;
    }

    match args.command.unwrap_or_default() {
        Command::Fetch(fetch) => run_fetch(fetch, config),
        Command::Show(show) => run_show(show, &config),
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Fold fetch flags into the loaded config
fn apply_fetch_args(args: &FetchArgs, config: &mut Config) {
    if args.force {
        config.output.resume = false;
    }
    if args.fail_fast {
        config.run.fail_fast = true;
    }
    if args.limit.is_some() {
        config.run.limit = args.limit;
    }
    if let Some(ref url) = args.manifest_url {
        config.source.manifest_url = url.clone();
    }
    if let Some(ref url) = args.sprite_base_url {
        config.source.sprite_base_url = url.clone();
    }
    if args.timeout.is_some() {
        config.source.timeout_secs = args.timeout;
    }
}

/// HTTP client settings from the source section
fn client_options(config: &Config) -> ClientOptions {
    let defaults = ClientOptions::default();
    ClientOptions {
        user_agent: config
            .source
            .user_agent
            .clone()
            .unwrap_or(defaults.user_agent),
        timeout: config.source.timeout_secs.map(Duration::from_secs),
    }
}

/// Final line printed after a run
fn summary_line(summary: &RunSummary) -> String {
    if summary.is_complete() {
        format!(
            "All {} icons ready ({} written, {} already present)",
            summary.expected, summary.written, summary.present
        )
    } else {
        format!(
            "{} icons ({} written, {} already present, {} failed)",
            summary, summary.written, summary.present, summary.failed
        )
    }
}

fn run_fetch(args: FetchArgs, mut config: Config) -> anyhow::Result<()> {
    apply_fetch_args(&args, &mut config);

    let source = HttpSource::new(&config.source.manifest_url, client_options(&config))
        .context("Failed to set up HTTP client")?;

    let options = PipelineOptions {
        resume: config.output.resume,
        on_error: if config.run.fail_fast {
            ErrorPolicy::Abort
        } else {
            ErrorPolicy::Skip
        },
        limit: config.run.limit,
    };
    let urls = SpriteUrls::new(&config.source.sprite_base_url, config.source.unknown_url());
    let store = IconStore::new(&config.output.dir);

    let stdout = std::io::stdout().lock();
    let mut progress = if args.quiet {
        Progress::hidden(stdout)
    } else {
        Progress::new(stdout)
    };

    let summary = Pipeline::new(urls, options)
        .run(&source, &store, &mut progress)
        .context("Icon generation failed")?;
    drop(progress);

    println!("{}", summary_line(&summary));
    Ok(())
}

fn run_show(args: ShowArgs, config: &Config) -> anyhow::Result<()> {
    if let Some(image) = args.image {
        let text = GlyphRenderer::new()
            .render_file(&image)
            .with_context(|| format!("Failed to render {}", image.display()))?;
        print!("{text}");
        return Ok(());
    }

    let name = args.name.unwrap_or_default();
    let store = IconStore::new(&config.output.dir);
    let variant = if args.shiny {
        Variant::Shiny
    } else {
        Variant::Regular
    };
    let slug = Slug::from_name(&name);
    if !slug.is_path_safe() {
        bail!("{name:?} does not name a stored icon");
    }
    let target = IconTarget::sprite(variant, &slug);

    let text = if store.exists(&target) {
        store.read(&target)?
    } else {
        tracing::warn!("No icon for {target}, showing the placeholder");
        store
            .read(&IconTarget::Unknown)
            .with_context(|| format!("No icon for {name:?} and no placeholder"))?
    };
    print!("{text}");
    Ok(())
}
