//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use mdnotes_core::{FileIndex, Viewer};
use mdnotes_discovery::SiteClient;
use mdnotes_markdown::Converter;
use mdnotes_shared::{AppConfig, DiscoveryOptions, RenderEngine, init_config, load_config};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// mdnotes: a viewer for Markdown notes published on a static site.
#[derive(Parser)]
#[command(
    name = "mdnotes",
    version,
    about = "Discover and render the Markdown notes published on a static site.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Where the site lives. Overrides `[site]` in the config file.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct SiteArgs {
    /// Base URL document paths resolve against.
    #[arg(long, env = "MDNOTES_BASE_URL")]
    pub base_url: Option<String>,

    /// URL the viewer is hosted at (for hosting-provider detection).
    #[arg(long)]
    pub page_url: Option<String>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Discover the site's Markdown documents and print the file index.
    Discover {
        #[command(flatten)]
        site: SiteArgs,

        /// Print descriptors as JSON.
        #[arg(long, conflicts_with = "html")]
        json: bool,

        /// Print the index list as HTML.
        #[arg(long)]
        html: bool,

        /// Only show documents whose name or description contains this text.
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Fetch a document and print the rendered viewer page.
    View {
        #[command(flatten)]
        site: SiteArgs,

        /// Viewer query string, e.g. "file=docs/zshrc.md".
        #[arg(short, long, default_value = "")]
        query: String,

        /// Skip the external renderer and use the built-in converter.
        #[arg(long)]
        builtin: bool,
    },

    /// Convert a local Markdown file (or `-` for stdin) to HTML.
    Render {
        /// Markdown file path, or `-` to read stdin.
        file: PathBuf,

        /// Skip the external renderer and use the built-in converter.
        #[arg(long)]
        builtin: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout
/// carries only command output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "mdnotes=warn",
        1 => "mdnotes=info",
        2 => "mdnotes=debug",
        _ => "mdnotes=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Discover {
            site,
            json,
            html,
            filter,
        } => cmd_discover(&site, json, html, filter.as_deref()).await,
        Command::View {
            site,
            query,
            builtin,
        } => cmd_view(&site, &query, builtin).await,
        Command::Render { file, builtin } => cmd_render(&file, builtin).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Load the config file and apply `--base-url` / `--page-url`.
fn resolve_site(site: &SiteArgs) -> Result<(AppConfig, DiscoveryOptions)> {
    let mut config = load_config()?;
    if let Some(base_url) = &site.base_url {
        config.site.base_url = base_url.clone();
    }
    if let Some(page_url) = &site.page_url {
        config.site.page_url = Some(page_url.clone());
    }

    let opts = DiscoveryOptions::try_from(&config)?;
    Ok((config, opts))
}

fn converter_for(config: Option<&AppConfig>, builtin: bool) -> Converter {
    if builtin {
        return Converter::builtin();
    }
    Converter::for_engine(config.map(|c| c.render.engine).unwrap_or(RenderEngine::Pulldown))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_discover(site: &SiteArgs, json: bool, html: bool, filter: Option<&str>) -> Result<()> {
    let (_, opts) = resolve_site(site)?;
    info!(base = %opts.base_url, "discovering documents");

    let spinner = scanning_spinner();
    let files = mdnotes_discovery::discover(&opts).await;
    spinner.finish_and_clear();

    let mut index = FileIndex::new(files);
    if let Some(query) = filter {
        index.filter(query);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(index.visible())?);
        return Ok(());
    }

    if html {
        println!("{}", index.render_list());
        return Ok(());
    }

    println!();
    println!("  {}", index.count_line());
    if !index.visible().is_empty() {
        println!();
        for doc in index.visible() {
            println!("  {:<24} {}  [{}]", doc.name(), doc.path(), doc.origin());
            println!("  {:<24} {}", "", doc.description());
        }
    }
    println!();

    Ok(())
}

async fn cmd_view(site: &SiteArgs, query: &str, builtin: bool) -> Result<()> {
    let (config, opts) = resolve_site(site)?;
    let viewer = Viewer::new(SiteClient::new(&opts)?, converter_for(Some(&config), builtin));

    let page = viewer.open(query).await;
    if page.is_error {
        warn!(query, "viewer rendered an error page");
    }
    print!("{}", page.to_html());

    Ok(())
}

async fn cmd_render(file: &Path, builtin: bool) -> Result<()> {
    let markdown = if file.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .map_err(|e| eyre!("failed to read stdin: {e}"))?;
        buf
    } else {
        tokio::fs::read_to_string(file)
            .await
            .map_err(|e| eyre!("failed to read {}: {e}", file.display()))?
    };

    // A broken config file should not stop a local render.
    let config = load_config()
        .inspect_err(|e| warn!(error = %e, "ignoring unreadable config"))
        .ok();
    let converter = converter_for(config.as_ref(), builtin);

    println!("{}", converter.convert(&markdown));
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Spinner shown while the discovery cascade runs.
fn scanning_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.set_message("Scanning for files...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
