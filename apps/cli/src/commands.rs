//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use ftapi_content::{
    CallKind, ContentClient, ContentEvent, HttpOptions, HttpTransport, channel,
};
use ftapi_shared::{
    AppConfig, Config, ConfigValue, init_config, load_config, load_config_from, resolve_api_key,
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::Handle;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ftapi — fetch content and pages from the FT content API.
#[derive(Parser)]
#[command(
    name = "ftapi",
    version,
    about = "Fetch content items and site pages from the FT content API.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// API key (defaults to the env var named in the config file).
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Config file to use instead of ~/.ftapi/ftapi.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch content items by id.
    Content {
        /// Item ids.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Call-level config override (key=value, repeatable).
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Fetch site pages by id.
    Page {
        /// Page ids.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Call-level config override (key=value, repeatable).
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Fetch the main content of site pages by id.
    PageMainContent {
        /// Page ids.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Call-level config override (key=value, repeatable).
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Fetch the list of site pages.
    Pages {
        /// Call-level config override (key=value, repeatable).
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
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

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "ftapi=warn",
        1 => "ftapi=info",
        2 => "ftapi=debug",
        _ => "ftapi=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr; stdout carries event JSON.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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
pub(crate) async fn run(cli: Cli, runtime: Handle) -> Result<()> {
    let Cli {
        api_key,
        config,
        command,
        ..
    } = cli;

    match command {
        Command::Content { ids, set } => {
            cmd_fetch(CallKind::ApiContent, &ids, &set, api_key, config, runtime).await
        }
        Command::Page { ids, set } => {
            cmd_fetch(CallKind::Page, &ids, &set, api_key, config, runtime).await
        }
        Command::PageMainContent { ids, set } => {
            cmd_fetch(CallKind::PageMainContent, &ids, &set, api_key, config, runtime).await
        }
        Command::Pages { set } => {
            cmd_fetch(CallKind::Pages, &[], &set, api_key, config, runtime).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config).await,
        },
    }
}

fn load_app_config(path: Option<PathBuf>) -> Result<AppConfig> {
    Ok(match path {
        Some(path) => load_config_from(&path)?,
        None => load_config()?,
    })
}

// ---------------------------------------------------------------------------
// Fetch commands
// ---------------------------------------------------------------------------

async fn cmd_fetch(
    kind: CallKind,
    ids: &[String],
    set: &[String],
    api_key: Option<String>,
    config_path: Option<PathBuf>,
    runtime: Handle,
) -> Result<()> {
    let config = load_app_config(config_path)?;
    let api_key = resolve_api_key(api_key.as_deref(), &config)?;

    // File overrides first, then --set flags on top.
    let flags = parse_overrides(set)?;
    let call_config = config.overrides.merge(Some(&flags));

    let transport = HttpTransport::new(&HttpOptions {
        timeout_secs: config.api.timeout_secs,
    })?;
    let (tx, mut rx) = channel();
    let client = ContentClient::new(&api_key, transport, tx)?.with_runtime(runtime);

    let call_config = (!call_config.is_empty()).then_some(&call_config);
    let dispatch = client.fetch_items(Some(ids), call_config, kind);
    let expected = dispatch.len();
    info!(%kind, requests = expected, "dispatched");

    // In-flight tasks keep their own sink handles; the channel closes once they finish.
    drop(client);

    let progress = CliProgress::new(expected as u64, &kind.to_string())?;
    while let Some(event) = rx.recv().await {
        progress.event(&event);
        println!("{}", event.to_json());
    }
    progress.finish();

    let summary = dispatch.join().await;
    if summary.failed > 0 {
        return Err(eyre!(
            "{} of {expected} {kind} requests failed",
            summary.failed
        ));
    }
    Ok(())
}

/// Parse `key=value` pairs into a call-level config layer.
///
/// `true`/`false` become booleans, integers become numbers, anything else a string.
fn parse_overrides(pairs: &[String]) -> Result<Config> {
    pairs
        .iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| eyre!("invalid override '{pair}': expected KEY=VALUE"))?;
            if key.is_empty() {
                return Err(eyre!("invalid override '{pair}': empty key"));
            }
            let value = match value {
                "true" => ConfigValue::Bool(true),
                "false" => ConfigValue::Bool(false),
                v => v
                    .parse::<i64>()
                    .map(ConfigValue::Int)
                    .unwrap_or_else(|_| ConfigValue::from(v)),
            };
            Ok((key.to_string(), value))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Progress bar on stderr counting completed requests.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new(total: u64, call: &str) -> Result<Self> {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.set_message(call.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { bar })
    }

    fn event(&self, event: &ContentEvent) {
        let id = event.id().unwrap_or("collection");
        self.bar.set_message(format!("{} {id}", event.name()));
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(path: Option<PathBuf>) -> Result<()> {
    let config = load_app_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
