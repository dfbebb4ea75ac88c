use crate::context::AppContext;
use crate::format::OutputFormat;
use clap::Args;
use libregls::{Config, FailurePolicy, Inventory, ListOptions, Regls, Row};
use tabled::Tabled;

pub mod handlers;

/// Message printed when the inventory has no rows.
pub const EMPTY_MESSAGE: &str = "No images found.";

/// Arguments of the `list` command
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Registry base URL (e.g. https://registry.internal:5000)
    #[arg(long, env = "REGLS_URL")]
    pub url: Option<String>,

    /// Show every tag instead of the five newest per repository
    #[arg(short, long)]
    pub all: bool,

    /// Only list repositories whose name starts with this prefix
    #[arg(long = "s", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Abort on the first tag or repository that cannot be resolved
    #[arg(long)]
    pub strict: bool,

    /// Maximum number of registry requests in flight
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format: pretty, json, yaml
    #[arg(short, long)]
    pub format: Option<String>,
}

/// One table line
#[derive(Debug, Tabled)]
pub struct TagRow {
    #[tabled(rename = "IMAGE")]
    pub image: String,
    #[tabled(rename = "TAG")]
    pub tag: String,
    #[tabled(rename = "ARCHITECTURE")]
    pub architecture: String,
    #[tabled(rename = "CREATED")]
    pub created: String,
}

impl From<&Row> for TagRow {
    fn from(row: &Row) -> Self {
        Self {
            image: row.repository.clone(),
            tag: row.tag.clone(),
            architecture: row.architecture.clone(),
            created: row.created.clone(),
        }
    }
}

/// Config with the command's flag overrides applied.
pub fn effective_config(ctx: &AppContext, args: &ListArgs) -> Config {
    let mut config = ctx.config.clone();

    if let Some(url) = &args.url {
        config.registry.url = Some(url.clone());
    }
    if let Some(timeout) = args.timeout {
        config.network.timeout = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        config.network.concurrency = concurrency;
    }
    if let Some(format) = &args.format {
        config.output.format = OutputFormat::from(format.as_str());
    }

    config
}

/// Listing options from the flags and the resolved config.
pub fn list_options(config: &Config, args: &ListArgs) -> ListOptions {
    let policy = if args.strict {
        FailurePolicy::Strict
    } else {
        FailurePolicy::BestEffort
    };

    let mut options = ListOptions::new()
        .with_show_all(args.all)
        .with_policy(policy)
        .with_concurrency(config.network.concurrency);

    if let Some(prefix) = &args.prefix {
        options = options.with_prefix(prefix.as_str());
    }

    options
}

/// Builds the registry facade for one `list` run.
pub fn build_regls(config: &Config, args: &ListArgs) -> libregls::Result<Regls> {
    Regls::builder()
        .with_config(config.clone())
        .with_options(list_options(config, args))
        .build()
}

/// Renders rows in the requested format.
pub fn render_rows(rows: &[Row], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Pretty => {
            if rows.is_empty() {
                return Ok(EMPTY_MESSAGE.to_string());
            }
            use tabled::{Table, settings::Style};
            let table_rows: Vec<TagRow> = rows.iter().map(TagRow::from).collect();
            Ok(Table::new(&table_rows).with(Style::empty()).to_string())
        }
        OutputFormat::Json => serde_json::to_string_pretty(rows)
            .map_err(|e| format!("Failed to serialize to JSON: {}", e)),
        OutputFormat::Yaml => serde_yaml::to_string(rows)
            .map(|yaml| yaml.trim_end().to_string())
            .map_err(|e| format!("Failed to serialize to YAML: {}", e)),
    }
}

/// One-line summary of what a best-effort run skipped, if anything.
pub fn skipped_summary(inventory: &Inventory) -> Option<String> {
    let skipped = &inventory.failures;
    if skipped.is_empty() {
        return None;
    }

    let repositories = skipped.iter().filter(|f| f.tag.is_none()).count();
    let tags = skipped.len() - repositories;
    Some(format!(
        "Skipped {} tag(s) and {} repository(ies) that could not be resolved",
        tags, repositories
    ))
}
