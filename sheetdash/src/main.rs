use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::*;
use sheetdash_core::source::{CachedSource, WorkbookSource};
use sheetdash_core::{Dashboard, DashboardConfig, GridSource, StatusFilter, ViewFilter};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

mod formatter;

#[derive(Parser)]
#[command(name = "sheetdash")]
#[command(about = "Read-only sales, cost and supplier dashboard over a business spreadsheet", long_about = None)]
#[command(version)]
struct Cli {
    /// Local export of the spreadsheet (.xlsx, .xls, .ods)
    #[arg(
        value_name = "FILE",
        required_unless_present = "spreadsheet_id",
        conflicts_with = "spreadsheet_id"
    )]
    file: Option<PathBuf>,

    /// Read the spreadsheet through the Google Sheets API instead
    #[arg(long, value_name = "ID")]
    spreadsheet_id: Option<String>,

    /// OAuth bearer token for the Sheets API
    #[arg(long, env = "SHEETS_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Render only this view (repeatable)
    #[arg(long = "view", value_name = "ID")]
    views: Vec<String>,

    /// Write one CSV per dataset into this directory
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Only show this product in profitability, costs and orders (repeatable)
    #[arg(long = "product", value_name = "NAME")]
    products: Vec<String>,

    /// Only show this sale method in profitability and costs (repeatable)
    #[arg(long = "method", value_name = "NAME")]
    methods: Vec<String>,

    /// Only show orders in this state
    #[arg(long, value_enum, default_value = "all")]
    status: OrderStatus,

    /// Only show suppliers of this type (repeatable)
    #[arg(long = "supplier-type", value_name = "TYPE")]
    supplier_types: Vec<String>,

    /// Only show suppliers whose row contains this text
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,
}

impl Cli {
    fn view_filter(&self) -> ViewFilter {
        let mut filter = ViewFilter::new()
            .with_products(self.products.iter().cloned())
            .with_methods(self.methods.iter().cloned())
            .with_status(self.status.into())
            .with_supplier_types(self.supplier_types.iter().cloned());
        if let Some(search) = &self.search {
            filter = filter.with_search(search.clone());
        }
        filter
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OrderStatus {
    All,
    Confirmed,
    Pending,
}

impl From<OrderStatus> for StatusFilter {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::All => StatusFilter::All,
            OrderStatus::Confirmed => StatusFilter::Confirmed,
            OrderStatus::Pending => StatusFilter::Pending,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    config.validate().context("Invalid configuration")?;

    let valid_views = sheetdash_core::views::registry::get_all_view_ids();
    for id in &cli.views {
        if !valid_views.contains(id.as_str()) {
            let mut known: Vec<_> = valid_views.iter().copied().collect();
            known.sort_unstable();
            bail!("Unknown view '{}'. Valid views: {}", id, known.join(", "));
        }
    }

    let source = CachedSource::new(open_source(&cli, &config)?, config.cache_ttl());
    let dashboard = Dashboard::with_config(config)
        .with_views(&cli.views)
        .with_filter(cli.view_filter());

    let (data, report) = match dashboard.run(&source) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    match cli.format {
        OutputFormat::Human => formatter::print_human(&report),
        OutputFormat::Json => formatter::print_json(&report)?,
    }

    if let Some(dir) = &cli.export_dir {
        let written = sheetdash_core::export::export_datasets(&data.datasets, dir)
            .with_context(|| format!("Failed to export CSV files to {}", dir.display()))?;
        for path in written {
            eprintln!("{} {}", "Exported".green(), path.display());
        }
    }

    Ok(())
}

/// Logs go to stderr so they never mix with the report
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<DashboardConfig> {
    if let Some(config_path) = path {
        return DashboardConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // Try to load default config from current directory if it exists
    let default_config_path = PathBuf::from("sheetdash.toml");
    if default_config_path.exists() {
        debug!(path = %default_config_path.display(), "using config from current directory");
        DashboardConfig::from_file(&default_config_path).with_context(|| {
            format!(
                "Failed to load config from {}",
                default_config_path.display()
            )
        })
    } else {
        Ok(DashboardConfig::default())
    }
}

fn open_source(cli: &Cli, config: &DashboardConfig) -> Result<Box<dyn GridSource>> {
    if let Some(file) = &cli.file {
        return Ok(Box::new(WorkbookSource::new(file)));
    }
    let Some(spreadsheet_id) = &cli.spreadsheet_id else {
        bail!("Either FILE or --spreadsheet-id is required");
    };
    open_sheets_api(spreadsheet_id, cli.access_token.as_deref(), config)
}

#[cfg(feature = "sheets-api")]
fn open_sheets_api(
    spreadsheet_id: &str,
    access_token: Option<&str>,
    config: &DashboardConfig,
) -> Result<Box<dyn GridSource>> {
    let token = access_token
        .context("An access token is required; set SHEETS_ACCESS_TOKEN or pass --access-token")?;
    Ok(Box::new(sheetdash_core::source::SheetsApiSource::new(
        spreadsheet_id,
        config.document.clone(),
        token,
    )))
}

#[cfg(not(feature = "sheets-api"))]
fn open_sheets_api(
    _spreadsheet_id: &str,
    _access_token: Option<&str>,
    _config: &DashboardConfig,
) -> Result<Box<dyn GridSource>> {
    bail!("This build has no Sheets API support; pass a local FILE instead")
}
