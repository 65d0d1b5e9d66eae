use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser, ValueEnum};
use log::LevelFilter;

mod config;
mod error;
mod loader;
mod models;
mod report;
mod throughput;

use config::{ColumnMap, ReportConfig, ReportProfile, ResolvedPolicy};
use loader::LoadOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "ticket-throughput")]
#[command(
    about = "Weekly created/resolved statistics and backlog projection from an issue-tracker CSV export",
    long_about = None
)]
#[command(group(
    ArgGroup::new("policy")
        .args(["open_status", "closed_status"])
        .multiple(false)
))]
struct Cli {
    /// Input file containing exported ticket data in CSV format
    file: PathBuf,

    /// Print extra debugging info to stderr
    #[arg(short, long)]
    debug: bool,

    #[arg(long, value_enum, default_value_t = ReportProfile::Rolling)]
    profile: ReportProfile,

    /// Leave out the backlog verdict line
    #[arg(long)]
    no_verdict: bool,

    /// Statuses that mean "still open"; every other status counts as resolved
    #[arg(long, value_delimiter = ',')]
    open_status: Vec<String>,

    /// Statuses that count as resolved; every other status counts as open
    #[arg(long, value_delimiter = ',')]
    closed_status: Vec<String>,

    #[arg(long, default_value = "Issue id")]
    id_column: String,

    #[arg(long, default_value = "Created")]
    created_column: String,

    #[arg(long, default_value = "Resolved")]
    resolved_column: String,

    #[arg(long, default_value = "Resolution")]
    status_column: String,

    /// chrono format string tried before the built-in date formats
    #[arg(long)]
    date_format: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Cli {
    fn policy(&self) -> ResolvedPolicy {
        if !self.closed_status.is_empty() {
            ResolvedPolicy::Include {
                closed: self.closed_status.clone(),
            }
        } else if !self.open_status.is_empty() {
            ResolvedPolicy::Exclude {
                open: self.open_status.clone(),
            }
        } else {
            ResolvedPolicy::default()
        }
    }

    fn report_config(&self) -> ReportConfig {
        let mut config = ReportConfig::for_profile(self.profile, self.policy());
        if self.no_verdict {
            config.include_verdict = false;
        }
        config
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            columns: ColumnMap {
                id: self.id_column.clone(),
                created: self.created_column.clone(),
                resolved: self.resolved_column.clone(),
                status: self.status_column.clone(),
            },
            date_format: self.date_format.clone(),
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

/// Loads the export named on the command line and renders the report.
fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = cli.report_config();
    log::debug!("report config: {:?}", config);

    let tickets = loader::load_tickets(&cli.file, &cli.load_options())
        .with_context(|| format!("failed to load tickets from {}", cli.file.display()))?;
    let report = throughput::analyze(&tickets, &config)
        .with_context(|| format!("cannot build weekly report for {}", cli.file.display()))?;

    match cli.format {
        OutputFormat::Text => Ok(report::render_text(&report, &config)),
        OutputFormat::Json => {
            let json = report::render_json(&report).context("failed to serialize report")?;
            Ok(format!("{json}\n"))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    print!("{}", run(&cli)?);
    Ok(())
}
