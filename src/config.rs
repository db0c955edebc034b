use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::engine::MAX_TICK;
use crate::plot::ChartFormat;
use crate::report::ReportFormat;

/// Runs a ledger simulation over agent balance sheets and reports the result.
#[derive(Debug, Clone, Parser)]
#[command(name = "agent_ledger", version)]
pub struct Config {
    /// Agent definitions: agent,side,account,balance[,tags,note,color,code,symbol]
    #[arg(env = "AGENT_LEDGER_AGENTS")]
    pub agents: PathBuf,

    /// Events to replay: tick,account,type,amount
    #[arg(short, long, env = "AGENT_LEDGER_EVENTS")]
    pub events: Option<PathBuf>,

    /// Keep closing ticks until this many have been simulated
    #[arg(
        short,
        long,
        env = "AGENT_LEDGER_TICKS",
        value_parser = clap::value_parser!(u32).range(..=MAX_TICK as i64)
    )]
    pub ticks: Option<u32>,

    /// Upper bound of the chart y axis (defaults to the largest snapshot plus 10%)
    #[arg(long, env = "AGENT_LEDGER_Y_MAX")]
    pub y_max: Option<f64>,

    /// Suffix account names with their currency code
    #[arg(long, env = "AGENT_LEDGER_SHOW_CURRENCY")]
    pub show_currency: bool,

    #[arg(long, value_enum, env = "AGENT_LEDGER_FORMAT", default_value_t = ReportFormat::Table)]
    pub format: ReportFormat,

    /// Write one chart per agent into this directory
    #[arg(long, env = "AGENT_LEDGER_CHART_DIR")]
    pub chart_dir: Option<PathBuf>,

    #[arg(long, value_enum, env = "AGENT_LEDGER_CHART_FORMAT", default_value_t = ChartFormat::Svg)]
    pub chart_format: ChartFormat,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "AGENT_LEDGER_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "AGENT_LEDGER_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    /// Installs the global tracing subscriber. Logs go to stderr so that
    /// reports on stdout stay clean.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        let registry = tracing_subscriber::registry().with(filter);
        // A second call is a no-op.
        let _ = if self.log_json {
            registry.with(fmt.json()).try_init()
        } else {
            registry.with(fmt).try_init()
        };
    }
}
