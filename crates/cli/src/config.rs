//! Command-line arguments, with environment fallbacks.

use std::path::PathBuf;

use clap::Parser;
use clap::builder::RangedU64ValueParser;

use tabsplit_observability::LogFormat;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "tabsplit", version)]
#[command(about = "Split a receipt between the people who shared it")]
pub struct CliConfig {
    /// Saved extraction payload (also read from `TABSPLIT_RECEIPT`).
    /// Without one the session starts from an empty receipt.
    #[arg(value_name = "RECEIPT", env = "TABSPLIT_RECEIPT")]
    pub receipt_path: Option<PathBuf>,

    /// Decimals used when printing amounts.
    #[arg(
        long = "decimals",
        short = 'd',
        env = "TABSPLIT_DISPLAY_DECIMALS",
        default_value_t = 2,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=6)
    )]
    pub display_decimals: usize,

    /// `json` or `pretty`.
    #[arg(long, env = "TABSPLIT_LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,
}
