use crate::ai_provider::AiProvider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swiftclaim_common::Orientation;

#[derive(Parser)]
#[command(name = "swiftclaim")]
#[command(about = "Receipt classification and expense claim form generator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AI provider (claude/codex/gemini)
    #[arg(long, global = true)]
    pub ai_provider: Option<AiProvider>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a single receipt image
    Classify {
        /// Receipt image path
        #[arg(required = true)]
        image: PathBuf,

        /// Print the raw JSON suggestion instead of a summary line
        #[arg(long)]
        json: bool,
    },

    /// Classify a folder of receipts into a claim file
    Analyze {
        /// Receipt folder path
        #[arg(required = true)]
        folder: PathBuf,

        /// Output claim JSON file (default: <folder>/claim.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Claimant name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Claim month, e.g. 2026-08
        #[arg(short, long, default_value = "")]
        month: String,

        /// Reuse cached classifications for unchanged images
        #[arg(long)]
        use_cache: bool,
    },

    /// Generate the claim form PDF/Excel from a claim JSON file
    Export {
        /// Input claim JSON file
        #[arg(required = true)]
        input: PathBuf,

        /// Output format (pdf/excel/both)
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page orientation (portrait/landscape)
        #[arg(long, default_value = "portrait")]
        orientation: Orientation,

        /// Document title, also used as the default file name
        #[arg(short, long, default_value = "Expenses Claim Form")]
        title: String,
    },

    /// Classify a folder and export the claim form in one go
    Run {
        /// Receipt folder path
        #[arg(required = true)]
        folder: PathBuf,

        /// Output file or directory (default: the input folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (pdf/excel/both)
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,

        /// Claimant name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Claim month, e.g. 2026-08
        #[arg(short, long, default_value = "")]
        month: String,

        /// Page orientation (portrait/landscape)
        #[arg(long, default_value = "portrait")]
        orientation: Orientation,

        /// Reuse cached classifications for unchanged images
        #[arg(long)]
        use_cache: bool,
    },

    /// Show or edit configuration
    Config {
        /// Set the default AI provider
        #[arg(long)]
        set_provider: Option<AiProvider>,

        /// Set the classifier timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Show current settings
        #[arg(long)]
        show: bool,
    },

    /// Manage the classification cache
    Cache {
        /// Delete the cache
        #[arg(long)]
        clear: bool,

        /// Target folder (default: current directory)
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Show cache info
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Copy, Debug, Default)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use pdf, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
