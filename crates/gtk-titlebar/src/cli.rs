//! Command-line definition.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gtk_titlebar_core::Variant;

#[derive(Debug, Parser)]
#[command(
    name = "gtk-titlebar",
    version,
    about = "Match GTK title bars to your editor's light or dark theme on X11"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the variant the editor's settings resolve to
    Resolve {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Resolve the variant and apply it to every editor window
    Apply {
        #[command(flatten)]
        inputs: InputArgs,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Apply an explicit variant to every editor window
    Set {
        /// Variant to apply
        #[arg(value_enum)]
        variant: VariantArg,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Re-apply whenever the settings or theme files change
    Watch {
        #[command(flatten)]
        inputs: InputArgs,
        #[command(flatten)]
        target: TargetArgs,
        /// Quiet period in milliseconds that ends a burst of file events
        #[arg(long, default_value_t = 200)]
        settle_ms: u64,
        /// Stop after this many input changes (runs forever when omitted)
        #[arg(long, hide = true)]
        max_events: Option<u64>,
    },
}

/// Where the mode setting and theme metadata come from.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Editor settings file (settings.json)
    #[arg(long, env = "GTK_TITLEBAR_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Override the mode setting (light, dark, auto)
    #[arg(long)]
    pub mode: Option<String>,

    /// Override the active color theme name
    #[arg(long)]
    pub theme: Option<String>,

    /// Theme catalog file (.yaml, .yml or .json); may be repeated
    #[arg(long = "catalog")]
    pub catalogs: Vec<PathBuf>,

    /// Extension manifest (package.json) contributing themes; may be repeated
    #[arg(long = "manifest")]
    pub manifests: Vec<PathBuf>,
}

/// Which windows to tag and how.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Path of the editor executable whose windows are tagged
    #[arg(long, env = "GTK_TITLEBAR_EDITOR")]
    pub editor: PathBuf,

    /// X property tool
    #[arg(long, env = "GTK_TITLEBAR_XPROP", default_value = "xprop")]
    pub xprop: String,

    /// Per-command timeout in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl TargetArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Light,
    Dark,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Light => Variant::Light,
            VariantArg::Dark => Variant::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
