use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(
    name = "cloud-connector",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ", built ", env!("BUILD_TIMESTAMP"), ")"),
    about = "Discover cloud assets and report them to the asset inventory"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a providers file and list the configured accounts
    Validate(ConfigArgs),
    /// Show each configured account with its label prefix and ignored resource types
    Providers(ProvidersArgs),
    /// Remove every seed stored under a label from the inventory
    DeleteSeeds(DeleteSeedsArgs),
}

#[derive(Args, Clone)]
pub struct ConfigArgs {
    /// YAML providers file
    #[arg(short, long, default_value = "providers.yml")]
    pub config: String,

    /// Scan without submitting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum number of scanners in flight per connector
    #[arg(long)]
    pub max_concurrent_scans: Option<usize>,
}

#[derive(Args, Clone)]
pub struct ProvidersArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct DeleteSeedsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Provider whose connector owns the label: aws, azure, gcp
    #[arg(short, long)]
    pub provider: String,

    /// Label to clear, e.g. "AZURE: <subscription>/eastus"
    #[arg(short, long)]
    pub label: String,
}
