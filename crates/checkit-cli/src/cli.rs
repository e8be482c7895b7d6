use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "checkit")]
#[command(about = "A terminal checklist backed by a spreadsheet", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CHECKIT_BUILD_COMMIT"), ")"))]
pub struct Cli {
    /// Path to the config store (or set CHECKIT_STORE env var)
    #[arg(long, value_name = "FILE", env = "CHECKIT_STORE", global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show or change the stored settings
    Config(ConfigCommand),
    /// Load the checklist and print it as JSON
    Fetch(FetchArgs),
    /// Manage the saved item order of a category
    Order(OrderCommand),
    /// Export a tab as a single CSV row
    Export(ExportArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print every stored key
    Show,
    /// Update stored keys; omitted flags keep their value
    Set {
        #[arg(long)]
        deployment_id: Option<String>,
        /// Display name used for exports
        #[arg(long)]
        name: Option<String>,
        /// Only show this tab; an empty value shows every tab
        #[arg(long)]
        selected_title: Option<String>,
    },
}

#[derive(Args)]
pub struct FetchArgs {
    /// Only load this tab
    #[arg(long)]
    pub tab: Option<String>,
}

#[derive(Args)]
pub struct OrderCommand {
    #[command(subcommand)]
    pub action: OrderAction,
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// Save the item order for a category
    Set {
        #[arg(long)]
        tab: String,
        #[arg(long)]
        category: String,
        /// Item ids, first to last
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Forget the saved order for a category
    Clear {
        #[arg(long)]
        tab: String,
        #[arg(long)]
        category: String,
    },
}

#[derive(Args)]
pub struct ExportArgs {
    /// Tab to export; defaults to the first tab
    #[arg(long)]
    pub tab: Option<String>,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    #[arg(long, default_value = "")]
    pub link: String,
    /// Ids of items to mark as done
    #[arg(long, num_args = 1..)]
    pub checked: Vec<String>,
    /// Output directory; defaults to `export_dir` from config.toml
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}
