use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dew",
    about = concat!(
        "dewtrack v",
        env!("CARGO_PKG_VERSION"),
        " - museum and cooking progress, one click at a time"
    ),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (progress.json, config.toml)
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List categories with completion
    Categories,
    /// List items in a category
    List(ListArgs),
    /// Show item details
    Show(ItemArgs),
    /// Advance an item to its next state (same as double-clicking its card)
    Advance(ItemArgs),
    /// Set an item's state
    Set(SetArgs),
    /// Show completion statistics
    Stats(StatsArgs),
    /// Show achievements
    Achievements,
    /// Clear all progress in a category
    Reset(ResetArgs),
    /// Print or change the player name
    Name(NameArgs),
    /// View or edit config.toml
    Config(ConfigCmd),
}

#[derive(Args)]
pub struct ListArgs {
    /// Category to list (museum, cooking)
    pub category: String,
    /// Filter by state (all, incomplete, or a state name like found/donated)
    #[arg(long)]
    pub state: Option<String>,
    /// Only items in this group (e.g. artifacts, minerals)
    #[arg(long)]
    pub group: Option<String>,
    /// Case-insensitive regex on item names
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ItemArgs {
    /// Category of the item
    pub category: String,
    /// Item ID or exact name
    pub item: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// Category of the item
    pub category: String,
    /// Item ID or exact name
    pub item: String,
    /// New state: 0/1/2 or a state name (e.g. unfound, found, donated)
    pub state: String,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Only this category (default: all)
    pub category: Option<String>,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Category to clear
    pub category: String,
    /// Confirm the reset
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct NameArgs {
    /// New player name (omit to print the current one)
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set a key, e.g. `dew config set click.delay_ms 300`
    Set {
        /// Dotted key (click.delay_ms, ui.default_category, ui.show_key_hints,
        /// ui.colors.<name>, log.level)
        key: String,
        /// New value
        value: String,
    },
    /// Print the data directory and file paths
    Path,
}
