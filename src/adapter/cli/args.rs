use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "accountdeck",
    version,
    about = "Verify bearer tokens and organize the accounts behind them into groups"
)]
pub struct Cli {
    /// Settings file (defaults to settings.yaml in the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug-level console logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify tokens against the identity endpoint and save the valid ones
    Verify(VerifyArgs),

    /// Inspect or clear the saved token list
    #[command(subcommand)]
    Tokens(TokensCommand),

    /// Manage account groups
    #[command(subcommand)]
    Group(GroupCommand),

    /// Show or edit settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Tokens to verify
    pub tokens: Vec<String>,

    /// Read tokens from a .txt (one per line) or .json (string array) file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Re-verify the tokens saved by the previous run
    #[arg(long, conflicts_with_all = ["tokens", "file"])]
    pub saved: bool,

    /// Add every verified account to this group, creating it if needed
    #[arg(short, long, value_name = "NAME")]
    pub group: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TokensCommand {
    /// List saved tokens (masked)
    Show,

    /// Delete the saved token file
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// Create an empty group
    Create { name: String },

    /// Delete a group and everything in it
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Add an account to a group
    Add {
        group: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        id: String,
        #[arg(long, default_value = "")]
        token: String,
    },

    /// Move an account from one group to another
    Move {
        from: String,
        to: String,
        username: String,
    },

    /// Remove an account from a group
    Remove {
        group: String,
        username: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List group names
    List,

    /// List the accounts in a group
    Members { group: String },

    /// List the groups containing an account
    Find { username: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the effective settings
    Show,

    /// Write the default settings file if none exists
    Init,

    /// Change settings and save them
    Set {
        #[arg(long)]
        max_threads: Option<usize>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        groups_path: Option<String>,
        #[arg(long)]
        tokens_path: Option<String>,
    },
}
