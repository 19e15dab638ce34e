//! Clap derive structures for the `notarydesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// notarydesk -- book notary and business services from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "notarydesk",
    version,
    about = "Book notary and business services from the command line",
    long_about = "Walks a customer through the booking wizard (contact, service, \
        add-ons, confirmation), stores the booking with the hosted backend and \
        hands off to checkout.\n\n\
        Admin commands update booking status directly.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "NOTARYDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Project URL (overrides profile)
    #[arg(long, env = "NOTARYDESK_PROJECT_URL", global = true)]
    pub project_url: Option<String>,

    /// Publishable (anon) key
    #[arg(long, env = "NOTARYDESK_ANON_KEY", global = true, hide_env_values = true)]
    pub anon_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NOTARYDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates (local development stacks)
    #[arg(long, short = 'k', env = "NOTARYDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile, default 30)
    #[arg(long, env = "NOTARYDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Book an appointment (interactive wizard or draft file)
    #[command(alias = "b")]
    Book(BookArgs),

    /// Look up bookings and change their status
    #[command(alias = "bk")]
    Bookings(BookingsArgs),

    /// Show the service catalog
    #[command(alias = "svc")]
    Services(ServicesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOK
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BookArgs {
    /// Submit a JSON draft instead of prompting
    #[arg(long, short = 'F', value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Validate the draft only; nothing is sent
    #[arg(long, requires = "from_file")]
    pub check: bool,

    /// Print the checkout URL instead of opening a browser
    #[arg(long)]
    pub no_open: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOKINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// Show one booking
    Get {
        /// Booking ID (UUID)
        id: String,
    },

    /// Overwrite a booking's status
    SetStatus {
        /// Booking ID (UUID)
        id: String,

        /// New status
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Mark a booking cancelled
    Cancel {
        /// Booking ID (UUID)
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServicesArgs {
    #[command(subcommand)]
    pub command: ServicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// List bookable services
    #[command(alias = "ls")]
    List,

    /// List add-ons offered at checkout
    AddOns,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (e.g. project_url, business_phone, automation_webhook)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a project key in the system keyring
    SetKey {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,

        /// Store the admin key instead of the anon key
        #[arg(long)]
        admin: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
