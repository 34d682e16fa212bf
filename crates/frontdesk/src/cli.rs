//! Clap derive structures for the `frontdesk` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use frontdesk_core::GuestStatus;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// frontdesk -- hotel front desk on top of a headless CMS
#[derive(Debug, Parser)]
#[command(
    name = "frontdesk",
    version,
    about = "Run the hotel front desk from the command line",
    long_about = "Manage guests and rooms stored in a headless CMS.\n\n\
        Signs staff in against the CMS identity endpoint and keeps the\n\
        signed session in the system keyring between invocations.",
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
    /// Content API URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Service-level API token (overrides config and keyring)
    #[arg(long, global = true, hide_env = true, env = "FRONTDESK_API_TOKEN")]
    pub api_token: Option<String>,

    /// Signed session token (overrides the keyring)
    #[arg(long, global = true, hide = true, env = "FRONTDESK_SESSION_TOKEN")]
    pub session_token: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "FRONTDESK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// Sign in and keep the session in the keyring
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the current session
    #[command(alias = "whoami")]
    Session,

    /// Manage guests
    #[command(alias = "g")]
    Guests(GuestsArgs),

    /// Manage rooms
    #[command(alias = "r")]
    Rooms(RoomsArgs),

    /// Fill the backend with generated guests
    Seed(SeedArgs),

    /// Evaluate the route guard
    Route(RouteArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Args)]
pub struct LoginArgs {
    /// Username or email (prompted when missing)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Password (prompted when missing)
    #[arg(long, env = "FRONTDESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl std::fmt::Debug for LoginArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginArgs")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Guests ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GuestsArgs {
    #[command(subcommand)]
    pub command: GuestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GuestsCommand {
    /// List all guests
    #[command(alias = "ls")]
    List {
        /// Only guests assigned to this room
        #[arg(long)]
        room: Option<i64>,
    },

    /// Register a new guest
    Add(GuestFields),

    /// Change fields of an existing guest
    Update {
        /// Guest id
        id: i64,

        #[command(flatten)]
        fields: GuestUpdateFields,
    },

    /// Mark a guest as checked out
    CheckOut {
        /// Guest id
        id: i64,

        /// Also free the guest's room
        #[arg(long)]
        vacate: bool,
    },
}

#[derive(Debug, Args)]
pub struct GuestFields {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Room number
    #[arg(long)]
    pub room: Option<i64>,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: Option<NaiveDate>,

    /// Leave date (YYYY-MM-DD)
    #[arg(long)]
    pub leave_date: Option<NaiveDate>,

    /// Booking status
    #[arg(long, value_enum, default_value = "confirmed")]
    pub status: StatusArg,

    /// Already paid
    #[arg(long)]
    pub paid: bool,
}

#[derive(Debug, Args)]
pub struct GuestUpdateFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Room number
    #[arg(long)]
    pub room: Option<i64>,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: Option<NaiveDate>,

    /// Leave date (YYYY-MM-DD)
    #[arg(long)]
    pub leave_date: Option<NaiveDate>,

    /// Booking status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Paid flag
    #[arg(long)]
    pub paid: Option<bool>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Confirmed,
    Active,
    CheckedOut,
}

impl From<StatusArg> for GuestStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Confirmed => Self::Confirmed,
            StatusArg::Active => Self::Active,
            StatusArg::CheckedOut => Self::CheckedOut,
        }
    }
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List all rooms
    #[command(alias = "ls")]
    List,

    /// List rooms that can take a guest
    Available,

    /// Assign a guest to a room
    Occupy {
        /// Room number
        room_no: i64,

        /// Guest id
        #[arg(long)]
        guest: i64,
    },

    /// Free a room
    Vacate {
        /// Room number
        room_no: i64,
    },
}

// ── Seed ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Number of guests to create
    #[arg(default_value = "10")]
    pub count: usize,

    /// Pick random room numbers instead of reading the rooms collection
    #[arg(long)]
    pub simple: bool,

    /// Pause between posts in milliseconds
    #[arg(long, default_value = "300")]
    pub delay_ms: u64,

    /// Seed the random generator for reproducible guests
    #[arg(long)]
    pub rng_seed: Option<u64>,
}

// ── Route ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RouteArgs {
    #[command(subcommand)]
    pub command: RouteCommand,
}

#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// Decide whether navigating to PATH is allowed right now
    Check {
        /// Site path, e.g. /dashboard/rooms
        path: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the effective configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
