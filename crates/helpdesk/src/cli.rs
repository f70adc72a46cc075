//! Clap derive structures for the `helpdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// helpdesk: query and manage a ticketing account from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "helpdesk",
    version,
    about = "Query and manage helpdesk tickets, users, and organizations",
    long_about = "A command-line client for the helpdesk REST API (v2).\n\n\
        Reference data (users, organizations, groups, brands) is cached for the\n\
        life of one invocation; tickets and comments for a few seconds.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "HELPDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Account subdomain (overrides profile)
    #[arg(long, short = 'd', env = "HELPDESK_SUBDOMAIN", global = true)]
    pub subdomain: Option<String>,

    /// Full API root URL, e.g. a proxy (overrides subdomain)
    #[arg(long, env = "HELPDESK_BASE_URL", global = true, hide = true)]
    pub base_url: Option<String>,

    /// Agent email the token belongs to
    #[arg(long, short = 'e', env = "HELPDESK_EMAIL", global = true)]
    pub email: Option<String>,

    /// API token
    #[arg(long, env = "HELPDESK_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "HELPDESK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Confirm destructive operations
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "HELPDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "HELPDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Bypass the object cache
    #[arg(long, global = true)]
    pub no_cache: bool,
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
    /// Plain text, one id per line (scripting)
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
    /// Query and manage tickets
    #[command(alias = "t")]
    Tickets(TicketsArgs),

    /// Query and manage users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Query organizations
    #[command(alias = "orgs")]
    Organizations(ResourceArgs),

    /// Query agent groups
    Groups(ResourceArgs),

    /// Query brands
    Brands(ResourceArgs),

    /// Query community topics
    Topics(ResourceArgs),

    /// Show the progress of a background job
    JobStatus {
        /// Job status id
        id: String,
    },

    /// Search across tickets, users, and organizations
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Shared paging and sorting arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results to print
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: usize,

    /// Fetch every page
    #[arg(long, short = 'a', conflicts_with = "limit")]
    pub all: bool,

    /// Page size requested from the service (1-100)
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Sort field, e.g. created_at
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction
    #[arg(long, value_parser = ["asc", "desc"])]
    pub sort_order: Option<String>,
}

/// Subcommands shared by read-mostly resources.
#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List all
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one by id
    Get {
        id: String,
    },

    /// Show several by id (comma-separated)
    ShowMany {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },

    /// Delete one or more by id (comma-separated)
    #[command(alias = "rm")]
    Delete {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TICKETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List tickets
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a ticket
    Get {
        id: String,
    },

    /// Show several tickets (comma-separated ids)
    ShowMany {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },

    /// Recently viewed tickets
    Recent(ListArgs),

    /// Comments on a ticket
    Comments {
        id: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Change history of a ticket
    Audits {
        id: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Tickets belonging to an organization
    ForOrganization {
        /// Organization id
        id: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Create a ticket
    Create {
        /// Ticket subject
        #[arg(long, required_unless_present = "from_file")]
        subject: Option<String>,

        /// First comment (description)
        #[arg(long, short = 'm', required_unless_present = "from_file")]
        comment: Option<String>,

        /// low, normal, high or urgent
        #[arg(long)]
        priority: Option<String>,

        /// problem, incident, question or task
        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Read the ticket (or a list of tickets) from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ["subject", "comment"])]
        from_file: Option<PathBuf>,
    },

    /// Update a ticket
    Update {
        id: String,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        assignee_id: Option<u64>,

        /// Clear the assignee
        #[arg(long, conflicts_with = "assignee_id")]
        unassign: bool,

        /// Add a comment
        #[arg(long, short = 'm')]
        comment: Option<String>,

        /// Make the added comment internal
        #[arg(long, requires = "comment")]
        private: bool,
    },

    /// Delete tickets (comma-separated ids)
    #[command(alias = "rm")]
    Delete {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List {
        /// Only users with this role
        #[arg(long, value_parser = ["end-user", "agent", "admin"])]
        role: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show a user
    Get {
        id: String,
    },

    /// Show several users (comma-separated ids)
    ShowMany {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },

    /// Groups a user belongs to
    Groups {
        id: String,
    },

    /// Organizations a user belongs to
    Organizations {
        id: String,
    },

    /// Tickets a user requested
    Requested {
        id: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Tickets a user is copied on
    Ccd {
        id: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Tickets assigned to a user
    Assigned {
        id: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Create a user
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long, value_parser = ["end-user", "agent", "admin"])]
        role: Option<String>,
    },

    /// Delete users (comma-separated ids)
    #[command(alias = "rm")]
    Delete {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEARCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search query, e.g. "type:ticket status:open printer"
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    #[command(flatten)]
    pub list: ListArgs,
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
    /// Display the current configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Add or replace a profile
    AddProfile {
        /// Profile name
        name: String,

        #[arg(long, required_unless_present = "base_url")]
        subdomain: Option<String>,

        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        email: String,

        /// Environment variable holding the token
        #[arg(long)]
        token_env: Option<String>,
    },

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a profile's API token in the system keyring
    SetToken {
        /// Profile name [default: the active profile]
        #[arg(long)]
        profile: Option<String>,

        /// The token value
        token: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
