use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use gatehouse_core::views::{AdminTab, GuardTab};

#[derive(Parser, Debug)]
#[command(name = "gatehouse", version, about = "Gatehouse visitor-management client")]
pub struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, env = "GATEHOUSE_API_URL")]
    pub api_url: Option<String>,

    /// Client state file (credentials, push token marker).
    #[arg(long, global = true, env = "GATEHOUSE_STORAGE_PATH")]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the credentials.
    Login {
        username: String,
        /// Read from stdin when omitted.
        #[arg(long, env = "GATEHOUSE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored credentials.
    Logout,

    /// Show the current session.
    Whoami,

    /// Resolve a path the way the app would and show what it renders.
    Open {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Show the dashboard for the logged-in role.
    Dashboard {
        /// Day to show on the operations board (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Operations board tab.
        #[arg(long, value_enum, default_value_t = BoardTab::Expected)]
        tab: BoardTab,

        /// Admin dashboard tab.
        #[arg(long, value_enum, default_value_t = AdminSection::Operations)]
        section: AdminSection,

        /// Print once instead of following updates.
        #[arg(long)]
        once: bool,
    },

    /// Mark an approved visitor as arrived.
    CheckIn { id: i64 },

    /// Mark a visitor inside as departed.
    CheckOut { id: i64 },

    /// Approve a pending visitor.
    Approve { id: i64 },

    /// Deny a pending visitor.
    Deny { id: i64 },

    /// Talk to the visitor assistant. Interactive when no message is given.
    Chat { message: Option<String> },

    /// Print the audit log.
    Events,

    /// Print the user directory.
    Users,

    /// Register this device's push token with the backend.
    RegisterDevice { token: String },

    /// Show a push payload (JSON) as a background notification.
    Push { payload: String },

    /// Print version information.
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardTab {
    Expected,
    Pending,
    Inside,
    DailyLog,
}

impl From<BoardTab> for GuardTab {
    fn from(tab: BoardTab) -> Self {
        match tab {
            BoardTab::Expected => GuardTab::Expected,
            BoardTab::Pending => GuardTab::Pending,
            BoardTab::Inside => GuardTab::Inside,
            BoardTab::DailyLog => GuardTab::DailyLog,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminSection {
    Operations,
    Users,
    Audit,
}

impl From<AdminSection> for AdminTab {
    fn from(section: AdminSection) -> Self {
        match section {
            AdminSection::Operations => AdminTab::Operations,
            AdminSection::Users => AdminTab::Users,
            AdminSection::Audit => AdminTab::Audit,
        }
    }
}
