use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// granola - terminal client for Granola meeting notes
#[derive(Debug, Parser)]
#[command(name = "granola")]
#[command(about = "Browse Granola meeting notes, participants and transcripts from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to Granola's cache-v3.json (defaults to the platform location)
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List meetings from the local cache
    #[command(alias = "meetings")]
    List {
        /// Maximum number of meetings to show
        #[arg(long)]
        limit: Option<usize>,

        /// List from the Granola API instead of the local cache
        #[arg(long)]
        remote: bool,

        /// Print JSON instead of human-readable output
        #[arg(long)]
        json: bool,
    },

    /// Show one meeting: notes, organizer and attendees
    Show {
        /// Document id or fuzzy title match
        query: String,

        #[arg(long)]
        json: bool,
    },

    /// Search meetings by title, notes text or attendee name
    Search {
        query: String,

        #[arg(long)]
        json: bool,
    },

    /// Show organizer and attendees for a meeting
    People {
        /// Document id or fuzzy title match
        query: String,

        /// Also enumerate the member directory of each group attendee
        #[arg(long = "expand-groups")]
        expand_groups: bool,

        #[arg(long)]
        json: bool,
    },

    /// Find meetings a person was involved in
    Person {
        /// Name or email (substring, case-insensitive)
        query: String,

        #[arg(long)]
        json: bool,
    },

    /// Print a meeting transcript
    Transcript {
        /// Document id or fuzzy title match
        query: String,

        /// Fetch from the Granola API instead of the local cache
        #[arg(long)]
        remote: bool,

        #[arg(long)]
        json: bool,
    },

    /// List folders, or the meetings in one folder
    #[command(alias = "lists")]
    Folders {
        /// Folder name (substring match)
        name: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List workspaces, or the meetings in one workspace
    Workspaces {
        /// Workspace name or id
        name: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Export a meeting as markdown
    Export {
        /// Document id or fuzzy title match
        query: String,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Include expanded group member directories
        #[arg(long = "expand-groups")]
        expand_groups: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigActions {
    /// Show the current configuration
    Show,
    /// Print the configuration file path
    Path,
}
