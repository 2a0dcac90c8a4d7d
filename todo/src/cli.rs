//! CLI argument parsing for the todo binary

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::task::ListFilter;

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about = "Persistent to-do list manager", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task title
        #[arg(required = true)]
        title: String,

        /// Task description
        #[arg(default_value = "")]
        description: String,
    },

    /// List tasks
    List {
        /// Which tasks to show
        #[arg(short, long, value_enum, default_value = "all")]
        filter: FilterArg,

        /// Only show tasks whose title or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Edit a task's title and/or description
    Edit {
        /// Task id
        #[arg(required = true)]
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Mark a task complete
    Done {
        /// Task id
        #[arg(required = true)]
        id: String,
    },

    /// Mark a task incomplete
    Undone {
        /// Task id
        #[arg(required = true)]
        id: String,
    },

    /// Toggle a task's completion
    Toggle {
        /// Task id
        #[arg(required = true)]
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        #[arg(required = true)]
        id: String,
    },

    /// Move a task to a new position in the list (0-based)
    Mv {
        /// Task id
        #[arg(required = true)]
        id: String,

        /// Target position
        #[arg(required = true)]
        position: usize,
    },
}

/// CLI-facing spelling of the three-way display filter
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FilterArg {
    Pending,
    All,
    Completed,
}

impl From<FilterArg> for ListFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Pending => ListFilter::Pending,
            FilterArg::All => ListFilter::All,
            FilterArg::Completed => ListFilter::Completed,
        }
    }
}
