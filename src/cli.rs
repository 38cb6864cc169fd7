use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line client for the task board backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Backend origin, e.g. http://task.example.com/api
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// File holding the session token between runs
    #[arg(long, env = "TASKBOARD_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show whether a session token is stored
    Whoami,
    /// Resolve a client route through the navigation guard
    Navigate { path: String },
    /// Manage users
    #[command(subcommand)]
    Users(UsersCommand),
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectsCommand),
    /// Manage tasks
    #[command(subcommand)]
    Tasks(TasksCommand),
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    List,
    Get { id: String },
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    List,
    Get { id: String },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// List the tasks of a project
    List { project_id: String },
    Create(TaskFormArgs),
    Update {
        id: String,
        #[command(flatten)]
        form: TaskFormArgs,
    },
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct TaskFormArgs {
    /// Form field as key=value, repeatable
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// File sent as the `attachment` form part
    #[arg(long)]
    pub attach: Option<PathBuf>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))
}
