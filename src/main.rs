mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use taskboard_client::api::{
    AuthApi, NewProject, NewUser, ProjectUpdate, ProjectsApi, TaskForm, TasksApi, UserUpdate,
    UsersApi,
};
use taskboard_client::app::{RouteTable, Router};
use taskboard_client::{ApiClient, ApiConfig, CredentialStore, ResourceId};

use cli::{CliArgs, Command, ProjectsCommand, TaskFormArgs, TasksCommand, UsersCommand};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let credentials = match args.session_file.clone().or_else(CredentialStore::default_path) {
        Some(path) => CredentialStore::persistent(path),
        None => CredentialStore::in_memory(),
    };
    let client = ApiClient::new(ApiConfig::new(&args.base_url), credentials.clone());

    run(args.command, client, credentials).await
}

async fn run(command: Command, client: ApiClient, credentials: CredentialStore) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            AuthApi::new(client)
                .sign_in(&username, &password)
                .await
                .context("Login failed")?;
            println!("Logged in as {}", username);
        }
        Command::Logout => {
            AuthApi::new(client).logout();
            println!("Logged out");
        }
        Command::Whoami => {
            if credentials.is_authenticated() {
                println!("Session token stored");
            } else {
                println!("Not logged in");
            }
        }
        Command::Navigate { path } => {
            let mut router = Router::new(credentials, RouteTable::default());
            let route = router.navigate(&path)?;
            println!("{} -> {}", route.path, route.view);
            for (name, value) in &route.params {
                println!("  {} = {}", name, value);
            }
        }
        Command::Users(command) => run_users(command, UsersApi::new(client)).await?,
        Command::Projects(command) => run_projects(command, ProjectsApi::new(client)).await?,
        Command::Tasks(command) => run_tasks(command, TasksApi::new(client)).await?,
    }
    Ok(())
}

async fn run_users(command: UsersCommand, api: UsersApi) -> Result<()> {
    match command {
        UsersCommand::List => print_json(&api.list_users().await?),
        UsersCommand::Get { id } => print_json(&api.get_user(&ResourceId::from(id)).await?),
        UsersCommand::Create {
            username,
            password,
            email,
            role,
        } => {
            let user = NewUser {
                username,
                password,
                email,
                role,
            };
            print_json(&api.create_user(&user).await?)
        }
        UsersCommand::Update {
            id,
            username,
            password,
            email,
            role,
        } => {
            let update = UserUpdate {
                username,
                password,
                email,
                role,
            };
            print_json(&api.update_user(&ResourceId::from(id), &update).await?)
        }
        UsersCommand::Delete { id } => print_json(&api.delete_user(&ResourceId::from(id)).await?),
    }
}

async fn run_projects(command: ProjectsCommand, api: ProjectsApi) -> Result<()> {
    match command {
        ProjectsCommand::List => print_json(&api.list_projects().await?),
        ProjectsCommand::Get { id } => {
            print_json(&api.get_project(&ResourceId::from(id)).await?)
        }
        ProjectsCommand::Create { name, description } => {
            let project = NewProject { name, description };
            print_json(&api.create_project(&project).await?)
        }
        ProjectsCommand::Update {
            id,
            name,
            description,
        } => {
            let update = ProjectUpdate { name, description };
            print_json(&api.update_project(&ResourceId::from(id), &update).await?)
        }
        ProjectsCommand::Delete { id } => {
            print_json(&api.delete_project(&ResourceId::from(id)).await?)
        }
    }
}

async fn run_tasks(command: TasksCommand, api: TasksApi) -> Result<()> {
    match command {
        TasksCommand::List { project_id } => {
            print_json(&api.list_tasks_by_project(&ResourceId::from(project_id)).await?)
        }
        TasksCommand::Create(form) => print_json(&api.create_task(task_form(form)?).await?),
        TasksCommand::Update { id, form } => {
            let form = task_form(form)?;
            print_json(&api.update_task(&ResourceId::from(id), form).await?)
        }
        TasksCommand::Delete { id } => print_json(&api.delete_task(&ResourceId::from(id)).await?),
    }
}

fn task_form(args: TaskFormArgs) -> Result<TaskForm> {
    let mut form = args
        .fields
        .into_iter()
        .fold(TaskForm::new(), |form, (key, value)| form.text(key, value));

    if let Some(path) = args.attach {
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read attachment {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        form = form.file("attachment", file_name, bytes, None);
    }

    Ok(form)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
