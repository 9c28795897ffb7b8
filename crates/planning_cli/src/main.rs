//! Planning command-line entry point.
//!
//! Applies planning update requests and flips project planning flags against
//! the database named in the config file. Output is JSON on stdout.

use clap::{Parser, Subcommand};
use log::error;
use planning_core::db::open_db;
use planning_core::{
    apply_update_atomically, init_logging_from_config, EntityId, EntityKind, PlanningConfig,
    PlanningService, PlanningUpdateRequest, ProjectService, SqlitePerformerRepository,
    SqliteProjectRepository, UserId,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Performer planning for network infrastructure projects
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON config file
    #[arg(long, short)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply a planning update request and print the created performers
    Update {
        /// Path to the request JSON
        request_path: PathBuf,
    },
    /// Mark a project owned by the user as being in planning
    SetPlanning {
        project_id: EntityId,
        user_id: UserId,
    },
    /// List performers of one entity
    List {
        /// One of knot, cross, om, dboard, focable
        kind: String,
        owner_id: EntityId,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("event=cli_command module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, String> {
    let config = PlanningConfig::load(&args.config).map_err(|err| err.to_string())?;
    init_logging_from_config(&config)?;
    let mut conn = open_db(&config.db_path).map_err(|err| err.to_string())?;

    let value = match args.command {
        Commands::Update { request_path } => {
            let text = std::fs::read_to_string(&request_path).map_err(|err| {
                format!("failed to read request `{}`: {err}", request_path.display())
            })?;
            let request = PlanningUpdateRequest::from_json(&text)
                .map_err(|err| format!("invalid planning request: {err}"))?;
            let response = if config.atomic_updates {
                apply_update_atomically(&mut conn, &request)
            } else {
                SqlitePerformerRepository::try_new(&conn)
                    .and_then(|repo| PlanningService::new(repo).handle_performers(&request))
            }
            .map_err(|err| err.to_string())?;
            serde_json::to_value(response)
        }
        Commands::SetPlanning {
            project_id,
            user_id,
        } => {
            let repo = SqliteProjectRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let response = ProjectService::new(repo)
                .set_planning(project_id, user_id)
                .map_err(|err| err.to_string())?;
            serde_json::to_value(response)
        }
        Commands::List { kind, owner_id } => {
            let kind = EntityKind::parse(&kind).ok_or_else(|| {
                format!("unknown entity kind `{kind}`; expected knot|cross|om|dboard|focable")
            })?;
            let repo = SqlitePerformerRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let performers = PlanningService::new(repo)
                .list_performers(kind, owner_id)
                .map_err(|err| err.to_string())?;
            serde_json::to_value(performers)
        }
    }
    .map_err(|err| format!("failed to encode response: {err}"))?;

    serde_json::to_string_pretty(&value).map_err(|err| format!("failed to encode response: {err}"))
}
