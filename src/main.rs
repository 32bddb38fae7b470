use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::info;

use epic_tracker::adapters::http::EpicApiClient;
use epic_tracker::application::Store;
use epic_tracker::config::AppConfig;
use epic_tracker::domain::foundation::{AgencyId, DomainError, ProgramId, ScopeId};
use epic_tracker::ports::{AgencySource, Credential, QuestionKind, QuestionSource};
use epic_tracker::telemetry;

#[derive(Parser, Debug)]
#[command(name = "epic-tracker", about = "Program selection and progress tracking")]
struct Cli {
    /// Tree scope to load
    #[arg(long, default_value = "default")]
    scope: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized Area / Group / Program tree
    Tree,
    /// Print the agencies available for bulk selection
    Agencies,
    /// Select Programs and print aggregate progress
    Metrics {
        /// Activate this agency's Programs
        #[arg(long)]
        agency: Option<AgencyId>,
        /// Select individual Programs
        #[arg(long = "program")]
        programs: Vec<ProgramId>,
    },
    /// Print a Program's questions with their stored answers
    Questions {
        #[arg(long)]
        program: ProgramId,
        /// Limit to one questionnaire
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    NationalFramework,
    Evolution,
    Linkages,
}

impl From<KindArg> for QuestionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::NationalFramework => QuestionKind::NationalFramework,
            KindArg::Evolution => QuestionKind::Evolution,
            KindArg::Linkages => QuestionKind::Linkages,
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.telemetry)?;

    let credential: Credential = config
        .api
        .credential()
        .context("EPIC_TRACKER__API__TOKEN is not set")?;
    let client = EpicApiClient::new(config.api.client_config()).map_err(DomainError::from)?;
    let scope = ScopeId::new(cli.scope).map_err(DomainError::from)?;
    let mut store = Store::new(config.aggregation.aggregator());

    match cli.command {
        Command::Tree => {
            store
                .load_tree(&client, &scope, &credential)
                .await
                .map_err(DomainError::from)?;
            let catalog = store.catalog();
            print_json(&json!({
                "areas": catalog.areas(),
                "groups": catalog.groups(),
                "programs": catalog.programs(),
            }))?;
        }
        Command::Agencies => {
            let agencies = client
                .fetch_agencies(&credential)
                .await
                .map_err(DomainError::from)?;
            print_json(&agencies)?;
        }
        Command::Metrics { agency, programs } => {
            store
                .load_tree(&client, &scope, &credential)
                .await
                .map_err(DomainError::from)?;
            if let Some(agency_id) = agency {
                let agencies = client
                    .fetch_agencies(&credential)
                    .await
                    .map_err(DomainError::from)?;
                let agency = agencies
                    .iter()
                    .find(|a| a.id() == agency_id)
                    .ok_or_else(|| anyhow!("agency {} not found", agency_id))?;
                store.toggle_agency(agency);
            }
            for id in programs {
                if !store.select(id) && !store.is_selected(id) {
                    info!(program_id = %id, "program not in the loaded tree, skipped");
                }
            }

            let metrics = store.refresh_metrics(&client, &credential).await;
            print_json(metrics)?;
        }
        Command::Questions { program, kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind.into()],
                None => QuestionKind::ALL.to_vec(),
            };
            let mut entries = Vec::new();
            for kind in kinds {
                let questions = client
                    .fetch_questions(program, kind, &credential)
                    .await
                    .map_err(DomainError::from)?;
                for question in questions {
                    let answer = client
                        .fetch_answer(question.id, &credential)
                        .await
                        .map_err(DomainError::from)?;
                    entries.push(json!({ "question": question, "answer": answer }));
                }
            }
            print_json(&entries)?;
        }
    }

    Ok(())
}
