use std::{env, fs, process::ExitCode};

use env_logger::Env;
use log::{error, info, warn};

use event_trip_api::{
    config::AppConfig,
    db::{event_store::MongoEventStore, mongo::create_mongo_client},
    error::SubmitError,
    models::event::EventDraft,
    services::draft_service::DraftController,
};

const USAGE: &str = "usage: event-trip-draft <draft.json> [--submit]";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args: Vec<String> = env::args().skip(1).collect();
    let submit = args.iter().any(|arg| arg == "--submit");
    let Some(path) = args.iter().find(|arg| !arg.starts_with("--")) else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let draft = match fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|raw| EventDraft::from_json(&raw).map_err(|e| e.to_string()))
    {
        Ok(draft) => draft,
        Err(e) => {
            error!("Could not load draft {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let mut controller = DraftController::load(draft, config.itinerary_encoding);

    for day in &controller.snapshot().structured_itinerary {
        info!(
            "Day {} ({}): {} - {} stop(s)",
            day.day,
            day.date,
            day.title,
            day.stops.len()
        );
    }

    let breakdown = controller.price_breakdown();
    info!(
        "Base {:.2} + buffer {:.2} + fee {:.2} + commission {:.2} + PG {:.2} = {:.2}",
        breakdown.base_total,
        breakdown.buffer_amount,
        breakdown.your_fee,
        breakdown.commission_amount,
        breakdown.pg_charges_amount,
        breakdown.total
    );

    for issue in controller.validate() {
        warn!("{}: {}", issue.field, issue.message);
    }

    if !submit {
        return ExitCode::SUCCESS;
    }

    let mongo_uri = match config.require_mongo_uri() {
        Ok(uri) => uri.to_string(),
        Err(_) => {
            error!("MONGODB_URI must be set to submit");
            return ExitCode::FAILURE;
        }
    };

    let client = match create_mongo_client(&mongo_uri).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to connect to MongoDB: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let store = MongoEventStore::new(client, &config);

    match controller.submit(&store).await {
        Ok(id) => {
            info!("Saved event {}", id);
            ExitCode::SUCCESS
        }
        Err(SubmitError::Validation(issues)) => {
            error!("Not submitted, {} field(s) need attention", issues.len());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
