use std::sync::Arc;

use tracing::{error, info};

use seatsweep::config::SeatsweepConfig;
use seatsweep::logging::init_tracing;
use seatsweep::provider::build_sweeper;
use seatsweep::server::{build_router, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("seatsweep server failed: {}", e);
        eprintln!("seatsweep server failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = SeatsweepConfig::load()?;
    init_tracing(&config.logging.level);
    config.require_credentials()?;

    let sweeper = Arc::new(build_sweeper(&config)?);

    #[cfg(feature = "background-jobs")]
    let _scheduler = if config.schedule.enabled {
        use seatsweep::jobs::{JobConfig, JobScheduler};

        let scheduler = JobScheduler::new(Arc::clone(&sweeper), JobConfig::from(&config)).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        info!("Scheduled sweep disabled");
        None
    };

    let app = build_router(AppState {
        sweeper,
        sweep: config.sweep.clone(),
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
